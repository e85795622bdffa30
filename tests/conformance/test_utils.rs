//! Shared fixtures.

use kgdash::{Entity, GraphQuery, Query, Relation, Row, VizResult};

/// Backend that always answers with the same rows.
pub struct Canned(pub Vec<Row>);

impl GraphQuery for Canned {
    fn execute(&self, _query: &Query) -> VizResult<Vec<Row>> {
        Ok(self.0.clone())
    }
}

/// An `n`/`r`/`m` triple row.
pub fn triple(src: Entity, rel: &str, dst: Entity) -> Row {
    Row::new()
        .with("n", src)
        .with("r", Relation::new(rel))
        .with("m", dst)
}

/// Entity with `id` and `name` properties.
pub fn named(id: &str, type_label: &str, name: &str) -> Entity {
    Entity::new(id, type_label)
        .with_property("id", id)
        .with_property("name", name)
}

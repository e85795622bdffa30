//! Layout modes and the renderer options they map to.
//!
//! Options serialize to the vis-network `options` object consumed by the
//! interactive renderer.

use serde::Serialize;
use std::fmt;

/// Seed used by the circular layout so repeated renders look the same.
pub const CIRCULAR_SEED: u64 = 2;

/// Named layout modes offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Physics simulation with force-atlas attraction/repulsion.
    #[default]
    ForceDirected,
    /// Top-down tree ordered by edge direction.
    Hierarchical,
    /// Static placement with a fixed seed.
    Circular,
    /// Static placement, different on every render.
    Random,
}

impl Layout {
    /// All modes, in menu order.
    pub const ALL: [Layout; 4] = [
        Layout::ForceDirected,
        Layout::Hierarchical,
        Layout::Circular,
        Layout::Random,
    ];

    /// Resolve a display name. Unknown names resolve to
    /// [`Layout::ForceDirected`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Force-directed" => Layout::ForceDirected,
            "Hierarchical" => Layout::Hierarchical,
            "Circular" => Layout::Circular,
            "Random" => Layout::Random,
            other => {
                tracing::debug!(target: "kgdash::render", layout = other, "unknown layout, using Force-directed");
                Layout::ForceDirected
            }
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Layout::ForceDirected => "Force-directed",
            Layout::Hierarchical => "Hierarchical",
            Layout::Circular => "Circular",
            Layout::Random => "Random",
        }
    }

    /// Whether nodes should be ordered sources-first before rendering.
    pub fn sorts_by_direction(&self) -> bool {
        matches!(self, Layout::Hierarchical)
    }

    /// Renderer options for this mode.
    pub fn config(&self) -> LayoutConfig {
        match self {
            Layout::ForceDirected => LayoutConfig {
                layout: LayoutOptions {
                    random_seed: None,
                    improved_layout: true,
                    hierarchical: None,
                },
                physics: PhysicsOptions {
                    enabled: true,
                    solver: Some("forceAtlas2Based".to_string()),
                    force_atlas2_based: Some(ForceAtlas2::default()),
                },
            },
            Layout::Hierarchical => LayoutConfig {
                layout: LayoutOptions {
                    random_seed: None,
                    improved_layout: true,
                    hierarchical: Some(HierarchicalOptions::default()),
                },
                physics: PhysicsOptions::disabled(),
            },
            Layout::Circular => LayoutConfig {
                layout: LayoutOptions {
                    random_seed: Some(CIRCULAR_SEED),
                    improved_layout: true,
                    hierarchical: None,
                },
                physics: PhysicsOptions::disabled(),
            },
            Layout::Random => LayoutConfig {
                layout: LayoutOptions {
                    random_seed: None,
                    improved_layout: false,
                    hierarchical: None,
                },
                physics: PhysicsOptions::disabled(),
            },
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    /// Placement options.
    pub layout: LayoutOptions,
    /// Simulation options.
    pub physics: PhysicsOptions,
}

impl LayoutConfig {
    /// JSON options object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Placement options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Seed for initial placement; None means a fresh seed per render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    /// Use the renderer's clustering-based initial placement.
    pub improved_layout: bool,
    /// Tree arrangement, when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchical: Option<HierarchicalOptions>,
}

/// Tree arrangement options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalOptions {
    /// Always true when present.
    pub enabled: bool,
    /// `UD` = up to down.
    pub direction: String,
    /// `directed` = ordered by edge direction.
    pub sort_method: String,
}

impl Default for HierarchicalOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: "UD".to_string(),
            sort_method: "directed".to_string(),
        }
    }
}

/// Simulation options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsOptions {
    /// Run the simulation at all.
    pub enabled: bool,
    /// Solver name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<String>,
    /// Force-atlas parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_atlas2_based: Option<ForceAtlas2>,
}

impl PhysicsOptions {
    fn disabled() -> Self {
        Self {
            enabled: false,
            solver: None,
            force_atlas2_based: None,
        }
    }
}

/// Force-atlas-2 parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceAtlas2 {
    /// Repulsion strength (negative repels).
    pub gravitational_constant: f64,
    /// Pull toward the center.
    pub central_gravity: f64,
    /// Rest length of edges.
    pub spring_length: f64,
    /// Edge stiffness.
    pub spring_constant: f64,
    /// Velocity damping.
    pub damping: f64,
    /// Node overlap avoidance, 0..=1.
    pub avoid_overlap: f64,
}

impl Default for ForceAtlas2 {
    fn default() -> Self {
        Self {
            gravitational_constant: -50.0,
            central_gravity: 0.01,
            spring_length: 100.0,
            spring_constant: 0.08,
            damping: 0.4,
            avoid_overlap: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for layout in Layout::ALL {
            assert_eq!(Layout::from_name(layout.name()), layout);
        }
    }

    #[test]
    fn unknown_name_is_force_directed() {
        assert_eq!(Layout::from_name("Spiral"), Layout::ForceDirected);
        assert_eq!(
            Layout::from_name("Spiral").config(),
            Layout::from_name("Force-directed").config()
        );
    }

    #[test]
    fn force_directed_uses_force_atlas() {
        let json = Layout::ForceDirected.config().to_json();
        assert_eq!(json["physics"]["enabled"], true);
        assert_eq!(json["physics"]["solver"], "forceAtlas2Based");
        assert_eq!(json["physics"]["forceAtlas2Based"]["springLength"], 100.0);
    }

    #[test]
    fn hierarchical_is_top_down_and_static() {
        let json = Layout::Hierarchical.config().to_json();
        assert_eq!(json["layout"]["hierarchical"]["direction"], "UD");
        assert_eq!(json["layout"]["hierarchical"]["sortMethod"], "directed");
        assert_eq!(json["physics"]["enabled"], false);
        assert!(Layout::Hierarchical.sorts_by_direction());
    }

    #[test]
    fn circular_is_seeded() {
        let json = Layout::Circular.config().to_json();
        assert_eq!(json["layout"]["randomSeed"], 2);
        assert_eq!(json["physics"]["enabled"], false);
    }

    #[test]
    fn random_has_no_seed() {
        let json = Layout::Random.config().to_json();
        assert!(json["layout"].get("randomSeed").is_none());
        assert_eq!(json["layout"]["improvedLayout"], false);
        assert_eq!(json["physics"]["enabled"], false);
    }
}

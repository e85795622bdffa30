//! Dashboard configuration.
//!
//! Settings come from an optional TOML file and are then overridden by the
//! environment (`NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`,
//! `CONDUIT_URL`). Every field has a default, so an empty file is valid.
//!
//! ```ignore
//! use kgdash_core::DashboardConfig;
//!
//! let cfg = DashboardConfig::new()
//!     .conduit_url("http://tools.internal:3001")
//!     .node_limit(250);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{VizError, VizResult};

/// Smallest node limit the dashboard accepts.
pub const MIN_NODE_LIMIT: usize = 10;
/// Largest node limit the dashboard accepts.
pub const MAX_NODE_LIMIT: usize = 500;

/// Configuration for the dashboard host and its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the Neo4j HTTP endpoint.
    pub neo4j_uri: String,
    /// Neo4j user.
    pub neo4j_user: String,
    /// Neo4j password.
    pub neo4j_password: String,
    /// Neo4j database name.
    pub neo4j_database: String,
    /// Base URL of the tool-execution service.
    pub conduit_url: String,
    /// Timeout applied to every HTTP request, in seconds.
    pub request_timeout_secs: u64,
    /// Layout used when none is chosen.
    pub default_layout: String,
    /// Maximum number of triples fetched for the interactive graph.
    pub node_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            neo4j_uri: "http://localhost:7474".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: "password".to_string(),
            neo4j_database: "neo4j".to_string(),
            conduit_url: "http://localhost:3001".to_string(),
            request_timeout_secs: 30,
            default_layout: "Force-directed".to_string(),
            node_limit: 100,
        }
    }
}

impl DashboardConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> VizResult<Self> {
        let cfg: DashboardConfig =
            toml::from_str(s).map_err(|e| VizError::config(e.to_string()))?;
        Ok(cfg.normalized())
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> VizResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VizError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load from an optional file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> VizResult<Self> {
        let cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        Ok(cfg.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 5] = [
            ("NEO4J_URI", &mut self.neo4j_uri),
            ("NEO4J_USER", &mut self.neo4j_user),
            ("NEO4J_PASSWORD", &mut self.neo4j_password),
            ("NEO4J_DATABASE", &mut self.neo4j_database),
            ("CONDUIT_URL", &mut self.conduit_url),
        ];
        for (key, field) in overrides {
            if let Some(v) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!(target: "kgdash::config", key, "environment override");
                *field = v;
            }
        }
        self
    }

    /// Set the Neo4j endpoint.
    pub fn neo4j_uri(mut self, uri: impl Into<String>) -> Self {
        self.neo4j_uri = uri.into();
        self
    }

    /// Set Neo4j credentials.
    pub fn neo4j_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.neo4j_user = user.into();
        self.neo4j_password = password.into();
        self
    }

    /// Set the tool-execution service URL.
    pub fn conduit_url(mut self, url: impl Into<String>) -> Self {
        self.conduit_url = url.into();
        self
    }

    /// Set the default layout name.
    pub fn default_layout(mut self, layout: impl Into<String>) -> Self {
        self.default_layout = layout.into();
        self
    }

    /// Set the node limit, clamped to the accepted range.
    pub fn node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit.clamp(MIN_NODE_LIMIT, MAX_NODE_LIMIT);
        self
    }

    fn normalized(mut self) -> Self {
        self.node_limit = self.node_limit.clamp(MIN_NODE_LIMIT, MAX_NODE_LIMIT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_local_services() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.conduit_url, "http://localhost:3001");
        assert_eq!(cfg.neo4j_user, "neo4j");
        assert_eq!(cfg.node_limit, 100);
        assert_eq!(cfg.default_layout, "Force-directed");
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn toml_overrides_and_clamps() {
        let cfg = DashboardConfig::from_toml_str(
            "conduit_url = \"http://tools:9000\"\nnode_limit = 5000\n",
        )
        .unwrap();
        assert_eq!(cfg.conduit_url, "http://tools:9000");
        assert_eq!(cfg.node_limit, MAX_NODE_LIMIT);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = DashboardConfig::from_toml_str("node_limit = \"many\"").unwrap_err();
        assert!(matches!(err, VizError::Config { .. }));
    }

    #[test]
    fn env_overrides_non_empty_values() {
        let env: HashMap<&str, &str> = [
            ("NEO4J_URI", "http://graph:7474"),
            ("NEO4J_PASSWORD", ""),
            ("CONDUIT_URL", "http://conduit:3001"),
        ]
        .into_iter()
        .collect();
        let cfg = DashboardConfig::default().with_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.neo4j_uri, "http://graph:7474");
        assert_eq!(cfg.neo4j_password, "password");
        assert_eq!(cfg.conduit_url, "http://conduit:3001");
    }

    #[test]
    fn from_file_reads_toml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "default_layout = \"Hierarchical\"").unwrap();
        let cfg = DashboardConfig::from_file(f.path()).unwrap();
        assert_eq!(cfg.default_layout, "Hierarchical");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/kgdash.toml")).unwrap_err();
        assert!(matches!(err, VizError::Config { .. }));
    }

    #[test]
    fn node_limit_setter_clamps_low() {
        assert_eq!(DashboardConfig::new().node_limit(1).node_limit, MIN_NODE_LIMIT);
    }
}

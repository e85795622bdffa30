//! Tool-execution service client.
//!
//! Every public call is best-effort: failures are logged under
//! `kgdash::conduit` and folded into a JSON fallback shaped like a normal
//! response, so callers can render the result either way. The `try_*`
//! methods expose the underlying [`VizResult`] when a caller needs to tell
//! the two apart.

use std::time::Duration;

use kgdash_core::{DashboardConfig, VizError, VizResult};
use serde_json::{json, Value};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Category used by the cloud-memory helpers when none is given.
pub const DEFAULT_MEMORY_CATEGORY: &str = "dashboard";

/// Fortune text when the service answers without one.
pub const NO_FORTUNE: &str = "No fortune available";

/// Fortune text when the service cannot be reached.
pub const FORTUNE_UNAVAILABLE: &str = "Fortune service unavailable";

/// Blocking client for the tool-execution service.
#[derive(Debug, Clone)]
pub struct ConduitClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ConduitClient {
    /// Client for `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Client with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client from dashboard configuration.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::with_timeout(
            &config.conduit_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Service base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Service endpoints
    // =========================================================================

    /// `GET /health`.
    pub fn health_check(&self) -> Value {
        self.try_get("/health")
            .unwrap_or_else(|e| fallback("health", &e, json!({ "status": "unhealthy" })))
    }

    /// Whether `/health` reports `status: healthy`.
    pub fn is_healthy(&self) -> bool {
        self.health_check().get("status").and_then(Value::as_str) == Some("healthy")
    }

    /// `GET /fortune`, reduced to the fortune text.
    pub fn fortune(&self) -> String {
        match self.try_get("/fortune") {
            Ok(v) => v
                .get("fortune")
                .and_then(Value::as_str)
                .unwrap_or(NO_FORTUNE)
                .to_string(),
            Err(e) => {
                tracing::warn!(target: "kgdash::conduit", error = %e, "fortune request failed");
                FORTUNE_UNAVAILABLE.to_string()
            }
        }
    }

    /// `GET /tools`.
    pub fn available_tools(&self) -> Value {
        self.try_get("/tools").unwrap_or_else(|e| {
            fallback("tools", &e, json!({ "mcp": {}, "plugins": [] }))
        })
    }

    /// `POST /execute/{server}/{tool}` with a JSON payload.
    pub fn execute_tool(&self, server: &str, tool: &str, payload: &Value) -> Value {
        self.try_execute_tool(server, tool, payload)
            .unwrap_or_else(|e| failed("execute", &e))
    }

    /// [`ConduitClient::execute_tool`] without the fallback.
    pub fn try_execute_tool(&self, server: &str, tool: &str, payload: &Value) -> VizResult<Value> {
        validate_segment("server", server)?;
        validate_segment("tool", tool)?;
        self.try_post(&format!("/execute/{}/{}", server, tool), payload)
    }

    /// `POST /planning-boost`.
    pub fn planning_boost(&self, task: &str) -> Value {
        self.try_post("/planning-boost", &json!({ "task": task }))
            .unwrap_or_else(|e| failed("planning-boost", &e))
    }

    /// `POST /profile/{name}` with an optional configuration object.
    pub fn load_profile(&self, name: &str, config: Option<&Value>) -> Value {
        let result = validate_segment("profile", name).and_then(|_| {
            let empty = json!({});
            self.try_post(&format!("/profile/{}", name), config.unwrap_or(&empty))
        });
        result.unwrap_or_else(|e| failed("profile", &e))
    }

    /// `GET /profiles`.
    pub fn profiles(&self) -> Value {
        self.try_get("/profiles")
            .unwrap_or_else(|e| fallback("profiles", &e, json!({ "profiles": [] })))
    }

    // =========================================================================
    // Tool shortcuts
    // =========================================================================

    /// Ask the task planner for a detailed plan.
    pub fn task_planning(&self, task: &str) -> Value {
        self.execute_tool(
            "taskmaster-ai",
            "plan_task",
            &json!({ "task": task, "methodology": "FLOW", "detailed": true }),
        )
    }

    /// Search the codebase; `pattern` defaults to `*`.
    pub fn search_codebase(&self, query: &str, pattern: Option<&str>) -> Value {
        self.execute_tool(
            "filesystem",
            "search",
            &json!({ "query": query, "pattern": pattern.unwrap_or("*") }),
        )
    }

    /// Run a detailed research pass on a topic.
    pub fn scout_research(&self, topic: &str) -> Value {
        self.execute_tool("scout", "research", &json!({ "topic": topic, "depth": "detailed" }))
    }

    /// Store a value under `{category}/{key}` with the current time.
    pub fn save_to_cloud_memory(&self, key: &str, value: Value, category: Option<&str>) -> Value {
        let payload = json!({
            "key": memory_key(key, category),
            "value": value,
            "timestamp": chrono::Local::now().to_rfc3339(),
        });
        self.execute_tool("cloud-memory", "store", &payload)
    }

    /// Fetch the value stored under `{category}/{key}`.
    pub fn get_from_cloud_memory(&self, key: &str, category: Option<&str>) -> Value {
        self.execute_tool(
            "cloud-memory",
            "retrieve",
            &json!({ "key": memory_key(key, category) }),
        )
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// `GET {base}{path}` decoded as JSON.
    pub fn try_get(&self, path: &str) -> VizResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(target: "kgdash::conduit", %url, "GET");
        finish(self.agent.get(&url).set("Accept", "application/json").call())
    }

    /// `POST {base}{path}` with a JSON body, decoded as JSON.
    pub fn try_post(&self, path: &str, body: &Value) -> VizResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(target: "kgdash::conduit", %url, "POST");
        finish(
            self.agent
                .post(&url)
                .set("Accept", "application/json")
                .set("Content-Type", "application/json")
                .send_string(&body.to_string()),
        )
    }
}

fn finish(result: Result<ureq::Response, ureq::Error>) -> VizResult<Value> {
    match result {
        Ok(resp) => {
            let raw = resp
                .into_string()
                .map_err(|e| VizError::transport(format!("failed reading response: {}", e)))?;
            Ok(serde_json::from_str(&raw)?)
        }
        Err(ureq::Error::Status(status, resp)) => Err(VizError::Http {
            status,
            body: resp.into_string().unwrap_or_default(),
        }),
        Err(ureq::Error::Transport(e)) => Err(VizError::transport(e.to_string())),
    }
}

/// `{category}/{key}`, category defaulting to `dashboard`.
pub fn memory_key(key: &str, category: Option<&str>) -> String {
    format!("{}/{}", category.unwrap_or(DEFAULT_MEMORY_CATEGORY), key)
}

/// Reject names that would change the request path.
fn validate_segment(what: &str, name: &str) -> VizResult<()> {
    if name.is_empty() {
        return Err(VizError::invalid_input(format!("{} name must not be empty", what)));
    }
    if name
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(VizError::invalid_input(format!(
            "{} name {:?} contains reserved characters",
            what, name
        )));
    }
    Ok(())
}

fn fallback(call: &str, err: &VizError, mut base: Value) -> Value {
    tracing::warn!(target: "kgdash::conduit", error = %err, call, "request failed");
    if let Value::Object(map) = &mut base {
        map.insert("error".to_string(), Value::String(err.to_string()));
    }
    base
}

fn failed(call: &str, err: &VizError) -> Value {
    fallback(call, err, json!({ "status": "failed" }))
}

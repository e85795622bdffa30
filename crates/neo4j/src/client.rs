//! Blocking HTTP client for the transactional commit endpoint.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use kgdash_core::{DashboardConfig, GraphQuery, Query, Row, VizError, VizResult};
use serde_json::json;

use crate::decode::decode_response;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`GraphQuery`] backed by Neo4j's HTTP API.
///
/// Every call is one auto-committed transaction:
/// `POST {uri}/db/{database}/tx/commit`.
#[derive(Debug, Clone)]
pub struct HttpGraph {
    agent: ureq::Agent,
    endpoint: String,
    authorization: Option<String>,
}

impl HttpGraph {
    /// Client for `uri` (e.g. `http://localhost:7474`) and `database`.
    pub fn new(uri: &str, database: &str) -> Self {
        Self::with_timeout(uri, database, DEFAULT_TIMEOUT)
    }

    /// Client with an explicit request timeout.
    pub fn with_timeout(uri: &str, database: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: format!("{}/db/{}/tx/commit", uri.trim_end_matches('/'), database),
            authorization: None,
        }
    }

    /// Client from dashboard configuration, credentials included.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::with_timeout(
            &config.neo4j_uri,
            &config.neo4j_database,
            Duration::from_secs(config.request_timeout_secs),
        )
        .basic_auth(&config.neo4j_user, &config.neo4j_password)
    }

    /// Send HTTP basic credentials with every request.
    pub fn basic_auth(mut self, user: &str, password: &str) -> Self {
        let token = STANDARD.encode(format!("{}:{}", user, password));
        self.authorization = Some(format!("Basic {}", token));
        self
    }

    /// The commit URL requests go to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, body: &serde_json::Value) -> VizResult<String> {
        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/json;charset=UTF-8")
            .set("Content-Type", "application/json");
        if let Some(auth) = &self.authorization {
            request = request.set("Authorization", auth);
        }

        match request.send_string(&body.to_string()) {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| VizError::transport(format!("failed reading response: {}", e))),
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(VizError::Http { status, body })
            }
            Err(ureq::Error::Transport(e)) => Err(VizError::transport(e.to_string())),
        }
    }
}

impl GraphQuery for HttpGraph {
    fn execute(&self, query: &Query) -> VizResult<Vec<Row>> {
        let body = json!({
            "statements": [{
                "statement": query.text,
                "parameters": query.params,
            }]
        });
        tracing::debug!(target: "kgdash::neo4j", endpoint = %self.endpoint, params = query.params.len(), "running statement");
        let raw = self.post(&body)?;
        let rows = decode_response(&raw)?;
        tracing::debug!(target: "kgdash::neo4j", rows = rows.len(), "statement finished");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve one canned response; the handle yields the raw request.
    fn stub_server(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).unwrap();
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            head + &String::from_utf8(payload).unwrap()
        });
        (url, handle)
    }

    #[test]
    fn endpoint_joins_uri_and_database() {
        let g = HttpGraph::new("http://localhost:7474/", "neo4j");
        assert_eq!(g.endpoint(), "http://localhost:7474/db/neo4j/tx/commit");
    }

    #[test]
    fn posts_statement_with_parameters_and_auth() {
        let (url, server) = stub_server(
            200,
            r#"{"results":[{"columns":["type"],"data":[{"row":["Agent"]}]}],"errors":[]}"#,
        );
        let graph = HttpGraph::new(&url, "neo4j").basic_auth("neo4j", "secret");
        let rows = graph
            .execute(&Query::new("MATCH (n) WHERE $t IN labels(n) RETURN 1").param("t", "Agent"))
            .unwrap();
        assert_eq!(rows[0].str_field("type"), Some("Agent"));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /db/neo4j/tx/commit"));
        // base64("neo4j:secret")
        assert!(request.contains("Basic bmVvNGo6c2VjcmV0"));
        assert!(request.contains(r#""parameters":{"t":"Agent"}"#));
    }

    #[test]
    fn status_errors_keep_code_and_body() {
        let (url, server) = stub_server(401, r#"{"errors":[]}"#);
        let err = HttpGraph::new(&url, "neo4j")
            .execute(&Query::new("RETURN 1"))
            .unwrap_err();
        server.join().unwrap();
        assert_eq!(
            err,
            VizError::Http {
                status: 401,
                body: r#"{"errors":[]}"#.to_string()
            }
        );
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let err = HttpGraph::with_timeout(
            &format!("http://127.0.0.1:{}", port),
            "neo4j",
            Duration::from_secs(2),
        )
        .execute(&Query::new("RETURN 1"))
        .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn from_config_uses_configured_database() {
        let cfg = DashboardConfig::new().neo4j_uri("http://db.internal:7474");
        let g = HttpGraph::from_config(&cfg);
        assert_eq!(g.endpoint(), "http://db.internal:7474/db/neo4j/tx/commit");
        assert!(g.authorization.is_some());
    }
}

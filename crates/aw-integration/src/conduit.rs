//! Conduit directory queries
//!
//! The wrapped tool already knows how to authenticate against the review
//! server, so the wrapper never speaks HTTP itself. It shells out to the
//! tool's `call-conduit` subcommand, feeding JSON parameters on stdin and
//! reading the response envelope from stdout.

use aw_core::directory::{DirectoryRecord, DirectorySource};
use aw_core::error::{ArcWrapError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Conduit method that lists every account
pub const USER_QUERY_METHOD: &str = "user.query";

/// Client for the wrapped tool's conduit bridge
pub struct ConduitClient {
    program: String,
}

/// Response wrapper every conduit call comes back in
#[derive(Debug, Deserialize)]
struct ConduitEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "errorMessage")]
    error_message: Option<String>,
    #[serde(default)]
    response: Value,
}

/// One account as `user.query` reports it
#[derive(Debug, Deserialize)]
struct ConduitUser {
    #[serde(rename = "userName")]
    user_name: String,
    #[serde(default, rename = "realName")]
    real_name: String,
    #[serde(default)]
    roles: Vec<String>,
}

impl ConduitClient {
    /// Create a client that calls conduit through `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Call a conduit method and return the unwrapped response
    pub fn call(&self, method: &str, params: &Value) -> Result<Value> {
        debug!("Calling conduit method {} via {}", method, self.program);

        let mut child = Command::new(&self.program)
            .arg("call-conduit")
            .arg(method)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                query_error(method, format!("could not run '{}': {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(params.to_string().as_bytes()) {
                // Clean up the spawned child before surfacing the error.
                let _ = child.kill();
                let _ = child.wait();
                return Err(query_error(
                    method,
                    format!("could not send parameters: {}", e),
                ));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| query_error(method, format!("could not collect output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(query_error(
                method,
                format!("'{}' exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        unwrap_envelope(method, &output.stdout)
    }
}

impl DirectorySource for ConduitClient {
    fn query_users(&self) -> Result<Vec<DirectoryRecord>> {
        let response = self.call(USER_QUERY_METHOD, &serde_json::json!({}))?;
        records_from_response(response)
    }
}

/// Parse the response envelope and surface conduit-level errors
fn unwrap_envelope(method: &str, stdout: &[u8]) -> Result<Value> {
    let envelope: ConduitEnvelope = serde_json::from_slice(stdout)
        .map_err(|e| query_error(method, format!("unparseable response: {}", e)))?;

    if let Some(code) = envelope.error {
        let message = envelope.error_message.unwrap_or_default();
        return Err(query_error(method, format!("{}: {}", code, message)));
    }

    Ok(envelope.response)
}

fn records_from_response(response: Value) -> Result<Vec<DirectoryRecord>> {
    let users: Vec<ConduitUser> = serde_json::from_value(response).map_err(|e| {
        query_error(USER_QUERY_METHOD, format!("unexpected response shape: {}", e))
    })?;

    Ok(users
        .into_iter()
        .map(|u| DirectoryRecord::new(u.user_name, u.real_name, u.roles))
        .collect())
}

fn query_error(method: &str, message: String) -> ArcWrapError {
    ArcWrapError::DirectoryQuery {
        method: method.to_string(),
        message,
    }
}

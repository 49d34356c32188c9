use log::error;
use serde_json::json;

use crate::error::ServiceError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    ok_status(id, 200, result)
}

pub fn ok_status(id: &str, status: u16, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "status": status,
        "result": result
    })
}

pub fn err(
    id: &str,
    status: u16,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "status": status,
        "error": error,
    })
}

/// Builds the error envelope for a service failure. Internal detail goes to
/// the log only.
pub fn service_err(id: &str, e: &ServiceError) -> serde_json::Value {
    if e.is_internal() {
        error!("request {} failed: {}", id, e);
    }
    err(id, e.status(), e.code(), e.public_message(), None)
}

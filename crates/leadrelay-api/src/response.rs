/// Response envelopes shared by all webhook endpoints
use serde::Serialize;
use serde_json::{Value, json};

/// `{"success": true, "data": ...}`
pub fn success<T: Serialize>(data: T) -> Value {
    json!({
        "success": true,
        "data": data,
    })
}

/// `{"success": false, "error": {"message", "status", "details"?}}`
pub fn error_body(message: &str, status: u16, details: Option<Value>) -> Value {
    let mut error = json!({
        "message": message,
        "status": status,
    });
    if let Some(details) = details {
        error["details"] = details;
    }

    json!({
        "success": false,
        "error": error,
    })
}

//! Wire types for the REST backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

use inventory_core::Role;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Error body as produced by the backend: `{"detail": ...}` where detail is
/// either a message or a list of field errors.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Best human-readable message from an error response body
pub fn extract_detail(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.trim().to_string();
    };

    match parsed.detail {
        Value::String(message) => message,
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                Value::Array(items).to_string()
            } else {
                messages.join("; ")
            }
        }
        other => other.to_string(),
    }
}

//! Health check

use axum::Json;
use serde_json::{json, Value};

pub async fn check() -> Json<Value> {
    Json(json!({
        "status": "serving",
        "version": hdkey_ur::VERSION,
    }))
}

use axum::response::Json;
use serde_json::{Value, json};

pub async fn root() -> &'static str {
    "Server is running."
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

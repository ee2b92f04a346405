use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Request-level failures surfaced to HTTP clients and the CLI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Missing or invalid \"mode\" parameter. Expected: \"creative\", \"offer\", or \"hook\"")]
    MissingMode,
    #[error("Unknown mode: \"{0}\". Valid modes: creative, offer, hook, full")]
    UnknownMode(String),
    #[error("Mode \"{mode}\" requires \"{field}\" array")]
    MissingArray {
        mode: &'static str,
        field: &'static str,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "ok": false, "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

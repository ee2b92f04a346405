use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{AnalysisResult, Mode, SenseiEngine};
use crate::error::ApiError;
use crate::record::RawRecord;

pub const SERVICE_NAME: &str = "Sensei AI Engine";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Body of `POST /api/sensei/analyze`. Fields stay loosely typed so that
/// shape problems surface as the service's own 400 messages.
#[derive(Debug, Default, Deserialize)]
pub struct ApiAnalyzeRequest {
    pub mode: Option<Value>,
    pub creatives: Option<Value>,
    pub campaigns: Option<Value>,
}

impl ApiAnalyzeRequest {
    pub fn mode(&self) -> Result<Mode, ApiError> {
        match self.mode.as_ref() {
            Some(Value::String(mode)) => mode.parse(),
            _ => Err(ApiError::MissingMode),
        }
    }

    pub fn creatives(&self) -> Option<Vec<RawRecord>> {
        records(self.creatives.as_ref())
    }

    pub fn campaigns(&self) -> Option<Vec<RawRecord>> {
        records(self.campaigns.as_ref())
    }
}

fn records(value: Option<&Value>) -> Option<Vec<RawRecord>> {
    let items = value?.as_array()?;
    Some(items.iter().cloned().map(RawRecord::from_value).collect())
}

#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub source: &'static str,
    pub timestamp: String,
}

pub fn analyze(
    engine: &SenseiEngine,
    request: &ApiAnalyzeRequest,
) -> Result<ApiAnalyzeResponse, ApiError> {
    let mode = request.mode()?;
    let creatives = request.creatives();
    let campaigns = request.campaigns();
    let result = engine.run(mode, creatives.as_deref(), campaigns.as_deref())?;

    Ok(ApiAnalyzeResponse {
        result,
        source: "live",
        timestamp: timestamp(),
    })
}

#[derive(Debug, Serialize)]
pub struct ApiHealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub modes: Vec<&'static str>,
    pub status: &'static str,
    pub timestamp: String,
}

impl ApiHealthResponse {
    pub fn operational() -> Self {
        Self {
            ok: true,
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            modes: Mode::ALL.iter().map(|mode| mode.label()).collect(),
            status: "operational",
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiBanner {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

impl ApiBanner {
    pub fn new() -> Self {
        Self {
            status: "ok",
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            message: "Backend running; analysis endpoints under /api/sensei.",
            timestamp: timestamp(),
        }
    }
}

impl Default for ApiBanner {
    fn default() -> Self {
        Self::new()
    }
}

pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

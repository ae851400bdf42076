//! Request and response bodies for the REST API.

use opord_core::{FormFields, OpordDocument};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Non-fatal message returned alongside a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Advisory {
    pub level: AdvisoryLevel,
    pub message: String,
}

impl Advisory {
    pub fn new(level: AdvisoryLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubordinateUnitRes {
    pub name: String,
    pub form_key: String,
}

/// Defaults for a blank form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormDefaultsRes {
    pub default_dtg: String,
    pub classification: String,
    pub time_zone: String,
    pub unit_name: String,
    pub unit_short: String,
    pub unit_type: String,
    pub higher_hq: String,
    pub subordinate_units: Vec<SubordinateUnitRes>,
    pub ai_enabled: bool,
    pub slides_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateReq {
    /// Flat form mapping; unknown keys are ignored.
    #[schema(value_type = Object)]
    #[serde(default)]
    pub fields: FormFields,
    #[serde(default)]
    pub use_ai: bool,
    #[serde(default)]
    pub model: Option<String>,
    /// Reuse an existing session instead of starting a new one.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateRes {
    pub session_id: String,
    pub text: String,
    #[schema(value_type = Object)]
    pub document: OpordDocument,
    pub advisories: Vec<Advisory>,
    pub slides_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportReq {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Exported,
    NotConfigured,
    Failed,
    NothingToExport,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportRes {
    pub status: ExportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub advisories: Vec<Advisory>,
}

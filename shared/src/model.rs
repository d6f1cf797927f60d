use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::ApiConfig;
use crate::dashboard::DashboardState;
use crate::history::HistoryState;
use crate::upload::UploadWorkflow;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generation counter for one upload session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Upload,
    History,
    Dashboard,
    About,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatientField {
    Name,
    Age,
    Doctor,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub doctor: String,
}

impl PatientInfo {
    pub fn set(&mut self, field: PatientField, value: String) {
        match field {
            PatientField::Name => self.name = value,
            PatientField::Age => self.age = value,
            PatientField::Doctor => self.doctor = value,
        }
    }
}

/// A file picked by the user, as handed over by the shell.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        if self.mime_type.trim().is_empty() {
            FALLBACK_MIME
        } else {
            self.mime_type.trim()
        }
    }

    /// Displayable form of the file for the preview pane.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type(), STANDARD.encode(&self.bytes))
    }
}

// Image bytes stay out of logs.
impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub prediction: String,
    pub confidence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: RecordId,
    pub patient_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    pub doctor: String,
    pub date: String,
    pub prediction: String,
    pub confidence: String,
    pub image_path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub average_confidence: f64,
    #[serde(default)]
    pub condition_distribution: BTreeMap<String, f64>,
}

/// Whatever the email endpoint answered with. Only the status matters.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct EmailConfirmation(pub serde_json::Value);

impl EmailConfirmation {
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(serde_json::Value::as_str)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrintableReport {
    pub pdf_url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailReportRequest {
    pub record_id: RecordId,
    pub email: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Monotonic source for report-action and fetch tokens.
#[derive(Debug, Default, Clone)]
pub struct TokenSource(u64);

impl TokenSource {
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: ApiConfig,
    pub config_warning: Option<String>,
    pub active_tab: Tab,
    pub upload: UploadWorkflow,
    pub history: HistoryState,
    pub dashboard: DashboardState,
    pub tokens: TokenSource,
}

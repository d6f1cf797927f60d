//! Typed access to the diagnosis backend.
//!
//! Every call is one round trip through the `Http` capability. The callback
//! always receives an [`AppResult`]: non-2xx answers become
//! [`ErrorKind::Backend`](crate::error::ErrorKind::Backend) errors carrying the
//! body's `error` field, transport failures become `Network` errors.
//!
//! crux_http reports 4xx and 5xx answers as `Error::Http` with the raw body
//! attached, so those go through the same decoding as completed responses.

use crux_http::{Http, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::event::Event;
use crate::model::{
    DiagnosisResult, EmailConfirmation, EmailReportRequest, PatientInfo, PatientRecord,
    PrintableReport, RecordId, Statistics, UploadFile,
};

const CONTENT_TYPE: &str = "Content-Type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Predict,
    History,
    HistoryRecord(RecordId),
    Statistics,
    EmailReport,
    GeneratePdf(RecordId),
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Predict => "/predict".into(),
            Self::History => "/history".into(),
            Self::HistoryRecord(id) => format!("/history/{id}"),
            Self::Statistics => "/statistics".into(),
            Self::EmailReport => "/email-report".into(),
            Self::GeneratePdf(id) => format!("/generate-pdf/{id}"),
        }
    }

    /// Message used when a failed response carries no readable `error` field.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Predict => "Failed to process image",
            Self::History => "Failed to fetch patient history",
            Self::HistoryRecord(_) => "Failed to fetch patient record",
            Self::Statistics => "Failed to fetch statistics",
            Self::EmailReport => "Failed to send email",
            Self::GeneratePdf(_) => "Failed to generate PDF",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Predict => "predict",
            Self::History => "history",
            Self::HistoryRecord(_) => "history_record",
            Self::Statistics => "statistics",
            Self::EmailReport => "email_report",
            Self::GeneratePdf(_) => "generate_pdf",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Turns a completed response into the endpoint's typed result.
pub fn decode_response<T: DeserializeOwned>(
    endpoint: Endpoint,
    status: u16,
    body: &[u8],
) -> AppResult<T> {
    if (200..300).contains(&status) {
        // An empty 2xx body reads as JSON `null`.
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            b"null".as_slice()
        } else {
            body
        };
        return serde_json::from_slice(body).map_err(|e| {
            warn!(endpoint = endpoint.name(), status, error = %e, "unreadable response body");
            AppError::decode(format!("{}: {e}", endpoint.fallback_message()))
        });
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| endpoint.fallback_message().to_string());

    warn!(endpoint = endpoint.name(), status, %message, "backend rejected request");
    Err(AppError::backend(status, message))
}

fn into_result<T: DeserializeOwned>(
    endpoint: Endpoint,
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> AppResult<T> {
    match result {
        Ok(response) => {
            let status = u16::from(response.status());
            let body = response.body().map(Vec::as_slice).unwrap_or(&[]);
            decode_response(endpoint, status, body)
        }
        Err(crux_http::Error::Http(e))
            if e.code.is_client_error() || e.code.is_server_error() =>
        {
            decode_response(endpoint, u16::from(e.code), e.body.as_deref().unwrap_or(&[]))
        }
        Err(e) => {
            warn!(endpoint = endpoint.name(), error = %e, "request did not complete");
            Err(AppError::network(e.to_string()))
        }
    }
}

fn dispatch<T, F>(builder: RequestBuilder<Event>, endpoint: Endpoint, callback: F)
where
    T: DeserializeOwned,
    F: FnOnce(AppResult<T>) -> Event + Send + 'static,
{
    debug!(endpoint = endpoint.name(), path = %endpoint.path(), "sending request");
    builder.send(move |result| callback(into_result(endpoint, result)));
}

/// Minimal `multipart/form-data` encoder for the predict upload.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(format!("----RetinaCareBoundary{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part(&format!("Content-Disposition: form-data; name=\"{}\"", escape(name)));
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, file: &UploadFile) -> Self {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}",
            escape(name),
            escape(&file.name),
            file.content_type()
        ));
        self.body.extend_from_slice(&file.bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }

    fn open_part(&mut self, headers: &str) {
        self.body
            .extend_from_slice(format!("--{}\r\n{headers}\r\n\r\n", self.boundary).as_bytes());
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}

/// Builds the predict upload: the image plus the three patient text fields.
#[must_use]
pub fn predict_form(file: &UploadFile, patient: &PatientInfo) -> MultipartForm {
    MultipartForm::new()
        .file("file", file)
        .text("patientName", &patient.name)
        .text("patientAge", &patient.age)
        .text("doctor", &patient.doctor)
}

pub struct ApiClient<'a> {
    http: &'a Http<Event>,
    config: &'a ApiConfig,
}

impl<'a> ApiClient<'a> {
    #[must_use]
    pub fn new(http: &'a Http<Event>, config: &'a ApiConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        self.config.endpoint(&endpoint.path())
    }

    pub fn upload_image<F>(&self, file: &UploadFile, patient: &PatientInfo, callback: F)
    where
        F: FnOnce(AppResult<DiagnosisResult>) -> Event + Send + 'static,
    {
        let form = predict_form(file, patient);
        let content_type = form.content_type();
        let builder = self
            .http
            .post(self.url(Endpoint::Predict))
            .body_bytes(form.finish())
            .header(CONTENT_TYPE, content_type.as_str());
        dispatch(builder, Endpoint::Predict, callback);
    }

    pub fn get_patient_history<F>(&self, callback: F)
    where
        F: FnOnce(AppResult<Vec<PatientRecord>>) -> Event + Send + 'static,
    {
        let builder = self.http.get(self.url(Endpoint::History));
        dispatch(builder, Endpoint::History, callback);
    }

    pub fn get_patient_record<F>(&self, id: RecordId, callback: F)
    where
        F: FnOnce(AppResult<PatientRecord>) -> Event + Send + 'static,
    {
        let endpoint = Endpoint::HistoryRecord(id);
        dispatch(self.http.get(self.url(endpoint)), endpoint, callback);
    }

    pub fn get_statistics<F>(&self, callback: F)
    where
        F: FnOnce(AppResult<Statistics>) -> Event + Send + 'static,
    {
        let builder = self.http.get(self.url(Endpoint::Statistics));
        dispatch(builder, Endpoint::Statistics, callback);
    }

    /// The address is expected to be validated by the caller.
    ///
    /// # Errors
    ///
    /// A `Validation` error when the request body cannot be encoded. No
    /// request went out and the callback will never run.
    pub fn send_report_email<F>(
        &self,
        record_id: RecordId,
        email: &str,
        callback: F,
    ) -> AppResult<()>
    where
        F: FnOnce(AppResult<EmailConfirmation>) -> Event + Send + 'static,
    {
        let request = EmailReportRequest {
            record_id,
            email: email.to_string(),
        };
        let builder = self
            .http
            .post(self.url(Endpoint::EmailReport))
            .body_json(&request)
            .map_err(|e| {
                warn!(error = %e, "email request could not be encoded");
                AppError::validation(format!("{}: {e}", Endpoint::EmailReport.fallback_message()))
            })?;
        dispatch(builder, Endpoint::EmailReport, callback);
        Ok(())
    }

    pub fn generate_printable_report<F>(&self, record_id: RecordId, callback: F)
    where
        F: FnOnce(AppResult<PrintableReport>) -> Event + Send + 'static,
    {
        let endpoint = Endpoint::GeneratePdf(record_id);
        dispatch(self.http.get(self.url(endpoint)), endpoint, callback);
    }
}

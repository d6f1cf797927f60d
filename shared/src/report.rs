//! Email and PDF follow-ups for a persisted record.
//!
//! Each action has its own track: one call in flight at most, and its own
//! status line. Success statuses are cleared by a delayed expiry event that
//! carries the token of the call which produced them.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::model::{EmailConfirmation, PrintableReport, RecordId};

pub const STATUS_CLEAR_DELAY_MS: u64 = 3_000;
pub const DEFAULT_PATIENT_NAME: &str = "Patient";
pub const PDF_OPENED_MESSAGE: &str = "PDF generated successfully! Opening in a new tab...";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

lazy_static! {
    // Same grammar browsers apply to <input type="email">.
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("email pattern is valid");
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub kind: StatusKind,
    pub message: String,
    token: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionTrack {
    in_flight: Option<u64>,
    status: Option<ActionStatus>,
}

impl ActionTrack {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub const fn status(&self) -> Option<&ActionStatus> {
        self.status.as_ref()
    }

    fn begin(&mut self, token: u64) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(token);
        self.status = None;
        true
    }

    fn finish(&mut self, token: u64) -> bool {
        if self.in_flight != Some(token) {
            return false;
        }
        self.in_flight = None;
        true
    }

    fn set(&mut self, kind: StatusKind, message: impl Into<String>, token: u64) {
        self.status = Some(ActionStatus {
            kind,
            message: message.into(),
            token,
        });
    }

    fn expire(&mut self, token: u64) -> bool {
        match &self.status {
            Some(s) if s.kind == StatusKind::Success && s.token == token => {
                self.status = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailRejection {
    /// Nothing typed; the send control is disabled.
    Empty,
    Invalid,
    AlreadySending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailRequest {
    pub record_id: RecordId,
    pub email: String,
    pub token: u64,
}

/// Outcome of applying a response to a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The response belongs to a call this track no longer waits for.
    Ignored,
    Failed,
    /// The status should expire after [`STATUS_CLEAR_DELAY_MS`].
    Succeeded { expire_token: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportActions {
    record_id: RecordId,
    patient_name: String,
    email: String,
    email_form_open: bool,
    email_track: ActionTrack,
    print_track: ActionTrack,
}

impl ReportActions {
    #[must_use]
    pub fn new(record_id: RecordId, patient_name: &str) -> Self {
        let patient_name = if patient_name.trim().is_empty() {
            DEFAULT_PATIENT_NAME.to_string()
        } else {
            patient_name.trim().to_string()
        };

        Self {
            record_id,
            patient_name,
            email: String::new(),
            email_form_open: false,
            email_track: ActionTrack::default(),
            print_track: ActionTrack::default(),
        }
    }

    #[must_use]
    pub const fn record_id(&self) -> RecordId {
        self.record_id
    }

    #[must_use]
    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub const fn is_email_form_open(&self) -> bool {
        self.email_form_open
    }

    #[must_use]
    pub const fn email_track(&self) -> &ActionTrack {
        &self.email_track
    }

    #[must_use]
    pub const fn print_track(&self) -> &ActionTrack {
        &self.print_track
    }

    #[must_use]
    pub fn can_send_email(&self) -> bool {
        !self.email.trim().is_empty() && !self.email_track.is_pending()
    }

    pub fn toggle_email_form(&mut self) {
        self.email_form_open = !self.email_form_open;
    }

    pub fn set_email(&mut self, value: String) {
        self.email = value;
    }

    pub fn begin_email(&mut self, token: u64) -> Result<EmailRequest, EmailRejection> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(EmailRejection::Empty);
        }
        if self.email_track.is_pending() {
            return Err(EmailRejection::AlreadySending);
        }
        if !is_valid_email(&email) {
            self.email_track
                .set(StatusKind::Error, INVALID_EMAIL_MESSAGE, token);
            return Err(EmailRejection::Invalid);
        }

        self.email_track.begin(token);
        Ok(EmailRequest {
            record_id: self.record_id,
            email,
            token,
        })
    }

    pub fn finish_email(
        &mut self,
        token: u64,
        email: &str,
        result: &AppResult<EmailConfirmation>,
    ) -> ActionOutcome {
        if !self.email_track.finish(token) {
            return ActionOutcome::Ignored;
        }

        match result {
            Ok(_) => {
                let message = format!(
                    "Report for {} sent successfully to {email}!",
                    self.patient_name
                );
                self.email_track.set(StatusKind::Success, message, token);
                self.email.clear();
                ActionOutcome::Succeeded {
                    expire_token: token,
                }
            }
            Err(e) => {
                self.email_track
                    .set(StatusKind::Error, e.user_facing_message(), token);
                ActionOutcome::Failed
            }
        }
    }

    /// Clears the confirmation and collapses the form, unless a newer status
    /// has replaced it.
    pub fn expire_email_status(&mut self, token: u64) -> bool {
        if self.email_track.expire(token) {
            self.email_form_open = false;
            true
        } else {
            false
        }
    }

    pub fn begin_print(&mut self, token: u64) -> Option<RecordId> {
        self.print_track.begin(token).then_some(self.record_id)
    }

    /// Returns the outcome and, on success, the URL to open.
    pub fn finish_print(
        &mut self,
        token: u64,
        result: AppResult<PrintableReport>,
    ) -> (ActionOutcome, Option<String>) {
        if !self.print_track.finish(token) {
            return (ActionOutcome::Ignored, None);
        }

        match result {
            Ok(report) => {
                self.print_track
                    .set(StatusKind::Success, PDF_OPENED_MESSAGE, token);
                (
                    ActionOutcome::Succeeded {
                        expire_token: token,
                    },
                    Some(report.pdf_url),
                )
            }
            Err(e) => {
                self.print_track
                    .set(StatusKind::Error, e.user_facing_message(), token);
                (ActionOutcome::Failed, None)
            }
        }
    }

    pub fn expire_print_status(&mut self, token: u64) -> bool {
        self.print_track.expire(token)
    }
}

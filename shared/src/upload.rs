//! The upload-and-diagnose session.
//!
//! One [`UploadWorkflow`] value holds everything the upload screen needs. A
//! file pick starts a new [`SessionId`]; a response is only applied while its
//! session is still current.

use crate::error::AppResult;
use crate::model::{DiagnosisResult, PatientField, PatientInfo, SessionId, UploadFile};
use crate::report::ReportActions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnosis {
    pub result: DiagnosisResult,
    /// Patient details as they were when the scan was submitted.
    pub patient: PatientInfo,
    /// Present only when the backend persisted the record.
    pub report: Option<ReportActions>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    FileSelected,
    Submitting {
        patient: PatientInfo,
    },
    Succeeded(Box<Diagnosis>),
    Failed {
        message: String,
    },
}

/// What the caller needs to issue the upload request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub session: SessionId,
    pub file: UploadFile,
    pub patient: PatientInfo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

#[derive(Debug, Default)]
pub struct UploadWorkflow {
    session: SessionId,
    patient: PatientInfo,
    file: Option<UploadFile>,
    preview: Option<String>,
    phase: Phase,
}

impl UploadWorkflow {
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    #[must_use]
    pub const fn patient(&self) -> &PatientInfo {
        &self.patient
    }

    #[must_use]
    pub const fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_submitting()
    }

    #[must_use]
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match &self.phase {
            Phase::Succeeded(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn report_mut(&mut self) -> Option<&mut ReportActions> {
        match &mut self.phase {
            Phase::Succeeded(d) => d.report.as_mut(),
            _ => None,
        }
    }

    pub fn update_patient(&mut self, field: PatientField, value: String) {
        self.patient.set(field, value);
    }

    /// Replaces the current file. Whatever was shown for the previous file is
    /// dropped before the new preview exists.
    pub fn select_file(&mut self, file: UploadFile) {
        self.session = self.session.next();
        self.phase = Phase::FileSelected;
        self.preview = Some(file.data_url());
        self.file = Some(file);
    }

    pub fn submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let file = self.file.clone()?;
        let patient = self.patient.clone();

        self.phase = Phase::Submitting {
            patient: patient.clone(),
        };

        Some(Submission {
            session: self.session,
            file,
            patient,
        })
    }

    pub fn complete(&mut self, session: SessionId, result: AppResult<DiagnosisResult>) -> Applied {
        // Nothing in flight for this session: keep whatever is shown.
        if session != self.session || !self.is_submitting() {
            return Applied::Stale;
        }
        let Phase::Submitting { patient } = std::mem::take(&mut self.phase) else {
            return Applied::Stale;
        };

        self.phase = match result {
            Ok(result) => {
                let report = result
                    .id
                    .map(|id| ReportActions::new(id, &patient.name));
                Phase::Succeeded(Box::new(Diagnosis {
                    result,
                    patient,
                    report,
                }))
            }
            Err(e) => Phase::Failed {
                message: e.user_facing_message(),
            },
        };
        Applied::Current
    }
}

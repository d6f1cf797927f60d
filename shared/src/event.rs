use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::model::{
    DiagnosisResult, EmailConfirmation, PatientField, PatientRecord, PrintableReport, RecordId,
    SessionId, Statistics, Tab, UploadFile,
};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum Event {
    Noop,

    // --- Shell ---
    Configure { base_url: String },
    TabSelected(Tab),

    // --- Upload ---
    PatientFieldChanged { field: PatientField, value: String },
    FileSelected { file: UploadFile },
    SubmitRequested,

    // --- Report actions ---
    EmailFormToggled,
    EmailChanged { value: String },
    SendEmailRequested,
    PrintReportRequested,

    // --- History / dashboard ---
    HistoryRequested,
    RecordSelected { id: RecordId },
    RecordRequested { id: RecordId },
    DashboardRequested,

    // --- Internal: capability responses and timers ---
    #[serde(skip)]
    DiagnosisReceived {
        session: SessionId,
        result: AppResult<DiagnosisResult>,
    },
    #[serde(skip)]
    EmailReportSent {
        token: u64,
        email: String,
        result: AppResult<EmailConfirmation>,
    },
    #[serde(skip)]
    EmailStatusExpired { token: u64 },
    #[serde(skip)]
    PrintableReportReceived {
        token: u64,
        result: AppResult<PrintableReport>,
    },
    #[serde(skip)]
    PrintStatusExpired { token: u64 },
    #[serde(skip)]
    HistoryReceived {
        generation: u64,
        result: AppResult<Vec<PatientRecord>>,
    },
    #[serde(skip)]
    RecordReceived {
        generation: u64,
        result: AppResult<PatientRecord>,
    },
    #[serde(skip)]
    DashboardStatisticsReceived {
        generation: u64,
        result: AppResult<Statistics>,
    },
    #[serde(skip)]
    DashboardHistoryReceived {
        generation: u64,
        result: AppResult<Vec<PatientRecord>>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Configure { .. } => "configure",
            Self::TabSelected(_) => "tab_selected",
            Self::PatientFieldChanged { .. } => "patient_field_changed",
            Self::FileSelected { .. } => "file_selected",
            Self::SubmitRequested => "submit_requested",
            Self::EmailFormToggled => "email_form_toggled",
            Self::EmailChanged { .. } => "email_changed",
            Self::SendEmailRequested => "send_email_requested",
            Self::PrintReportRequested => "print_report_requested",
            Self::HistoryRequested => "history_requested",
            Self::RecordSelected { .. } => "record_selected",
            Self::RecordRequested { .. } => "record_requested",
            Self::DashboardRequested => "dashboard_requested",
            Self::DiagnosisReceived { .. } => "diagnosis_received",
            Self::EmailReportSent { .. } => "email_report_sent",
            Self::EmailStatusExpired { .. } => "email_status_expired",
            Self::PrintableReportReceived { .. } => "printable_report_received",
            Self::PrintStatusExpired { .. } => "print_status_expired",
            Self::HistoryReceived { .. } => "history_received",
            Self::RecordReceived { .. } => "record_received",
            Self::DashboardStatisticsReceived { .. } => "dashboard_statistics_received",
            Self::DashboardHistoryReceived { .. } => "dashboard_history_received",
        }
    }

    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::TabSelected(_)
                | Self::PatientFieldChanged { .. }
                | Self::FileSelected { .. }
                | Self::SubmitRequested
                | Self::EmailFormToggled
                | Self::EmailChanged { .. }
                | Self::SendEmailRequested
                | Self::PrintReportRequested
                | Self::HistoryRequested
                | Self::RecordSelected { .. }
                | Self::RecordRequested { .. }
                | Self::DashboardRequested
        )
    }
}

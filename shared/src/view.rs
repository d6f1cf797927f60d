use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::dashboard::{DashboardData, DashboardPhase};
use crate::history::{display_date, DetailState, HistoryState, ListState};
use crate::model::{Model, PatientInfo, PatientRecord, RecordId, Tab};
use crate::presenter::{present, Condition, ResultCard};
use crate::report::{ActionStatus, ActionTrack, ReportActions, StatusKind};
use crate::upload::{Phase, UploadWorkflow};

pub const SUBMIT_LABEL: &str = "Analyze Image";
pub const SUBMITTING_LABEL: &str = "Analyzing...";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub active_tab: Tab,
    pub config_warning: Option<String>,
    pub upload: UploadView,
    pub history: HistoryView,
    pub dashboard: DashboardView,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadView {
    pub patient: PatientInfo,
    pub file_name: Option<String>,
    pub preview_url: Option<String>,
    pub can_submit: bool,
    pub is_submitting: bool,
    pub submit_label: String,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResultView {
    pub card: ResultCard,
    pub patient: PatientInfo,
    pub original_image_url: Option<String>,
    pub processed_image_url: Option<String>,
    pub report: Option<ReportView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusView {
    pub kind: StatusKind,
    pub message: String,
}

impl From<&ActionStatus> for StatusView {
    fn from(s: &ActionStatus) -> Self {
        Self {
            kind: s.kind,
            message: s.message.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionView {
    pub is_pending: bool,
    pub status: Option<StatusView>,
}

impl From<&ActionTrack> for ActionView {
    fn from(t: &ActionTrack) -> Self {
        Self {
            is_pending: t.is_pending(),
            status: t.status().map(StatusView::from),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportView {
    pub record_id: RecordId,
    pub email_form_open: bool,
    pub email: String,
    pub can_send_email: bool,
    pub email_action: ActionView,
    pub print_action: ActionView,
}

impl From<&ReportActions> for ReportView {
    fn from(r: &ReportActions) -> Self {
        Self {
            record_id: r.record_id(),
            email_form_open: r.is_email_form_open(),
            email: r.email().to_string(),
            can_send_email: r.can_send_email(),
            email_action: ActionView::from(r.email_track()),
            print_action: ActionView::from(r.print_track()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRow {
    pub id: RecordId,
    pub patient_name: String,
    pub date: String,
    pub age: String,
    pub doctor: String,
    pub prediction: String,
    pub badge_class: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordDetailView {
    pub id: RecordId,
    pub patient_name: String,
    pub age: String,
    pub doctor: String,
    pub date: String,
    pub prediction: String,
    pub confidence: String,
    pub badge_class: String,
    pub original_image_url: String,
    pub processed_image_url: String,
}

impl RecordDetailView {
    fn new(record: &PatientRecord, config: &ApiConfig) -> Self {
        Self {
            id: record.id,
            patient_name: record.patient_name.clone(),
            age: record.age.clone(),
            doctor: record.doctor.clone(),
            date: display_date(&record.date),
            prediction: record.prediction.clone(),
            confidence: record.confidence.clone(),
            badge_class: badge_for(&record.prediction),
            original_image_url: config.asset_url(&record.image_path),
            processed_image_url: config.processed_asset_url(&record.image_path),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryListView {
    NotLoaded,
    Loading,
    Failed { message: String },
    Ready { rows: Vec<HistoryRow> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordDetailState {
    Empty,
    Loading { id: RecordId },
    Failed { id: RecordId, message: String },
    Ready { record: RecordDetailView },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryView {
    pub list: HistoryListView,
    pub detail: RecordDetailState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DistributionBar {
    pub condition: String,
    pub percentage: f64,
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecentScanRow {
    pub id: RecordId,
    pub patient_name: String,
    pub date: String,
    pub prediction: String,
    pub confidence: String,
    pub badge_class: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardView {
    NotLoaded,
    Loading,
    Failed {
        message: String,
    },
    Ready {
        total_scans: u64,
        average_confidence: String,
        conditions_detected: usize,
        distribution: Vec<DistributionBar>,
        recent_scans: Vec<RecentScanRow>,
    },
}

fn badge_for(prediction: &str) -> String {
    Condition::from_label(prediction)
        .tone()
        .badge_class()
        .to_string()
}

fn upload_view(upload: &UploadWorkflow, config: &ApiConfig) -> UploadView {
    let result = upload.diagnosis().map(|d| ResultView {
        card: present(&d.result),
        patient: d.patient.clone(),
        original_image_url: d.result.image_path.as_deref().map(|p| config.asset_url(p)),
        processed_image_url: d
            .result
            .image_path
            .as_deref()
            .map(|p| config.processed_asset_url(p)),
        report: d.report.as_ref().map(ReportView::from),
    });

    let is_submitting = upload.is_submitting();
    UploadView {
        patient: upload.patient().clone(),
        file_name: upload.file().map(|f| f.name.clone()),
        preview_url: upload.preview().map(str::to_string),
        can_submit: upload.can_submit(),
        is_submitting,
        submit_label: if is_submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
        .to_string(),
        error: match upload.phase() {
            Phase::Failed { message } => Some(message.clone()),
            _ => None,
        },
        result,
    }
}

fn history_view(history: &HistoryState, config: &ApiConfig) -> HistoryView {
    let selected = history.selected_id();
    let list = match history.list() {
        ListState::NotLoaded => HistoryListView::NotLoaded,
        ListState::Loading => HistoryListView::Loading,
        ListState::Failed(message) => HistoryListView::Failed {
            message: message.clone(),
        },
        ListState::Ready(records) => HistoryListView::Ready {
            rows: records
                .iter()
                .map(|r| HistoryRow {
                    id: r.id,
                    patient_name: r.patient_name.clone(),
                    date: display_date(&r.date),
                    age: r.age.clone(),
                    doctor: r.doctor.clone(),
                    prediction: r.prediction.clone(),
                    badge_class: badge_for(&r.prediction),
                    selected: selected == Some(r.id),
                })
                .collect(),
        },
    };

    let detail = match history.detail() {
        DetailState::Empty => RecordDetailState::Empty,
        DetailState::Loading(id) => RecordDetailState::Loading { id: *id },
        DetailState::Failed { id, message } => RecordDetailState::Failed {
            id: *id,
            message: message.clone(),
        },
        DetailState::Ready(record) => RecordDetailState::Ready {
            record: RecordDetailView::new(record, config),
        },
    };

    HistoryView { list, detail }
}

fn dashboard_ready(data: &DashboardData) -> DashboardView {
    let stats = &data.statistics;
    DashboardView::Ready {
        total_scans: stats.total_scans,
        average_confidence: format!("{:.2}", stats.average_confidence),
        conditions_detected: stats.condition_distribution.len(),
        distribution: stats
            .condition_distribution
            .iter()
            .map(|(condition, pct)| DistributionBar {
                condition: condition.clone(),
                percentage: *pct,
                label: format!("{pct:.1}%"),
                color: Condition::from_label(condition).tone().hex().to_string(),
            })
            .collect(),
        recent_scans: data
            .recent
            .iter()
            .map(|r| RecentScanRow {
                id: r.id,
                patient_name: r.patient_name.clone(),
                date: display_date(&r.date),
                prediction: r.prediction.clone(),
                confidence: r.confidence.clone(),
                badge_class: badge_for(&r.prediction),
            })
            .collect(),
    }
}

#[must_use]
pub fn build_view(model: &Model) -> ViewModel {
    let dashboard = match model.dashboard.phase() {
        DashboardPhase::NotLoaded => DashboardView::NotLoaded,
        DashboardPhase::Loading => DashboardView::Loading,
        DashboardPhase::Failed(message) => DashboardView::Failed {
            message: message.clone(),
        },
        DashboardPhase::Ready(data) => dashboard_ready(data),
    };

    ViewModel {
        active_tab: model.active_tab,
        config_warning: model.config_warning.clone(),
        upload: upload_view(&model.upload, &model.config),
        history: history_view(&model.history, &model.config),
        dashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiagnosisResult, PatientField, Statistics, UploadFile};
    use assert_matches::assert_matches;

    #[test]
    fn empty_model_renders_idle_upload_screen() {
        let view = build_view(&Model::default());
        assert_eq!(view.active_tab, Tab::Upload);
        assert!(!view.upload.can_submit);
        assert_eq!(view.upload.submit_label, SUBMIT_LABEL);
        assert!(view.upload.result.is_none());
        assert_eq!(view.history.list, HistoryListView::NotLoaded);
        assert_eq!(view.dashboard, DashboardView::NotLoaded);
    }

    #[test]
    fn submitting_shows_progress_label() {
        let mut model = Model::default();
        model.upload.select_file(UploadFile::new("eye.jpg", "image/jpeg", vec![9]));
        model.upload.submit();

        let view = build_view(&model);
        assert!(view.upload.is_submitting);
        assert!(!view.upload.can_submit);
        assert_eq!(view.upload.submit_label, SUBMITTING_LABEL);
    }

    #[test]
    fn result_view_links_both_images() {
        let mut model = Model::default();
        model.upload.update_patient(PatientField::Name, "Ada".into());
        model.upload.select_file(UploadFile::new("eye.jpg", "image/jpeg", vec![9]));
        let sub = model.upload.submit().unwrap();
        model.upload.complete(
            sub.session,
            Ok(DiagnosisResult {
                id: Some(RecordId(3)),
                prediction: "AMD".into(),
                confidence: "93.40%".into(),
                image_path: Some("static/uploads/3_eye.jpg".into()),
            }),
        );

        let result = build_view(&model).upload.result.unwrap();
        assert_eq!(result.card.severity.as_deref(), Some("High severity"));
        assert_eq!(
            result.processed_image_url.as_deref(),
            Some("http://localhost:5000/static/processed/3_eye.jpg")
        );
        let report = result.report.unwrap();
        assert_eq!(report.record_id, RecordId(3));
        assert!(!report.email_form_open);
        assert!(!report.can_send_email);
    }

    #[test]
    fn dashboard_numbers_are_formatted() {
        let mut model = Model::default();
        let gen = model.dashboard.begin_load();
        model.dashboard.statistics_received(
            gen,
            Ok(Statistics {
                total_scans: 3,
                average_confidence: 84.4567,
                condition_distribution: [
                    ("Glaucoma".to_string(), 33.333),
                    ("Normal".to_string(), 66.667),
                ]
                .into_iter()
                .collect(),
            }),
        );
        model.dashboard.history_received(gen, Ok(vec![]));

        assert_matches!(
            build_view(&model).dashboard,
            DashboardView::Ready { average_confidence, conditions_detected: 2, distribution, .. } => {
                assert_eq!(average_confidence, "84.46");
                assert_eq!(distribution[0].label, "33.3%");
                assert_eq!(distribution[0].color, "#F59E0B");
                assert_eq!(distribution[1].color, "#10B981");
            }
        );
    }
}

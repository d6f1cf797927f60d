use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AppResult;
use crate::model::{PatientRecord, RecordId};

const DISPLAY_DATE: &str = "%Y-%m-%d";

/// Best-effort parse of a backend record date. The backend writes plain
/// `YYYY-MM-DD`; older rows may carry a full timestamp.
#[must_use]
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, DISPLAY_DATE)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Unparseable dates are shown as sent.
#[must_use]
pub fn display_date(raw: &str) -> String {
    parse_record_date(raw).map_or_else(
        || raw.to_string(),
        |dt| dt.format(DISPLAY_DATE).to_string(),
    )
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    NotLoaded,
    Loading,
    Ready(Vec<PatientRecord>),
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Empty,
    Loading(RecordId),
    Ready(PatientRecord),
    Failed { id: RecordId, message: String },
}

#[derive(Debug, Default)]
pub struct HistoryState {
    generation: u64,
    detail_generation: u64,
    list: ListState,
    detail: DetailState,
}

impl HistoryState {
    #[must_use]
    pub const fn list(&self) -> &ListState {
        &self.list
    }

    #[must_use]
    pub const fn detail(&self) -> &DetailState {
        &self.detail
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<RecordId> {
        match &self.detail {
            DetailState::Empty => None,
            DetailState::Loading(id) | DetailState::Failed { id, .. } => Some(*id),
            DetailState::Ready(record) => Some(record.id),
        }
    }

    /// Starts a list fetch. Earlier fetches still in flight become stale.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.list = ListState::Loading;
        self.generation
    }

    pub fn finish_load(&mut self, generation: u64, result: AppResult<Vec<PatientRecord>>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.list = match result {
            Ok(records) => ListState::Ready(records),
            Err(e) => ListState::Failed(e.user_facing_message()),
        };
        true
    }

    /// Shows a row that is already in the loaded list.
    pub fn select(&mut self, id: RecordId) -> bool {
        let ListState::Ready(records) = &self.list else {
            return false;
        };
        match records.iter().find(|r| r.id == id) {
            Some(record) => {
                // Outstanding by-id lookups no longer apply.
                self.detail_generation += 1;
                self.detail = DetailState::Ready(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn begin_record(&mut self, id: RecordId) -> u64 {
        self.detail_generation += 1;
        self.detail = DetailState::Loading(id);
        self.detail_generation
    }

    pub fn finish_record(&mut self, generation: u64, result: AppResult<PatientRecord>) -> bool {
        if generation != self.detail_generation {
            return false;
        }
        let DetailState::Loading(id) = self.detail else {
            return false;
        };
        self.detail = match result {
            Ok(record) => DetailState::Ready(record),
            Err(e) => DetailState::Failed {
                id,
                message: e.user_facing_message(),
            },
        };
        true
    }
}

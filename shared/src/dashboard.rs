//! Aggregate statistics plus the most recent scans.
//!
//! Both fetches are issued together and joined here. The first failure wins:
//! the view goes to its error state and whatever arrived is discarded.

use std::cmp::Reverse;

use crate::error::AppResult;
use crate::history::parse_record_date;
use crate::model::{PatientRecord, Statistics};

pub const RECENT_SCAN_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardData {
    pub statistics: Statistics,
    pub recent: Vec<PatientRecord>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DashboardPhase {
    #[default]
    NotLoaded,
    Loading,
    Ready(DashboardData),
    Failed(String),
}

#[derive(Debug, Default)]
struct Partial {
    statistics: Option<Statistics>,
    history: Option<Vec<PatientRecord>>,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    generation: u64,
    partial: Partial,
    phase: DashboardPhase,
}

/// Newest first; rows whose date cannot be read go last in their original order.
#[must_use]
pub fn recent_scans(mut history: Vec<PatientRecord>, limit: usize) -> Vec<PatientRecord> {
    history.sort_by_key(|r| Reverse(parse_record_date(&r.date)));
    history.truncate(limit);
    history
}

impl DashboardState {
    #[must_use]
    pub const fn phase(&self) -> &DashboardPhase {
        &self.phase
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.partial = Partial::default();
        self.phase = DashboardPhase::Loading;
        self.generation
    }

    pub fn statistics_received(&mut self, generation: u64, result: AppResult<Statistics>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        match result {
            Ok(stats) => self.partial.statistics = Some(stats),
            Err(e) => return self.fail(&e.user_facing_message()),
        }
        self.try_join();
        true
    }

    pub fn history_received(
        &mut self,
        generation: u64,
        result: AppResult<Vec<PatientRecord>>,
    ) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        match result {
            Ok(rows) => self.partial.history = Some(rows),
            Err(e) => return self.fail(&e.user_facing_message()),
        }
        self.try_join();
        true
    }

    fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.phase == DashboardPhase::Loading
    }

    fn fail(&mut self, message: &str) -> bool {
        self.partial = Partial::default();
        self.phase = DashboardPhase::Failed(message.to_string());
        true
    }

    fn try_join(&mut self) {
        if self.partial.statistics.is_none() || self.partial.history.is_none() {
            return;
        }
        let partial = std::mem::take(&mut self.partial);
        if let (Some(statistics), Some(history)) = (partial.statistics, partial.history) {
            self.phase = DashboardPhase::Ready(DashboardData {
                statistics,
                recent: recent_scans(history, RECENT_SCAN_LIMIT),
            });
        }
    }
}

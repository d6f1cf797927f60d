// lib.rs - RetinaCare shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod app;
pub mod capabilities;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod history;
pub mod model;
pub mod presenter;
pub mod report;
pub mod upload;
pub mod view;

pub use app::App;
pub use capabilities::{BrowserOperation, Capabilities, DelayOperation, Effect};
pub use config::ApiConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, AppResult, ConfigError, ErrorKind};
pub use event::Event;
pub use model::{
    DiagnosisResult, Model, PatientField, PatientInfo, PatientRecord, RecordId, SessionId,
    Statistics, Tab, UploadFile,
};
pub use view::ViewModel;

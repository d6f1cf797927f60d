use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::capabilities::Capabilities;
use crate::config::ApiConfig;
use crate::error::AppError;
use crate::event::Event;
use crate::model::{Model, Tab};
use crate::report::{ActionOutcome, STATUS_CLEAR_DELAY_MS};
use crate::upload::Applied;
use crate::view::{build_view, ViewModel};

#[derive(Default)]
pub struct App;

impl App {
    fn load_history(model: &mut Model, caps: &Capabilities) {
        let generation = model.history.begin_load();
        ApiClient::new(caps.http(), &model.config).get_patient_history(move |result| {
            Event::HistoryReceived { generation, result }
        });
    }

    fn load_dashboard(model: &mut Model, caps: &Capabilities) {
        let generation = model.dashboard.begin_load();
        let api = ApiClient::new(caps.http(), &model.config);
        api.get_statistics(move |result| Event::DashboardStatisticsReceived { generation, result });
        api.get_patient_history(move |result| Event::DashboardHistoryReceived { generation, result });
    }

    fn stale(event_name: &str) {
        debug!(event = event_name, "dropping stale response");
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[allow(clippy::too_many_lines)]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        debug!(event = event_name, user = event.is_user_initiated(), "update");

        match event {
            Event::Noop => {}

            Event::Configure { base_url } => {
                match ApiConfig::new(&base_url) {
                    Ok(config) => {
                        info!(base_url = %config.base_url, "api configured");
                        model.config = config;
                        model.config_warning = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "rejected api base url");
                        model.config_warning = Some(AppError::from(e).user_facing_message());
                    }
                }
                caps.render().render();
            }

            Event::TabSelected(tab) => {
                model.active_tab = tab;
                match tab {
                    Tab::History => Self::load_history(model, caps),
                    Tab::Dashboard => Self::load_dashboard(model, caps),
                    Tab::Upload | Tab::About => {}
                }
                caps.render().render();
            }

            // --- Upload ---
            Event::PatientFieldChanged { field, value } => {
                model.upload.update_patient(field, value);
                caps.render().render();
            }

            Event::FileSelected { file } => {
                debug!(name = %file.name, size = file.bytes.len(), "file selected");
                model.upload.select_file(file);
                caps.render().render();
            }

            Event::SubmitRequested => {
                let Some(submission) = model.upload.submit() else {
                    debug!("submit ignored: no file or already submitting");
                    return;
                };
                let session = submission.session;
                ApiClient::new(caps.http(), &model.config).upload_image(
                    &submission.file,
                    &submission.patient,
                    move |result| Event::DiagnosisReceived { session, result },
                );
                caps.render().render();
            }

            Event::DiagnosisReceived { session, result } => {
                if let Err(e) = &result {
                    warn!(error = %e, session = session.0, "diagnosis failed");
                }
                match model.upload.complete(session, result) {
                    Applied::Current => caps.render().render(),
                    Applied::Stale => Self::stale(event_name),
                }
            }

            // --- Report actions ---
            Event::EmailFormToggled => {
                if let Some(report) = model.upload.report_mut() {
                    report.toggle_email_form();
                    caps.render().render();
                }
            }

            Event::EmailChanged { value } => {
                if let Some(report) = model.upload.report_mut() {
                    report.set_email(value);
                    caps.render().render();
                }
            }

            Event::SendEmailRequested => {
                let token = model.tokens.next();
                let Some(report) = model.upload.report_mut() else {
                    debug!("email requested without a persisted record");
                    return;
                };
                match report.begin_email(token) {
                    Ok(request) => {
                        let email = request.email.clone();
                        let sent = ApiClient::new(caps.http(), &model.config).send_report_email(
                            request.record_id,
                            &request.email,
                            move |result| Event::EmailReportSent {
                                token,
                                email,
                                result,
                            },
                        );
                        if let Err(e) = sent {
                            warn!(error = %e, "email report not sent");
                            report.finish_email(token, &request.email, &Err(e));
                        }
                    }
                    Err(rejection) => debug!(?rejection, "email not sent"),
                }
                caps.render().render();
            }

            Event::EmailReportSent {
                token,
                email,
                result,
            } => {
                let Some(report) = model.upload.report_mut() else {
                    return Self::stale(event_name);
                };
                match report.finish_email(token, &email, &result) {
                    ActionOutcome::Succeeded { expire_token } => {
                        caps.delay().start(
                            STATUS_CLEAR_DELAY_MS,
                            Event::EmailStatusExpired {
                                token: expire_token,
                            },
                        );
                        caps.render().render();
                    }
                    ActionOutcome::Failed => {
                        if let Err(e) = &result {
                            warn!(error = %e, "email report failed");
                        }
                        caps.render().render();
                    }
                    ActionOutcome::Ignored => Self::stale(event_name),
                }
            }

            Event::EmailStatusExpired { token } => {
                if let Some(report) = model.upload.report_mut() {
                    if report.expire_email_status(token) {
                        caps.render().render();
                    }
                }
            }

            Event::PrintReportRequested => {
                let token = model.tokens.next();
                let Some(report) = model.upload.report_mut() else {
                    debug!("print requested without a persisted record");
                    return;
                };
                let Some(record_id) = report.begin_print(token) else {
                    debug!("print already in progress");
                    return;
                };
                ApiClient::new(caps.http(), &model.config)
                    .generate_printable_report(record_id, move |result| {
                        Event::PrintableReportReceived { token, result }
                    });
                caps.render().render();
            }

            Event::PrintableReportReceived { token, result } => {
                let Some(report) = model.upload.report_mut() else {
                    return Self::stale(event_name);
                };
                if let Err(e) = &result {
                    warn!(error = %e, "printable report failed");
                }
                let (outcome, pdf_url) = report.finish_print(token, result);
                if let Some(url) = pdf_url {
                    caps.browser().open_in_new_tab(url);
                }
                match outcome {
                    ActionOutcome::Succeeded { expire_token } => {
                        caps.delay().start(
                            STATUS_CLEAR_DELAY_MS,
                            Event::PrintStatusExpired {
                                token: expire_token,
                            },
                        );
                        caps.render().render();
                    }
                    ActionOutcome::Failed => caps.render().render(),
                    ActionOutcome::Ignored => Self::stale(event_name),
                }
            }

            Event::PrintStatusExpired { token } => {
                if let Some(report) = model.upload.report_mut() {
                    if report.expire_print_status(token) {
                        caps.render().render();
                    }
                }
            }

            // --- History ---
            Event::HistoryRequested => {
                Self::load_history(model, caps);
                caps.render().render();
            }

            Event::HistoryReceived { generation, result } => {
                if let Err(e) = &result {
                    warn!(error = %e, "history fetch failed");
                }
                if model.history.finish_load(generation, result) {
                    caps.render().render();
                } else {
                    Self::stale(event_name);
                }
            }

            Event::RecordSelected { id } => {
                if model.history.select(id) {
                    caps.render().render();
                } else {
                    debug!(%id, "selected record is not in the loaded list");
                }
            }

            Event::RecordRequested { id } => {
                let generation = model.history.begin_record(id);
                ApiClient::new(caps.http(), &model.config)
                    .get_patient_record(id, move |result| Event::RecordReceived { generation, result });
                caps.render().render();
            }

            Event::RecordReceived { generation, result } => {
                if let Err(e) = &result {
                    warn!(error = %e, "record fetch failed");
                }
                if model.history.finish_record(generation, result) {
                    caps.render().render();
                } else {
                    Self::stale(event_name);
                }
            }

            // --- Dashboard ---
            Event::DashboardRequested => {
                Self::load_dashboard(model, caps);
                caps.render().render();
            }

            Event::DashboardStatisticsReceived { generation, result } => {
                if let Err(e) = &result {
                    warn!(error = %e, "statistics fetch failed");
                }
                if model.dashboard.statistics_received(generation, result) {
                    caps.render().render();
                } else {
                    Self::stale(event_name);
                }
            }

            Event::DashboardHistoryReceived { generation, result } => {
                if let Err(e) = &result {
                    warn!(error = %e, "dashboard history fetch failed");
                }
                if model.dashboard.history_received(generation, result) {
                    caps.render().render();
                } else {
                    Self::stale(event_name);
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        build_view(model)
    }
}

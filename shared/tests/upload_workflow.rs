mod common;

use assert_matches::assert_matches;
use crux_core::testing::AppTester;
use retinacare_shared::{
    App, AppError, Effect, Event, Model, PatientField, SessionId, Tab,
};

use common::{diagnosed, diagnosis, http_requests, renders, scan};

#[test]
fn submit_without_file_does_nothing() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(update.effects.is_empty());
    assert_eq!(model.upload.session(), SessionId(0));
    assert!(!app.view(&model).upload.is_submitting);
}

#[test]
fn submit_posts_multipart_to_predict() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::PatientFieldChanged {
            field: PatientField::Name,
            value: "Ada".into(),
        },
        &mut model,
    );
    app.update(Event::FileSelected { file: scan("eye.png") }, &mut model);
    let update = app.update(Event::SubmitRequested, &mut model);

    let requests = http_requests(&update.effects);
    assert_eq!(
        requests,
        vec![("POST".to_string(), "http://localhost:5000/predict".to_string())]
    );
    assert!(renders(&update.effects));

    let view = app.view(&model);
    assert!(view.upload.is_submitting);
    assert!(!view.upload.can_submit);

    // Still in flight: a second click is swallowed.
    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(http_requests(&update.effects).is_empty());
}

#[test]
fn glaucoma_result_is_presented() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    diagnosed(&app, &mut model, diagnosis(Some(12), "Glaucoma", "82%"));

    let result = app.view(&model).upload.result.expect("result shown");
    assert_eq!(result.card.severity.as_deref(), Some("Moderate severity"));
    assert!(result.card.advisory.to_lowercase().contains("glaucoma"));
    assert_eq!(
        result.original_image_url.as_deref(),
        Some("http://localhost:5000/static/uploads/abc_eye.png")
    );
    assert!(result.report.is_some());
}

#[test]
fn unknown_prediction_renders_defaults() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    diagnosed(&app, &mut model, diagnosis(None, "Unknown", "n/a"));

    let result = app.view(&model).upload.result.expect("result shown");
    assert_eq!(result.card.badge_class, "bg-gray-100 text-gray-800 border-gray-200");
    assert_eq!(result.card.severity.as_deref(), Some("Very mild severity"));
    assert!(result.report.is_none());
}

#[test]
fn picking_a_new_file_clears_old_result() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    diagnosed(&app, &mut model, diagnosis(Some(1), "Normal", "97%"));
    assert!(app.view(&model).upload.result.is_some());

    app.update(Event::FileSelected { file: scan("second.png") }, &mut model);

    let view = app.view(&model);
    assert!(view.upload.result.is_none());
    assert!(view.upload.error.is_none());
    assert_eq!(view.upload.file_name.as_deref(), Some("second.png"));
    assert!(view.upload.preview_url.unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn failure_is_shown_and_file_kept() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::FileSelected { file: scan("eye.png") }, &mut model);
    app.update(Event::SubmitRequested, &mut model);
    let session = model.upload.session();
    let update = app.update(
        Event::DiagnosisReceived {
            session,
            result: Err(AppError::backend(400, "Invalid file type")),
        },
        &mut model,
    );

    assert!(renders(&update.effects));
    let view = app.view(&model);
    assert_eq!(view.upload.error.as_deref(), Some("Invalid file type"));
    assert!(view.upload.can_submit);
    assert_eq!(view.upload.file_name.as_deref(), Some("eye.png"));
}

#[test]
fn late_response_for_replaced_file_is_dropped() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::FileSelected { file: scan("a.png") }, &mut model);
    app.update(Event::SubmitRequested, &mut model);
    let stale = model.upload.session();

    app.update(Event::FileSelected { file: scan("b.png") }, &mut model);
    let update = app.update(
        Event::DiagnosisReceived {
            session: stale,
            result: Ok(diagnosis(Some(1), "Cataract", "70%")),
        },
        &mut model,
    );

    assert!(!renders(&update.effects));
    assert!(app.view(&model).upload.result.is_none());
}

#[test]
fn patient_edits_after_submit_do_not_touch_result() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::PatientFieldChanged {
            field: PatientField::Name,
            value: "Ada".into(),
        },
        &mut model,
    );
    diagnosed(&app, &mut model, diagnosis(Some(3), "AMD", "91%"));
    app.update(
        Event::PatientFieldChanged {
            field: PatientField::Name,
            value: "Bo".into(),
        },
        &mut model,
    );

    let view = app.view(&model);
    assert_eq!(view.upload.patient.name, "Bo");
    assert_eq!(view.upload.result.unwrap().patient.name, "Ada");
}

#[test]
fn entering_history_tab_fetches_records() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::TabSelected(Tab::History), &mut model);
    assert_eq!(
        http_requests(&update.effects),
        vec![("GET".to_string(), "http://localhost:5000/history".to_string())]
    );
    assert_eq!(app.view(&model).active_tab, Tab::History);

    let update = app.update(Event::TabSelected(Tab::About), &mut model);
    assert!(http_requests(&update.effects).is_empty());
}

#[test]
fn configure_switches_backend_or_warns() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::Configure {
            base_url: "https://retina.example.org/".into(),
        },
        &mut model,
    );
    let update = app.update(Event::HistoryRequested, &mut model);
    assert_eq!(
        http_requests(&update.effects)[0].1,
        "https://retina.example.org/history"
    );

    app.update(
        Event::Configure {
            base_url: "ftp://nope".into(),
        },
        &mut model,
    );
    assert!(app.view(&model).config_warning.is_some());
    assert_eq!(model.config.base_url.as_str(), "https://retina.example.org");
}

#[test]
fn history_by_id_uses_record_endpoint() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::RecordRequested {
            id: retinacare_shared::RecordId(42),
        },
        &mut model,
    );
    assert_eq!(
        http_requests(&update.effects),
        vec![("GET".to_string(), "http://localhost:5000/history/42".to_string())]
    );
    assert_matches!(
        app.view(&model).history.detail,
        retinacare_shared::view::RecordDetailState::Loading { .. }
    );
}

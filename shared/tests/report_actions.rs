mod common;

use crux_core::testing::AppTester;
use retinacare_shared::report::StatusKind;
use retinacare_shared::{App, AppError, BrowserOperation, Effect, Event, Model};

use common::{delays, diagnosed, diagnosis, http_requests};

fn with_record() -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    diagnosed(&app, &mut model, diagnosis(Some(7), "Cataract", "76.5%"));
    (app, model)
}

#[test]
fn empty_email_makes_no_call() {
    let (app, mut model) = with_record();

    app.update(Event::EmailFormToggled, &mut model);
    let update = app.update(Event::SendEmailRequested, &mut model);

    assert!(http_requests(&update.effects).is_empty());
    let report = app.view(&model).upload.result.unwrap().report.unwrap();
    assert!(report.email_form_open);
    assert!(!report.can_send_email);
    assert!(report.email_action.status.is_none());
}

#[test]
fn malformed_email_is_reported_inline() {
    let (app, mut model) = with_record();

    app.update(Event::EmailChanged { value: "dr.kim@".into() }, &mut model);
    let update = app.update(Event::SendEmailRequested, &mut model);

    assert!(http_requests(&update.effects).is_empty());
    let status = app
        .view(&model)
        .upload
        .result
        .unwrap()
        .report
        .unwrap()
        .email_action
        .status
        .unwrap();
    assert_eq!(status.kind, StatusKind::Error);
}

#[test]
fn email_success_clears_after_delay() {
    let (app, mut model) = with_record();

    app.update(Event::EmailFormToggled, &mut model);
    app.update(
        Event::EmailChanged {
            value: "dr.kim@clinic.org".into(),
        },
        &mut model,
    );
    let update = app.update(Event::SendEmailRequested, &mut model);
    assert_eq!(
        http_requests(&update.effects),
        vec![(
            "POST".to_string(),
            "http://localhost:5000/email-report".to_string()
        )]
    );

    // First token handed out in this model.
    let token = 1;
    let update = app.update(
        Event::EmailReportSent {
            token,
            email: "dr.kim@clinic.org".into(),
            result: Ok(Default::default()),
        },
        &mut model,
    );
    assert_eq!(delays(&update.effects), vec![3_000]);

    let report = app.view(&model).upload.result.unwrap().report.unwrap();
    let status = report.email_action.status.unwrap();
    assert_eq!(status.kind, StatusKind::Success);
    assert_eq!(
        status.message,
        "Report for Patient sent successfully to dr.kim@clinic.org!"
    );
    assert_eq!(report.email, "");

    app.update(Event::EmailStatusExpired { token }, &mut model);
    let report = app.view(&model).upload.result.unwrap().report.unwrap();
    assert!(report.email_action.status.is_none());
    assert!(!report.email_form_open);
}

#[test]
fn pdf_failure_leaves_email_status_untouched() {
    let (app, mut model) = with_record();

    app.update(
        Event::EmailChanged {
            value: "dr.kim@clinic.org".into(),
        },
        &mut model,
    );
    app.update(Event::SendEmailRequested, &mut model);
    app.update(
        Event::EmailReportSent {
            token: 1,
            email: "dr.kim@clinic.org".into(),
            result: Ok(Default::default()),
        },
        &mut model,
    );

    let update = app.update(Event::PrintReportRequested, &mut model);
    assert_eq!(
        http_requests(&update.effects),
        vec![(
            "GET".to_string(),
            "http://localhost:5000/generate-pdf/7".to_string()
        )]
    );

    let update = app.update(
        Event::PrintableReportReceived {
            token: 2,
            result: Err(AppError::backend(500, "Failed to generate PDF")),
        },
        &mut model,
    );
    assert!(delays(&update.effects).is_empty());

    let report = app.view(&model).upload.result.unwrap().report.unwrap();
    assert_eq!(
        report.email_action.status.unwrap().kind,
        StatusKind::Success
    );
    let print = report.print_action.status.unwrap();
    assert_eq!(print.kind, StatusKind::Error);
    assert_eq!(print.message, "Failed to generate PDF");
}

#[test]
fn pdf_success_opens_new_tab() {
    let (app, mut model) = with_record();

    app.update(Event::PrintReportRequested, &mut model);
    let update = app.update(
        Event::PrintableReportReceived {
            token: 1,
            result: Ok(retinacare_shared::model::PrintableReport {
                pdf_url: "http://localhost:5000/static/reports/7.pdf".into(),
            }),
        },
        &mut model,
    );

    let opened: Vec<String> = update
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Browser(req) => match &req.operation {
                BrowserOperation::OpenInNewTab { url } => Some(url.clone()),
            },
            _ => None,
        })
        .collect();
    assert_eq!(opened, vec!["http://localhost:5000/static/reports/7.pdf"]);
    assert_eq!(delays(&update.effects), vec![3_000]);

    let report = app.view(&model).upload.result.unwrap().report.unwrap();
    assert_eq!(
        report.print_action.status.unwrap().message,
        "PDF generated successfully! Opening in a new tab..."
    );
}

#[test]
fn print_is_not_resubmitted_while_pending() {
    let (app, mut model) = with_record();

    let first = app.update(Event::PrintReportRequested, &mut model);
    let second = app.update(Event::PrintReportRequested, &mut model);

    assert_eq!(http_requests(&first.effects).len(), 1);
    assert!(http_requests(&second.effects).is_empty());
}

#[test]
fn old_expiry_does_not_clear_newer_status() {
    let (app, mut model) = with_record();

    app.update(Event::PrintReportRequested, &mut model);
    app.update(
        Event::PrintableReportReceived {
            token: 1,
            result: Ok(retinacare_shared::model::PrintableReport {
                pdf_url: "http://x/1.pdf".into(),
            }),
        },
        &mut model,
    );
    app.update(Event::PrintReportRequested, &mut model);
    app.update(
        Event::PrintableReportReceived {
            token: 2,
            result: Err(AppError::network("connection reset")),
        },
        &mut model,
    );

    app.update(Event::PrintStatusExpired { token: 1 }, &mut model);

    let report = app.view(&model).upload.result.unwrap().report.unwrap();
    assert_eq!(report.print_action.status.unwrap().kind, StatusKind::Error);
}

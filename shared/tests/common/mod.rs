#![allow(dead_code)]

use crux_core::testing::AppTester;
use retinacare_shared::{App, DiagnosisResult, Effect, Event, Model, RecordId, UploadFile};

pub fn scan(name: &str) -> UploadFile {
    UploadFile::new(name, "image/png", vec![0x89, 0x50, 0x4E, 0x47])
}

pub fn diagnosis(id: Option<u64>, prediction: &str, confidence: &str) -> DiagnosisResult {
    DiagnosisResult {
        id: id.map(RecordId),
        prediction: prediction.into(),
        confidence: confidence.into(),
        image_path: Some("static/uploads/abc_eye.png".into()),
    }
}

/// (method, url) of every HTTP request in `effects`.
pub fn http_requests(effects: &[Effect]) -> Vec<(String, String)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Http(req) => Some((req.operation.method.clone(), req.operation.url.clone())),
            _ => None,
        })
        .collect()
}

pub fn renders(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}

pub fn delays(effects: &[Effect]) -> Vec<u64> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Delay(req) => Some(req.operation.millis),
            _ => None,
        })
        .collect()
}

/// Drives a file pick, a submit and a successful response.
pub fn diagnosed(app: &AppTester<App, Effect>, model: &mut Model, result: DiagnosisResult) {
    app.update(Event::FileSelected { file: scan("eye.png") }, model);
    app.update(Event::SubmitRequested, model);
    let session = model.upload.session();
    app.update(
        Event::DiagnosisReceived {
            session,
            result: Ok(result),
        },
        model,
    );
}

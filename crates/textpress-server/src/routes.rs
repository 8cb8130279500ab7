// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Route dispatch. Every failure answers with the JSON envelope
// `{"success": false, "error": ...}`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use textpress_core::error::TextpressError;
use textpress_core::types::{ExportArtifact, ProcessingRequest};
use tracing::{debug, error, warn};

use crate::http::{HttpRequest, HttpResponse};
use crate::multipart;
use crate::services::app_services::AppServices;

const INDEX_HTML: &str = include_str!("../static/index.html");

const NO_TEXT: &str = "No text provided";
const NO_FILE_PART: &str = "No file part";
const NO_SELECTED_FILE: &str = "No selected file";

#[derive(Debug, Deserialize)]
struct ProcessBody {
    text: Option<String>,
    #[serde(default)]
    correct_grammar: Option<bool>,
    #[serde(default)]
    translate: Option<bool>,
    #[serde(default)]
    target_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeechBody {
    text: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

/// Answer one request.
pub async fn handle(services: &AppServices, request: HttpRequest) -> HttpResponse {
    debug!(method = %request.method, path = %request.path, "dispatching");

    let response = match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => HttpResponse::html(INDEX_HTML),
        ("POST", "/upload") => upload(services, &request).await,
        ("POST", "/process") => process(services, &request).await,
        ("POST", "/generate-pdf") => generate_pdf(services, &request).await,
        ("GET", "/history") => history(services).await,
        ("POST", "/text-to-speech") => text_to_speech(services, &request).await,
        (_, "/" | "/upload" | "/process" | "/generate-pdf" | "/history" | "/text-to-speech") => {
            HttpResponse::failure(405, "Method not allowed")
        }
        _ => HttpResponse::failure(404, "Not found"),
    };

    if response.status >= 400 {
        warn!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "request failed"
        );
    }
    response
}

/// Map a pipeline error to the envelope, logging server-side failures.
fn failed(err: TextpressError) -> HttpResponse {
    let response = HttpResponse::from_error(&err);
    if response.status >= 500 {
        error!(error = %err, "request failed on the server side");
    }
    response
}

/// Decode a JSON body. An empty body decodes as `None`.
fn json_body<T: DeserializeOwned>(request: &HttpRequest) -> Result<Option<T>, HttpResponse> {
    if request.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&request.body)
        .map(Some)
        .map_err(|e| failed(TextpressError::Serialization(e)))
}

async fn upload(services: &AppServices, request: &HttpRequest) -> HttpResponse {
    let Some(boundary) = request
        .header("content-type")
        .and_then(multipart::boundary)
    else {
        return HttpResponse::failure(400, NO_FILE_PART);
    };

    let Some(part) = multipart::parse(&request.body, &boundary)
        .into_iter()
        .find(|part| part.name == "file")
    else {
        return HttpResponse::failure(400, NO_FILE_PART);
    };

    let filename = part.filename.unwrap_or_default();
    if filename.is_empty() {
        return HttpResponse::failure(400, NO_SELECTED_FILE);
    }

    match services
        .orchestrator()
        .ingest_named(&filename, part.data)
        .await
    {
        Ok(text) => HttpResponse::json(200, &json!({ "success": true, "text": text })),
        Err(e) => failed(e),
    }
}

async fn process(services: &AppServices, request: &HttpRequest) -> HttpResponse {
    let body: ProcessBody = match json_body(request) {
        Ok(Some(body)) => body,
        Ok(None) => return HttpResponse::failure(400, NO_TEXT),
        Err(response) => return response,
    };
    let Some(text) = body.text else {
        return HttpResponse::failure(400, NO_TEXT);
    };

    let mut processing = ProcessingRequest::passthrough(text);
    if body.correct_grammar.unwrap_or(false) {
        processing = processing.with_grammar_correction();
    }
    if body.translate.unwrap_or(false) {
        processing = processing.with_translation(body.target_language.unwrap_or_default());
    }

    match services.orchestrator().process(processing).await {
        Ok(result) => HttpResponse::json(
            200,
            &json!({
                "success": true,
                "processed_text": result.processed_text,
                "id": result.id,
            }),
        ),
        Err(e) => failed(e),
    }
}

async fn generate_pdf(services: &AppServices, request: &HttpRequest) -> HttpResponse {
    let body: TextBody = match json_body(request) {
        Ok(Some(body)) => body,
        Ok(None) => return HttpResponse::failure(400, NO_TEXT),
        Err(response) => return response,
    };
    let Some(text) = body.text else {
        return HttpResponse::failure(400, NO_TEXT);
    };

    let renderer = services.renderer().clone();
    let rendered = tokio::task::spawn_blocking(move || renderer.render(&text))
        .await
        .map_err(|e| TextpressError::RenderFailure(format!("render task: {e}")));

    match rendered {
        Ok(Ok(bytes)) => HttpResponse::attachment(ExportArtifact::pdf(bytes)),
        Ok(Err(e)) | Err(e) => failed(e),
    }
}

async fn history(services: &AppServices) -> HttpResponse {
    match services.orchestrator().history().await {
        Ok(history) => HttpResponse::json(200, &json!({ "success": true, "history": history })),
        Err(e) => failed(e),
    }
}

async fn text_to_speech(services: &AppServices, request: &HttpRequest) -> HttpResponse {
    let body: SpeechBody = match json_body(request) {
        Ok(Some(body)) => body,
        Ok(None) => return HttpResponse::failure(400, NO_TEXT),
        Err(response) => return response,
    };
    let Some(text) = body.text else {
        return HttpResponse::failure(400, NO_TEXT);
    };

    match services
        .speech()
        .synthesize(&text, body.language.as_deref())
        .await
    {
        Ok(artifact) => HttpResponse::attachment(artifact),
        Err(e) => failed(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;
    use textpress_core::AppConfig;
    use textpress_pipeline::SqliteHistoryStore;
    use textpress_providers::{
        GrammarCapability, ProviderError, StubProvider, TranslationCapability,
    };

    use super::*;
    use crate::services::app_services::Capabilities;

    struct Upcase;

    #[async_trait]
    impl GrammarCapability for Upcase {
        async fn correct(&self, text: &str) -> Result<String, ProviderError> {
            Ok(text.to_uppercase())
        }
    }

    struct Bracket;

    #[async_trait]
    impl TranslationCapability for Bracket {
        async fn translate(&self, text: &str, target: &str) -> Result<String, ProviderError> {
            Ok(format!("[{target}] {text}"))
        }
    }

    fn services() -> AppServices {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().unwrap());
        let capabilities = Capabilities {
            grammar: Arc::new(Upcase),
            translation: Arc::new(Bracket),
            speech: Arc::new(StubProvider),
        };
        AppServices::with_parts(&AppConfig::default(), store, capabilities)
    }

    fn request(method: &str, path: &str, content_type: &str, body: &[u8]) -> HttpRequest {
        HttpRequest {
            method: method.into(),
            path: path.into(),
            headers: vec![("Content-Type".into(), content_type.into())],
            body: body.to_vec(),
        }
    }

    fn post_json(path: &str, body: Value) -> HttpRequest {
        request("POST", path, "application/json", body.to_string().as_bytes())
    }

    fn envelope(response: &HttpResponse) -> Value {
        serde_json::from_slice(&response.body).unwrap()
    }

    fn upload_body(filename: &str, data: &[u8]) -> (String, Vec<u8>) {
        let boundary = "textpress-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    #[tokio::test]
    async fn index_page_is_served() {
        let response = handle(&services(), request("GET", "/", "", b"")).await;
        assert_eq!(response.status, 200);
        assert!(response.content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn process_applies_both_stages_and_records_history() {
        let svc = services();
        let response = handle(
            &svc,
            post_json(
                "/process",
                json!({
                    "text": "hello",
                    "correct_grammar": true,
                    "translate": true,
                    "target_language": "es",
                }),
            ),
        )
        .await;

        assert_eq!(response.status, 200);
        let body = envelope(&response);
        assert_eq!(body["success"], true);
        assert_eq!(body["processed_text"], "[es] HELLO");
        assert!(body["id"].is_string());

        let history = envelope(&handle(&svc, request("GET", "/history", "", b"")).await);
        assert_eq!(history["history"][0]["original_text"], "hello");
        assert_eq!(history["history"][0]["id"], body["id"]);
    }

    #[tokio::test]
    async fn process_without_text_is_rejected() {
        let svc = services();
        let missing = handle(&svc, post_json("/process", json!({}))).await;
        assert_eq!(missing.status, 400);
        assert_eq!(envelope(&missing)["error"], NO_TEXT);

        let empty_body = handle(&svc, request("POST", "/process", "application/json", b"")).await;
        assert_eq!(empty_body.status, 400);
        assert_eq!(envelope(&empty_body)["error"], NO_TEXT);
    }

    #[tokio::test]
    async fn process_accepts_empty_text() {
        let svc = services();
        let response = handle(&svc, post_json("/process", json!({ "text": "" }))).await;

        assert_eq!(response.status, 200);
        let body = envelope(&response);
        assert_eq!(body["success"], true);
        assert_eq!(body["processed_text"], "");

        let history = envelope(&handle(&svc, request("GET", "/history", "", b"")).await);
        assert_eq!(history["history"][0]["id"], body["id"]);
        assert_eq!(history["history"][0]["original_text"], "");
    }

    #[tokio::test]
    async fn text_routes_require_the_text_key() {
        let svc = services();
        for path in ["/generate-pdf", "/text-to-speech"] {
            let response = handle(&svc, post_json(path, json!({ "language": "en-US" }))).await;
            assert_eq!(response.status, 400, "{path}");
            assert_eq!(envelope(&response)["error"], NO_TEXT, "{path}");
        }
    }

    #[tokio::test]
    async fn process_with_bad_json_is_client_error() {
        let response = handle(
            &services(),
            request("POST", "/process", "application/json", b"{not json"),
        )
        .await;
        assert_eq!(response.status, 400);
        assert_eq!(envelope(&response)["success"], false);
    }

    #[tokio::test]
    async fn translate_without_target_is_rejected() {
        let response = handle(
            &services(),
            post_json("/process", json!({ "text": "hi", "translate": true })),
        )
        .await;
        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn upload_txt_returns_text() {
        let (content_type, body) = upload_body("notes.txt", b"plain words");
        let response = handle(
            &services(),
            request("POST", "/upload", &content_type, &body),
        )
        .await;

        assert_eq!(response.status, 200);
        assert_eq!(envelope(&response)["text"], "plain words");
    }

    #[tokio::test]
    async fn upload_doc_is_rejected_with_guidance() {
        let (content_type, body) = upload_body("old.doc", b"\xd0\xcf\x11\xe0");
        let response = handle(
            &services(),
            request("POST", "/upload", &content_type, &body),
        )
        .await;

        assert_eq!(response.status, 400);
        assert_eq!(
            envelope(&response)["error"],
            ".doc files require additional processing. Please convert to .docx or .txt"
        );
    }

    #[tokio::test]
    async fn upload_without_file_part() {
        let response = handle(
            &services(),
            request("POST", "/upload", "application/json", b"{}"),
        )
        .await;
        assert_eq!(response.status, 400);
        assert_eq!(envelope(&response)["error"], NO_FILE_PART);
    }

    #[tokio::test]
    async fn upload_with_empty_filename() {
        let (content_type, body) = upload_body("", b"");
        let response = handle(
            &services(),
            request("POST", "/upload", &content_type, &body),
        )
        .await;
        assert_eq!(envelope(&response)["error"], NO_SELECTED_FILE);
    }

    #[tokio::test]
    async fn generate_pdf_is_attachment() {
        let response = handle(
            &services(),
            post_json("/generate-pdf", json!({ "text": "Quarterly report" })),
        )
        .await;

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/pdf");
        assert!(response.body.starts_with(b"%PDF"));
        assert!(response.head().contains("processed_text.pdf"));
    }

    #[tokio::test]
    async fn generate_pdf_accepts_empty_text() {
        let response = handle(&services(), post_json("/generate-pdf", json!({ "text": "" }))).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/pdf");
        assert!(response.body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn speech_failure_is_server_error() {
        let response = handle(
            &services(),
            post_json("/text-to-speech", json!({ "text": "hello", "language": "en-GB" })),
        )
        .await;
        assert_eq!(response.status, 500);
        assert_eq!(envelope(&response)["success"], false);
    }

    #[tokio::test]
    async fn unknown_path_and_wrong_method() {
        let svc = services();
        let missing = handle(&svc, request("GET", "/nope", "", b"")).await;
        assert_eq!(missing.status, 404);

        let wrong = handle(&svc, request("GET", "/process", "", b"")).await;
        assert_eq!(wrong.status, 405);
        assert_eq!(envelope(&wrong)["success"], false);
    }
}

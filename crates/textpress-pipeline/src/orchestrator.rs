// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator.
//
// Upload path:  Received -> Extracted
// Process path: Received -> Corrected? -> Translated? -> Persisted -> Responded
//
// Grammar correction always runs before translation. Each transform stage
// falls back to its own input, so a failing translator yields the corrected
// text rather than the original. Persistence failures surface to the caller.

use std::sync::Arc;

use textpress_core::error::{Result, TextpressError};
use textpress_core::types::{PipelineStage, ProcessingRequest, ProcessingResult, UploadedDocument};
use textpress_document::DocumentExtractor;
use tracing::{debug, error, info, instrument};

use crate::history::HistoryStore;
use crate::stages::{GrammarCorrector, Translator};

/// Sequences extraction, transforms and persistence for one request at a time.
///
/// Cheap to clone; every handle inside is shared.
#[derive(Clone)]
pub struct Orchestrator {
    extractor: DocumentExtractor,
    corrector: GrammarCorrector,
    translator: Translator,
    store: Arc<dyn HistoryStore>,
}

impl Orchestrator {
    pub fn new(
        corrector: GrammarCorrector,
        translator: Translator,
        store: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            extractor: DocumentExtractor::new(),
            corrector,
            translator,
            store,
        }
    }

    /// Extract plain text from an uploaded document.
    #[instrument(skip(self, document), fields(format = ?document.format, bytes_len = document.bytes.len()))]
    pub async fn ingest(&self, document: UploadedDocument) -> Result<String> {
        self.extract_blocking(move |extractor| extractor.extract(&document)).await
    }

    /// Resolve the format from `filename` and extract.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub async fn ingest_named(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let filename = filename.to_string();
        self.extract_blocking(move |extractor| extractor.extract_named(&filename, &bytes))
            .await
    }

    async fn extract_blocking<F>(&self, extract: F) -> Result<String>
    where
        F: FnOnce(DocumentExtractor) -> Result<String> + Send + 'static,
    {
        debug!(stage = ?PipelineStage::Received, "upload received");

        let extractor = self.extractor;
        let text = tokio::task::spawn_blocking(move || extract(extractor))
            .await
            .map_err(|e| TextpressError::ExtractionFailure(format!("extraction task: {e}")))??;

        debug!(stage = ?PipelineStage::Extracted, chars = text.chars().count(), "text extracted");
        Ok(text)
    }

    /// Run the transform chain for `request` and persist the outcome.
    ///
    /// An invalid request is rejected before any external call.
    #[instrument(
        skip(self, request),
        fields(
            text_len = request.original_text.len(),
            grammar = request.apply_grammar_correction,
            translate = request.apply_translation,
            result_id = tracing::field::Empty,
        )
    )]
    pub async fn process(&self, request: ProcessingRequest) -> Result<ProcessingResult> {
        let request = request.validate()?;
        debug!(stage = ?PipelineStage::Received, "processing request received");

        let mut text = request.original_text.clone();

        if request.apply_grammar_correction {
            text = self.corrector.apply(&text).await;
            debug!(stage = ?PipelineStage::Corrected, "grammar stage finished");
        }

        if request.apply_translation {
            if let Some(target) = request.target_language.as_deref() {
                text = self.translator.apply(&text, target).await;
                debug!(stage = ?PipelineStage::Translated, target_language = target, "translation stage finished");
            }
        }

        let result = ProcessingResult::new(&request, text);
        tracing::Span::current().record("result_id", tracing::field::display(&result.id));

        let store = Arc::clone(&self.store);
        let record = result.clone();
        tokio::task::spawn_blocking(move || store.append(&record))
            .await
            .map_err(|e| TextpressError::PersistenceFailure(format!("history task: {e}")))?
            .inspect_err(|e| error!(error = %e, "failed to persist result"))?;
        debug!(stage = ?PipelineStage::Persisted, "result persisted");

        info!(result_id = %result.id, "request processed");
        debug!(stage = ?PipelineStage::Responded, "responding");
        Ok(result)
    }

    /// Every stored result, newest first.
    pub async fn history(&self) -> Result<Vec<ProcessingResult>> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.list_all())
            .await
            .map_err(|e| TextpressError::PersistenceFailure(format!("history task: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use textpress_providers::{
        GrammarCapability, ProviderError, StubProvider, TranslationCapability,
    };

    use textpress_core::types::DocumentFormat;

    use super::*;
    use crate::history::SqliteHistoryStore;
    use crate::stages::tests::{SpellFixer, Tagger};

    const TIMEOUT: Duration = Duration::from_secs(1);

    /// Counts calls and records the inputs it saw.
    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GrammarCapability for Recorder {
        async fn correct(&self, text: &str) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(text.to_string());
            Ok(text.to_uppercase())
        }
    }

    #[async_trait]
    impl TranslationCapability for Recorder {
        async fn translate(
            &self,
            text: &str,
            _target: &str,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(text.to_string());
            Ok(format!("translated {text}"))
        }
    }

    /// A store that refuses every write.
    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn append(&self, _result: &ProcessingResult) -> Result<()> {
            Err(TextpressError::PersistenceFailure("disk full".into()))
        }

        fn list_all(&self) -> Result<Vec<ProcessingResult>> {
            Err(TextpressError::PersistenceFailure("disk full".into()))
        }
    }

    fn orchestrator(
        grammar: Arc<dyn GrammarCapability>,
        translation: Arc<dyn TranslationCapability>,
    ) -> (Orchestrator, Arc<SqliteHistoryStore>) {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().unwrap());
        let orchestrator = Orchestrator::new(
            GrammarCorrector::new(grammar, TIMEOUT),
            Translator::new(translation, TIMEOUT),
            store.clone(),
        );
        (orchestrator, store)
    }

    #[tokio::test]
    async fn no_flags_passes_text_through() {
        let recorder = Arc::new(Recorder::default());
        let (orch, store) = orchestrator(recorder.clone(), recorder.clone());

        let result = orch
            .process(ProcessingRequest::passthrough("as is"))
            .await
            .unwrap();

        assert_eq!(result.processed_text, "as is");
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.list_all().unwrap(), vec![result]);
    }

    #[tokio::test]
    async fn failing_corrector_keeps_original() {
        let (orch, _store) = orchestrator(Arc::new(StubProvider), Arc::new(StubProvider));

        let result = orch
            .process(ProcessingRequest::passthrough("helo").with_grammar_correction())
            .await
            .unwrap();

        assert_eq!(result.processed_text, "helo");
        assert_eq!(result.original_text, "helo");
    }

    #[tokio::test]
    async fn correction_runs_before_translation() {
        let (orch, _store) = orchestrator(Arc::new(SpellFixer), Arc::new(Tagger));

        let result = orch
            .process(
                ProcessingRequest::passthrough("helo wrld")
                    .with_grammar_correction()
                    .with_translation("fr"),
            )
            .await
            .unwrap();

        assert_eq!(result.processed_text, "[fr] hello world");
        assert_eq!(result.target_language.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn failing_translator_falls_back_to_corrected_text() {
        let (orch, _store) = orchestrator(Arc::new(SpellFixer), Arc::new(StubProvider));

        let result = orch
            .process(
                ProcessingRequest::passthrough("helo wrld")
                    .with_grammar_correction()
                    .with_translation("de"),
            )
            .await
            .unwrap();

        assert_eq!(result.processed_text, "hello world");
    }

    #[tokio::test]
    async fn empty_target_language_is_rejected_before_any_call() {
        let recorder = Arc::new(Recorder::default());
        let (orch, store) = orchestrator(recorder.clone(), recorder.clone());

        let request = ProcessingRequest::passthrough("text")
            .with_grammar_correction()
            .with_translation("");
        let outcome = orch.process(request).await;

        assert!(matches!(outcome, Err(TextpressError::InvalidRequest(_))));
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_request_gets_a_new_id() {
        let (orch, _store) = orchestrator(Arc::new(StubProvider), Arc::new(StubProvider));

        let a = orch.process(ProcessingRequest::passthrough("same")).await.unwrap();
        let b = orch.process(ProcessingRequest::passthrough("same")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(orch.history().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn persistence_failure_is_loud() {
        let orch = Orchestrator::new(
            GrammarCorrector::new(Arc::new(StubProvider), TIMEOUT),
            Translator::new(Arc::new(StubProvider), TIMEOUT),
            Arc::new(BrokenStore),
        );

        let outcome = orch.process(ProcessingRequest::passthrough("lost")).await;
        assert!(matches!(outcome, Err(TextpressError::PersistenceFailure(_))));
    }

    #[tokio::test]
    async fn doc_upload_is_rejected() {
        let (orch, _store) = orchestrator(Arc::new(StubProvider), Arc::new(StubProvider));

        let outcome = orch.ingest_named("old.doc", b"\xd0\xcf\x11\xe0".to_vec()).await;
        assert!(matches!(outcome, Err(TextpressError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let (orch, _store) = orchestrator(Arc::new(StubProvider), Arc::new(StubProvider));

        match orch.ingest_named("photo.png", b"hello".to_vec()).await {
            Err(TextpressError::UnsupportedFormat(msg)) => {
                assert_eq!(msg, textpress_document::extract::UNSUPPORTED_TYPE)
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ingest_uses_declared_format() {
        let (orch, _store) = orchestrator(Arc::new(StubProvider), Arc::new(StubProvider));

        let document = UploadedDocument::new(DocumentFormat::Txt, b"typed text".to_vec());
        assert_eq!(orch.ingest(document).await.unwrap(), "typed text");
    }

    #[tokio::test]
    async fn txt_upload_corrected_and_persisted_end_to_end() {
        let (orch, store) = orchestrator(Arc::new(SpellFixer), Arc::new(StubProvider));

        let extracted = orch
            .ingest_named("notes.txt", b"helo wrld".to_vec())
            .await
            .unwrap();
        assert_eq!(extracted, "helo wrld");

        let result = orch
            .process(ProcessingRequest::passthrough(extracted).with_grammar_correction())
            .await
            .unwrap();
        assert_eq!(result.processed_text, "hello world");

        let history = store.list_all().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].original_text, "helo wrld");
        assert_eq!(history[0].processed_text, "hello world");
        assert!(history[0].apply_grammar_correction);
        assert!(!history[0].apply_translation);
    }
}

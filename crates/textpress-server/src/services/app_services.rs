// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — builds every backend handle once at startup.
//
// Providers without credentials are replaced by the stub provider, so the
// service always starts: transform stages then pass text through and speech
// export fails with a readable error.

use std::path::Path;
use std::sync::Arc;

use textpress_core::AppConfig;
use textpress_core::error::Result;
use textpress_document::PdfRenderer;
use textpress_pipeline::{
    GrammarCorrector, HistoryStore, Orchestrator, SpeechSynthesizer, SqliteHistoryStore,
    Translator,
};
use textpress_providers::{
    AzureOpenAiCorrector, AzureSpeechSynthesizer, AzureTranslator, GrammarCapability,
    ProviderError, SpeechCapability, StubProvider, TranslationCapability,
};
use tracing::{info, warn};

/// External capabilities the pipeline is wired with.
pub struct Capabilities {
    pub grammar: Arc<dyn GrammarCapability>,
    pub translation: Arc<dyn TranslationCapability>,
    pub speech: Arc<dyn SpeechCapability>,
}

impl Capabilities {
    /// Azure-backed capabilities, with the stub standing in for any service
    /// that is not configured.
    pub fn from_config(config: &AppConfig) -> Self {
        let grammar: Arc<dyn GrammarCapability> = match configured(
            "grammar correction",
            AzureOpenAiCorrector::from_config(&config.openai),
        ) {
            Some(provider) => Arc::new(provider),
            None => Arc::new(StubProvider),
        };

        let translation: Arc<dyn TranslationCapability> = match configured(
            "translation",
            AzureTranslator::from_config(&config.translator),
        ) {
            Some(provider) => Arc::new(provider),
            None => Arc::new(StubProvider),
        };

        let speech: Arc<dyn SpeechCapability> = match configured(
            "speech synthesis",
            AzureSpeechSynthesizer::from_config(&config.speech),
        ) {
            Some(provider) => Arc::new(provider),
            None => Arc::new(StubProvider),
        };

        Self {
            grammar,
            translation,
            speech,
        }
    }
}

fn configured<T>(capability: &str, built: std::result::Result<T, ProviderError>) -> Option<T> {
    match built {
        Ok(provider) => {
            info!(capability, "provider configured");
            Some(provider)
        }
        Err(e) => {
            warn!(capability, reason = %e, "provider unavailable, using stub");
            None
        }
    }
}

/// Shared handles for the HTTP routes.
///
/// Cheap to clone: every field is `Arc`-backed.
#[derive(Clone)]
pub struct AppServices {
    orchestrator: Orchestrator,
    speech: SpeechSynthesizer,
    renderer: PdfRenderer,
}

impl AppServices {
    /// Initialise all services. Call once at startup.
    ///
    /// Opens the history database (`storage.database_path`, or
    /// `<data_dir>/history.db`) and wires the configured providers.
    pub fn init(config: &AppConfig, data_dir: &Path) -> Result<Self> {
        info!(path = %data_dir.display(), "initialising services");

        let db_path = config
            .storage
            .database_path
            .clone()
            .unwrap_or_else(|| data_dir.join("history.db"));
        let store = SqliteHistoryStore::open(&db_path, config.storage.timeout())?;

        let services =
            Self::with_parts(config, Arc::new(store), Capabilities::from_config(config));

        info!("services initialised");
        Ok(services)
    }

    /// Assemble services from an explicit store and capability set.
    pub fn with_parts(
        config: &AppConfig,
        store: Arc<dyn HistoryStore>,
        capabilities: Capabilities,
    ) -> Self {
        let corrector = GrammarCorrector::new(capabilities.grammar, config.openai.timeout());
        let translator = Translator::new(capabilities.translation, config.translator.timeout());

        Self {
            orchestrator: Orchestrator::new(corrector, translator, store),
            speech: SpeechSynthesizer::new(capabilities.speech, config.speech.timeout()),
            renderer: PdfRenderer::default(),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn speech(&self) -> &SpeechSynthesizer {
        &self.speech
    }

    pub fn renderer(&self) -> &PdfRenderer {
        &self.renderer
    }
}

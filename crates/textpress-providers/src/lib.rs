// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textpress-providers — External capabilities behind narrow async traits.
//
// Each capability (grammar correction, translation, speech synthesis) is a
// trait with one HTTP implementation against the matching Azure service and
// a stub used when the service has no credentials configured.

pub mod error;
pub mod openai;
pub mod speech;
pub mod stub;
pub mod traits;
pub mod translator;

pub use error::ProviderError;
pub use openai::AzureOpenAiCorrector;
pub use speech::AzureSpeechSynthesizer;
pub use stub::StubProvider;
pub use traits::{GrammarCapability, SpeechCapability, SynthesisStatus, TranslationCapability};
pub use translator::AzureTranslator;

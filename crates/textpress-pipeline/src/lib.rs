// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textpress-pipeline — The text-processing orchestration pipeline.
//
// Sequences extraction, grammar correction and translation for a request,
// persists the outcome to history, and exports text as speech.

pub mod history;
pub mod orchestrator;
pub mod speech;
pub mod stages;

pub use history::{HistoryStore, SqliteHistoryStore};
pub use orchestrator::Orchestrator;
pub use speech::SpeechSynthesizer;
pub use stages::{GrammarCorrector, Translator};

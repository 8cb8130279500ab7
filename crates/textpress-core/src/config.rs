// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Settings come from an optional JSON file and are then overridden by the
// environment variables the service has always been deployed with.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TextpressError};

/// Top-level application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub openai: OpenAiConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// How long a client may take to send a complete request.
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".into(),
            port: 5000,
            read_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// History database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file; `None` means `<data dir>/history.db`.
    pub database_path: Option<PathBuf>,
    /// How long a write may wait on a locked database.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            timeout_secs: 5,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Azure OpenAI chat-completions deployment used for grammar correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: "gpt-35-turbo".into(),
            api_version: "2023-05-15".into(),
            timeout_secs: 30,
        }
    }
}

impl OpenAiConfig {
    /// Whether enough is configured to make a request.
    pub fn is_configured(&self) -> bool {
        non_blank(&self.endpoint) && non_blank(&self.api_key)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Azure Translator Text v3 settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub region: String,
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.cognitive.microsofttranslator.com".into(),
            api_key: None,
            region: "global".into(),
            timeout_secs: 15,
        }
    }
}

impl TranslatorConfig {
    pub fn is_configured(&self) -> bool {
        non_blank(&self.api_key)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Azure Speech text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub region: Option<String>,
    /// Neural voice override; `None` picks a default for the language.
    pub voice: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: None,
            voice: None,
            timeout_secs: 60,
        }
    }
}

impl SpeechConfig {
    pub fn is_configured(&self) -> bool {
        non_blank(&self.api_key) && non_blank(&self.region)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load settings from `path` if it exists, otherwise start from defaults,
    /// then apply process environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let parsed: AppConfig = serde_json::from_str(&data).map_err(|e| {
                TextpressError::Config(format!("{}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "loaded config file");
            parsed
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            AppConfig::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override settings from environment-style lookups.
    ///
    /// Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AZURE_OPENAI_ENDPOINT") {
            self.openai.endpoint = Some(v);
        }
        if let Some(v) = get("AZURE_OPENAI_KEY") {
            self.openai.api_key = Some(v);
        }
        if let Some(v) = get("AZURE_OPENAI_DEPLOYMENT") {
            self.openai.deployment = v;
        }
        if let Some(v) = get("AZURE_OPENAI_API_VERSION") {
            self.openai.api_version = v;
        }
        if let Some(v) = get("AZURE_TRANSLATOR_KEY") {
            self.translator.api_key = Some(v);
        }
        if let Some(v) = get("AZURE_TRANSLATOR_ENDPOINT") {
            self.translator.endpoint = v;
        }
        if let Some(v) = get("AZURE_TRANSLATOR_LOCATION") {
            self.translator.region = v;
        }
        if let Some(v) = get("AZURE_SPEECH_KEY") {
            self.speech.api_key = Some(v);
        }
        if let Some(v) = get("AZURE_SPEECH_REGION") {
            self.speech.region = Some(v);
        }
        if let Some(v) = get("TEXTPRESS_DB") {
            self.storage.database_path = Some(PathBuf::from(v));
        }
        if let Some(port) = get("TEXTPRESS_PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub transcription: TranscriptionConfig,
    pub audio: AudioConfig,
    pub email: EmailConfig,
    pub notes: NotesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key; falls back to the OPENAI_API_KEY environment variable.
    pub api_key: Option<String>,
    pub api_base: String,
    pub transcription_model: String,
    pub chat_model: String,
    pub language: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            transcription_model: "whisper-1".to_string(),
            chat_model: "gpt-4".to_string(),
            language: "en".to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Resolve the API key from config or environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Maximum upload size per transcription request, in megabytes.
    /// Files above this are split into duration-based chunks.
    pub size_ceiling_mb: u64,
    /// Timeout for each remote transcription/summarization request.
    pub request_timeout_seconds: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            size_ceiling_mb: 24,
            request_timeout_seconds: 300,
        }
    }
}

impl TranscriptionConfig {
    pub fn size_ceiling_bytes(&self) -> u64 {
        self.size_ceiling_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub port: u16,
    /// SMTP username; falls back to the EMAIL_USERNAME environment variable.
    pub username: Option<String>,
    /// SMTP password; falls back to the EMAIL_PASSWORD environment variable.
    pub password: Option<String>,
    pub sender_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            port: 587,
            username: None,
            password: None,
            sender_name: "Minutary".to_string(),
        }
    }
}

impl EmailConfig {
    pub fn resolved_smtp_server(&self) -> String {
        std::env::var("EMAIL_SMTP_SERVER").unwrap_or_else(|_| self.smtp_server.clone())
    }

    pub fn resolved_port(&self) -> u16 {
        std::env::var("EMAIL_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.port)
    }

    pub fn resolved_username(&self) -> Option<String> {
        self.username
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| std::env::var("EMAIL_USERNAME").ok())
            .filter(|u| !u.trim().is_empty())
    }

    pub fn resolved_password(&self) -> Option<String> {
        self.password
            .clone()
            .filter(|p| !p.is_empty())
            .or_else(|| std::env::var("EMAIL_PASSWORD").ok())
            .filter(|p| !p.is_empty())
    }

    /// Delivery is opt-in: it needs at least a username to authenticate as.
    pub fn is_configured(&self) -> bool {
        self.resolved_username().is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Directory for generated JSON/HTML notes (default: current directory).
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

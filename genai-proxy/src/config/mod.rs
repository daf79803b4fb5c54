use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default per-file upload limit (4MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_IMAGE_PROMPT: &str = "Jelaskan gambar ini";
pub const DEFAULT_DOCUMENT_PROMPT: &str = "Buat ringkasan dari dokumen berikut.";
pub const DEFAULT_AUDIO_PROMPT: &str = "Buat transkrip dari rekaman tersebut.";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub cors: CorsConfig,
    pub uploads: UploadConfig,
    pub prompts: PromptDefaults,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    /// Model used for every generation call (e.g., gemini-2.5-flash)
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Browser origins allowed to call the API. Empty allows every origin.
    pub allowed_origins: Vec<String>,
    /// Reject requests from other origins with 403 instead of only
    /// withholding CORS headers.
    pub enforce: bool,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size_bytes: usize,
}

/// Instruction text sent ahead of an uploaded file when the caller gives none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDefaults {
    pub image: String,
    pub document: String,
    pub audio: String,
}

impl Default for PromptDefaults {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE_PROMPT.to_string(),
            document: DEFAULT_DOCUMENT_PROMPT.to_string(),
            audio: DEFAULT_AUDIO_PROMPT.to_string(),
        }
    }
}

impl ProxyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ProxyConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                model: get_env_or("GEMINI_MODEL", DEFAULT_MODEL),
                api_base: get_env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env("FRONTEND_URL", Some(""), is_prod)?),
                enforce: parse_flag("CORS_ENFORCE", &get_env_or("CORS_ENFORCE", "true"))?,
            },
            uploads: UploadConfig {
                max_file_size_bytes: get_env_or(
                    "MAX_UPLOAD_BYTES",
                    &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
                )
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("MAX_UPLOAD_BYTES is invalid: {}", e))
                })?,
            },
            prompts: PromptDefaults {
                image: get_env_or("DEFAULT_IMAGE_PROMPT", DEFAULT_IMAGE_PROMPT),
                document: get_env_or("DEFAULT_DOCUMENT_PROMPT", DEFAULT_DOCUMENT_PROMPT),
                audio: get_env_or("DEFAULT_AUDIO_PROMPT", DEFAULT_AUDIO_PROMPT),
            },
        })
    }
}

/// Splits a comma-separated origin list, trimming entries and dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(|o| o.to_string())
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a boolean, got '{}'",
            key,
            other
        ))),
    }
}

/// Reads a setting that has a default. Unset and blank values both fall back
/// to `default`, in every environment.
fn get_env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}

/// Reads a setting that must be given explicitly in production.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

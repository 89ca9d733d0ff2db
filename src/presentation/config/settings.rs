use std::path::PathBuf;

use crate::application::services::PipelinePolicy;
use crate::infrastructure::providers::ProviderKind;

use super::environment::Environment;

/// All runtime configuration, resolved once from the environment at process
/// start. Credentials are never defaulted: a missing API key for the active
/// provider is a startup error, not a fallback value.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub pipeline: PipelinePolicy,
    pub database: Option<DatabaseSettings>,
    pub drive: Option<DriveSettings>,
    pub workspace_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct DriveSettings {
    pub access_token: String,
    pub folder_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let environment = match std::env::var("APP_ENV") {
            Ok(raw) => {
                Environment::try_from(raw).map_err(|message| SettingsError::InvalidVar {
                    var: "APP_ENV",
                    message,
                })?
            }
            Err(_) => Environment::Local,
        };

        let server = ServerSettings {
            host: env_or("SERVER_HOST", "0.0.0.0"),
            port: env_parse_or("SERVER_PORT", 3000)?,
        };

        let kind: ProviderKind = match std::env::var("TRANSCRIPTION_PROVIDER") {
            Ok(v) => v.parse().map_err(|message| SettingsError::InvalidVar {
                var: "TRANSCRIPTION_PROVIDER",
                message,
            })?,
            Err(_) => ProviderKind::OpenAi,
        };
        let key_var = match kind {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Deepgram => "DEEPGRAM_API_KEY",
        };
        let api_key = std::env::var(key_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SettingsError::MissingVar(key_var))?;

        let provider = ProviderSettings {
            kind,
            api_key,
            base_url: std::env::var("PROVIDER_BASE_URL").ok(),
            model: std::env::var("PROVIDER_MODEL").ok(),
        };

        let defaults = PipelinePolicy::default();
        let pipeline = PipelinePolicy {
            size_ceiling_bytes: env_parse_or("SIZE_CEILING_BYTES", defaults.size_ceiling_bytes)?,
            duration_ceiling_seconds: env_parse_or(
                "DURATION_CEILING_SECONDS",
                defaults.duration_ceiling_seconds,
            )?,
            chunk_duration_seconds: env_parse_or(
                "CHUNK_DURATION_SECONDS",
                defaults.chunk_duration_seconds,
            )?,
            compression_threshold_bytes: env_parse_or(
                "COMPRESSION_THRESHOLD_BYTES",
                defaults.compression_threshold_bytes,
            )?,
            compression_bitrate_kbps: env_parse_or(
                "COMPRESSION_BITRATE_KBPS",
                defaults.compression_bitrate_kbps,
            )?,
            separator: env_or("SEGMENT_SEPARATOR", &defaults.separator),
            context_tail_chars: env_parse_or("CONTEXT_TAIL_CHARS", defaults.context_tail_chars)?,
            provider_timeout_seconds: env_parse_or(
                "PROVIDER_TIMEOUT_SECONDS",
                defaults.provider_timeout_seconds,
            )?,
            tool_timeout_seconds: env_parse_or(
                "TOOL_TIMEOUT_SECONDS",
                defaults.tool_timeout_seconds,
            )?,
        };

        let database = std::env::var("DATABASE_URL")
            .ok()
            .map(|url| {
                Ok::<_, SettingsError>(DatabaseSettings {
                    url,
                    max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
                })
            })
            .transpose()?;

        let drive = std::env::var("DRIVE_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|access_token| DriveSettings {
                access_token,
                folder_id: std::env::var("DRIVE_FOLDER_ID").ok(),
            });

        let workspace_dir = std::env::var("WORKSPACE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("skopun"));

        Ok(Self {
            environment,
            server,
            provider,
            pipeline,
            database,
            drive,
            workspace_dir,
        })
    }
}

fn env_or(var: &'static str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| SettingsError::InvalidVar {
            var,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

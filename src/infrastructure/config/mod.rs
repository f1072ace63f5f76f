use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // OpenAI completion service
    pub openai_api_key: String,
    pub openai_model: String,
    // Primary synthesis (AWS Polly)
    pub aws_region: String,
    pub polly_voice_id: String,
    pub locale_code: String,
    // Fallback synthesis (ElevenLabs + local tools)
    pub eleven_labs_api_key: String,
    pub eleven_labs_voice_id: String,
    pub eleven_labs_model_id: String,
    pub audio_dir: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub rhubarb_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", "3000")?,
            environment: env::var("ENVIRONMENT")
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })
                .unwrap_or(Environment::Development),
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            polly_voice_id: env::var("POLLY_VOICE_ID").unwrap_or_else(|_| "Matthew".to_string()),
            locale_code: env::var("LOCALE_CODE").unwrap_or_else(|_| "en-US".to_string()),
            eleven_labs_api_key: required("ELEVEN_LABS_API_KEY")?,
            eleven_labs_voice_id: env::var("ELEVEN_LABS_VOICE_ID")
                .unwrap_or_else(|_| "9BWtsMINqrJLrRacOk9x".to_string()),
            eleven_labs_model_id: env::var("ELEVEN_LABS_MODEL_ID")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            audio_dir: env::var("AUDIO_DIR")
                .unwrap_or_else(|_| "audios".to_string())
                .into(),
            ffmpeg_path: env::var("FFMPEG_PATH")
                .unwrap_or_else(|_| "ffmpeg".to_string())
                .into(),
            rhubarb_path: env::var("RHUBARB_PATH")
                .unwrap_or_else(|_| "./bin/rhubarb".to_string())
                .into(),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// The process must not serve traffic without these; absence is fatal at
/// startup.
fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("ELEVEN_LABS_API_KEY", "el-test");
    }

    fn clear_all_vars() {
        for name in [
            "OPENAI_API_KEY",
            "ELEVEN_LABS_API_KEY",
            "HOST",
            "PORT",
            "ENVIRONMENT",
            "LOG_FORMAT",
            "OPENAI_MODEL",
            "AWS_REGION",
            "POLLY_VOICE_ID",
            "LOCALE_CODE",
            "ELEVEN_LABS_VOICE_ID",
            "ELEVEN_LABS_MODEL_ID",
            "AUDIO_DIR",
            "FFMPEG_PATH",
            "RHUBARB_PATH",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_missing_openai_key_is_fatal() {
        clear_all_vars();
        env::set_var("ELEVEN_LABS_API_KEY", "el-test");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("OPENAI_API_KEY")));
    }

    #[test]
    #[serial]
    fn test_missing_eleven_labs_key_is_fatal() {
        clear_all_vars();
        env::set_var("OPENAI_API_KEY", "sk-test");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("ELEVEN_LABS_API_KEY")));
    }

    #[test]
    #[serial]
    fn test_blank_key_counts_as_missing() {
        clear_all_vars();
        env::set_var("OPENAI_API_KEY", "   ");
        env::set_var("ELEVEN_LABS_API_KEY", "el-test");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_defaults_apply_when_only_required_vars_set() {
        clear_all_vars();
        set_required_vars();

        let config = Config::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.polly_voice_id, "Matthew");
        assert_eq!(config.locale_code, "en-US");
        assert_eq!(config.audio_dir, PathBuf::from("audios"));
        assert!(config.is_development());
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_reported() {
        clear_all_vars();
        set_required_vars();
        env::set_var("PORT", "not-a-port");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));
    }
}

//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml`, then from `EXPENSES__*`
//! environment variables (e.g. `EXPENSES__SERVER__PORT=8080`). The variables
//! `SUPABASE_URL`, `SUPABASE_KEY` and `OCR_SPACE_API_KEY` are honoured last.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Where expenses are kept.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Store {
    #[default]
    Memory,
    Sqlite {
        path: String,
    },
    /// A PostgREST endpoint such as Supabase.
    Rest {
        url: String,
        key: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ocr {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Ocr {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub store: Store,
    pub ocr: Ocr,
}

#[derive(Debug, Parser)]
#[command(name = "expenses", version)]
struct Args {
    /// Optional config file path (TOML). The extension may be omitted.
    #[arg(long, env = "EXPENSES_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let settings = Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(
                Environment::with_prefix("EXPENSES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_legacy_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Apply the plain variables older deployments used.
    fn apply_legacy_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| var(name).filter(|value| !value.trim().is_empty());

        if let (Some(url), Some(key)) = (var("SUPABASE_URL"), var("SUPABASE_KEY")) {
            self.store = Store::Rest { url, key };
        }
        if let Some(api_key) = var("OCR_SPACE_API_KEY") {
            self.ocr.api_key = Some(api_key);
        }
    }
}

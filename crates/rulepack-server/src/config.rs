//! Server configuration
//!
//! Values are layered, lowest priority first: built-in defaults, the optional
//! config file, `RULEPACK_*` environment variables, then command-line flags.

use clap::{CommandFactory, Parser};
use rulepack_repository::config::{DEFAULT_PACKS_PATH, DEFAULT_RULES_DIR};
use rulepack_repository::RepositoryConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RULEPACK";

/// Command-line flags
#[derive(Debug, Clone, Parser)]
#[command(name = "rulepack-server", version, about = "Serve rule documents and rule packs over HTTP")]
pub struct Cli {
    /// Directory to scan for rule documents
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Address to listen on (":8080" listens on all interfaces)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Pack manifest; an empty value disables packs
    #[arg(long, value_name = "FILE")]
    pub packs: Option<String>,

    /// Config file, extension optional
    #[arg(long, env = "RULEPACK_CONFIG", default_value = "config/server")]
    pub config: String,
}

impl Cli {
    /// Parse the process arguments
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_flags(std::env::args_os()))
    }

    /// Parse an explicit argument list (first item is the program name)
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_flags(args))
    }
}

/// Rewrite single-dash long flags (`-dir x`, `-listen=:9000`) to `--` form
///
/// Only names clap knows as long flags are rewritten, so values that merely
/// start with a dash are left alone.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let long_names: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .chain(["help", "version"])
        .collect();

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text.starts_with("--") || !text.starts_with('-') {
                return arg;
            }
            let name = text[1..].split('=').next().unwrap_or_default();
            if long_names.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub listen: String,

    /// Rules directory
    pub rules_dir: PathBuf,

    /// Pack manifest path; empty disables packs
    pub packs_path: String,

    /// Extensions that mark a rule document
    pub rule_extensions: Vec<String>,

    /// How long in-flight requests may run once shutdown starts
    pub shutdown_grace_secs: u64,

    /// Log level
    pub log_level: String,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: ":8080".to_string(),
            rules_dir: PathBuf::from(DEFAULT_RULES_DIR),
            packs_path: DEFAULT_PACKS_PATH.to_string(),
            rule_extensions: vec!["yml".to_string()],
            shutdown_grace_secs: 5,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the config file, environment and flags
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("rule_extensions"),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to read configuration: {}", e))?;

        let mut config = Self::from_settings(settings)?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Deserialize from already-built settings
    pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
        settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    /// Override with flags given on the command line
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.dir {
            self.rules_dir = dir.clone();
        }
        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }
        if let Some(packs) = &cli.packs {
            self.packs_path = packs.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen.trim().is_empty() {
            anyhow::bail!("listen address must not be empty");
        }
        self.repository_config()
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid repository configuration: {}", e))
    }

    /// Socket address to bind; a bare `:port` binds every interface
    pub fn bind_address(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Repository settings derived from this configuration
    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig::new(&self.rules_dir)
            .with_packs_path(&self.packs_path)
            .with_extensions(self.rule_extensions.iter().cloned())
    }
}

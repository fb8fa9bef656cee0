use crate::adapters::output::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::config::{ClientSettings, LogFormat};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "prereq-lookup")]
#[command(about = "Find the courses that list a given course as a prerequisite")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog backend
    #[arg(long, env = "PREREQ_API_URL", global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout; no timeout when unset
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every subject the backend offers
    Subjects,
    /// List the courses of one subject
    Courses {
        /// Subject display name or identifier URL
        #[arg(long)]
        subject: String,
    },
    /// Show the courses that require the selected course
    Prereqs {
        /// Subject display name or identifier URL
        #[arg(long)]
        subject: String,
        /// Course number within the subject
        #[arg(long)]
        number: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Pick subject and course interactively
    Browse,
}

impl CliConfig {
    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// 優先順序：命令列 > 環境變數 > TOML > 預設值
    pub fn resolve_settings(&self, toml: Option<&TomlConfig>) -> ClientSettings {
        toml.map(ClientSettings::from_toml)
            .unwrap_or_default()
            .with_overrides(self.base_url.clone(), self.timeout_seconds)
    }

    pub fn effective_verbose(&self, toml: Option<&TomlConfig>) -> bool {
        self.verbose || toml.is_some_and(TomlConfig::verbose)
    }

    pub fn effective_log_format(&self, toml: Option<&TomlConfig>) -> LogFormat {
        self.log_format
            .or_else(|| toml.and_then(TomlConfig::log_format))
            .unwrap_or_default()
    }
}

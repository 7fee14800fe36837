//! Configuration for the Ghostline server
//!
//! CLI-first configuration with an optional TOML file. The file, when given,
//! overrides the CLI. The API key is never part of the CLI or the file; it is
//! read from `GROQ_API_KEY` at startup.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::CommentPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "ghostline")]
#[command(about = "AI code completion language server", long_about = None)]
#[command(version)]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Configuration file path (optional, overrides CLI)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the LSP server (default mode)
    Lsp {
        /// Idle delay before a completion request is sent, in milliseconds
        #[arg(long, default_value = "3000")]
        idle_delay_ms: u64,

        /// Model identifier sent with every request
        #[arg(long, default_value = "llama-3.3-70b-versatile")]
        model: String,

        /// Chat completions endpoint
        #[arg(long, default_value = "https://api.groq.com/openai/v1/chat/completions")]
        endpoint: String,

        /// Maximum tokens per completion
        #[arg(long, default_value = "1024")]
        max_tokens: usize,

        /// Sampling temperature
        #[arg(long, default_value = "0.3")]
        temperature: f32,

        /// HTTP request timeout in milliseconds
        #[arg(long, default_value = "10000")]
        request_timeout_ms: u64,

        /// Comment handling for model output: strip | keep-leading
        #[arg(long, default_value = "strip")]
        comment_policy: String,

        /// How many leading comment lines keep-leading retains
        #[arg(long, default_value = "2")]
        keep_comment_lines: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub groq: GroqSettings,
    #[serde(default)]
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    #[serde(default = "default_idle_delay_ms")]
    pub idle_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_comment_policy")]
    pub comment_policy: String,
    #[serde(default = "default_keep_comment_lines")]
    pub keep_comment_lines: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_idle_delay_ms() -> u64 {
    3000
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_max_tokens() -> usize {
    1024
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_ms() -> u64 {
    10000
}

fn default_comment_policy() -> String {
    "strip".to_string()
}

fn default_keep_comment_lines() -> usize {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            idle_delay_ms: default_idle_delay_ms(),
        }
    }
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            comment_policy: default_comment_policy(),
            keep_comment_lines: default_keep_comment_lines(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            debounce: DebounceConfig::default(),
            groq: GroqSettings::default(),
            format: FormatConfig::default(),
        }
    }
}

impl Config {
    /// Parse CLI arguments into a config, loading the TOML file if given
    pub fn from_args() -> Result<Self> {
        Self::from_cli(CliArgs::parse())
    }

    pub fn from_cli(args: CliArgs) -> Result<Self> {
        if let Some(path) = &args.config {
            return Self::load(path);
        }

        let config = match args.command {
            None => Config {
                server: ServerConfig {
                    log_level: args.log_level,
                },
                ..Default::default()
            },
            Some(Commands::Lsp {
                idle_delay_ms,
                model,
                endpoint,
                max_tokens,
                temperature,
                request_timeout_ms,
                comment_policy,
                keep_comment_lines,
            }) => Config {
                server: ServerConfig {
                    log_level: args.log_level,
                },
                debounce: DebounceConfig { idle_delay_ms },
                groq: GroqSettings {
                    model,
                    endpoint,
                    max_tokens,
                    temperature,
                    timeout_ms: request_timeout_ms,
                },
                format: FormatConfig {
                    comment_policy,
                    keep_comment_lines,
                },
            },
        };

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Resolve the comment policy the formatter should use
    pub fn comment_policy(&self) -> CommentPolicy {
        match self.format.comment_policy.as_str() {
            "keep-leading" | "keep_leading" => {
                CommentPolicy::KeepLeading(self.format.keep_comment_lines)
            }
            _ => CommentPolicy::Strip,
        }
    }
}

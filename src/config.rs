use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "forum-feed", about = "Browse and moderate community forum posts")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the forum API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List posts, newest first
    List {
        /// Case-insensitive text to find in titles and content
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only show posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show the tag filter options
    Tags,
    /// Delete one of your posts
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show who the stored credential belongs to
    Whoami,
    /// Print the route of a post
    Open { id: String },
    /// Print the route of the add-post page
    Add,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub token_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref base_url) = cli.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.api.timeout_secs = timeout;
        }

        // Resolve paths relative to data dir
        config.session.token_file = Some(match config.session.token_file.take() {
            Some(path) if path.is_relative() => data_dir.join(path),
            Some(path) => path,
            None => data_dir.join("token"),
        });

        url::Url::parse(&config.api.base_url)
            .with_context(|| format!("invalid api.base_url {:?}", config.api.base_url))?;

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".forum-feed"))
                .unwrap_or_else(|| PathBuf::from(".forum-feed"))
        })
    }

    pub fn token_path(&self) -> PathBuf {
        self.session
            .token_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("token"))
    }
}

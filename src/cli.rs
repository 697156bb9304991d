use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::StudioConfig;
use crate::error::ConfigError;
use crate::types::PsData;

/// CLI arguments for studio-api
#[derive(Parser, Debug)]
#[command(name = "studio-api")]
#[command(about = "Query and control a MosDynamic studio", long_about = None)]
pub struct StudioArgs {
    /// Path to config file (defaults to studio.json found above the cwd)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Studio base URL (e.g., http://studio.local:8080)
    #[arg(long, value_name = "URL", env = "STUDIO_ADDRESS")]
    pub studio_address: Option<String>,

    /// Session identifier sent as psdevslnsys
    #[arg(long, value_name = "ID", env = "STUDIO_PSDEVSLNSYS")]
    pub session: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error instead of printing a default value when a call fails
    #[arg(long)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: StudioCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum StudioCommand {
    /// Show application data
    AppData,
    /// List queued and running background tasks
    Tasks,
    /// Cancel background tasks (the studio cancels all of them)
    Cancel {
        /// Task keys; accepted for reference, every task is cancelled
        keys: Vec<String>,
    },
    /// Refresh an application's publish cache
    RefreshCache {
        /// Application id
        app: String,
    },
}

impl StudioArgs {
    /// Settings given on the command line or through the environment.
    pub fn overrides(&self) -> StudioConfig {
        StudioConfig {
            studio_address: self.studio_address.clone(),
            psdevslnsys: self.session.clone(),
            timeout_ms: self.timeout_ms,
            connect_timeout_ms: None,
        }
    }

    /// Load the config file (explicit or discovered) and apply overrides.
    pub fn resolve_config(&self) -> Result<StudioConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => StudioConfig::load(path)?,
            None => StudioConfig::discover()?.unwrap_or_default(),
        };
        Ok(base.merge(self.overrides()))
    }
}

/// Render a task record as a single line.
pub fn format_task_line(task: &PsData) -> String {
    let id = ["pssysdevbktaskid", "id"]
        .iter()
        .find_map(|k| task.get(*k))
        .map(value_text);
    let name = ["pssysdevbktaskname", "name"]
        .iter()
        .find_map(|k| task.get(*k))
        .map(value_text);
    let state = task.get("taskstate").map(value_text);

    match (id, name, state) {
        (Some(id), name, state) => format!(
            "{}{}{}",
            id,
            name.map(|n| format!("  {}", n)).unwrap_or_default(),
            state.map(|s| format!("  [state {}]", s)).unwrap_or_default()
        ),
        _ => serde_json::Value::Object(task.clone()).to_string(),
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

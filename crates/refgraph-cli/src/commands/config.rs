//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use refgraph_core::{Config, DEFAULT_API_URL};

use crate::output::Output;

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "user_id": config.user_id,
                "api_key": config.api_key.as_deref().map(|_| "(set)"),
                "api_url": config.api_url,
                "data_dir": config.data_dir,
                "graph_dir": config.graph_dir,
                "template_dir": config.template_dir,
                "keyword_dir": config.keyword_dir,
                "journal_days": config.journal_days
            })
        );
    } else if output.is_quiet() {
        println!("{}", config.data_dir.display());
    } else {
        println!("Configuration:");
        println!(
            "  user_id:       {}",
            config.user_id.as_deref().unwrap_or("(not set)")
        );
        println!(
            "  api_key:       {}",
            if config.api_key.is_some() {
                "(set)"
            } else {
                "(not set)"
            }
        );
        println!(
            "  api_url:       {}",
            config.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
        );
        println!("  data_dir:      {}", config.data_dir.display());
        println!("  graph_dir:     {}", display_dir(&config.graph_dir));
        println!("  template_dir:  {}", display_dir(&config.template_dir));
        println!("  keyword_dir:   {}", display_dir(&config.keyword_dir));
        println!("  journal_days:  {}", config.journal_days);
        println!();
        println!("Config file: {}", Config::config_file_path().display());
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "user_id" => config.user_id = none_if_empty(&value),
        "api_key" => config.api_key = none_if_empty(&value),
        "api_url" => config.api_url = none_if_empty(&value),
        "data_dir" => config.data_dir = value.clone().into(),
        "graph_dir" => config.graph_dir = none_if_empty(&value).map(PathBuf::from),
        "template_dir" => config.template_dir = none_if_empty(&value).map(PathBuf::from),
        "keyword_dir" => config.keyword_dir = none_if_empty(&value).map(PathBuf::from),
        "journal_days" => {
            config.journal_days = value
                .parse()
                .context("Invalid value for journal_days. Use a whole number of days.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: user_id, api_key, api_url, data_dir, graph_dir, \
                 template_dir, keyword_dir, journal_days",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn display_dir(dir: &Option<PathBuf>) -> String {
    match dir {
        Some(path) => path.display().to_string(),
        None => "(not set)".to_string(),
    }
}

/// `none` or an empty string clears an optional value
fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

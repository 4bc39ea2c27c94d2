//! Configuration commands.
//!
//! - `config show`: Display the current configuration, secrets masked
//! - `config get`: Print one value
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, OutputOptions};
use crate::config::{API_KEY_ENV, BEARER_ENV, CONFIG_KEYS, Config, URL_ENV, is_secret_key};
use crate::error::{PasteleriaError, Result};

/// Reject underscore keys such as `auth_api_key`, suggesting the dotted form.
fn validate_config_key(key: &str) -> Result<&str> {
    if CONFIG_KEYS.contains(&key) {
        return Ok(key);
    }
    if !key.contains('.')
        && let Some(pos) = key.find('_')
    {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        if CONFIG_KEYS.contains(&dot_version.as_str()) {
            return Err(PasteleriaError::Config(format!(
                "invalid config key '{key}'. Use dot notation: '{dot_version}'"
            )));
        }
    }
    Err(PasteleriaError::Config(format!(
        "unknown config key '{}'. Valid keys: {}",
        key,
        CONFIG_KEYS.join(", ")
    )))
}

/// Show only the first and last two characters of a secret.
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn display_value(config: &Config, key: &str) -> Result<Option<String>> {
    let value = config.get(key)?;
    Ok(if is_secret_key(key) {
        value.map(|v| mask_sensitive_value(&v))
    } else {
        value
    })
}

pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let mut values = serde_json::Map::new();
    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    for key in CONFIG_KEYS {
        let value = display_value(&config, key)?;
        let shown = match &value {
            Some(v) => v.clone(),
            None => "not set".dimmed().to_string(),
        };
        text.push_str(&format!("  {}: {}\n", key.cyan(), shown));
        values.insert(key.to_string(), json!(value));
    }

    let overrides: Vec<&str> = [URL_ENV, API_KEY_ENV, BEARER_ENV]
        .into_iter()
        .filter(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty()))
        .collect();
    if !overrides.is_empty() {
        text.push_str(&format!(
            "\n{} {}\n",
            "Environment overrides:".yellow(),
            overrides.join(", ")
        ));
    }

    let path = Config::config_path();
    text.push_str(&format!(
        "\n{}",
        format!("Config file: {}", path.display()).dimmed()
    ));

    let json_output = json!({
        "values": values,
        "env_overrides": overrides,
        "config_file": path.to_string_lossy(),
    });
    CommandOutput::new(json_output).with_text(text).print(output)
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;
    let config = Config::load()?;
    let value = display_value(&config, key)?;

    let text = value.clone().unwrap_or_else(|| "not set".dimmed().to_string());
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(text)
        .print(output)
}

pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if is_secret_key(key) {
        mask_sensitive_value(value.trim())
    } else {
        value.trim().to_string()
    };
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(output)
}

use std::{collections::HashMap, fs};

use checkout::PricePolicy;
use payments::wallet::DEFAULT_SDK_URL;
use tracing::warn;

pub const SETTINGS_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub price_policy: PricePolicy,
    pub wallet_client_id: String,
    pub wallet_currency: String,
    pub wallet_sdk_url: String,
    pub wallet_button_enabled: bool,
    pub session_ttl_seconds: i64,
    pub max_sessions: usize,
    pub max_form_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            price_policy: PricePolicy::Recompute,
            wallet_client_id: "test".into(),
            wallet_currency: "USD".into(),
            wallet_sdk_url: DEFAULT_SDK_URL.into(),
            wallet_button_enabled: false,
            session_ttl_seconds: 3600,
            max_sessions: 10_000,
            max_form_bytes: 16 * 1024,
        }
    }
}

const KEYS: [&str; 9] = [
    "bind_addr",
    "price_policy",
    "wallet_client_id",
    "wallet_currency",
    "wallet_sdk_url",
    "wallet_button_enabled",
    "session_ttl_seconds",
    "max_sessions",
    "max_form_bytes",
];

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(file.as_deref(), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then the environment. A value that
/// fails to parse is skipped and the earlier layer wins.
pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match parse_file(raw) {
            Ok(values) => {
                for (key, value) in values {
                    if !apply(&mut settings, &key, &value) {
                        warn!(%key, %value, file = SETTINGS_FILE, "ignoring setting");
                    }
                }
            }
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("STOREFRONT_BIND") {
        settings.server_bind = v;
    }
    for key in KEYS {
        let name = format!("APP__{}", key.to_ascii_uppercase());
        if let Some(value) = env(&name) {
            if !apply(&mut settings, key, &value) {
                warn!(%name, %value, "ignoring environment setting");
            }
        }
    }

    settings
}

fn parse_file(raw: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    let table = toml::from_str::<toml::Table>(raw)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

fn apply(settings: &mut Settings, key: &str, value: &str) -> bool {
    match key {
        "bind_addr" => settings.server_bind = value.to_string(),
        "price_policy" => match PricePolicy::parse(value) {
            Some(policy) => settings.price_policy = policy,
            None => return false,
        },
        "wallet_client_id" => settings.wallet_client_id = value.to_string(),
        "wallet_currency" => match normalize_currency(value) {
            Some(currency) => settings.wallet_currency = currency,
            None => return false,
        },
        "wallet_sdk_url" => settings.wallet_sdk_url = value.to_string(),
        "wallet_button_enabled" => match value.trim().parse::<bool>() {
            Ok(enabled) => settings.wallet_button_enabled = enabled,
            Err(_) => return false,
        },
        "session_ttl_seconds" => match value.trim().parse::<i64>() {
            Ok(ttl) if ttl > 0 && chrono::Duration::try_seconds(ttl).is_some() => {
                settings.session_ttl_seconds = ttl
            }
            _ => return false,
        },
        "max_sessions" => match value.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => settings.max_sessions = limit,
            _ => return false,
        },
        "max_form_bytes" => match value.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => settings.max_form_bytes = limit,
            _ => return false,
        },
        _ => return false,
    }
    true
}

/// ISO 4217 style: three ASCII letters, stored upper-case.
fn normalize_currency(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.len() == 3 && raw.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(raw.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

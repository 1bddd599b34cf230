use std::sync::Arc;

use anyhow::{anyhow, Context};
use checkout::{CheckoutContext, SessionStore};
use payments::{SimulatedCardProcessor, UnavailableOrderActions, WalletButton, WalletConfig};
use shared::catalog::CATALOG;

use crate::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) checkout: CheckoutContext,
    pub(crate) wallet_script_url: String,
    pub(crate) max_form_bytes: usize,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let wallet_config = WalletConfig {
            client_id: settings.wallet_client_id.clone(),
            currency: settings.wallet_currency.clone(),
            sdk_url: settings.wallet_sdk_url.clone(),
            button_enabled: settings.wallet_button_enabled,
        };
        let wallet_script_url = wallet_config
            .script_url()
            .with_context(|| format!("invalid wallet sdk url '{}'", settings.wallet_sdk_url))?
            .to_string();

        let idle_ttl = chrono::Duration::try_seconds(settings.session_ttl_seconds).ok_or_else(|| {
            anyhow!(
                "session ttl of {} seconds is out of range",
                settings.session_ttl_seconds
            )
        })?;

        let checkout = CheckoutContext {
            catalog: &CATALOG,
            sessions: SessionStore::new(idle_ttl, settings.max_sessions),
            price_policy: settings.price_policy,
            currency: settings.wallet_currency.clone(),
            card: Arc::new(SimulatedCardProcessor),
            wallet: Arc::new(WalletButton::new(
                wallet_config,
                Arc::new(UnavailableOrderActions),
            )),
        };

        Ok(Self {
            checkout,
            wallet_script_url,
            max_form_bytes: settings.max_form_bytes,
        })
    }
}

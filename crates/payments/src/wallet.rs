//! Wrapper around the hosted wallet checkout button.
//!
//! The widget only exposes two interaction points: order creation and order
//! capture after the payer approves. Capture goes through
//! [`WalletOrderActions`] so the approval path can be driven without the
//! widget. While [`WalletConfig::button_enabled`] is false the approval
//! callback is never reached from the storefront.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::domain::PaymentMethod;
use tracing::{info, warn};
use url::Url;

use crate::{PaymentError, PaymentProcessor, PaymentReceipt, PaymentRequest};

pub const DEFAULT_SDK_URL: &str = "https://www.paypal.com/sdk/js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub client_id: String,
    pub currency: String,
    pub sdk_url: String,
    pub button_enabled: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            client_id: "test".into(),
            currency: "USD".into(),
            sdk_url: DEFAULT_SDK_URL.into(),
            button_enabled: false,
        }
    }
}

impl WalletConfig {
    pub fn script_url(&self) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.sdk_url,
            &[
                ("client-id", self.client_id.as_str()),
                ("currency", self.currency.as_str()),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderIntent {
    #[serde(rename = "CAPTURE")]
    Capture,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub currency_code: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub amount: Amount,
}

/// Payload handed to the widget's order-creation hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub intent: OrderIntent,
    pub purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerName {
    pub given_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub name: PayerName,
}

/// The part of the capture response the storefront reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDetails {
    pub payer: Payer,
}

#[async_trait]
pub trait WalletOrderActions: Send + Sync {
    async fn capture(&self) -> Result<CaptureDetails, PaymentError>;
}

/// Stand-in for the widget when its script was never loaded.
#[derive(Debug, Clone, Default)]
pub struct UnavailableOrderActions;

#[async_trait]
impl WalletOrderActions for UnavailableOrderActions {
    async fn capture(&self) -> Result<CaptureDetails, PaymentError> {
        Err(PaymentError::CaptureFailed(
            "wallet widget is not loaded".into(),
        ))
    }
}

#[derive(Clone)]
pub struct WalletButton {
    config: WalletConfig,
    actions: Arc<dyn WalletOrderActions>,
}

impl WalletButton {
    pub fn new(config: WalletConfig, actions: Arc<dyn WalletOrderActions>) -> Self {
        Self { config, actions }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.button_enabled
    }

    pub fn create_order(&self, request: &PaymentRequest) -> CreateOrderRequest {
        CreateOrderRequest {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnit {
                amount: Amount {
                    currency_code: self.config.currency.clone(),
                    value: request.amount.units().to_string(),
                },
            }],
        }
    }

    /// Approval callback: captures the order and reports who paid.
    pub async fn on_approve(
        &self,
        actions: &dyn WalletOrderActions,
    ) -> Result<PaymentReceipt, PaymentError> {
        let details = actions.capture().await?;
        let given_name = details.payer.name.given_name;
        info!(payer = %given_name, "wallet order captured");
        Ok(PaymentReceipt {
            method: PaymentMethod::Wallet,
            notice: format!("Payment successful! Transaction completed by {given_name}"),
            payer_name: Some(given_name),
        })
    }
}

#[async_trait]
impl PaymentProcessor for WalletButton {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Wallet
    }

    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        if !self.config.button_enabled {
            warn!("wallet payment attempted while the button is disabled");
            return Err(PaymentError::ButtonDisabled);
        }
        let order = self.create_order(request);
        info!(
            currency = %self.config.currency,
            units = order.purchase_units.len(),
            description = %request.description,
            "wallet order created"
        );
        self.on_approve(self.actions.as_ref()).await
    }
}

#[cfg(test)]
#[path = "tests/wallet_tests.rs"]
mod tests;

use async_trait::async_trait;
use shared::{catalog::Price, domain::PaymentMethod};
use thiserror::Error;

pub mod card;
pub mod wallet;

pub use card::SimulatedCardProcessor;
pub use wallet::{
    CaptureDetails, CreateOrderRequest, UnavailableOrderActions, WalletButton, WalletConfig,
    WalletOrderActions,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub amount: Price,
    pub currency: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub method: PaymentMethod,
    /// Message shown to the shopper once the payment settles.
    pub notice: String,
    pub payer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("the payment button is disabled")]
    ButtonDisabled,
    #[error("order capture failed: {0}")]
    CaptureFailed(String),
    #[error("payment declined: {0}")]
    Declined(String),
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    fn method(&self) -> PaymentMethod;
    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError>;
}

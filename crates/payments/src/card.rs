use async_trait::async_trait;
use shared::domain::PaymentMethod;
use tracing::info;

use crate::{PaymentError, PaymentProcessor, PaymentReceipt, PaymentRequest};

pub const CARD_NOTICE: &str = "Card payment integration ready!\n\n\
In production, this would:\n\
1. Securely collect card details\n\
2. Process payment through the card processor\n\
3. Confirm your order";

/// Label and placeholder of each card input. The inputs are rendered
/// disabled and never read.
pub const CARD_FIELDS: [(&str, &str); 3] = [
    ("Card Number", "4242 4242 4242 4242"),
    ("Expiry Date", "MM/YY"),
    ("CVC", "123"),
];

/// Card flow that settles every payment without contacting anyone.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCardProcessor;

#[async_trait]
impl PaymentProcessor for SimulatedCardProcessor {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        info!(
            amount = %request.amount,
            currency = %request.currency,
            description = %request.description,
            "simulated card payment"
        );
        Ok(PaymentReceipt {
            method: PaymentMethod::Card,
            notice: CARD_NOTICE.to_string(),
            payer_name: None,
        })
    }
}

//! Checkout wizard state machine.
//!
//! A session starts collecting delivery details, moves to payment once the
//! delivery form is accepted, and ends in `OrderComplete` after a payment
//! processor reports success. Nothing leaves `OrderComplete`.

use chrono::{DateTime, Utc};
use payments::{PaymentError, PaymentProcessor, PaymentReceipt};
use shared::{
    domain::{CheckoutId, CheckoutState, CheckoutTab, DeliveryInfo, PaymentMethod},
    error::{ApiError, ErrorCode},
    protocol::{CheckoutSnapshot, OrderConfirmation},
};
use tracing::info;

use crate::pricing::ResolvedOrder;

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: CheckoutId,
    order: ResolvedOrder,
    delivery: DeliveryInfo,
    delivery_accepted: bool,
    state: CheckoutState,
    payment_method: PaymentMethod,
    receipt: Option<PaymentReceipt>,
    opened_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(id: CheckoutId, order: ResolvedOrder, opened_at: DateTime<Utc>) -> Self {
        Self {
            id,
            order,
            delivery: DeliveryInfo::default(),
            delivery_accepted: false,
            state: CheckoutState::CollectingDelivery,
            payment_method: PaymentMethod::default(),
            receipt: None,
            opened_at,
        }
    }

    pub fn id(&self) -> CheckoutId {
        self.id
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn delivery(&self) -> &DeliveryInfo {
        &self.delivery
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Stores the submitted form and advances to payment when every field
    /// is filled. On failure the entered values are kept for re-display.
    pub fn submit_delivery(&mut self, info: DeliveryInfo) -> Result<(), ApiError> {
        self.expect_state(CheckoutState::CollectingDelivery, "submit delivery details")?;
        self.delivery = info;

        let missing = self.delivery.missing_fields();
        if !missing.is_empty() {
            self.delivery_accepted = false;
            let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            return Err(ApiError::validation(format!(
                "please fill in: {}",
                labels.join(", ")
            )));
        }

        self.delivery_accepted = true;
        self.state = CheckoutState::CollectingPayment;
        info!(checkout_id = %self.id, "delivery details accepted");
        Ok(())
    }

    pub fn can_show_payment(&self) -> bool {
        self.delivery_accepted && self.delivery.is_complete()
    }

    pub fn show_tab(&mut self, tab: CheckoutTab) -> Result<(), ApiError> {
        if self.state.is_terminal() {
            return Err(completed());
        }
        match tab {
            CheckoutTab::Delivery => {
                self.state = CheckoutState::CollectingDelivery;
                Ok(())
            }
            CheckoutTab::Payment if self.can_show_payment() => {
                self.state = CheckoutState::CollectingPayment;
                Ok(())
            }
            CheckoutTab::Payment => Err(ApiError::invalid_transition(
                "delivery details must be submitted before payment",
            )),
        }
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), ApiError> {
        self.expect_state(CheckoutState::CollectingPayment, "choose a payment method")?;
        self.payment_method = method;
        Ok(())
    }

    /// Runs the selected payment method. Only the processor for the selected
    /// panel is accepted. A failed payment leaves the session on the
    /// payment step.
    pub async fn pay(
        &mut self,
        processor: &dyn PaymentProcessor,
        currency: &str,
    ) -> Result<PaymentReceipt, ApiError> {
        self.expect_state(CheckoutState::CollectingPayment, "pay")?;
        if processor.method() != self.payment_method {
            return Err(ApiError::invalid_transition(format!(
                "{} is not the selected payment method",
                processor.method().label()
            )));
        }

        let request = self.order.payment_request(currency);
        let receipt = processor.pay(&request).await.map_err(payment_error)?;

        self.state = CheckoutState::OrderComplete;
        self.receipt = Some(receipt.clone());
        info!(
            checkout_id = %self.id,
            method = self.payment_method.as_str(),
            amount = %self.order.price,
            "order complete"
        );
        Ok(receipt)
    }

    pub fn confirmation(&self) -> Option<OrderConfirmation> {
        if self.state != CheckoutState::OrderComplete {
            return None;
        }
        let receipt = self.receipt.as_ref()?;
        Some(OrderConfirmation {
            summary: self.order.summary(),
            email: self.delivery.email.clone(),
            payment_method: receipt.method,
            notice: receipt.notice.clone(),
            payer_name: receipt.payer_name.clone(),
        })
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot {
            checkout_id: self.id,
            state: self.state,
            summary: self.order.summary(),
            delivery: self.delivery.clone(),
            delivery_accepted: self.delivery_accepted,
            payment_method: self.payment_method,
            confirmation: self.confirmation(),
            opened_at: self.opened_at,
        }
    }

    fn expect_state(&self, expected: CheckoutState, action: &str) -> Result<(), ApiError> {
        if self.state == expected {
            return Ok(());
        }
        if self.state.is_terminal() {
            return Err(completed());
        }
        Err(ApiError::invalid_transition(format!(
            "cannot {action} while {:?}",
            self.state
        )))
    }
}

fn completed() -> ApiError {
    ApiError::invalid_transition("order is already complete")
}

fn payment_error(err: PaymentError) -> ApiError {
    let code = match err {
        PaymentError::ButtonDisabled => ErrorCode::PaymentUnavailable,
        PaymentError::CaptureFailed(_) | PaymentError::Declined(_) => ErrorCode::PaymentDeclined,
    };
    ApiError::new(code, err.to_string())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

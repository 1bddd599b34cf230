use std::sync::Arc;

use payments::{PaymentProcessor, WalletButton};
use shared::{
    catalog::Catalog,
    domain::{CheckoutId, CheckoutTab, DeliveryInfo, PaymentMethod},
    error::ApiError,
    protocol::{CheckoutQuery, CheckoutSnapshot},
};
use tracing::info;

pub mod pricing;
pub mod selector;
pub mod session;
pub mod store;

pub use pricing::{resolve_order, PricePolicy, ResolvedOrder};
pub use selector::{SelectionSummary, Selector, SELECTION_INCOMPLETE};
pub use session::CheckoutSession;
pub use store::SessionStore;

#[derive(Clone)]
pub struct CheckoutContext {
    pub catalog: &'static Catalog,
    pub sessions: SessionStore,
    pub price_policy: PricePolicy,
    pub currency: String,
    pub card: Arc<dyn PaymentProcessor>,
    pub wallet: Arc<WalletButton>,
}

impl CheckoutContext {
    pub fn processor_for(&self, method: PaymentMethod) -> Arc<dyn PaymentProcessor> {
        match method {
            PaymentMethod::Card => Arc::clone(&self.card),
            PaymentMethod::Wallet => self.wallet.clone() as Arc<dyn PaymentProcessor>,
        }
    }
}

pub async fn begin_checkout(
    ctx: &CheckoutContext,
    query: &CheckoutQuery,
) -> Result<CheckoutSnapshot, ApiError> {
    let order = resolve_order(ctx.catalog, query, ctx.price_policy)?;
    let id = ctx.sessions.open(order).await;
    info!(
        checkout_id = %id,
        size = order.size.id,
        flavor = order.flavor.id,
        price = order.price.units(),
        "checkout opened"
    );
    checkout_snapshot(ctx, id).await
}

pub async fn checkout_snapshot(
    ctx: &CheckoutContext,
    id: CheckoutId,
) -> Result<CheckoutSnapshot, ApiError> {
    let session = ctx.sessions.get(id).await?;
    let session = session.lock().await;
    Ok(session.snapshot())
}

pub async fn submit_delivery(
    ctx: &CheckoutContext,
    id: CheckoutId,
    info: DeliveryInfo,
) -> Result<CheckoutSnapshot, ApiError> {
    let session = ctx.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.submit_delivery(info)?;
    Ok(session.snapshot())
}

pub async fn show_tab(
    ctx: &CheckoutContext,
    id: CheckoutId,
    tab: CheckoutTab,
) -> Result<CheckoutSnapshot, ApiError> {
    let session = ctx.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.show_tab(tab)?;
    Ok(session.snapshot())
}

pub async fn select_payment_method(
    ctx: &CheckoutContext,
    id: CheckoutId,
    method: PaymentMethod,
) -> Result<CheckoutSnapshot, ApiError> {
    let session = ctx.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.select_payment_method(method)?;
    Ok(session.snapshot())
}

/// Pays with whichever method the session currently has selected.
pub async fn pay(ctx: &CheckoutContext, id: CheckoutId) -> Result<CheckoutSnapshot, ApiError> {
    let session = ctx.sessions.get(id).await?;
    let mut session = session.lock().await;
    let processor = ctx.processor_for(session.payment_method());
    session.pay(processor.as_ref(), &ctx.currency).await?;
    Ok(session.snapshot())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

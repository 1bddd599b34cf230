use std::sync::Arc;

use async_trait::async_trait;
use checkout::{
    begin_checkout, pay, select_payment_method, submit_delivery, CheckoutContext, PricePolicy,
    Selector, SessionStore,
};
use chrono::Duration;
use payments::{
    CaptureDetails, PaymentError, SimulatedCardProcessor, WalletButton, WalletConfig,
    WalletOrderActions,
};
use shared::{
    catalog::CATALOG,
    domain::{CheckoutState, DeliveryInfo, PaymentMethod},
    protocol::CheckoutQuery,
};

struct ApprovingWallet;

#[async_trait]
impl WalletOrderActions for ApprovingWallet {
    async fn capture(&self) -> Result<CaptureDetails, PaymentError> {
        capture_details("Linus")
    }
}

fn capture_details(given_name: &str) -> Result<CaptureDetails, PaymentError> {
    Ok(CaptureDetails {
        payer: payments::wallet::Payer {
            name: payments::wallet::PayerName {
                given_name: given_name.into(),
            },
        },
    })
}

fn context(wallet: WalletConfig) -> CheckoutContext {
    CheckoutContext {
        catalog: &CATALOG,
        sessions: SessionStore::new(Duration::seconds(600), 100),
        price_policy: PricePolicy::Recompute,
        currency: wallet.currency.clone(),
        card: Arc::new(SimulatedCardProcessor),
        wallet: Arc::new(WalletButton::new(wallet, Arc::new(ApprovingWallet))),
    }
}

fn delivery() -> DeliveryInfo {
    DeliveryInfo {
        name: "Margaret Hamilton".into(),
        email: "margaret@example.com".into(),
        phone: "555-0111".into(),
        address: "11 Apollo Rd".into(),
        city: "Cambridge".into(),
        state: "MA".into(),
        zip: "02139".into(),
    }
}

#[tokio::test]
async fn selector_to_confirmation_and_back_to_an_empty_selector() {
    let ctx = context(WalletConfig::default());

    let mut selector = Selector::new(&CATALOG);
    selector.select_size("large").expect("size");
    selector.select_flavor("blueberry").expect("flavor");
    let query = selector.attempt_order().expect("order");
    assert_eq!(
        query.checkout_path(),
        "/checkout?size=large&flavor=blueberry&price=45"
    );

    let id = begin_checkout(&ctx, &query).await.expect("checkout").checkout_id;
    submit_delivery(&ctx, id, delivery()).await.expect("delivery");
    let snapshot = pay(&ctx, id).await.expect("paid");
    assert_eq!(snapshot.state, CheckoutState::OrderComplete);

    let confirmation = snapshot.confirmation.expect("confirmation");
    assert_eq!(confirmation.summary.size_name, "10 inch (Serves 12-15)");
    assert_eq!(confirmation.summary.flavor_name, "Blueberry Delight");
    assert_eq!(confirmation.summary.price.to_string(), "$45.00");

    selector.reset();
    assert!(selector.selection().is_empty());
}

#[tokio::test]
async fn enabled_wallet_button_completes_through_capture() {
    let ctx = context(WalletConfig {
        button_enabled: true,
        ..WalletConfig::default()
    });
    let query = CheckoutQuery {
        size: "medium".into(),
        flavor: "strawberry".into(),
        price: "35".into(),
    };
    let id = begin_checkout(&ctx, &query).await.expect("checkout").checkout_id;
    submit_delivery(&ctx, id, delivery()).await.expect("delivery");
    select_payment_method(&ctx, id, PaymentMethod::Wallet)
        .await
        .expect("wallet");

    let snapshot = pay(&ctx, id).await.expect("paid");
    let confirmation = snapshot.confirmation.expect("confirmation");
    assert_eq!(confirmation.payer_name.as_deref(), Some("Linus"));
    assert_eq!(
        confirmation.notice,
        "Payment successful! Transaction completed by Linus"
    );
}

use super::*;
use axum::{
    body::{self, Body},
    http::{header, Request},
};
use crate::config::Settings;
use shared::{catalog::CATALOG, domain::CheckoutState};
use tower::ServiceExt;

fn test_app_with(settings: Settings) -> Router {
    let state = AppState::from_settings(&settings).expect("state");
    build_router(Arc::new(state))
}

fn test_app() -> Router {
    test_app_with(Settings::default())
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii")
        .to_string()
}

async fn open(app: &Router, query: &str) -> String {
    let response = app
        .clone()
        .oneshot(get_request(&format!("/checkout?{query}")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
}

const DELIVERY_FORM: &str = "name=Ada+Lovelace&email=ada%40example.com&phone=555-0100\
&address=1+Analytical+Way&city=London&state=LDN&zip=00001";

#[tokio::test]
async fn healthz_reports_ok() {
    let response = test_app()
        .oneshot(get_request("/healthz"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn shop_page_starts_with_an_empty_selection() {
    let response = test_app().oneshot(get_request("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Build Your Perfect Cheesecake"));
    assert!(html.contains("Select a size..."));
    assert!(html.contains("6 inch (Serves 4-6) - $25"));
    assert!(html.contains("Cookies &amp; Cream"));
    assert!(!html.contains("Your Selection:"));
    assert!(!html.contains(" selected>"));
}

#[tokio::test]
async fn shop_page_summarizes_a_selection_from_the_query() {
    let response = test_app()
        .oneshot(get_request("/?size=medium&flavor=strawberry"))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains("Your Selection:"));
    assert!(html.contains("8 inch (Serves 8-10)"));
    assert!(html.contains("Fresh strawberries with cream cheese"));
    assert!(html.contains("Total: $35.00"));
}

#[tokio::test]
async fn every_order_redirects_with_the_catalog_price() {
    let app = test_app();
    for size in CATALOG.sizes() {
        for flavor in CATALOG.flavors() {
            let response = app
                .clone()
                .oneshot(form_post(
                    "/order",
                    &format!("size={}&flavor={}", size.id, flavor.id),
                ))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(
                location(&response),
                format!(
                    "/checkout?size={}&flavor={}&price={}",
                    size.id,
                    flavor.id,
                    size.unit_price.units()
                )
            );
        }
    }
}

#[tokio::test]
async fn incomplete_order_shows_warning_without_redirect() {
    let app = test_app();
    for body in ["size=&flavor=", "size=large&flavor=", "flavor=oreo"] {
        let response = app
            .clone()
            .oneshot(form_post("/order", body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(response.headers().get(header::LOCATION).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Please select both a size and flavor"));
    }
}

#[tokio::test]
async fn incomplete_order_keeps_the_chosen_size() {
    let response = test_app()
        .oneshot(form_post("/order", "size=large&flavor="))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains("<option value=\"large\" selected>"));
}

#[tokio::test]
async fn checkout_summary_uses_catalog_display_names() {
    let app = test_app();
    let checkout = open(&app, "size=medium&flavor=chocolate&price=35").await;
    assert!(checkout.starts_with("/checkout/"));

    let response = app
        .oneshot(get_request(&checkout))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("8 inch (Serves 8-10)"));
    assert!(html.contains("Triple Chocolate"));
    assert!(html.contains("$35.00"));
    assert!(html.contains("Delivery Details"));
    assert!(html.contains("2. Payment</button>") && html.contains(" disabled>2. Payment"));
}

#[tokio::test]
async fn unknown_ids_are_refused() {
    let app = test_app();
    for query in ["size=huge&flavor=chocolate&price=35", "size=small&flavor=&price=25", ""] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/checkout?{query}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{query}");
        let html = body_text(response).await;
        assert!(html.contains("Return to the shop"));
    }
}

#[tokio::test]
async fn tampered_price_is_recomputed_by_default() {
    let app = test_app();
    let checkout = open(&app, "size=large&flavor=oreo&price=1").await;
    let html = body_text(app.oneshot(get_request(&checkout)).await.expect("response")).await;
    assert!(html.contains("$45.00"));
    assert!(!html.contains("$1.00"));
}

#[tokio::test]
async fn trust_policy_displays_query_price() {
    let app = test_app_with(Settings {
        price_policy: checkout::PricePolicy::TrustQuery,
        ..Settings::default()
    });
    let checkout = open(&app, "size=large&flavor=oreo&price=1").await;
    let html = body_text(app.oneshot(get_request(&checkout)).await.expect("response")).await;
    assert!(html.contains("Total: $1.00"));
}

#[tokio::test]
async fn delivery_with_missing_field_is_rejected_and_redisplayed() {
    let app = test_app();
    let checkout = open(&app, "size=small&flavor=classic&price=25").await;

    let response = app
        .clone()
        .oneshot(form_post(
            &format!("{checkout}/delivery"),
            "name=%3Cb%3EAda%3C%2Fb%3E&email=ada%40example.com&phone=\
&address=x&city=y&state=z&zip=1",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Phone"));
    assert!(html.contains("value=\"&lt;b&gt;Ada&lt;/b&gt;\""));
    assert!(!html.contains("<b>Ada</b>"));

    let api = app
        .oneshot(get_request(&format!("/api{checkout}")))
        .await
        .expect("response");
    let snapshot: CheckoutSnapshot =
        serde_json::from_str(&body_text(api).await).expect("snapshot");
    assert_eq!(snapshot.state, CheckoutState::CollectingDelivery);
}

#[tokio::test]
async fn card_flow_reaches_confirmation() {
    let app = test_app();
    let checkout = open(&app, "size=medium&flavor=chocolate&price=35").await;

    let response = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/delivery"), DELIVERY_FORM))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), checkout);

    let html = body_text(
        app.clone()
            .oneshot(get_request(&checkout))
            .await
            .expect("response"),
    )
    .await;
    assert!(html.contains("Payment Method"));
    assert!(html.contains("4242 4242 4242 4242"));
    assert!(html.contains("Pay $35.00 with Card"));

    let response = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/pay"), ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(
        app.clone()
            .oneshot(get_request(&checkout))
            .await
            .expect("response"),
    )
    .await;
    assert!(html.contains("Order Confirmed!"));
    assert!(html.contains("8 inch (Serves 8-10) - Triple Chocolate"));
    assert!(html.contains("$35.00"));
    assert!(html.contains("confirmation email at ada@example.com"));
    assert!(html.contains("Card payment integration ready!"));
    assert!(html.contains("<a href=\"/\">Order Another Cheesecake</a>"));

    let again = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/pay"), ""))
        .await
        .expect("response");
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let shop = body_text(app.oneshot(get_request("/")).await.expect("response")).await;
    assert!(!shop.contains("Your Selection:"));
}

#[tokio::test]
async fn second_delivery_submission_conflicts() {
    let app = test_app();
    let checkout = open(&app, "size=small&flavor=oreo&price=25").await;
    let first = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/delivery"), DELIVERY_FORM))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    let second = app
        .oneshot(form_post(&format!("{checkout}/delivery"), DELIVERY_FORM))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn disabled_wallet_button_cannot_pay() {
    let app = test_app();
    let checkout = open(&app, "size=small&flavor=caramel&price=25").await;
    app.clone()
        .oneshot(form_post(&format!("{checkout}/delivery"), DELIVERY_FORM))
        .await
        .expect("delivery");
    let response = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/payment-method"), "method=wallet"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(
        app.clone()
            .oneshot(get_request(&checkout))
            .await
            .expect("response"),
    )
    .await;
    assert!(html.contains("client-id=test&amp;currency=USD"));
    assert!(html.contains("<button type=\"submit\" disabled>Pay with PayPal</button>"));

    let response = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/pay"), ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let html = body_text(response).await;
    assert!(html.contains("the payment button is disabled"));
}

#[tokio::test]
async fn payment_tab_is_locked_until_delivery_is_accepted() {
    let app = test_app();
    let checkout = open(&app, "size=small&flavor=classic&price=25").await;
    let response = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/tab"), "tab=payment"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.clone()
        .oneshot(form_post(&format!("{checkout}/delivery"), DELIVERY_FORM))
        .await
        .expect("delivery");
    let back = app
        .clone()
        .oneshot(form_post(&format!("{checkout}/tab"), "tab=delivery"))
        .await
        .expect("response");
    assert_eq!(back.status(), StatusCode::SEE_OTHER);
    let html = body_text(app.oneshot(get_request(&checkout)).await.expect("response")).await;
    assert!(html.contains("value=\"Ada Lovelace\""));
}

#[tokio::test]
async fn unknown_checkout_id_is_not_found() {
    let app = test_app();
    let missing = CheckoutId::new_v4();
    let response = app
        .clone()
        .oneshot(get_request(&format!("/checkout/{missing}")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let api = app
        .oneshot(get_request(&format!("/api/checkout/{missing}")))
        .await
        .expect("response");
    assert_eq!(api.status(), StatusCode::NOT_FOUND);
    let err: ApiError = serde_json::from_str(&body_text(api).await).expect("json");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn catalog_api_lists_sizes_and_flavors() {
    let response = test_app()
        .oneshot(get_request("/api/catalog"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(json["sizes"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["flavors"].as_array().map(Vec::len), Some(6));
    assert_eq!(json["sizes"][2]["unit_price"], 45);
}

#[tokio::test]
async fn oversized_form_is_rejected() {
    let app = test_app_with(Settings {
        max_form_bytes: 64,
        ..Settings::default()
    });
    let body = format!("size={}&flavor=oreo", "x".repeat(256));
    let request = Request::post("/order")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[test]
fn out_of_range_session_ttl_fails_startup_cleanly() {
    let settings = Settings {
        session_ttl_seconds: i64::MAX,
        ..Settings::default()
    };
    let err = AppState::from_settings(&settings)
        .err()
        .expect("ttl rejected");
    assert!(err.to_string().contains("out of range"), "{err}");
}

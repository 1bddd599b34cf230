use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use checkout::{
    begin_checkout, checkout_snapshot, pay, select_payment_method, show_tab, submit_delivery,
    Selector,
};
use shared::{
    catalog::Catalog,
    domain::{CheckoutId, DeliveryInfo},
    error::{ApiError, ErrorCode},
    protocol::{CheckoutQuery, CheckoutSnapshot, OrderRequest, PaymentMethodForm, TabForm},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod pages;

use app_state::AppState;
use config::load_settings;
use pages::WalletPanel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let state = AppState::from_settings(&settings).map_err(|error| {
        error!(%error, "failed to build storefront state");
        error
    })?;
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(
        %addr,
        price_policy = ?settings.price_policy,
        wallet_button_enabled = settings.wallet_button_enabled,
        "storefront listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let max_form_bytes = state.max_form_bytes;
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(home))
        .route("/order", post(place_order))
        .route("/checkout", get(open_checkout))
        .route("/checkout/:checkout_id", get(view_checkout))
        .route("/checkout/:checkout_id/delivery", post(http_submit_delivery))
        .route("/checkout/:checkout_id/tab", post(http_show_tab))
        .route(
            "/checkout/:checkout_id/payment-method",
            post(http_select_payment_method),
        )
        .route("/checkout/:checkout_id/pay", post(http_pay))
        .route("/api/catalog", get(api_catalog))
        .route("/api/checkout/:checkout_id", get(api_checkout))
        .layer(RequestBodyLimitLayer::new(max_form_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InvalidTransition | ErrorCode::PaymentUnavailable => StatusCode::CONFLICT,
        ErrorCode::PaymentDeclined => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ApiError) -> Response {
    let status = status_for(err.code);
    (status, Html(pages::error_page(status, &err.message))).into_response()
}

fn checkout_location(id: CheckoutId) -> String {
    format!("/checkout/{id}")
}

/// Builds a selector from the shop form, skipping ids the catalog does not
/// know so the page can still render.
fn lenient_selector(catalog: &'static Catalog, request: &OrderRequest) -> Selector {
    let mut selector = Selector::new(catalog);
    if let Err(err) = selector.select_size(request.size().unwrap_or_default()) {
        warn!(error = %err.message, "ignoring size");
    }
    if let Err(err) = selector.select_flavor(request.flavor().unwrap_or_default()) {
        warn!(error = %err.message, "ignoring flavor");
    }
    selector
}

async fn home(State(state): State<Arc<AppState>>, Query(q): Query<OrderRequest>) -> Html<String> {
    let catalog = state.checkout.catalog;
    let selector = lenient_selector(catalog, &q);
    Html(pages::home_page(catalog, &selector, None))
}

async fn place_order(
    State(state): State<Arc<AppState>>,
    Form(req): Form<OrderRequest>,
) -> Response {
    let catalog = state.checkout.catalog;
    let attempt =
        Selector::from_request(catalog, &req).and_then(|selector| selector.attempt_order());
    match attempt {
        Ok(query) => {
            info!(size = %query.size, flavor = %query.flavor, "order placed");
            Redirect::to(&query.checkout_path()).into_response()
        }
        Err(err) => {
            let selector = lenient_selector(catalog, &req);
            let status = status_for(err.code);
            (status, Html(pages::home_page(catalog, &selector, Some(&err.message)))).into_response()
        }
    }
}

async fn open_checkout(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CheckoutQuery>,
) -> Response {
    match begin_checkout(&state.checkout, &query).await {
        Ok(snapshot) => Redirect::to(&checkout_location(snapshot.checkout_id)).into_response(),
        Err(err) => {
            warn!(
                size = %query.size,
                flavor = %query.flavor,
                error = %err.message,
                "checkout refused"
            );
            error_response(err)
        }
    }
}

fn render_checkout(
    state: &AppState,
    snapshot: &CheckoutSnapshot,
    error: Option<&str>,
) -> Html<String> {
    let wallet = WalletPanel {
        script_url: &state.wallet_script_url,
        button_enabled: state.checkout.wallet.is_enabled(),
    };
    Html(pages::checkout_page(snapshot, &wallet, error))
}

async fn view_checkout(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<CheckoutId>,
) -> Response {
    match checkout_snapshot(&state.checkout, checkout_id).await {
        Ok(snapshot) => render_checkout(&state, &snapshot, None).into_response(),
        Err(err) => error_response(err),
    }
}

/// Redirects back to the checkout after a successful step, or re-renders the
/// current step with the error.
async fn after_step(
    state: &AppState,
    checkout_id: CheckoutId,
    result: Result<CheckoutSnapshot, ApiError>,
) -> Response {
    let err = match result {
        Ok(_) => return Redirect::to(&checkout_location(checkout_id)).into_response(),
        Err(err) => err,
    };
    if err.code == ErrorCode::NotFound {
        return error_response(err);
    }
    match checkout_snapshot(&state.checkout, checkout_id).await {
        Ok(snapshot) => (
            status_for(err.code),
            render_checkout(state, &snapshot, Some(&err.message)),
        )
            .into_response(),
        Err(other) => error_response(other),
    }
}

async fn http_submit_delivery(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<CheckoutId>,
    Form(info): Form<DeliveryInfo>,
) -> Response {
    let result = submit_delivery(&state.checkout, checkout_id, info).await;
    after_step(&state, checkout_id, result).await
}

async fn http_show_tab(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<CheckoutId>,
    Form(form): Form<TabForm>,
) -> Response {
    let result = show_tab(&state.checkout, checkout_id, form.tab).await;
    after_step(&state, checkout_id, result).await
}

async fn http_select_payment_method(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<CheckoutId>,
    Form(form): Form<PaymentMethodForm>,
) -> Response {
    let result = select_payment_method(&state.checkout, checkout_id, form.method).await;
    after_step(&state, checkout_id, result).await
}

async fn http_pay(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<CheckoutId>,
) -> Response {
    let result = pay(&state.checkout, checkout_id).await;
    after_step(&state, checkout_id, result).await
}

async fn api_catalog(State(state): State<Arc<AppState>>) -> Json<&'static Catalog> {
    Json(state.checkout.catalog)
}

async fn api_checkout(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<CheckoutId>,
) -> Result<Json<CheckoutSnapshot>, (StatusCode, Json<ApiError>)> {
    checkout_snapshot(&state.checkout, checkout_id)
        .await
        .map(Json)
        .map_err(|e| (status_for(e.code), Json(e)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

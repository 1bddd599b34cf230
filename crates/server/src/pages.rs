//! Server-rendered HTML for the shop, checkout and confirmation screens.
//!
//! Every string that did not come from a literal in this file goes through
//! [`escape`] before it is written into markup.

use axum::http::StatusCode;
use checkout::Selector;
use payments::card::CARD_FIELDS;
use shared::{
    catalog::Catalog,
    domain::{CheckoutState, DeliveryField, PaymentMethod},
    protocol::{CheckoutSnapshot, OrderConfirmation},
};

pub(crate) const SHOP_NAME: &str = "Baker Mayfield's Cheesecakes";

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#fff7ed;color:#1f2937}\
header{background:#92400e;color:#fff;padding:1.5rem;text-align:center}\
header a{color:#fff;text-decoration:none;font-weight:bold}\
main{max-width:56rem;margin:0 auto;padding:2rem 1rem}\
.card{background:#fff;border-radius:1rem;box-shadow:0 4px 12px rgba(0,0,0,.1);padding:1.5rem;margin-bottom:2rem}\
.alert{background:#fef3c7;border:2px solid #f59e0b;border-radius:.5rem;padding:1rem;margin-bottom:1rem}\
.error{background:#fee2e2;border-color:#ef4444}\
.notice{white-space:pre-line}\
.tabs{display:flex;gap:.5rem}.tabs form{flex:1}.tabs button{width:100%}\
.active{background:#d97706;color:#fff}\
.muted{color:#6b7280;font-size:.875rem}\
.not-ready{opacity:.6}\
label{display:block;font-weight:600;margin:.75rem 0 .25rem}\
input,select{width:100%;padding:.6rem;box-sizing:border-box}\
button{padding:.8rem 1.5rem;font-weight:bold;border-radius:.5rem;border:0;cursor:pointer}\
button[disabled]{cursor:not-allowed;opacity:.5}\
.features{display:grid;grid-template-columns:repeat(3,1fr);gap:1rem}\
footer{background:#78350f;color:#fff;text-align:center;padding:2rem}";

pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<meta name=\"description\" content=\"Delicious handmade cheesecakes, baked with love\">\
<title>{title}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        title = escape(title),
    )
}

fn alert(message: &str, class: &str) -> String {
    format!(
        "<div class=\"alert {class}\" role=\"alert\">{}</div>",
        escape(message)
    )
}

pub(crate) fn home_page(catalog: &Catalog, selector: &Selector, warning: Option<&str>) -> String {
    let selection = selector.selection();
    let chosen_size = selection.size_id.as_deref().unwrap_or_default();
    let chosen_flavor = selection.flavor_id.as_deref().unwrap_or_default();

    let mut size_options = String::from("<option value=\"\">Select a size...</option>");
    for size in catalog.sizes() {
        size_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{name} - ${price}</option>",
            id = escape(size.id),
            selected = selected_attr(size.id == chosen_size),
            name = escape(size.display_name),
            price = size.unit_price.units(),
        ));
    }

    let mut flavor_options = String::from("<option value=\"\">Select a flavor...</option>");
    for flavor in catalog.flavors() {
        flavor_options.push_str(&format!(
            "<option value=\"{id}\"{selected}>{name}</option>",
            id = escape(flavor.id),
            selected = selected_attr(flavor.id == chosen_flavor),
            name = escape(flavor.display_name),
        ));
    }

    let summary = selector.summary();
    let mut summary_html = String::new();
    if !summary.is_empty() {
        summary_html.push_str("<div class=\"alert\" id=\"selection\"><h3>Your Selection:</h3>");
        if let Some(size) = summary.size {
            summary_html.push_str(&format!(
                "<p><strong>Size:</strong> {}</p>",
                escape(size.display_name)
            ));
        }
        if let Some(flavor) = summary.flavor {
            summary_html.push_str(&format!(
                "<p><strong>Flavor:</strong> {}<br><span class=\"muted\">{}</span></p>",
                escape(flavor.display_name),
                escape(flavor.description)
            ));
        }
        if let Some(total) = summary.total() {
            summary_html.push_str(&format!("<p><strong>Total: {total}</strong></p>"));
        }
        summary_html.push_str("</div>");
    }

    let warning_html = warning.map(|w| alert(w, "error")).unwrap_or_default();
    let ready_class = if selector.can_order() { "" } else { " class=\"not-ready\"" };

    let body = format!(
        "<header><h1>🍰 {shop}</h1><p>Handmade with Love &amp; Quality Ingredients</p></header>\
<main>\
<div style=\"text-align:center\"><h2>Premium Cheesecakes Delivered to Your Door</h2>\
<p>Experience the perfect blend of creamy texture and rich flavors. \
Each cheesecake is made fresh to order with the finest ingredients.</p></div>\
<section class=\"card\"><h2>Build Your Perfect Cheesecake</h2>{warning_html}\
<form method=\"post\" action=\"/order\">\
<label for=\"size\">1. Choose Your Size</label><select id=\"size\" name=\"size\">{size_options}</select>\
<label for=\"flavor\">2. Pick Your Flavor</label><select id=\"flavor\" name=\"flavor\">{flavor_options}</select>\
{summary_html}\
<p><button type=\"submit\" formmethod=\"get\" formaction=\"/\">Update Selection</button> \
<button type=\"submit\"{ready_class}>Proceed to Checkout</button></p>\
</form></section>\
<section class=\"features\">\
<div class=\"card\"><h3>👨‍🍳 Handmade</h3><p>Each cheesecake is crafted with care and attention to detail</p></div>\
<div class=\"card\"><h3>🌟 Premium Quality</h3><p>Only the finest ingredients make it into our cheesecakes</p></div>\
<div class=\"card\"><h3>🚚 Fast Delivery</h3><p>Fresh delivery right to your doorstep</p></div>\
</section></main>\
<footer><p>&copy; {shop}. All rights reserved.</p><p>Made with ❤️ and the finest ingredients</p></footer>",
        shop = escape(SHOP_NAME),
    );
    layout(SHOP_NAME, &body)
}

fn selected_attr(selected: bool) -> &'static str {
    if selected {
        " selected"
    } else {
        ""
    }
}

/// Wallet widget settings needed to render its panel.
pub(crate) struct WalletPanel<'a> {
    pub(crate) script_url: &'a str,
    pub(crate) button_enabled: bool,
}

pub(crate) fn checkout_page(
    snapshot: &CheckoutSnapshot,
    wallet: &WalletPanel<'_>,
    error: Option<&str>,
) -> String {
    if let Some(confirmation) = &snapshot.confirmation {
        return confirmation_page(confirmation);
    }

    let base = format!("/checkout/{}", snapshot.checkout_id);
    let summary = &snapshot.summary;
    let error_html = error.map(|e| alert(e, "error")).unwrap_or_default();

    let on_delivery = snapshot.state == CheckoutState::CollectingDelivery;
    let payment_locked = !snapshot.delivery_accepted;
    let tabs = format!(
        "<nav class=\"tabs\">\
<form method=\"post\" action=\"{base}/tab\"><input type=\"hidden\" name=\"tab\" value=\"delivery\">\
<button type=\"submit\"{delivery_class}>1. Delivery Information</button></form>\
<form method=\"post\" action=\"{base}/tab\"><input type=\"hidden\" name=\"tab\" value=\"payment\">\
<button type=\"submit\"{payment_class}{payment_disabled}>2. Payment</button></form></nav>",
        delivery_class = active_class(on_delivery),
        payment_class = active_class(!on_delivery),
        payment_disabled = if payment_locked { " disabled" } else { "" },
    );

    let step = if on_delivery {
        delivery_form(snapshot, &base)
    } else {
        payment_panel(snapshot, &base, wallet)
    };

    let body = format!(
        "<header><a href=\"/\">← Back to Shop</a></header><main><h1>Checkout</h1>\
<section class=\"card\"><h2>Order Summary</h2>\
<p><strong>Size:</strong> {size}</p><p><strong>Flavor:</strong> {flavor}</p>\
<p><strong>Total: {price}</strong></p></section>\
<section class=\"card\">{error_html}{tabs}{step}</section></main>",
        size = escape(&summary.size_name),
        flavor = escape(&summary.flavor_name),
        price = summary.price,
    );
    layout(&format!("Checkout - {SHOP_NAME}"), &body)
}

fn active_class(active: bool) -> &'static str {
    if active {
        " class=\"active\""
    } else {
        ""
    }
}

fn delivery_form(snapshot: &CheckoutSnapshot, base: &str) -> String {
    let mut fields = String::new();
    for field in DeliveryField::ALL {
        fields.push_str(&format!(
            "<label for=\"{name}\">{label} *</label>\
<input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\" required>",
            name = field.name(),
            label = field.label(),
            kind = field.input_type(),
            value = escape(snapshot.delivery.get(field)),
        ));
    }
    format!(
        "<form method=\"post\" action=\"{base}/delivery\"><h3>Delivery Details</h3>{fields}\
<p><button type=\"submit\">Continue to Payment</button></p></form>"
    )
}

fn payment_panel(snapshot: &CheckoutSnapshot, base: &str, wallet: &WalletPanel<'_>) -> String {
    let mut toggle = String::from("<div class=\"tabs\">");
    for method in PaymentMethod::ALL {
        toggle.push_str(&format!(
            "<form method=\"post\" action=\"{base}/payment-method\">\
<input type=\"hidden\" name=\"method\" value=\"{value}\">\
<button type=\"submit\"{class}>{label}</button></form>",
            value = method.as_str(),
            class = active_class(snapshot.payment_method == method),
            label = method.label(),
        ));
    }
    toggle.push_str("</div>");

    let panel = match snapshot.payment_method {
        PaymentMethod::Card => card_panel(snapshot, base),
        PaymentMethod::Wallet => wallet_panel(base, wallet),
    };

    format!(
        "<h3>Payment Method</h3>{toggle}{panel}\
<p class=\"muted\">🔒 Your payment information is secure and encrypted. We never store your card details.</p>"
    )
}

fn card_panel(snapshot: &CheckoutSnapshot, base: &str) -> String {
    let mut inputs = String::new();
    for (label, placeholder) in CARD_FIELDS {
        inputs.push_str(&format!(
            "<label>{label}</label><input type=\"text\" placeholder=\"{placeholder}\" disabled>"
        ));
    }
    format!(
        "<div class=\"card\" id=\"card-panel\">\
<p class=\"muted\">This is a demo. In production, hosted card fields would be integrated here for secure card processing.</p>\
{inputs}<form method=\"post\" action=\"{base}/pay\">\
<p><button type=\"submit\">Pay {price} with Card</button></p></form></div>",
        price = snapshot.summary.price,
    )
}

fn wallet_panel(base: &str, wallet: &WalletPanel<'_>) -> String {
    format!(
        "<div class=\"card\" id=\"wallet-panel\">\
<p class=\"muted\">This is a demo. In production, you would need to configure PayPal with your client ID.</p>\
<div class=\"wallet-widget\" data-sdk-src=\"{script}\" data-layout=\"vertical\"></div>\
<form method=\"post\" action=\"{base}/pay\"><p><button type=\"submit\"{disabled}>Pay with PayPal</button></p></form>\
<p class=\"muted\">PayPal buttons would be functional with a valid client ID</p></div>",
        script = escape(wallet.script_url),
        disabled = if wallet.button_enabled { "" } else { " disabled" },
    )
}

fn confirmation_page(confirmation: &OrderConfirmation) -> String {
    let summary = &confirmation.summary;
    let body = format!(
        "<main><section class=\"card\" style=\"text-align:center\">\
<div style=\"font-size:3rem\">✅</div><h1>Order Confirmed!</h1>\
<p>Thank you for your order! Your delicious {flavor} cheesecake is being prepared.</p>\
<div class=\"alert\"><p><strong>Order Summary:</strong></p><p>{size} - {flavor}</p>\
<p><strong>{price}</strong></p></div>\
<p class=\"notice\">{notice}</p>\
<p>You will receive a confirmation email at {email} with tracking information.</p>\
<p><a href=\"/\">Order Another Cheesecake</a></p></section></main>",
        flavor = escape(&summary.flavor_name),
        size = escape(&summary.size_name),
        price = summary.price,
        notice = escape(&confirmation.notice),
        email = escape(&confirmation.email),
    );
    layout(&format!("Order Confirmed - {SHOP_NAME}"), &body)
}

pub(crate) fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<header><a href=\"/\">← Back to Shop</a></header><main><section class=\"card\">\
<h1>{status}</h1>{alert}<p><a href=\"/\">Return to the shop</a></p></section></main>",
        status = escape(&status.to_string()),
        alert = alert(message, "error"),
    );
    layout(SHOP_NAME, &body)
}

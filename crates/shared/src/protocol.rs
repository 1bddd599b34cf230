use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{
    catalog::Price,
    domain::{CheckoutId, CheckoutState, CheckoutTab, DeliveryInfo, PaymentMethod},
};

pub const CHECKOUT_ROUTE: &str = "/checkout";

/// Selector form submission. Browsers send `size=` for an unchosen select,
/// so empty strings are treated like missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub flavor: Option<String>,
}

impl OrderRequest {
    pub fn size(&self) -> Option<&str> {
        non_empty(self.size.as_deref())
    }

    pub fn flavor(&self) -> Option<&str> {
        non_empty(self.flavor.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Query parameters carried from the selector to the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default = "default_price")]
    pub price: String,
}

fn default_price() -> String {
    "0".to_string()
}

impl CheckoutQuery {
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("size", &self.size)
            .append_pair("flavor", &self.flavor)
            .append_pair("price", &self.price)
            .finish()
    }

    pub fn checkout_path(&self) -> String {
        format!("{CHECKOUT_ROUTE}?{}", self.to_query_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabForm {
    pub tab: CheckoutTab,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodForm {
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub size_id: String,
    pub size_name: String,
    pub flavor_id: String,
    pub flavor_name: String,
    pub flavor_description: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub summary: OrderSummary,
    pub email: String,
    pub payment_method: PaymentMethod,
    pub notice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSnapshot {
    pub checkout_id: CheckoutId,
    pub state: CheckoutState,
    pub summary: OrderSummary,
    pub delivery: DeliveryInfo,
    pub delivery_accepted: bool,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<OrderConfirmation>,
    pub opened_at: DateTime<Utc>,
}

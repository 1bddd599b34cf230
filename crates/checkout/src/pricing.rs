use payments::PaymentRequest;
use serde::{Deserialize, Serialize};
use shared::{
    catalog::{Catalog, FlavorOption, Price, SizeOption},
    error::ApiError,
    protocol::{CheckoutQuery, OrderSummary},
};
use tracing::warn;

/// Whether the checkout believes the `price` query parameter or looks the
/// price up again from the size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    TrustQuery,
    #[default]
    Recompute,
}

impl PricePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trust_query" | "trust-query" | "trust" => Some(PricePolicy::TrustQuery),
            "recompute" => Some(PricePolicy::Recompute),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub size: &'static SizeOption,
    pub flavor: &'static FlavorOption,
    pub price: Price,
}

impl ResolvedOrder {
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            size_id: self.size.id.to_string(),
            size_name: self.size.display_name.to_string(),
            flavor_id: self.flavor.id.to_string(),
            flavor_name: self.flavor.display_name.to_string(),
            flavor_description: self.flavor.description.to_string(),
            price: self.price,
        }
    }

    pub fn payment_request(&self, currency: &str) -> PaymentRequest {
        PaymentRequest {
            amount: self.price,
            currency: currency.to_string(),
            description: format!("{} - {}", self.size.display_name, self.flavor.display_name),
        }
    }
}

pub fn resolve_order(
    catalog: &'static Catalog,
    query: &CheckoutQuery,
    policy: PricePolicy,
) -> Result<ResolvedOrder, ApiError> {
    let size = catalog
        .size(&query.size)
        .ok_or_else(|| ApiError::not_found(format!("unknown size '{}'", query.size)))?;
    let flavor = catalog
        .flavor(&query.flavor)
        .ok_or_else(|| ApiError::not_found(format!("unknown flavor '{}'", query.flavor)))?;

    let price = match policy {
        PricePolicy::TrustQuery => Price::parse_whole_units(&query.price)
            .ok_or_else(|| ApiError::validation(format!("invalid price '{}'", query.price)))?,
        PricePolicy::Recompute => {
            if Price::parse_whole_units(&query.price) != Some(size.unit_price) {
                warn!(
                    size = size.id,
                    query_price = %query.price,
                    catalog_price = size.unit_price.units(),
                    "query price does not match catalog; using catalog price"
                );
            }
            size.unit_price
        }
    };

    Ok(ResolvedOrder {
        size,
        flavor,
        price,
    })
}

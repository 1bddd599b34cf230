use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutId(pub Uuid);

impl CheckoutId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CheckoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The shopper's in-progress choice on the selector screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub size_id: Option<String>,
    pub flavor_id: Option<String>,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.size_id.is_some() && self.flavor_id.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.size_id.is_none() && self.flavor_id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryField {
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    Zip,
}

impl DeliveryField {
    pub const ALL: [DeliveryField; 7] = [
        DeliveryField::Name,
        DeliveryField::Email,
        DeliveryField::Phone,
        DeliveryField::Address,
        DeliveryField::City,
        DeliveryField::State,
        DeliveryField::Zip,
    ];

    /// Form field name, matching the serde name of the `DeliveryInfo` member.
    pub fn name(self) -> &'static str {
        match self {
            DeliveryField::Name => "name",
            DeliveryField::Email => "email",
            DeliveryField::Phone => "phone",
            DeliveryField::Address => "address",
            DeliveryField::City => "city",
            DeliveryField::State => "state",
            DeliveryField::Zip => "zip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeliveryField::Name => "Full Name",
            DeliveryField::Email => "Email",
            DeliveryField::Phone => "Phone",
            DeliveryField::Address => "Street Address",
            DeliveryField::City => "City",
            DeliveryField::State => "State",
            DeliveryField::Zip => "ZIP Code",
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            DeliveryField::Email => "email",
            DeliveryField::Phone => "tel",
            _ => "text",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl DeliveryInfo {
    pub fn get(&self, field: DeliveryField) -> &str {
        match field {
            DeliveryField::Name => &self.name,
            DeliveryField::Email => &self.email,
            DeliveryField::Phone => &self.phone,
            DeliveryField::Address => &self.address,
            DeliveryField::City => &self.city,
            DeliveryField::State => &self.state,
            DeliveryField::Zip => &self.zip,
        }
    }

    pub fn set(&mut self, field: DeliveryField, value: impl Into<String>) {
        let slot = match field {
            DeliveryField::Name => &mut self.name,
            DeliveryField::Email => &mut self.email,
            DeliveryField::Phone => &mut self.phone,
            DeliveryField::Address => &mut self.address,
            DeliveryField::City => &mut self.city,
            DeliveryField::State => &mut self.state,
            DeliveryField::Zip => &mut self.zip,
        };
        *slot = value.into();
    }

    /// Fields that would block a `required` form submission. Whitespace-only
    /// values count as empty; the email also needs a `local@domain` shape.
    pub fn missing_fields(&self) -> Vec<DeliveryField> {
        DeliveryField::ALL
            .into_iter()
            .filter(|field| {
                let value = self.get(*field).trim();
                value.is_empty() || (*field == DeliveryField::Email && !looks_like_email(value))
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    CollectingDelivery,
    CollectingPayment,
    OrderComplete,
}

impl CheckoutState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CheckoutState::OrderComplete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutTab {
    Delivery,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Card, PaymentMethod::Wallet];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Wallet => "wallet",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Wallet => "PayPal",
        }
    }
}

//! The storefront's fixed reference data.
//!
//! Both the selector and the checkout read from the single [`CATALOG`] so
//! the two screens can never disagree about names or prices.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub u32);

impl Price {
    pub fn units(self) -> u32 {
        self.0
    }

    /// Parses a whole-unit amount such as `"35"`. Signs, decimals and
    /// surrounding whitespace are rejected.
    pub fn parse_whole_units(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse::<u32>().ok().map(Price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.00", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeOption {
    pub id: &'static str,
    pub display_name: &'static str,
    pub unit_price: Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlavorOption {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

const SIZES: [SizeOption; 3] = [
    SizeOption {
        id: "small",
        display_name: "6 inch (Serves 4-6)",
        unit_price: Price(25),
    },
    SizeOption {
        id: "medium",
        display_name: "8 inch (Serves 8-10)",
        unit_price: Price(35),
    },
    SizeOption {
        id: "large",
        display_name: "10 inch (Serves 12-15)",
        unit_price: Price(45),
    },
];

const FLAVORS: [FlavorOption; 6] = [
    FlavorOption {
        id: "classic",
        display_name: "Classic New York",
        description: "Traditional creamy cheesecake",
    },
    FlavorOption {
        id: "strawberry",
        display_name: "Strawberry Swirl",
        description: "Fresh strawberries with cream cheese",
    },
    FlavorOption {
        id: "chocolate",
        display_name: "Triple Chocolate",
        description: "Rich chocolate lovers dream",
    },
    FlavorOption {
        id: "blueberry",
        display_name: "Blueberry Delight",
        description: "Sweet blueberry compote topping",
    },
    FlavorOption {
        id: "caramel",
        display_name: "Salted Caramel",
        description: "Caramel drizzle with sea salt",
    },
    FlavorOption {
        id: "oreo",
        display_name: "Cookies & Cream",
        description: "Loaded with Oreo cookies",
    },
];

#[derive(Debug, Serialize)]
pub struct Catalog {
    sizes: &'static [SizeOption],
    flavors: &'static [FlavorOption],
}

pub static CATALOG: Catalog = Catalog {
    sizes: &SIZES,
    flavors: &FLAVORS,
};

impl Catalog {
    pub fn sizes(&self) -> &'static [SizeOption] {
        self.sizes
    }

    pub fn flavors(&self) -> &'static [FlavorOption] {
        self.flavors
    }

    pub fn size(&self, id: &str) -> Option<&'static SizeOption> {
        self.sizes.iter().find(|size| size.id == id)
    }

    pub fn flavor(&self, id: &str) -> Option<&'static FlavorOption> {
        self.flavors.iter().find(|flavor| flavor.id == id)
    }

    pub fn price_for(&self, size_id: &str) -> Option<Price> {
        self.size(size_id).map(|size| size.unit_price)
    }
}

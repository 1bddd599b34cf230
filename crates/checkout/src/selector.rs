use shared::{
    catalog::{Catalog, FlavorOption, Price, SizeOption},
    domain::Selection,
    error::ApiError,
    protocol::{CheckoutQuery, OrderRequest},
};

pub const SELECTION_INCOMPLETE: &str = "Please select both a size and flavor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    pub size: Option<&'static SizeOption>,
    pub flavor: Option<&'static FlavorOption>,
}

impl SelectionSummary {
    pub fn total(&self) -> Option<Price> {
        self.size.map(|size| size.unit_price)
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.flavor.is_none()
    }
}

/// Size and flavor picker backing the shop front page.
#[derive(Debug, Clone)]
pub struct Selector {
    catalog: &'static Catalog,
    selection: Selection,
}

impl Selector {
    pub fn new(catalog: &'static Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
        }
    }

    /// Rebuilds a selector from a submitted form. Unknown ids are rejected.
    pub fn from_request(
        catalog: &'static Catalog,
        request: &OrderRequest,
    ) -> Result<Self, ApiError> {
        let mut selector = Self::new(catalog);
        selector.select_size(request.size().unwrap_or_default())?;
        selector.select_flavor(request.flavor().unwrap_or_default())?;
        Ok(selector)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// An empty id clears the choice.
    pub fn select_size(&mut self, id: &str) -> Result<(), ApiError> {
        if id.is_empty() {
            self.selection.size_id = None;
            return Ok(());
        }
        let size = self
            .catalog
            .size(id)
            .ok_or_else(|| ApiError::validation(format!("unknown size '{id}'")))?;
        self.selection.size_id = Some(size.id.to_string());
        Ok(())
    }

    pub fn select_flavor(&mut self, id: &str) -> Result<(), ApiError> {
        if id.is_empty() {
            self.selection.flavor_id = None;
            return Ok(());
        }
        let flavor = self
            .catalog
            .flavor(id)
            .ok_or_else(|| ApiError::validation(format!("unknown flavor '{id}'")))?;
        self.selection.flavor_id = Some(flavor.id.to_string());
        Ok(())
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            size: self
                .selection
                .size_id
                .as_deref()
                .and_then(|id| self.catalog.size(id)),
            flavor: self
                .selection
                .flavor_id
                .as_deref()
                .and_then(|id| self.catalog.flavor(id)),
        }
    }

    pub fn can_order(&self) -> bool {
        self.selection.is_complete()
    }

    /// Builds the checkout navigation target. Leaves the selection untouched
    /// whether or not it succeeds.
    pub fn attempt_order(&self) -> Result<CheckoutQuery, ApiError> {
        let (Some(size_id), Some(flavor_id)) = (
            self.selection.size_id.as_deref(),
            self.selection.flavor_id.as_deref(),
        ) else {
            return Err(ApiError::validation(SELECTION_INCOMPLETE));
        };
        let price = self
            .catalog
            .price_for(size_id)
            .ok_or_else(|| ApiError::not_found(format!("unknown size '{size_id}'")))?;
        Ok(CheckoutQuery {
            size: size_id.to_string(),
            flavor: flavor_id.to_string(),
            price: price.units().to_string(),
        })
    }

    pub fn reset(&mut self) {
        self.selection = Selection::default();
    }
}

#[cfg(test)]
#[path = "tests/selector_tests.rs"]
mod tests;

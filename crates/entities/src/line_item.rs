//! Line item definitions and the catalog snapshot constructors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Product, Service, ValidationError};

/// Which catalog family a line item was priced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Priced from a product's unit price.
    Product,
    /// Priced from a service's hourly rate.
    Service,
}

/// A priced line on a quote or invoice.
///
/// Line items are snapshots: name, description, unit price and tax rate are
/// copied from the catalog entry at the moment the item is added, so later
/// catalog edits never alter documents that already reference it. The
/// `quantity` slot holds units for products and hours for services; it is
/// always "units of a per-unit-or-per-hour rate" and does not itself say
/// which.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier within the parent document.
    pub id: Uuid,
    /// Catalog family this item was priced from.
    pub kind: ItemKind,
    /// ID of the source catalog entry.
    pub source_id: Uuid,
    /// Name at the time of addition.
    pub name: String,
    /// Description at the time of addition.
    pub description: Option<String>,
    /// Units or hours. Strictly positive.
    pub quantity: f64,
    /// Unit price or hourly rate at the time of addition.
    pub unit_price: f64,
    /// Tax rate percentage at the time of addition.
    pub tax_rate: f64,
    /// Line total: quantity x unit price.
    pub total: f64,
}

impl LineItem {
    /// Builds a line item from a product and a quantity of units.
    pub fn from_product(product: &Product, quantity: f64) -> Result<Self, ValidationError> {
        Self::snapshot(
            ItemKind::Product,
            product.id,
            &product.name,
            product.description.as_deref(),
            quantity,
            product.price,
            product.tax_rate,
        )
    }

    /// Builds a line item from a service and a number of hours.
    pub fn from_service(service: &Service, hours: f64) -> Result<Self, ValidationError> {
        Self::snapshot(
            ItemKind::Service,
            service.id,
            &service.name,
            service.description.as_deref(),
            hours,
            service.hourly_rate,
            service.tax_rate,
        )
    }

    fn snapshot(
        kind: ItemKind,
        source_id: Uuid,
        name: &str,
        description: Option<&str>,
        quantity: f64,
        unit_price: f64,
        tax_rate: f64,
    ) -> Result<Self, ValidationError> {
        if quantity <= 0.0 || quantity.is_nan() {
            return Err(ValidationError::NonPositiveQuantity { value: quantity });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            source_id,
            name: name.to_string(),
            description: description.map(str::to_string),
            quantity,
            unit_price,
            tax_rate,
            total: quantity * unit_price,
        })
    }
}

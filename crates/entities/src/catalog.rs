//! Catalog entity definitions: products and services.
//!
//! Catalog entries are pricing templates. Documents never reference them
//! live; adding one to a quote snapshots its fields into a line item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

/// A product sold per unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price. Non-negative.
    pub price: f64,
    /// Tax rate percentage, 0-100.
    pub tax_rate: f64,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product.
    pub fn new(user_id: Uuid, name: impl Into<String>, price: f64, tax_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: None,
            price,
            tax_rate,
            created_at: Utc::now(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the record against the boundary validation rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.price < 0.0 {
            return Err(ValidationError::NegativeAmount {
                field: "price",
                value: self.price,
            });
        }
        validate_tax_rate(self.tax_rate)
    }

    /// Applies a partial update; absent fields are left unchanged.
    pub fn apply(&mut self, update: ProductUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(tax_rate) = update.tax_rate {
            self.tax_rate = tax_rate;
        }
    }
}

/// Partial update for a [`Product`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New unit price.
    pub price: Option<f64>,
    /// New tax rate percentage.
    pub tax_rate: Option<f64>,
}

/// A service billed per hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Service name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Hourly rate. Non-negative.
    pub hourly_rate: f64,
    /// Tax rate percentage, 0-100.
    pub tax_rate: f64,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Creates a new service.
    pub fn new(user_id: Uuid, name: impl Into<String>, hourly_rate: f64, tax_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: None,
            hourly_rate,
            tax_rate,
            created_at: Utc::now(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the record against the boundary validation rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.hourly_rate < 0.0 {
            return Err(ValidationError::NegativeAmount {
                field: "hourly_rate",
                value: self.hourly_rate,
            });
        }
        validate_tax_rate(self.tax_rate)
    }

    /// Applies a partial update; absent fields are left unchanged.
    pub fn apply(&mut self, update: ServiceUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(hourly_rate) = update.hourly_rate {
            self.hourly_rate = hourly_rate;
        }
        if let Some(tax_rate) = update.tax_rate {
            self.tax_rate = tax_rate;
        }
    }
}

/// Partial update for a [`Service`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New hourly rate.
    pub hourly_rate: Option<f64>,
    /// New tax rate percentage.
    pub tax_rate: Option<f64>,
}

fn validate_tax_rate(rate: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&rate) {
        return Err(ValidationError::TaxRateOutOfRange { value: rate });
    }
    Ok(())
}

//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

/// The company user owning all other records. Single-user in the current
/// scope, but every owned entity carries an explicit `user_id` back-reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Login email address.
    pub email: String,
    /// Company name shown on documents.
    pub company_name: String,
    /// Company postal address.
    pub company_address: Option<String>,
    /// Company phone number.
    pub company_phone: Option<String>,
    /// Company contact email, if different from the login email.
    pub company_email: Option<String>,
    /// Reference to an uploaded logo.
    pub logo_url: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    pub fn new(email: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            company_name: company_name.into(),
            company_address: None,
            company_phone: None,
            company_email: None,
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the company address.
    pub fn with_company_address(mut self, address: impl Into<String>) -> Self {
        self.company_address = Some(address.into());
        self
    }

    /// Sets the company phone number.
    pub fn with_company_phone(mut self, phone: impl Into<String>) -> Self {
        self.company_phone = Some(phone.into());
        self
    }

    /// Sets the company contact email.
    pub fn with_company_email(mut self, email: impl Into<String>) -> Self {
        self.company_email = Some(email.into());
        self
    }

    /// Sets the logo reference.
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    /// Checks the record against the boundary validation rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "email" });
        }
        if self.company_name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "company_name",
            });
        }
        Ok(())
    }

    /// Applies a partial update; absent fields are left unchanged.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        if let Some(company_address) = update.company_address {
            self.company_address = Some(company_address);
        }
        if let Some(company_phone) = update.company_phone {
            self.company_phone = Some(company_phone);
        }
        if let Some(company_email) = update.company_email {
            self.company_email = Some(company_email);
        }
        if let Some(logo_url) = update.logo_url {
            self.logo_url = Some(logo_url);
        }
    }
}

/// Partial update for a [`User`]. Every field is optional; `None` means
/// "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New login email.
    pub email: Option<String>,
    /// New company name.
    pub company_name: Option<String>,
    /// New company address.
    pub company_address: Option<String>,
    /// New company phone.
    pub company_phone: Option<String>,
    /// New company contact email.
    pub company_email: Option<String>,
    /// New logo reference.
    pub logo_url: Option<String>,
}

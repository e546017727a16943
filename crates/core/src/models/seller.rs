//! Seller profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ValidationError, require};
use crate::types::{SellerId, SellerStatus, UserId};

/// A business profile owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub user_id: UserId,
    pub business_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// GST or other tax registration number.
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub status: SellerStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Seller {
    /// Materialize a new profile with a fresh id and creation timestamp.
    #[must_use]
    pub fn from_new(new: NewSeller) -> Self {
        Self {
            id: SellerId::generate(),
            user_id: new.user_id,
            business_name: new.business_name,
            description: new.description,
            address: new.address,
            tax_id: new.tax_id,
            contact_email: new.contact_email,
            contact_phone: new.contact_phone,
            logo_url: new.logo_url,
            banner_url: new.banner_url,
            status: new.status,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Input for creating a seller profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeller {
    pub user_id: UserId,
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    pub status: SellerStatus,
}

impl NewSeller {
    /// Start a `pending` profile for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if `business_name` is blank.
    pub fn new(user_id: UserId, business_name: impl Into<String>) -> Result<Self, ValidationError> {
        let new = Self {
            user_id,
            business_name: business_name.into(),
            description: None,
            address: None,
            tax_id: None,
            contact_email: None,
            contact_phone: None,
            logo_url: None,
            banner_url: None,
            status: SellerStatus::Pending,
        };
        new.validate()?;
        Ok(new)
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if `business_name` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("business_name", &self.business_name)
    }
}

//! Product listing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ValidationError, require};
use crate::types::{Price, ProductId, SellerId};

/// An item listed by a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: SellerId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    /// Units in stock.
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Materialize a new listing with a fresh id and creation timestamp.
    #[must_use]
    pub fn from_new(new: NewProduct) -> Self {
        Self::from_new_at(new, Utc::now())
    }

    /// Same as [`Product::from_new`] with an explicit creation time.
    #[must_use]
    pub fn from_new_at(new: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::generate(),
            seller_id: new.seller_id,
            title: new.title,
            description: new.description,
            price: new.price,
            category: new.category,
            inventory: new.inventory,
            image_urls: new.image_urls,
            created_at,
            updated_at: None,
        }
    }

    /// Case-insensitive substring match over title and description.
    ///
    /// `lowered_query` must already be lower-cased.
    #[must_use]
    pub fn matches_text(&self, lowered_query: &str) -> bool {
        self.title.to_lowercase().contains(lowered_query)
            || self.description.to_lowercase().contains(lowered_query)
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if title or category is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)
    }
}

/// Input for listing a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub seller_id: SellerId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub inventory: u32,
    pub image_urls: Vec<String>,
}

impl NewProduct {
    /// Build a listing input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if title or category is blank.
    pub fn new(
        seller_id: SellerId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        category: impl Into<String>,
        inventory: u32,
    ) -> Result<Self, ValidationError> {
        let new = Self {
            seller_id,
            title: title.into(),
            description: description.into(),
            price,
            category: category.into(),
            inventory,
            image_urls: Vec::new(),
        };
        new.validate()?;
        Ok(new)
    }

    /// Attach image URLs, dropping blank entries.
    #[must_use]
    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls
            .into_iter()
            .map(Into::into)
            .filter(|url: &String| !url.trim().is_empty())
            .collect();
        self
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required` if title or category is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)
    }
}

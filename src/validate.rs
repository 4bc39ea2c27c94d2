//! Input validation for writes.
//!
//! Everything here runs before a mutation is built. A value that fails to
//! validate produces [`PasteleriaError::Validation`] and nothing is sent.

use jiff::civil::Time;
use serde_json::{Value, json};

use crate::error::{PasteleriaError, Result};
use crate::money::Money;
use crate::types::ProductStatus;

fn invalid(message: impl Into<String>) -> PasteleriaError {
    PasteleriaError::Validation(message.into())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Raw product form input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
}

/// A product payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: i64,
    pub category_id: i64,
    pub status: ProductStatus,
    pub image_url: Option<String>,
}

impl ProductDraft {
    pub fn from_form(form: &ProductForm) -> Result<Self> {
        let name = non_blank(form.name.as_deref()).ok_or_else(|| invalid("name is required"))?;

        let category_id = non_blank(form.category.as_deref())
            .ok_or_else(|| invalid("category is required"))
            .and_then(|raw| parse_id("category", &raw))?;

        let price = non_blank(form.price.as_deref())
            .ok_or_else(|| invalid("price is required"))
            .and_then(|raw| parse_amount(&raw))?;

        let stock = match non_blank(form.stock.as_deref()) {
            Some(raw) => parse_count("stock", &raw)?,
            None => 0,
        };

        let status = match non_blank(form.status.as_deref()) {
            Some(raw) => raw.parse::<ProductStatus>()?,
            None => ProductStatus::Active,
        };

        Ok(ProductDraft {
            name,
            description: non_blank(form.description.as_deref()),
            price,
            stock,
            category_id,
            status,
            image_url: non_blank(form.image_url.as_deref()),
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "nombre": self.name,
            "descripcion": self.description,
            "precio": self.price,
            "stock": self.stock,
            "id_categoria": self.category_id,
            "estado": self.status.as_str(),
            "imagen_url": self.image_url,
        })
    }
}

/// A category payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    pub fn new(name: &str, description: &str) -> Result<Self> {
        let name = non_blank(Some(name)).ok_or_else(|| invalid("name is required"))?;
        Ok(CategoryDraft {
            name,
            description: non_blank(Some(description)),
        })
    }
}

/// A non-negative money amount.
pub fn parse_amount(raw: &str) -> Result<Money> {
    let amount = Money::parse(raw)?;
    if amount.is_negative() {
        return Err(invalid(format!("amount must not be negative, got {amount}")));
    }
    Ok(amount)
}

pub fn parse_id(field: &str, raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid(format!("{field} must be a positive integer, got '{}'", raw.trim()))),
    }
}

/// A non-negative whole number such as a stock level.
pub fn parse_count(field: &str, raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(invalid(format!(
            "{field} must be a whole number of zero or more, got '{}'",
            raw.trim()
        ))),
    }
}

/// Stock increment. Negative values are accepted and count as zero.
pub fn parse_increment(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map(|n| n.max(0))
        .map_err(|_| invalid(format!("stock increment must be a whole number, got '{}'", raw.trim())))
}

/// Departure time as `HH:MM` or `HH:MM:SS`, returned as `HH:MM:SS`.
pub fn parse_departure(raw: &str) -> Result<String> {
    let time: Time = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("departure must look like HH:MM, got '{}'", raw.trim())))?;
    Ok(time.strftime("%H:%M:%S").to_string())
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PasteleriaError;

/// Lifecycle of an order as stored in `pedidos.estado`.
///
/// Values the client does not know about are kept verbatim in `Other` so a
/// backend that grows a new status does not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Registered,
    PendingReview,
    Approved,
    PaymentRejected,
    InKitchen,
    InPreparation,
    Served,
    Assigned,
    Shipped,
    Delivered,
    NotFound,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 12] = [
        OrderStatus::Registered,
        OrderStatus::PendingReview,
        OrderStatus::Approved,
        OrderStatus::PaymentRejected,
        OrderStatus::InKitchen,
        OrderStatus::InPreparation,
        OrderStatus::Served,
        OrderStatus::Assigned,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::NotFound,
        OrderStatus::Cancelled,
    ];

    /// The value as stored by the backend.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Registered => "REGISTRADO",
            OrderStatus::PendingReview => "EN_REVISION",
            OrderStatus::Approved => "APROBADO",
            OrderStatus::PaymentRejected => "PAGO_NO_VALIDO",
            OrderStatus::InKitchen => "EN_COCINA",
            OrderStatus::InPreparation => "EN_PREPARACION",
            OrderStatus::Served => "SERVIDO",
            OrderStatus::Assigned => "ASIGNADO",
            OrderStatus::Shipped => "ENVIADO",
            OrderStatus::Delivered => "ENTREGADO",
            OrderStatus::NotFound => "NO_ENCONTRADO",
            OrderStatus::Cancelled => "CANCELADO",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Statuses an order is in once it has left the kitchen.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::NotFound
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        let upper = raw.trim().to_uppercase();
        OrderStatus::ALL
            .iter()
            .find(|status| status.as_str() == upper)
            .cloned()
            .unwrap_or(OrderStatus::Other(raw))
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for OrderStatus {
    type Err = PasteleriaError;

    /// Strict parse used for user input: unknown values are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match OrderStatus::from(s.to_string()) {
            OrderStatus::Other(_) => Err(PasteleriaError::Validation(format!(
                "unknown order status '{}'. Must be one of: {}",
                s,
                VALID_ORDER_STATUSES.join(", ")
            ))),
            status => Ok(status),
        }
    }
}

pub const VALID_ORDER_STATUSES: &[&str] = &[
    "REGISTRADO",
    "EN_REVISION",
    "APROBADO",
    "PAGO_NO_VALIDO",
    "EN_COCINA",
    "EN_PREPARACION",
    "SERVIDO",
    "ASIGNADO",
    "ENVIADO",
    "ENTREGADO",
    "NO_ENCONTRADO",
    "CANCELADO",
];

/// Default status selection of the orders list.
pub const DEFAULT_ORDER_STATUSES: &[&str] = &["APROBADO", "SERVIDO", "NO_ENCONTRADO"];

/// Default status selection of the payments list.
pub const DEFAULT_PAYMENT_STATUSES: &[&str] = &["EN_REVISION"];

/// Statuses shown on the kitchen board.
pub const KITCHEN_STATUSES: &[&str] = &["EN_COCINA", "EN_PREPARACION"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl ProductStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProductStatus::Active => "ACTIVO",
            ProductStatus::Inactive => "INACTIVO",
            ProductStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProductStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ACTIVO" => ProductStatus::Active,
            "INACTIVO" => ProductStatus::Inactive,
            _ => ProductStatus::Other(raw),
        }
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for ProductStatus {
    type Err = PasteleriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ProductStatus::from(s.to_string()) {
            ProductStatus::Other(_) => Err(PasteleriaError::Validation(format!(
                "unknown product status '{}'. Must be one of: {}",
                s,
                VALID_PRODUCT_STATUSES.join(", ")
            ))),
            status => Ok(status),
        }
    }
}

pub const VALID_PRODUCT_STATUSES: &[&str] = &["ACTIVO", "INACTIVO"];

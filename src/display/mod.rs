//! Presentation adapter: turns records into display text.
//!
//! Nothing here holds state. Rows and labels are recomputed from the list
//! state every time they are shown.

pub mod dates;
pub mod rows;

pub use dates::{format_date_time, format_elapsed, format_short_date, format_time};
pub use rows::{
    CategoryRow, CustomerRow, DeliveryRow, KitchenRow, LineRow, OrderRow, PaymentRow, ProductRow,
    render_table,
};

use owo_colors::OwoColorize;

use crate::money::Money;
use crate::types::OrderStatus;

/// Placeholder for empty cells.
pub const EMPTY: &str = "—";

/// `value` or the placeholder when blank.
pub fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => EMPTY.to_string(),
    }
}

pub fn format_money(amount: Option<Money>) -> String {
    amount.map(|m| m.to_string()).unwrap_or_else(|| EMPTY.to_string())
}

/// Signed difference, e.g. `+S/ 4.50` or `-S/ 1.00`.
pub fn format_difference(difference: Option<Money>) -> String {
    match difference {
        Some(d) if d.is_negative() => format!("-{}", d.abs()),
        Some(d) if d == Money::ZERO => d.to_string(),
        Some(d) => format!("+{d}"),
        None => EMPTY.to_string(),
    }
}

pub fn format_order_status_colored(status: Option<&OrderStatus>) -> String {
    format_order_status_with(status, |s| format!("[{s}]"))
}

pub fn format_order_status_with<F>(status: Option<&OrderStatus>, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let Some(status) = status else {
        return EMPTY.dimmed().to_string();
    };
    let badge = format_fn(status.as_str());
    match status {
        OrderStatus::Registered | OrderStatus::PendingReview => badge.yellow().to_string(),
        OrderStatus::Approved | OrderStatus::Served | OrderStatus::Delivered => {
            badge.green().to_string()
        }
        OrderStatus::InKitchen | OrderStatus::InPreparation => badge.cyan().to_string(),
        OrderStatus::Assigned | OrderStatus::Shipped => badge.magenta().to_string(),
        OrderStatus::PaymentRejected | OrderStatus::NotFound | OrderStatus::Cancelled => {
            badge.red().to_string()
        }
        OrderStatus::Other(_) => badge.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder(Some("  ")), EMPTY);
        assert_eq!(or_placeholder(None), EMPTY);
        assert_eq!(or_placeholder(Some(" Surco ")), "Surco");
    }

    #[test]
    fn test_format_difference_sign() {
        assert_eq!(format_difference(Some(Money::from_cents(450))), "+S/ 4.50");
        assert_eq!(format_difference(Some(Money::from_cents(-100))), "-S/ 1.00");
        assert_eq!(format_difference(Some(Money::ZERO)), "S/ 0.00");
        assert_eq!(format_difference(None), EMPTY);
    }

    #[test]
    fn test_status_badge_contains_value() {
        let badge = format_order_status_colored(Some(&OrderStatus::InKitchen));
        assert!(badge.contains("[EN_COCINA]"));
    }
}

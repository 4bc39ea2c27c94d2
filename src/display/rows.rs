//! Table rows for each record kind.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use jiff::Timestamp;

use super::{
    EMPTY, format_date_time, format_difference, format_elapsed, format_money, format_short_date,
    format_time, or_placeholder,
};
use crate::resource::{Category, Customer, DeliveryPerson, Order, OrderLine, Payment, Product};

/// Render rows as a rounded table.
pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

// Status cells are plain text: colors inside table cells break the width math.
fn plain_status(value: Option<&str>) -> String {
    or_placeholder(value)
}

#[derive(Tabled)]
pub struct OrderRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Customer")]
    pub customer: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[tabled(rename = "Ordered")]
    pub ordered: String,
    #[tabled(rename = "Delivery")]
    pub delivery: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Total")]
    pub total: String,
    #[tabled(rename = "Address")]
    pub address: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        let customer = order.customer.as_ref();
        let address = [order.district.as_deref(), order.address.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" - ");
        OrderRow {
            id: order.id,
            customer: or_placeholder(Some(order.customer_name().as_str())),
            phone: or_placeholder(customer.and_then(|c| c.telefono.as_deref())),
            ordered: format_short_date(order.ordered_at.as_deref()),
            delivery: format!(
                "{} {}",
                format_short_date(order.delivery_date.as_deref()),
                format_time(order.delivery_time.as_deref())
            ),
            status: plain_status(order.status.as_ref().map(|s| s.as_str())),
            total: format_money(order.total),
            address: or_placeholder(Some(address.as_str())),
        }
    }
}

/// Items shown per order in the kitchen view.
const KITCHEN_ITEMS: usize = 3;

/// Kitchen view row: how long the order has waited and what goes in it.
#[derive(Tabled)]
pub struct KitchenRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Waiting")]
    pub elapsed: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Customer")]
    pub customer: String,
    #[tabled(rename = "Items")]
    pub items: String,
    #[tabled(rename = "Delivery")]
    pub delivery: String,
}

impl KitchenRow {
    pub fn new(order: &Order, lines: &[OrderLine], now: Timestamp) -> Self {
        KitchenRow {
            id: order.id,
            elapsed: format_elapsed(order.ordered_at.as_deref(), now),
            status: plain_status(order.status.as_ref().map(|s| s.as_str())),
            customer: or_placeholder(Some(order.customer_name().as_str())),
            items: summarize_lines(lines),
            delivery: format!(
                "{} {}",
                format_short_date(order.delivery_date.as_deref()),
                format_time(order.delivery_time.as_deref())
            ),
        }
    }
}

/// `Torta x1; Keke x2 …`, cut after a few items.
pub fn summarize_lines(lines: &[OrderLine]) -> String {
    if lines.is_empty() {
        return EMPTY.to_string();
    }
    let mut items = lines
        .iter()
        .take(KITCHEN_ITEMS)
        .map(|line| {
            format!(
                "{} x{}",
                or_placeholder(Some(line.product_name())),
                line.quantity.unwrap_or(0.0)
            )
        })
        .collect::<Vec<_>>()
        .join("; ");
    if lines.len() > KITCHEN_ITEMS {
        items.push_str(" …");
    }
    items
}

#[derive(Tabled)]
pub struct LineRow {
    #[tabled(rename = "Product")]
    pub product: String,
    #[tabled(rename = "Qty")]
    pub quantity: String,
    #[tabled(rename = "Unit price")]
    pub unit_price: String,
    #[tabled(rename = "Subtotal")]
    pub subtotal: String,
}

impl From<&OrderLine> for LineRow {
    fn from(line: &OrderLine) -> Self {
        LineRow {
            product: or_placeholder(Some(line.product_name())),
            quantity: line
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            unit_price: format_money(line.unit_price),
            subtotal: line.subtotal().to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct PaymentRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Order")]
    pub order: String,
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Registered")]
    pub registered: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Order total")]
    pub order_total: String,
    #[tabled(rename = "Difference")]
    pub difference: String,
    #[tabled(rename = "Order status")]
    pub status: String,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        PaymentRow {
            id: payment.id,
            order: payment
                .order_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            method: or_placeholder(payment.method.as_deref()),
            registered: format_date_time(payment.registered_at.as_deref()),
            amount: format_money(payment.amount),
            order_total: format_money(payment.order_total()),
            difference: format_difference(payment.difference()),
            status: plain_status(payment.order_status().map(|s| s.as_str())),
        }
    }
}

#[derive(Tabled)]
pub struct ProductRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Stock")]
    pub stock: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        ProductRow {
            id: product.id,
            name: or_placeholder(product.name.as_deref()),
            category: or_placeholder(Some(product.category_name())),
            price: format_money(product.price),
            stock: product
                .stock
                .map(|s| s.to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            status: plain_status(product.status.as_ref().map(|s| s.as_str())),
        }
    }
}

#[derive(Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        CategoryRow {
            id: category.id,
            name: or_placeholder(category.name.as_deref()),
            description: or_placeholder(category.description.as_deref()),
        }
    }
}

#[derive(Tabled)]
pub struct CustomerRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Since")]
    pub since: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        CustomerRow {
            id: customer.id,
            name: or_placeholder(Some(customer.full_name().as_str())),
            email: or_placeholder(customer.email.as_deref()),
            phone: or_placeholder(Some(customer.normalized_phone().as_str())),
            address: or_placeholder(Some(customer.full_address().as_str())),
            since: format_short_date(customer.registered_at.as_deref()),
        }
    }
}

#[derive(Tabled)]
pub struct DeliveryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&DeliveryPerson> for DeliveryRow {
    fn from(person: &DeliveryPerson) -> Self {
        DeliveryRow {
            id: person.id,
            name: or_placeholder(Some(person.full_name().as_str())),
        }
    }
}

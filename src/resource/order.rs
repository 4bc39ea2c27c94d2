use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Resource, full_name};
use crate::money::Money;
use crate::query::{FilterState, RequestDescriptor, SortOrder};
use crate::screen::mutation::{Mutation, MutationStep};
use crate::types::OrderStatus;

/// Customer fields embedded in an order row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerRef {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub telefono: Option<String>,
}

impl CustomerRef {
    pub fn full_name(&self) -> String {
        full_name(self.nombre.as_deref(), self.apellido.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "id_pedido")]
    pub id: i64,
    #[serde(rename = "fecha_pedido")]
    pub ordered_at: Option<String>,
    #[serde(rename = "fecha_entrega")]
    pub delivery_date: Option<String>,
    #[serde(rename = "hora_entrega")]
    pub delivery_time: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<OrderStatus>,
    pub total: Option<Money>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "distrito")]
    pub district: Option<String>,
    #[serde(rename = "referencia")]
    pub reference: Option<String>,
    #[serde(rename = "cliente")]
    pub customer: Option<CustomerRef>,
}

impl Order {
    pub fn customer_name(&self) -> String {
        self.customer
            .as_ref()
            .map(CustomerRef::full_name)
            .unwrap_or_default()
    }
}

impl Resource for Order {
    const TABLE: &'static str = "pedidos";
    const ID_COLUMN: &'static str = "id_pedido";
    const SELECT: &'static str = "id_pedido,fecha_pedido,fecha_entrega,hora_entrega,estado,total,\
direccion,distrito,referencia,cliente:cliente(nombre,apellido,telefono)";
    const STATUS_COLUMN: Option<&'static str> = Some("estado");

    fn default_order() -> SortOrder {
        SortOrder::desc("fecha_pedido")
    }

    fn id(&self) -> i64 {
        self.id
    }

    /// The backend cannot search through the embedded customer, so names are
    /// matched here.
    fn matches_text(&self, needle: &str) -> bool {
        self.customer_name().to_lowercase().contains(needle)
    }
}

/// One line of an order, with the product name embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "id_detalle")]
    pub id: i64,
    #[serde(rename = "id_pedido")]
    pub order_id: i64,
    #[serde(rename = "id_producto")]
    pub product_id: Option<i64>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<f64>,
    #[serde(rename = "precio_unitario")]
    pub unit_price: Option<Money>,
    #[serde(rename = "producto")]
    pub product: Option<ProductName>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductName {
    pub nombre: Option<String>,
}

impl OrderLine {
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.nombre.as_deref())
            .unwrap_or("")
    }

    /// Quantity times unit price, rounded half-up to cents.
    pub fn subtotal(&self) -> Money {
        match (self.quantity, self.unit_price) {
            (Some(quantity), Some(price)) => {
                Money::from_cents((price.cents() as f64 * quantity).round() as i64)
            }
            _ => Money::ZERO,
        }
    }
}

impl Resource for OrderLine {
    const TABLE: &'static str = "detalle_pedido";
    const ID_COLUMN: &'static str = "id_detalle";
    const SELECT: &'static str =
        "id_detalle,id_pedido,id_producto,cantidad,precio_unitario,producto:productos(nombre)";
    // A numeric term selects the lines of that order
    const TERM_ID_COLUMN: &'static str = "id_pedido";

    fn default_order() -> SortOrder {
        SortOrder::asc("id_detalle")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Filter for the lines of one order.
pub fn lines_of(order_id: i64) -> FilterState {
    FilterState::new(200).with_term(order_id.to_string())
}

/// Minimal projection used for per-status counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusRow {
    #[serde(rename = "id_pedido")]
    pub id: i64,
    #[serde(rename = "estado")]
    pub status: Option<OrderStatus>,
}

impl Resource for OrderStatusRow {
    const TABLE: &'static str = "pedidos";
    const ID_COLUMN: &'static str = "id_pedido";
    const SELECT: &'static str = "id_pedido,estado";
    const STATUS_COLUMN: Option<&'static str> = Some("estado");

    fn default_order() -> SortOrder {
        SortOrder::asc("id_pedido")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Move an order to `status`.
pub fn set_status(order_id: i64, status: &OrderStatus) -> Mutation {
    Mutation::new(format!("Order {order_id} set to {status}")).step(MutationStep::Update {
        target: RequestDescriptor::by_id(Order::TABLE, Order::ID_COLUMN, order_id),
        body: json!({ "estado": status.as_str() }),
    })
}

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Resource, full_name};
use crate::query::{RequestDescriptor, SortOrder};
use crate::screen::mutation::{Mutation, MutationStep};
use crate::types::OrderStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPerson {
    #[serde(rename = "id_delivery")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

impl DeliveryPerson {
    pub fn full_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

impl Resource for DeliveryPerson {
    const TABLE: &'static str = "delivery_person";
    const ID_COLUMN: &'static str = "id_delivery";
    const SELECT: &'static str = "id_delivery,nombre,apellido,activo";
    const TEXT_COLUMNS: &'static [&'static str] = &["nombre", "apellido"];
    // Only people currently on shift can take an order
    const FIXED_FILTERS: &'static [(&'static str, &'static str)] = &[("activo", "eq.true")];

    fn default_order() -> SortOrder {
        SortOrder::asc("nombre")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Row of `delivery_asignacion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAssignment {
    #[serde(rename = "id_asignacion")]
    pub id: i64,
    #[serde(rename = "id_pedido")]
    pub order_id: i64,
    #[serde(rename = "id_delivery")]
    pub delivery_id: i64,
    #[serde(rename = "hora_salida")]
    pub departure: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<OrderStatus>,
}

impl Resource for DeliveryAssignment {
    const TABLE: &'static str = "delivery_asignacion";
    const ID_COLUMN: &'static str = "id_asignacion";
    const SELECT: &'static str = "id_asignacion,id_pedido,id_delivery,hora_salida,estado";
    const TERM_ID_COLUMN: &'static str = "id_pedido";

    fn default_order() -> SortOrder {
        SortOrder::desc("id_asignacion")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Hand an order to a delivery person.
///
/// Inserts the assignment first and only then marks the order `ASIGNADO`, so
/// a failed insert leaves the order untouched. `departure` is `HH:MM:SS`.
pub fn assign(order_id: i64, delivery_id: i64, departure: &str) -> Mutation {
    let assigned = OrderStatus::Assigned;
    Mutation::new(format!(
        "Order {order_id} assigned to delivery {delivery_id}"
    ))
    .step(MutationStep::Create {
        target: RequestDescriptor::new(DeliveryAssignment::TABLE),
        body: json!({
            "id_pedido": order_id,
            "id_delivery": delivery_id,
            "hora_salida": departure,
            "estado": assigned.as_str(),
        }),
    })
    .step(MutationStep::Update {
        target: RequestDescriptor::by_id("pedidos", "id_pedido", order_id),
        body: json!({ "estado": assigned.as_str() }),
    })
}

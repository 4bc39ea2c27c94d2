use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Resource;
use crate::money::Money;
use crate::query::{FilterState, RequestDescriptor, SortOrder};
use crate::screen::mutation::{Mutation, MutationStep};
use crate::types::OrderStatus;

const PAYMENT_COLUMNS: &str = "id_pago,id_pedido,metodo,comprobante_url,fecha_registro,monto";

/// Order fields embedded in a payment row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total: Option<Money>,
    #[serde(rename = "estado")]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "id_pago")]
    pub id: i64,
    #[serde(rename = "id_pedido")]
    pub order_id: Option<i64>,
    #[serde(rename = "metodo")]
    pub method: Option<String>,
    #[serde(rename = "comprobante_url")]
    pub receipt_url: Option<String>,
    #[serde(rename = "fecha_registro")]
    pub registered_at: Option<String>,
    #[serde(rename = "monto")]
    pub amount: Option<Money>,
    #[serde(rename = "pedido")]
    pub order: Option<OrderSummary>,
}

impl Payment {
    pub fn order_total(&self) -> Option<Money> {
        self.order.as_ref().and_then(|o| o.total)
    }

    pub fn order_status(&self) -> Option<&OrderStatus> {
        self.order.as_ref().and_then(|o| o.status.as_ref())
    }

    /// Paid amount minus order total; positive means overpaid.
    pub fn difference(&self) -> Option<Money> {
        Some(self.amount? - self.order_total()?)
    }
}

impl Resource for Payment {
    const TABLE: &'static str = "pagos";
    const ID_COLUMN: &'static str = "id_pago";
    const SELECT: &'static str =
        "id_pago,id_pedido,metodo,comprobante_url,fecha_registro,monto,pedido:pedidos(total,estado)";
    // Payments are looked up by the order they pay for
    const TERM_ID_COLUMN: &'static str = "id_pedido";
    const TEXT_COLUMNS: &'static [&'static str] = &["metodo"];
    const STATUS_COLUMN: Option<&'static str> = Some("pedido.estado");

    fn default_order() -> SortOrder {
        SortOrder::desc("fecha_registro")
    }

    /// Filtering on the embedded order status only narrows the payments when
    /// the embed is an inner join.
    fn select(filter: &FilterState) -> Cow<'static, str> {
        if filter.statuses().is_empty() {
            Cow::Borrowed(Self::SELECT)
        } else {
            Cow::Owned(format!(
                "{PAYMENT_COLUMNS},pedido:pedidos!inner(total,estado)"
            ))
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Accept the payment of an order, moving the order to `APROBADO`.
pub fn approve(order_id: i64) -> Mutation {
    review(order_id, OrderStatus::Approved, "approved")
}

/// Reject the payment of an order, moving the order to `PAGO_NO_VALIDO`.
pub fn reject(order_id: i64) -> Mutation {
    review(order_id, OrderStatus::PaymentRejected, "rejected")
}

fn review(order_id: i64, status: OrderStatus, verb: &str) -> Mutation {
    Mutation::new(format!("Payment for order {order_id} {verb}")).step(MutationStep::Update {
        target: RequestDescriptor::by_id("pedidos", "id_pedido", order_id),
        body: json!({ "estado": status.as_str() }),
    })
}

/// Record the amount read from a receipt.
pub fn set_amount(payment_id: i64, amount: Money) -> Mutation {
    Mutation::new(format!("Payment {payment_id} amount set to {amount}")).step(
        MutationStep::Update {
            target: RequestDescriptor::by_id(Payment::TABLE, Payment::ID_COLUMN, payment_id),
            body: json!({ "monto": amount }),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_difference() {
        let payment: Payment = serde_json::from_str(
            r#"{"id_pago": 3, "id_pedido": 12, "metodo": "yape", "monto": 50,
                "pedido": {"total": "45.50", "estado": "EN_REVISION"}}"#,
        )
        .unwrap();
        assert_eq!(payment.difference(), Some(Money::from_cents(450)));
        assert_eq!(payment.order_status(), Some(&OrderStatus::PendingReview));
    }

    #[test]
    fn test_difference_needs_both_amounts() {
        let payment: Payment =
            serde_json::from_str(r#"{"id_pago": 3, "monto": 50, "pedido": null}"#).unwrap();
        assert_eq!(payment.difference(), None);
    }

    #[test]
    fn test_approve_and_reject_patch_the_order() {
        for (mutation, status) in [(approve(12), "APROBADO"), (reject(12), "PAGO_NO_VALIDO")] {
            match &mutation.steps()[0] {
                MutationStep::Update { target, body } => {
                    assert_eq!(target.path(), "pedidos?id_pedido=eq.12");
                    assert_eq!(body["estado"], status);
                }
                other => panic!("unexpected step {other:?}"),
            }
        }
    }

    #[test]
    fn test_set_amount_sends_exact_decimal() {
        let mutation = set_amount(3, Money::from_cents(4550));
        match &mutation.steps()[0] {
            MutationStep::Update { target, body } => {
                assert_eq!(target.path(), "pagos?id_pago=eq.3");
                assert_eq!(body, &json!({"monto": "45.50"}));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }
}

//! Payment review commands.

use super::{
    ListOptions, OutputOptions, apply, connect, focus, list_output, open, page_size, write_output,
};
use crate::config::Config;
use crate::display::PaymentRow;
use crate::error::{PasteleriaError, Result};
use crate::resource::Payment;
use crate::resource::payment;
use crate::screen::{Mutation, Screen};
use crate::types::DEFAULT_PAYMENT_STATUSES;
use crate::validate::parse_amount;

pub async fn cmd_payments_ls(options: ListOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let filter = options.filter(page_size(&config), DEFAULT_PAYMENT_STATUSES);
    let screen = open::<Payment>(gateway, filter).await?;
    list_output::<Payment, PaymentRow>(&screen, "payments").print(output)
}

/// Payments of one order; a numeric term matches the order column.
async fn payments_of(order_id: i64) -> Result<Screen<Payment>> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let screen = focus::<Payment>(gateway, order_id).await?;
    if screen.state().visible().is_empty() {
        return Err(PasteleriaError::NotFound(format!(
            "no payment registered for order {order_id}"
        )));
    }
    Ok(screen)
}

async fn review(order_id: i64, mutation: Mutation, action: &str, output: OutputOptions) -> Result<()> {
    let mut screen = payments_of(order_id).await?;
    let label = apply(&mut screen, mutation).await?;
    write_output::<Payment, PaymentRow>(&screen, action, &label).print(output)
}

pub async fn cmd_payments_approve(order_id: i64, output: OutputOptions) -> Result<()> {
    review(order_id, payment::approve(order_id), "payment_approve", output).await
}

pub async fn cmd_payments_reject(order_id: i64, output: OutputOptions) -> Result<()> {
    review(order_id, payment::reject(order_id), "payment_reject", output).await
}

/// Correct the registered amount of a payment, shown among the payments of
/// its order.
pub async fn cmd_payments_amount(
    order_id: i64,
    payment_id: i64,
    amount: &str,
    output: OutputOptions,
) -> Result<()> {
    let amount = parse_amount(amount)?;
    let mut screen = payments_of(order_id).await?;
    screen.select(payment_id).map_err(|_| {
        PasteleriaError::NotFound(format!("payment {payment_id} for order {order_id}"))
    })?;
    let label = apply(&mut screen, payment::set_amount(payment_id, amount)).await?;
    write_output::<Payment, PaymentRow>(&screen, "payment_amount", &label).print(output)
}

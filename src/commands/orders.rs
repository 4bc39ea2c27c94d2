//! Order commands.
//!
//! - `orders ls`: List orders, by default the ones waiting on the shop
//! - `orders show`: One order with its lines
//! - `orders status`: Move an order to another status
//! - `orders assign`: Hand an order to a delivery person
//! - `orders watch`: Kitchen view, refreshed on an interval

use std::sync::Arc;
use std::time::Duration;

use jiff::Zoned;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{
    CommandOutput, ListOptions, OutputOptions, apply, connect, focus, list_output, open,
    page_size, write_output,
};
use crate::config::Config;
use crate::display::{
    KitchenRow, LineRow, OrderRow, format_date_time, format_money, format_order_status_colored,
    format_short_date, format_time, or_placeholder, render_table,
};
use crate::error::{PasteleriaError, Result};
use crate::gateway::Gateway;
use crate::money::Money;
use crate::query::FilterState;
use crate::resource::order::{self, lines_of};
use crate::resource::{DeliveryPerson, Order, OrderLine, delivery};
use crate::screen::{Notice, Screen};
use crate::types::{DEFAULT_ORDER_STATUSES, KITCHEN_STATUSES, OrderStatus};
use crate::validate::parse_departure;

pub async fn cmd_orders_ls(options: ListOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let filter = options.filter(page_size(&config), DEFAULT_ORDER_STATUSES);
    let screen = open::<Order>(gateway, filter).await?;
    list_output::<Order, OrderRow>(&screen, "orders").print(output)
}

pub async fn cmd_orders_show(id: i64, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;

    let mut orders = focus::<Order>(gateway.clone(), id).await?;
    let order = orders.select(id)?.clone();
    let line_screen = open::<OrderLine>(gateway, lines_of(id)).await?;
    let lines: Vec<&OrderLine> = line_screen.state().visible();
    let lines_total = lines
        .iter()
        .fold(Money::ZERO, |sum, line| sum + line.subtotal());

    let json = json!({
        "order": order,
        "lines": lines,
        "lines_total": lines_total,
    });

    let customer = order.customer.clone().unwrap_or_default();
    let mut text = String::new();
    text.push_str(&format!(
        "{} {}\n\n",
        format!("Order {}", order.id).cyan().bold(),
        format_order_status_colored(order.status.as_ref())
    ));
    let fields = [
        ("Customer", or_placeholder(Some(customer.full_name().as_str()))),
        ("Phone", or_placeholder(customer.telefono.as_deref())),
        ("Ordered", format_date_time(order.ordered_at.as_deref())),
        (
            "Delivery",
            format!(
                "{} {}",
                format_short_date(order.delivery_date.as_deref()),
                format_time(order.delivery_time.as_deref())
            ),
        ),
        ("District", or_placeholder(order.district.as_deref())),
        ("Address", or_placeholder(order.address.as_deref())),
        ("Reference", or_placeholder(order.reference.as_deref())),
        ("Total", format_money(order.total)),
    ];
    for (label, value) in fields {
        text.push_str(&format!("{:<10} {}\n", format!("{label}:").dimmed(), value));
    }

    text.push('\n');
    if lines.is_empty() {
        text.push_str(&"No lines".dimmed().to_string());
    } else {
        let rows: Vec<LineRow> = lines.iter().map(|l| LineRow::from(*l)).collect();
        text.push_str(&render_table(rows));
        text.push_str(&format!("\n{:<10} {}", "Lines:".dimmed(), lines_total));
        if let Some(total) = order.total
            && total != lines_total
        {
            text.push_str(&format!(
                " {}",
                format!("(order total {total})").yellow()
            ));
        }
    }

    CommandOutput::new(json).with_text(text).print(output)
}

pub async fn cmd_orders_status(id: i64, status: OrderStatus, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;

    let mut screen = focus::<Order>(gateway, id).await?;
    let current = screen.select(id)?;
    if current.status.as_ref() == Some(&status) {
        return Err(PasteleriaError::Validation(format!(
            "order {id} is already {status}"
        )));
    }

    let label = apply(&mut screen, order::set_status(id, &status)).await?;
    write_output::<Order, OrderRow>(&screen, "order_status", &label).print(output)
}

pub async fn cmd_orders_assign(
    id: i64,
    delivery_id: i64,
    departure: &str,
    output: OutputOptions,
) -> Result<()> {
    let departure = parse_departure(departure)?;

    let config = Config::load()?;
    let gateway = connect(&config)?;

    let mut people = focus::<DeliveryPerson>(gateway.clone(), delivery_id).await?;
    people.select(delivery_id).map_err(|_| {
        PasteleriaError::NotFound(format!("active delivery person {delivery_id}"))
    })?;

    let mut screen = focus::<Order>(gateway, id).await?;
    screen.select(id)?;

    let label = apply(&mut screen, delivery::assign(id, delivery_id, &departure)).await?;
    write_output::<Order, OrderRow>(&screen, "order_assign", &label).print(output)
}

/// Kitchen view: prints the matching orders every time a refresh lands.
pub async fn cmd_orders_watch(
    statuses: Vec<String>,
    interval: Option<u64>,
    output: OutputOptions,
) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let period = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.auto_refresh());

    let statuses = if statuses.is_empty() {
        KITCHEN_STATUSES.iter().map(|s| s.to_string()).collect()
    } else {
        statuses
    };
    let filter = FilterState::new(page_size(&config)).with_statuses(statuses);
    let mut screen = Screen::<Order>::new(gateway.clone(), filter);
    screen.refresh()?;
    screen.start_auto_refresh(period);
    tracing::info!(period_secs = period.as_secs(), "watching orders");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = screen.next_event() => {
                let Some(event) = event else { break };
                match screen.handle(event) {
                    Some(Notice::Loaded { .. }) => {
                        kitchen_output(&screen, &gateway, Zoned::now())
                            .await
                            .print(output)?;
                    }
                    Some(Notice::FetchFailed { message, .. }) => {
                        eprintln!("{} {}", "warning:".yellow(), message);
                    }
                    _ => {}
                }
            }
        }
    }

    screen.close();
    Ok(())
}

/// The orders on screen with their waiting time and first items.
///
/// Lines that fail to load leave the order without items.
async fn kitchen_output(
    screen: &Screen<Order>,
    gateway: &Arc<dyn Gateway>,
    now: Zoned,
) -> CommandOutput {
    let orders = screen.state().visible();
    let mut rows = Vec::with_capacity(orders.len());
    let mut entries = Vec::with_capacity(orders.len());
    for order in orders {
        let loaded = open::<OrderLine>(gateway.clone(), lines_of(order.id)).await;
        let lines: Vec<OrderLine> = match loaded {
            Ok(lines) => lines.state().records().to_vec(),
            Err(e) => {
                tracing::warn!(order = order.id, error = %e, "failed to load order lines");
                Vec::new()
            }
        };
        let row = KitchenRow::new(order, &lines, now.timestamp());
        entries.push(json!({
            "order": order,
            "elapsed": row.elapsed,
            "lines": lines,
        }));
        rows.push(row);
    }

    let stamp = now.strftime("%H:%M:%S").to_string();
    let json = json!({ "at": now.timestamp().to_string(), "orders": entries });
    let mut text = format!("{}\n", format!("── {stamp} ──").cyan());
    if rows.is_empty() {
        text.push_str(&"No orders in the kitchen".dimmed().to_string());
    } else {
        text.push_str(&render_table(rows));
    }
    CommandOutput::new(json).with_text(text)
}

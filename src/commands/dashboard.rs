//! Order counts per status.

use std::collections::BTreeMap;

use serde_json::json;
use tabled::Tabled;

use super::{CommandOutput, OutputOptions, connect};
use crate::config::Config;
use crate::display::render_table;
use crate::error::Result;
use crate::query::RequestDescriptor;
use crate::resource::{OrderStatusRow, Resource};
use crate::screen::fetch::fetch_all;
use crate::types::OrderStatus;

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Orders")]
    count: usize,
}

/// Count rows per status. Every known status is present, unknown ones are
/// appended in name order and rows without a status are not counted.
pub fn count_by_status(rows: &[OrderStatusRow]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = OrderStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut unknown: BTreeMap<String, usize> = BTreeMap::new();

    for status in rows.iter().filter_map(|r| r.status.as_ref()) {
        match counts.iter_mut().find(|(name, _)| name == status.as_str()) {
            Some((_, count)) => *count += 1,
            None => *unknown.entry(status.as_str().to_string()).or_default() += 1,
        }
    }
    counts.extend(unknown);
    counts
}

pub async fn cmd_dashboard(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;

    let descriptor =
        RequestDescriptor::new(OrderStatusRow::TABLE).param("select", OrderStatusRow::SELECT);
    let rows = fetch_all::<OrderStatusRow>(gateway.as_ref(), &descriptor).await?;
    let counts = count_by_status(&rows);

    let json = json!({
        "total": rows.len(),
        "counts": counts.iter().cloned().collect::<BTreeMap<_, _>>(),
    });
    let table = render_table(
        counts
            .into_iter()
            .map(|(status, count)| CountRow { status, count })
            .collect(),
    );
    let text = format!("{table}\nTotal orders: {}", rows.len());
    CommandOutput::new(json).with_text(text).print(output)
}

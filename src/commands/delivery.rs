use super::{ListOptions, OutputOptions, connect, list_output, open, page_size};
use crate::config::Config;
use crate::display::DeliveryRow;
use crate::error::Result;
use crate::resource::DeliveryPerson;

/// Active delivery people, the candidates for `orders assign`.
pub async fn cmd_delivery_ls(options: ListOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let filter = options.filter(page_size(&config), &[]);
    let screen = open::<DeliveryPerson>(gateway, filter).await?;
    list_output::<DeliveryPerson, DeliveryRow>(&screen, "delivery people").print(output)
}

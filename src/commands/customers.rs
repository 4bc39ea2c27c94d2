use super::{ListOptions, OutputOptions, connect, list_output, open, page_size};
use crate::config::Config;
use crate::display::CustomerRow;
use crate::error::Result;
use crate::resource::Customer;

pub async fn cmd_customers_ls(options: ListOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let filter = options.filter(page_size(&config), &[]);
    let screen = open::<Customer>(gateway, filter).await?;
    list_output::<Customer, CustomerRow>(&screen, "customers").print(output)
}

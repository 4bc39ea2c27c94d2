//! Product catalog commands.

use super::{
    ListOptions, OutputOptions, apply, connect, focus, list_output, open, page_size, write_output,
};
use crate::config::Config;
use crate::display::ProductRow;
use crate::error::Result;
use crate::query::FilterState;
use crate::resource::Product;
use crate::resource::product;
use crate::screen::{Mutation, Screen};
use crate::types::ProductStatus;
use crate::validate::{ProductDraft, ProductForm, parse_amount, parse_increment};

pub async fn cmd_products_ls(options: ListOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let filter = options.filter(page_size(&config), &[]);
    let screen = open::<Product>(gateway, filter).await?;
    list_output::<Product, ProductRow>(&screen, "products").print(output)
}

async fn product_screen(id: i64) -> Result<Screen<Product>> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let mut screen = focus::<Product>(gateway, id).await?;
    screen.select(id)?;
    Ok(screen)
}

async fn write(id: i64, mutation: Mutation, action: &str, output: OutputOptions) -> Result<()> {
    let mut screen = product_screen(id).await?;
    let label = apply(&mut screen, mutation).await?;
    write_output::<Product, ProductRow>(&screen, action, &label).print(output)
}

pub async fn cmd_products_create(form: ProductForm, output: OutputOptions) -> Result<()> {
    let draft = ProductDraft::from_form(&form)?;

    let config = Config::load()?;
    let gateway = connect(&config)?;
    // The refresh after the insert lists products with the new name
    let filter = FilterState::new(page_size(&config)).with_term(draft.name.clone());
    let mut screen = open::<Product>(gateway, filter).await?;
    let label = apply(&mut screen, product::create(&draft)).await?;
    write_output::<Product, ProductRow>(&screen, "product_create", &label).print(output)
}

pub async fn cmd_products_update(id: i64, form: ProductForm, output: OutputOptions) -> Result<()> {
    let draft = ProductDraft::from_form(&form)?;
    write(id, product::update(id, &draft), "product_update", output).await
}

pub async fn cmd_products_price(id: i64, price: &str, output: OutputOptions) -> Result<()> {
    let price = parse_amount(price)?;
    write(id, product::set_price(id, price), "product_price", output).await
}

/// Add units to the current stock.
pub async fn cmd_products_stock(id: i64, added: &str, output: OutputOptions) -> Result<()> {
    let added = parse_increment(added)?;
    let mut screen = product_screen(id).await?;
    let current = screen.selected().and_then(|p| p.stock).unwrap_or(0);
    let label = apply(&mut screen, product::add_stock(id, current, added)).await?;
    write_output::<Product, ProductRow>(&screen, "product_stock", &label).print(output)
}

pub async fn cmd_products_status(
    id: i64,
    status: ProductStatus,
    output: OutputOptions,
) -> Result<()> {
    write(id, product::set_status(id, &status), "product_status", output).await
}

pub async fn cmd_products_rm(id: i64, output: OutputOptions) -> Result<()> {
    write(id, product::delete(id), "product_delete", output).await
}

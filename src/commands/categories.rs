use super::{ListOptions, OutputOptions, apply, connect, focus, list_output, open, write_output};
use crate::config::Config;
use crate::display::CategoryRow;
use crate::error::Result;
use crate::query::FilterState;
use crate::resource::Category;
use crate::resource::category::{self, CATEGORY_PAGE_SIZE};
use crate::validate::CategoryDraft;

pub async fn cmd_categories_ls(options: ListOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let gateway = connect(&config)?;
    let screen = open::<Category>(gateway, options.filter(CATEGORY_PAGE_SIZE, &[])).await?;
    list_output::<Category, CategoryRow>(&screen, "categories").print(output)
}

pub async fn cmd_categories_create(
    name: &str,
    description: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let draft = CategoryDraft::new(name, description.unwrap_or(""))?;

    let config = Config::load()?;
    let gateway = connect(&config)?;
    let filter = FilterState::new(CATEGORY_PAGE_SIZE).with_term(draft.name.clone());
    let mut screen = open::<Category>(gateway, filter).await?;
    let label = apply(&mut screen, category::create(&draft)).await?;
    write_output::<Category, CategoryRow>(&screen, "category_create", &label).print(output)
}

pub async fn cmd_categories_update(
    id: i64,
    name: &str,
    description: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let draft = CategoryDraft::new(name, description.unwrap_or(""))?;

    let config = Config::load()?;
    let gateway = connect(&config)?;
    let mut screen = focus::<Category>(gateway, id).await?;
    screen.select(id)?;
    let label = apply(&mut screen, category::update(id, &draft)).await?;
    write_output::<Category, CategoryRow>(&screen, "category_update", &label).print(output)
}

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::commands::{ListOptions, OutputOptions};
use crate::types::{OrderStatus, ProductStatus, VALID_ORDER_STATUSES, VALID_PRODUCT_STATUSES};
use crate::validate::ProductForm;

#[derive(Parser)]
#[command(name = "pasteleria")]
#[command(about = "Orders, payments and catalog for the bakery backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Orders
    #[command(visible_alias = "o")]
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Payment review
    #[command(visible_alias = "p")]
    Payments {
        #[command(subcommand)]
        action: PaymentAction,
    },

    /// Product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Product categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Registered customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Delivery people
    Delivery {
        #[command(subcommand)]
        action: DeliveryAction,
    },

    /// Order counts per status
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Filters and paging shared by the list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Free-text term, or an ID when all digits
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long, value_parser = parse_positive)]
    pub page: Option<u64>,

    /// Rows per page (default: list.page_size)
    #[arg(long, value_parser = parse_positive)]
    pub limit: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn options(&self) -> ListOptions {
        ListOptions {
            search: self.search.clone(),
            page: self.page,
            limit: self.limit,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders (default: APROBADO, SERVIDO, NO_ENCONTRADO)
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only these statuses (repeatable)
        #[arg(long = "status", value_parser = parse_order_status_name)]
        statuses: Vec<String>,

        /// Every status
        #[arg(long, conflicts_with = "statuses")]
        all: bool,
    },

    /// Show one order with its lines
    Show {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move an order to another status
    Status {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        /// New status
        #[arg(value_parser = parse_order_status)]
        status: OrderStatus,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign an order to a delivery person
    Assign {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        /// Delivery person ID
        #[arg(long, value_parser = parse_positive_id)]
        delivery: i64,

        /// Departure time (HH:MM)
        #[arg(long)]
        departure: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Kitchen view, refreshed until interrupted
    Watch {
        /// Only these statuses (default: EN_COCINA, EN_PREPARACION)
        #[arg(long = "status", value_parser = parse_order_status_name)]
        statuses: Vec<String>,

        /// Seconds between refreshes (default: list.auto_refresh)
        #[arg(long, value_parser = parse_positive)]
        interval: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PaymentAction {
    /// List payments (default: orders EN_REVISION)
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only payments of orders in these statuses (repeatable)
        #[arg(long = "status", value_parser = parse_order_status_name)]
        statuses: Vec<String>,

        /// Every status
        #[arg(long, conflicts_with = "statuses")]
        all: bool,
    },

    /// Approve the payment of an order
    Approve {
        #[arg(value_parser = parse_positive_id)]
        order_id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reject the payment of an order
    Reject {
        #[arg(value_parser = parse_positive_id)]
        order_id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Correct the registered amount of a payment
    Amount {
        #[arg(value_parser = parse_positive_id)]
        order_id: i64,

        #[arg(value_parser = parse_positive_id)]
        payment_id: i64,

        /// Amount, e.g. 45.50
        amount: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProductArgs {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,

    /// Description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Unit price, e.g. 12.50
    #[arg(long)]
    pub price: Option<String>,

    /// Units in stock (default: 0)
    #[arg(long)]
    pub stock: Option<String>,

    /// Category ID
    #[arg(long)]
    pub category: Option<String>,

    /// ACTIVO or INACTIVO (default: ACTIVO)
    #[arg(long)]
    pub status: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<ProductArgs> for ProductForm {
    fn from(args: ProductArgs) -> Self {
        ProductForm {
            name: args.name,
            description: args.description,
            price: args.price,
            stock: args.stock,
            category: args.category,
            status: args.status,
            image_url: args.image_url,
        }
    }
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products
    Ls {
        #[command(flatten)]
        list: ListArgs,

        /// Only this category
        #[arg(long, value_parser = parse_positive_id)]
        category: Option<i64>,

        /// Only these statuses (repeatable)
        #[arg(long = "status", value_parser = parse_product_status_name)]
        statuses: Vec<String>,
    },

    /// Create a product
    Create {
        #[command(flatten)]
        product: ProductArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace every field of a product
    Update {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        #[command(flatten)]
        product: ProductArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the price of a product
    Price {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        /// New price, e.g. 12.50
        price: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add units to the stock of a product
    Stock {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        /// Units to add (negative values add nothing)
        #[arg(allow_negative_numbers = true)]
        added: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Activate or deactivate a product
    Status {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        #[arg(value_parser = parse_product_status)]
        status: ProductStatus,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a product
    Rm {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    Ls {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Create a category
    Create {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename or describe a category
    Update {
        #[arg(value_parser = parse_positive_id)]
        id: i64,

        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CustomerAction {
    /// List customers
    Ls {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
pub enum DeliveryAction {
    /// List active delivery people
    Ls {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Key in dot notation, e.g. backend.url
        key: String,

        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a configuration value
    Get {
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn out(json: bool) -> OutputOptions {
    OutputOptions { json }
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::*;

        match self {
            Commands::Orders { action } => match action {
                OrderAction::Ls {
                    list,
                    statuses,
                    all,
                } => {
                    let options = ListOptions {
                        statuses,
                        all,
                        ..list.options()
                    };
                    cmd_orders_ls(options, out(list.json)).await
                }
                OrderAction::Show { id, json } => cmd_orders_show(id, out(json)).await,
                OrderAction::Status { id, status, json } => {
                    cmd_orders_status(id, status, out(json)).await
                }
                OrderAction::Assign {
                    id,
                    delivery,
                    departure,
                    json,
                } => cmd_orders_assign(id, delivery, &departure, out(json)).await,
                OrderAction::Watch {
                    statuses,
                    interval,
                    json,
                } => cmd_orders_watch(statuses, interval, out(json)).await,
            },

            Commands::Payments { action } => match action {
                PaymentAction::Ls {
                    list,
                    statuses,
                    all,
                } => {
                    let options = ListOptions {
                        statuses,
                        all,
                        ..list.options()
                    };
                    cmd_payments_ls(options, out(list.json)).await
                }
                PaymentAction::Approve { order_id, json } => {
                    cmd_payments_approve(order_id, out(json)).await
                }
                PaymentAction::Reject { order_id, json } => {
                    cmd_payments_reject(order_id, out(json)).await
                }
                PaymentAction::Amount {
                    order_id,
                    payment_id,
                    amount,
                    json,
                } => cmd_payments_amount(order_id, payment_id, &amount, out(json)).await,
            },

            Commands::Products { action } => match action {
                ProductAction::Ls {
                    list,
                    category,
                    statuses,
                } => {
                    let options = ListOptions {
                        category,
                        statuses,
                        ..list.options()
                    };
                    cmd_products_ls(options, out(list.json)).await
                }
                ProductAction::Create { product, json } => {
                    cmd_products_create(product.into(), out(json)).await
                }
                ProductAction::Update { id, product, json } => {
                    cmd_products_update(id, product.into(), out(json)).await
                }
                ProductAction::Price { id, price, json } => {
                    cmd_products_price(id, &price, out(json)).await
                }
                ProductAction::Stock { id, added, json } => {
                    cmd_products_stock(id, &added, out(json)).await
                }
                ProductAction::Status { id, status, json } => {
                    cmd_products_status(id, status, out(json)).await
                }
                ProductAction::Rm { id, json } => cmd_products_rm(id, out(json)).await,
            },

            Commands::Categories { action } => match action {
                CategoryAction::Ls { list } => {
                    cmd_categories_ls(list.options(), out(list.json)).await
                }
                CategoryAction::Create {
                    name,
                    description,
                    json,
                } => cmd_categories_create(&name, description.as_deref(), out(json)).await,
                CategoryAction::Update {
                    id,
                    name,
                    description,
                    json,
                } => cmd_categories_update(id, &name, description.as_deref(), out(json)).await,
            },

            Commands::Customers {
                action: CustomerAction::Ls { list },
            } => cmd_customers_ls(list.options(), out(list.json)).await,

            Commands::Delivery {
                action: DeliveryAction::Ls { list },
            } => cmd_delivery_ls(list.options(), out(list.json)).await,

            Commands::Dashboard { json } => cmd_dashboard(out(json)).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(out(json)),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, out(json)),
                ConfigAction::Get { key, json } => cmd_config_get(&key, out(json)),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_order_status(s: &str) -> Result<OrderStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_ORDER_STATUSES,
    )
}

fn parse_order_status_name(s: &str) -> Result<String, String> {
    parse_order_status(s).map(|status| status.as_str().to_string())
}

fn parse_product_status(s: &str) -> Result<ProductStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_PRODUCT_STATUSES,
    )
}

fn parse_product_status_name(s: &str) -> Result<String, String> {
    parse_product_status(s).map(|status| status.as_str().to_string())
}

fn parse_positive(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("'{s}' must be a positive integer")),
    }
}

fn parse_positive_id(s: &str) -> Result<i64, String> {
    crate::validate::parse_id("ID", s).map_err(|e| e.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "pasteleria", &mut io::stdout());
}

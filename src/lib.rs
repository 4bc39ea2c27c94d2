pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod money;
pub mod query;
pub mod resource;
pub mod screen;
pub mod types;
pub mod validate;

pub use config::Config;
pub use error::{PasteleriaError, Result};
pub use gateway::{Gateway, GatewayRequest, GatewayResponse, PostgrestGateway, Prefer};
pub use money::Money;
pub use query::{FilterState, RequestDescriptor, SearchTerm, SortOrder, build};
pub use resource::{
    Category, Customer, DeliveryAssignment, DeliveryPerson, Order, OrderLine, Payment, Product,
    Resource,
};
pub use screen::{
    Generation, ListState, Mutation, MutationStep, Notice, Page, RangeLabel, Reconciliation,
    Screen, ScreenEvent,
};
pub use types::{OrderStatus, ProductStatus};

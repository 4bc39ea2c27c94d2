use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Resource;
use crate::money::Money;
use crate::query::{RequestDescriptor, SortOrder};
use crate::screen::mutation::{Mutation, MutationStep, delete_by_id};
use crate::types::ProductStatus;
use crate::validate::ProductDraft;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryName {
    pub nombre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Option<Money>,
    pub stock: Option<i64>,
    #[serde(rename = "id_categoria")]
    pub category_id: Option<i64>,
    #[serde(rename = "estado")]
    pub status: Option<ProductStatus>,
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<CategoryName>,
}

impl Product {
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .and_then(|c| c.nombre.as_deref())
            .unwrap_or("")
    }
}

impl Resource for Product {
    const TABLE: &'static str = "productos";
    const ID_COLUMN: &'static str = "id_producto";
    const SELECT: &'static str = "id_producto,nombre,descripcion,precio,stock,id_categoria,estado,\
imagen_url,categoria:categorias(nombre)";
    const TEXT_COLUMNS: &'static [&'static str] = &["nombre", "descripcion"];
    const STATUS_COLUMN: Option<&'static str> = Some("estado");
    const CATEGORY_COLUMN: Option<&'static str> = Some("id_categoria");

    fn default_order() -> SortOrder {
        SortOrder::asc("nombre")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

fn by_id(product_id: i64) -> RequestDescriptor {
    RequestDescriptor::by_id(Product::TABLE, Product::ID_COLUMN, product_id)
}

pub fn create(draft: &ProductDraft) -> Mutation {
    Mutation::new(format!("Product '{}' created", draft.name)).step(MutationStep::Create {
        target: RequestDescriptor::new(Product::TABLE),
        body: json!([draft.to_json()]),
    })
}

pub fn update(product_id: i64, draft: &ProductDraft) -> Mutation {
    Mutation::new(format!("Product {product_id} updated")).step(MutationStep::Update {
        target: by_id(product_id),
        body: draft.to_json(),
    })
}

pub fn set_price(product_id: i64, price: Money) -> Mutation {
    Mutation::new(format!("Product {product_id} price set to {price}")).step(
        MutationStep::Update {
            target: by_id(product_id),
            body: json!({ "precio": price }),
        },
    )
}

/// Set the stock to `current + added`. The increment is computed from the
/// stock on screen, so callers pass both.
pub fn add_stock(product_id: i64, current: i64, added: i64) -> Mutation {
    let stock = current.max(0) + added.max(0);
    Mutation::new(format!("Product {product_id} stock set to {stock}")).step(
        MutationStep::Update {
            target: by_id(product_id),
            body: json!({ "stock": stock }),
        },
    )
}

pub fn set_status(product_id: i64, status: &ProductStatus) -> Mutation {
    Mutation::new(format!("Product {product_id} set to {status}")).step(MutationStep::Update {
        target: by_id(product_id),
        body: json!({ "estado": status.as_str() }),
    })
}

pub fn delete(product_id: i64) -> Mutation {
    delete_by_id::<Product>(product_id, format!("Product {product_id} deleted"))
}

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Resource;
use crate::query::{RequestDescriptor, SortOrder};
use crate::screen::mutation::{Mutation, MutationStep};
use crate::validate::CategoryDraft;

/// Category lists are short, the screen loads them in one page.
pub const CATEGORY_PAGE_SIZE: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "id_categoria")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl Resource for Category {
    const TABLE: &'static str = "categorias";
    const ID_COLUMN: &'static str = "id_categoria";
    const SELECT: &'static str = "id_categoria,nombre,descripcion";
    const TEXT_COLUMNS: &'static [&'static str] = &["nombre", "descripcion"];

    fn default_order() -> SortOrder {
        SortOrder::asc("nombre")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

fn payload(draft: &CategoryDraft) -> serde_json::Value {
    json!({
        "nombre": draft.name,
        "descripcion": draft.description,
    })
}

pub fn create(draft: &CategoryDraft) -> Mutation {
    Mutation::new(format!("Category '{}' created", draft.name)).step(MutationStep::Create {
        target: RequestDescriptor::new(Category::TABLE),
        body: json!([payload(draft)]),
    })
}

pub fn update(category_id: i64, draft: &CategoryDraft) -> Mutation {
    Mutation::new(format!("Category {category_id} updated")).step(MutationStep::Update {
        target: RequestDescriptor::by_id(Category::TABLE, Category::ID_COLUMN, category_id),
        body: payload(draft),
    })
}

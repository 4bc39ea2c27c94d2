use serde::{Deserialize, Serialize};

use super::{Resource, full_name};
use crate::query::SortOrder;

/// A registered customer. The password column is never selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "id_cliente")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "distrito")]
    pub district: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "referencia")]
    pub reference: Option<String>,
    #[serde(rename = "fecha_registro")]
    pub registered_at: Option<String>,
    #[serde(rename = "fecha_cumple")]
    pub birthday: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    /// Phone reduced to digits and a leading `+`.
    pub fn normalized_phone(&self) -> String {
        let raw = self.phone.as_deref().unwrap_or("").trim();
        let mut out = String::with_capacity(raw.len());
        for (i, c) in raw.chars().enumerate() {
            if c.is_ascii_digit() || (c == '+' && i == 0) {
                out.push(c);
            }
        }
        out
    }

    /// `district - address (reference)`, leaving out what is missing.
    pub fn full_address(&self) -> String {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let mut out = match (clean(&self.district), clean(&self.address)) {
            (Some(d), Some(a)) => format!("{d} - {a}"),
            (Some(d), None) => d,
            (None, Some(a)) => a,
            (None, None) => String::new(),
        };
        if let Some(reference) = clean(&self.reference) {
            if out.is_empty() {
                out = format!("({reference})");
            } else {
                out.push_str(&format!(" ({reference})"));
            }
        }
        out
    }
}

impl Resource for Customer {
    const TABLE: &'static str = "cliente";
    const ID_COLUMN: &'static str = "id_cliente";
    const SELECT: &'static str = "id_cliente,nombre,apellido,email,telefono,distrito,direccion,\
referencia,fecha_registro,fecha_cumple";
    const TEXT_COLUMNS: &'static [&'static str] = &["nombre", "apellido", "email", "telefono"];

    fn default_order() -> SortOrder {
        SortOrder::asc("nombre")
    }

    fn id(&self) -> i64 {
        self.id
    }
}

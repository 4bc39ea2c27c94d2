//! Filter predicates in the PostgREST query grammar.
//!
//! Values are percent-encoded; the operators around them (`eq.`, `ilike.`,
//! `in.(`, `or=(`, the commas separating terms and the `*` wildcards) are
//! written as is so the backend can parse them.

use url::form_urlencoded;

/// Characters with a meaning inside `in.(...)` and `or=(...)` lists.
const LIST_RESERVED: &[char] = &[',', '(', ')', '.', ':', '"', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = value`
    Eq { column: String, value: String },
    /// Case-insensitive substring match on `column`.
    Contains { column: String, needle: String },
    /// `column` is one of `values`.
    In { column: String, values: Vec<String> },
    /// Logical OR of the inner predicates.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Predicate::Eq {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn contains(column: &str, needle: &str) -> Self {
        Predicate::Contains {
            column: column.to_string(),
            needle: needle.to_string(),
        }
    }

    pub fn one_of<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive match of `needle` on any of `columns`.
    ///
    /// A single column collapses to a plain [`Predicate::Contains`].
    pub fn contains_any(columns: &[&str], needle: &str) -> Self {
        match columns {
            [column] => Predicate::contains(column, needle),
            _ => Predicate::AnyOf(
                columns
                    .iter()
                    .map(|column| Predicate::contains(column, needle))
                    .collect(),
            ),
        }
    }

    /// Encode as a top-level query parameter `(name, value)`.
    pub fn to_param(&self) -> (String, String) {
        match self {
            Predicate::Eq { column, value } => (column.clone(), format!("eq.{}", encode(value))),
            Predicate::Contains { column, needle } => {
                (column.clone(), format!("ilike.*{}*", encode(needle)))
            }
            Predicate::In { column, values } => (column.clone(), format!("in.{}", encode_list(values))),
            Predicate::AnyOf(inner) => ("or".to_string(), format!("({})", join_nested(inner))),
        }
    }

    /// Encode as a term nested inside `or=(...)`.
    fn to_nested(&self) -> String {
        match self {
            Predicate::Eq { column, value } => format!("{column}.eq.{}", encode_list_item(value)),
            Predicate::Contains { column, needle } => {
                format!("{column}.ilike.{}", encode_list_item(&format!("*{needle}*")))
            }
            Predicate::In { column, values } => format!("{column}.in.{}", encode_list(values)),
            Predicate::AnyOf(inner) => format!("or({})", join_nested(inner)),
        }
    }
}

fn join_nested(inner: &[Predicate]) -> String {
    inner
        .iter()
        .map(Predicate::to_nested)
        .collect::<Vec<_>>()
        .join(",")
}

/// Percent-encode a value, spaces as `%20`.
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn encode_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| encode_list_item(v)).collect();
    format!("({})", items.join(","))
}

/// Encode one item of a list, double-quoting it when it would otherwise be
/// split or misread by the list grammar.
fn encode_list_item(value: &str) -> String {
    if value.chars().any(|c| LIST_RESERVED.contains(&c) || c.is_whitespace()) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", encode(&escaped))
    } else {
        encode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_encodes_value_not_operator() {
        let (name, value) = Predicate::eq("id_pedido", 1024).to_param();
        assert_eq!(name, "id_pedido");
        assert_eq!(value, "eq.1024");
    }

    #[test]
    fn test_contains_encodes_spaces_as_percent20() {
        let (name, value) = Predicate::contains("metodo", "yape plin").to_param();
        assert_eq!(name, "metodo");
        assert_eq!(value, "ilike.*yape%20plin*");
    }

    #[test]
    fn test_in_list_is_one_predicate() {
        let (name, value) = Predicate::one_of("estado", ["APROBADO", "SERVIDO"]).to_param();
        assert_eq!(name, "estado");
        assert_eq!(value, "in.(APROBADO,SERVIDO)");
    }

    #[test]
    fn test_in_list_quotes_reserved_values() {
        let (_, value) = Predicate::one_of("nombre", ["a,b", "plain"]).to_param();
        assert_eq!(value, "in.(\"a%2Cb\",plain)");
    }

    #[test]
    fn test_any_of_joins_with_or() {
        let (name, value) = Predicate::contains_any(&["nombre", "descripcion"], "torta").to_param();
        assert_eq!(name, "or");
        assert_eq!(value, "(nombre.ilike.*torta*,descripcion.ilike.*torta*)");
    }

    #[test]
    fn test_any_of_quotes_terms_with_commas() {
        let (_, value) = Predicate::contains_any(&["nombre", "descripcion"], "fresa, kiwi").to_param();
        assert_eq!(
            value,
            "(nombre.ilike.\"*fresa%2C%20kiwi*\",descripcion.ilike.\"*fresa%2C%20kiwi*\")"
        );
    }

    #[test]
    fn test_single_column_collapses() {
        assert_eq!(
            Predicate::contains_any(&["metodo"], "yape"),
            Predicate::contains("metodo", "yape")
        );
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode("ñandú"), "%C3%B1and%C3%BA");
    }
}

//! Server-side ordering of list queries.

use std::fmt;
use std::str::FromStr;

use crate::error::PasteleriaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Order clause, encoded as `column.direction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortOrder {
    column: String,
    direction: SortDirection,
}

impl SortOrder {
    pub fn asc(column: &str) -> Self {
        SortOrder {
            column: column.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: &str) -> Self {
        SortOrder {
            column: column.to_string(),
            direction: SortDirection::Desc,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Value of the `order` query parameter.
    pub fn encode(&self) -> String {
        format!("{}.{}", self.column, self.direction.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for SortOrder {
    type Err = PasteleriaError;

    /// Parse `column`, `column.asc` or `column.desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || {
            PasteleriaError::Validation(format!(
                "invalid sort '{s}'. Expected <column>, <column>.asc or <column>.desc"
            ))
        };
        let (column, direction) = match s.rsplit_once('.') {
            Some((column, "asc")) => (column, SortDirection::Asc),
            Some((column, "desc")) => (column, SortDirection::Desc),
            Some(_) => return Err(invalid()),
            None => (s, SortDirection::Asc),
        };
        if column.is_empty()
            || !column
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(invalid());
        }
        Ok(SortOrder {
            column: column.to_string(),
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(SortOrder::desc("fecha_pedido").encode(), "fecha_pedido.desc");
        assert_eq!(SortOrder::asc("nombre").to_string(), "nombre.asc");
    }

    #[test]
    fn test_parse() {
        assert_eq!("precio.desc".parse::<SortOrder>().unwrap(), SortOrder::desc("precio"));
        assert_eq!("stock".parse::<SortOrder>().unwrap(), SortOrder::asc("stock"));
        assert!("precio.sideways".parse::<SortOrder>().is_err());
        assert!("a;drop".parse::<SortOrder>().is_err());
        assert!("".parse::<SortOrder>().is_err());
    }
}

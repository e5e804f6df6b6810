//! Physical column data types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Physical column types emitted in CREATE TABLE column lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Decimal with optional precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after the decimal point.
        scale: Option<u16>,
    },
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Unbounded text.
    Text,
    /// Binary large object.
    Blob,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without zone.
    Timestamp,
    /// Boolean.
    Boolean,
    /// Anything else, rendered verbatim.
    Custom(String),
}

impl DataType {
    /// Returns the canonical representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        fn sized(name: &str, len: Option<u32>) -> String {
            len.map_or_else(|| name.to_string(), |n| format!("{name}({n})"))
        }

        match self {
            Self::Smallint => "SMALLINT".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::Bigint => "BIGINT".to_string(),
            Self::Real => "REAL".to_string(),
            Self::Double => "DOUBLE".to_string(),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => "DECIMAL".to_string(),
            },
            Self::Char(len) => sized("CHAR", *len),
            Self::Varchar(len) => sized("VARCHAR", *len),
            Self::Text => "TEXT".to_string(),
            Self::Blob => "BLOB".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Time => "TIME".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Boolean => "BOOLEAN".to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Rebuilds a type from its name and parenthesized arguments.
    ///
    /// Names are matched without regard to ASCII case. Unknown names, and
    /// known names with arguments they do not take, become [`Self::Custom`]
    /// with the canonical text so that rendering stays stable.
    #[must_use]
    pub fn from_parts(name: &str, args: &[u32]) -> Self {
        let upper = name.to_ascii_uppercase();
        let narrow = |n: u32| u16::try_from(n).ok();
        match (upper.as_str(), args) {
            ("SMALLINT", []) => Self::Smallint,
            ("INTEGER" | "INT", []) => Self::Integer,
            ("BIGINT", []) => Self::Bigint,
            ("REAL", []) => Self::Real,
            ("DOUBLE", []) => Self::Double,
            ("DECIMAL" | "NUMERIC", []) => Self::Decimal {
                precision: None,
                scale: None,
            },
            ("DECIMAL" | "NUMERIC", [p]) if narrow(*p).is_some() => Self::Decimal {
                precision: narrow(*p),
                scale: None,
            },
            ("DECIMAL" | "NUMERIC", [p, s]) if narrow(*p).is_some() && narrow(*s).is_some() => {
                Self::Decimal {
                    precision: narrow(*p),
                    scale: narrow(*s),
                }
            }
            ("CHAR", []) => Self::Char(None),
            ("CHAR", [n]) => Self::Char(Some(*n)),
            ("VARCHAR", []) => Self::Varchar(None),
            ("VARCHAR", [n]) => Self::Varchar(Some(*n)),
            ("TEXT", []) => Self::Text,
            ("BLOB", []) => Self::Blob,
            ("DATE", []) => Self::Date,
            ("TIME", []) => Self::Time,
            ("TIMESTAMP" | "DATETIME", []) => Self::Timestamp,
            ("BOOLEAN" | "BOOL", []) => Self::Boolean,
            _ if args.is_empty() => Self::Custom(name.to_string()),
            _ => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                Self::Custom(format!("{name}({})", args.join(", ")))
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

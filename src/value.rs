/// Column values
///
/// A `ColumnValue` is the raw value a column extracts from a row. Filter values
/// are keyed by it, so unlike a plain data enum it has to be hashable, totally
/// ordered, and printable.
///
/// # Equality
///
/// Floats compare by bit pattern. `0.0` and `-0.0` are therefore distinct
/// values, and a NaN equals itself when the bits match. This keeps `Eq`, `Hash`
/// and `Ord` consistent with each other, which the distinct-value projection
/// relies on.
///
/// # Ordering
///
/// Values of the same variant use their natural order (floats by IEEE total
/// order). Mixed variants order by a fixed rank, and `Null` always sorts last.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Column value enum to support multiple types
#[derive(Debug, Clone)]
pub enum ColumnValue {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bool(bool),
    Null,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ColumnValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ColumnValue::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ColumnValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns true if the textual form of this value contains `needle`.
    ///
    /// An empty needle matches every value, including `Null`.
    pub fn contains_text(&self, needle: &str, case_sensitive: bool) -> bool {
        if needle.is_empty() {
            return true;
        }
        let text = self.to_string();
        if case_sensitive {
            text.contains(needle)
        } else {
            text.to_lowercase().contains(&needle.to_lowercase())
        }
    }

    /// Sort rank of the variant, used to order mixed-type columns.
    fn rank(&self) -> u8 {
        match self {
            ColumnValue::Bool(_) => 0,
            ColumnValue::Int32(_) => 1,
            ColumnValue::Int64(_) => 2,
            ColumnValue::Float32(_) => 3,
            ColumnValue::Float64(_) => 4,
            ColumnValue::String(_) => 5,
            ColumnValue::Null => 6,
        }
    }
}

impl PartialEq for ColumnValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnValue::Int32(a), ColumnValue::Int32(b)) => a == b,
            (ColumnValue::Int64(a), ColumnValue::Int64(b)) => a == b,
            (ColumnValue::Float32(a), ColumnValue::Float32(b)) => a.to_bits() == b.to_bits(),
            (ColumnValue::Float64(a), ColumnValue::Float64(b)) => a.to_bits() == b.to_bits(),
            (ColumnValue::String(a), ColumnValue::String(b)) => a == b,
            (ColumnValue::Bool(a), ColumnValue::Bool(b)) => a == b,
            (ColumnValue::Null, ColumnValue::Null) => true,
            _ => false,
        }
    }
}

impl Eq for ColumnValue {}

impl Hash for ColumnValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            ColumnValue::Int32(v) => v.hash(state),
            ColumnValue::Int64(v) => v.hash(state),
            ColumnValue::Float32(v) => v.to_bits().hash(state),
            ColumnValue::Float64(v) => v.to_bits().hash(state),
            ColumnValue::String(v) => v.hash(state),
            ColumnValue::Bool(v) => v.hash(state),
            ColumnValue::Null => {}
        }
    }
}

impl Ord for ColumnValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ColumnValue::Int32(a), ColumnValue::Int32(b)) => a.cmp(b),
            (ColumnValue::Int64(a), ColumnValue::Int64(b)) => a.cmp(b),
            (ColumnValue::Float32(a), ColumnValue::Float32(b)) => a.total_cmp(b),
            (ColumnValue::Float64(a), ColumnValue::Float64(b)) => a.total_cmp(b),
            (ColumnValue::String(a), ColumnValue::String(b)) => a.cmp(b),
            (ColumnValue::Bool(a), ColumnValue::Bool(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for ColumnValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Int32(v) => write!(f, "{}", v),
            ColumnValue::Int64(v) => write!(f, "{}", v),
            ColumnValue::Float32(v) => write!(f, "{}", v),
            ColumnValue::Float64(v) => write!(f, "{}", v),
            ColumnValue::String(v) => f.write_str(v),
            ColumnValue::Bool(v) => write!(f, "{}", v),
            // NULL renders as an empty cell
            ColumnValue::Null => Ok(()),
        }
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Int32(v)
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Int64(v)
    }
}

impl From<f32> for ColumnValue {
    fn from(v: f32) -> Self {
        ColumnValue::Float32(v)
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Float64(v)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Bool(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::String(v.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::String(v)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ColumnValue::Null)
    }
}

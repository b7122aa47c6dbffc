//! FILENAME: core/band-report/src/key.rs
//! Group Keys - Totally ordered values a group definition extracts from a row.
//!
//! Sort order across kinds follows spreadsheet sorting:
//! numbers < text < booleans < blanks.
//! NaN sorts after every other number and equals itself. Integers and
//! floats are one kind and compare by exact value.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupKey {
    Integer(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            GroupKey::Integer(_) | GroupKey::Number(_) => 0,
            GroupKey::Text(_) => 1,
            GroupKey::Boolean(_) => 2,
            GroupKey::Empty => 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GroupKey::Empty)
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn compare_integer_number(i: i64, f: f64) -> Ordering {
    // 2^63 as f64; every float in [-2^63, 2^63) truncates to a valid i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => compare_numbers(whole, f),
        ord => ord,
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Integer(a), GroupKey::Integer(b)) => a.cmp(b),
            (GroupKey::Integer(a), GroupKey::Number(b)) => compare_integer_number(*a, *b),
            (GroupKey::Number(a), GroupKey::Integer(b)) => {
                compare_integer_number(*b, *a).reverse()
            }
            (GroupKey::Number(a), GroupKey::Number(b)) => compare_numbers(*a, *b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            (GroupKey::Boolean(a), GroupKey::Boolean(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Integer(n) => write!(f, "{}", n),
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => f.write_str(s),
            GroupKey::Boolean(true) => f.write_str("TRUE"),
            GroupKey::Boolean(false) => f.write_str("FALSE"),
            GroupKey::Empty => f.write_str("(blank)"),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::Text(value.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        GroupKey::Text(value)
    }
}

impl From<f64> for GroupKey {
    fn from(value: f64) -> Self {
        GroupKey::Number(value)
    }
}

impl From<i64> for GroupKey {
    fn from(value: i64) -> Self {
        GroupKey::Integer(value)
    }
}

impl From<bool> for GroupKey {
    fn from(value: bool) -> Self {
        GroupKey::Boolean(value)
    }
}

impl<T: Into<GroupKey>> From<Option<T>> for GroupKey {
    fn from(value: Option<T>) -> Self {
        value.map_or(GroupKey::Empty, Into::into)
    }
}

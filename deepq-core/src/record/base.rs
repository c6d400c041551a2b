//! Base implementation of records.
use crate::error::DqnError;
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{Iter, Keys},
        HashMap,
    },
    fmt,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like loss.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

/// A container for storing key-value pairs of various data types.
///
/// ```rust
/// use deepq_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss", 0.5);
/// record.insert("env", RecordValue::String("CartPole-v0".to_string()));
/// assert_eq!(record.get_string("env").unwrap(), "CartPole-v0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges another record into this one.
    ///
    /// If both records contain the same key, the value from `record` wins.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, DqnError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(DqnError::RecordValueTypeError("Scalar".to_string())),
            None => Err(DqnError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a timestamp from the record.
    pub fn get_datetime(&self, k: &str) -> Result<DateTime<Local>, DqnError> {
        match self.0.get(k) {
            Some(RecordValue::DateTime(v)) => Ok(*v),
            Some(_) => Err(DqnError::RecordValueTypeError("DateTime".to_string())),
            None => Err(DqnError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, DqnError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(DqnError::RecordValueTypeError("String".to_string())),
            None => Err(DqnError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Record {
    /// Writes `key = value` pairs sorted by key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.0.keys().collect::<Vec<_>>();
        keys.sort();
        for (i, k) in keys.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", k, self.0[k])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_with_second() {
        let r1 = Record::from_slice(&[
            ("loss", RecordValue::Scalar(1.0)),
            ("epsilon", RecordValue::Scalar(0.5)),
        ]);
        let r2 = Record::from_scalar("loss", 2.0);
        let mut r = r1;
        r.merge_inplace(r2);
        assert_eq!(r.get_scalar("loss").unwrap(), 2.0);
        assert_eq!(r.get_scalar("epsilon").unwrap(), 0.5);
    }

    #[test]
    fn test_getter_errors() {
        let r = Record::from_scalar("loss", 1.0);
        assert_eq!(
            r.get_scalar("missing"),
            Err(DqnError::RecordKeyError("missing".to_string()))
        );
        assert!(matches!(
            r.get_string("loss"),
            Err(DqnError::RecordValueTypeError(_))
        ));
    }

    #[test]
    fn test_display_is_sorted() {
        let r = Record::from_slice(&[
            ("b", RecordValue::Scalar(2.0)),
            ("a", RecordValue::String("x".to_string())),
        ]);
        assert_eq!(format!("{}", r), "a = x, b = 2");
    }
}

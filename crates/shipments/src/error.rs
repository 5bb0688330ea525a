//! Error types produced by the shipments crate.
//!
//! Normalization itself never fails: a malformed payload degrades to fewer
//! records, and a malformed date degrades to the Unix epoch. The errors here
//! describe *why* a single entry was dropped or a value could not be parsed,
//! so callers decoding records by hand still get typed failures.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`RecordError`] | `ShipmentRecord::try_from` on one payload entry |
//! | [`ParseTabError`] | `Tab::from_str` |
//! | [`ConfigError`](crate::ConfigError) | `FilterConfig::validate` |
use thiserror::Error;

/// A payload entry that cannot become a [`ShipmentRecord`](crate::ShipmentRecord).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    /// The entry is a string, number, array... instead of an object.
    #[error("shipment entry is a {found}, expected an object")]
    NotAnObject { found: &'static str },

    /// The entry has no string or numeric `key`.
    #[error("shipment entry has no usable key")]
    MissingKey,
}

/// Unknown tab identifier.
///
/// ```rust
/// use shipments::Tab;
///
/// let err = "archive".parse::<Tab>().unwrap_err();
/// assert!(err.to_string().contains("archive"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tab `{0}`; expected in-transit, delivered or sent")]
pub struct ParseTabError(pub String);

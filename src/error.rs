//! Error type and `Result` alias shared by every module in this crate.
//!
//! Structured domain errors (insufficient specification, not-found,
//! version conflict, duplicate, illegal argument) are constructed
//! directly by the component that detects them so their payload stays
//! typed; everything else (io, parse, conversion failures from the
//! storage layer) goes through the `err_at!` macro below.

use std::{fmt, result};

use crate::model::StructureId;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Neither `package_id` nor `version_guid` was supplied.
    InsufficientSpecification(String),
    /// Course, block, or definition could not be found; `String` names the kind.
    ItemNotFound(String),
    /// Optimistic-concurrency loss: carries the observed head the caller should rebase onto.
    VersionConflict(String, StructureId),
    /// A caller-supplied block id already exists in the target structure.
    DuplicateItem(String),
    /// Caller asked for something the API forbids outright (e.g. deleting the root).
    IllegalArgument(String),
    /// Malformed caller input that isn't one of the above (bad query shape, bad locator).
    InvalidInput(String),
    /// A `TryFrom`/numeric conversion failed.
    FailConvert(String),
    /// Wraps a `std::io::Error`-shaped failure.
    IOError(String),
    /// Catch-all for unexpected storage-layer or internal invariant breakage.
    Fatal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InsufficientSpecification(msg) => {
                write!(f, "insufficient-specification: {}", msg)
            }
            Error::ItemNotFound(msg) => write!(f, "item-not-found: {}", msg),
            Error::VersionConflict(msg, head) => {
                write!(f, "version-conflict: {}, head:{}", msg, head)
            }
            Error::DuplicateItem(msg) => write!(f, "duplicate-item: {}", msg),
            Error::IllegalArgument(msg) => write!(f, "illegal-argument: {}", msg),
            Error::InvalidInput(msg) => write!(f, "invalid-input: {}", msg),
            Error::FailConvert(msg) => write!(f, "fail-convert: {}", msg),
            Error::IOError(msg) => write!(f, "io-error: {}", msg),
            Error::Fatal(msg) => write!(f, "fatal: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn version_conflict<S: Into<String>>(context: S, head: StructureId) -> Error {
        Error::VersionConflict(context.into(), head)
    }

    pub fn item_not_found<S: Into<String>>(context: S) -> Error {
        Error::ItemNotFound(context.into())
    }

    pub fn duplicate_item<S: Into<String>>(block_id: S) -> Error {
        Error::DuplicateItem(block_id.into())
    }

    pub fn illegal_argument<S: Into<String>>(context: S) -> Error {
        Error::IllegalArgument(context.into())
    }

    pub fn insufficient_specification<S: Into<String>>(context: S) -> Error {
        Error::InsufficientSpecification(context.into())
    }
}

/// Build an [Error] with file:line provenance, either from a `Result`'s `Err`
/// arm or from a `msg:`-style format string.
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err($crate::Error::$v(format!("{} {}", prefix, format!($($arg),+))))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err($crate::Error::$v(format!("{} err:{}", prefix, err)))
            }
        }
    }};
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Error {
        Error::FailConvert(format!("regex: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::FailConvert(format!("serde_json: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Error {
        Error::FailConvert(format!("toml: {}", err))
    }
}

//! Opaque identifiers for [Structure](super::Structure) and
//! [Definition](super::Definition) documents.
//!
//! `Structure._id` is an opaque id, in the style of a MongoDB ObjectId;
//! this crate realizes that opacity with a UUIDv4 rather than
//! reimplementing ObjectId's timestamp+machine+counter layout, since
//! nothing here depends on the id's internal shape — only on equality,
//! ordering for deterministic display, and round-trip through a string
//! form.

use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::{Error, Result};

macro_rules! opaque_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            pub fn new() -> $name {
                $name(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<$name> {
                Ok($name(err_at!(InvalidInput, uuid::Uuid::parse_str(s))?))
            }
        }
    };
}

opaque_id!(
    StructureId,
    "Identifies one immutable [Structure](super::Structure) snapshot."
);
opaque_id!(
    DefinitionId,
    "Identifies one revision of a [Definition](super::Definition)."
);

//! Strongly-typed identifiers.
//!
//! Ids are opaque strings: the built-in dataset uses small decimal numbers,
//! the UUID strategy produces v4 UUIDs. Each id type serializes as a bare
//! string.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Numeric value of the id, if it is a plain decimal number.
            pub fn as_number(&self) -> Option<u64> {
                self.0.parse().ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Strongly-typed user identifier.
    UserId
);
string_id!(
    /// Strongly-typed application identifier.
    ApplicationId
);
string_id!(
    /// Strongly-typed access level identifier.
    AccessLevelId
);
string_id!(
    /// Strongly-typed permission identifier.
    PermissionId
);
string_id!(
    /// Identifier of a single grant (`UserAccess` row).
    AccessId
);

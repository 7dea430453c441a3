//! Strongly-typed identifiers for metering entities
//!
//! Meter and site numbers are opaque codes issued by the water utility.
//! Newtype wrappers keep them from being mixed up with each other or with
//! free-form strings such as unit names.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_code {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a code, trimming surrounding whitespace
            pub fn new(code: impl Into<String>) -> Self {
                let code = code.into();
                Self(code.trim().to_string())
            }

            /// Returns the code as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if no code is assigned
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self::new(code)
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self::new(code)
            }
        }
    };
}

define_code!(MeterNumber);
define_code!(SiteNumber);

//! Domain identifier types with validation
//!
//! Newtype wrappers keep vendor, prescription, customer and order ids from
//! being mixed up. Each id must be non-empty after trimming.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new id, rejecting empty or whitespace-only values
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok(Self(id.trim().to_string()))
            }

            /// Returns the id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
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
    /// Pharmacy vendor identifier (e.g. `site-a`)
    ///
    /// ```
    /// use medcart::domain::ids::VendorId;
    ///
    /// let vendor = VendorId::new("site-b").unwrap();
    /// assert_eq!(vendor.as_str(), "site-b");
    /// ```
    VendorId,
    "Vendor ID"
);

string_id!(
    /// Prescription identifier; a cart is keyed 1:1 by this id
    PrescriptionId,
    "Prescription ID"
);

string_id!(
    /// Customer account identifier
    CustomerId,
    "Customer ID"
);

string_id!(
    /// Placed order identifier
    OrderId,
    "Order ID"
);

impl OrderId {
    /// Generates a fresh random order id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

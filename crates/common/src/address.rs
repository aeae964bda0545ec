//! Address value type.

use serde::{Deserialize, Serialize};

/// A postal address embedded in members and deliveries.
///
/// Immutable once built; changing an address means replacing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    city: String,
    street: String,
    zipcode: String,
}

impl Address {
    /// Creates a new address.
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            zipcode: zipcode.into(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }

    /// Returns true if city, street and zipcode are all non-blank.
    pub fn is_complete(&self) -> bool {
        [&self.city, &self.street, &self.zipcode]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

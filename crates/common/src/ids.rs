//! Typed identifiers for persisted entities.
//!
//! Ids are assigned by the store on insert. Each entity gets its own newtype
//! so a `MemberId` can never be passed where an `OrderId` is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw id value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw id value.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a member.
    MemberId
);
entity_id!(
    /// Identifier of a catalogue item (book).
    ItemId
);
entity_id!(
    /// Identifier of an order.
    OrderId
);
entity_id!(
    /// Identifier of a delivery.
    DeliveryId
);
entity_id!(
    /// Identifier of a single order line.
    OrderLineId
);

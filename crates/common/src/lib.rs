//! Shared identifiers and value types.
//!
//! Everything here is plain data that both the persistence layer and the
//! domain layer need to agree on.

pub mod address;
pub mod ids;
pub mod money;
pub mod status;

pub use address::Address;
pub use ids::{DeliveryId, ItemId, MemberId, OrderId, OrderLineId};
pub use money::Money;
pub use status::{DeliveryStatus, OrderStatus, ParseStatusError};

use common::{Address, DeliveryId, DeliveryStatus};
use serde::Serialize;
use store::{DeliveryRecord, NewDelivery};

/// Shipping details owned by exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    id: Option<DeliveryId>,
    address: Address,
    status: DeliveryStatus,
}

impl Delivery {
    /// Creates a delivery waiting to be shipped to `address`.
    pub fn ready(address: Address) -> Self {
        Self {
            id: None,
            address,
            status: DeliveryStatus::Ready,
        }
    }

    /// Store id; `None` until the owning order is persisted.
    pub fn id(&self) -> Option<DeliveryId> {
        self.id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == DeliveryStatus::Completed
    }

    pub(crate) fn to_new(&self) -> NewDelivery {
        NewDelivery {
            address: self.address.clone(),
            status: self.status,
        }
    }
}

impl From<DeliveryRecord> for Delivery {
    fn from(record: DeliveryRecord) -> Self {
        Self {
            id: Some(record.id),
            address: record.address,
            status: record.status,
        }
    }
}

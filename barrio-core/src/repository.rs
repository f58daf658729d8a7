use async_trait::async_trait;
use barrio_shared::models::records::{Notification, Order, Shipment, ShipmentStatus};
use uuid::Uuid;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for order records
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Most recent orders first
    async fn latest(&self, limit: usize) -> Result<Vec<Order>, StoreError>;
}

/// Repository trait for shipment records
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn insert(&self, shipment: &Shipment) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Shipment>, StoreError>;

    /// The most recent shipment for an order, if any
    async fn by_order(&self, order_id: Uuid) -> Result<Option<Shipment>, StoreError>;

    async fn update_status(&self, id: Uuid, status: ShipmentStatus) -> Result<(), StoreError>;
}

/// Append-only repository for notification records
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn append(&self, notification: &Notification) -> Result<(), StoreError>;

    async fn by_order(&self, order_id: Uuid) -> Result<Vec<Notification>, StoreError>;
}

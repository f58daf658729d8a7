use async_trait::async_trait;
use barrio_core::repository::{
    NotificationRepository, OrderRepository, ShipmentRepository, StoreError,
};
use barrio_shared::models::records::{Notification, Order, Shipment, ShipmentStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process order store; orders are write-once
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(format!("order already exists: {}", order.id).into());
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }
}

/// In-process shipment store; rows are never deleted
#[derive(Default)]
pub struct InMemoryShipmentRepository {
    shipments: RwLock<HashMap<Uuid, Shipment>>,
}

impl InMemoryShipmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepository {
    async fn insert(&self, shipment: &Shipment) -> Result<(), StoreError> {
        let mut shipments = self.shipments.write().await;
        if shipments
            .values()
            .any(|existing| existing.order_id == shipment.order_id)
        {
            return Err(format!("order already has a shipment: {}", shipment.order_id).into());
        }
        shipments.insert(shipment.id, shipment.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Shipment>, StoreError> {
        Ok(self.shipments.read().await.get(&id).cloned())
    }

    async fn by_order(&self, order_id: Uuid) -> Result<Option<Shipment>, StoreError> {
        let shipments = self.shipments.read().await;
        Ok(shipments
            .values()
            .filter(|s| s.order_id == order_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn update_status(&self, id: Uuid, status: ShipmentStatus) -> Result<(), StoreError> {
        let mut shipments = self.shipments.write().await;
        let shipment = shipments
            .get_mut(&id)
            .ok_or_else(|| format!("shipment not found: {id}"))?;
        shipment.status = status;
        Ok(())
    }
}

/// Append-only notification log
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    rows: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn append(&self, notification: &Notification) -> Result<(), StoreError> {
        self.rows.write().await.push(notification.clone());
        Ok(())
    }

    async fn by_order(&self, order_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|n| n.order_id == order_id)
            .cloned()
            .collect())
    }
}

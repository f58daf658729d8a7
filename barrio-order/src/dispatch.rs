use crate::notify::ChannelRegistry;
use barrio_core::repository::{OrderRepository, ShipmentRepository};
use barrio_shared::models::records::{Order, Shipment, ShipmentStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },

    #[error("shipment {0} already delivered")]
    Terminal(Uuid),

    #[error("shipment not found: {0}")]
    ShipmentNotFound(Uuid),

    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("record store failure: {0}")]
    Store(String),
}

/// Drives the shipment state machine and fans each transition out to the
/// registered notification channels.
///
/// Transitions on one shipment are serialized through a per-shipment lock;
/// different shipments proceed independently.
pub struct DispatchService {
    orders: Arc<dyn OrderRepository>,
    shipments: Arc<dyn ShipmentRepository>,
    registry: Arc<ChannelRegistry>,
    channel_timeout: Duration,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl DispatchService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        shipments: Arc<dyn ShipmentRepository>,
        registry: Arc<ChannelRegistry>,
    ) -> Self {
        Self {
            orders,
            shipments,
            registry,
            channel_timeout: Duration::from_millis(1_000),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_channel_timeout(mut self, timeout: Duration) -> Self {
        self.channel_timeout = timeout;
        self
    }

    async fn lock_for(&self, shipment_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(shipment_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Advance a shipment to the named target status.
    ///
    /// Only the immediate successor is accepted; ENTREGADO is terminal.
    /// On success every currently registered channel is notified before the
    /// call returns; channel failures never roll the transition back.
    pub async fn advance(
        &self,
        shipment_id: Uuid,
        target: ShipmentStatus,
    ) -> Result<Shipment, LifecycleError> {
        let lock = self.lock_for(shipment_id).await;
        let _guard = lock.lock().await;

        let mut shipment = self
            .shipments
            .get(shipment_id)
            .await
            .map_err(|e| LifecycleError::Store(e.to_string()))?
            .ok_or(LifecycleError::ShipmentNotFound(shipment_id))?;

        if shipment.status.is_terminal() {
            return Err(LifecycleError::Terminal(shipment_id));
        }
        match shipment.status.next() {
            Some(next) if next == target => {}
            _ => {
                return Err(LifecycleError::InvalidTransition {
                    from: shipment.status,
                    to: target,
                })
            }
        }

        self.shipments
            .update_status(shipment_id, target)
            .await
            .map_err(|e| LifecycleError::Store(e.to_string()))?;
        shipment.status = target;
        tracing::info!(
            shipment_id = %shipment_id,
            order_id = %shipment.order_id,
            status = target.as_str(),
            "shipment advanced"
        );

        let order = self
            .orders
            .get(shipment.order_id)
            .await
            .map_err(|e| LifecycleError::Store(e.to_string()))?
            .ok_or(LifecycleError::OrderNotFound(shipment.order_id))?;

        self.fan_out(&order, target, status_message(target)).await;
        Ok(shipment)
    }

    /// Notify every channel in the current registry snapshot, in
    /// registration order. Best effort: a failing or slow channel is logged
    /// and skipped, never propagated.
    pub async fn fan_out(&self, order: &Order, event: ShipmentStatus, message: &str) {
        let channels = self.registry.snapshot();
        for channel in channels {
            let send = channel.notify(order, event, message);
            match tokio::time::timeout(self.channel_timeout, send).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::warn!(
                    channel = channel.channel_id(),
                    order_id = %order.id,
                    error = %err,
                    "notification channel failed"
                ),
                Err(_) => tracing::warn!(
                    channel = channel.channel_id(),
                    order_id = %order.id,
                    "notification channel timed out"
                ),
            }
        }
    }
}

fn status_message(status: ShipmentStatus) -> &'static str {
    match status {
        ShipmentStatus::Confirmado => "Pedido confirmado",
        ShipmentStatus::Despachado => "Pedido empacado y listo para recogida",
        ShipmentStatus::EnRuta => "Pedido en camino al destino",
        ShipmentStatus::Entregado => "Pedido entregado exitosamente",
    }
}

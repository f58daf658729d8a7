use async_trait::async_trait;
use barrio_core::repository::NotificationRepository;
use barrio_shared::models::events::ShipmentStatusChangedEvent;
use barrio_shared::models::records::{Notification, Order, ShipmentStatus};
use chrono::Utc;
use std::sync::{Arc, RwLock};

/// Column width of the notifications message field in the record store
pub const MAX_STORED_MESSAGE: usize = 255;

/// Truncate with a trailing ellipsis so the row always fits the store.
pub fn truncate_for_storage(message: &str) -> String {
    if message.chars().count() <= MAX_STORED_MESSAGE {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(MAX_STORED_MESSAGE - 3).collect();
    truncated.push_str("...");
    truncated
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("delivery failed on {channel}: {reason}")]
    Delivery {
        channel: &'static str,
        reason: String,
    },

    #[error("recording notification failed: {0}")]
    Store(String),
}

/// One notification delivery mechanism. Implementations render the logical
/// event into their own message format and record a Notification; transport
/// mechanics beyond that are out of scope and simulated.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn channel_id(&self) -> &'static str;

    async fn notify(
        &self,
        order: &Order,
        event: ShipmentStatus,
        message: &str,
    ) -> Result<(), ChannelError>;
}

pub struct EmailChannel {
    notifications: Arc<dyn NotificationRepository>,
}

impl EmailChannel {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    fn render(order: &Order, event: ShipmentStatus, message: &str) -> String {
        match event {
            ShipmentStatus::Confirmado => {
                format!("¡Pedido {} confirmado! {}", order.id, message)
            }
            ShipmentStatus::Despachado => {
                format!("Pedido {} despachado. {}", order.id, message)
            }
            ShipmentStatus::EnRuta => format!("Pedido {} en camino. {}", order.id, message),
            ShipmentStatus::Entregado => format!("Pedido {} entregado. {}", order.id, message),
        }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn channel_id(&self) -> &'static str {
        "email"
    }

    async fn notify(
        &self,
        order: &Order,
        event: ShipmentStatus,
        message: &str,
    ) -> Result<(), ChannelError> {
        let body = Self::render(order, event, message);
        let stored = truncate_for_storage(&body);
        self.notifications
            .append(&Notification::new(order.id, self.channel_id(), stored))
            .await
            .map_err(|e| ChannelError::Store(e.to_string()))?;

        // Transport is external; the simulated send is just a trace
        tracing::info!(
            channel = "email",
            order_id = %order.id,
            to = %order.customer_email,
            "notification sent"
        );
        Ok(())
    }
}

pub struct WebhookChannel {
    url: String,
    notifications: Arc<dyn NotificationRepository>,
}

impl WebhookChannel {
    pub fn new(url: &str, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self {
            url: url.to_string(),
            notifications,
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn channel_id(&self) -> &'static str {
        "webhook"
    }

    async fn notify(
        &self,
        order: &Order,
        event: ShipmentStatus,
        message: &str,
    ) -> Result<(), ChannelError> {
        let payload = ShipmentStatusChangedEvent {
            order_id: order.id,
            customer_email: order.customer_email.clone(),
            event_type: event,
            message: message.to_string(),
            timestamp: Utc::now().timestamp(),
        };
        let body = serde_json::to_string(&payload).map_err(|e| ChannelError::Delivery {
            channel: "webhook",
            reason: e.to_string(),
        })?;

        let stored = truncate_for_storage(&format!(
            "Webhook a {}: {} para pedido {}",
            self.url, event, order.id
        ));
        self.notifications
            .append(&Notification::new(order.id, self.channel_id(), stored))
            .await
            .map_err(|e| ChannelError::Store(e.to_string()))?;

        tracing::info!(
            channel = "webhook",
            order_id = %order.id,
            url = %self.url,
            payload = %body,
            "notification sent"
        );
        Ok(())
    }
}

pub struct SmsChannel {
    phone_number: String,
    notifications: Arc<dyn NotificationRepository>,
}

impl SmsChannel {
    pub fn new(phone_number: &str, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            notifications,
        }
    }

    fn render(order: &Order, event: ShipmentStatus) -> String {
        match event {
            ShipmentStatus::Confirmado => format!("Pedido {} confirmado", order.id),
            ShipmentStatus::Despachado => format!("Pedido {} despachado", order.id),
            ShipmentStatus::EnRuta => format!("Pedido {} en camino", order.id),
            ShipmentStatus::Entregado => format!("Pedido {} entregado", order.id),
        }
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn channel_id(&self) -> &'static str {
        "sms"
    }

    async fn notify(
        &self,
        order: &Order,
        event: ShipmentStatus,
        _message: &str,
    ) -> Result<(), ChannelError> {
        // SMS keeps only the short form
        let body = Self::render(order, event);
        let stored = truncate_for_storage(&body);
        self.notifications
            .append(&Notification::new(order.id, self.channel_id(), stored))
            .await
            .map_err(|e| ChannelError::Store(e.to_string()))?;

        tracing::info!(
            channel = "sms",
            order_id = %order.id,
            to = %self.phone_number,
            "notification sent"
        );
        Ok(())
    }
}

/// Ordered channel registry. Membership can change at any time; fan-outs
/// work on a snapshot, so an in-flight dispatch is unaffected.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: RwLock<Vec<Arc<dyn NotificationChannel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, channel: Arc<dyn NotificationChannel>) {
        let mut channels = self.channels.write().expect("channel registry poisoned");
        channels.push(channel);
    }

    /// Remove every channel with the given id
    pub fn remove(&self, channel_id: &str) {
        let mut channels = self.channels.write().expect("channel registry poisoned");
        channels.retain(|c| c.channel_id() != channel_id);
    }

    /// The membership in effect right now, in registration order
    pub fn snapshot(&self) -> Vec<Arc<dyn NotificationChannel>> {
        self.channels
            .read()
            .expect("channel registry poisoned")
            .clone()
    }

    pub fn channel_ids(&self) -> Vec<&'static str> {
        self.snapshot().iter().map(|c| c.channel_id()).collect()
    }
}

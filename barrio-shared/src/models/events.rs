use crate::models::records::ShipmentStatus;
use uuid::Uuid;

/// Payload pushed to webhook subscribers on every lifecycle event
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ShipmentStatusChangedEvent {
    pub order_id: Uuid,
    pub customer_email: String,
    pub event_type: ShipmentStatus,
    pub message: String,
    pub timestamp: i64,
}

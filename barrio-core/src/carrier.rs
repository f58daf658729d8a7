use async_trait::async_trait;
use barrio_shared::models::records::{Priority, Provider};
use serde::{Deserialize, Serialize};

/// Normalized pickup request handed to every carrier adapter.
///
/// Adapters translate this into whatever argument shape their native API
/// expects; the native field names never reach callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupRequest {
    pub sender: String,
    pub recipient_address: String,
    pub weight_grams: u32,
    pub handling_label: String,
    pub priority: Priority,
}

#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    #[error("carrier temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("carrier rejected the pickup request: {0}")]
    Rejected(String),

    #[error("no adapter registered for provider: {0}")]
    UnknownProvider(String),
}

#[async_trait]
pub trait CarrierAdapter: Send + Sync + std::fmt::Debug {
    /// Request a pickup, returning the provider-issued tracking id
    async fn request_pickup(&self, request: &PickupRequest) -> Result<String, CarrierError>;

    /// Which carrier this adapter fronts
    fn provider(&self) -> Provider;
}

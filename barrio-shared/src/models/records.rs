use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Delivery priority chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    Express,
}

/// How delicate the package contents are
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Fragility {
    None,
    Weak,
    High,
}

impl Fragility {
    pub fn is_fragile(&self) -> bool {
        !matches!(self, Fragility::None)
    }
}

/// Closed set of delivery carriers the engine can dispatch to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Provider {
    #[serde(rename = "motoya")]
    MotoYa,
    #[serde(rename = "ecobike")]
    EcoBike,
    #[serde(rename = "paqz")]
    PaqueteriaZ,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::MotoYa, Provider::EcoBike, Provider::PaqueteriaZ];

    /// Stable wire id used in records and config
    pub fn id(&self) -> &'static str {
        match self {
            Provider::MotoYa => "motoya",
            Provider::EcoBike => "ecobike",
            Provider::PaqueteriaZ => "paqz",
        }
    }

    /// Customer-facing carrier name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::MotoYa => "MotoYA",
            Provider::EcoBike => "EcoBike",
            Provider::PaqueteriaZ => "PaqueteríaZ",
        }
    }

    pub fn from_id(id: &str) -> Option<Provider> {
        match id.trim().to_ascii_lowercase().as_str() {
            "motoya" => Some(Provider::MotoYa),
            "ecobike" => Some(Provider::EcoBike),
            "paqz" => Some(Provider::PaqueteriaZ),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Shipment lifecycle status, strictly ordered with no skipping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Confirmado,
    Despachado,
    EnRuta,
    Entregado,
}

impl ShipmentStatus {
    /// The only status a shipment may transition into from here
    pub fn next(&self) -> Option<ShipmentStatus> {
        match self {
            ShipmentStatus::Confirmado => Some(ShipmentStatus::Despachado),
            ShipmentStatus::Despachado => Some(ShipmentStatus::EnRuta),
            ShipmentStatus::EnRuta => Some(ShipmentStatus::Entregado),
            ShipmentStatus::Entregado => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Entregado)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Confirmado => "CONFIRMADO",
            ShipmentStatus::Despachado => "DESPACHADO",
            ShipmentStatus::EnRuta => "EN_RUTA",
            ShipmentStatus::Entregado => "ENTREGADO",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// A confirmed checkout ready for dispatch.
///
/// Derived shipping attributes are fixed at construction; lifecycle state
/// is tracked on the associated [`Shipment`], never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_email: String,
    pub address: String,
    pub priority: Priority,
    pub fragility: Fragility,
    pub items: Vec<OrderItem>,
    pub total_weight_grams: u32,
    pub package_code: String,
    pub handling_label: String,
    pub estimated_pickup_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// The delivery process for exactly one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub provider: Provider,
    pub tracking_id: String,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    /// A new shipment always starts in CONFIRMADO with its tracking id set once.
    pub fn new(order_id: Uuid, provider: Provider, tracking_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            provider,
            tracking_id,
            status: ShipmentStatus::Confirmado,
            created_at: Utc::now(),
        }
    }
}

/// Immutable record of one message sent on one channel for one order event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub order_id: Uuid,
    pub channel: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(order_id: Uuid, channel: &str, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            channel: channel.to_string(),
            message,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_chain_is_linear_and_terminal() {
        assert_eq!(
            ShipmentStatus::Confirmado.next(),
            Some(ShipmentStatus::Despachado)
        );
        assert_eq!(
            ShipmentStatus::Despachado.next(),
            Some(ShipmentStatus::EnRuta)
        );
        assert_eq!(ShipmentStatus::EnRuta.next(), Some(ShipmentStatus::Entregado));
        assert_eq!(ShipmentStatus::Entregado.next(), None);
        assert!(ShipmentStatus::Entregado.is_terminal());
    }

    #[test]
    fn provider_ids_round_trip() {
        for provider in Provider::ALL {
            assert_eq!(Provider::from_id(provider.id()), Some(provider));
        }
        assert_eq!(Provider::from_id("MOTOYA"), Some(Provider::MotoYa));
        assert_eq!(Provider::from_id("dronex"), None);
    }

    #[test]
    fn new_shipment_starts_confirmed() {
        let shipment = Shipment::new(Uuid::new_v4(), Provider::MotoYa, "MYA-AB12CD".into());
        assert_eq!(shipment.status, ShipmentStatus::Confirmado);
    }
}

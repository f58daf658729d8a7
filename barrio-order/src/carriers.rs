use async_trait::async_trait;
use barrio_core::carrier::{CarrierAdapter, CarrierError, PickupRequest};
use barrio_shared::models::records::{Priority, Provider};
use std::sync::Arc;
use uuid::Uuid;

/// Addresses carrying this marker make every simulated carrier report an
/// outage. Trigger for exercising the unavailable path in tests and demos.
pub const UNREACHABLE_ADDRESS_MARKER: &str = "sin cobertura";

/// Short opaque token, e.g. `A1B2C3`
fn tracking_token() -> String {
    let token = Uuid::new_v4().simple().to_string().to_uppercase();
    token[..6].to_string()
}

// ---------------------------------------------------------------------------
// Simulated native carrier APIs. Each has its own call shape and response
// vocabulary; nothing below this line leaks past the adapters.
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MotoYaApi;

struct MotoYaDelivery {
    delivery_id: String,
    #[allow(dead_code)]
    status: &'static str,
    #[allow(dead_code)]
    estimated_time: &'static str,
}

impl MotoYaApi {
    fn create_delivery_request(
        &self,
        weight_kg: f64,
        destination: &str,
    ) -> Result<MotoYaDelivery, CarrierError> {
        if destination.contains(UNREACHABLE_ADDRESS_MARKER) {
            return Err(CarrierError::Unavailable(
                "MotoYA: no riders in the destination zone".to_string(),
            ));
        }
        if destination.is_empty() || weight_kg <= 0.0 {
            return Err(CarrierError::Rejected(
                "MotoYA: destination and weight are required".to_string(),
            ));
        }
        Ok(MotoYaDelivery {
            delivery_id: format!("MYA-{}", tracking_token()),
            status: "ACCEPTED",
            estimated_time: "2-4 hours",
        })
    }
}

#[derive(Debug)]
struct EcoBikeApi;

struct EcoBikePackageInfo {
    weight_grams: u32,
    #[allow(dead_code)]
    fragile: bool,
    #[allow(dead_code)]
    express: bool,
    destination: String,
}

impl EcoBikeApi {
    fn schedule_pickup(&self, package_info: &EcoBikePackageInfo) -> Result<String, CarrierError> {
        if package_info.destination.contains(UNREACHABLE_ADDRESS_MARKER) {
            return Err(CarrierError::Unavailable(
                "EcoBike: route outside the cycling radius".to_string(),
            ));
        }
        if package_info.destination.is_empty() || package_info.weight_grams == 0 {
            return Err(CarrierError::Rejected(
                "EcoBike: incomplete package info".to_string(),
            ));
        }
        Ok(format!("EBK-{}", tracking_token()))
    }
}

#[derive(Debug)]
struct PaqueteriaZApi;

struct PaqueteriaZReceipt {
    tracking_number: String,
    #[allow(dead_code)]
    service_type: &'static str,
    #[allow(dead_code)]
    delivery_days: &'static str,
}

impl PaqueteriaZApi {
    fn submit_shipment(
        &self,
        sender: &str,
        recipient: &str,
        weight: u32,
    ) -> Result<PaqueteriaZReceipt, CarrierError> {
        if recipient.contains(UNREACHABLE_ADDRESS_MARKER) {
            return Err(CarrierError::Unavailable(
                "PaqueteríaZ: depot not reachable".to_string(),
            ));
        }
        if sender.is_empty() || recipient.is_empty() || weight == 0 {
            return Err(CarrierError::Rejected(
                "PaqueteríaZ: sender, recipient and weight are required".to_string(),
            ));
        }
        Ok(PaqueteriaZReceipt {
            tracking_number: format!("PAQ-{}", tracking_token()),
            service_type: "STANDARD",
            delivery_days: "3-5",
        })
    }
}

// ---------------------------------------------------------------------------
// Adapters: one per carrier, all speaking PickupRequest -> tracking id
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MotoYaAdapter {
    api: MotoYaApi,
}

impl MotoYaAdapter {
    pub fn new() -> Self {
        Self { api: MotoYaApi }
    }
}

impl Default for MotoYaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarrierAdapter for MotoYaAdapter {
    async fn request_pickup(&self, request: &PickupRequest) -> Result<String, CarrierError> {
        // MotoYA's API wants kilograms
        let weight_kg = request.weight_grams as f64 / 1000.0;
        let delivery = self
            .api
            .create_delivery_request(weight_kg, &request.recipient_address)?;
        Ok(delivery.delivery_id)
    }

    fn provider(&self) -> Provider {
        Provider::MotoYa
    }
}

#[derive(Debug)]
pub struct EcoBikeAdapter {
    api: EcoBikeApi,
}

impl EcoBikeAdapter {
    pub fn new() -> Self {
        Self { api: EcoBikeApi }
    }
}

impl Default for EcoBikeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarrierAdapter for EcoBikeAdapter {
    async fn request_pickup(&self, request: &PickupRequest) -> Result<String, CarrierError> {
        let package_info = EcoBikePackageInfo {
            weight_grams: request.weight_grams,
            fragile: !request.handling_label.is_empty(),
            express: request.priority == Priority::Express,
            destination: request.recipient_address.clone(),
        };
        self.api.schedule_pickup(&package_info)
    }

    fn provider(&self) -> Provider {
        Provider::EcoBike
    }
}

#[derive(Debug)]
pub struct PaqueteriaZAdapter {
    api: PaqueteriaZApi,
}

impl PaqueteriaZAdapter {
    pub fn new() -> Self {
        Self { api: PaqueteriaZApi }
    }
}

impl Default for PaqueteriaZAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarrierAdapter for PaqueteriaZAdapter {
    async fn request_pickup(&self, request: &PickupRequest) -> Result<String, CarrierError> {
        let receipt = self.api.submit_shipment(
            &request.sender,
            &request.recipient_address,
            request.weight_grams,
        )?;
        Ok(receipt.tracking_number)
    }

    fn provider(&self) -> Provider {
        Provider::PaqueteriaZ
    }
}

/// Resolve a provider to its adapter. The set is closed; adding a carrier
/// means adding a variant here without touching the orchestrator.
pub fn adapter_for(provider: Provider) -> Arc<dyn CarrierAdapter> {
    match provider {
        Provider::MotoYa => Arc::new(MotoYaAdapter::new()),
        Provider::EcoBike => Arc::new(EcoBikeAdapter::new()),
        Provider::PaqueteriaZ => Arc::new(PaqueteriaZAdapter::new()),
    }
}

/// Same resolution from a raw wire id, for config/admin input
pub fn adapter_for_id(id: &str) -> Result<Arc<dyn CarrierAdapter>, CarrierError> {
    Provider::from_id(id)
        .map(adapter_for)
        .ok_or_else(|| CarrierError::UnknownProvider(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(address: &str, weight_grams: u32) -> PickupRequest {
        PickupRequest {
            sender: "MercadoBarrio Warehouse".to_string(),
            recipient_address: address.to_string(),
            weight_grams,
            handling_label: "FRÁGIL".to_string(),
            priority: Priority::Express,
        }
    }

    #[tokio::test]
    async fn tracking_ids_carry_provider_prefixes() {
        let cases: [(Provider, &str); 3] = [
            (Provider::MotoYa, "MYA-"),
            (Provider::EcoBike, "EBK-"),
            (Provider::PaqueteriaZ, "PAQ-"),
        ];
        for (provider, prefix) in cases {
            let adapter = adapter_for(provider);
            assert_eq!(adapter.provider(), provider);
            let tracking_id = adapter
                .request_pickup(&request("Calle 123", 900))
                .await
                .unwrap();
            assert!(tracking_id.starts_with(prefix), "{tracking_id}");
        }
    }

    #[tokio::test]
    async fn zero_weight_is_rejected() {
        for provider in Provider::ALL {
            let adapter = adapter_for(provider);
            let err = adapter
                .request_pickup(&request("Calle 123", 0))
                .await
                .unwrap_err();
            assert!(matches!(err, CarrierError::Rejected(_)), "{provider}");
        }
    }

    #[tokio::test]
    async fn unreachable_zone_reports_unavailable() {
        for provider in Provider::ALL {
            let adapter = adapter_for(provider);
            let address = format!("Vereda {UNREACHABLE_ADDRESS_MARKER}");
            let err = adapter
                .request_pickup(&request(&address, 900))
                .await
                .unwrap_err();
            assert!(matches!(err, CarrierError::Unavailable(_)), "{provider}");
        }
    }

    #[test]
    fn unknown_provider_id_fails() {
        let err = adapter_for_id("dronex").unwrap_err();
        assert!(matches!(err, CarrierError::UnknownProvider(id) if id == "dronex"));
    }
}

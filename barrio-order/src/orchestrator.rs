use crate::assembler::{AssemblyError, OrderAssembler, OrderDraft};
use crate::carriers::adapter_for;
use crate::dispatch::DispatchService;
use crate::selector::{ProviderSelector, SelectionError, SelectionInput};
use barrio_core::carrier::{CarrierError, PickupRequest};
use barrio_core::repository::{OrderRepository, ShipmentRepository};
use barrio_shared::models::records::{Provider, Shipment, ShipmentStatus};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// What the caller gets back from a successful confirmation
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReceipt {
    pub order_id: Uuid,
    pub package_code: String,
    pub provider: Provider,
    pub tracking_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Carrier(#[from] CarrierError),

    #[error("record store failure: {0}")]
    Store(String),
}

/// Sequences one checkout: assemble the order, pick a carrier under the
/// requested policy, request the pickup through that carrier's adapter,
/// open the shipment in CONFIRMADO and announce it on every channel.
pub struct CheckoutOrchestrator {
    assembler: OrderAssembler,
    selector: ProviderSelector,
    orders: Arc<dyn OrderRepository>,
    shipments: Arc<dyn ShipmentRepository>,
    dispatch: Arc<DispatchService>,
    sender: String,
    carrier_timeout: Duration,
}

impl CheckoutOrchestrator {
    pub fn new(
        assembler: OrderAssembler,
        selector: ProviderSelector,
        orders: Arc<dyn OrderRepository>,
        shipments: Arc<dyn ShipmentRepository>,
        dispatch: Arc<DispatchService>,
    ) -> Self {
        Self {
            assembler,
            selector,
            orders,
            shipments,
            dispatch,
            sender: "MercadoBarrio Warehouse".to_string(),
            carrier_timeout: Duration::from_millis(2_000),
        }
    }

    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = sender.to_string();
        self
    }

    pub fn with_carrier_timeout(mut self, timeout: Duration) -> Self {
        self.carrier_timeout = timeout;
        self
    }

    /// Turn a validated draft into a dispatched shipment.
    ///
    /// Validation and unknown-policy errors abort before anything is
    /// persisted. A carrier failure leaves the assembled order in the store
    /// but no shipment; the caller decides whether to retry or reselect.
    /// Notification failures never fail this call.
    pub async fn confirm_order(
        &self,
        draft: &OrderDraft,
        policy_name: &str,
    ) -> Result<DispatchReceipt, OrchestrationError> {
        let order = self.assembler.assemble(draft).await?;

        let provider = self.selector.select(
            policy_name,
            &SelectionInput {
                weight_grams: order.total_weight_grams,
                priority: order.priority,
                fragility: order.fragility,
            },
        )?;

        self.orders
            .insert(&order)
            .await
            .map_err(|e| OrchestrationError::Store(e.to_string()))?;

        let adapter = adapter_for(provider);
        let request = PickupRequest {
            sender: self.sender.clone(),
            recipient_address: order.address.clone(),
            weight_grams: order.total_weight_grams,
            handling_label: order.handling_label.clone(),
            priority: order.priority,
        };
        let tracking_id = match tokio::time::timeout(
            self.carrier_timeout,
            adapter.request_pickup(&request),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(CarrierError::Unavailable(format!(
                    "{} pickup request timed out",
                    provider.id()
                ))
                .into())
            }
        };

        let shipment = Shipment::new(order.id, provider, tracking_id.clone());
        self.shipments
            .insert(&shipment)
            .await
            .map_err(|e| OrchestrationError::Store(e.to_string()))?;
        tracing::info!(
            order_id = %order.id,
            package_code = %order.package_code,
            provider = provider.id(),
            tracking_id = %tracking_id,
            "shipment confirmed"
        );

        let message = format!(
            "Pedido confirmado y asignado a {} con tracking {}",
            provider.display_name(),
            tracking_id
        );
        self.dispatch
            .fan_out(&order, ShipmentStatus::Confirmado, &message)
            .await;

        Ok(DispatchReceipt {
            order_id: order.id,
            package_code: order.package_code,
            provider,
            tracking_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::DraftItem;
    use crate::carriers::UNREACHABLE_ADDRESS_MARKER;
    use crate::notify::{ChannelRegistry, EmailChannel, SmsChannel, WebhookChannel};
    use barrio_catalog::{InMemoryCatalog, Product};
    use barrio_core::repository::NotificationRepository;
    use barrio_shared::models::records::{Fragility, Priority};
    use barrio_store::{
        InMemoryNotificationRepository, InMemoryOrderRepository, InMemoryShipmentRepository,
    };

    struct World {
        orchestrator: CheckoutOrchestrator,
        dispatch: Arc<DispatchService>,
        orders: Arc<InMemoryOrderRepository>,
        shipments: Arc<InMemoryShipmentRepository>,
        notifications: Arc<InMemoryNotificationRepository>,
        products: Vec<Product>,
    }

    fn world() -> World {
        let products = vec![
            Product::new("VEL-AROMA", "Vela aromática", 300, true),
            Product::new("TE-VERDE", "Té verde 250g", 250, false),
            Product::new("TAZA-CE", "Taza cerámica", 400, true),
        ];
        let catalog = Arc::new(InMemoryCatalog::new(products.clone()));

        let orders = Arc::new(InMemoryOrderRepository::new());
        let shipments = Arc::new(InMemoryShipmentRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());

        let registry = Arc::new(ChannelRegistry::new());
        registry.register(Arc::new(EmailChannel::new(notifications.clone())));
        registry.register(Arc::new(WebhookChannel::new(
            "https://example.com/hook",
            notifications.clone(),
        )));
        registry.register(Arc::new(SmsChannel::new(
            "+1234567890",
            notifications.clone(),
        )));

        let dispatch = Arc::new(DispatchService::new(
            orders.clone(),
            shipments.clone(),
            registry,
        ));

        let orchestrator = CheckoutOrchestrator::new(
            OrderAssembler::new(catalog),
            ProviderSelector::with_builtin(),
            orders.clone(),
            shipments.clone(),
            dispatch.clone(),
        );

        World {
            orchestrator,
            dispatch,
            orders,
            shipments,
            notifications,
            products,
        }
    }

    fn draft(world: &World) -> OrderDraft {
        OrderDraft {
            customer_email: "cliente@example.com".to_string(),
            address: "Calle 123".to_string(),
            priority: Priority::Normal,
            fragility: Fragility::None,
            items: vec![
                DraftItem {
                    product_id: world.products[0].id,
                    quantity: 2,
                },
                DraftItem {
                    product_id: world.products[1].id,
                    quantity: 1,
                },
            ],
        }
    }

    #[tokio::test]
    async fn confirmation_produces_order_shipment_and_notifications() {
        let w = world();
        let receipt = w.orchestrator.confirm_order(&draft(&w), "standard").await.unwrap();

        // 850 g, normal, not fragile -> MotoYA under the standard policy
        assert_eq!(receipt.provider, Provider::MotoYa);
        assert!(receipt.tracking_id.starts_with("MYA-"));
        assert!(receipt.package_code.starts_with("PKG-"));

        let order = w.orders.get(receipt.order_id).await.unwrap().unwrap();
        assert_eq!(order.total_weight_grams, 850);

        let shipment = w.shipments.by_order(receipt.order_id).await.unwrap().unwrap();
        assert_eq!(shipment.status, ShipmentStatus::Confirmado);
        assert_eq!(shipment.tracking_id, receipt.tracking_id);

        let rows = w.notifications.by_order(receipt.order_id).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn full_lifecycle_accumulates_notifications() {
        let w = world();
        let receipt = w.orchestrator.confirm_order(&draft(&w), "standard").await.unwrap();
        let shipment = w.shipments.by_order(receipt.order_id).await.unwrap().unwrap();

        for target in [
            ShipmentStatus::Despachado,
            ShipmentStatus::EnRuta,
            ShipmentStatus::Entregado,
        ] {
            w.dispatch.advance(shipment.id, target).await.unwrap();
        }

        // Confirmation + three transitions, three channels each
        let rows = w.notifications.by_order(receipt.order_id).await.unwrap();
        assert_eq!(rows.len(), 12);
    }

    #[tokio::test]
    async fn unknown_policy_aborts_before_anything_is_persisted() {
        let w = world();
        let err = w
            .orchestrator
            .confirm_order(&draft(&w), "turbo")
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::Selection(_)));

        assert!(w.orders.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn validation_failure_persists_nothing() {
        let w = world();
        let mut bad = draft(&w);
        bad.customer_email = "no-es-un-email".to_string();

        let err = w.orchestrator.confirm_order(&bad, "standard").await.unwrap_err();
        assert!(matches!(err, OrchestrationError::Assembly(_)));
        assert!(w.orders.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn carrier_outage_keeps_the_order_but_no_shipment() {
        let w = world();
        let mut unreachable = draft(&w);
        unreachable.address = format!("Vereda {UNREACHABLE_ADDRESS_MARKER}");

        let err = w
            .orchestrator
            .confirm_order(&unreachable, "standard")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestrationError::Carrier(CarrierError::Unavailable(_))
        ));

        let orders = w.orders.latest(10).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(w
            .shipments
            .by_order(orders[0].id)
            .await
            .unwrap()
            .is_none());
        assert!(w.notifications.by_order(orders[0].id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn eco_policy_changes_the_outcome_for_the_same_draft() {
        let w = world();
        let receipt = w.orchestrator.confirm_order(&draft(&w), "eco").await.unwrap();

        // 850 g fits the cargo-bike limit under the eco policy
        assert_eq!(receipt.provider, Provider::EcoBike);
        assert!(receipt.tracking_id.starts_with("EBK-"));
    }
}

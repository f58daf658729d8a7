use anyhow::Context;
use barrio_catalog::{InMemoryCatalog, Product};
use barrio_core::repository::{NotificationRepository, ShipmentRepository};
use barrio_order::assembler::{DraftItem, OrderAssembler, OrderDraft};
use barrio_order::dispatch::DispatchService;
use barrio_order::notify::{ChannelRegistry, EmailChannel, SmsChannel, WebhookChannel};
use barrio_order::orchestrator::CheckoutOrchestrator;
use barrio_order::selector::ProviderSelector;
use barrio_shared::models::records::{Fragility, Priority, ShipmentStatus};
use barrio_store::app_config::Config;
use barrio_store::{
    InMemoryNotificationRepository, InMemoryOrderRepository, InMemoryShipmentRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barrio_engine=debug,barrio_order=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "config load failed, using defaults");
        Config::default()
    });
    tracing::info!(
        default_policy = %config.business_rules.default_policy,
        "starting barrio engine demo"
    );

    // Demo catalog; in production the product store is an external system
    let products = vec![
        Product::new("VEL-AROMA", "Vela aromática", 300, true),
        Product::new("TE-VERDE", "Té verde 250g", 250, false),
        Product::new("TAZA-CE", "Taza cerámica", 400, true),
    ];
    let catalog = Arc::new(InMemoryCatalog::new(products.clone()));

    let orders = Arc::new(InMemoryOrderRepository::new());
    let shipments = Arc::new(InMemoryShipmentRepository::new());
    let notifications: Arc<InMemoryNotificationRepository> =
        Arc::new(InMemoryNotificationRepository::new());

    let registry = Arc::new(ChannelRegistry::new());
    registry.register(Arc::new(EmailChannel::new(notifications.clone())));
    registry.register(Arc::new(WebhookChannel::new(
        &config.notifications.webhook_url,
        notifications.clone(),
    )));
    registry.register(Arc::new(SmsChannel::new(
        &config.notifications.sms_number,
        notifications.clone(),
    )));

    let dispatch = Arc::new(
        DispatchService::new(orders.clone(), shipments.clone(), registry.clone())
            .with_channel_timeout(Duration::from_millis(
                config.business_rules.channel_timeout_ms,
            )),
    );

    let assembler = OrderAssembler::new(catalog).with_pickup_hours(
        config.business_rules.pickup_hours_normal,
        config.business_rules.pickup_hours_express,
    );
    let orchestrator = CheckoutOrchestrator::new(
        assembler,
        ProviderSelector::with_builtin(),
        orders.clone(),
        shipments.clone(),
        dispatch.clone(),
    )
    .with_sender(&config.business_rules.warehouse_sender)
    .with_carrier_timeout(Duration::from_millis(
        config.business_rules.carrier_timeout_ms,
    ));

    // One demo checkout: a candle and a bag of tea to a neighborhood address
    let draft = OrderDraft {
        customer_email: "cliente@example.com".to_string(),
        address: "Calle 123 #45-67, Barrio Centro".to_string(),
        priority: Priority::Express,
        fragility: Fragility::Weak,
        items: vec![
            DraftItem {
                product_id: products[0].id,
                quantity: 2,
            },
            DraftItem {
                product_id: products[1].id,
                quantity: 1,
            },
        ],
    };

    let receipt = orchestrator
        .confirm_order(&draft, &config.business_rules.default_policy)
        .await
        .context("order confirmation failed")?;
    println!(
        "order confirmed: {}",
        serde_json::to_string_pretty(&receipt)?
    );

    // Simulated courier updates, each an independent call
    let shipment = shipments
        .by_order(receipt.order_id)
        .await
        .map_err(|e| anyhow::anyhow!(e))?
        .context("shipment missing after confirmation")?;
    for target in [
        ShipmentStatus::Despachado,
        ShipmentStatus::EnRuta,
        ShipmentStatus::Entregado,
    ] {
        let updated = dispatch.advance(shipment.id, target).await?;
        println!("shipment {} -> {}", updated.id, updated.status);
    }

    let sent = notifications
        .by_order(receipt.order_id)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("notifications recorded: {}", sent.len());

    Ok(())
}

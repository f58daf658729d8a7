pub mod models;

pub use models::records::{
    Fragility, Notification, Order, OrderItem, Priority, Provider, Shipment, ShipmentStatus,
};

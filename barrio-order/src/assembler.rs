use barrio_catalog::{CatalogError, ProductCatalog};
use barrio_shared::models::records::{Fragility, Order, OrderItem, Priority};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Validated checkout input, as handed over by the (external) request layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_email: String,
    pub address: String,
    pub priority: Priority,
    pub fragility: Fragility,
    pub items: Vec<DraftItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftItem {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Builds immutable orders from drafts: validation, weight roll-up,
/// package code, handling label and pickup estimate.
pub struct OrderAssembler {
    catalog: Arc<dyn ProductCatalog>,
    pickup_hours_normal: i64,
    pickup_hours_express: i64,
}

impl OrderAssembler {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            pickup_hours_normal: 48,
            pickup_hours_express: 24,
        }
    }

    pub fn with_pickup_hours(mut self, normal: i64, express: i64) -> Self {
        self.pickup_hours_normal = normal;
        self.pickup_hours_express = express;
        self
    }

    /// Produce an [`Order`] or fail without side effects.
    ///
    /// Derived attributes are fixed here and never recomputed: total weight,
    /// package code, handling label and the estimated pickup time.
    pub async fn assemble(&self, draft: &OrderDraft) -> Result<Order, AssemblyError> {
        let customer_email = validate_email(&draft.customer_email)?;
        let address = validate_address(&draft.address)?;

        if draft.items.is_empty() {
            return Err(AssemblyError::Validation {
                field: "items",
                reason: "el pedido no tiene items".to_string(),
            });
        }

        let mut items = Vec::with_capacity(draft.items.len());
        let mut total_weight: u64 = 0;
        for item in &draft.items {
            if item.quantity == 0 {
                return Err(AssemblyError::Validation {
                    field: "quantity",
                    reason: format!("cantidad inválida para producto {}", item.product_id),
                });
            }
            let product = self
                .catalog
                .get(item.product_id)
                .await?
                .ok_or(AssemblyError::ProductNotFound(item.product_id))?;

            total_weight += product.weight_grams as u64 * item.quantity as u64;
            items.push(OrderItem {
                product_id: product.id,
                quantity: item.quantity,
            });
        }

        let total_weight_grams =
            u32::try_from(total_weight).map_err(|_| AssemblyError::Validation {
                field: "items",
                reason: "peso total fuera de rango".to_string(),
            })?;

        let hours = match draft.priority {
            Priority::Express => self.pickup_hours_express,
            Priority::Normal => self.pickup_hours_normal,
        };
        let now = Utc::now();

        Ok(Order {
            id: Uuid::new_v4(),
            customer_email,
            address,
            priority: draft.priority,
            fragility: draft.fragility,
            items,
            total_weight_grams,
            package_code: generate_package_code(),
            handling_label: handling_label(draft.fragility).to_string(),
            estimated_pickup_at: now + Duration::hours(hours),
            created_at: now,
        })
    }
}

/// Basic `local@domain` shape with a dotted domain; no RFC parsing.
fn validate_email(raw: &str) -> Result<String, AssemblyError> {
    let email = raw.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AssemblyError::Validation {
            field: "customer_email",
            reason: "email inválido".to_string(),
        });
    }
    Ok(email.to_string())
}

fn validate_address(raw: &str) -> Result<String, AssemblyError> {
    let address = raw.trim();
    if address.is_empty() {
        return Err(AssemblyError::Validation {
            field: "address",
            reason: "dirección requerida".to_string(),
        });
    }
    Ok(address.to_string())
}

fn handling_label(fragility: Fragility) -> &'static str {
    match fragility {
        Fragility::High => "FRÁGIL - MANEJAR CON EXTREMO CUIDADO",
        Fragility::Weak => "FRÁGIL",
        Fragility::None => "",
    }
}

/// Format: PKG-{12 uppercase hex}. Fresh random material per order, so
/// collisions are negligible without checking prior codes.
fn generate_package_code() -> String {
    let token = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("PKG-{}", &token[..12])
}

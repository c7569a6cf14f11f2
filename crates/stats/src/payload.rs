//! Order-placement payload shape.
//!
//! The trail stores payloads as opaque strings; only order entries have a
//! shape the aggregator relies on: `{ "items": [{ "productId", "quantity" }] }`.
//! Logged events predate schema changes, so extraction is lenient — a
//! malformed payload or item yields nothing instead of an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use opsledger_audit::{AuditEvent, ResourceType};
use opsledger_core::{ActorEmail, DomainResult, ProductId, ResourceId};

/// One order line inside a payload's `items` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Extract the line items from a stored order payload.
///
/// Returns `None` when the payload is absent, is not valid JSON, or has no
/// `items` array. Individual items missing `productId` or an integral
/// `quantity` are dropped without failing the rest: a fractional quantity
/// (e.g. `2.5`) counts as a malformed item, not as a truncated sale.
pub fn order_items(payload: Option<&str>) -> Option<Vec<OrderItem>> {
    let value: Value = serde_json::from_str(payload?).ok()?;
    let items = value.get("items")?.as_array()?;

    Some(
        items
            .iter()
            .filter_map(|item| {
                let product_id = item.get("productId")?.as_str()?;
                let quantity = item.get("quantity")?.as_i64()?;
                Some(OrderItem::new(product_id, quantity))
            })
            .collect(),
    )
}

/// Build the audit event an order service records after placing an order.
///
/// Mirrors what the aggregator expects to read back: an `order`-typed
/// entry with no single resource id and the items snapshot as payload.
pub fn order_placed(
    actor: ActorEmail,
    items: &[OrderItem],
    placed_at: DateTime<Utc>,
) -> DomainResult<AuditEvent> {
    AuditEvent::new(
        actor,
        format!("Placed order with {} items", items.len()),
        ResourceType::Order,
        ResourceId::empty(),
    )
    .with_json_payload(&json!({
        "items": items,
        "timestamp": placed_at,
    }))
}

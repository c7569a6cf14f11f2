//! Per-(product, day) sales aggregation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opsledger_audit::ActivityLogEntry;
use opsledger_core::ProductId;

use crate::payload::order_items;

/// One row of the sales report.
///
/// `product_id` is `None` for the placeholder row of a date that has
/// orders but no attributable line items (e.g. every payload on that day
/// was unparseable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatsRow {
    pub product_id: Option<ProductId>,
    pub date: NaiveDate,
    pub total_sold: i64,
    pub order_count: u64,
}

/// Aggregate order-placement entries into a dense per-(product, date)
/// report plus daily order counts.
///
/// Pure function of its input: the same window always yields the same
/// rows. Rules:
///
/// - dates bucket on the UTC calendar day of the entry timestamp
/// - every entry increments its date's order count exactly once, whether
///   or not its payload parses (only item attribution needs the payload)
/// - quantities accumulate per (product, date) from parseable items
/// - only dates seen in at least one entry appear; the requested range is
///   never zero-filled
/// - rows sort by date ascending, then product id
pub fn aggregate(entries: &[ActivityLogEntry]) -> Vec<OrderStatsRow> {
    let mut orders_per_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut sold: BTreeMap<ProductId, BTreeMap<NaiveDate, i64>> = BTreeMap::new();

    for entry in entries {
        let date = entry.timestamp.date_naive();
        *orders_per_date.entry(date).or_insert(0) += 1;

        let Some(items) = order_items(entry.payload.as_deref()) else {
            // Unparseable payload: the order is counted, items are not.
            continue;
        };
        for item in items {
            *sold
                .entry(item.product_id)
                .or_default()
                .entry(date)
                .or_insert(0) += item.quantity;
        }
    }

    let mut dates: BTreeSet<NaiveDate> = orders_per_date.keys().copied().collect();
    for per_date in sold.values() {
        dates.extend(per_date.keys().copied());
    }

    let mut rows = Vec::new();
    for date in dates {
        let order_count = orders_per_date.get(&date).copied().unwrap_or(0);

        let mut has_product = false;
        for (product_id, per_date) in &sold {
            if let Some(&total_sold) = per_date.get(&date) {
                if total_sold != 0 {
                    rows.push(OrderStatsRow {
                        product_id: Some(product_id.clone()),
                        date,
                        total_sold,
                        order_count,
                    });
                    has_product = true;
                }
            }
        }

        if !has_product {
            rows.push(OrderStatsRow {
                product_id: None,
                date,
                total_sold: 0,
                order_count,
            });
        }
    }

    rows
}

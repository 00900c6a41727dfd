//! Collection result building — pure logic, no database access.
//!
//! A collection is an ordered list of manually pinned items plus an optional
//! dynamic query. The builder merges a page of query values with the pinned
//! items at their configured positions and produces the ordered result slots
//! the rendering layer iterates over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::items::CmsItem;

/// A manually pinned item, already resolved to its CMS value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualItem {
    /// Zero-based position within the collection.
    pub position: i32,
    /// Visibility flag from the stored item.
    pub visible: bool,
    /// The resolved content value.
    pub item: CmsItem,
}

/// How a result entry was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrigin {
    /// Pinned by an editor.
    Manual,
    /// Returned by the dynamic query.
    Dynamic,
    /// Placeholder substituted for an empty contextual query.
    Slot,
}

/// One slot in the built result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEntry {
    pub origin: ResultOrigin,
    pub item: CmsItem,
}

/// Merge a page of dynamic query values with manually pinned items.
///
/// `query_values` is the page already produced by the query runner for the
/// requested offset/limit — the builder does not re-page it. Invisible
/// manual items are skipped. When the query is contextual and returned no
/// values, exactly one [`ResultOrigin::Slot`] placeholder stands in for the
/// dynamic portion so downstream rendering has a stable shape. The result is
/// capped at `limit` entries when a limit is set.
pub fn build_results(
    manual: &[ManualItem],
    query_values: &[CmsItem],
    contextual: bool,
    limit: Option<i32>,
) -> Vec<ResultEntry> {
    let pinned: BTreeMap<i32, &ManualItem> = manual
        .iter()
        .filter(|m| m.visible)
        .map(|m| (m.position, m))
        .collect();

    let mut dynamic = query_values.iter();
    let mut slot_pending = contextual && query_values.is_empty();

    let mut entries = Vec::new();
    let last_pinned = pinned.keys().next_back().copied().unwrap_or(-1);

    let mut position = 0;
    loop {
        if let Some(limit) = limit {
            // A non-positive limit caps at zero rather than wrapping the cast.
            if entries.len() >= limit.max(0) as usize {
                break;
            }
        }

        if let Some(m) = pinned.get(&position) {
            entries.push(ResultEntry {
                origin: ResultOrigin::Manual,
                item: m.item.clone(),
            });
        } else if let Some(value) = dynamic.next() {
            entries.push(ResultEntry {
                origin: ResultOrigin::Dynamic,
                item: value.clone(),
            });
        } else if slot_pending {
            entries.push(ResultEntry {
                origin: ResultOrigin::Slot,
                item: CmsItem::slot(),
            });
            slot_pending = false;
        } else if position > last_pinned {
            // Nothing dynamic left and no pinned items ahead.
            break;
        }

        position += 1;
    }

    entries
}

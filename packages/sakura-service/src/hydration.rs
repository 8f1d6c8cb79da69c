use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The record returned for one search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedItem {
	pub question_id: i64,
	pub answer_id: i64,
	pub question_text: String,
	pub answer_text: String,
	pub star_count: u64,
	pub labels: Vec<String>,
}

/// Answer id to hydrated item. Filled during the snapshot load and read-only afterwards.
#[derive(Debug, Default)]
pub struct HydrationCache {
	items: HashMap<i64, HydratedItem>,
}
impl HydrationCache {
	/// Stores `item`, replacing an earlier item with the same answer id.
	pub fn insert(&mut self, item: HydratedItem) {
		self.items.insert(item.answer_id, item);
	}

	pub fn get(&self, answer_id: i64) -> Option<&HydratedItem> {
		self.items.get(&answer_id)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

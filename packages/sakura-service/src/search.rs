use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sakura_index::{PopularityCriteria, ScoringCriteria, SearchRequest};

use crate::{Error, Result, hydration::HydratedItem, snapshot::Catalog};

/// Raw query parameters. Paging values stay strings until validated so that a malformed value
/// is reported against its parameter name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
	#[serde(alias = "key")]
	pub text: Option<String>,
	pub offset: Option<String>,
	pub limit: Option<String>,
	pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub total: u64,
	/// `None` where an indexed answer has no cached record.
	pub results: Vec<Option<HydratedItem>>,
}

pub struct QueryService {
	cfg: sakura_config::Search,
	catalog: Catalog,
	criteria: Arc<dyn ScoringCriteria>,
}
impl QueryService {
	pub fn new(cfg: sakura_config::Search, catalog: Catalog) -> Self {
		Self::with_criteria(cfg, catalog, Arc::new(PopularityCriteria))
	}

	pub fn with_criteria(
		cfg: sakura_config::Search,
		catalog: Catalog,
		criteria: Arc<dyn ScoringCriteria>,
	) -> Self {
		Self { cfg, catalog, criteria }
	}

	pub fn search(&self, params: SearchParams) -> Result<SearchResponse> {
		let offset = parse_paging("offset", params.offset.as_deref(), 0)?;
		let limit = parse_paging("limit", params.limit.as_deref(), self.cfg.default_limit as usize)?;
		let request = SearchRequest {
			text: params.text.unwrap_or_else(|| self.cfg.default_text.clone()),
			label: params.label.filter(|label| !label.trim().is_empty()),
			offset,
			limit,
		};
		let output = self.catalog.index.search(&request, Arc::clone(&self.criteria))?;
		let results = output
			.answer_ids
			.into_iter()
			.map(|answer_id| {
				let item = self.catalog.cache.get(answer_id).cloned();

				if item.is_none() {
					tracing::warn!(answer_id, "Indexed answer has no cached record.");
				}

				item
			})
			.collect();

		Ok(SearchResponse { total: output.total as u64, results })
	}
}

fn parse_paging(name: &str, raw: Option<&str>, default: usize) -> Result<usize> {
	let Some(raw) = raw else {
		return Ok(default);
	};

	raw.trim().parse::<usize>().map_err(|_| Error::InvalidRequest {
		message: format!("{name} must be a non-negative integer, got {raw:?}."),
	})
}

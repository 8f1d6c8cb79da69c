pub mod hydration;
pub mod ingest;
pub mod labels;
pub mod search;
pub mod snapshot;

mod error;

pub use error::{Error, Result};
pub use hydration::{HydratedItem, HydrationCache};
pub use ingest::{IngestRequest, IngestResponse, IngestWriter};
pub use labels::{LabelsByQuestion, aggregate_labels};
pub use search::{QueryService, SearchParams, SearchResponse};
pub use snapshot::{Catalog, LoadReport, load_snapshot};

pub use sakura_config::DeliveryMode;

use std::{future::Future, pin::Pin};

use sakura_notify::AnswerMessage;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Delivers one answer record and waits for the endpoint's acknowledgement.
pub trait Notifier
where
	Self: Send + Sync,
{
	fn notify<'a>(
		&'a self,
		message: &'a AnswerMessage,
	) -> BoxFuture<'a, sakura_notify::Result<String>>;
}

impl Notifier for sakura_notify::Client {
	fn notify<'a>(
		&'a self,
		message: &'a AnswerMessage,
	) -> BoxFuture<'a, sakura_notify::Result<String>> {
		Box::pin(self.request(message))
	}
}

use std::sync::Arc;

use sakura_notify::Client;
use sakura_service::{IngestWriter, Notifier, QueryService};
use sakura_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub query: Arc<QueryService>,
	pub ingest: Arc<IngestWriter>,
}
impl AppState {
	/// Connects to the store, bootstraps the schema and loads the search snapshot.
	pub async fn new(config: sakura_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.sqlite).await?;

		db.ensure_schema().await?;

		let (catalog, _) = sakura_service::load_snapshot(&db, &config.index).await?;
		let delivery = config.ingest.delivery;
		let notifier: Arc<dyn Notifier> = Arc::new(Client::new(&config.notify));
		let query = QueryService::new(config.search, catalog);
		let ingest = IngestWriter::new(db, notifier, delivery);

		tracing::info!(?delivery, endpoint = %config.notify.endpoint, "Ingestion configured.");

		Ok(Self { query: Arc::new(query), ingest: Arc::new(ingest) })
	}
}

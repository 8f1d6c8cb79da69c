mod error;

pub use error::{Error, Result};

use std::net::SocketAddr;

use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::{
	io::AsyncReadExt,
	net::TcpListener,
	sync::oneshot,
};

use sakura_notify::{AnswerMessage, Reply};

pub const MAX_FRAME_BYTES: u32 = 1_048_576;

/// A SQLite database file inside a private temporary directory.
pub struct TestDatabase {
	dir: Option<TempDir>,
	dsn: String,
}
impl TestDatabase {
	pub fn new() -> Result<Self> {
		let dir = tempfile::Builder::new().prefix("sakura_test_").tempdir()?;
		let path = dir.path().join("tables.sqlite");
		let dsn = format!("sqlite://{}", path.display());

		Ok(Self { dir: Some(dir), dsn })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Storage settings pointing at this database.
	pub fn sqlite_config(&self) -> sakura_config::Sqlite {
		sakura_config::Sqlite { dsn: self.dsn.clone(), pool_max_conns: 2, busy_timeout_ms: 5_000 }
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if let Some(dir) = self.dir.take() {
			dir.close()?;
		}

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Test database cleanup failed: {err}.");
		}
	}
}

/// Inserts an answer row into an already bootstrapped schema and returns its row id.
pub async fn seed_answer(
	pool: &SqlitePool,
	question_id: i64,
	answer_id: i64,
	question: &str,
	answer: &str,
	star: i64,
) -> Result<i64> {
	let result = sqlx::query(
		"INSERT INTO answer (question_id, answer_id, question, answer, star) VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(question_id)
	.bind(answer_id)
	.bind(question)
	.bind(answer)
	.bind(star)
	.execute(pool)
	.await?;

	Ok(result.last_insert_rowid())
}

pub async fn seed_label(pool: &SqlitePool, question_id: i64, label: &str) -> Result<()> {
	sqlx::query("INSERT INTO label (question_id, label) VALUES ($1, $2)")
		.bind(question_id)
		.bind(label)
		.execute(pool)
		.await?;

	Ok(())
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64> {
	if !matches!(table, "answer" | "label" | "notification_outbox") {
		return Err(Error::Message(format!("Unknown table {table:?}.")));
	}

	let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
		.fetch_one(pool)
		.await?;

	Ok(count)
}

/// An in-process notification endpoint that stops when dropped or shut down.
pub struct Responder {
	pub addr: SocketAddr,
	shutdown: Option<oneshot::Sender<()>>,
}
impl Responder {
	pub fn endpoint(&self) -> String {
		self.addr.to_string()
	}

	pub fn shutdown(mut self) {
		self.stop();
	}

	fn stop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}
impl Drop for Responder {
	fn drop(&mut self) {
		self.stop();
	}
}

pub async fn spawn_responder<H>(handler: H) -> Result<Responder>
where
	H: Fn(AnswerMessage) -> Reply + Send + Sync + 'static,
{
	spawn_responder_on("127.0.0.1:0", handler).await
}

/// Like [`spawn_responder`] but on a caller-chosen address, for endpoints that come up late.
pub async fn spawn_responder_on<H>(bind: &str, handler: H) -> Result<Responder>
where
	H: Fn(AnswerMessage) -> Reply + Send + Sync + 'static,
{
	let listener = TcpListener::bind(bind).await?;
	let addr = listener.local_addr()?;
	let (tx, rx) = oneshot::channel::<()>();

	tokio::spawn(async move {
		let shutdown = async {
			let _ = rx.await;
		};

		if let Err(err) = sakura_notify::serve(listener, MAX_FRAME_BYTES, handler, shutdown).await {
			eprintln!("Test responder failed: {err}.");
		}
	});

	Ok(Responder { addr, shutdown: Some(tx) })
}

pub async fn spawn_acking_responder() -> Result<Responder> {
	spawn_responder(|message| Reply::Ack { message: format!("received {}", message.answer_id) })
		.await
}

pub async fn spawn_rejecting_responder(reason: &'static str) -> Result<Responder> {
	spawn_responder(move |_| Reply::Reject { reason: reason.to_string() }).await
}

/// Accepts connections and reads forever without replying.
pub async fn spawn_stalled_endpoint() -> Result<SocketAddr> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;

	tokio::spawn(async move {
		while let Ok((mut stream, _)) = listener.accept().await {
			tokio::spawn(async move {
				let mut sink = Vec::new();
				let _ = stream.read_to_end(&mut sink).await;
			});
		}
	});

	Ok(addr)
}

/// An address nothing listens on.
pub async fn unreachable_endpoint() -> Result<SocketAddr> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;

	drop(listener);

	Ok(addr)
}

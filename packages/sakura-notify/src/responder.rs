use std::{future::Future, sync::Arc};

use tokio::net::{TcpListener, TcpStream};

use crate::{AnswerMessage, Reply, Result, codec};

/// Accepts notification requests until `shutdown` resolves.
///
/// Each connection carries one request frame and receives one reply frame produced by
/// `handler`. Per-connection failures are logged and do not stop the loop.
pub async fn serve<H, S>(
	listener: TcpListener,
	max_frame_bytes: u32,
	handler: H,
	shutdown: S,
) -> Result<()>
where
	H: Fn(AnswerMessage) -> Reply + Send + Sync + 'static,
	S: Future<Output = ()>,
{
	let handler = Arc::new(handler);

	tokio::pin!(shutdown);

	loop {
		tokio::select! {
			_ = &mut shutdown => {
				tracing::info!("Notification responder shutting down.");

				return Ok(());
			},
			accepted = listener.accept() => {
				let (stream, peer) = match accepted {
					Ok(accepted) => accepted,
					Err(err) => {
						tracing::warn!(error = %err, "Failed to accept notification connection.");

						continue;
					},
				};
				let handler = Arc::clone(&handler);

				tokio::spawn(async move {
					if let Err(err) = handle_connection(stream, max_frame_bytes, handler.as_ref()).await {
						tracing::warn!(%peer, error = %err, "Notification connection failed.");
					}
				});
			},
		}
	}
}

async fn handle_connection<H>(mut stream: TcpStream, max_frame_bytes: u32, handler: &H) -> Result<()>
where
	H: Fn(AnswerMessage) -> Reply,
{
	let request = codec::read_frame(&mut stream, max_frame_bytes).await?;
	let reply = match AnswerMessage::decode(&request) {
		Ok(message) => handler(message),
		Err(err) => Reply::Reject { reason: format!("Undecodable message: {err}") },
	};
	let body = codec::encode(&reply)?;

	codec::write_frame(&mut stream, &body, max_frame_bytes).await
}

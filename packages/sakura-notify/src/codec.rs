//! Length-prefixed bincode frames.
//!
//! A frame is a big-endian `u32` body length followed by the body. Both directions enforce the
//! same size limit before allocating.

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Error, Result};

pub fn encode<T>(value: &T) -> Result<Vec<u8>>
where
	T: Serialize,
{
	Ok(bincode::serialize(value)?)
}

pub fn decode<T>(bytes: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	Ok(bincode::deserialize(bytes)?)
}

pub async fn write_frame<W>(writer: &mut W, body: &[u8], max_frame_bytes: u32) -> Result<()>
where
	W: AsyncWrite + Unpin,
{
	let len = checked_len(body.len(), max_frame_bytes)?;

	writer.write_all(&len.to_be_bytes()).await.map_err(Error::Send)?;
	writer.write_all(body).await.map_err(Error::Send)?;
	writer.flush().await.map_err(Error::Send)?;

	Ok(())
}

pub async fn read_frame<R>(reader: &mut R, max_frame_bytes: u32) -> Result<Vec<u8>>
where
	R: AsyncRead + Unpin,
{
	let mut prefix = [0_u8; 4];

	reader.read_exact(&mut prefix).await.map_err(Error::Receive)?;

	let len = u32::from_be_bytes(prefix);

	if len > max_frame_bytes {
		return Err(Error::FrameTooLarge { len: len as usize, max: max_frame_bytes });
	}

	let mut body = vec![0_u8; len as usize];

	reader.read_exact(&mut body).await.map_err(Error::Receive)?;

	Ok(body)
}

fn checked_len(len: usize, max_frame_bytes: u32) -> Result<u32> {
	match u32::try_from(len) {
		Ok(len) if len <= max_frame_bytes => Ok(len),
		_ => Err(Error::FrameTooLarge { len, max: max_frame_bytes }),
	}
}

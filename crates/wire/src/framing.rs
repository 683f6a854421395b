// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed JSON framing: a 4-byte big-endian length followed by
//! that many bytes of JSON (spec §4.D, §6: "length-framed text messages
//! carrying one object each").

use crate::error::WireError;
use crate::messages::{InboundMessage, OutboundMessage};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Guard against a corrupt or hostile length prefix demanding an
/// unreasonable allocation.
pub const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Read one length-prefixed frame. Returns `Ok(None)` on a clean EOF at a
/// frame boundary (the peer closed the connection between messages).
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>, WireError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(WireError::FrameTooLarge { len, max: MAX_FRAME_LEN });
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Write one length-prefixed frame.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), WireError> {
    if payload.len() > MAX_FRAME_LEN as usize {
        return Err(WireError::FrameTooLarge { len: payload.len() as u32, max: MAX_FRAME_LEN });
    }

    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_inbound<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<InboundMessage>, WireError> {
    match read_message(reader).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub async fn write_outbound<W: AsyncWrite + Unpin>(writer: &mut W, message: &OutboundMessage) -> Result<(), WireError> {
    let bytes = serde_json::to_vec(message)?;
    write_message(writer, &bytes).await
}

/// Write an [`InboundMessage`], the client-side counterpart to
/// [`write_outbound`] — used by the Orchestrator's dashboard relay rather
/// than by the Dashboard Server itself.
pub async fn write_inbound<W: AsyncWrite + Unpin>(writer: &mut W, message: &InboundMessage) -> Result<(), WireError> {
    let bytes = serde_json::to_vec(message)?;
    write_message(writer, &bytes).await
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;

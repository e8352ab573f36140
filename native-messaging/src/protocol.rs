//! Browser native messaging framing and message envelopes.
//!
//! Frames are a 4-byte little-endian length prefix followed by
//! exactly that many bytes of UTF-8 JSON. The codec is generic over
//! its streams so tests can drive it over in-memory pipes; the
//! production host binds it to stdin/stdout.

use crate::error::{HostError, HostResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Stdin, Stdout};

/// Incoming request from the browser extension.
///
/// Two shapes exist on the wire: the legacy one keyed by `cmd` (with
/// `info` as an opaque correlation value echoed back), and the
/// current one keyed by a string `info` tag. Which key is present
/// decides how the request is dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Command tag of the legacy shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    /// Dispatch tag of the current shape, or the opaque echo value of
    /// the legacy shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,

    /// Command-specific payload: an object for picker commands, a
    /// plain string for the direct copy command.
    #[serde(default)]
    pub param: Value,
}

/// How a request is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTag {
    /// Legacy shape: dispatch on the `cmd` field.
    Cmd(String),
    /// Current shape: dispatch on the string `info` field.
    Info(String),
}

impl Request {
    /// Extract the dispatch tag, preferring `cmd` when both fields
    /// are present (the legacy shape carries `info` purely as an
    /// echo value).
    ///
    /// A non-string `info` in the current shape still yields a tag
    /// (its JSON rendering) so the caller receives the defined
    /// "unknown command" response instead of silence.
    pub fn dispatch_tag(&self) -> Option<DispatchTag> {
        if let Some(cmd) = &self.cmd {
            return Some(DispatchTag::Cmd(cmd.clone()));
        }
        match &self.info {
            Some(Value::String(tag)) => Some(DispatchTag::Info(tag.clone())),
            Some(other) => Some(DispatchTag::Info(other.to_string())),
            None => None,
        }
    }
}

/// Outgoing response to the browser extension.
///
/// Echoes the `cmd`/`info` fields the caller needs to correlate the
/// response to its request; unknown commands answer with a bare
/// `result` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Echoed command tag (legacy shape only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    /// Command-defined result string. Empty on user cancellation and
    /// on contained handler failure alike.
    pub result: String,

    /// Echoed correlation value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

impl Response {
    /// Response for the `cmd`-keyed shape.
    pub fn for_cmd(cmd: String, result: String, info: Option<Value>) -> Self {
        Self {
            cmd: Some(cmd),
            result,
            info,
        }
    }

    /// Response for the `info`-keyed shape.
    pub fn for_info(result: String, info: Option<Value>) -> Self {
        Self {
            cmd: None,
            result,
            info,
        }
    }

    /// Bare response carrying only a result, used for unknown
    /// commands and untaggable requests.
    pub fn bare<S: Into<String>>(result: S) -> Self {
        Self {
            cmd: None,
            result: result.into(),
            info: None,
        }
    }
}

/// Length-prefixed JSON codec over a byte stream pair.
pub struct NativeMessagingProtocol<R, W> {
    reader: R,
    writer: W,
    max_message_size: usize,
}

impl NativeMessagingProtocol<Stdin, Stdout> {
    /// Bind the codec to the process's stdin/stdout, the channel the
    /// browser owns.
    pub fn stdio(max_message_size: usize) -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout(), max_message_size)
    }
}

impl<R, W> NativeMessagingProtocol<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a codec over arbitrary streams.
    pub fn new(reader: R, writer: W, max_message_size: usize) -> Self {
        Self {
            reader,
            writer,
            max_message_size,
        }
    }

    /// Read one raw frame payload.
    ///
    /// `Ok(None)` means the stream ended cleanly at a frame boundary
    /// (zero prefix bytes read): normal session termination. A
    /// partial prefix, truncated payload, or oversized length is a
    /// protocol error, fatal to the session.
    pub async fn read_frame(&mut self) -> HostResult<Option<Vec<u8>>> {
        let mut length_bytes = [0u8; 4];
        let mut filled = 0;
        while filled < length_bytes.len() {
            let n = self
                .reader
                .read(&mut length_bytes[filled..])
                .await
                .map_err(|e| HostError::protocol(format!("failed to read length prefix: {e}")))?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(HostError::protocol(format!(
                    "stream ended mid-prefix: got {filled} of 4 length bytes"
                )));
            }
            filled += n;
        }

        let length = u32::from_le_bytes(length_bytes) as usize;
        if length > self.max_message_size {
            return Err(HostError::protocol(format!(
                "frame length {length} exceeds maximum {}",
                self.max_message_size
            )));
        }

        let mut payload = vec![0u8; length];
        self.reader
            .read_exact(&mut payload)
            .await
            .map_err(|e| HostError::protocol(format!("failed to read frame payload: {e}")))?;

        Ok(Some(payload))
    }

    /// Read and decode one request.
    ///
    /// Invalid UTF-8 or JSON is a protocol error: the stream contract
    /// is broken and recovery is impossible at this layer.
    pub async fn read_message(&mut self) -> HostResult<Option<Request>> {
        let Some(payload) = self.read_frame().await? else {
            return Ok(None);
        };

        let text = String::from_utf8(payload)
            .map_err(|e| HostError::protocol(format!("invalid UTF-8 in frame: {e}")))?;

        let request: Request = serde_json::from_str(&text)
            .map_err(|e| HostError::protocol(format!("invalid JSON in frame: {e}")))?;

        Ok(Some(request))
    }

    /// Write one raw frame and flush so the peer observes it without
    /// buffering delay.
    pub async fn write_frame(&mut self, payload: &[u8]) -> HostResult<()> {
        if payload.len() > self.max_message_size {
            return Err(HostError::protocol(format!(
                "outgoing frame length {} exceeds maximum {}",
                payload.len(),
                self.max_message_size
            )));
        }

        let prefix = (payload.len() as u32).to_le_bytes();
        self.writer
            .write_all(&prefix)
            .await
            .map_err(|e| HostError::protocol(format!("failed to write length prefix: {e}")))?;
        self.writer
            .write_all(payload)
            .await
            .map_err(|e| HostError::protocol(format!("failed to write frame payload: {e}")))?;
        self.writer
            .flush()
            .await
            .map_err(|e| HostError::protocol(format!("failed to flush stream: {e}")))?;

        Ok(())
    }

    /// Serialize and write one response.
    pub async fn write_message(&mut self, response: &Response) -> HostResult<()> {
        let payload = serde_json::to_vec(response)?;
        self.write_frame(&payload).await
    }
}

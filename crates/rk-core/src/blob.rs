//! Blob attribute codecs
//!
//! Blob attributes never appear as SQL text. Their values are packed into a
//! byte payload that is bound as a statement parameter, and unpacked again
//! when rows are fetched.

use crate::config::CodecKind;
use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use std::sync::Arc;

/// Packs attribute values into blob payloads and back.
pub trait BlobCodec: Send + Sync {
    /// Encode a value as a blob payload
    fn pack(&self, value: &Value) -> CoreResult<Vec<u8>>;

    /// Decode a payload produced by [`pack`](Self::pack)
    fn unpack(&self, payload: &[u8]) -> CoreResult<Value>;
}

/// Payload is the raw byte string that follows
const RAW_TAG: u8 = 0x00;
/// Payload is a JSON-encoded [`Value`]
const JSON_TAG: u8 = 0x01;

/// One leading tag byte, then either the bytes verbatim or JSON.
///
/// Byte strings round-trip exactly whatever their content.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedCodec;

impl BlobCodec for TaggedCodec {
    fn pack(&self, value: &Value) -> CoreResult<Vec<u8>> {
        match value {
            Value::Bytes(bytes) => {
                let mut payload = Vec::with_capacity(bytes.len() + 1);
                payload.push(RAW_TAG);
                payload.extend_from_slice(bytes);
                Ok(payload)
            }
            other => {
                let mut payload = vec![JSON_TAG];
                serde_json::to_writer(&mut payload, other)?;
                Ok(payload)
            }
        }
    }

    fn unpack(&self, payload: &[u8]) -> CoreResult<Value> {
        match payload.split_first() {
            Some((&RAW_TAG, rest)) => Ok(Value::Bytes(rest.to_vec())),
            Some((&JSON_TAG, rest)) => Ok(serde_json::from_slice(rest)?),
            Some((tag, _)) => Err(CoreError::BlobDecode {
                message: format!("unknown payload tag 0x{tag:02x}"),
            }),
            None => Err(CoreError::BlobDecode {
                message: "empty payload".to_string(),
            }),
        }
    }
}

/// Codec selected by configuration
pub fn codec_for(kind: CodecKind) -> Arc<dyn BlobCodec> {
    match kind {
        CodecKind::Tagged => Arc::new(TaggedCodec),
    }
}

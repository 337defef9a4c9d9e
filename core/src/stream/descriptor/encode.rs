// ## 📂 File: `src/stream/descriptor/encode.rs`

//! Descriptor document (JSON).
//!
//! ```json
//! {"stream_type":"lbryfile","stream_name":"<hex>","key":"<hex>",
//!  "suggested_file_name":"<hex>","stream_hash":"<hex>","total_length":N,
//!  "blobs":[{"length":L,"blob_num":0,"iv":"<hex>","blob_hash":"<hex>"},
//!           …,
//!           {"length":0,"blob_num":n,"iv":"<hex>"}]}
//! ```
//!
//! The document is a transport format only. The stream hash is always
//! computed from the canonical form in `hash.rs`, never from these bytes.

use serde::{Deserialize, Serialize};

use crate::constants::{AES_BLOCK_LEN, IV_LEN, KEY_LENGTHS, MAX_BLOB_SIZE, STREAM_TYPE};
use crate::crypto::{BlobHash, Iv, StreamHash, StreamKey};
use crate::stream::descriptor::builder::DescriptorBuilder;
use crate::stream::descriptor::types::{BlobRecord, StreamDescriptor, StreamName};
use crate::types::StreamError;
use crate::utils::decode_hex_array;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDocument {
    pub stream_type: String,
    pub stream_name: String,
    pub key: String,
    pub suggested_file_name: String,
    pub stream_hash: StreamHash,
    pub total_length: u64,
    pub blobs: Vec<BlobEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobEntry {
    pub length: u64,
    pub blob_num: u64,
    pub iv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_hash: Option<BlobHash>,
}

impl From<&StreamDescriptor> for DescriptorDocument {
    fn from(d: &StreamDescriptor) -> Self {
        Self {
            stream_type: STREAM_TYPE.to_string(),
            stream_name: d.stream_name().to_hex(),
            key: d.key().to_hex(),
            suggested_file_name: d.suggested_file_name().to_hex(),
            stream_hash: d.stream_hash(),
            total_length: d.total_length(),
            blobs: d
                .blobs()
                .iter()
                .map(|b| BlobEntry {
                    length: b.length,
                    blob_num: b.sequence_index,
                    iv: hex::encode(b.iv),
                    blob_hash: b.blob_hash,
                })
                .collect(),
        }
    }
}

pub fn encode_descriptor(descriptor: &StreamDescriptor) -> Result<Vec<u8>, StreamError> {
    serde_json::to_vec(&DescriptorDocument::from(descriptor)).map_err(|e| StreamError::Descriptor(e.to_string()))
}

/// Decode a descriptor document. The embedded `stream_hash` is not checked;
/// use `verify_descriptor` for that.
pub fn parse_descriptor(bytes: &[u8]) -> Result<StreamDescriptor, StreamError> {
    decode(bytes).map(|(descriptor, _)| descriptor)
}

/// Decode a descriptor document and check its embedded `stream_hash`
/// against the hash of its contents.
pub fn verify_descriptor(bytes: &[u8]) -> Result<StreamDescriptor, StreamError> {
    let (descriptor, embedded) = decode(bytes)?;
    let computed = descriptor.stream_hash();
    if computed != embedded {
        return Err(StreamError::DescriptorMismatch {
            expected: embedded,
            actual: computed,
        });
    }
    Ok(descriptor)
}

fn malformed(msg: impl Into<String>) -> StreamError {
    StreamError::Descriptor(msg.into())
}

fn decode_name(field: &str, hex_name: &str) -> Result<StreamName, StreamError> {
    let raw = hex::decode(hex_name).map_err(|e| malformed(format!("{field}: {e}")))?;
    StreamName::from_bytes(&raw)
}

fn decode_record(entry: &BlobEntry) -> Result<BlobRecord, StreamError> {
    let iv: Iv = decode_hex_array::<IV_LEN>(&entry.iv)
        .ok_or_else(|| malformed(format!("blob {}: bad iv {:?}", entry.blob_num, entry.iv)))?;

    match (entry.length, entry.blob_hash) {
        (0, None) => Ok(BlobRecord::terminator(entry.blob_num, iv)),
        (0, Some(_)) => Err(malformed(format!("blob {}: zero-length blob with a hash", entry.blob_num))),
        (_, None) => Err(malformed(format!("blob {}: missing blob_hash", entry.blob_num))),
        (len, Some(_)) if len > MAX_BLOB_SIZE as u64 => Err(malformed(format!(
            "blob {}: length {len} exceeds {MAX_BLOB_SIZE}",
            entry.blob_num
        ))),
        (len, Some(_)) if len % AES_BLOCK_LEN as u64 != 0 => Err(malformed(format!(
            "blob {}: length {len} is not a multiple of {AES_BLOCK_LEN}",
            entry.blob_num
        ))),
        (len, Some(hash)) => Ok(BlobRecord::data(entry.blob_num, hash, iv, len)),
    }
}

fn decode(bytes: &[u8]) -> Result<(StreamDescriptor, StreamHash), StreamError> {
    let doc: DescriptorDocument = serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

    if doc.stream_type != STREAM_TYPE {
        return Err(malformed(format!("unknown stream_type {:?}", doc.stream_type)));
    }

    let stream_name = decode_name("stream_name", &doc.stream_name)?;
    let suggested_file_name = decode_name("suggested_file_name", &doc.suggested_file_name)?;
    let key = hex::decode(&doc.key).map_err(|e| malformed(format!("key: {e}")))?;
    if !KEY_LENGTHS.contains(&key.len()) {
        return Err(malformed(format!("key: unsupported length {}", key.len())));
    }

    // Blobs must be listed in `blob_num` order; the builder rejects anything else.
    let mut builder = DescriptorBuilder::new(stream_name, StreamKey::new(key), Some(suggested_file_name));
    let (mut data_units, mut ciphertext_len) = (0u64, 0u64);
    for entry in &doc.blobs {
        let record = decode_record(entry)?;
        if !record.is_terminator() {
            data_units += 1;
            ciphertext_len = ciphertext_len
                .checked_add(record.length)
                .ok_or_else(|| malformed("blob lengths overflow"))?;
        }
        builder.push(record, 0).map_err(|e| malformed(e.to_string()))?;
    }
    let mut descriptor = builder.finish().map_err(|e| malformed(e.to_string()))?;

    // Every data blob holds between length-16 and length-1 plaintext bytes.
    let min = data_units
        .checked_mul(AES_BLOCK_LEN as u64)
        .and_then(|padding| ciphertext_len.checked_sub(padding))
        .ok_or_else(|| malformed("blob lengths overflow"))?;
    let max = ciphertext_len
        .checked_sub(data_units)
        .ok_or_else(|| malformed("blob lengths overflow"))?;
    if doc.total_length < min || doc.total_length > max {
        return Err(malformed(format!(
            "total_length {} inconsistent with blob lengths (expected {min}..={max})",
            doc.total_length
        )));
    }
    descriptor.total_length = doc.total_length;

    Ok((descriptor, doc.stream_hash))
}

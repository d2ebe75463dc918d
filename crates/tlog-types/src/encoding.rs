//! Hash and signature values as logs publish them
//!
//! Transparency logs publish hashes as base64 in their JSON APIs and people
//! read them as hex. [`Hash`] keeps the raw 32 bytes and converts at the edges.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of a SHA-256 digest
pub const HASH_SIZE: usize = 32;

fn decode_base64(s: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|e| Error::InvalidEncoding(format!("{:?} is not base64: {}", s, e)))
}

/// A tree node or leaf hash (SHA-256, 32 bytes)
///
/// Serialized as a standard-alphabet base64 string, which is how RFC 6962
/// logs encode hashes in `get-sth` and proof responses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Copy a digest out of `bytes`, which must be exactly [`HASH_SIZE`] long
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; HASH_SIZE]>::try_from(bytes)
            .map(Hash)
            .map_err(|_| {
                Error::InvalidEncoding(format!(
                    "digest has {} bytes, expected {}",
                    bytes.len(),
                    HASH_SIZE
                ))
            })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::InvalidEncoding(format!("{:?} is not hex: {}", s, e)))?;
        Hash::try_from_slice(&bytes)
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        Hash::try_from_slice(&decode_base64(s)?)
    }

    /// Lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Standard-alphabet base64 with padding
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Hash::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Signature bytes of a tree head, kept as received
///
/// RFC 6962 logs send a TLS `DigitallySigned` structure encoded as base64.
/// It is carried through unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeHeadSignature(Vec<u8>);

impl TreeHeadSignature {
    pub fn new(bytes: Vec<u8>) -> Self {
        TreeHeadSignature(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Serialize for TreeHeadSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for TreeHeadSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        decode_base64(&encoded)
            .map(TreeHeadSignature)
            .map_err(serde::de::Error::custom)
    }
}

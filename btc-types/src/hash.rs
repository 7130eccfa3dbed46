use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A double-SHA-256 digest, stored internally in the natural (big-endian
/// as produced by the hash function) byte order. Display and wire formats
/// that want the reversed "block explorer" order go through
/// [`ReversedH256`] rather than mutating this type.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct H256(pub [u8; 32]);

impl H256 {
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Hex encoding with byte order reversed, matching how block explorers
    /// and the standardized display projection present hashes.
    #[must_use]
    pub fn to_reversed_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }
}

impl std::str::FromStr for H256 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        bytes
            .try_into()
            .map(H256)
            .map_err(|_| hex::FromHexError::InvalidStringLength)
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl TryFrom<Vec<u8>> for H256 {
    type Error = &'static str;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Ok(H256(value.try_into().map_err(|_| "invalid hash length")?))
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HexVisitor;

        impl<'de> Visitor<'de> for HexVisitor {
            type Value = H256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a hex string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                hex::decode(v)
                    .map_err(de::Error::custom)?
                    .try_into()
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

impl Serialize for H256 {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<<S as serde::Serializer>::Ok, <S as serde::Serializer>::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Wraps an `H256` so that serde (de)serializes it in reversed byte order.
/// Used for the standardized display projection's hash fields.
#[derive(Serialize, Deserialize)]
pub struct ReversedH256 {
    #[serde(flatten)]
    #[serde(with = "serd_reversed_h256")]
    pub hash: H256,
}

impl From<H256> for ReversedH256 {
    fn from(hash: H256) -> Self {
        ReversedH256 { hash }
    }
}

pub mod serd_reversed_h256 {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<H256, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let mut hash: H256 = de::Deserialize::deserialize(deserializer)?;
        hash.0.reverse();
        Ok(hash)
    }

    pub fn serialize<S>(
        bytes: &H256,
        serializer: S,
    ) -> Result<<S as serde::Serializer>::Ok, <S as serde::Serializer>::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&bytes.to_reversed_hex())
    }
}

pub fn double_sha256(input: &[u8]) -> H256 {
    H256(Sha256::digest(Sha256::digest(input)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_hex_reverses_byte_order_not_the_string() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let h = H256(bytes);
        assert_eq!(h.to_hex(), format!("{}01", "00".repeat(31)));
        assert!(h.to_reversed_hex().starts_with("01"));
        assert!(h.to_reversed_hex().ends_with("00"));
    }

    #[test]
    fn double_sha256_is_deterministic_and_not_single_sha256() {
        let a = double_sha256(b"block header bytes");
        let b = double_sha256(b"block header bytes");
        assert_eq!(a, b);

        use sha2::{Digest, Sha256};
        let single: [u8; 32] = Sha256::digest(b"block header bytes").into();
        assert_ne!(a.0, single);
    }

    #[test]
    fn hex_roundtrips_through_serde() {
        let h = double_sha256(b"roundtrip");
        let json = serde_json::to_string(&h).unwrap();
        let back: H256 = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}

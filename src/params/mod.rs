//! # Parameter records
//!
//! Each operation has a raw record (what a caller sends, loosely typed and
//! checked with `validator`) and a normalised record (exactly what the
//! transaction builder needs, with every default resolved).
//!
//! Raw records also describe themselves as a JSON schema for tool listings.

use serde_json::Value;

pub mod account;
pub mod consensus;
pub mod evm;
pub mod queries;
pub mod token;

/// JSON schema advertised for a raw parameter record.
pub trait ParameterSchema {
    fn schema() -> Value;
}

/// Serialises `Vec<Vec<u8>>` as a list of hex strings.
pub(crate) mod hex_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        items
            .iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

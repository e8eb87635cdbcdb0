/*
[INPUT]:  Provider network identifiers
[OUTPUT]: Typed network enum with chain id mapping
[POS]:    Data layer - type definitions for provider configuration
[UPDATE]: When a provider network is added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Alfajores,
    Mainnet,
}

impl Network {
    /// EVM chain id signed into the login message
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Alfajores => 44787,
            Network::Mainnet => 42220,
        }
    }
}

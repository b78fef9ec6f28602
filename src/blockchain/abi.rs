// src/blockchain/abi.rs

use ethers_core::abi::{decode, encode, ParamType, Token};
use ethers_core::types::{Address, Bytes};
use ethers_core::utils::keccak256;

use super::models::{ContractId, LedgerId};

pub const ERC20_FACTORY_DEPLOY: &str = "deployToken(string,string,uint8,uint256)";
pub const ERC721_FACTORY_DEPLOY: &str = "deployToken(string,string,string)";
pub const ERC20_TRANSFER: &str = "transfer(address,uint256)";
pub const ERC20_APPROVE: &str = "approve(address,uint256)";
pub const ERC721_TRANSFER_FROM: &str = "transferFrom(address,address,uint256)";
pub const ERC721_SAFE_MINT: &str = "safeMint(address)";

pub const DEPLOY_GAS: u64 = 3_000_000;
pub const CALL_GAS: u64 = 100_000;

/// Factory address published for a network, if there is one.
pub fn default_erc20_factory(ledger: LedgerId) -> Option<ContractId> {
    match ledger {
        LedgerId::Testnet => Some(ContractId::from_num(6_471_814)),
        _ => None,
    }
}

pub fn default_erc721_factory(_ledger: LedgerId) -> Option<ContractId> {
    None
}

pub fn selector(sig: &str) -> [u8; 4] {
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&keccak256(sig.as_bytes())[0..4]);
    sel
}

pub fn encode_call(sig: &str, tokens: Vec<Token>) -> Bytes {
    let mut out = selector(sig).to_vec();
    let mut tail = encode(&tokens);
    out.append(&mut tail);
    Bytes::from(out)
}

pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s)
}

/// Reads the first return word of a call result as an address.
pub fn decode_address(call_result: &str) -> Option<Address> {
    let bytes = hex_to_bytes(call_result).ok()?;
    match decode(&[ParamType::Address], &bytes).ok()?.first() {
        Some(Token::Address(address)) => Some(*address),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U256;
    use std::str::FromStr;

    #[test]
    fn transfer_selector_matches_erc20() {
        assert_eq!(hex::encode(selector(ERC20_TRANSFER)), "a9059cbb");
        assert_eq!(hex::encode(selector(ERC20_APPROVE)), "095ea7b3");
    }

    #[test]
    fn encodes_and_decodes_address_word() {
        let to = Address::from_str("0x00000000000000000000000000000000000003e8").unwrap();
        let data = encode_call(ERC20_TRANSFER, vec![Token::Address(to), Token::Uint(U256::from(5u64))]);
        assert_eq!(data.len(), 4 + 64);

        let word = format!("0x{}", hex::encode(encode(&[Token::Address(to)])));
        assert_eq!(decode_address(&word), Some(to));
        assert_eq!(decode_address("0x"), None);
    }
}

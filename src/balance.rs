use crate::config::FeeConfig;
use crate::error::{KeyphraseError, Result};
use serde::{Deserialize, Serialize};

pub const MOTES_PER_CSPR: u128 = 1_000_000_000;
pub const CSPR_SYMBOL: &str = "CSPR";
pub const CSPR_ICON: &str = "assets/images/token-icons/cspr.png";

/// Parse a hex encoded mote balance, with or without a `0x` prefix.
pub fn motes_from_hex(hex: &str) -> Result<u128> {
    let digits = hex.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| KeyphraseError::InvalidBalance(format!("{}: {}", hex, e)))
}

pub fn motes_to_cspr(motes: u128) -> f64 {
    motes as f64 / MOTES_PER_CSPR as f64
}

pub fn convert_balance_from_hex(hex: &str) -> Result<f64> {
    Ok(motes_to_cspr(motes_from_hex(hex)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub mote: u128,
    pub display_balance: f64,
}

impl Balance {
    pub fn from_hex(hex: &str) -> Result<Self> {
        let mote = motes_from_hex(hex)?;
        Ok(Self {
            mote,
            display_balance: motes_to_cspr(mote),
        })
    }
}

/// Balance of a token other than CSPR held by the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub address: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: String,
    pub balance: f64,
    pub price: f64,
    pub total_price: f64,
    pub transfer_fee: f64,
    pub min_amount: Option<f64>,
    pub icon: Option<String>,
}

/// CSPR first, then every other token. Tokens have no price source yet so
/// they are valued at zero.
pub fn all_token_info(
    cspr_balance: f64,
    cspr_price: f64,
    tokens: &[TokenBalance],
    fees: &FeeConfig,
) -> Vec<TokenInfo> {
    let token_price = 0.0;
    let cspr = TokenInfo {
        symbol: CSPR_SYMBOL.to_string(),
        address: CSPR_SYMBOL.to_string(),
        balance: cspr_balance,
        price: cspr_price,
        total_price: cspr_price * cspr_balance,
        transfer_fee: fees.cspr_transfer_fee,
        min_amount: Some(fees.min_cspr_transfer),
        icon: Some(CSPR_ICON.to_string()),
    };

    std::iter::once(cspr)
        .chain(tokens.iter().map(|token| TokenInfo {
            symbol: token.symbol.clone(),
            address: token.address.clone(),
            balance: token.balance,
            price: token_price,
            total_price: token_price * token.balance,
            transfer_fee: fees.token_transfer_fee,
            min_amount: None,
            icon: None,
        }))
        .collect()
}

pub fn account_total_in_fiat(infos: &[TokenInfo]) -> f64 {
    infos.iter().map(|info| info.total_price).sum()
}

pub fn token_info_by_address<'a>(infos: &'a [TokenInfo], address: &str) -> Option<&'a TokenInfo> {
    infos.iter().find(|info| info.address == address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_balances() {
        assert_eq!(motes_from_hex("0x1dcd6500").unwrap(), 500_000_000);
        assert_eq!(motes_from_hex("1DCD6500").unwrap(), 500_000_000);
        assert_eq!(motes_from_hex("").unwrap(), 0);
        assert_eq!(motes_from_hex("0x").unwrap(), 0);
        assert_eq!(convert_balance_from_hex("0x3b9aca00").unwrap(), 1.0);
        assert!(matches!(
            motes_from_hex("0xzz"),
            Err(KeyphraseError::InvalidBalance(_))
        ));
    }

    #[test]
    fn test_balance_from_hex() {
        let balance = Balance::from_hex("0x12a05f200").unwrap();
        assert_eq!(balance.mote, 5_000_000_000);
        assert_eq!(balance.display_balance, 5.0);
    }

    #[test]
    fn test_token_aggregation() {
        let tokens = vec![TokenBalance {
            symbol: "WCSPR".to_string(),
            address: "hash-0a1b".to_string(),
            balance: 40.0,
        }];
        let infos = all_token_info(100.0, 0.05, &tokens, &FeeConfig::default());

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].symbol, "CSPR");
        assert_eq!(infos[0].total_price, 5.0);
        assert_eq!(infos[0].min_amount, Some(2.5));
        assert_eq!(infos[1].price, 0.0);
        assert_eq!(infos[1].transfer_fee, 1.0);
        assert_eq!(account_total_in_fiat(&infos), 5.0);

        assert_eq!(token_info_by_address(&infos, "hash-0a1b").unwrap().balance, 40.0);
        assert!(token_info_by_address(&infos, "hash-ffff").is_none());
        assert_eq!(account_total_in_fiat(&[]), 0.0);
    }
}

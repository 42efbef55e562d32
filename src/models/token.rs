use ethers::types::{Address, U256};

use super::network_config::TokenInfo;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBalance {
    pub token_address: Option<Address>, // None for native token
    pub symbol: String,
    pub balance: U256,
    pub decimals: u8,
    pub formatted_balance: String,
}

impl TokenBalance {
    pub fn for_token(token: &TokenInfo, balance: U256) -> Self {
        Self {
            token_address: Some(token.address),
            symbol: token.symbol.clone(),
            balance,
            decimals: token.decimals,
            formatted_balance: format_units(balance, token.decimals),
        }
    }
}

impl std::fmt::Display for TokenBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.formatted_balance, self.symbol)
    }
}

/// Formats a raw token amount with the given number of decimals, trimming
/// trailing zeros.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let mut amount_str = amount.to_string();
    if decimals == 0 {
        return amount_str;
    }

    let decimals = decimals as usize;
    if amount_str.len() <= decimals {
        amount_str.insert_str(0, &"0".repeat(decimals - amount_str.len() + 1));
    }
    let digits = amount_str.len();
    amount_str.insert(digits - decimals, '.');

    let trimmed = amount_str.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a decimal string in whole token units into the raw integer amount.
pub fn parse_units(amount: &str, decimals: u8) -> Option<U256> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > decimals as usize {
        return None;
    }

    let padded = format!("{whole}{fraction:0<width$}", width = decimals as usize);
    let digits = padded.trim_start_matches('0');
    if digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_dec_str(digits).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_decimals() {
        assert_eq!(format_units(U256::exp10(18), 18), "1");
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::zero(), 18), "0");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_units("1", 18), Some(U256::exp10(18)));
        assert_eq!(parse_units("0.5", 6), Some(U256::from(500_000u64)));
        assert_eq!(parse_units(".25", 2), Some(U256::from(25u64)));
        assert_eq!(parse_units("0", 18), Some(U256::zero()));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_units("", 18), None);
        assert_eq!(parse_units("abc", 18), None);
        assert_eq!(parse_units("-1", 18), None);
        assert_eq!(parse_units("0.0000001", 6), None);
        assert_eq!(parse_units(".", 6), None);
    }

    #[test]
    fn balance_displays_formatted_amount_and_symbol() {
        let token = TokenInfo {
            symbol: "USDC".to_string(),
            address: Address::repeat_byte(7),
            decimals: 6,
        };
        let balance = TokenBalance::for_token(&token, U256::from(2_500_000u64));
        assert_eq!(balance.token_address, Some(token.address));
        assert_eq!(balance.to_string(), "2.5 USDC");
    }
}

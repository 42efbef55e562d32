use ethers::types::Address;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub symbol: String,
    #[serde(default)]
    pub block_explorer: Option<String>,
    pub weth: TokenInfo,
    pub usdc: TokenInfo,
    pub usdt: TokenInfo,
    /// Uniswap V3 `SwapRouter` (the variant whose params carry a deadline).
    pub swap_router: Address,
    /// Pool fee tier in hundredths of a bip.
    #[serde(default = "default_pool_fee")]
    pub pool_fee: u32,
}

fn default_pool_fee() -> u32 {
    3000
}

impl NetworkConfig {
    /// Resolves a token by symbol (case-insensitive) among the configured
    /// tokens.
    pub fn token(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens()
            .into_iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn stablecoins(&self) -> [&TokenInfo; 2] {
        [&self.usdc, &self.usdt]
    }

    pub fn tokens(&self) -> [&TokenInfo; 3] {
        [&self.weth, &self.usdc, &self.usdt]
    }
}

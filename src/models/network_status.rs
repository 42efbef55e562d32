use ethers::types::{U256, U64};

use super::network_config::NetworkConfig;

#[derive(Debug)]
pub struct NetworkStatus {
    pub chain_id: u64,
    pub name: String,
    pub latest_block: u64,
    pub gas_price: U256,
    pub symbol: String,
    pub block_explorer: Option<String>,
}

impl NetworkStatus {
    pub fn new(config: &NetworkConfig, latest_block: U64, gas_price: U256) -> Self {
        Self {
            chain_id: config.chain_id,
            name: config.name.clone(),
            latest_block: latest_block.as_u64(),
            gas_price,
            symbol: config.symbol.clone(),
            block_explorer: config.block_explorer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::network_config::{get_network_config, LOCAL_CHAIN_ID};

    #[test]
    fn keeps_gas_prices_beyond_u64() {
        let gas_price = U256::from(u64::MAX) + U256::from(5u64);
        let status = NetworkStatus::new(
            &get_network_config(LOCAL_CHAIN_ID).unwrap(),
            U64::from(12),
            gas_price,
        );
        assert_eq!(status.gas_price, gas_price);
        assert_eq!(status.latest_block, 12);
        assert_eq!(status.chain_id, LOCAL_CHAIN_ID);
    }
}

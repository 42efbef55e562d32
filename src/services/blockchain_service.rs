use ethers::{
    core::types::{Address, U256},
    providers::{Http, Middleware, Provider},
    types::U64,
};
use std::sync::Arc;

use crate::{
    errors::CustomError,
    models::{
        network_config::NetworkConfig,
        network_status::NetworkStatus,
        token::{format_units, TokenBalance},
    },
};

use super::contracts::IERC20;

#[derive(Clone, Debug)]
pub struct BlockchainClient {
    provider: Arc<Provider<Http>>,
    config: NetworkConfig,
}

impl BlockchainClient {
    /// Connect to the network's RPC endpoint
    pub async fn new(config: NetworkConfig) -> Result<Self, CustomError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| CustomError::NetworkError(e.to_string()))?;

        // Verify connection and chain ID
        let connected_chain_id = provider.get_chainid().await?;

        if connected_chain_id != U256::from(config.chain_id) {
            return Err(CustomError::NetworkError(format!(
                "Connected chain ID {} doesn't match requested chain ID {}",
                connected_chain_id, config.chain_id
            )));
        }
        log::debug!("connected to {} at {}", config.name, config.rpc_url);

        Ok(Self {
            provider: Arc::new(provider),
            config,
        })
    }

    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Get native token balance for an address
    pub async fn get_native_balance(&self, address: Address) -> Result<TokenBalance, CustomError> {
        let balance = self.provider.get_balance(address, None).await?;

        Ok(TokenBalance {
            token_address: None,
            symbol: self.config.symbol.clone(),
            balance,
            decimals: 18,
            formatted_balance: format_units(balance, 18),
        })
    }

    /// Get ERC20 token balance, reading symbol and decimals from the token
    pub async fn get_token_balance(
        &self,
        token_address: Address,
        wallet_address: Address,
    ) -> Result<TokenBalance, CustomError> {
        let contract = IERC20::new(token_address, self.provider.clone());

        let decimals = contract
            .decimals()
            .call()
            .await
            .map_err(CustomError::from_contract)?;
        let symbol = contract
            .symbol()
            .call()
            .await
            .map_err(CustomError::from_contract)?;
        let balance = contract
            .balance_of(wallet_address)
            .call()
            .await
            .map_err(CustomError::from_contract)?;

        Ok(TokenBalance {
            token_address: Some(token_address),
            symbol,
            balance,
            decimals,
            formatted_balance: format_units(balance, decimals),
        })
    }

    /// Get the native balance followed by each token balance. Tokens whose
    /// lookup fails are skipped.
    pub async fn get_multiple_token_balances(
        &self,
        token_addresses: &[Address],
        wallet_address: Address,
    ) -> Result<Vec<TokenBalance>, CustomError> {
        let mut balances = Vec::new();

        let native_balance = self.get_native_balance(wallet_address).await?;
        balances.push(native_balance);

        for &token_address in token_addresses {
            match self.get_token_balance(token_address, wallet_address).await {
                Ok(balance) => balances.push(balance),
                Err(e) => {
                    log::warn!("Error fetching balance for token {:?}: {}", token_address, e);
                    continue;
                }
            }
        }

        Ok(balances)
    }

    /// Get latest block number
    pub async fn get_latest_block(&self) -> Result<U64, CustomError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Get network status
    pub async fn get_network_status(&self) -> Result<NetworkStatus, CustomError> {
        let latest_block = self.get_latest_block().await?;
        let gas_price = self.provider.get_gas_price().await?;

        Ok(NetworkStatus::new(&self.config, latest_block, gas_price))
    }
}

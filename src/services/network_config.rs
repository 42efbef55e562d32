use std::{collections::BTreeMap, path::Path, str::FromStr};

use ethers::types::Address;

use crate::{
    errors::CustomError,
    models::network_config::{NetworkConfig, TokenInfo},
};

/// Chain id of a local Hardhat or Anvil node.
pub const LOCAL_CHAIN_ID: u64 = 31337;

const MAINNET_WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const MAINNET_USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const MAINNET_USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
const SWAP_ROUTER: &str = "0xE592427A0AEce92De3Edee1F18E0157C05861564";

fn address(value: &str) -> Result<Address, CustomError> {
    Address::from_str(value).map_err(|_| CustomError::InvalidAddressError(value.to_string()))
}

fn token(symbol: &str, value: &str, decimals: u8) -> Result<TokenInfo, CustomError> {
    Ok(TokenInfo {
        symbol: symbol.to_string(),
        address: address(value)?,
        decimals,
    })
}

fn mainnet_tokens() -> Result<(TokenInfo, TokenInfo, TokenInfo), CustomError> {
    Ok((
        token("WETH", MAINNET_WETH, 18)?,
        token("USDC", MAINNET_USDC, 6)?,
        token("USDT", MAINNET_USDT, 6)?,
    ))
}

/// Get network configuration based on chain ID
pub fn get_network_config(chain_id: u64) -> Result<NetworkConfig, CustomError> {
    match chain_id {
        1 => {
            let (weth, usdc, usdt) = mainnet_tokens()?;
            Ok(NetworkConfig {
                chain_id: 1,
                name: "Ethereum Mainnet".to_string(),
                rpc_url: "https://eth.llamarpc.com".to_string(),
                symbol: "ETH".to_string(),
                block_explorer: Some("https://etherscan.io".to_string()),
                weth,
                usdc,
                usdt,
                swap_router: address(SWAP_ROUTER)?,
                pool_fee: 3000,
            })
        }
        5 => Ok(NetworkConfig {
            chain_id: 5,
            name: "Goerli Testnet".to_string(),
            rpc_url: "https://rpc.ankr.com/eth_goerli".to_string(),
            symbol: "ETH".to_string(),
            block_explorer: Some("https://goerli.etherscan.io".to_string()),
            weth: token("WETH", "0xB4FBF271143F4FBf7B91A5ded31805e42b2208d6", 18)?,
            usdc: token("USDC", "0x07865c6E87B9F70255377e024ace6630C1Eaa37F", 6)?,
            usdt: token("USDT", "0xC2C527C0CACF457746Bd31B2a698Fe89de2b6d49", 6)?,
            swap_router: address(SWAP_ROUTER)?,
            pool_fee: 3000,
        }),
        // Local node forking mainnet, so the mainnet deployments are available.
        LOCAL_CHAIN_ID => {
            let (weth, usdc, usdt) = mainnet_tokens()?;
            Ok(NetworkConfig {
                chain_id: LOCAL_CHAIN_ID,
                name: "Hardhat Local".to_string(),
                rpc_url: "http://127.0.0.1:8545".to_string(),
                symbol: "ETH".to_string(),
                block_explorer: None,
                weth,
                usdc,
                usdt,
                swap_router: address(SWAP_ROUTER)?,
                pool_fee: 3000,
            })
        }
        _ => Err(CustomError::UnsupportedChainError(chain_id)),
    }
}

const BUILTIN_CHAINS: [u64; 3] = [1, 5, LOCAL_CHAIN_ID];

/// Networks known to the harness, keyed by chain id.
#[derive(Clone, Debug)]
pub struct NetworkRegistry {
    networks: BTreeMap<u64, NetworkConfig>,
}

impl NetworkRegistry {
    pub fn builtin() -> Result<Self, CustomError> {
        let networks = BUILTIN_CHAINS
            .iter()
            .map(|&chain_id| Ok((chain_id, get_network_config(chain_id)?)))
            .collect::<Result<_, CustomError>>()?;
        Ok(Self { networks })
    }

    /// Builtin networks, overridden and extended by the JSON array of
    /// networks stored at `path`.
    pub fn load(path: &Path) -> Result<Self, CustomError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CustomError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let networks: Vec<NetworkConfig> = serde_json::from_str(&contents).map_err(|e| {
            CustomError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let mut registry = Self::builtin()?;
        registry.extend(networks);
        Ok(registry)
    }

    pub fn extend(&mut self, networks: impl IntoIterator<Item = NetworkConfig>) {
        for network in networks {
            log::debug!("registering network {} ({})", network.name, network.chain_id);
            self.networks.insert(network.chain_id, network);
        }
    }

    pub fn get(&self, chain_id: u64) -> Result<NetworkConfig, CustomError> {
        self.networks.get(&chain_id).cloned().ok_or_else(|| {
            log::debug!("known chains: {:?}", self.chain_ids().collect::<Vec<_>>());
            CustomError::UnsupportedChainError(chain_id)
        })
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.networks.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_networks_resolve() {
        let registry = NetworkRegistry::builtin().unwrap();
        assert_eq!(registry.chain_ids().collect::<Vec<_>>(), vec![1, 5, 31337]);

        let local = registry.get(LOCAL_CHAIN_ID).unwrap();
        let mainnet = registry.get(1).unwrap();
        assert_eq!(local.weth, mainnet.weth);
        assert_eq!(local.usdc.decimals, 6);
        assert_eq!(local.pool_fee, 3000);
    }

    #[test]
    fn unknown_chain_is_unsupported() {
        assert!(matches!(
            get_network_config(424242),
            Err(CustomError::UnsupportedChainError(424242))
        ));
        assert!(matches!(
            NetworkRegistry::builtin().unwrap().get(424242),
            Err(CustomError::UnsupportedChainError(424242))
        ));
    }

    #[test]
    fn tokens_resolve_by_symbol() {
        let network = get_network_config(1).unwrap();
        assert_eq!(network.token("usdc").unwrap().symbol, "USDC");
        assert_eq!(network.token("WETH").unwrap().decimals, 18);
        assert!(network.token("DAI").is_none());
    }

    #[test]
    fn file_entries_override_and_extend_builtins() {
        let mut local = get_network_config(LOCAL_CHAIN_ID).unwrap();
        local.rpc_url = "http://127.0.0.1:9545".to_string();
        let mut custom = get_network_config(1).unwrap();
        custom.chain_id = 100;
        custom.name = "Custom".to_string();
        custom.block_explorer = None;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&[local, custom]).unwrap()).unwrap();

        let registry = NetworkRegistry::load(file.path()).unwrap();
        assert_eq!(
            registry.get(LOCAL_CHAIN_ID).unwrap().rpc_url,
            "http://127.0.0.1:9545"
        );
        assert_eq!(registry.get(100).unwrap().name, "Custom");
        assert_eq!(registry.get(1).unwrap().name, "Ethereum Mainnet");
    }

    #[test]
    fn pool_fee_defaults_when_missing_from_file() {
        let mut value = serde_json::to_value(get_network_config(1).unwrap()).unwrap();
        value.as_object_mut().unwrap().remove("pool_fee");
        let network: NetworkConfig = serde_json::from_value(value).unwrap();
        assert_eq!(network.pool_fee, 3000);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            NetworkRegistry::load(file.path()),
            Err(CustomError::ConfigError(_))
        ));
    }
}

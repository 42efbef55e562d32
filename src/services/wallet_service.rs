use std::str::FromStr;

use ethers::{
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer},
    types::Address,
};

use crate::errors::CustomError;

use super::network_config::LOCAL_CHAIN_ID;

/// Mnemonic that Hardhat and Anvil fund by default on a local node.
const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";
const DEV_ACCOUNT_COUNT: u32 = 10;

/// The local accounts available for signing on one network.
#[derive(Clone, Debug)]
pub struct WalletService {
    wallets: Vec<LocalWallet>,
}

impl WalletService {
    /// A configured private key wins. Without one, the development accounts
    /// are only offered on the local chain.
    pub fn new(private_key: Option<&str>, chain_id: u64) -> Result<Self, CustomError> {
        let wallets = match private_key {
            Some(key) => vec![LocalWallet::from_str(key.trim_start_matches("0x"))
                .map_err(|e| CustomError::WalletError(e.to_string()))?],
            None if chain_id == LOCAL_CHAIN_ID => dev_wallets()?,
            None => return Err(CustomError::MissingSignerError),
        };

        Ok(Self {
            wallets: wallets
                .into_iter()
                .map(|wallet| wallet.with_chain_id(chain_id))
                .collect(),
        })
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.wallets.iter().map(|wallet| wallet.address()).collect()
    }

    pub fn signer(&self, index: usize) -> Result<LocalWallet, CustomError> {
        self.wallets
            .get(index)
            .cloned()
            .ok_or(CustomError::AccountNotFoundError(index))
    }
}

fn dev_wallets() -> Result<Vec<LocalWallet>, CustomError> {
    (0..DEV_ACCOUNT_COUNT)
        .map(|index| {
            MnemonicBuilder::<English>::default()
                .phrase(DEV_MNEMONIC)
                .index(index)
                .and_then(|builder| builder.build())
                .map_err(|e| CustomError::WalletError(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // First account of the development mnemonic.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn derives_development_accounts_on_local_chain() {
        let service = WalletService::new(None, LOCAL_CHAIN_ID).unwrap();
        let accounts = service.accounts();
        assert_eq!(accounts.len(), 10);
        assert_eq!(accounts[0], DEV_ADDRESS.parse::<Address>().unwrap());
        assert_eq!(service.signer(3).unwrap().chain_id(), LOCAL_CHAIN_ID);
    }

    #[test]
    fn private_key_is_the_only_account() {
        let service = WalletService::new(Some(DEV_KEY), 1).unwrap();
        assert_eq!(service.accounts(), vec![DEV_ADDRESS.parse::<Address>().unwrap()]);
        assert_eq!(service.signer(0).unwrap().chain_id(), 1);
        assert!(matches!(
            service.signer(1),
            Err(CustomError::AccountNotFoundError(1))
        ));
    }

    #[test]
    fn remote_chain_requires_a_private_key() {
        assert!(matches!(
            WalletService::new(None, 1),
            Err(CustomError::MissingSignerError)
        ));
    }

    #[test]
    fn malformed_private_key_is_rejected() {
        assert!(matches!(
            WalletService::new(Some("not a key"), LOCAL_CHAIN_ID),
            Err(CustomError::WalletError(_))
        ));
    }
}

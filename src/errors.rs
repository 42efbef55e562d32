use ethers::{
    contract::ContractError,
    providers::{Middleware, ProviderError},
    types::H256,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CustomError {
    #[error("Transaction reverted: {0}")]
    RevertedError(String),

    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction dropped before it was mined")]
    TransactionDroppedError,

    #[error("Transaction failed: {0:?}")]
    TransactionFailedError(H256),

    #[error("Invalid address: {0}")]
    InvalidAddressError(String),

    #[error("Invalid amount: {0}")]
    InvalidAmountError(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChainError(u64),

    #[error("Token not found: {0}")]
    TokenNotFoundError(String),

    #[error("No signer configured, set PRIVATE_KEY or use the local development chain")]
    MissingSignerError,

    #[error("Account not found: index {0}")]
    AccountNotFoundError(usize),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Artifact error: {0}")]
    ArtifactError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CustomError {
    /// Maps a contract call failure, keeping the revert reason when the node
    /// returned one.
    pub fn from_contract<M: Middleware>(err: ContractError<M>) -> Self {
        if let Some(reason) = err.decode_revert::<String>() {
            return CustomError::RevertedError(reason);
        }
        let message = err.to_string();
        // Some nodes report reverts from eth_estimateGas without revert data.
        if err.is_revert() || message.contains("revert") {
            return CustomError::RevertedError(message);
        }
        CustomError::ContractError(message)
    }
}

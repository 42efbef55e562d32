use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::contract::ContractFactory;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, JsonRpcClient, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TransactionReceipt, U256, U64};
use serde::Deserialize;

use crate::errors::CustomError;
use crate::models::transaction::{SwapOrder, TxOutcome};

use super::contracts::{ExactInputSingleParams, ISwapRouter, IERC20, IWETH9};

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// The on-chain calls the funding workflow is built from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractCalls: Send + Sync {
    /// Account that signs every state-changing call.
    fn account(&self) -> Address;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, CustomError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, CustomError>;

    /// Wraps `amount` of native currency by sending it to WETH's `deposit()`.
    async fn deposit(&self, weth: Address, amount: U256) -> Result<TxOutcome, CustomError>;

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxOutcome, CustomError>;

    async fn exact_input_single(
        &self,
        router: Address,
        order: SwapOrder,
    ) -> Result<TxOutcome, CustomError>;
}

/// Compiled contract in the Hardhat artifact layout.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    pub fn load(path: &Path) -> Result<Self, CustomError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CustomError::ArtifactError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let artifact: Artifact = serde_json::from_str(&contents).map_err(|e| {
            CustomError::ArtifactError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        if artifact.bytecode.is_empty() {
            return Err(CustomError::ArtifactError(format!(
                "{} has no creation bytecode",
                artifact.contract_name
            )));
        }
        Ok(artifact)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Deploying: Send + Sync {
    /// Deploys the artifact and returns the address of the new contract.
    async fn deploy(
        &self,
        artifact: &Artifact,
        constructor_args: Vec<Token>,
    ) -> Result<Address, CustomError>;
}

/// Signs and sends contract calls through an HTTP provider.
pub struct TransactionService {
    client: Arc<SignerClient>,
}

impl TransactionService {
    pub fn new(provider: Provider<Http>, wallet: LocalWallet) -> Self {
        log::debug!("signing with {:?}", wallet.address());
        Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
        }
    }
}

/// Waits for the transaction to be mined and checks its status.
async fn confirm<P: JsonRpcClient>(
    pending: PendingTransaction<'_, P>,
) -> Result<TxOutcome, CustomError> {
    receipt_outcome(pending.await?)
}

/// A missing receipt means the transaction left the mempool unmined.
fn receipt_outcome(receipt: Option<TransactionReceipt>) -> Result<TxOutcome, CustomError> {
    let receipt = receipt.ok_or(CustomError::TransactionDroppedError)?;
    if receipt.status == Some(U64::zero()) {
        return Err(CustomError::TransactionFailedError(receipt.transaction_hash));
    }
    Ok(TxOutcome::from(&receipt))
}

#[async_trait]
impl ContractCalls for TransactionService {
    fn account(&self) -> Address {
        self.client.address()
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, CustomError> {
        IERC20::new(token, self.client.clone())
            .balance_of(owner)
            .call()
            .await
            .map_err(CustomError::from_contract)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, CustomError> {
        IERC20::new(token, self.client.clone())
            .allowance(owner, spender)
            .call()
            .await
            .map_err(CustomError::from_contract)
    }

    async fn deposit(&self, weth: Address, amount: U256) -> Result<TxOutcome, CustomError> {
        let contract = IWETH9::new(weth, self.client.clone());
        let call = contract.deposit().value(amount);
        let pending = call.send().await.map_err(CustomError::from_contract)?;
        confirm(pending).await
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxOutcome, CustomError> {
        let contract = IERC20::new(token, self.client.clone());
        let call = contract.approve(spender, amount);
        let pending = call.send().await.map_err(CustomError::from_contract)?;
        confirm(pending).await
    }

    async fn exact_input_single(
        &self,
        router: Address,
        order: SwapOrder,
    ) -> Result<TxOutcome, CustomError> {
        let contract = ISwapRouter::new(router, self.client.clone());
        let call = contract.exact_input_single(ExactInputSingleParams {
            token_in: order.token_in,
            token_out: order.token_out,
            fee: order.fee,
            recipient: order.recipient,
            deadline: order.deadline,
            amount_in: order.amount_in,
            amount_out_minimum: order.amount_out_minimum,
            sqrt_price_limit_x96: order.sqrt_price_limit_x96,
        });
        let pending = call.send().await.map_err(CustomError::from_contract)?;
        confirm(pending).await
    }
}

#[async_trait]
impl Deploying for TransactionService {
    async fn deploy(
        &self,
        artifact: &Artifact,
        constructor_args: Vec<Token>,
    ) -> Result<Address, CustomError> {
        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            self.client.clone(),
        );
        let contract = factory
            .deploy_tokens(constructor_args)
            .map_err(CustomError::from_contract)?
            .send()
            .await
            .map_err(CustomError::from_contract)?;
        Ok(contract.address())
    }
}

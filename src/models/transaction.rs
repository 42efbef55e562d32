use chrono::{DateTime, Utc};
use ethers::types::{Address, TransactionReceipt, H256, U256};
use uuid::Uuid;

use super::{network_config::TokenInfo, token::TokenBalance};

/// Summary of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

impl From<&TransactionReceipt> for TxOutcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|block| block.as_u64()),
            gas_used: receipt.gas_used,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingStep {
    Deposit,
    Approve,
    Swap,
    ReadBalance,
}

impl std::fmt::Display for FundingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FundingStep::Deposit => "deposit",
            FundingStep::Approve => "approve",
            FundingStep::Swap => "swap",
            FundingStep::ReadBalance => "read balance",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    pub step: FundingStep,
    pub tx_hash: Option<H256>,
    pub completed_at: DateTime<Utc>,
}

/// Record of the steps a single funding sequence has completed. Nothing is
/// rolled back on failure, the record only tells what already happened
/// on chain.
#[derive(Clone, Debug)]
pub struct FundingRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed: Vec<StepRecord>,
}

impl FundingRun {
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed: Vec::new(),
        }
    }

    pub fn record(&mut self, step: FundingStep, tx_hash: Option<H256>) {
        self.completed.push(StepRecord {
            step,
            tx_hash,
            completed_at: Utc::now(),
        });
    }

    pub fn completed_steps(&self) -> Vec<FundingStep> {
        self.completed.iter().map(|record| record.step).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub token_out: TokenInfo,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
}

/// Full parameter set of a single-hop exact-input swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOrder {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub deadline: U256,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    pub sqrt_price_limit_x96: U256,
}

#[derive(Debug)]
pub struct FundingReport {
    pub run: FundingRun,
    pub token: TokenInfo,
    pub balance: TokenBalance,
}

use chrono::Utc;
use ethers::types::{Address, U256};

use crate::{
    errors::CustomError,
    models::{
        network_config::{NetworkConfig, TokenInfo},
        token::{format_units, TokenBalance},
        transaction::{FundingReport, FundingRun, FundingStep, SwapOrder, SwapRequest, TxOutcome},
    },
};

use super::transaction_service::ContractCalls;

/// Seconds a submitted swap stays valid by default.
pub const DEFAULT_SWAP_DEADLINE: u64 = 600;
/// Longest accepted swap validity, one day.
pub const MAX_SWAP_DEADLINE: u64 = 86_400;

/// Turns native currency into a stablecoin balance: deposit into WETH,
/// approve the router, swap, then read the resulting balance. Every step
/// waits for the previous one to be mined.
pub struct FundingService<C> {
    calls: C,
    network: NetworkConfig,
    swap_deadline: u64,
}

fn ensure_positive(amount: U256) -> Result<(), CustomError> {
    if amount.is_zero() {
        return Err(CustomError::InvalidAmountError("amount must be greater than zero".to_string()));
    }
    Ok(())
}

impl<C: ContractCalls> FundingService<C> {
    pub fn new(calls: C, network: NetworkConfig, swap_deadline: u64) -> Self {
        Self {
            calls,
            network,
            swap_deadline,
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn account(&self) -> Address {
        self.calls.account()
    }

    pub async fn deposit(&self, amount: U256) -> Result<TxOutcome, CustomError> {
        ensure_positive(amount)?;
        log::info!(
            "depositing {} {} into {}",
            format_units(amount, 18),
            self.network.symbol,
            self.network.weth.symbol
        );
        let outcome = self.calls.deposit(self.network.weth.address, amount).await?;
        log::debug!("deposit mined in {:?}", outcome.tx_hash);
        Ok(outcome)
    }

    pub async fn approve(&self, amount: U256) -> Result<TxOutcome, CustomError> {
        ensure_positive(amount)?;
        log::info!(
            "approving router {:?} for {} {}",
            self.network.swap_router,
            format_units(amount, self.network.weth.decimals),
            self.network.weth.symbol
        );
        let outcome = self
            .calls
            .approve(self.network.weth.address, self.network.swap_router, amount)
            .await?;
        log::debug!("approval mined in {:?}", outcome.tx_hash);
        Ok(outcome)
    }

    /// Remaining allowance of the router over the account's WETH.
    pub async fn allowance(&self) -> Result<U256, CustomError> {
        self.calls
            .allowance(
                self.network.weth.address,
                self.calls.account(),
                self.network.swap_router,
            )
            .await
    }

    pub async fn swap(&self, request: &SwapRequest) -> Result<TxOutcome, CustomError> {
        ensure_positive(request.amount_in)?;
        if request.amount_out_minimum.is_zero() {
            log::warn!("swapping without a minimum output, slippage is unbounded");
        }

        let order = SwapOrder {
            token_in: self.network.weth.address,
            token_out: request.token_out.address,
            fee: self.network.pool_fee,
            recipient: self.calls.account(),
            deadline: U256::from(Utc::now().timestamp().max(0) as u64)
                + U256::from(self.swap_deadline),
            amount_in: request.amount_in,
            amount_out_minimum: request.amount_out_minimum,
            sqrt_price_limit_x96: U256::zero(),
        };
        log::info!(
            "swapping {} {} for at least {} {}",
            format_units(order.amount_in, self.network.weth.decimals),
            self.network.weth.symbol,
            format_units(order.amount_out_minimum, request.token_out.decimals),
            request.token_out.symbol
        );
        let outcome = self
            .calls
            .exact_input_single(self.network.swap_router, order)
            .await?;
        log::debug!("swap mined in {:?}", outcome.tx_hash);
        Ok(outcome)
    }

    pub async fn read_balance(
        &self,
        token: &TokenInfo,
        owner: Address,
    ) -> Result<TokenBalance, CustomError> {
        let balance = self.calls.balance_of(token.address, owner).await?;
        Ok(TokenBalance::for_token(token, balance))
    }

    /// Deposit, then report the account's WETH balance.
    pub async fn fund_weth(&self, amount: U256) -> Result<TokenBalance, CustomError> {
        self.deposit(amount).await?;
        self.read_balance(&self.network.weth, self.calls.account())
            .await
    }

    /// Runs the whole deposit, approve, swap, read sequence. The first
    /// failing step ends the run and its error is returned as is; steps
    /// already mined are not undone.
    pub async fn fund_stablecoin(
        &self,
        request: SwapRequest,
    ) -> Result<FundingReport, CustomError> {
        ensure_positive(request.amount_in)?;
        let mut run = FundingRun::start();
        log::info!("funding run {} started", run.id);

        match self.run_steps(&mut run, &request).await {
            Ok(balance) => {
                log::info!("funding run {} finished", run.id);
                Ok(FundingReport {
                    run,
                    token: request.token_out,
                    balance,
                })
            }
            Err((step, err)) => {
                log::error!(
                    "funding run {} failed at {} after {:?}: {}",
                    run.id,
                    step,
                    run.completed_steps(),
                    err
                );
                Err(err)
            }
        }
    }

    async fn run_steps(
        &self,
        run: &mut FundingRun,
        request: &SwapRequest,
    ) -> Result<TokenBalance, (FundingStep, CustomError)> {
        let deposit = self
            .deposit(request.amount_in)
            .await
            .map_err(|e| (FundingStep::Deposit, e))?;
        run.record(FundingStep::Deposit, Some(deposit.tx_hash));

        let approval = self
            .approve(request.amount_in)
            .await
            .map_err(|e| (FundingStep::Approve, e))?;
        run.record(FundingStep::Approve, Some(approval.tx_hash));

        let swap = self
            .swap(request)
            .await
            .map_err(|e| (FundingStep::Swap, e))?;
        run.record(FundingStep::Swap, Some(swap.tx_hash));

        let balance = self
            .read_balance(&request.token_out, self.calls.account())
            .await
            .map_err(|e| (FundingStep::ReadBalance, e))?;
        run.record(FundingStep::ReadBalance, None);

        Ok(balance)
    }
}

use ethers::types::{Address, U256};

use crate::{
    cli::SwapArgs,
    errors::CustomError,
    models::{
        network_config::{NetworkConfig, TokenInfo},
        network_status::NetworkStatus,
        token::{parse_units, TokenBalance},
        transaction::{FundingReport, SwapRequest},
    },
    services::{
        blockchain_service::BlockchainClient,
        funding_service::FundingService,
        transaction_service::ContractCalls,
        wallet_service::WalletService,
    },
};

/// Parses a whole-unit decimal amount into the token's raw units.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, CustomError> {
    parse_units(amount, decimals).ok_or_else(|| CustomError::InvalidAmountError(amount.to_string()))
}

/// Resolves the stablecoin a swap should pay out.
pub fn stablecoin(network: &NetworkConfig, symbol: &str) -> Result<TokenInfo, CustomError> {
    network
        .stablecoins()
        .into_iter()
        .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
        .cloned()
        .ok_or_else(|| CustomError::TokenNotFoundError(symbol.to_string()))
}

pub fn swap_request(network: &NetworkConfig, args: &SwapArgs) -> Result<SwapRequest, CustomError> {
    let amount_in = parse_amount(&args.amount, network.weth.decimals)?;
    let min_out = args.min_out.trim();
    if min_out.is_empty() {
        return Err(CustomError::InvalidAmountError(args.min_out.clone()));
    }
    let amount_out_minimum = U256::from_dec_str(min_out)
        .map_err(|_| CustomError::InvalidAmountError(args.min_out.clone()))?;
    Ok(SwapRequest {
        token_out: stablecoin(network, &args.token)?,
        amount_in,
        amount_out_minimum,
    })
}

pub fn accounts(wallets: &WalletService) -> Vec<Address> {
    let accounts = wallets.accounts();
    for (index, account) in accounts.iter().enumerate() {
        println!("{index}: {account:?}");
    }
    accounts
}

pub async fn network_status(client: &BlockchainClient) -> Result<NetworkStatus, CustomError> {
    let status = client.get_network_status().await?;
    println!("{} (chain {})", status.name, status.chain_id);
    println!("latest block: {}", status.latest_block);
    println!("gas price: {} wei", status.gas_price);
    println!("native currency: {}", status.symbol);
    if let Some(explorer) = &status.block_explorer {
        println!("explorer: {explorer}");
    }
    Ok(status)
}

pub async fn balance(
    client: &BlockchainClient,
    account: Address,
    token: Option<&str>,
) -> Result<Vec<TokenBalance>, CustomError> {
    let network = client.config();
    let balances = match token {
        Some(token) => {
            let token_address = match token.parse::<Address>() {
                Ok(address) => address,
                Err(_) => {
                    network
                        .token(token)
                        .ok_or_else(|| CustomError::TokenNotFoundError(token.to_string()))?
                        .address
                }
            };
            vec![client.get_token_balance(token_address, account).await?]
        }
        None => {
            let tokens = network
                .tokens()
                .iter()
                .map(|token| token.address)
                .collect::<Vec<_>>();
            client.get_multiple_token_balances(&tokens, account).await?
        }
    };

    println!("balances of {account:?}");
    for balance in &balances {
        println!("  {balance}");
    }
    Ok(balances)
}

pub async fn fund_weth<C: ContractCalls>(
    service: &FundingService<C>,
    amount: &str,
) -> Result<TokenBalance, CustomError> {
    let amount = parse_amount(amount, service.network().weth.decimals)?;
    let balance = service.fund_weth(amount).await?;
    println!("{:?} now holds {}", service.account(), balance);
    Ok(balance)
}

pub async fn approve<C: ContractCalls>(
    service: &FundingService<C>,
    amount: &str,
) -> Result<U256, CustomError> {
    let amount = parse_amount(amount, service.network().weth.decimals)?;
    let outcome = service.approve(amount).await?;
    let allowance = service.allowance().await?;
    println!(
        "router {:?} may spend {} raw {} ({:?})",
        service.network().swap_router,
        allowance,
        service.network().weth.symbol,
        outcome.tx_hash
    );
    Ok(allowance)
}

pub async fn fund_stablecoin<C: ContractCalls>(
    service: &FundingService<C>,
    args: &SwapArgs,
) -> Result<FundingReport, CustomError> {
    let request = swap_request(service.network(), args)?;
    let report = service.fund_stablecoin(request).await?;

    println!(
        "funding run {} into {} started at {}",
        report.run.id,
        report.token.symbol,
        report.run.started_at.to_rfc3339()
    );
    for record in &report.run.completed {
        let at = record.completed_at.format("%H:%M:%S");
        match record.tx_hash {
            Some(hash) => println!("  {} {}: {:?}", at, record.step, hash),
            None => println!("  {} {}", at, record.step),
        }
    }
    println!("{:?} now holds {}", service.account(), report.balance);
    Ok(report)
}

pub async fn swap<C: ContractCalls>(
    service: &FundingService<C>,
    args: &SwapArgs,
) -> Result<TokenBalance, CustomError> {
    let request = swap_request(service.network(), args)?;
    let outcome = service.swap(&request).await?;
    if let Some(block) = outcome.block_number {
        log::debug!("swap included in block {block}");
    }
    if let Some(gas) = outcome.gas_used {
        log::debug!("swap used {gas} gas");
    }
    let balance = service
        .read_balance(&request.token_out, service.account())
        .await?;
    println!("{:?} now holds {}", service.account(), balance);
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::transaction::TxOutcome,
        services::{
            funding_service::DEFAULT_SWAP_DEADLINE,
            network_config::{get_network_config, LOCAL_CHAIN_ID},
            transaction_service::MockContractCalls,
        },
    };
    use ethers::types::H256;
    use mockall::predicate::eq;

    fn network() -> NetworkConfig {
        get_network_config(LOCAL_CHAIN_ID).unwrap()
    }

    fn args(token: &str, amount: &str, min_out: &str) -> SwapArgs {
        SwapArgs {
            token: token.to_string(),
            amount: amount.to_string(),
            min_out: min_out.to_string(),
        }
    }

    #[test]
    fn builds_swap_request_from_arguments() {
        let request = swap_request(&network(), &args("USDT", "0.25", "100")).unwrap();
        assert_eq!(request.token_out.symbol, "USDT");
        assert_eq!(request.amount_in, U256::exp10(18) / U256::from(4u64));
        assert_eq!(request.amount_out_minimum, U256::from(100u64));
    }

    #[test]
    fn only_stablecoins_can_be_swapped_into() {
        assert!(matches!(
            swap_request(&network(), &args("weth", "1", "1")),
            Err(CustomError::TokenNotFoundError(_))
        ));
        assert!(matches!(
            swap_request(&network(), &args("dai", "1", "1")),
            Err(CustomError::TokenNotFoundError(_))
        ));
    }

    #[test]
    fn malformed_amounts_are_invalid() {
        assert!(matches!(
            swap_request(&network(), &args("usdc", "one", "1")),
            Err(CustomError::InvalidAmountError(_))
        ));
        assert!(matches!(
            swap_request(&network(), &args("usdc", "1", "0.5")),
            Err(CustomError::InvalidAmountError(_))
        ));
        assert!(matches!(
            swap_request(&network(), &args("usdc", "1", "")),
            Err(CustomError::InvalidAmountError(_))
        ));
        assert!(matches!(
            swap_request(&network(), &args("usdc", "1", "  ")),
            Err(CustomError::InvalidAmountError(_))
        ));
    }

    #[tokio::test]
    async fn fund_weth_deposits_whole_units() {
        let network = network();
        let weth = network.weth.address;
        let mut calls = MockContractCalls::new();
        calls.expect_account().return_const(Address::repeat_byte(1));
        calls
            .expect_deposit()
            .times(1)
            .with(eq(weth), eq(U256::exp10(18) * U256::from(2u64)))
            .returning(|_, _| {
                Ok(TxOutcome {
                    tx_hash: H256::repeat_byte(2),
                    block_number: Some(1),
                    gas_used: None,
                })
            });
        calls
            .expect_balance_of()
            .times(1)
            .with(eq(weth), eq(Address::repeat_byte(1)))
            .returning(|_, _| Ok(U256::exp10(18) * U256::from(2u64)));

        let service = FundingService::new(calls, network, DEFAULT_SWAP_DEADLINE);
        let balance = fund_weth(&service, "2").await.unwrap();
        assert_eq!(balance.formatted_balance, "2");
    }

    #[tokio::test]
    async fn swap_reverts_pass_through_unchanged() {
        let mut calls = MockContractCalls::new();
        calls.expect_account().return_const(Address::repeat_byte(1));
        calls
            .expect_exact_input_single()
            .times(1)
            .returning(|_, _| Err(CustomError::RevertedError("STF".to_string())));
        calls.expect_balance_of().never();

        let service = FundingService::new(calls, network(), DEFAULT_SWAP_DEADLINE);
        let result = swap(&service, &args("usdc", "1", "1")).await;
        assert!(matches!(result, Err(CustomError::RevertedError(reason)) if reason == "STF"));
    }
}

use ethers::signers::Signer;

use crate::{
    cli::{Cli, Command},
    config::Config,
    errors::CustomError,
    services::{
        blockchain_service::BlockchainClient, funding_service::FundingService,
        transaction_service::TransactionService, wallet_service::WalletService,
    },
};

mod deploy_handlers;
mod handlers;

fn wallets(config: &Config) -> Result<WalletService, CustomError> {
    WalletService::new(config.private_key.as_deref(), config.network.chain_id)
}

/// Connects and binds the selected signing account to the network.
async fn transactions(config: &Config) -> Result<TransactionService, CustomError> {
    let client = BlockchainClient::new(config.network.clone()).await?;
    let wallet = wallets(config)?.signer(config.account_index)?;
    Ok(TransactionService::new((*client.provider()).clone(), wallet))
}

async fn funding(config: &Config) -> Result<FundingService<TransactionService>, CustomError> {
    Ok(FundingService::new(
        transactions(config).await?,
        config.network.clone(),
        config.swap_deadline,
    ))
}

/// Runs one task. Every dependency a task needs is built here and handed to
/// it explicitly.
pub async fn run(cli: Cli) -> Result<(), CustomError> {
    let config = Config::from_args(&cli.connection)?;
    log::info!(
        "using {} (chain {}) at {}",
        config.network.name,
        config.network.chain_id,
        config.network.rpc_url
    );

    match cli.command {
        Command::Accounts => {
            handlers::accounts(&wallets(&config)?);
        }
        Command::Network => {
            let client = BlockchainClient::new(config.network.clone()).await?;
            handlers::network_status(&client).await?;
        }
        Command::Balance { account, token } => {
            let account = match account {
                Some(account) => account,
                None => wallets(&config)?.signer(config.account_index)?.address(),
            };
            let client = BlockchainClient::new(config.network.clone()).await?;
            handlers::balance(&client, account, token.as_deref()).await?;
        }
        Command::FundWeth { amount } => {
            handlers::fund_weth(&funding(&config).await?, &amount).await?;
        }
        Command::Approve { amount } => {
            handlers::approve(&funding(&config).await?, &amount).await?;
        }
        Command::FundStablecoin(args) => {
            handlers::fund_stablecoin(&funding(&config).await?, &args).await?;
        }
        Command::Swap(args) => {
            handlers::swap(&funding(&config).await?, &args).await?;
        }
        Command::Deploy { artifact, router } => {
            let deployer = transactions(&config).await?;
            deploy_handlers::deploy(&deployer, &config.network, &artifact, router).await?;
        }
    }

    Ok(())
}

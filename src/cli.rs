use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ethers::types::Address;

use crate::services::{funding_service::DEFAULT_SWAP_DEADLINE, network_config::LOCAL_CHAIN_ID};

/// Development tasks around WETH funding and swaps.
#[derive(Debug, Parser)]
#[clap(name = "weth-swap-harness", version)]
pub struct Cli {
    #[clap(flatten)]
    pub connection: ConnectionArgs,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Chain id of the network to talk to.
    #[clap(long, env, default_value_t = LOCAL_CHAIN_ID, global = true)]
    pub chain_id: u64,

    /// Overrides the RPC endpoint of the selected network.
    #[clap(long, env, global = true)]
    pub rpc_url: Option<String>,

    /// Key of the signing account. Without it the development accounts are
    /// used on the local chain.
    #[clap(long, env, hide_env_values = true, global = true)]
    pub private_key: Option<String>,

    /// Index of the signing account among the available accounts.
    #[clap(long, env, default_value_t = 0, global = true)]
    pub account_index: usize,

    /// JSON file with additional or overriding network definitions.
    #[clap(long, env = "NETWORKS_FILE", global = true)]
    pub networks: Option<PathBuf>,

    /// Seconds a submitted swap stays valid.
    #[clap(long, env, default_value_t = DEFAULT_SWAP_DEADLINE, global = true)]
    pub swap_deadline: u64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print native and token balances of an account.
    Balance {
        /// Account to inspect, defaults to the signing account.
        #[clap(long, value_parser = parse_address)]
        account: Option<Address>,

        /// Only print this token, by symbol or address.
        #[clap(long)]
        token: Option<String>,
    },
    /// List the available local accounts.
    Accounts,
    /// Print the status of the selected network.
    Network,
    /// Wrap native currency into WETH.
    FundWeth {
        #[clap(long, default_value = "1")]
        amount: String,
    },
    /// Approve the swap router to spend WETH.
    Approve {
        #[clap(long, default_value = "1")]
        amount: String,
    },
    /// Deposit, approve and swap WETH into a stablecoin.
    FundStablecoin(SwapArgs),
    /// Swap already approved WETH into a stablecoin.
    Swap(SwapArgs),
    /// Deploy the swap contract from a compiled artifact.
    Deploy {
        /// Path of the Hardhat artifact JSON.
        #[clap(long)]
        artifact: PathBuf,

        /// Router passed to the constructor, defaults to the network's router.
        #[clap(long, value_parser = parse_address)]
        router: Option<Address>,
    },
}

#[derive(Debug, Args)]
pub struct SwapArgs {
    /// Stablecoin to receive.
    #[clap(long, default_value = "usdc")]
    pub token: String,

    /// WETH to swap, in whole units.
    #[clap(long, default_value = "1")]
    pub amount: String,

    /// Minimum output in the stablecoin's smallest unit.
    #[clap(long, default_value = "1")]
    pub min_out: String,
}

fn parse_address(value: &str) -> Result<Address, String> {
    value
        .parse::<Address>()
        .map_err(|_| format!("invalid address: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_one_unit_on_local_chain() {
        let cli = Cli::try_parse_from(["weth-swap-harness", "fund-stablecoin"]).unwrap();
        assert_eq!(cli.connection.chain_id, LOCAL_CHAIN_ID);
        assert_eq!(cli.connection.account_index, 0);
        assert_eq!(cli.connection.swap_deadline, DEFAULT_SWAP_DEADLINE);
        match cli.command {
            Command::FundStablecoin(args) => {
                assert_eq!(args.token, "usdc");
                assert_eq!(args.amount, "1");
                assert_eq!(args.min_out, "1");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "weth-swap-harness",
            "swap",
            "--token",
            "usdt",
            "--amount",
            "0.5",
            "--chain-id",
            "1",
            "--account-index",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.connection.chain_id, 1);
        assert_eq!(cli.connection.account_index, 2);
        assert!(matches!(cli.command, Command::Swap(SwapArgs { ref token, ref amount, .. }) if token == "usdt" && amount == "0.5"));
    }

    #[test]
    fn parses_deploy_router() {
        let cli = Cli::try_parse_from([
            "weth-swap-harness",
            "deploy",
            "--artifact",
            "artifacts/ExampleSwap.json",
            "--router",
            "0x426B751AbA5f49914bFbD4A1E45aEE099d757733",
        ])
        .unwrap();
        match cli.command {
            Command::Deploy { artifact, router } => {
                assert_eq!(artifact, PathBuf::from("artifacts/ExampleSwap.json"));
                assert!(router.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_account() {
        assert!(Cli::try_parse_from(["weth-swap-harness", "balance", "--account", "0x12"]).is_err());
    }
}

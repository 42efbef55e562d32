use crate::{
    cli::ConnectionArgs,
    errors::CustomError,
    models::network_config::NetworkConfig,
    services::{funding_service::MAX_SWAP_DEADLINE, network_config::NetworkRegistry},
};

/// Everything a task needs to reach the chain, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub network: NetworkConfig,
    pub private_key: Option<String>,
    pub account_index: usize,
    pub swap_deadline: u64,
}

impl Config {
    pub fn from_args(args: &ConnectionArgs) -> Result<Self, CustomError> {
        let registry = match &args.networks {
            Some(path) => NetworkRegistry::load(path)?,
            None => NetworkRegistry::builtin()?,
        };

        let mut network = registry.get(args.chain_id)?;
        if let Some(rpc_url) = &args.rpc_url {
            network.rpc_url = rpc_url.clone();
        }

        if args.swap_deadline == 0 || args.swap_deadline > MAX_SWAP_DEADLINE {
            return Err(CustomError::ConfigError(format!(
                "swap deadline must be between 1 and {} seconds",
                MAX_SWAP_DEADLINE
            )));
        }

        Ok(Self {
            network,
            private_key: args.private_key.clone().filter(|key| !key.is_empty()),
            account_index: args.account_index,
            swap_deadline: args.swap_deadline,
        })
    }
}

use std::path::Path;

use ethers::{abi::Token, types::Address};

use crate::{
    errors::CustomError,
    models::network_config::NetworkConfig,
    services::transaction_service::{Artifact, Deploying},
};

/// Deploys the swap contract, whose constructor takes the router it trades
/// through.
pub async fn deploy<D: Deploying>(
    deployer: &D,
    network: &NetworkConfig,
    artifact_path: &Path,
    router: Option<Address>,
) -> Result<Address, CustomError> {
    let artifact = Artifact::load(artifact_path)?;
    let router = router.unwrap_or(network.swap_router);
    log::info!(
        "deploying {} to {} with router {:?}",
        artifact.contract_name,
        network.name,
        router
    );

    let address = deployer
        .deploy(&artifact, vec![Token::Address(router)])
        .await?;

    println!("{} deployed to {:?}", artifact.contract_name, address);
    if let Some(explorer) = &network.block_explorer {
        println!("{}/address/{:?}", explorer.trim_end_matches('/'), address);
    }
    Ok(address)
}

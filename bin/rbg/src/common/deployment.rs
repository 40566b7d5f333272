//! Lookup of deployed contract addresses in a hardhat-deploy style `deployments/` directory.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use rng_game::constants::GAME_CONTRACT_NAME;
use serde::Deserialize;
use tracing::debug;

use super::{RbgError, Result};

/// The part of a deployment record the client reads.
#[derive(Debug, Deserialize)]
struct Deployment {
    address: Address,
}

/// Path of the game contract's deployment record for `network`.
pub fn deployment_path(deployments: &Path, network: &str) -> PathBuf {
    deployments.join(network).join(format!("{GAME_CONTRACT_NAME}.json"))
}

/// Reads the game contract address recorded for `network`.
pub fn load_game_address(deployments: &Path, network: &str) -> Result<Address> {
    let path = deployment_path(deployments, network);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(RbgError::DeploymentNotFound { network: network.to_string(), path })
        }
        Err(e) => return Err(e.into()),
    };
    let deployment: Deployment = serde_json::from_str(&content)
        .map_err(|e| RbgError::InvalidDeployment { path: path.clone(), reason: e.to_string() })?;
    debug!(address = %deployment.address, path = %path.display(), "Loaded deployment");
    Ok(deployment.address)
}

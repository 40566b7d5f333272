//! Client library for the `RngBinaryGame` guessing contract.
//!
//! The crate is split along the path a guess takes to the chain:
//! - [`tx`] turns a partially specified [`TxRequest`] into a wire-ready transaction and submits it
//!   either through a raw `eth_sendTransaction` call or through the signer's standard path.
//! - [`node`] is the seam to the remote node ([`Node`]), with an alloy-backed implementation.
//! - [`game`] wraps the contract ABI and drives a game session to completion.
//! - [`faucet`] funds the player before a game starts.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod error;
pub use error::*;

pub mod ens;

pub mod faucet;

pub mod game;

mod identity;
pub use identity::*;

pub mod node;
pub use node::{AlloyNode, Node, NodeError, NodeResult};

pub mod tx;
pub use tx::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! Read-side toolkit for the gauge rewards injector contract pattern.
//!
//! The injector is a keeper contract that tops up gauge reward schedules on a
//! weekly cadence. This crate covers everything needed to inspect one from
//! off-chain: the per-network endpoint tables, the contract read interfaces,
//! a minimal `eth_call` client, the address-book directory of deployed
//! injectors, pure schedule projection math, and the batch-transaction
//! document used to stage recipient-list updates.

pub mod contracts;
pub mod directory;
pub mod networks;
pub mod payload;
pub mod reader;
pub mod rpc;
pub mod schedule;

pub use networks::{NetworkDescriptor, NetworkError};
pub use reader::{InjectorReader, ReadError, RecipientInfo, TokenBalance};
pub use rpc::{RpcClient, RpcError};

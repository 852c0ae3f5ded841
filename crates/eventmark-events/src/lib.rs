//! Validated ERC-20 transfer event records, their 32-byte leaf commitments,
//! and retrieval of the raw logs from an ethereum node.
//!
//! The pipeline runs in two stages: [`get_transfer_logs`] pulls the raw
//! `Transfer` logs for a contract and block range through any
//! [`ethers::providers::Middleware`], and [`EventRecord`] validates each log
//! and encodes it into the fixed-width leaf that
//! [`eventmark_merkle::Tree`] commits to.
//!
//! Both stages use the same keccak-256 as the tree itself, so a leaf encoded
//! here verifies against a root built there.
mod fetch;
mod record;

pub use fetch::{
    get_transfer_logs,
    transfer_topic0,
    GetLogsError,
};
pub use record::{
    encode_leaves,
    EventRecord,
    InvalidRecord,
};

use ethers::types::{
    Log,
    U256,
};
use eventmark_merkle::hash;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InvalidRecord(InvalidRecordKind);

impl InvalidRecord {
    fn missing_transaction_hash() -> Self {
        Self(InvalidRecordKind::MissingTransactionHash)
    }

    fn missing_log_index() -> Self {
        Self(InvalidRecordKind::MissingLogIndex)
    }

    fn log_index_overflow(log_index: U256) -> Self {
        Self(InvalidRecordKind::LogIndexOverflow {
            log_index,
        })
    }

    fn missing_topic0() -> Self {
        Self(InvalidRecordKind::MissingTopic0)
    }
}

#[derive(Debug, thiserror::Error)]
enum InvalidRecordKind {
    #[error("log carried no transaction hash; was it still pending?")]
    MissingTransactionHash,
    #[error("log carried no log index; was it still pending?")]
    MissingLogIndex,
    #[error("log index `{log_index}` does not fit into 8 bytes")]
    LogIndexOverflow { log_index: U256 },
    #[error("log carried no topics; expected the event signature at topic position 0")]
    MissingTopic0,
}

/// The validated form of one observed event log.
///
/// The 32-byte fields are fixed-width by construction, so a wrong-length
/// hash cannot reach the leaf encoder. Converting a raw [`Log`] is the
/// fallible path; see the `TryFrom` impl.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    transaction_hash: [u8; 32],
    log_index: u64,
    topic0: [u8; 32],
    data: Vec<u8>,
}

impl EventRecord {
    #[must_use]
    pub fn new(
        transaction_hash: [u8; 32],
        log_index: u64,
        topic0: [u8; 32],
        data: Vec<u8>,
    ) -> Self {
        Self {
            transaction_hash,
            log_index,
            topic0,
            data,
        }
    }

    #[must_use]
    pub fn transaction_hash(&self) -> &[u8; 32] {
        &self.transaction_hash
    }

    #[must_use]
    pub fn log_index(&self) -> u64 {
        self.log_index
    }

    #[must_use]
    pub fn topic0(&self) -> &[u8; 32] {
        &self.topic0
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encodes the record as its 32-byte leaf commitment.
    ///
    /// The preimage is the fixed 104-byte buffer
    /// `transaction_hash(32) || log_index_be(8) || topic0(32) || keccak(data)(32)`;
    /// the variable-length data payload enters through its hash, never raw,
    /// so every record commits through the same layout regardless of data
    /// size. Empty data hashes like any other byte string.
    ///
    /// Pure and deterministic: the same record always encodes to the same
    /// leaf, and any field change produces a different one.
    #[must_use]
    pub fn encode_leaf(&self) -> [u8; 32] {
        let mut payload = [0u8; 104];
        payload[..32].copy_from_slice(&self.transaction_hash);
        payload[32..40].copy_from_slice(&self.log_index.to_be_bytes());
        payload[40..72].copy_from_slice(&self.topic0);
        payload[72..].copy_from_slice(&hash(&self.data));
        hash(&payload)
    }
}

impl TryFrom<&Log> for EventRecord {
    type Error = InvalidRecord;

    fn try_from(log: &Log) -> Result<Self, Self::Error> {
        let transaction_hash = log
            .transaction_hash
            .ok_or_else(InvalidRecord::missing_transaction_hash)?;
        let log_index = log.log_index.ok_or_else(InvalidRecord::missing_log_index)?;
        if log_index > U256::from(u64::MAX) {
            return Err(InvalidRecord::log_index_overflow(log_index));
        }
        let topic0 = log
            .topics
            .first()
            .ok_or_else(InvalidRecord::missing_topic0)?;
        Ok(Self {
            transaction_hash: transaction_hash.to_fixed_bytes(),
            log_index: log_index.as_u64(),
            topic0: topic0.to_fixed_bytes(),
            data: log.data.to_vec(),
        })
    }
}

/// Encodes a sequence of records into the leaf sequence a tree is built
/// over, preserving order.
#[must_use]
pub fn encode_leaves(records: &[EventRecord]) -> Vec<[u8; 32]> {
    records.iter().map(EventRecord::encode_leaf).collect()
}

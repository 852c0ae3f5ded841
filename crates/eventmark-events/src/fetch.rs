use ethers::{
    providers::Middleware,
    types::{
        Address,
        Filter,
        Log,
        H256,
    },
    utils::keccak256,
};

const TRANSFER_SIGNATURE: &str = "Transfer(address,address,uint256)";

/// Returns the topic0 of the ERC-20 `Transfer(address,address,uint256)`
/// event, the keccak-256 of its canonical signature.
#[must_use]
pub fn transfer_topic0() -> H256 {
    H256(keccak256(TRANSFER_SIGNATURE.as_bytes()))
}

#[derive(Debug, thiserror::Error)]
#[error("failed getting the eth logs for `{signature}` events")]
pub struct GetLogsError {
    signature: &'static str,
    // use a trait object instead of the error to not force the middleware
    // type parameter into the error.
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

/// Fetches all `Transfer` logs emitted by `token` in the inclusive block
/// range `from_block..=to_block`, ordered as the node returns them.
///
/// The provider is supplied by the caller; this function takes no position
/// on endpoints, retries, or pagination.
///
/// # Errors
/// Returns an error if the `eth_getLogs` request fails.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(provider), err))]
pub async fn get_transfer_logs<M>(
    provider: &M,
    token: Address,
    from_block: u64,
    to_block: u64,
) -> Result<Vec<Log>, GetLogsError>
where
    M: Middleware,
    M::Error: std::error::Error + 'static,
{
    let filter = Filter::new()
        .address(token)
        .topic0(transfer_topic0())
        .from_block(from_block)
        .to_block(to_block);
    provider
        .get_logs(&filter)
        .await
        .map_err(|err| GetLogsError {
            signature: TRANSFER_SIGNATURE,
            source: err.into(),
        })
}

#[cfg(test)]
mod tests {
    use ethers::types::H256;
    use hex_literal::hex;

    use super::transfer_topic0;

    #[test]
    fn transfer_topic0_matches_the_canonical_erc20_value() {
        assert_eq!(
            H256(hex!(
                "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
            )),
            transfer_topic0(),
        );
    }
}

use std::{
    borrow::Cow,
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        Instant,
    },
};

use color_eyre::eyre::{
    self,
    ensure,
    WrapErr as _,
};
use ethers::{
    providers::{
        Http,
        Middleware as _,
        Provider,
        ProviderError,
    },
    types::Address,
};
use eventmark_events::{
    encode_leaves,
    get_transfer_logs,
    EventRecord,
};
use eventmark_merkle::{
    Proof,
    Tree,
};
use tracing::{
    info,
    instrument,
    warn,
};

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// The ERC-20 token contract whose transfer events are committed to.
    token: Address,
    /// The first block of the inclusive range to scan.
    #[arg(long)]
    from_block: u64,
    /// The last block of the inclusive range to scan.
    #[arg(long)]
    to_block: u64,
    /// The event index to derive and verify an inclusion proof for.
    #[arg(long, default_value_t = 0)]
    index: usize,
    /// The http json-rpc endpoint of an ethereum node.
    #[arg(long, env = "EVENTMARK_RPC_ENDPOINT")]
    rpc_endpoint: String,
    /// The path to write the derived proof to as JSON.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Overwrites <OUTPUT> if it exists.
    #[arg(long, short)]
    force: bool,
}

impl Args {
    pub(crate) async fn run(self) -> eyre::Result<()> {
        let Self {
            token,
            from_block,
            to_block,
            index,
            rpc_endpoint,
            output,
            force,
        } = self;
        ensure!(
            to_block >= from_block,
            "--to-block must be at least --from-block",
        );

        let output = output
            .map(|path| open_output(&path, force))
            .transpose()
            .wrap_err("failed to open output for writing")?;

        let started = Instant::now();
        let (provider, chain_id) = connect_to_node(&rpc_endpoint)
            .await
            .wrap_err("failed to connect to ethereum node")?;
        info!(
            chain_id,
            network = %network_name(chain_id),
            "connected to ethereum node",
        );

        let fetch_started = Instant::now();
        let logs = get_transfer_logs(&provider, token, from_block, to_block)
            .await
            .wrap_err("failed fetching transfer logs")?;
        info!(
            events = logs.len(),
            elapsed = %humantime::format_duration(fetch_started.elapsed()),
            "fetched transfer logs",
        );

        if logs.is_empty() {
            info!("no transfer events found in the provided range; nothing to commit to");
            return Ok(());
        }

        let records = logs
            .iter()
            .map(EventRecord::try_from)
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("failed converting a fetched log to an event record")?;
        let tree = Tree::from_leaves(encode_leaves(&records))
            .wrap_err("failed constructing the merkle tree")?;
        let root = tree.root();
        let proof = tree
            .construct_proof(index)
            .wrap_err("failed deriving an inclusion proof for --index")?;
        let leaf = tree.leaves()[index];

        println!("merkle root: {}", display_hex(&root));
        println!("proof target index: {index}");
        println!("proof steps ({}):", proof.len());
        for (depth, step) in proof.iter().enumerate() {
            println!(
                "  level {depth}: sibling={} position={}",
                display_hex(step.sibling()),
                step.position(),
            );
        }

        ensure!(
            proof.verify(leaf, root),
            "derived proof failed verification against its own root",
        );
        println!("inclusion verified against root");

        if let Some(output) = output {
            write_proof(&proof, output).wrap_err("failed to write proof to file")?;
        }

        info!(
            elapsed = %humantime::format_duration(started.elapsed()),
            "commitment complete",
        );
        Ok(())
    }
}

/// Probes the node at `rpc_endpoint` and returns the provider together with
/// the chain id it reported.
#[instrument(err)]
async fn connect_to_node(rpc_endpoint: &str) -> eyre::Result<(Provider<Http>, u64)> {
    let provider = Provider::<Http>::try_from(rpc_endpoint)
        .wrap_err("failed parsing the rpc endpoint as a url")?;

    let retry_config = tryhard::RetryFutureConfig::new(5)
        .fixed_backoff(Duration::from_secs(2))
        .on_retry(
            |attempt, next_delay: Option<Duration>, error: &ProviderError| {
                let wait_duration = next_delay
                    .map(humantime::format_duration)
                    .map(tracing::field::display);
                warn!(
                    attempt,
                    wait_duration,
                    error = error as &dyn std::error::Error,
                    "attempt to reach the ethereum node failed; retrying after backoff",
                );
                std::future::ready(())
            },
        );

    let chain_id = tryhard::retry_fn(|| provider.get_chainid())
        .with_config(retry_config)
        .await
        .wrap_err("failed to reach the ethereum node after several retries; giving up")?;
    Ok((provider, chain_id.as_u64()))
}

fn network_name(chain_id: u64) -> Cow<'static, str> {
    match chain_id {
        1 => Cow::Borrowed("Ethereum Mainnet"),
        10 => Cow::Borrowed("Optimism"),
        137 => Cow::Borrowed("Polygon"),
        42161 => Cow::Borrowed("Arbitrum One"),
        11155111 => Cow::Borrowed("Sepolia Testnet"),
        other => Cow::Owned(format!("unknown network (chain id {other})")),
    }
}

fn display_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[derive(Debug)]
struct Output {
    handle: std::fs::File,
    path: PathBuf,
}

#[instrument(skip(target), fields(target = %target.as_ref().display()), err)]
fn open_output<P: AsRef<Path>>(target: P, overwrite: bool) -> eyre::Result<Output> {
    let handle = if overwrite {
        let mut options = std::fs::File::options();
        options.write(true).create(true).truncate(true);
        options
    } else {
        let mut options = std::fs::File::options();
        options.write(true).create_new(true);
        options
    }
    .open(&target)
    .wrap_err("failed to open specified file for writing")?;
    Ok(Output {
        handle,
        path: target.as_ref().to_path_buf(),
    })
}

#[instrument(skip_all, fields(target = %output.path.display()), err)]
fn write_proof(proof: &Proof, output: Output) -> eyre::Result<()> {
    let writer = std::io::BufWriter::new(output.handle);
    serde_json::to_writer(writer, proof).wrap_err("failed writing proof to file")
}

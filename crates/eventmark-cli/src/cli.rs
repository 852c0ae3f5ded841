use clap::{
    Parser,
    Subcommand,
};
use color_eyre::eyre;

use crate::{
    commit,
    verify,
};

/// Build and verify merkle commitments over ERC-20 transfer events.
#[derive(Debug, Parser)]
#[command(name = "eventmark", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub(crate) async fn run(self) -> eyre::Result<()> {
        match self.command {
            Command::Commit(args) => args.run().await,
            Command::Verify(args) => args.run(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the transfer events of a token for a block range and commit to
    /// them, printing the merkle root and an inclusion proof
    #[command(arg_required_else_help = true)]
    Commit(commit::Args),

    /// Check a previously derived inclusion proof against a leaf and a root,
    /// without talking to a node
    #[command(arg_required_else_help = true)]
    Verify(verify::Args),
}

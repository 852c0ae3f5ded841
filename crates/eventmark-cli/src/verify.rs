use std::path::PathBuf;

use color_eyre::eyre::{
    self,
    bail,
    WrapErr as _,
};
use eventmark_merkle::Proof;
use hex::FromHex as _;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// The 32-byte leaf commitment as hex, with or without a 0x prefix.
    #[arg(long)]
    leaf: String,
    /// The 32-byte merkle root as hex, with or without a 0x prefix.
    #[arg(long)]
    root: String,
    /// The path of a proof JSON file written by `commit --output`.
    #[arg(long)]
    proof: PathBuf,
}

impl Args {
    pub(crate) fn run(self) -> eyre::Result<()> {
        let leaf = parse_hex32(&self.leaf).wrap_err("failed parsing --leaf")?;
        let root = parse_hex32(&self.root).wrap_err("failed parsing --root")?;

        let file = std::fs::File::open(&self.proof).wrap_err("failed opening the proof file")?;
        let proof: Proof = serde_json::from_reader(std::io::BufReader::new(file))
            .wrap_err("failed parsing the proof file as JSON")?;

        if proof.verify(leaf, root) {
            println!("inclusion verified against root");
            Ok(())
        } else {
            bail!("the proof does not place the leaf under the provided root");
        }
    }
}

fn parse_hex32(input: &str) -> eyre::Result<[u8; 32]> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    <[u8; 32]>::from_hex(stripped).wrap_err("expected exactly 32 bytes of hex")
}

#[cfg(test)]
mod tests {
    use eventmark_merkle::Tree;

    use super::{
        parse_hex32,
        Args,
    };

    fn hex_of(bytes: &[u8; 32]) -> String {
        format!("0x{}", hex::encode(bytes))
    }

    #[test]
    fn hex_parses_with_and_without_prefix() {
        let expected = [0xab; 32];
        let bare = "ab".repeat(32);
        assert_eq!(expected, parse_hex32(&bare).unwrap());
        assert_eq!(expected, parse_hex32(&format!("0x{bare}")).unwrap());
    }

    #[test]
    fn wrong_length_hex_is_rejected() {
        assert!(parse_hex32("abcd").is_err());
    }

    #[test]
    fn a_persisted_proof_round_trips() {
        let leaves = vec![[1; 32], [2; 32], [3; 32]];
        let tree = Tree::from_leaves(leaves.clone()).unwrap();
        let proof = tree.construct_proof(2).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(file.as_file(), &proof).unwrap();

        let args = Args {
            leaf: hex_of(&leaves[2]),
            root: hex_of(&tree.root()),
            proof: file.path().to_path_buf(),
        };
        args.run().unwrap();
    }

    #[test]
    fn a_mismatched_root_fails() {
        let leaves = vec![[1; 32], [2; 32], [3; 32]];
        let tree = Tree::from_leaves(leaves.clone()).unwrap();
        let proof = tree.construct_proof(2).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(file.as_file(), &proof).unwrap();

        let mut root = tree.root();
        root[0] ^= 1;
        let args = Args {
            leaf: hex_of(&leaves[2]),
            root: hex_of(&root),
            proof: file.path().to_path_buf(),
        };
        assert!(args.run().is_err());
    }
}

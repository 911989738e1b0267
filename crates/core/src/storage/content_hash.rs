//! Local computation of Dropbox's `content_hash`.
//!
//! The file is split into 4 MiB blocks, each block is SHA-256 hashed, and
//! the concatenated block digests are hashed once more.

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Hex-encoded Dropbox content hash of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut overall = Sha256::new();
    for block in bytes.chunks(BLOCK_SIZE) {
        overall.update(Sha256::digest(block));
    }
    format!("{:x}", overall.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_single_block_is_hash_of_hash() {
        let inner = Sha256::digest(b"%PDF-1.7");
        let expected = format!("{:x}", Sha256::digest(inner));
        assert_eq!(content_hash(b"%PDF-1.7"), expected);
    }

    #[test]
    fn test_splits_on_block_boundary() {
        let data = vec![7u8; BLOCK_SIZE + 3];

        let mut concat = Vec::new();
        concat.extend_from_slice(&Sha256::digest(&data[..BLOCK_SIZE]));
        concat.extend_from_slice(&Sha256::digest(&data[BLOCK_SIZE..]));
        let expected = format!("{:x}", Sha256::digest(&concat));

        assert_eq!(content_hash(&data), expected);
        assert_ne!(content_hash(&data), content_hash(&data[..BLOCK_SIZE]));
    }
}

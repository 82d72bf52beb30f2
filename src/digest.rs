//! Streaming SHA-256 integrity digest of the source transcript.
//!
//! The digest is the chain-of-custody anchor: it fingerprints the raw
//! bytes of the original export file, untouched by line-ending
//! normalization, trimming or decoding. It is computed once per
//! ingestion with a fixed read buffer, so memory use is O(1) regardless
//! of file size. If the read fails, ingestion aborts before any
//! persistence — a conversation record is never created without either
//! a digest or an explicit failure.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Read buffer size for streaming the source file (8KB).
const BUFFER_SIZE: usize = 8192;

/// Computes the lowercase hex SHA-256 digest of a file's raw bytes.
pub fn digest_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(to_hex(&hasher.finalize()))
}

/// Computes the digest of an in-memory byte slice (test helper and
/// reference for what [`digest_file`] must produce).
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    to_hex(&hasher.finalize())
}

fn to_hex(hash: &[u8]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_digest_known_vector() {
        // SHA-256 of the empty input
        assert_eq!(
            digest_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_file_matches_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let payload = b"01/02/2024, 10:30 - Alice: Hello\r\nworld\r\n";
        tmp.write_all(payload).unwrap();
        tmp.flush().unwrap();

        let from_file = digest_file(tmp.path()).unwrap();
        assert_eq!(from_file, digest_bytes(payload));
        assert_eq!(from_file.len(), 64);
    }

    #[test]
    fn test_digest_is_byte_exact() {
        // CRLF and LF sources must digest differently: no normalization.
        assert_ne!(digest_bytes(b"a\r\nb"), digest_bytes(b"a\nb"));
    }

    #[test]
    fn test_digest_missing_file_is_io_error() {
        let err = digest_file(Path::new("/nonexistent/chat.txt")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_digest_deterministic_across_runs() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"stable content").unwrap();
        tmp.flush().unwrap();
        assert_eq!(
            digest_file(tmp.path()).unwrap(),
            digest_file(tmp.path()).unwrap()
        );
    }
}

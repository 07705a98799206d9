//! Content digests for duplicate detection.

use crate::error::FileError;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Files are read in chunks of this many bytes.
pub const CHUNK_SIZE: usize = 4096;

/// BLAKE3 digest of a file's full content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest(blake3::Hash);

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Hashes the content of `path`, reading [`CHUNK_SIZE`] bytes at a time.
///
/// Memory use is bounded regardless of file size.
pub fn digest(path: &Path) -> Result<ContentDigest, FileError> {
    let mut file = File::open(path).map_err(|e| FileError::io(path, e))?;
    digest_reader(&mut file).map_err(|e| FileError::io(path, e))
}

fn digest_reader(reader: &mut impl Read) -> std::io::Result<ContentDigest> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(ContentDigest(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_equal_content_equal_digest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let a = temp_dir.path().join("a.bin");
        let b = temp_dir.path().join("nested-name.dat");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        assert_eq!(digest(&a).unwrap(), digest(&b).unwrap());
    }

    #[test]
    fn test_different_content_different_digest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let a = temp_dir.path().join("a.bin");
        let b = temp_dir.path().join("b.bin");
        fs::write(&a, b"one").unwrap();
        fs::write(&b, b"two").unwrap();

        assert_ne!(digest(&a).unwrap(), digest(&b).unwrap());
    }

    #[test]
    fn test_chunked_digest_matches_one_shot_hash() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("large.bin");
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        let expected = blake3::hash(&content).to_hex().to_string();
        assert_eq!(digest(&path).unwrap().to_string(), expected);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = digest(Path::new("/non/existent/file.bin"));
        assert!(matches!(result, Err(FileError::Io { .. })));
    }
}

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read buffer size used when hashing files.
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// File utility functions used by the publisher.
pub struct IOUtil;

impl IOUtil {
    /// Whether `path` exists and is a regular file (symlinks are followed).
    pub fn is_existing_file(path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    /// Hex-encoded SHA-256 digest of an in-memory buffer.
    pub fn sha256_bytes(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    /// Hex-encoded SHA-256 digest of a file, streamed in fixed-size chunks.
    pub fn sha256_file(path: &Path) -> Result<String> {
        let mut file = fs::File::open(path)
            .with_context(|| format!("Failed to open '{}' for hashing", path.display()))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
        loop {
            let read = file
                .read(&mut buffer)
                .with_context(|| format!("Failed to read '{}' for hashing", path.display()))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize a value as pretty JSON and write it to a file, creating
    /// parent directories as needed.
    pub fn save_object<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory '{}'", parent.display())
                })?;
            }
        }
        fs::write(path, json.as_bytes())
            .with_context(|| format!("Failed to write object to '{}'", path.display()))?;
        Ok(())
    }

    /// Read a file and deserialize it from JSON.
    pub fn load_object<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file '{}'", path.display()))?;
        let value = serde_json::from_str(&json)
            .with_context(|| format!("Failed to deserialize JSON from '{}'", path.display()))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        bucket: String,
        uploads: u32,
    }

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            IOUtil::sha256_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_file_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.zip");
        // Larger than one hash buffer so the chunked path is exercised.
        let content: Vec<u8> = (0..(HASH_BUFFER_SIZE * 2 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        fs::write(&path, &content).unwrap();

        assert_eq!(
            IOUtil::sha256_file(&path).unwrap(),
            IOUtil::sha256_bytes(&content)
        );
    }

    #[test]
    fn sha256_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = IOUtil::sha256_file(&dir.path().join("nope.zip")).unwrap_err();
        assert!(format!("{err:#}").contains("nope.zip"));
    }

    #[test]
    fn existing_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("template.yml");
        fs::write(&file, b"Resources: {}").unwrap();

        assert!(IOUtil::is_existing_file(&file));
        assert!(!IOUtil::is_existing_file(dir.path()));
        assert!(!IOUtil::is_existing_file(&dir.path().join("absent.yml")));
    }

    #[test]
    fn save_and_load_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("publish.json");
        let record = Record {
            bucket: "demo-bucket".into(),
            uploads: 3,
        };
        IOUtil::save_object(&path, &record).unwrap();
        let loaded: Record = IOUtil::load_object(&path).unwrap();
        assert_eq!(loaded, record);
    }
}

//! Content digests for equality comparison
//!
//! Digests are SHA-256, rendered as lowercase hex. The same routine serves
//! local files and remote byte streams; only the resulting strings are ever
//! compared, never the sources themselves.

use remsync_types::Result;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read granularity for digest computation
///
/// Not semantically significant; the digest is identical for any chunking
/// of the same bytes.
pub const HASH_CHUNK_SIZE: usize = 8192;

/// Digest a byte stream until EOF
pub async fn hash_stream<R: AsyncRead + Unpin>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest a local file
pub async fn hash_local_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)
        .await
        .map_err(|e| remsync_types::Error::from_io(&path.display().to_string(), &e))?;
    hash_stream(&mut file).await
}

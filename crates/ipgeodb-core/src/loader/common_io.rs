// crates/ipgeodb-core/src/loader/common_io.rs
use super::CompressionMode;
use crate::error::{IpDbError, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// First two bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Largest decoded payload accepted (256MB), also the bincode limit.
pub const MAX_PAYLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Opens a file, buffers it, and transparently unwraps gzip.
/// Returns a generic Reader so the caller doesn't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        IpDbError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    wrap_decoder(BufReader::new(file))
}

/// Wraps `reader` in a gzip decoder when the stream starts with the gzip
/// magic, otherwise hands it back as-is.
pub fn wrap_decoder<'a, R: BufRead + 'a>(mut reader: R) -> Result<Box<dyn Read + 'a>> {
    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if !gzipped {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(IpDbError::InvalidData(
            "Gzip stream found but 'compact' disabled".into(),
        ))
    }
}

/// Reads the whole (decoded) stream, refusing anything above `limit` bytes
/// so a small gzip file cannot inflate without bound.
pub fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut payload)?;
    if payload.len() as u64 > limit {
        return Err(IpDbError::InvalidData(format!(
            "decoded payload exceeds {limit} bytes"
        )));
    }
    Ok(payload)
}

/// Wraps an encoded payload in the requested container.
pub fn compress(payload: &[u8], compression: CompressionMode) -> Result<Vec<u8>> {
    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                // GzEncoder writes mtime 0, so equal payloads give equal bytes.
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(payload)?;
                Ok(encoder.finish()?)
            }
            #[cfg(not(feature = "compact"))]
            {
                Err(IpDbError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ))
            }
        }
        CompressionMode::None => Ok(payload.to_vec()),
    }
}

/// Writes `bytes` next to `path` and renames it into place, so readers see
/// either the old file or the complete new one.
///
/// On any failure the temporary file is removed again.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    write_then_rename(&tmp, path, bytes).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        IpDbError::Io(e)
    })
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    path.with_file_name(format!(".{filename}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_streams_pass_through() {
        let mut out = String::new();
        wrap_decoder(&b"{\"ipv4\":[]}"[..])
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "{\"ipv4\":[]}");
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzip_is_detected_and_deterministic() {
        let a = compress(b"payload", CompressionMode::Gzip).unwrap();
        let b = compress(b"payload", CompressionMode::Gzip).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(&GZIP_MAGIC));

        let mut out = Vec::new();
        wrap_decoder(&a[..]).unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
    }

    #[test]
    fn oversized_payloads_are_refused() {
        let data = vec![0u8; 1000];
        assert_eq!(read_limited(&data[..], 1000).unwrap().len(), 1000);
        assert!(matches!(
            read_limited(&data[..], 999),
            Err(IpDbError::InvalidData(_))
        ));
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzip_bombs_stop_at_the_limit() {
        // 1MB of zeros shrinks to about a kilobyte.
        let packed = compress(&vec![0u8; 1 << 20], CompressionMode::Gzip).unwrap();
        assert!(packed.len() < 8 * 1024);
        let reader = wrap_decoder(&packed[..]).unwrap();
        assert!(matches!(
            read_limited(reader, 64 * 1024),
            Err(IpDbError::InvalidData(_))
        ));
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = dir.path().join("ipgeodb.bin");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(matches!(
            write_atomic(&target, b"payload"),
            Err(IpDbError::Io(_))
        ));
        assert!(!temp_path(&target).exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn failed_create_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("ipgeodb.bin");
        assert!(write_atomic(&target, b"payload").is_err());
        assert!(!temp_path(&target).exists());
    }

    #[test]
    fn temp_file_sits_next_to_target() {
        let tmp = temp_path(Path::new("/data/ipgeodb.bin"));
        assert_eq!(tmp, Path::new("/data/.ipgeodb.bin.tmp"));
    }
}

//! Content-type probing for fragment files.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

/// Classifies a file's content as a MIME-type string.
#[async_trait]
pub trait ContentProbe: Send + Sync {
    /// Returns the MIME type of the file at `path`.
    async fn mime_type(&self, path: &Path) -> io::Result<String>;
}

/// Leading-byte signature probe covering the common archive containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicProbe;

const SNIFF_LEN: u64 = 16;

impl MagicProbe {
    /// Creates a new probe.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Maps leading bytes to a MIME type.
///
/// Empty input falls back to `text/plain`; anything unrecognized is
/// `application/octet-stream`.
#[must_use]
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    match data {
        [] => "text/plain",
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] | [0x50, 0x4B, 0x07, 0x08, ..] => {
            "application/zip"
        }
        [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, ..] => "application/x-7z-compressed",
        [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, ..] => "application/x-rar",
        [0x1F, 0x8B, ..] => "application/gzip",
        [0x42, 0x5A, 0x68, ..] => "application/x-bzip2",
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => "application/x-xz",
        [0x28, 0xB5, 0x2F, 0xFD, ..] => "application/zstd",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ContentProbe for MagicProbe {
    async fn mime_type(&self, path: &Path) -> io::Result<String> {
        let file = tokio::fs::File::open(path).await?;
        let mut header = Vec::new();
        file.take(SNIFF_LEN).read_to_end(&mut header).await?;
        Ok(sniff_mime_type(&header).to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sniff_known_containers() {
        assert_eq!(sniff_mime_type(&[0x50, 0x4B, 0x03, 0x04, 0x14]), "application/zip");
        assert_eq!(
            sniff_mime_type(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0x00, 0x04]),
            "application/x-7z-compressed"
        );
        assert_eq!(sniff_mime_type(b"Rar!\x1a\x07\x01\x00"), "application/x-rar");
        assert_eq!(sniff_mime_type(&[0x1F, 0x8B, 0x08]), "application/gzip");
    }

    #[test]
    fn test_sniff_fallbacks() {
        assert_eq!(sniff_mime_type(&[]), "text/plain");
        assert_eq!(sniff_mime_type(&[0xDE, 0xAD, 0xBE, 0xEF]), "application/octet-stream");
        // A truncated signature is not a match.
        assert_eq!(sniff_mime_type(&[0x37, 0x7A, 0xBC]), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_magic_probe_reads_file_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("video.7z.001");
        std::fs::write(&path, [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0x00, 0x04, 0xFF]).unwrap();

        let mime = MagicProbe::new().mime_type(&path).await.unwrap();
        assert_eq!(mime, "application/x-7z-compressed");
    }

    #[tokio::test]
    async fn test_magic_probe_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let result = MagicProbe::new().mime_type(&temp.path().join("nope")).await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}

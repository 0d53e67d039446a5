//! Per-event scratch files for downloaded voice notes.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Audio written to a uniquely named temp file. The file is removed when the
/// value is dropped, on success and failure alike.
pub struct AudioScratch {
    file: NamedTempFile,
}

impl AudioScratch {
    pub fn write(audio: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("tecnobot-voice-")
            .suffix(".ogg")
            .tempfile()?;
        file.write_all(audio)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_written() {
        let scratch = AudioScratch::write(b"OggS fake audio").unwrap();
        assert_eq!(std::fs::read(scratch.path()).unwrap(), b"OggS fake audio");
        assert_eq!(scratch.path().extension().unwrap(), "ogg");
    }

    #[test]
    fn test_paths_are_distinct() {
        let a = AudioScratch::write(b"a").unwrap();
        let b = AudioScratch::write(b"b").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read(a.path()).unwrap(), b"a");
        assert_eq!(std::fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn test_removed_on_drop() {
        let scratch = AudioScratch::write(b"bytes").unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
    }
}

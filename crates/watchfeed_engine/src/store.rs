use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use watchfeed_logging::{feed_debug, feed_info};

use crate::decode::{decode_text, DecodeError};
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read feed {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("feed {path:?} is not readable text: {source}")]
    Decode { path: PathBuf, source: DecodeError },
    #[error("failed to write feed {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
    #[error("failed to remove feed {path:?}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// Feed text together with how it was stored on disk, so a filtered copy is
/// written back in the same encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub text: String,
    encoding: &'static Encoding,
    bom: Vec<u8>,
}

impl FeedDocument {
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Same on-disk form, different content.
    pub fn with_text(&self, text: String) -> Self {
        Self {
            text,
            encoding: self.encoding,
            bom: self.bom.clone(),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        // UTF-16 has no encoder; encoding_rs falls back to UTF-8 and the old BOM would lie.
        let output = self.encoding.output_encoding();
        let (body, _, _) = output.encode(&self.text);
        let mut bytes = Vec::with_capacity(self.bom.len() + body.len());
        if output == self.encoding {
            bytes.extend_from_slice(&self.bom);
        }
        bytes.extend_from_slice(&body);
        bytes
    }
}

/// The host's feed file plus the place the filtered copy goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStore {
    input: PathBuf,
    output: PathBuf,
}

impl FeedStore {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn load(&self) -> Result<FeedDocument, StoreError> {
        let bytes = fs::read(&self.input).map_err(|source| StoreError::Read {
            path: self.input.clone(),
            source,
        })?;
        let bom = Encoding::for_bom(&bytes)
            .map(|(_, len)| bytes[..len].to_vec())
            .unwrap_or_default();
        let decoded = decode_text(&bytes, None).map_err(|source| StoreError::Decode {
            path: self.input.clone(),
            source,
        })?;
        feed_debug!("feed {:?} read as {}", self.input, decoded.encoding.name());
        Ok(FeedDocument {
            text: decoded.text,
            encoding: decoded.encoding,
            bom,
        })
    }

    /// Replace the output file with `document`, encoded as it was loaded.
    pub fn save(&self, document: &FeedDocument) -> Result<PathBuf, StoreError> {
        AtomicFileWriter::new(self.output.clone())
            .write(&document.to_bytes())
            .map_err(|source| StoreError::Write {
                path: self.output.clone(),
                source,
            })
    }

    /// Remove the host's feed file so an unfiltered feed is never consumed.
    /// Returns whether a file was actually removed.
    pub fn discard_primary(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.input) {
            Ok(()) => {
                feed_info!("Removed feed {:?}", self.input);
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Remove {
                path: self.input.clone(),
                source,
            }),
        }
    }
}

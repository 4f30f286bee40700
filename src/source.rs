//! Script source loading and identity.

use std::fmt::Write as _;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use ring::digest::{SHA256, digest};
use thiserror::Error;

/// Hex characters of the content digest kept in inline identities.
const DIGEST_PREFIX_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read script file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read script from {label}: {source}")]
    Reader {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    File(PathBuf),
    Inline,
    Reader(String),
}

/// Script text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    origin: SourceOrigin,
    content: String,
}

impl ScriptSource {
    pub fn from_string(content: impl Into<String>) -> Self {
        Self {
            origin: SourceOrigin::Inline,
            content: content.into(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SourceError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            origin: SourceOrigin::File(path.to_path_buf()),
            content,
        })
    }

    /// `label` names the reader in identities and errors, e.g. `"stdin"`.
    pub fn from_reader<R: Read>(mut reader: R, label: impl Into<String>) -> Result<Self, SourceError> {
        let label = label.into();
        let mut content = String::new();
        if let Err(source) = reader.read_to_string(&mut content) {
            return Err(SourceError::Reader { label, source });
        }
        Ok(Self {
            origin: SourceOrigin::Reader(label),
            content,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Stable identity derived from the origin. Inline and reader sources are
    /// told apart by a digest of their content.
    pub fn id(&self) -> String {
        match &self.origin {
            SourceOrigin::File(path) => format!("file://{}", path.display()),
            SourceOrigin::Inline => format!("string://inline/{}", self.digest_prefix()),
            SourceOrigin::Reader(label) => format!("reader://{}/{}", label, self.digest_prefix()),
        }
    }

    fn digest_prefix(&self) -> String {
        let hash = digest(&SHA256, self.content.as_bytes());
        let mut hex = String::with_capacity(DIGEST_PREFIX_LEN);
        for byte in hash.as_ref().iter().take(DIGEST_PREFIX_LEN / 2) {
            let _ = write!(hex, "{:02x}", byte);
        }
        hex
    }
}

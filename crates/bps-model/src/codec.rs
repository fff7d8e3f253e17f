//! Serialization boundary.
//!
//! Two encodings of the same serde model:
//!
//! | Form   | Use                                                       |
//! |--------|-----------------------------------------------------------|
//! | bytes  | opaque snapshot: `BPSC` magic, `u32` LE format version, bincode body |
//! | JSON   | the document exchanged with discovery and visualization  |
//!
//! Decoding either form yields a configuration equal (`==`) to the one
//! encoded.  Decoding does not run [`Configuration::validate`]; callers that
//! are about to simulate validate anyway.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{CodecError, CodecResult, Configuration};

const MAGIC: &[u8; 4] = b"BPSC";

/// Version of the byte layout written by [`Configuration::to_bytes`].
pub const FORMAT_VERSION: u32 = 1;

impl Configuration {
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut out = Vec::with_capacity(4_096);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bincode::serialize_into(&mut out, self)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let (magic, rest) = bytes.split_at_checked(MAGIC.len()).ok_or(CodecError::BadMagic)?;
        if magic != MAGIC {
            return Err(CodecError::BadMagic);
        }
        let (version, body) = rest.split_at_checked(4).ok_or(CodecError::BadMagic)?;
        let version = u32::from_le_bytes(version.try_into().map_err(|_| CodecError::BadMagic)?);
        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        Ok(bincode::deserialize(body)?)
    }

    pub fn to_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CodecResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to `path`: JSON for a `.json` extension, bytes otherwise.
    pub fn save_file(&self, path: impl AsRef<Path>) -> CodecResult<()> {
        let path = path.as_ref();
        if is_json(path) {
            fs::write(path, self.to_json()?)?;
        } else {
            fs::write(path, self.to_bytes()?)?;
        }
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Read from `path`, choosing the format as [`save_file`](Self::save_file) does.
    pub fn load_file(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let config = if is_json(path) {
            Self::from_json(&fs::read_to_string(path)?)?
        } else {
            Self::from_bytes(&fs::read(path)?)?
        };
        debug!(path = %path.display(), agents = config.agents.len(), "configuration loaded");
        Ok(config)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

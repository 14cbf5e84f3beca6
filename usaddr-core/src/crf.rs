//! # CRFsuite Engine
//!
//! [`SequenceTagger`] backed by a pretrained `.crfsuite` model file, read with
//! the pure-Rust `crfs` implementation of the CRFsuite format.
//!
//! The model bytes are loaded once and shared read-only. Each request opens
//! its own view of the model and its own Viterbi tagger, so concurrent
//! requests never touch shared mutable state.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crfs::{Attribute, Model};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::tagger::{SequenceTagger, TaggingSession};

/// Fixed-size file header: magic, size, type, version, three counts and
/// five section offsets, all 4 bytes wide.
const HEADER_SIZE: usize = 48;

/// Byte positions of `off_features`, `off_labels`, `off_attrs`,
/// `off_label_refs` and `off_attr_refs` inside the header.
const SECTION_OFFSETS: [usize; 5] = [28, 32, 36, 40, 44];

/// A linear-chain CRF model in CRFsuite format.
pub struct CrfSuiteModel {
    data: Vec<u8>,
}

impl CrfSuiteModel {
    /// Reads and validates a model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| EngineError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::from_bytes(data)?;
        info!(path = %path.display(), bytes = model.data.len(), "CRFsuite model loaded");
        Ok(model)
    }

    /// Validates an in-memory model image.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, EngineError> {
        open_model(&data)?;
        debug!(bytes = data.len(), "CRFsuite header ok");
        Ok(Self { data })
    }
}

/// Every section offset must land inside the image; `crfs` slices at them
/// without bounds checks.
fn check_header(data: &[u8]) -> Result<(), EngineError> {
    if data.len() <= HEADER_SIZE {
        return Err(EngineError::Malformed(format!(
            "model image is {} bytes, shorter than its header",
            data.len()
        )));
    }
    if &data[..4] != b"lCRF" {
        return Err(EngineError::Malformed("magic mismatch, not a CRFsuite model".into()));
    }
    for at in SECTION_OFFSETS {
        let offset = u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
        if offset as usize >= data.len() {
            return Err(EngineError::Malformed(format!(
                "section offset {offset:#x} past end of {} byte image",
                data.len()
            )));
        }
    }
    Ok(())
}

fn open_model(data: &[u8]) -> Result<Model<'_>, EngineError> {
    check_header(data)?;
    // offsets in range can still point at corrupt databases
    panic::catch_unwind(|| Model::new(data))
        .map_err(|_| EngineError::Malformed("corrupt model sections".into()))?
        .map_err(|e| EngineError::Malformed(e.to_string()))
}

impl SequenceTagger for CrfSuiteModel {
    fn open(&self) -> Result<Box<dyn TaggingSession + '_>, EngineError> {
        let model = open_model(&self.data)?;
        Ok(Box::new(CrfSuiteSession { model }))
    }
}

struct CrfSuiteSession<'a> {
    model: Model<'a>,
}

impl TaggingSession for CrfSuiteSession<'_> {
    fn has_attribute(&self, name: &str) -> bool {
        self.model.to_attr_id(name).is_some()
    }

    fn decode(&mut self, items: &[Vec<String>]) -> Result<Vec<String>, EngineError> {
        // Binary features: every attribute present carries weight 1.0
        let xseq: Vec<Vec<Attribute>> = items
            .iter()
            .map(|item| {
                item.iter()
                    .map(|name| Attribute::new(name.as_str(), 1.0))
                    .collect()
            })
            .collect();

        let model = &self.model;
        let decoded = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut tagger = model.tagger()?;
            let labels = tagger.tag(&xseq)?;
            Ok::<_, std::io::Error>(labels.into_iter().map(str::to_string).collect::<Vec<_>>())
        }))
        .map_err(|_| EngineError::Decode("engine aborted while decoding".into()))?;

        decoded.map_err(|e| EngineError::Decode(e.to_string()))
    }
}

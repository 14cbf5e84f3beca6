//! # Tagging Adapter
//!
//! Bridges the feature schema and a pretrained sequence-tagging engine.
//!
//! ## Contract
//!
//! - Each feature name is looked up in the engine's attribute vocabulary.
//!   Names the model never saw during training carry no signal and are
//!   dropped silently.
//! - A token whose features were all dropped is still tagged; the engine's
//!   transition and bias terms decide its label.
//! - The whole sequence is decoded at once (global best path), never token by
//!   token.
//! - Exactly one label comes back per token, or the request fails.
//!
//! The engine itself is behind [`SequenceTagger`]; see [`crate::crf`] for the
//! CRFsuite implementation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{EngineError, Error, Result};
use crate::features::FeatureSet;
use crate::tokenizer::Token;

/// A loaded sequence-tagging engine.
///
/// Implementations are shared between concurrent requests and must only be
/// queried, never mutated, by a decode.
pub trait SequenceTagger: Send + Sync {
    /// Opens a per-request decoding session.
    fn open(&self) -> std::result::Result<Box<dyn TaggingSession + '_>, EngineError>;
}

/// A single decode against a loaded engine.
pub trait TaggingSession {
    /// True when `name` belongs to the model's attribute vocabulary.
    fn has_attribute(&self, name: &str) -> bool;

    /// Returns the highest-scoring label sequence for `items`, one label per
    /// item. Every attribute in `items` is known to the model.
    fn decode(&mut self, items: &[Vec<String>]) -> std::result::Result<Vec<String>, EngineError>;
}

/// A token paired with the label assigned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledToken {
    pub token: Token,
    /// Label string as stored in the model (ex: "AddressNumber").
    pub label: String,
}

/// Tags a token sequence.
///
/// `features` must be aligned with `tokens` (see
/// [`crate::features::extract_features`]) and is consumed.
///
/// # Errors
/// - [`Error::ModelUnavailable`] when `engine` is `None` or cannot be opened.
/// - [`Error::InvalidInput`] for an empty sequence or misaligned features.
/// - [`Error::TaggingFailed`] when the engine fails or returns the wrong
///   number of labels.
/// - [`Error::AllocationFailure`] when the decode buffers cannot be reserved.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn tag(
    engine: Option<&dyn SequenceTagger>,
    tokens: &[Token],
    features: Vec<FeatureSet>,
) -> Result<Vec<String>> {
    let engine = engine.ok_or_else(|| Error::ModelUnavailable("no model loaded".to_string()))?;

    if tokens.is_empty() {
        return Err(Error::InvalidInput("empty token sequence".to_string()));
    }
    if features.len() != tokens.len() {
        return Err(Error::InvalidInput(format!(
            "{} feature sets for {} tokens",
            features.len(),
            tokens.len()
        )));
    }

    let mut session = engine
        .open()
        .map_err(|e| Error::ModelUnavailable(e.to_string()))?;

    // Feature names -> model vocabulary
    let mut items: Vec<Vec<String>> = Vec::new();
    items.try_reserve_exact(features.len())?;
    let mut dropped = 0usize;

    for feature_set in features {
        let mut known = Vec::new();
        known.try_reserve_exact(feature_set.len())?;
        for name in feature_set {
            if session.has_attribute(&name) {
                known.push(name);
            } else {
                trace!(feature = %name, "feature not in model vocabulary");
                dropped += 1;
            }
        }
        items.push(known);
    }

    let kept: usize = items.iter().map(Vec::len).sum();
    debug!(kept, dropped, "features mapped to model attributes");

    let labels = session
        .decode(&items)
        .map_err(|e| Error::TaggingFailed(e.to_string()))?;

    if labels.len() != tokens.len() {
        return Err(Error::TaggingFailed(format!(
            "engine returned {} labels for {} tokens",
            labels.len(),
            tokens.len()
        )));
    }

    Ok(labels)
}

/// Pairs tokens with their labels positionally.
///
/// Callers pass the output of [`tag`], which guarantees equal lengths.
pub fn pair(tokens: Vec<Token>, labels: Vec<String>) -> Vec<LabeledToken> {
    debug_assert_eq!(tokens.len(), labels.len());
    tokens
        .into_iter()
        .zip(labels)
        .map(|(token, label)| LabeledToken { token, label })
        .collect()
}

//! # Address Parsing Pipeline
//!
//! Wires the stages together for one request:
//!
//! ```text
//! text -> tokenize -> extract_features -> tag (engine) -> pair -> aggregate
//! ```
//!
//! Every call is independent. The only state kept between calls is the
//! loaded engine, which is queried read-only, so one [`AddressParser`] can
//! serve concurrent requests.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::aggregate::{
    aggregate, to_column_mapped, to_grouped_text, to_stream, AggregationResult, ColumnRecord,
    GroupedText, OutputShape,
};
use crate::crf::CrfSuiteModel;
use crate::error::{EngineError, Result};
use crate::features::extract_features;
use crate::tagger::{pair, tag, LabeledToken, SequenceTagger};
use crate::tokenizer::tokenize;

/// The address parser.
///
/// Holds the tagging engine, or nothing when the model could not be loaded;
/// in that case every request fails with
/// [`Error::ModelUnavailable`](crate::Error::ModelUnavailable).
///
/// # Entry points
/// - [`parse`](Self::parse): labeled tokens, commas removed.
/// - [`tag`](Self::tag): label → joined text.
/// - [`parse_columns`](Self::parse_columns): caller-declared columns.
pub struct AddressParser {
    engine: Option<Box<dyn SequenceTagger>>,
}

impl AddressParser {
    /// Creates a parser around a loaded engine.
    pub fn new(engine: impl SequenceTagger + 'static) -> Self {
        Self {
            engine: Some(Box::new(engine)),
        }
    }

    /// A parser with no engine. Every request fails with `ModelUnavailable`.
    pub fn without_model() -> Self {
        Self { engine: None }
    }

    /// Loads a CRFsuite model, failing if it cannot be read.
    pub fn try_load(path: impl AsRef<Path>) -> std::result::Result<Self, EngineError> {
        Ok(Self::new(CrfSuiteModel::load(path)?))
    }

    /// Loads a CRFsuite model. A missing or malformed model is logged and
    /// leaves the parser without an engine.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(parser) => parser,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not load address model");
                Self::without_model()
            }
        }
    }

    pub fn has_model(&self) -> bool {
        self.engine.is_some()
    }

    /// Tokenizes and tags `text`, one [`LabeledToken`] per token, commas included.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn label(&self, text: &str) -> Result<Vec<LabeledToken>> {
        let tokens = tokenize(text);
        let features = extract_features(&tokens);
        debug!(tokens = tokens.len(), "features generated");

        let labels = tag(self.engine.as_deref(), &tokens, features)?;
        Ok(pair(tokens, labels))
    }

    /// Labeled tokens with comma tokens removed.
    pub fn parse(&self, text: &str) -> Result<Vec<LabeledToken>> {
        Ok(to_stream(self.label(text)?))
    }

    /// Label → space-joined text, labels in first-occurrence order.
    pub fn tag(&self, text: &str) -> Result<GroupedText> {
        Ok(to_grouped_text(&self.label(text)?))
    }

    /// Tokens mapped onto `columns` (see [`to_column_mapped`]).
    pub fn parse_columns<S: AsRef<str>>(&self, text: &str, columns: &[S]) -> Result<ColumnRecord> {
        Ok(to_column_mapped(&self.label(text)?, columns))
    }

    /// Runs the pipeline and builds the requested output shape.
    pub fn analyze(&self, text: &str, shape: &OutputShape) -> Result<AggregationResult> {
        Ok(aggregate(self.label(text)?, shape))
    }

    /// Parses many independent addresses on the rayon pool.
    ///
    /// Results are in input order; a failure only affects its own entry.
    pub fn parse_batch<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        shape: &OutputShape,
    ) -> Vec<Result<AggregationResult>> {
        texts
            .par_iter()
            .map(|text| self.analyze(text.as_ref(), shape))
            .collect()
    }
}

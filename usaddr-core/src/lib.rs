//! # usaddr-core — US Postal Address Parser
//!
//! Splits free-form address strings into labeled components (street number,
//! street name, city, state...) with a pretrained linear-chain CRF.
//!
//! ## Architecture
//!
//! Each request flows through a linear pipeline:
//!
//! 1.  **Input**: raw address text.
//! 2.  **Tokenization** ([`tokenizer`]): word runs and punctuation runs, in order.
//! 3.  **Normalization** ([`normalize`]): canonical lowercase forms used as feature keys.
//! 4.  **Features** ([`features`]): the fixed feature schema the model was trained on.
//! 5.  **Tagging** ([`tagger`]): features mapped to the model vocabulary and decoded as
//!     one sequence by the engine ([`crf`]).
//! 6.  **Aggregation** ([`aggregate`]): labeled tokens, label → text, or named columns.
//!
//! ## Example
//!
//! ```rust,no_run
//! use usaddr_core::AddressParser;
//!
//! let parser = AddressParser::try_load("usaddr.crfsuite")?;
//!
//! for lt in parser.parse("123 Main St, Springfield IL")? {
//!     println!("{} -> {}", lt.token.text, lt.label);
//! }
//!
//! let record = parser.parse_columns("123 Main St", &["address_number", "street_name"])?;
//! println!("{:?}", record.get("street_name"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod crf;
pub mod error;
pub mod features;
pub mod labels;
pub mod normalize;
pub mod pipeline;
pub mod tagger;
pub mod tokenizer;

#[cfg(test)]
mod testing;

pub use aggregate::{AggregationResult, ColumnRecord, GroupedText, OutputShape};
pub use crf::CrfSuiteModel;
pub use error::{EngineError, Error, Result};
pub use labels::Component;
pub use pipeline::AddressParser;
pub use tagger::{LabeledToken, SequenceTagger, TaggingSession};
pub use tokenizer::Token;

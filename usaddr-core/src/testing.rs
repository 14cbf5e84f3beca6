//! In-memory tagging engine for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::EngineError;
use crate::tagger::{SequenceTagger, TaggingSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Label,
    Fail,
    Truncate,
}

/// Labels tokens with a few fixed rules over the attributes it receives and
/// records every decode request.
pub(crate) struct FakeEngine {
    /// `None` accepts every attribute.
    vocabulary: Option<HashSet<String>>,
    behavior: Behavior,
    decoded: Mutex<Vec<Vec<Vec<String>>>>,
}

impl FakeEngine {
    fn new(vocabulary: Option<HashSet<String>>, behavior: Behavior) -> Self {
        Self {
            vocabulary,
            behavior,
            decoded: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn address_vocabulary() -> Self {
        Self::new(None, Behavior::Label)
    }

    pub(crate) fn with_vocabulary(names: &[&str]) -> Self {
        let vocabulary = names.iter().map(|n| n.to_string()).collect();
        Self::new(Some(vocabulary), Behavior::Label)
    }

    pub(crate) fn failing() -> Self {
        Self::new(None, Behavior::Fail)
    }

    pub(crate) fn truncating() -> Self {
        Self::new(None, Behavior::Truncate)
    }

    /// Attribute sequences passed to `decode`, one entry per call.
    pub(crate) fn decoded(&self) -> Vec<Vec<Vec<String>>> {
        self.decoded.lock().unwrap().clone()
    }
}

impl SequenceTagger for FakeEngine {
    fn open(&self) -> Result<Box<dyn TaggingSession + '_>, EngineError> {
        Ok(Box::new(FakeSession { engine: self }))
    }
}

struct FakeSession<'a> {
    engine: &'a FakeEngine,
}

impl TaggingSession for FakeSession<'_> {
    fn has_attribute(&self, name: &str) -> bool {
        self.engine
            .vocabulary
            .as_ref()
            .map_or(true, |vocab| vocab.contains(name))
    }

    fn decode(&mut self, items: &[Vec<String>]) -> Result<Vec<String>, EngineError> {
        self.engine.decoded.lock().unwrap().push(items.to_vec());

        match self.engine.behavior {
            Behavior::Fail => Err(EngineError::Decode("forced failure".to_string())),
            Behavior::Truncate => Ok(items.iter().skip(1).map(|item| label_for(item)).collect()),
            Behavior::Label => Ok(items.iter().map(|item| label_for(item)).collect()),
        }
    }
}

fn label_for(item: &[String]) -> String {
    let has = |name: &str| item.iter().any(|f| f == name);
    let label = if has("word.isdigit") && has("BOS") {
        "AddressNumber"
    } else if has("word.isdigit") {
        "ZipCode"
    } else if has("word=st") || has("word=ave") {
        "StreetNamePostType"
    } else if has("next_word=st") || has("next_word=ave") {
        "StreetName"
    } else if has("word.isupper") && has("EOS") {
        "StateName"
    } else {
        "PlaceName"
    };
    label.to_string()
}

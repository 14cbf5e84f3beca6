//! # Result Aggregation
//!
//! Turns the flat `(token, label)` sequence produced by the tagger back into
//! one of three output shapes:
//!
//! | Shape | Function | Commas |
//! |-------|----------|--------|
//! | stream of labeled tokens | [`to_stream`] | dropped |
//! | label → joined text | [`to_grouped_text`] | kept |
//! | column → joined text | [`to_column_mapped`] | kept if the label maps to a column |
//!
//! The grouped and column shapes join the surface text of every token that
//! shares a key with single spaces, in token order. The comma asymmetry
//! between the stream and grouped shapes is deliberate.
//!
//! ## Example
//!
//! ```text
//! [("123", AddressNumber), ("Main", StreetName), ("St", StreetName)]
//!   grouped  -> {"AddressNumber": "123", "StreetName": "Main St"}
//!   columns [address_number, street_name, zip_code]
//!            -> {address_number: "123", street_name: "Main St", zip_code: null}
//! ```

use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::tagger::LabeledToken;

/// Output shape requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputShape {
    Stream,
    GroupedText,
    /// Caller-declared column names, in declaration order.
    ColumnMapped(Vec<String>),
}

/// Aggregated output for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AggregationResult {
    Stream(Vec<LabeledToken>),
    GroupedText(GroupedText),
    ColumnMapped(ColumnRecord),
}

/// Builds the requested shape from a labeled sequence.
pub fn aggregate(labeled: Vec<LabeledToken>, shape: &OutputShape) -> AggregationResult {
    match shape {
        OutputShape::Stream => AggregationResult::Stream(to_stream(labeled)),
        OutputShape::GroupedText => AggregationResult::GroupedText(to_grouped_text(&labeled)),
        OutputShape::ColumnMapped(columns) => {
            AggregationResult::ColumnMapped(to_column_mapped(&labeled, columns))
        }
    }
}

/// Drops comma tokens, keeping the relative order of everything else.
pub fn to_stream(labeled: Vec<LabeledToken>) -> Vec<LabeledToken> {
    labeled.into_iter().filter(|lt| !lt.token.is_comma()).collect()
}

/// Groups surface texts by label, labels in first-occurrence order.
pub fn to_grouped_text(labeled: &[LabeledToken]) -> GroupedText {
    let mut grouped = GroupedText::default();
    for lt in labeled {
        grouped.append(&lt.label, &lt.token.text);
    }
    grouped
}

/// True when `label` names `column`: equal once underscores are removed from
/// the column, ignoring ASCII case (`street_name` matches `StreetName`).
pub fn column_matches(column: &str, label: &str) -> bool {
    let mut column_chars = column.chars().filter(|&c| c != '_');
    let mut label_chars = label.chars();
    loop {
        match (column_chars.next(), label_chars.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => {}
            _ => return false,
        }
    }
}

/// Maps labeled tokens onto caller-declared columns.
///
/// Each token goes to the first column (in declared order) matching its
/// label; tokens matching no column are dropped. Columns that receive no
/// token stay `None`.
pub fn to_column_mapped<S: AsRef<str>>(labeled: &[LabeledToken], columns: &[S]) -> ColumnRecord {
    let mut values: Vec<Option<String>> = vec![None; columns.len()];
    // label -> column slot, resolved once per distinct label
    let mut slots: HashMap<&str, Option<usize>> = HashMap::new();

    for lt in labeled {
        let slot = *slots.entry(lt.label.as_str()).or_insert_with(|| {
            columns
                .iter()
                .position(|column| column_matches(column.as_ref(), &lt.label))
        });

        let Some(slot) = slot else { continue };
        match &mut values[slot] {
            Some(buf) => {
                buf.push(' ');
                buf.push_str(&lt.token.text);
            }
            empty => *empty = Some(lt.token.text.clone()),
        }
    }

    ColumnRecord {
        columns: columns
            .iter()
            .map(|c| c.as_ref().to_string())
            .zip(values)
            .collect(),
    }
}

/// Label → space-joined token text, iterated in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedText {
    index: HashMap<String, usize>,
    entries: Vec<(String, String)>,
}

impl GroupedText {
    fn append(&mut self, label: &str, text: &str) {
        match self.index.get(label) {
            Some(&i) => {
                let buf = &mut self.entries[i].1;
                buf.push(' ');
                buf.push_str(text);
            }
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), text.to_string()));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.index.get(label).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    /// JSON object with labels in first-occurrence order.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(label, text)| (label.to_string(), Value::String(text.to_string())))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl Serialize for GroupedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, text) in &self.entries {
            map.serialize_entry(label, text)?;
        }
        map.end()
    }
}

/// One value per declared column, `None` where no token matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRecord {
    columns: Vec<(String, Option<String>)>,
}

impl ColumnRecord {
    /// Value of `column`; `None` when absent or undeclared.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v.as_deref()))
    }

    /// JSON object in declared column order, absent values as `null`.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(column, value)| {
                    let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
                    (column.to_string(), value)
                })
                .collect::<Map<String, Value>>(),
        )
    }
}

impl Serialize for ColumnRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn labeled(pairs: &[(&str, &str)]) -> Vec<LabeledToken> {
        let text: Vec<&str> = pairs.iter().map(|(t, _)| *t).collect();
        tokenize(&text.join(" "))
            .into_iter()
            .zip(pairs)
            .map(|(token, (_, label))| LabeledToken {
                token,
                label: label.to_string(),
            })
            .collect()
    }

    fn main_street() -> Vec<LabeledToken> {
        labeled(&[
            ("123", "AddressNumber"),
            ("Main", "StreetName"),
            ("St", "StreetName"),
        ])
    }

    #[test]
    fn test_stream_drops_commas() {
        let stream = to_stream(labeled(&[
            ("123", "AddressNumber"),
            (",", "AddressNumber"),
            ("Main", "StreetName"),
        ]));
        let texts: Vec<&str> = stream.iter().map(|lt| lt.token.text.as_str()).collect();
        assert_eq!(texts, ["123", "Main"]);
    }

    #[test]
    fn test_stream_keeps_other_punctuation() {
        let stream = to_stream(labeled(&[
            ("Main", "StreetName"),
            ("St", "StreetNamePostType"),
            (".", "StreetNamePostType"),
        ]));
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_grouped_text() {
        let grouped = to_grouped_text(&main_street());
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get("AddressNumber"), Some("123"));
        assert_eq!(grouped.get("StreetName"), Some("Main St"));
    }

    #[test]
    fn test_grouped_text_keeps_commas_and_first_occurrence_order() {
        let grouped = to_grouped_text(&labeled(&[
            ("Springfield", "PlaceName"),
            (",", "PlaceName"),
            ("IL", "StateName"),
            ("Chicago", "PlaceName"),
        ]));
        let entries: Vec<(&str, &str)> = grouped.iter().collect();
        assert_eq!(
            entries,
            [("PlaceName", "Springfield , Chicago"), ("StateName", "IL")]
        );
    }

    #[test]
    fn test_grouped_text_json_preserves_order() {
        let grouped = to_grouped_text(&labeled(&[
            ("Springfield", "PlaceName"),
            ("IL", "StateName"),
            ("62704", "ZipCode"),
            ("100", "AddressNumber"),
        ]));
        let json = serde_json::to_string(&grouped).unwrap();
        assert_eq!(
            json,
            r#"{"PlaceName":"Springfield","StateName":"IL","ZipCode":"62704","AddressNumber":"100"}"#
        );
        assert_eq!(grouped.to_json().to_string(), json);
    }

    #[test]
    fn test_column_mapped() {
        let record = to_column_mapped(&main_street(), &["address_number", "street_name"]);
        assert_eq!(record.get("address_number"), Some("123"));
        assert_eq!(record.get("street_name"), Some("Main St"));
    }

    #[test]
    fn test_column_mapped_unmatched() {
        let record = to_column_mapped(&main_street(), &["street_name", "zip_code"]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("zip_code"), None);
        assert_eq!(
            record.to_json(),
            serde_json::json!({"street_name": "Main St", "zip_code": null})
        );
    }

    #[test]
    fn test_column_mapped_first_declared_column_wins() {
        let record = to_column_mapped(&main_street(), &["STREET_NAME", "streetname"]);
        assert_eq!(record.get("STREET_NAME"), Some("Main St"));
        assert_eq!(record.get("streetname"), None);
    }

    #[test]
    fn test_column_matching_rule() {
        assert!(column_matches("address_number", "AddressNumber"));
        assert!(column_matches("usps_box_id", "USPSBoxID"));
        assert!(column_matches("_zip__code_", "ZipCode"));
        assert!(!column_matches("street", "StreetName"));
        assert!(!column_matches("street_name_x", "StreetName"));
        assert!(!column_matches("", "StreetName"));
    }

    #[test]
    fn test_aggregate_dispatch() {
        let stream = aggregate(main_street(), &OutputShape::Stream);
        assert!(matches!(stream, AggregationResult::Stream(ref s) if s.len() == 3));

        let grouped = aggregate(main_street(), &OutputShape::GroupedText);
        assert!(matches!(grouped, AggregationResult::GroupedText(ref g) if g.len() == 2));

        let columns = aggregate(
            main_street(),
            &OutputShape::ColumnMapped(vec!["address_number".to_string()]),
        );
        match columns {
            AggregationResult::ColumnMapped(record) => {
                assert_eq!(record.get("address_number"), Some("123"))
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }
}

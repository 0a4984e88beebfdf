// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turning a content string into an ordered list of records.
//!
//! Every content kind is read the same way. The input is first sniffed for
//! a JSON envelope of the shape `{ "raw": {...}, "formatted": "..." }`, then
//! an ordered list of strategies is tried until one of them yields at least
//! one record:
//!
//! 1. the structured `raw` payload, mapped field by field;
//! 2. the `formatted` string (or the whole input, if it was not JSON) read
//!    with the kind's markup extractor;
//! 3. the whole input read as loosely structured Markdown.
//!
//! Extraction never fails. When nothing matches the result is empty and the
//! caller shows an empty state.

pub mod concepts;
pub mod flashcards;
pub mod lessons;
pub mod markup;
pub mod notes;

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::kind::ContentKind;

/// The structured part of a JSON envelope. Each section is taken on its
/// own: a key that does not hold an array is ignored.
#[derive(Debug, Default)]
pub struct RawPayload {
    flashcards: Option<Vec<Value>>,
    notes: Option<Vec<Value>>,
    concepts: Option<Vec<Value>>,
    lessons: Option<Vec<Value>>,
    lesson_plans: Option<Vec<Value>>,
}

/// The entries of a raw payload that belong to one content kind.
#[derive(Debug, PartialEq)]
pub enum RawSection<'a> {
    Flashcards(&'a [Value]),
    Notes(&'a [Value]),
    Concepts(&'a [Value]),
    Lessons(&'a [Value]),
    Unrecognized,
}

impl RawPayload {
    /// Returns `None` unless `raw` is an object.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        let array = |keys: &[&str]| {
            keys.iter().find_map(|key| match object.get(*key) {
                Some(Value::Array(entries)) => Some(entries.clone()),
                Some(other) => {
                    log::debug!("Ignoring raw `{key}`: not an array but {other}.");
                    None
                }
                None => None,
            })
        };
        Some(Self {
            flashcards: array(&["flashcards", "cards"]),
            notes: array(&["notes"]),
            concepts: array(&["concepts"]),
            lessons: array(&["lessons"]),
            lesson_plans: array(&["lesson_plans"]),
        })
    }

    pub fn section(&self, kind: ContentKind) -> RawSection<'_> {
        match kind {
            ContentKind::Flashcards => match &self.flashcards {
                Some(entries) => RawSection::Flashcards(entries),
                None => RawSection::Unrecognized,
            },
            ContentKind::Notes => match &self.notes {
                Some(entries) => RawSection::Notes(entries),
                None => RawSection::Unrecognized,
            },
            ContentKind::Concepts => match &self.concepts {
                Some(entries) => RawSection::Concepts(entries),
                None => RawSection::Unrecognized,
            },
            ContentKind::Lessons => match self.lessons.as_ref().or(self.lesson_plans.as_ref()) {
                Some(entries) => RawSection::Lessons(entries),
                None => RawSection::Unrecognized,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    raw: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    formatted: Option<String>,
}

/// A content string after JSON sniffing.
#[derive(Debug)]
pub enum Input<'a> {
    /// The content was a JSON object.
    Envelope {
        raw: Option<RawPayload>,
        formatted: Option<String>,
        text: &'a str,
    },
    /// The content was anything else.
    Text(&'a str),
}

impl<'a> Input<'a> {
    pub fn sniff(content: &'a str) -> Self {
        let value: Value = match serde_json::from_str(content.trim()) {
            Ok(value) => value,
            Err(_) => return Input::Text(content),
        };
        if !value.is_object() {
            return Input::Text(content);
        }
        let envelope: Envelope = serde_json::from_value(value).unwrap_or_default();
        let raw = envelope.raw.as_ref().and_then(RawPayload::from_value);
        Input::Envelope {
            raw,
            formatted: envelope.formatted,
            text: content,
        }
    }

    /// The original content string.
    pub fn text(&self) -> &'a str {
        match self {
            Input::Envelope { text, .. } => text,
            Input::Text(text) => text,
        }
    }
}

/// Why a strategy produced nothing.
#[derive(Debug, PartialEq)]
pub enum Skip {
    /// The input does not have the shape this strategy reads.
    NotApplicable,
    /// The input has the right shape but its content could not be read.
    Unparsable(String),
}

impl Display for Skip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Skip::NotApplicable => write!(f, "not applicable"),
            Skip::Unparsable(reason) => write!(f, "unparsable: {reason}"),
        }
    }
}

/// Which strategy produced the records.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionPath {
    /// An already-structured object handed over next to the content.
    RawContent,
    EmbeddedJson,
    FormattedMarkup,
    RawMarkdown,
    Empty,
}

impl Display for ExtractionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionPath::RawContent => write!(f, "raw content object"),
            ExtractionPath::EmbeddedJson => write!(f, "embedded JSON"),
            ExtractionPath::FormattedMarkup => write!(f, "formatted markup"),
            ExtractionPath::RawMarkdown => write!(f, "raw markdown"),
            ExtractionPath::Empty => write!(f, "empty"),
        }
    }
}

/// The records read from one content string, and how they were read.
#[derive(Debug, PartialEq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub path: ExtractionPath,
}

impl<T> Extraction<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            path: ExtractionPath::Empty,
        }
    }
}

pub type Strategy<T> = fn(&Input<'_>) -> Result<Vec<T>, Skip>;

/// Try each strategy in order. The first one to return at least one record
/// wins; the rest are not run.
pub fn first_non_empty<T>(
    kind: ContentKind,
    input: &Input<'_>,
    strategies: &[(ExtractionPath, Strategy<T>)],
) -> Extraction<T> {
    for (path, strategy) in strategies {
        match strategy(input) {
            Ok(records) if !records.is_empty() => {
                log::debug!("Read {} {kind} via {path}.", records.len());
                return Extraction {
                    records,
                    path: *path,
                };
            }
            Ok(_) => log::debug!("No {kind} via {path}."),
            Err(skip) => log::debug!("Skipped {path} for {kind}: {skip}."),
        }
    }
    Extraction::empty()
}

/// A content kind's readers for each representation.
pub trait Extractor {
    type Record;

    const KIND: ContentKind;

    /// Map structured entries to records. Entries missing a required field
    /// are dropped.
    fn from_entries(section: RawSection<'_>) -> Result<Vec<Self::Record>, Skip>;

    /// Read the kind's markup format.
    fn from_markup(text: &str) -> Vec<Self::Record>;

    /// Read loosely structured Markdown.
    fn from_markdown(text: &str) -> Vec<Self::Record>;
}

fn embedded_json<E: Extractor>(input: &Input<'_>) -> Result<Vec<E::Record>, Skip> {
    match input {
        Input::Envelope { raw: Some(raw), .. } => E::from_entries(raw.section(E::KIND)),
        _ => Err(Skip::NotApplicable),
    }
}

fn formatted_markup<E: Extractor>(input: &Input<'_>) -> Result<Vec<E::Record>, Skip> {
    match input {
        Input::Envelope {
            formatted: Some(formatted),
            ..
        } => Ok(E::from_markup(formatted)),
        Input::Envelope { formatted: None, .. } => Err(Skip::NotApplicable),
        Input::Text(text) => Ok(E::from_markup(text)),
    }
}

fn raw_markdown<E: Extractor>(input: &Input<'_>) -> Result<Vec<E::Record>, Skip> {
    Ok(E::from_markdown(input.text()))
}

/// Read `content` as records of the extractor's kind.
pub fn extract<E: Extractor>(content: &str) -> Extraction<E::Record> {
    let input = Input::sniff(content);
    extract_input::<E>(&input)
}

pub fn extract_input<E: Extractor>(input: &Input<'_>) -> Extraction<E::Record> {
    let strategies: [(ExtractionPath, Strategy<E::Record>); 3] = [
        (ExtractionPath::EmbeddedJson, embedded_json::<E>),
        (ExtractionPath::FormattedMarkup, formatted_markup::<E>),
        (ExtractionPath::RawMarkdown, raw_markdown::<E>),
    ];
    first_non_empty(E::KIND, input, &strategies)
}

/// Decode each entry on its own, so that one malformed entry does not hide
/// the others.
pub fn decode_entries<T: DeserializeOwned>(entries: &[Value]) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| match T::deserialize(entry) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::debug!("Dropping unreadable entry: {e}");
                None
            }
        })
        .collect()
}

/// Read an optional field, treating a value of the wrong shape as absent.
/// Use with `#[serde(default, deserialize_with = "lenient")]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            log::debug!("Ignoring unreadable field: {e}");
            Ok(None)
        }
    }
}

/// The section belonged to another kind.
pub fn wrong_section(section: &RawSection<'_>) -> Skip {
    match section {
        RawSection::Unrecognized => Skip::NotApplicable,
        _ => Skip::Unparsable("raw payload holds a different content kind".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_plain_text() {
        assert!(matches!(Input::sniff("## Flashcard 1"), Input::Text(_)));
    }

    #[test]
    fn test_sniff_non_object_json() {
        assert!(matches!(Input::sniff("[1, 2, 3]"), Input::Text(_)));
        assert!(matches!(Input::sniff("42"), Input::Text(_)));
    }

    #[test]
    fn test_sniff_empty_object() {
        match Input::sniff("{}") {
            Input::Envelope { raw, formatted, .. } => {
                assert!(raw.is_none());
                assert!(formatted.is_none());
            }
            Input::Text(_) => panic!("expected an envelope"),
        }
    }

    #[test]
    fn test_sniff_sections() {
        let input = Input::sniff(r#"{"raw": {"lesson_plans": [{}], "notes": []}, "formatted": "x"}"#);
        let Input::Envelope {
            raw: Some(raw),
            formatted,
            ..
        } = input
        else {
            panic!("expected a raw payload");
        };
        assert_eq!(formatted.as_deref(), Some("x"));
        assert!(matches!(
            raw.section(ContentKind::Lessons),
            RawSection::Lessons(e) if e.len() == 1
        ));
        assert!(matches!(raw.section(ContentKind::Notes), RawSection::Notes(e) if e.is_empty()));
        assert_eq!(raw.section(ContentKind::Concepts), RawSection::Unrecognized);
    }

    #[test]
    fn test_malformed_sibling_section_is_ignored() {
        let input = Input::sniff(
            r#"{"raw": {"concepts": [{"concept_name": "Osmosis"}], "notes": "oops"}, "formatted": 3}"#,
        );
        let Input::Envelope {
            raw: Some(raw),
            formatted,
            ..
        } = input
        else {
            panic!("expected a raw payload");
        };
        assert!(formatted.is_none());
        assert!(matches!(
            raw.section(ContentKind::Concepts),
            RawSection::Concepts(e) if e.len() == 1
        ));
        assert_eq!(raw.section(ContentKind::Notes), RawSection::Unrecognized);
    }

    #[test]
    fn test_lenient_field() -> Result<(), serde_json::Error> {
        #[derive(Deserialize)]
        struct Entry {
            #[serde(default, deserialize_with = "lenient")]
            points: Option<Vec<String>>,
        }
        let entry: Entry = serde_json::from_str(r#"{"points": ["a", 3]}"#)?;
        assert_eq!(entry.points, None);
        let entry: Entry = serde_json::from_str(r#"{"points": null}"#)?;
        assert_eq!(entry.points, None);
        let entry: Entry = serde_json::from_str("{}")?;
        assert_eq!(entry.points, None);
        let entry: Entry = serde_json::from_str(r#"{"points": ["a"]}"#)?;
        assert_eq!(entry.points, Some(vec!["a".to_string()]));
        Ok(())
    }

    #[test]
    fn test_first_non_empty_stops_at_first_hit() {
        fn nothing(_: &Input<'_>) -> Result<Vec<u8>, Skip> {
            Ok(Vec::new())
        }
        fn skip(_: &Input<'_>) -> Result<Vec<u8>, Skip> {
            Err(Skip::NotApplicable)
        }
        fn one(_: &Input<'_>) -> Result<Vec<u8>, Skip> {
            Ok(vec![1])
        }
        fn two(_: &Input<'_>) -> Result<Vec<u8>, Skip> {
            Ok(vec![2])
        }
        let input = Input::sniff("text");
        let strategies: [(ExtractionPath, Strategy<u8>); 4] = [
            (ExtractionPath::EmbeddedJson, skip),
            (ExtractionPath::FormattedMarkup, nothing),
            (ExtractionPath::RawMarkdown, one),
            (ExtractionPath::Empty, two),
        ];
        let extraction = first_non_empty(ContentKind::Notes, &input, &strategies);
        assert_eq!(extraction.records, vec![1]);
        assert_eq!(extraction.path, ExtractionPath::RawMarkdown);
    }

    #[test]
    fn test_first_non_empty_all_empty() {
        fn nothing(_: &Input<'_>) -> Result<Vec<u8>, Skip> {
            Ok(Vec::new())
        }
        let input = Input::sniff("text");
        let strategies: [(ExtractionPath, Strategy<u8>); 1] =
            [(ExtractionPath::EmbeddedJson, nothing)];
        let extraction = first_non_empty(ContentKind::Notes, &input, &strategies);
        assert_eq!(extraction, Extraction::empty());
    }
}

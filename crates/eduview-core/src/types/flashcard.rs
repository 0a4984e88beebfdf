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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashcardKind {
    Question,
    Note,
    Fact,
    #[default]
    Unspecified,
}

impl FlashcardKind {
    /// Read a kind label. Anything unrecognized is `Unspecified`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().trim_matches('*').trim().to_lowercase();
        match label.as_str() {
            "question" | "q" | "mcq" | "quiz" | "multiple choice" => FlashcardKind::Question,
            "note" | "notes" => FlashcardKind::Note,
            "fact" | "facts" => FlashcardKind::Fact,
            _ => FlashcardKind::Unspecified,
        }
    }
}

impl Display for FlashcardKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FlashcardKind::Question => write!(f, "question"),
            FlashcardKind::Note => write!(f, "note"),
            FlashcardKind::Fact => write!(f, "fact"),
            FlashcardKind::Unspecified => write!(f, "unspecified"),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Flashcard {
    front: String,
    back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    kind: FlashcardKind,
}

impl Flashcard {
    /// Build a card. Returns `None` when either side is blank, since such a
    /// card cannot be displayed.
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        options: Option<Vec<String>>,
        kind: FlashcardKind,
    ) -> Option<Self> {
        let front = front.into();
        let back = back.into();
        if front.trim().is_empty() || back.trim().is_empty() {
            return None;
        }
        let options = options.filter(|opts| !opts.is_empty());
        Some(Self {
            front,
            back,
            options,
            kind,
        })
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    pub fn kind(&self) -> FlashcardKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_side_is_rejected() {
        assert!(Flashcard::new("Front", "  ", None, FlashcardKind::Fact).is_none());
        assert!(Flashcard::new("", "Back", None, FlashcardKind::Fact).is_none());
    }

    #[test]
    fn test_empty_options_are_omitted() {
        let card = Flashcard::new("a", "b", Some(Vec::new()), FlashcardKind::Question).unwrap();
        assert_eq!(card.options(), None);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"front":"a","back":"b","kind":"question"}"#);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FlashcardKind::from_label("Question"), FlashcardKind::Question);
        assert_eq!(FlashcardKind::from_label(" **fact** "), FlashcardKind::Fact);
        assert_eq!(FlashcardKind::from_label("trivia"), FlashcardKind::Unspecified);
    }
}

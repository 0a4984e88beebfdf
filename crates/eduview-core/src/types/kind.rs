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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

/// The four kinds of generated content a viewer can display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[serde(alias = "flashcard", alias = "cards")]
    Flashcards,
    #[serde(alias = "note", alias = "short-notes")]
    Notes,
    #[serde(alias = "concept", alias = "concept-mastery")]
    Concepts,
    #[serde(alias = "lesson", alias = "lesson-plans")]
    Lessons,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Flashcards,
        ContentKind::Notes,
        ContentKind::Concepts,
        ContentKind::Lessons,
    ];

    /// The message shown when extraction produced nothing.
    pub fn empty_message(self) -> &'static str {
        match self {
            ContentKind::Flashcards => "No flashcards found",
            ContentKind::Notes => "No notes found",
            ContentKind::Concepts => "No concepts found",
            ContentKind::Lessons => "No lessons found",
        }
    }

    /// Human-readable name of a single record of this kind.
    pub fn singular(self) -> &'static str {
        match self {
            ContentKind::Flashcards => "card",
            ContentKind::Notes => "note",
            ContentKind::Concepts => "concept",
            ContentKind::Lessons => "lesson",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Flashcards => write!(f, "flashcards"),
            ContentKind::Notes => write!(f, "notes"),
            ContentKind::Concepts => write!(f, "concepts"),
            ContentKind::Lessons => write!(f, "lessons"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flashcards" | "flashcard" | "cards" => Ok(ContentKind::Flashcards),
            "notes" | "note" | "short-notes" => Ok(ContentKind::Notes),
            "concepts" | "concept" | "concept-mastery" => Ok(ContentKind::Concepts),
            "lessons" | "lesson" | "lesson-plans" => Ok(ContentKind::Lessons),
            _ => Err(ErrorReport::new(format!("Unknown content kind: '{s}'."))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_parse_aliases() -> Fallible<()> {
        assert_eq!("cards".parse::<ContentKind>()?, ContentKind::Flashcards);
        assert_eq!("Short-Notes".parse::<ContentKind>()?, ContentKind::Notes);
        assert_eq!("concept-mastery".parse::<ContentKind>()?, ContentKind::Concepts);
        assert_eq!(" lesson-plans ".parse::<ContentKind>()?, ContentKind::Lessons);
        Ok(())
    }

    #[test]
    fn test_deserialize_aliases() -> Fallible<()> {
        for kind in ContentKind::ALL {
            let name = serde_json::to_string(&kind)?;
            assert_eq!(serde_json::from_str::<ContentKind>(&name)?, kind);
        }
        assert_eq!(serde_json::from_str::<ContentKind>("\"cards\"")?, ContentKind::Flashcards);
        assert_eq!(serde_json::from_str::<ContentKind>("\"short-notes\"")?, ContentKind::Notes);
        assert_eq!(
            serde_json::from_str::<ContentKind>("\"concept-mastery\"")?,
            ContentKind::Concepts
        );
        assert_eq!(
            serde_json::from_str::<ContentKind>("\"lesson-plans\"")?,
            ContentKind::Lessons
        );
        Ok(())
    }

    #[test]
    fn test_parse_unknown() {
        assert!("quiz".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_display_round_trips() -> Fallible<()> {
        for kind in ContentKind::ALL {
            assert_eq!(kind.to_string().parse::<ContentKind>()?, kind);
        }
        Ok(())
    }
}

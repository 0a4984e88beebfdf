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

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unspecified,
}

impl Difficulty {
    pub fn is_unspecified(&self) -> bool {
        *self == Difficulty::Unspecified
    }

    /// Read a difficulty label such as `Medium` or `Advanced level`.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| label.contains(w));
        if has(&["easy", "beginner", "basic"]) {
            Difficulty::Easy
        } else if has(&["medium", "intermediate", "moderate"]) {
            Difficulty::Medium
        } else if has(&["hard", "advanced", "difficult"]) {
            Difficulty::Hard
        } else {
            Difficulty::Unspecified
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// A concept mastery card.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptCard {
    concept_name: String,
    #[serde(skip_serializing_if = "Difficulty::is_unspecified")]
    difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    lesson: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    real_example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_points: Option<Vec<String>>,
}

impl ConceptCard {
    /// Returns `None` if the concept name is blank.
    pub fn new(
        concept_name: impl Into<String>,
        difficulty: Difficulty,
        lesson: Option<String>,
        real_example: Option<String>,
        key_points: Option<Vec<String>>,
    ) -> Option<Self> {
        let concept_name = concept_name.into();
        if concept_name.trim().is_empty() {
            return None;
        }
        Some(Self {
            concept_name,
            difficulty,
            lesson,
            real_example,
            key_points,
        })
    }

    pub fn concept_name(&self) -> &str {
        &self.concept_name
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn lesson(&self) -> Option<&str> {
        self.lesson.as_deref()
    }

    pub fn real_example(&self) -> Option<&str> {
        self.real_example.as_deref()
    }

    pub fn key_points(&self) -> Option<&[String]> {
        self.key_points.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::from_label("Easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_label("Intermediate level"), Difficulty::Medium);
        assert_eq!(Difficulty::from_label("ADVANCED"), Difficulty::Hard);
        assert_eq!(Difficulty::from_label("???"), Difficulty::Unspecified);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let card = ConceptCard::new("Osmosis", Difficulty::Medium, None, None, None).unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"conceptName":"Osmosis","difficulty":"medium"}"#);
    }

    #[test]
    fn test_unspecified_difficulty_is_not_serialized() {
        let card = ConceptCard::new("Osmosis", Difficulty::Unspecified, None, None, None).unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"conceptName":"Osmosis"}"#);
    }
}

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

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::extract::Extraction;
use crate::extract::Extractor;
use crate::extract::RawSection;
use crate::extract::Skip;
use crate::extract::decode_entries;
use crate::extract::extract;
use crate::extract::lenient;
use crate::extract::markup::Fields;
use crate::extract::markup::Label;
use crate::extract::markup::Sentinels;
use crate::extract::markup::clean_title;
use crate::extract::markup::fields;
use crate::extract::markup::paragraph;
use crate::extract::markup::segment_name;
use crate::extract::markup::sentinel_segments;
use crate::extract::wrong_section;
use crate::markdown::markdown_sections;
use crate::types::concept::ConceptCard;
use crate::types::concept::Difficulty;
use crate::types::kind::ContentKind;

const SENTINELS: Sentinels = Sentinels {
    start: "__CONCEPT_CARD_START__",
    end: "__CONCEPT_CARD_END__",
};

const LABELS: &[Label] = &[
    Label {
        key: "concept name",
        aliases: &["concept", "name", "title"],
    },
    Label {
        key: "difficulty",
        aliases: &["level", "difficulty level"],
    },
    Label {
        key: "lesson",
        aliases: &["explanation", "the lesson", "concept explanation"],
    },
    Label {
        key: "real example",
        aliases: &[
            "real-world example",
            "real world example",
            "real-life example",
            "example",
        ],
    },
    Label {
        key: "key points",
        aliases: &["key takeaways", "main points", "takeaways"],
    },
];

static DIFFICULTY_BADGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class\s*=\s*"[^"]*difficulty[^"]*"[^>]*>\s*([^<]+?)\s*<"#)
        .expect("valid regex")
});

static DIFFICULTY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[(\[]\s*(easy|medium|hard|beginner|intermediate|advanced)\s*[)\]]\s*$")
        .expect("valid regex")
});

/// Concept mastery cards in every supported representation.
pub struct Concepts;

#[derive(Deserialize)]
struct RawConcept {
    #[serde(default, deserialize_with = "lenient", alias = "name", alias = "concept")]
    concept_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    lesson: Option<String>,
    #[serde(default, deserialize_with = "lenient", alias = "real_world_example")]
    real_example: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    key_points: Option<Vec<String>>,
}

impl Extractor for Concepts {
    type Record = ConceptCard;

    const KIND: ContentKind = ContentKind::Concepts;

    fn from_entries(section: RawSection<'_>) -> Result<Vec<ConceptCard>, Skip> {
        let entries: &[Value] = match section {
            RawSection::Concepts(entries) => entries,
            other @ (RawSection::Flashcards(_)
            | RawSection::Notes(_)
            | RawSection::Lessons(_)
            | RawSection::Unrecognized) => return Err(wrong_section(&other)),
        };
        Ok(decode_entries::<RawConcept>(entries)
            .into_iter()
            .filter_map(|raw| {
                let difficulty = raw
                    .difficulty
                    .as_deref()
                    .map(Difficulty::from_label)
                    .unwrap_or_default();
                ConceptCard::new(
                    raw.concept_name?,
                    difficulty,
                    raw.lesson,
                    raw.real_example,
                    raw.key_points,
                )
            })
            .collect())
    }

    fn from_markup(text: &str) -> Vec<ConceptCard> {
        sentinel_segments(text, &SENTINELS)
            .into_iter()
            .filter_map(|segment| {
                let fields = fields(segment, LABELS);
                let name = match segment_name(segment, LABELS) {
                    Some(name) => name,
                    None => fields.paragraph("concept name").map(|n| clean_title(&n))?,
                };
                build(name, segment, &fields, None)
            })
            .collect()
    }

    fn from_markdown(text: &str) -> Vec<ConceptCard> {
        markdown_sections(text)
            .into_iter()
            .filter_map(|section| {
                let fields = fields(section.body, LABELS);
                let lesson = if fields.is_empty() {
                    paragraph(section.body)
                } else {
                    None
                };
                build(clean_title(&section.title), section.body, &fields, lesson)
            })
            .collect()
    }
}

fn build(
    name: String,
    segment: &str,
    fields: &Fields<'_>,
    fallback_lesson: Option<String>,
) -> Option<ConceptCard> {
    let (name, suffix) = split_difficulty_suffix(&name);
    let difficulty = fields
        .paragraph("difficulty")
        .map(|label| Difficulty::from_label(&label))
        .or_else(|| {
            DIFFICULTY_BADGE
                .captures(segment)
                .map(|caps| Difficulty::from_label(&caps[1]))
        })
        .or(suffix)
        .unwrap_or_default();
    ConceptCard::new(
        name,
        difficulty,
        fields.paragraph("lesson").or(fallback_lesson),
        fields.paragraph("real example"),
        fields.list("key points"),
    )
}

/// Split `Osmosis (Medium)` into the name and its difficulty.
fn split_difficulty_suffix(name: &str) -> (String, Option<Difficulty>) {
    match DIFFICULTY_SUFFIX.captures(name) {
        Some(caps) => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(name.len());
            (
                name[..start].trim().to_string(),
                Some(Difficulty::from_label(&caps[1])),
            )
        }
        None => (name.to_string(), None),
    }
}

/// Read concept cards from a content string.
pub fn extract_concepts(content: &str) -> Extraction<ConceptCard> {
    extract::<Concepts>(content)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extract::ExtractionPath;

    #[test]
    fn test_embedded_json_count() {
        let input = json!({
            "raw": {"concepts": [
                {"concept_name": "Osmosis", "difficulty": "easy"},
                {"concept_name": "Diffusion", "difficulty": "medium"},
                {"concept_name": "Active transport", "difficulty": "hard"},
            ]},
            "formatted": "__CONCEPT_CARD_START__\n<h3>Ignored</h3>\n__CONCEPT_CARD_END__",
        })
        .to_string();
        let extraction = extract_concepts(&input);
        assert_eq!(extraction.path, ExtractionPath::EmbeddedJson);
        assert_eq!(extraction.records.len(), 3);
    }

    #[test]
    fn test_embedded_json_passthrough() {
        let input = json!({
            "raw": {"concepts": [{
                "concept_name": "Osmosis & you",
                "difficulty": "medium",
                "lesson": "Water moves <b>down</b> its gradient.",
                "real_example": "Raisins swell in water.",
                "key_points": ["Passive", "Needs a membrane"],
            }, {
                "concept_name": "Diffusion",
            }]},
        })
        .to_string();
        let records = extract_concepts(&input).records;
        let output = serde_json::to_value(&records).unwrap();
        assert_eq!(
            output,
            json!([{
                "conceptName": "Osmosis & you",
                "difficulty": "medium",
                "lesson": "Water moves <b>down</b> its gradient.",
                "realExample": "Raisins swell in water.",
                "keyPoints": ["Passive", "Needs a membrane"],
            }, {
                "conceptName": "Diffusion",
            }])
        );
    }

    #[test]
    fn test_malformed_sibling_section_keeps_concepts() {
        let input = r#"{"raw": {"concepts": [{"concept_name": "Osmosis"}], "notes": "oops"}}"#;
        let extraction = extract_concepts(input);
        assert_eq!(extraction.path, ExtractionPath::EmbeddedJson);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].concept_name(), "Osmosis");
    }

    #[test]
    fn test_malformed_optional_field_keeps_concept() {
        let input = json!({
            "raw": {"concepts": [{
                "concept_name": "Osmosis",
                "lesson": "Water moves.",
                "key_points": ["a", 3],
            }]},
        })
        .to_string();
        let extraction = extract_concepts(&input);
        assert_eq!(extraction.path, ExtractionPath::EmbeddedJson);
        assert_eq!(extraction.records.len(), 1);
        let card = &extraction.records[0];
        assert_eq!(card.lesson(), Some("Water moves."));
        assert_eq!(card.key_points(), None);
    }

    #[test]
    fn test_html_card() {
        let input = r#"__CONCEPT_CARD_START__
<h3>Newton's First Law</h3>
<span class="difficulty-badge">Intermediate</span>
<h4>Lesson</h4><p>Objects keep doing what they are doing.</p>
<h4>Real-World Example</h4><p>Passengers lurch forward when a bus brakes.</p>
<h4>Key Points</h4><ul><li>Inertia</li><li>Net force changes motion</li></ul>
__CONCEPT_CARD_END__"#;
        let card = &extract_concepts(input).records[0];
        assert_eq!(card.concept_name(), "Newton's First Law");
        assert_eq!(card.difficulty(), Difficulty::Medium);
        assert_eq!(card.lesson(), Some("Objects keep doing what they are doing."));
        assert_eq!(
            card.real_example(),
            Some("Passengers lurch forward when a bus brakes.")
        );
        assert_eq!(card.key_points().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_segments_without_names_yield_nothing() {
        let input = "__CONCEPT_CARD_START__\n<h4>Lesson</h4><p>a</p>\n__CONCEPT_CARD_END__\n__CONCEPT_CARD_START__\n<p>b</p>\n__CONCEPT_CARD_END__";
        let extraction = extract_concepts(input);
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.path, ExtractionPath::Empty);
    }

    #[test]
    fn test_markdown_fallback_with_suffix() {
        let input = "### Photosynthesis (Hard)\n**Lesson:** Light to sugar.\n**Example:** Leaves.\n### Respiration\nSugar to energy.\n";
        let extraction = extract_concepts(input);
        assert_eq!(extraction.path, ExtractionPath::RawMarkdown);
        let records = extraction.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].concept_name(), "Photosynthesis");
        assert_eq!(records[0].difficulty(), Difficulty::Hard);
        assert_eq!(records[0].real_example(), Some("Leaves."));
        assert_eq!(records[1].difficulty(), Difficulty::Unspecified);
        assert_eq!(records[1].lesson(), Some("Sugar to energy."));
    }
}

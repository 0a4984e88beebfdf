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
use crate::extract::markup::Sentinels;
use crate::extract::markup::heading_segments;
use crate::extract::markup::sentinel_segments;
use crate::extract::wrong_section;
use crate::text::decode_text;
use crate::types::flashcard::Flashcard;
use crate::types::flashcard::FlashcardKind;
use crate::types::kind::ContentKind;

const SENTINELS: Sentinels = Sentinels {
    start: "__FLASHCARD_START__",
    end: "__FLASHCARD_END__",
};

static CARD_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*#{1,3}[ \t]+(?:flash[ \t]*)?card\b[^\n]*$").expect("valid regex")
});

static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*|__)?[ \t]*",
        r"(?P<label>front|back|question|answer|type|card type|options|choices|q|a)",
        r"[ \t]*(?:\*\*|__)?[ \t]*:[ \t]*(?:\*\*|__)?[ \t]*(?P<rest>.*)$",
    ))
    .expect("valid regex")
});

static LETTERED_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*•][ \t]*)?\(?[A-Ha-h][).][ \t]+(?P<text>.+)$").expect("valid regex")
});

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*•+]|\d+[.)])[ \t]+(?P<text>.+)$").expect("valid regex")
});

/// Flashcards in every supported representation.
pub struct Flashcards;

#[derive(Deserialize)]
struct RawFlashcard {
    #[serde(default, deserialize_with = "lenient", alias = "question")]
    front: Option<String>,
    #[serde(default, deserialize_with = "lenient", alias = "answer")]
    back: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    options: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        rename = "type",
        alias = "kind",
        alias = "card_type"
    )]
    kind: Option<String>,
}

impl Extractor for Flashcards {
    type Record = Flashcard;

    const KIND: ContentKind = ContentKind::Flashcards;

    fn from_entries(section: RawSection<'_>) -> Result<Vec<Flashcard>, Skip> {
        let entries: &[Value] = match section {
            RawSection::Flashcards(entries) => entries,
            other @ (RawSection::Notes(_)
            | RawSection::Concepts(_)
            | RawSection::Lessons(_)
            | RawSection::Unrecognized) => return Err(wrong_section(&other)),
        };
        Ok(decode_entries::<RawFlashcard>(entries)
            .into_iter()
            .filter_map(|raw| {
                let kind = raw
                    .kind
                    .as_deref()
                    .map(FlashcardKind::from_label)
                    .unwrap_or_default();
                Flashcard::new(raw.front?, raw.back?, raw.options, kind)
            })
            .collect())
    }

    fn from_markup(text: &str) -> Vec<Flashcard> {
        let mut segments = sentinel_segments(text, &SENTINELS);
        if segments.is_empty() {
            segments = heading_segments(text, &CARD_HEADING);
        }
        if segments.is_empty() {
            log::debug!("No flashcard segments, reading line by line.");
            return read_lines(text);
        }
        segments.into_iter().flat_map(read_lines).collect()
    }

    fn from_markdown(text: &str) -> Vec<Flashcard> {
        read_lines(text)
    }
}

/// Read flashcards from a content string.
pub fn extract_flashcards(content: &str) -> Extraction<Flashcard> {
    extract::<Flashcards>(content)
}

enum Line {
    /// A line like `### Front:` or `Question: <text>`.
    StartFront(String),
    /// A line like `### Back:` or `**Answer:** <text>`.
    StartBack(String),
    /// A line like `**Type:** question`.
    Kind(FlashcardKind),
    /// A line like `**Options:**`.
    StartOptions,
    /// A card heading, sentinel or `---`.
    Separator,
    /// Any other line.
    Text(String),
}

impl Line {
    fn read(line: &str) -> Self {
        if is_separator(line) {
            return Line::Separator;
        }
        if let Some(caps) = LABEL_LINE.captures(line) {
            let rest = caps["rest"].trim().to_string();
            match caps["label"].to_lowercase().as_str() {
                "front" | "question" | "q" => return Line::StartFront(rest),
                "back" | "answer" | "a" => return Line::StartBack(rest),
                "type" | "card type" => return Line::Kind(FlashcardKind::from_label(&rest)),
                _ => {
                    if rest.is_empty() {
                        return Line::StartOptions;
                    }
                }
            }
        }
        Line::Text(line.to_string())
    }
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "---"
        || trimmed == SENTINELS.start
        || trimmed == SENTINELS.end
        || CARD_HEADING.is_match(line)
}

enum State {
    /// Between cards.
    Initial { kind: FlashcardKind },
    /// Reading the front of a card.
    ReadingFront {
        front: String,
        options: Option<Vec<String>>,
        kind: FlashcardKind,
    },
    /// Reading the back of a card.
    ReadingBack {
        front: String,
        back: String,
        options: Option<Vec<String>>,
        kind: FlashcardKind,
    },
}

/// Read cards line by line, watching for front/back markers. Malformed
/// input never fails: a card missing a side is dropped.
fn read_lines(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut state = State::Initial {
        kind: FlashcardKind::Unspecified,
    };
    for line in text.lines() {
        state = parse_line(state, Line::read(line), &mut cards);
    }
    finalize(state, &mut cards);
    cards
}

fn parse_line(state: State, line: Line, cards: &mut Vec<Flashcard>) -> State {
    match state {
        State::Initial { kind } => match line {
            Line::StartFront(text) => State::ReadingFront {
                front: text,
                options: None,
                kind,
            },
            Line::Kind(kind) => State::Initial { kind },
            Line::Separator => State::Initial {
                kind: FlashcardKind::Unspecified,
            },
            // Backs without a front and stray text are ignored.
            Line::StartBack(_) | Line::StartOptions | Line::Text(_) => State::Initial { kind },
        },
        State::ReadingFront {
            front,
            options,
            kind,
        } => match line {
            Line::StartFront(text) => {
                // A front marker before any back continues the same card, as
                // in `### Front:` followed by `**Question:** ...`.
                let front = if front.trim().is_empty() {
                    text
                } else {
                    join(front, text)
                };
                State::ReadingFront {
                    front,
                    options,
                    kind,
                }
            }
            Line::StartBack(text) => State::ReadingBack {
                front,
                back: text,
                options,
                kind,
            },
            Line::Kind(kind) => State::ReadingFront {
                front,
                options,
                kind,
            },
            Line::StartOptions => State::ReadingFront {
                front,
                options: Some(options.unwrap_or_default()),
                kind,
            },
            Line::Separator => State::Initial {
                kind: FlashcardKind::Unspecified,
            },
            Line::Text(text) => {
                let (front, options) = read_front_line(front, options, &text);
                State::ReadingFront {
                    front,
                    options,
                    kind,
                }
            }
        },
        State::ReadingBack {
            front,
            back,
            options,
            kind,
        } => match line {
            Line::StartFront(text) => {
                // Finalize the previous card.
                push_card(cards, front, back, options, kind);
                // Start a new card, keeping the kind of the previous one.
                State::ReadingFront {
                    front: text,
                    options: None,
                    kind,
                }
            }
            Line::StartBack(text) => {
                // `### Back:` followed by `**Answer:** ...`.
                let back = if back.trim().is_empty() {
                    text
                } else {
                    join(back, text)
                };
                State::ReadingBack {
                    front,
                    back,
                    options,
                    kind,
                }
            }
            Line::Kind(next_kind) => {
                // A type line after a complete card introduces the next one.
                push_card(cards, front, back, options, kind);
                State::Initial { kind: next_kind }
            }
            Line::Separator => {
                push_card(cards, front, back, options, kind);
                State::Initial {
                    kind: FlashcardKind::Unspecified,
                }
            }
            Line::StartOptions => State::ReadingBack {
                front,
                back,
                options,
                kind,
            },
            Line::Text(text) => State::ReadingBack {
                front,
                back: join(back, text),
                options,
                kind,
            },
        },
    }
}

fn finalize(state: State, cards: &mut Vec<Flashcard>) {
    match state {
        State::Initial { .. } => {}
        State::ReadingFront { .. } => {
            log::debug!("Input ended while reading the front of a card.");
        }
        State::ReadingBack {
            front,
            back,
            options,
            kind,
        } => push_card(cards, front, back, options, kind),
    }
}

/// Sort a front line into the question text or the option list.
fn read_front_line(
    front: String,
    options: Option<Vec<String>>,
    line: &str,
) -> (String, Option<Vec<String>>) {
    if let Some(caps) = LETTERED_OPTION.captures(line) {
        let mut options = options.unwrap_or_default();
        options.push(decode_text(&caps["text"]));
        return (front, Some(options));
    }
    if let Some(mut collected) = options {
        if let Some(caps) = BULLET.captures(line) {
            collected.push(decode_text(&caps["text"]));
            return (front, Some(collected));
        }
        return (join(front, line.to_string()), Some(collected));
    }
    (join(front, line.to_string()), None)
}

/// Append a non-blank line.
fn join(text: String, line: String) -> String {
    let line = line.trim();
    if line.is_empty() {
        text
    } else if text.trim().is_empty() {
        line.to_string()
    } else {
        format!("{text}\n{line}")
    }
}

fn push_card(
    cards: &mut Vec<Flashcard>,
    front: String,
    back: String,
    options: Option<Vec<String>>,
    kind: FlashcardKind,
) {
    let options = options.map(|opts| opts.into_iter().filter(|o| !o.is_empty()).collect());
    match Flashcard::new(decode_text(&front), decode_text(&back), options, kind) {
        Some(card) => cards.push(card),
        None => log::debug!("Dropping flashcard with an empty side."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionPath;

    #[test]
    fn test_empty_string() {
        let extraction = extract_flashcards("");
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.path, ExtractionPath::Empty);
    }

    #[test]
    fn test_empty_json_object() {
        let extraction = extract_flashcards("{}");
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.path, ExtractionPath::Empty);
    }

    #[test]
    fn test_heading_card() {
        let input = "## Flashcard 1\n**Type:** question\n### Front:\n\nWhat is 2+2?\n\n### Back:\n\n**Answer:** 4";
        let extraction = extract_flashcards(input);
        assert_eq!(extraction.path, ExtractionPath::FormattedMarkup);
        assert_eq!(extraction.records.len(), 1);
        let card = &extraction.records[0];
        assert_eq!(card.front(), "What is 2+2?");
        assert_eq!(card.back(), "4");
        assert_eq!(card.kind(), FlashcardKind::Question);
        assert_eq!(card.options(), None);
    }

    #[test]
    fn test_two_heading_cards() {
        let input = "# Deck\n\n## Flashcard 1\n**Type:** fact\n### Front:\nWater boils at\n### Back:\n100 °C\n\n## Flashcard 2\n**Type:** note\n### Front:\nMitochondria\n### Back:\nThe powerhouse\nof the cell\n";
        let cards = extract_flashcards(input).records;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].kind(), FlashcardKind::Fact);
        assert_eq!(cards[0].back(), "100 °C");
        assert_eq!(cards[1].kind(), FlashcardKind::Note);
        assert_eq!(cards[1].back(), "The powerhouse\nof the cell");
    }

    #[test]
    fn test_options() {
        let input = "## Flashcard 1\n**Type:** question\n### Front:\nCapital of France?\n**Options:**\n- Paris\n- Rome\nB) Berlin\n### Back:\nParis";
        let cards = extract_flashcards(input).records;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front(), "Capital of France?");
        assert_eq!(
            cards[0].options(),
            Some(&["Paris".to_string(), "Rome".to_string(), "Berlin".to_string()][..])
        );
    }

    #[test]
    fn test_sentinel_segments() {
        let input = "__FLASHCARD_START__\nFront: Q1\nBack: A1\n__FLASHCARD_END__\n__FLASHCARD_START__\nFront: Q2\n__FLASHCARD_END__";
        let cards = extract_flashcards(input).records;
        // The second card has no back and is dropped.
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front(), "Q1");
        assert_eq!(cards[0].back(), "A1");
    }

    #[test]
    fn test_line_fallback_without_segments() {
        let input = "Question: What is H2O?\nAnswer: Water\n\nQuestion: What is NaCl?\nAnswer: Salt";
        let cards = extract_flashcards(input).records;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].front(), "What is NaCl?");
        assert_eq!(cards[1].back(), "Salt");
    }

    #[test]
    fn test_short_markers() {
        let input = "Q: Largest planet?\nA: Jupiter\n---\nQ: Smallest planet?\nA: Mercury\n";
        let cards = extract_flashcards(input).records;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front(), "Largest planet?");
        assert_eq!(cards[1].back(), "Mercury");
    }

    #[test]
    fn test_repeated_front_marker_continues_card() {
        let cards = extract_flashcards("Q: Largest\nQ: planet?\nA: Jupiter\n").records;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front(), "Largest\nplanet?");
        assert_eq!(cards[0].back(), "Jupiter");
    }

    #[test]
    fn test_card_without_back_is_dropped() {
        let input = "## Flashcard 1\n### Front:\nLonely question\n### Back:\n\n";
        assert!(extract_flashcards(input).records.is_empty());
    }

    #[test]
    fn test_html_entities_in_markup() {
        let input = "## Flashcard 1\n### Front:\nSalt &amp; pepper?\n### Back:\nYes<br>both";
        let cards = extract_flashcards(input).records;
        assert_eq!(cards[0].front(), "Salt & pepper?");
        assert_eq!(cards[0].back(), "Yes\nboth");
    }

    #[test]
    fn test_embedded_json_wins() {
        let input = r###"{"raw": {"flashcards": [{"front": "A &amp; B", "back": "b", "type": "fact"}, {"front": "no back"}]}, "formatted": "## Flashcard 1\n### Front:\nx\n### Back:\ny"}"###;
        let extraction = extract_flashcards(input);
        assert_eq!(extraction.path, ExtractionPath::EmbeddedJson);
        assert_eq!(extraction.records.len(), 1);
        // Structured entries are passed through without decoding.
        assert_eq!(extraction.records[0].front(), "A &amp; B");
        assert_eq!(extraction.records[0].kind(), FlashcardKind::Fact);
    }

    #[test]
    fn test_formatted_field() {
        let input = r###"{"formatted": "## Flashcard 1\n### Front:\nx\n### Back:\ny"}"###;
        let extraction = extract_flashcards(input);
        assert_eq!(extraction.path, ExtractionPath::FormattedMarkup);
        assert_eq!(extraction.records[0].front(), "x");
    }
}

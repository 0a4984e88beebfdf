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

//! Building blocks shared by the markup extractors: splitting content into
//! segments, finding a segment's name, and reading labelled fields.

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::text::decode_nonempty;
use crate::text::decode_text;

/// A pair of literal lines bounding one record.
pub struct Sentinels {
    pub start: &'static str,
    pub end: &'static str,
}

/// A field label and the spellings it is written with.
pub struct Label {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
}

impl Label {
    fn matches(&self, normalized: &str) -> bool {
        self.key == normalized || self.aliases.contains(&normalized)
    }
}

static NAME_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-3][^>]*>(.*?)</h[1-3]\s*>").expect("valid regex"));

static NAME_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,3}[ \t]+(.+?)[ \t#]*$").expect("valid regex"));

static FIELD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?im)<h[2-6][^>]*>[ \t]*(?P<tag>[^<]+?)[ \t]*</h[2-6]\s*>",
        r"|^[ \t]*#{2,6}[ \t]+(?P<heading>[^\n]+?)[ \t#]*$",
        r"|(?:<strong>|<b>|\*\*)[ \t]*(?P<bold>[^<*\n:]+?)[ \t]*:?[ \t]*(?:</strong>|</b>|\*\*)[ \t]*:?",
        r"|^[ \t]*(?P<plain>[A-Za-z][A-Za-z /&()0-9\-]*?)[ \t]*:",
    ))
    .expect("valid regex")
});

static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[(\[]?\s*[-–:]?\s*(\d+)\s*(?:min|mins|minutes|minute)\b\.?\s*[)\]]?\s*$")
        .expect("valid regex")
});

static NUMBERING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:lesson|concept|note|card|flashcard|topic|unit)\s*(?:plan\s*)?#?\s*\d+\s*[:.)\-–—]?\s*|\d+\s*[.):\-–—]\s*)",
    )
    .expect("valid regex")
});

static LIST_ITEM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li\s*>").expect("valid regex"));

static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•+]|\d+[.)]|[a-zA-Z][.)])\s+(.+)$").expect("valid regex")
});

/// Split `text` into the segments bounded by `sentinels`.
///
/// A start marker without a matching end marker runs until the next start
/// marker or the end of the input.
pub fn sentinel_segments<'a>(text: &'a str, sentinels: &Sentinels) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(sentinels.start) {
        let after = &rest[pos + sentinels.start.len()..];
        let end = after.find(sentinels.end);
        let next_start = after.find(sentinels.start);
        let (len, consumed) = match (end, next_start) {
            (Some(e), Some(s)) if s < e => (s, s),
            (Some(e), _) => (e, e + sentinels.end.len()),
            (None, Some(s)) => (s, s),
            (None, None) => (after.len(), after.len()),
        };
        segments.push(&after[..len]);
        rest = &after[consumed..];
    }
    segments
}

/// Split `text` at every match of `heading`. Each segment is the text
/// between one heading and the next; text before the first heading is
/// discarded.
pub fn heading_segments<'a>(text: &'a str, heading: &Regex) -> Vec<&'a str> {
    let matches: Vec<_> = heading.find_iter(text).collect();
    matches
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let end = matches
                .get(idx + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            &text[m.end()..end]
        })
        .collect()
}

/// Strip markup, numbering prefixes and trailing colons from a heading.
pub fn clean_title(raw: &str) -> String {
    let text = decode_text(raw);
    let text = text.trim().trim_matches('*').trim();
    let text = NUMBERING.replace(text, "");
    text.trim().trim_end_matches(':').trim().to_string()
}

/// Lowercase a label and pull out a trailing time such as `(10 minutes)`.
fn normalize_label(raw: &str) -> (String, Option<u32>) {
    let text = decode_text(raw);
    let text = text
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .trim_end_matches(':')
        .trim();
    let (text, minutes) = match TIME_SUFFIX.captures(text) {
        Some(caps) => {
            let minutes = caps[1].parse::<u32>().ok();
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
            (&text[..whole], minutes)
        }
        None => (text, None),
    };
    let text = NUMBERING.replace(text.trim(), "");
    let text = text
        .trim()
        .trim_end_matches(':')
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (text, minutes)
}

/// Whether `text` is written as one of `labels`.
pub fn is_label(text: &str, labels: &[Label]) -> bool {
    let (normalized, _) = normalize_label(text);
    labels.iter().any(|label| label.matches(&normalized))
}

/// The first heading of a segment that is not one of `labels`.
pub fn segment_name(segment: &str, labels: &[Label]) -> Option<String> {
    let mut candidates: Vec<(usize, &str)> = NAME_TAG
        .captures_iter(segment)
        .chain(NAME_HEADING.captures_iter(segment))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some((whole.start(), inner.as_str()))
        })
        .collect();
    candidates.sort_by_key(|(pos, _)| *pos);
    candidates.into_iter().find_map(|(_, raw)| {
        if is_label(raw, labels) {
            return None;
        }
        let title = clean_title(raw);
        if title.is_empty() { None } else { Some(title) }
    })
}

/// A labelled section of a segment.
#[derive(Debug, PartialEq)]
pub struct Field<'a> {
    pub key: &'static str,
    pub time_minutes: Option<u32>,
    pub body: &'a str,
}

/// The labelled sections of a segment, in order of appearance.
#[derive(Debug)]
pub struct Fields<'a> {
    pub preamble: &'a str,
    fields: Vec<Field<'a>>,
}

/// Read the labelled sections of `segment`. Only labels listed in `labels`
/// start a new section; anything else stays in the surrounding body.
pub fn fields<'a>(segment: &'a str, labels: &[Label]) -> Fields<'a> {
    let mut found: Vec<(usize, usize, &'static str, Option<u32>)> = Vec::new();
    for caps in FIELD_LABEL.captures_iter(segment) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(raw) = label_text(&caps) else {
            continue;
        };
        let (normalized, minutes) = normalize_label(raw);
        if let Some(label) = labels.iter().find(|label| label.matches(&normalized)) {
            found.push((whole.start(), whole.end(), label.key, minutes));
        }
    }
    let preamble = match found.first() {
        Some((start, ..)) => &segment[..*start],
        None => segment,
    };
    let fields = found
        .iter()
        .enumerate()
        .map(|(idx, (_, end, key, minutes))| {
            let stop = found
                .get(idx + 1)
                .map(|(next_start, ..)| *next_start)
                .unwrap_or(segment.len());
            Field {
                key: *key,
                time_minutes: *minutes,
                body: &segment[*end..stop],
            }
        })
        .collect();
    Fields { preamble, fields }
}

fn label_text<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    ["tag", "heading", "bold", "plain"]
        .iter()
        .find_map(|name| caps.name(name))
        .map(|m| m.as_str())
}

impl<'a> Fields<'a> {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first section with the given key.
    pub fn get(&self, key: &str) -> Option<&Field<'a>> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn paragraph(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|field| paragraph(field.body))
    }

    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(|field| list_or_paragraph(field.body))
    }
}

/// A section body as one cleaned-up string.
pub fn paragraph(body: &str) -> Option<String> {
    decode_nonempty(body)
}

/// The items of a list, written either as `<li>` elements or as bullet
/// lines. Empty when the body holds no list.
pub fn list_items(body: &str) -> Vec<String> {
    if LIST_ITEM_TAG.is_match(body) {
        return LIST_ITEM_TAG
            .captures_iter(body)
            .filter_map(|caps| decode_nonempty(&caps[1]))
            .collect();
    }
    body.lines()
        .filter_map(|line| BULLET_LINE.captures(line))
        .filter_map(|caps| decode_nonempty(&caps[1]))
        .collect()
}

/// List items if there are any, otherwise the body as a single item.
pub fn list_or_paragraph(body: &str) -> Option<Vec<String>> {
    let items = list_items(body);
    if !items.is_empty() {
        return Some(items);
    }
    paragraph(body).map(|text| vec![text])
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &[Label] = &[
        Label {
            key: "summary",
            aliases: &[],
        },
        Label {
            key: "quick facts",
            aliases: &["key facts"],
        },
        Label {
            key: "introduction",
            aliases: &[],
        },
    ];

    const NOTES: Sentinels = Sentinels {
        start: "__NOTE_CARD_START__",
        end: "__NOTE_CARD_END__",
    };

    #[test]
    fn test_sentinel_segments() {
        let text = "junk __NOTE_CARD_START__ a __NOTE_CARD_END__ more __NOTE_CARD_START__ b __NOTE_CARD_END__";
        let segments = sentinel_segments(text, &NOTES);
        assert_eq!(segments, vec![" a ", " b "]);
    }

    #[test]
    fn test_sentinel_segment_without_end() {
        let text = "__NOTE_CARD_START__ a __NOTE_CARD_START__ b";
        let segments = sentinel_segments(text, &NOTES);
        assert_eq!(segments, vec![" a ", " b"]);
    }

    #[test]
    fn test_heading_segments() {
        let heading = Regex::new(r"(?m)^##\s+Card\s+\d+\s*$").unwrap();
        let text = "intro\n## Card 1\none\n## Card 2\ntwo\n";
        let segments = heading_segments(text, &heading);
        assert_eq!(segments, vec!["\none\n", "\ntwo\n"]);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Lesson 2: Fractions"), "Fractions");
        assert_eq!(clean_title("3. Osmosis:"), "Osmosis");
        assert_eq!(clean_title("<strong>Cells &amp; Tissues</strong>"), "Cells & Tissues");
    }

    #[test]
    fn test_segment_name_skips_labels() {
        let segment = "<h3>Summary</h3><p>x</p>";
        assert_eq!(segment_name(segment, LABELS), None);
        let segment = "\n### 1. Osmosis\n#### Summary\nWater.";
        assert_eq!(segment_name(segment, LABELS), Some("Osmosis".to_string()));
    }

    #[test]
    fn test_html_fields() {
        let segment = "<h3>Osmosis</h3><h4>Summary</h4><p>Water moves.</p><h4>Key Facts</h4><ul><li>One</li><li>Two</li></ul>";
        let fields = fields(segment, LABELS);
        assert_eq!(fields.paragraph("summary"), Some("Water moves.".to_string()));
        assert_eq!(
            fields.list("quick facts"),
            Some(vec!["One".to_string(), "Two".to_string()])
        );
    }

    #[test]
    fn test_bold_and_plain_fields() {
        let segment = "**Summary:** Water moves.\nQuick Facts:\n- One\n- Two\n";
        let fields = fields(segment, LABELS);
        assert_eq!(fields.paragraph("summary"), Some("Water moves.".to_string()));
        assert_eq!(
            fields.list("quick facts"),
            Some(vec!["One".to_string(), "Two".to_string()])
        );
    }

    #[test]
    fn test_unknown_labels_stay_in_body() {
        let segment = "**Summary:** Water **Note:** moves.";
        let fields = fields(segment, LABELS);
        assert_eq!(
            fields.paragraph("summary"),
            Some("Water **Note:** moves.".to_string())
        );
    }

    #[test]
    fn test_time_suffix() {
        let segment = "#### Introduction (10 minutes)\n- Warm up\n";
        let fields = fields(segment, LABELS);
        let field = fields.get("introduction").unwrap();
        assert_eq!(field.time_minutes, Some(10));
        assert_eq!(list_items(field.body), vec!["Warm up".to_string()]);
    }

    #[test]
    fn test_absent_field() {
        let fields = fields("**Summary:** x", LABELS);
        assert_eq!(fields.list("quick facts"), None);
    }
}

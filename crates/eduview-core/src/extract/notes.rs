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

use serde::Deserialize;
use serde_json::Value;

use crate::extract::Extraction;
use crate::extract::Extractor;
use crate::extract::RawSection;
use crate::extract::Skip;
use crate::extract::decode_entries;
use crate::extract::extract;
use crate::extract::lenient;
use crate::extract::markup::Label;
use crate::extract::markup::Sentinels;
use crate::extract::markup::clean_title;
use crate::extract::markup::fields;
use crate::extract::markup::paragraph;
use crate::extract::markup::segment_name;
use crate::extract::markup::sentinel_segments;
use crate::extract::wrong_section;
use crate::markdown::markdown_sections;
use crate::types::kind::ContentKind;
use crate::types::note::ShortNote;

const SENTINELS: Sentinels = Sentinels {
    start: "__NOTE_CARD_START__",
    end: "__NOTE_CARD_END__",
};

const LABELS: &[Label] = &[
    Label {
        key: "concept name",
        aliases: &["concept", "name", "title", "topic"],
    },
    Label {
        key: "summary",
        aliases: &["overview", "definition"],
    },
    Label {
        key: "importance",
        aliases: &["why it matters", "why it's important", "significance"],
    },
    Label {
        key: "quick facts",
        aliases: &["key facts", "facts", "remember"],
    },
];

/// Short revision notes in every supported representation.
pub struct Notes;

#[derive(Deserialize)]
struct RawNote {
    #[serde(
        default,
        deserialize_with = "lenient",
        alias = "name",
        alias = "title",
        alias = "concept"
    )]
    concept_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    importance: Option<String>,
    #[serde(default, deserialize_with = "lenient", alias = "key_facts")]
    quick_facts: Option<Vec<String>>,
}

impl Extractor for Notes {
    type Record = ShortNote;

    const KIND: ContentKind = ContentKind::Notes;

    fn from_entries(section: RawSection<'_>) -> Result<Vec<ShortNote>, Skip> {
        let entries: &[Value] = match section {
            RawSection::Notes(entries) => entries,
            other @ (RawSection::Flashcards(_)
            | RawSection::Concepts(_)
            | RawSection::Lessons(_)
            | RawSection::Unrecognized) => return Err(wrong_section(&other)),
        };
        Ok(decode_entries::<RawNote>(entries)
            .into_iter()
            .filter_map(|raw| {
                ShortNote::new(raw.concept_name?, raw.summary, raw.importance, raw.quick_facts)
            })
            .collect())
    }

    fn from_markup(text: &str) -> Vec<ShortNote> {
        sentinel_segments(text, &SENTINELS)
            .into_iter()
            .filter_map(note_from_segment)
            .collect()
    }

    fn from_markdown(text: &str) -> Vec<ShortNote> {
        markdown_sections(text)
            .into_iter()
            .filter_map(|section| {
                let fields = fields(section.body, LABELS);
                let summary = if fields.is_empty() {
                    paragraph(section.body)
                } else {
                    fields.paragraph("summary")
                };
                ShortNote::new(
                    clean_title(&section.title),
                    summary,
                    fields.paragraph("importance"),
                    fields.list("quick facts"),
                )
            })
            .collect()
    }
}

fn note_from_segment(segment: &str) -> Option<ShortNote> {
    let fields = fields(segment, LABELS);
    let name = match segment_name(segment, LABELS) {
        Some(name) => name,
        None => fields.paragraph("concept name").map(|name| clean_title(&name))?,
    };
    ShortNote::new(
        name,
        fields.paragraph("summary"),
        fields.paragraph("importance"),
        fields.list("quick facts"),
    )
}

/// Read short notes from a content string.
pub fn extract_notes(content: &str) -> Extraction<ShortNote> {
    extract::<Notes>(content)
}

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


use eduview_core::error::Fallible;
use eduview_core::error::fail;
use eduview_core::extract::Extraction;
use eduview_core::extract::concepts::extract_concepts;
use eduview_core::extract::flashcards::extract_flashcards;
use eduview_core::extract::lessons::extract_lessons_with_raw;
use eduview_core::extract::notes::extract_notes;
use eduview_core::types::kind::ContentKind;
use serde::Serialize;
use serde_json::Value;

use crate::cmd::content::ContentFile;
use crate::cmd::content::read_raw_content;

pub fn extract_file(
    file: String,
    kind: Option<ContentKind>,
    raw_content: Option<String>,
) -> Fallible<()> {
    let content = ContentFile::read(&file)?;
    let Some(kind) = content.resolve_kind(kind) else {
        return fail("could not tell what kind of content this is; pass --kind.");
    };
    let raw = read_raw_content(raw_content)?;
    if raw.is_some() && kind != ContentKind::Lessons {
        log::warn!("Raw content is only read for lessons; ignoring it for {kind}.");
    }
    let json = records_json(kind, &content.body, raw.as_ref())?;
    println!("{json}");
    Ok(())
}

/// The records of `content` as pretty-printed JSON.
pub fn records_json(kind: ContentKind, content: &str, raw: Option<&Value>) -> Fallible<String> {
    match kind {
        ContentKind::Flashcards => to_json(kind, extract_flashcards(content)),
        ContentKind::Notes => to_json(kind, extract_notes(content)),
        ContentKind::Concepts => to_json(kind, extract_concepts(content)),
        ContentKind::Lessons => to_json(kind, extract_lessons_with_raw(content, raw)),
    }
}

fn to_json<T: Serialize>(kind: ContentKind, extraction: Extraction<T>) -> Fallible<String> {
    log::info!(
        "Extracted {} {kind} via {}.",
        extraction.records.len(),
        extraction.path
    );
    Ok(serde_json::to_string_pretty(&extraction.records)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flashcards_json() -> Fallible<()> {
        let content = "Q: What is 2+2?\nA: 4\n";
        let text = records_json(ContentKind::Flashcards, content, None)?;
        let value: Value = serde_json::from_str(&text)?;
        assert_eq!(
            value,
            json!([{"front": "What is 2+2?", "back": "4", "kind": "unspecified"}])
        );
        Ok(())
    }

    #[test]
    fn test_nothing_extracted() -> Fallible<()> {
        assert_eq!(records_json(ContentKind::Notes, "{}", None)?, "[]");
        Ok(())
    }

    #[test]
    fn test_lessons_from_raw() -> Fallible<()> {
        let raw = json!([{"lesson_name": "Fractions"}]);
        let text = records_json(ContentKind::Lessons, "", Some(&raw))?;
        assert!(text.contains("Fractions"));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = extract_file("./derpherp.md".to_string(), None, None);
        assert!(result.is_err());
    }
}

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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::kind::ContentKind;

/// Metadata that can be specified at the top of a content file.
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct ContentMetadata {
    pub kind: Option<ContentKind>,
    pub title: Option<String>,
}

/// Extract TOML frontmatter from the top of a content file.
/// Returns (metadata, content_without_frontmatter).
///
/// `---` is also a card separator, so a leading block that is unterminated
/// or is not TOML is left in the content. A block that is TOML but holds
/// invalid metadata is an error.
pub fn extract_frontmatter(text: &str) -> Fallible<(ContentMetadata, &str)> {
    let mut lines = text.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(line) if line.trim() == "---" => line.len(),
        _ => return Ok((ContentMetadata::default(), text)),
    };

    let mut block = String::new();
    let mut body_start = None;
    for line in lines {
        offset += line.len();
        if line.trim() == "---" {
            body_start = Some(offset);
            break;
        }
        block.push_str(line);
    }
    let Some(body_start) = body_start else {
        return Ok((ContentMetadata::default(), text));
    };

    let table: toml::Table = match toml::from_str(&block) {
        Ok(table) => table,
        Err(e) => {
            log::debug!("Leading block is not TOML frontmatter: {e}");
            return Ok((ContentMetadata::default(), text));
        }
    };
    let metadata: ContentMetadata = toml::Value::Table(table)
        .try_into()
        .map_err(|e| ErrorReport::new(format!("Failed to parse TOML frontmatter: {e}")))?;
    Ok((metadata, &text[body_start..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_kind_alias() -> Fallible<()> {
        let (metadata, _) = extract_frontmatter("---\nkind = \"cards\"\n---\nQ: a\nA: b\n")?;
        assert_eq!(metadata.kind, Some(ContentKind::Flashcards));
        Ok(())
    }

    #[test]
    fn test_frontmatter_with_kind_and_title() -> Fallible<()> {
        let input = "---\nkind = \"notes\"\ntitle = \"Cells\"\n---\n\n## Osmosis\nWater.";
        let (metadata, content) = extract_frontmatter(input)?;
        assert_eq!(metadata.kind, Some(ContentKind::Notes));
        assert_eq!(metadata.title, Some("Cells".to_string()));
        assert_eq!(content.trim(), "## Osmosis\nWater.");
        Ok(())
    }

    #[test]
    fn test_empty_frontmatter() -> Fallible<()> {
        let input = "---\n---\nQ: What is Rust?\nA: A language.";
        let (metadata, content) = extract_frontmatter(input)?;
        assert_eq!(metadata, ContentMetadata::default());
        assert_eq!(content, "Q: What is Rust?\nA: A language.");
        Ok(())
    }

    #[test]
    fn test_no_frontmatter() -> Fallible<()> {
        let input = "## Flashcard 1\nFront: a";
        let (metadata, content) = extract_frontmatter(input)?;
        assert_eq!(metadata, ContentMetadata::default());
        assert_eq!(content, input);
        Ok(())
    }

    #[test]
    fn test_separator_is_not_frontmatter() -> Fallible<()> {
        let input = "---\nQ: What is Rust?\nA: A language.\n---\nQ: Next";
        let (metadata, content) = extract_frontmatter(input)?;
        assert_eq!(metadata, ContentMetadata::default());
        assert_eq!(content, input);
        Ok(())
    }

    #[test]
    fn test_invalid_kind() {
        let input = "---\nkind = \"quizzes\"\n---\nbody";
        assert!(extract_frontmatter(input).is_err());
    }
}

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


use std::fs::read_to_string;
use std::path::Path;

use eduview_core::config::ViewerConfig;
use eduview_core::error::Fallible;
use eduview_core::error::fail;
use eduview_core::extract::ExtractionPath;
use eduview_core::frontmatter::ContentMetadata;
use eduview_core::frontmatter::extract_frontmatter;
use eduview_core::types::kind::ContentKind;
use eduview_core::viewer::Viewer;
use serde_json::Value;

/// A content file, split into its frontmatter and its body.
pub struct ContentFile {
    pub metadata: ContentMetadata,
    pub body: String,
}

impl ContentFile {
    pub fn read(path: impl AsRef<Path>) -> Fallible<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return fail("file does not exist.");
        }
        let text = read_to_string(path)?;
        let (metadata, body) = extract_frontmatter(&text)?;
        Ok(Self {
            metadata,
            body: body.to_string(),
        })
    }

    /// The kind to read this file as: the flag, then the frontmatter, then
    /// whichever kind reads best.
    pub fn resolve_kind(&self, flag: Option<ContentKind>) -> Option<ContentKind> {
        flag.or(self.metadata.kind)
            .or_else(|| guess_kind(&self.body))
    }
}

fn rank(path: ExtractionPath) -> Option<u8> {
    match path {
        ExtractionPath::RawContent => Some(0),
        ExtractionPath::EmbeddedJson => Some(1),
        ExtractionPath::FormattedMarkup => Some(2),
        ExtractionPath::RawMarkdown => Some(3),
        ExtractionPath::Empty => None,
    }
}

/// The kind whose extraction takes the most structured path. Ties go to the
/// kind listed first.
pub fn guess_kind(content: &str) -> Option<ContentKind> {
    let config = ViewerConfig::default().instant();
    let mut best: Option<(u8, ContentKind)> = None;
    for kind in ContentKind::ALL {
        let viewer = Viewer::load(kind, content, None, &config);
        if viewer.total() == 0 {
            continue;
        }
        let Some(rank) = rank(viewer.extraction_path()) else {
            continue;
        };
        log::debug!(
            "{kind}: {} records via {}.",
            viewer.total(),
            viewer.extraction_path()
        );
        if best.is_none_or(|(best_rank, _)| rank < best_rank) {
            best = Some((rank, kind));
        }
    }
    best.map(|(_, kind)| kind)
}

pub fn read_raw_content(path: Option<String>) -> Fallible<Option<Value>> {
    match path {
        Some(path) => {
            if !Path::new(&path).exists() {
                return fail("raw content file does not exist.");
            }
            let text = read_to_string(&path)?;
            Ok(Some(serde_json::from_str(&text)?))
        }
        None => Ok(None),
    }
}

pub fn read_config(path: Option<String>) -> Fallible<ViewerConfig> {
    match path {
        Some(path) => {
            if !Path::new(&path).exists() {
                return fail("config file does not exist.");
            }
            ViewerConfig::from_toml_str(&read_to_string(&path)?)
        }
        None => Ok(ViewerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use eduview_core::deck::KindFilter;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file() {
        let result = ContentFile::read("./derpherp.md");
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: file does not exist.");
    }

    #[test]
    fn test_kind_from_frontmatter() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cells.md");
        write(&path, "---\nkind = \"notes\"\n---\n## Osmosis\nWater moves.\n")?;
        let file = ContentFile::read(&path)?;
        assert_eq!(file.resolve_kind(None), Some(ContentKind::Notes));
        assert_eq!(
            file.resolve_kind(Some(ContentKind::Concepts)),
            Some(ContentKind::Concepts)
        );
        assert_eq!(file.body, "## Osmosis\nWater moves.\n");
        Ok(())
    }

    #[test]
    fn test_guess_prefers_structured_path() {
        let content = r#"{"raw": {"concepts": [{"concept_name": "Osmosis"}]}}"#;
        assert_eq!(guess_kind(content), Some(ContentKind::Concepts));
        assert_eq!(guess_kind("{}"), None);
    }

    #[test]
    fn test_read_config() -> Fallible<()> {
        assert_eq!(read_config(None)?, ViewerConfig::default());
        let dir = tempdir()?;
        let path = dir.path().join("viewer.toml");
        write(&path, "default_filter = \"note\"\n")?;
        let config = read_config(Some(path.display().to_string()))?;
        assert_eq!(config.default_filter, KindFilter::Note);
        assert!(read_config(Some("./derpherp.toml".to_string())).is_err());
        Ok(())
    }

    #[test]
    fn test_read_raw_content() -> Fallible<()> {
        assert_eq!(read_raw_content(None)?, None);
        let dir = tempdir()?;
        let path = dir.path().join("raw.json");
        write(&path, r#"[{"lesson_name": "Fractions"}]"#)?;
        let raw = read_raw_content(Some(path.display().to_string()))?;
        assert!(raw.is_some_and(|value| value.is_array()));
        Ok(())
    }
}

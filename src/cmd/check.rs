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


use std::env::current_dir;
use std::path::Path;
use std::path::PathBuf;

use eduview_core::config::ViewerConfig;
use eduview_core::error::ErrorReport;
use eduview_core::error::Fallible;
use eduview_core::error::fail;
use eduview_core::extract::ExtractionPath;
use eduview_core::types::kind::ContentKind;
use eduview_core::viewer::Viewer;
use walkdir::WalkDir;

use crate::cmd::content::ContentFile;

const EXTENSIONS: [&str; 4] = ["md", "txt", "json", "html"];

/// What reading one file produced.
#[derive(Debug, PartialEq)]
pub struct FileReport {
    pub file: PathBuf,
    pub kind: Option<ContentKind>,
    pub records: usize,
    pub path: ExtractionPath,
}

pub fn check_directory(directory: Option<String>, kind: Option<ContentKind>) -> Fallible<()> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    let reports = scan_directory(&directory, kind)?;
    let mut empty = 0;
    for report in reports.iter() {
        let name = report
            .file
            .strip_prefix(&directory)
            .unwrap_or(&report.file)
            .display();
        match report.kind {
            Some(kind) => {
                log::info!("{name} read as {kind}.");
                println!("{name}: {} records ({})", report.records, report.path);
            }
            None => println!("{name}: 0 records (unknown kind)"),
        }
        if report.records == 0 {
            empty += 1;
        }
    }
    if empty > 0 {
        return fail(format!("{empty} file(s) yielded no records."));
    }
    Ok(())
}

/// Read every content file under `directory`, sorted by path.
pub fn scan_directory(directory: &Path, kind: Option<ContentKind>) -> Fallible<Vec<FileReport>> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let config = ViewerConfig::default().instant();
    let mut reports = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry.map_err(|e| ErrorReport::new(format!("Failed to walk directory: {e}")))?;
        let path = entry.path();
        let is_content = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if !path.is_file() || !is_content {
            continue;
        }
        let content = ContentFile::read(path)?;
        let report = match content.resolve_kind(kind) {
            Some(kind) => {
                let viewer = Viewer::load(kind, &content.body, None, &config);
                FileReport {
                    file: path.to_path_buf(),
                    kind: Some(kind),
                    records: viewer.total(),
                    path: viewer.extraction_path(),
                }
            }
            None => FileReport {
                file: path.to_path_buf(),
                kind: None,
                records: 0,
                path: ExtractionPath::Empty,
            },
        };
        log::debug!("Checked {}.", path.display());
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_non_existent_directory() {
        let result = check_directory(Some("./derpherp".to_string()), None);
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_scan() -> Fallible<()> {
        let dir = tempdir()?;
        let root = dir.path();
        create_dir_all(root.join("biology"))?;
        write(
            root.join("biology/cells.md"),
            "---\nkind = \"notes\"\n---\n## Osmosis\nWater moves.\n## Diffusion\nParticles spread.\n",
        )?;
        write(root.join("cards.txt"), "Q: Largest planet?\nA: Jupiter\n")?;
        write(root.join("image.png"), "not content")?;
        let reports = scan_directory(root, None)?;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].kind, Some(ContentKind::Notes));
        assert_eq!(reports[0].records, 2);
        assert!(reports[1].records > 0);
        check_directory(Some(root.display().to_string()), None)?;
        Ok(())
    }

    #[test]
    fn test_empty_file_fails() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("empty.json"), "{}")?;
        let reports = scan_directory(dir.path(), Some(ContentKind::Concepts))?;
        assert_eq!(reports[0].records, 0);
        assert_eq!(reports[0].path, ExtractionPath::Empty);
        let result = check_directory(Some(dir.path().display().to_string()), None);
        assert!(result.is_err());
        Ok(())
    }
}

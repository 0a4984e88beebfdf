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

use std::ops::Range;

use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use pulldown_cmark::html::push_html;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

/// Convert Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut html_output: String = String::new();
    push_html(&mut html_output, parser);
    html_output
}

/// Convert Markdown to HTML, without the wrapping paragraph when the input
/// is a single paragraph.
pub fn markdown_to_html_inline(markdown: &str) -> String {
    let text = markdown_to_html(markdown);
    if text.starts_with("<p>") && text.ends_with("</p>\n") && text.matches("<p>").count() == 1 {
        let len = text.len();
        text[3..len - 5].to_string()
    } else {
        text
    }
}

/// A heading and the text beneath it, up to the next heading of the same
/// level.
#[derive(Debug, PartialEq)]
pub struct Section<'a> {
    pub level: usize,
    pub title: String,
    pub body: &'a str,
}

struct Heading {
    level: usize,
    range: Range<usize>,
    title: String,
}

fn headings(text: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<Heading> = None;
    for (event, range) in Parser::new_ext(text, options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(Heading {
                    level: level as usize,
                    range,
                    title: String::new(),
                });
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some(heading) = current.as_mut() {
                    heading.title.push_str(&t);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    headings.push(heading);
                }
            }
            _ => {}
        }
    }
    headings
}

/// The level a document is divided at: the shallowest heading level, unless
/// that level occurs once above deeper headings, in which case it is a
/// document title and the next level down is used.
fn primary_level(headings: &[Heading]) -> Option<usize> {
    let shallowest = headings.iter().map(|h| h.level).min()?;
    let count = headings.iter().filter(|h| h.level == shallowest).count();
    if count == 1 {
        let next = headings
            .iter()
            .map(|h| h.level)
            .filter(|level| *level > shallowest)
            .min();
        if next.is_some() {
            return next;
        }
    }
    Some(shallowest)
}

/// Split a Markdown document into sections at its primary heading level.
pub fn markdown_sections(text: &str) -> Vec<Section<'_>> {
    let headings = headings(text);
    let Some(level) = primary_level(&headings) else {
        return Vec::new();
    };
    let primary: Vec<&Heading> = headings.iter().filter(|h| h.level == level).collect();
    let mut sections = Vec::with_capacity(primary.len());
    for (idx, heading) in primary.iter().enumerate() {
        let start = heading.range.end.min(text.len());
        let end = primary
            .get(idx + 1)
            .map(|next| next.range.start)
            .unwrap_or(text.len());
        let body = if start <= end { &text[start..end] } else { "" };
        sections.push(Section {
            level,
            title: heading.title.trim().to_string(),
            body,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_html_basic() {
        let html = markdown_to_html("This is **bold** text.");
        assert_eq!(html, "<p>This is <strong>bold</strong> text.</p>\n");
    }

    #[test]
    fn test_markdown_to_html_inline() {
        let html = markdown_to_html_inline("This is **bold** text.");
        assert_eq!(html, "This is <strong>bold</strong> text.");
    }

    #[test]
    fn test_markdown_to_html_inline_keeps_multiple_paragraphs() {
        let html = markdown_to_html_inline("One\n\nTwo");
        assert_eq!(html, "<p>One</p>\n<p>Two</p>\n");
    }

    #[test]
    fn test_markdown_to_html_inline_heading() {
        let html = markdown_to_html_inline("# Foo");
        assert_eq!(html, "<h1>Foo</h1>\n");
    }

    #[test]
    fn test_sections_skip_document_title() {
        let text = "# Biology\n\n## Osmosis\n\nWater moves.\n\n## Diffusion\n\nParticles spread.\n";
        let sections = markdown_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].level, 2);
        assert_eq!(sections[0].title, "Osmosis");
        assert_eq!(sections[0].body.trim(), "Water moves.");
        assert_eq!(sections[1].title, "Diffusion");
        assert_eq!(sections[1].body.trim(), "Particles spread.");
    }

    #[test]
    fn test_sections_keep_deeper_headings_in_body() {
        let text = "### Lesson 1: Fractions\n#### Objectives\n- Add\n### Lesson 2: Decimals\n";
        let sections = markdown_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Lesson 1: Fractions");
        assert!(sections[0].body.contains("#### Objectives"));
        assert_eq!(sections[1].title, "Lesson 2: Decimals");
    }

    #[test]
    fn test_no_headings() {
        assert!(markdown_sections("just some text").is_empty());
    }
}

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

//! Cleanup applied to every string pulled out of generated markup.

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

static BLOCK_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|li|div|h[1-6]|ul|ol|tr|blockquote)\s*>").expect("valid regex")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid regex"));

// Runs of `&amp;` are matched as one token so that `&amp;&amp;` yields a
// single ampersand.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:&amp;)+|&#[0-9]+;|&#[xX][0-9a-fA-F]+;|&[A-Za-z][A-Za-z0-9]*;")
        .expect("valid regex")
});

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

// Bounds the work done on pathologically nested escapes.
const MAX_PASSES: usize = 8;

/// Strip tags, decode entities and normalize whitespace.
///
/// Tags and entities are removed until none are left, so a tag that was
/// written as `&lt;b&gt;` is stripped too and the output holds nothing a
/// further call would change. A run of `&amp;` still yields a single `&`.
pub fn decode_text(input: &str) -> String {
    let mut text = input.replace("\r\n", "\n");
    for _ in 0..MAX_PASSES {
        let next = strip_markup(&text);
        if next == text {
            break;
        }
        text = next;
    }
    normalize_whitespace(&text)
}

fn strip_markup(text: &str) -> String {
    let text = LINE_BREAK.replace_all(text, "\n");
    let text = BLOCK_CLOSE.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    decode_entities(&text)
}

/// Like [`decode_text`], but an empty result is `None`.
pub fn decode_nonempty(input: &str) -> Option<String> {
    let text = decode_text(input);
    if text.is_empty() { None } else { Some(text) }
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[0];
            if entity.starts_with("&amp;") {
                "&".to_string()
            } else if entity == "&nbsp;" {
                " ".to_string()
            } else {
                html_escape::decode_html_entities(entity).into_owned()
            }
        })
        .into_owned()
}

fn normalize_whitespace(text: &str) -> String {
    let text = HORIZONTAL_SPACE.replace_all(text, " ");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let text = lines.join("\n");
    BLANK_RUN.replace_all(&text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_ampersand_decodes_once() {
        assert_eq!(decode_text("A &amp;&amp; B"), "A & B");
    }

    #[test]
    fn test_escaped_entities_decode_fully() {
        assert_eq!(decode_text("1 &amp;lt; 2"), "1 < 2");
    }

    #[test]
    fn test_escaped_tags_are_stripped() {
        let input = "1 &amp;lt; 2 and &lt;b&gt;bold&lt;/b&gt;&lt;br&gt;next";
        let once = decode_text(input);
        assert_eq!(once, "1 < 2 and bold\nnext");
        assert_eq!(decode_text(&once), once);
    }

    #[test]
    fn test_idempotent_on_decoded_text() {
        let once = decode_text("Salt &amp; pepper<br>and&nbsp;&nbsp;water &#169;");
        assert_eq!(once, "Salt & pepper\nand water ©");
        assert_eq!(decode_text(&once), once);
    }

    #[test]
    fn test_tags_and_blank_runs() {
        let input = "<p>First   paragraph</p>\n\n\n\n<p><strong>Second</strong></p>";
        assert_eq!(decode_text(input), "First paragraph\n\nSecond");
    }

    #[test]
    fn test_comparison_is_not_a_tag() {
        assert_eq!(decode_text("x < 3 and y > 2"), "x < 3 and y > 2");
    }

    #[test]
    fn test_decode_nonempty() {
        assert_eq!(decode_nonempty("<p> </p>"), None);
        assert_eq!(decode_nonempty("<p>x</p>"), Some("x".to_string()));
    }
}

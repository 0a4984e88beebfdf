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

use wasm_bindgen::prelude::*;
use web_sys::Document;

pub const STYLESHEET_ID: &str = "eduview-styles";

const STYLESHEET: &str = r#"
.eduview-card {
    transition: opacity 300ms ease, transform 300ms ease;
}
.eduview-card.transitioning {
    opacity: 0;
    transform: translateX(-1rem);
}
.eduview-progress {
    height: 4px;
    background: #e5e7eb;
}
.eduview-progress > div {
    height: 100%;
    background: #2563eb;
}
.eduview-filter:disabled {
    opacity: 0.4;
    cursor: not-allowed;
}
"#;

/// Add the viewer stylesheet to the document head, once. Returns whether
/// it was added by this call.
pub fn ensure_stylesheet(document: &Document) -> Result<bool, JsValue> {
    if document.get_element_by_id(STYLESHEET_ID).is_some() {
        return Ok(false);
    }
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head> element"))?;
    let style = document.create_element("style")?;
    style.set_id(STYLESHEET_ID);
    style.set_text_content(Some(STYLESHEET));
    head.append_child(&style)?;
    Ok(true)
}

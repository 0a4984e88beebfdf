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

//! WASM bindings for eduview - hosts a content viewer in the browser.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::console;

use eduview_core::config::ViewerConfig;
use eduview_core::deck::KindFilter;
use eduview_core::error::ErrorReport;
use eduview_core::pager::Navigate;
use eduview_core::pager::Navigation;
use eduview_core::types::kind::ContentKind;
use eduview_core::viewer::Viewer;

mod keyboard;
mod style;

use keyboard::KeyboardBinding;
use style::ensure_stylesheet;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"eduview WASM initialized".into());
}

fn to_js(error: ErrorReport) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// A scheduled `finish_transition`. Dropping it cancels the timeout.
struct Timer {
    handle: i32,
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

struct ViewerState {
    viewer: Viewer,
    on_change: Option<js_sys::Function>,
    timer: Option<Timer>,
}

type Shared = Rc<RefCell<ViewerState>>;

/// Call the change callback. The state must not be borrowed, since the
/// callback may call back into the viewer.
fn notify(state: &Shared) {
    let callback = state.borrow().on_change.clone();
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            console::error_1(&e);
        }
    }
}

fn apply(state: &Shared, navigation: Navigation) -> Result<(), JsValue> {
    match navigation {
        Navigation::Ignored => Ok(()),
        Navigation::Moved => {
            notify(state);
            Ok(())
        }
        Navigation::Pending(delay) => {
            notify(state);
            schedule_finish(state, delay)
        }
    }
}

fn schedule_finish(state: &Shared, delay: Duration) -> Result<(), JsValue> {
    let Some(window) = web_sys::window() else {
        // No event loop to wait on.
        state.borrow_mut().viewer.finish_transition();
        notify(state);
        return Ok(());
    };
    let weak = Rc::downgrade(state);
    let callback = Closure::once_into_js(move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let finished = {
            let mut state = state.borrow_mut();
            state.timer = None;
            state.viewer.finish_transition()
        };
        if finished {
            notify(&state);
        }
    });
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let handle = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)?;
    state.borrow_mut().timer = Some(Timer { handle });
    Ok(())
}

#[derive(Serialize)]
struct FilterOption {
    filter: KindFilter,
    label: &'static str,
    count: usize,
    enabled: bool,
    active: bool,
}

/// A viewer over one content string, driven from JavaScript.
#[wasm_bindgen]
pub struct ContentViewer {
    state: Shared,
    /// Present while mounted.
    binding: Option<KeyboardBinding>,
}

#[wasm_bindgen]
impl ContentViewer {
    /// Extract the records of `content`.
    ///
    /// `raw_content` is an optional JSON string holding already-structured
    /// lesson plans. `config` is an optional TOML string.
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        content: &str,
        raw_content: Option<String>,
        config: Option<String>,
    ) -> Result<ContentViewer, JsValue> {
        let kind: ContentKind = kind.parse().map_err(to_js)?;
        let raw: Option<Value> = match raw_content.as_deref() {
            Some(text) => Some(serde_json::from_str(text).map_err(|e| {
                JsValue::from_str(&format!("Failed to parse raw content: {e}"))
            })?),
            None => None,
        };
        let config = match config.as_deref() {
            Some(text) => ViewerConfig::from_toml_str(text).map_err(to_js)?,
            None => ViewerConfig::default(),
        };
        let viewer = Viewer::load(kind, content, raw.as_ref(), &config);
        console::log_1(
            &format!(
                "Loaded {} {kind} via {}",
                viewer.total(),
                viewer.extraction_path()
            )
            .into(),
        );
        Ok(Self {
            state: Rc::new(RefCell::new(ViewerState {
                viewer,
                on_change: None,
                timer: None,
            })),
            binding: None,
        })
    }

    /// Replace the records with those of new content.
    #[wasm_bindgen]
    pub fn reload(&mut self, content: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.timer = None;
            state.viewer.reload(content);
        }
        notify(&self.state);
    }

    /// Register a function called whenever the position or records change.
    #[wasm_bindgen]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.state.borrow_mut().on_change = Some(callback);
    }

    /// Inject the stylesheet and bind the arrow keys on `window`.
    #[wasm_bindgen]
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.binding.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        if let Some(document) = window.document() {
            ensure_stylesheet(&document)?;
        }
        let weak = Rc::downgrade(&self.state);
        let binding = KeyboardBinding::bind(window.into(), move |key| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let navigation = state.borrow_mut().viewer.handle_key(key);
            if let Err(e) = apply(&state, navigation) {
                console::error_1(&e);
            }
        })?;
        self.binding = Some(binding);
        Ok(())
    }

    /// Release the key binding and settle any pending transition.
    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        self.binding = None;
        let mut state = self.state.borrow_mut();
        state.timer = None;
        state.viewer.finish_transition();
    }

    #[wasm_bindgen]
    pub fn is_mounted(&self) -> bool {
        self.binding.is_some()
    }

    /// Returns "moved", "pending" or "ignored".
    #[wasm_bindgen]
    pub fn next(&mut self) -> Result<String, JsValue> {
        let navigation = self.state.borrow_mut().viewer.go_to_next();
        apply(&self.state, navigation)?;
        Ok(navigation_name(navigation).to_string())
    }

    /// Returns "moved", "pending" or "ignored".
    #[wasm_bindgen]
    pub fn previous(&mut self) -> Result<String, JsValue> {
        let navigation = self.state.borrow_mut().viewer.go_to_previous();
        apply(&self.state, navigation)?;
        Ok(navigation_name(navigation).to_string())
    }

    /// Jump to a record, clamped into range. Returns the new position.
    #[wasm_bindgen]
    pub fn jump_to(&mut self, index: usize) -> usize {
        let position = {
            let mut state = self.state.borrow_mut();
            state.timer = None;
            state.viewer.jump_to(index)
        };
        notify(&self.state);
        position
    }

    #[wasm_bindgen]
    pub fn kind(&self) -> String {
        self.state.borrow().viewer.kind().to_string()
    }

    #[wasm_bindgen]
    pub fn len(&self) -> usize {
        self.state.borrow().viewer.len()
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().viewer.is_empty()
    }

    #[wasm_bindgen]
    pub fn position(&self) -> usize {
        self.state.borrow().viewer.position()
    }

    #[wasm_bindgen]
    pub fn progress_fraction(&self) -> f64 {
        self.state.borrow().viewer.progress_fraction()
    }

    #[wasm_bindgen]
    pub fn is_transitioning(&self) -> bool {
        self.state.borrow().timer.is_some()
    }

    /// The current record as a JSON string.
    #[wasm_bindgen]
    pub fn current_json(&self) -> Result<Option<String>, JsValue> {
        let current = self.state.borrow().viewer.current_json().map_err(to_js)?;
        Ok(current.map(|value| value.to_string()))
    }

    #[wasm_bindgen]
    pub fn extraction_path(&self) -> String {
        self.state.borrow().viewer.extraction_path().to_string()
    }

    #[wasm_bindgen]
    pub fn empty_message(&self) -> Option<String> {
        self.state
            .borrow()
            .viewer
            .empty_message()
            .map(str::to_string)
    }

    /// Switch the flashcard filter. Returns false for other content kinds.
    #[wasm_bindgen]
    pub fn set_filter(&mut self, filter: &str) -> Result<bool, JsValue> {
        let filter: KindFilter = filter.parse().map_err(to_js)?;
        let changed = {
            let mut state = self.state.borrow_mut();
            state.timer = None;
            state.viewer.set_filter(filter)
        };
        if changed {
            notify(&self.state);
        }
        Ok(changed)
    }

    /// The flashcard filters as a JSON array of
    /// `{filter, label, count, enabled, active}`. Empty for other kinds.
    #[wasm_bindgen]
    pub fn filter_options(&self) -> String {
        let state = self.state.borrow();
        let options: Vec<FilterOption> = match state.viewer.deck() {
            Some(deck) => KindFilter::ALL
                .into_iter()
                .map(|filter| FilterOption {
                    filter,
                    label: filter.label(),
                    count: deck.count(filter),
                    enabled: deck.is_enabled(filter),
                    active: deck.filter() == filter,
                })
                .collect(),
            None => Vec::new(),
        };
        serde_json::to_string(&options).unwrap_or_else(|_| "[]".to_string())
    }
}

fn navigation_name(navigation: Navigation) -> &'static str {
    match navigation {
        Navigation::Ignored => "ignored",
        Navigation::Moved => "moved",
        Navigation::Pending(_) => "pending",
    }
}

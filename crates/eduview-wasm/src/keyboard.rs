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

//! Arrow-key navigation bound to a DOM event target.

use eduview_core::pager::NavKey;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;
use web_sys::KeyboardEvent;
use web_sys::console;

/// A `keydown` listener that stays registered for as long as this value
/// lives.
pub struct KeyboardBinding {
    target: EventTarget,
    callback: Closure<dyn FnMut(KeyboardEvent)>,
}

impl KeyboardBinding {
    pub fn bind(
        target: EventTarget,
        mut on_key: impl FnMut(NavKey) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if let Some(key) = NavKey::from_key_name(&event.key()) {
                event.prevent_default();
                on_key(key);
            }
        });
        target.add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())?;
        Ok(Self { target, callback })
    }
}

impl Drop for KeyboardBinding {
    fn drop(&mut self) {
        let result = self
            .target
            .remove_event_listener_with_callback("keydown", self.callback.as_ref().unchecked_ref());
        if let Err(e) = result {
            console::warn_1(&e);
        }
    }
}

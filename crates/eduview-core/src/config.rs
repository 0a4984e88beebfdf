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

use std::time::Duration;

use serde::Deserialize;

use crate::deck::KindFilter;
use crate::error::Fallible;

/// Viewer settings, read from TOML. Every key is optional.
///
/// ```toml
/// transition_ms = 300
/// default_filter = "question"
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Length of the visual transition between records. Zero moves at once.
    pub transition_ms: u64,
    /// The flashcard filter a viewer starts with.
    pub default_filter: KindFilter,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            default_filter: KindFilter::All,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Fallible<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// The same settings with transitions turned off.
    pub fn instant(mut self) -> Self {
        self.transition_ms = 0;
        self
    }
}

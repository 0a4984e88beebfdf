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

use serde::Serialize;

/// A short revision note about one concept.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortNote {
    concept_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    importance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quick_facts: Option<Vec<String>>,
}

impl ShortNote {
    /// Returns `None` if the concept name is blank.
    pub fn new(
        concept_name: impl Into<String>,
        summary: Option<String>,
        importance: Option<String>,
        quick_facts: Option<Vec<String>>,
    ) -> Option<Self> {
        let concept_name = concept_name.into();
        if concept_name.trim().is_empty() {
            return None;
        }
        Some(Self {
            concept_name,
            summary,
            importance,
            quick_facts,
        })
    }

    pub fn concept_name(&self) -> &str {
        &self.concept_name
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn importance(&self) -> Option<&str> {
        self.importance.as_deref()
    }

    pub fn quick_facts(&self) -> Option<&[String]> {
        self.quick_facts.as_deref()
    }
}

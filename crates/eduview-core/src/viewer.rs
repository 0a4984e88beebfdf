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

//! The view model a host renders: the records of one content string and
//! the position within them.

use serde::Serialize;
use serde_json::Value;

use crate::config::ViewerConfig;
use crate::deck::FlashcardDeck;
use crate::deck::KindFilter;
use crate::error::Fallible;
use crate::extract::ExtractionPath;
use crate::extract::concepts::extract_concepts;
use crate::extract::flashcards::extract_flashcards;
use crate::extract::lessons::extract_lessons_with_raw;
use crate::extract::notes::extract_notes;
use crate::pager::Navigate;
use crate::pager::Navigation;
use crate::pager::Pager;
use crate::types::concept::ConceptCard;
use crate::types::flashcard::Flashcard;
use crate::types::kind::ContentKind;
use crate::types::lesson::LessonPlan;
use crate::types::note::ShortNote;

#[derive(Clone, Debug)]
enum Records {
    Flashcards(FlashcardDeck),
    Notes(Pager<ShortNote>),
    Concepts(Pager<ConceptCard>),
    Lessons(Pager<LessonPlan>),
}

/// The record on screen.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(untagged)]
pub enum Current<'a> {
    Flashcard(&'a Flashcard),
    Note(&'a ShortNote),
    Concept(&'a ConceptCard),
    Lesson(&'a LessonPlan),
}

#[derive(Clone, Debug)]
pub struct Viewer {
    kind: ContentKind,
    config: ViewerConfig,
    records: Records,
    path: ExtractionPath,
}

impl Viewer {
    /// Extract the records of `content` and start at the first one.
    /// `raw_content` is an already-structured object; only lesson plans
    /// read it.
    pub fn load(
        kind: ContentKind,
        content: &str,
        raw_content: Option<&Value>,
        config: &ViewerConfig,
    ) -> Self {
        let (records, path) = Self::read(kind, content, raw_content, config);
        Self {
            kind,
            config: config.clone(),
            records,
            path,
        }
    }

    fn read(
        kind: ContentKind,
        content: &str,
        raw_content: Option<&Value>,
        config: &ViewerConfig,
    ) -> (Records, ExtractionPath) {
        let delay = config.transition();
        match kind {
            ContentKind::Flashcards => {
                let extraction = extract_flashcards(content);
                let deck =
                    FlashcardDeck::with_filter(extraction.records, config.default_filter, delay);
                (Records::Flashcards(deck), extraction.path)
            }
            ContentKind::Notes => {
                let extraction = extract_notes(content);
                (
                    Records::Notes(Pager::new(extraction.records, delay)),
                    extraction.path,
                )
            }
            ContentKind::Concepts => {
                let extraction = extract_concepts(content);
                (
                    Records::Concepts(Pager::new(extraction.records, delay)),
                    extraction.path,
                )
            }
            ContentKind::Lessons => {
                let extraction = extract_lessons_with_raw(content, raw_content);
                (
                    Records::Lessons(Pager::new(extraction.records, delay)),
                    extraction.path,
                )
            }
        }
    }

    /// Replace every record with those of `content`, back at the first one.
    /// A raw content object given to `load` described the old content and
    /// is not reused.
    pub fn reload(&mut self, content: &str) {
        let (records, path) = Self::read(self.kind, content, None, &self.config);
        log::debug!("Reloaded {} via {path}.", self.kind);
        self.records = records;
        self.path = path;
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn extraction_path(&self) -> ExtractionPath {
        self.path
    }

    /// How many records were extracted, regardless of any filter.
    pub fn total(&self) -> usize {
        match &self.records {
            Records::Flashcards(deck) => deck.cards().len(),
            Records::Notes(pager) => pager.len(),
            Records::Concepts(pager) => pager.len(),
            Records::Lessons(pager) => pager.len(),
        }
    }

    pub fn current(&self) -> Option<Current<'_>> {
        match &self.records {
            Records::Flashcards(deck) => deck.current().map(Current::Flashcard),
            Records::Notes(pager) => pager.current().map(Current::Note),
            Records::Concepts(pager) => pager.current().map(Current::Concept),
            Records::Lessons(pager) => pager.current().map(Current::Lesson),
        }
    }

    pub fn current_json(&self) -> Fallible<Option<Value>> {
        match self.current() {
            Some(current) => Ok(Some(serde_json::to_value(current)?)),
            None => Ok(None),
        }
    }

    /// The message to show instead of a record, if there is nothing to show.
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.records {
            Records::Flashcards(deck) => deck.empty_state().map(|state| state.message()),
            _ if self.total() == 0 => Some(self.kind.empty_message()),
            _ => None,
        }
    }

    pub fn deck(&self) -> Option<&FlashcardDeck> {
        match &self.records {
            Records::Flashcards(deck) => Some(deck),
            _ => None,
        }
    }

    /// Switch the flashcard filter. Returns false for other content kinds.
    pub fn set_filter(&mut self, filter: KindFilter) -> bool {
        match &mut self.records {
            Records::Flashcards(deck) => {
                deck.set_filter(filter);
                true
            }
            _ => false,
        }
    }

    fn navigator(&self) -> &dyn Navigate {
        match &self.records {
            Records::Flashcards(deck) => deck,
            Records::Notes(pager) => pager,
            Records::Concepts(pager) => pager,
            Records::Lessons(pager) => pager,
        }
    }

    fn navigator_mut(&mut self) -> &mut dyn Navigate {
        match &mut self.records {
            Records::Flashcards(deck) => deck,
            Records::Notes(pager) => pager,
            Records::Concepts(pager) => pager,
            Records::Lessons(pager) => pager,
        }
    }
}

impl Navigate for Viewer {
    fn len(&self) -> usize {
        self.navigator().len()
    }

    fn position(&self) -> usize {
        self.navigator().position()
    }

    fn go_to_next(&mut self) -> Navigation {
        self.navigator_mut().go_to_next()
    }

    fn go_to_previous(&mut self) -> Navigation {
        self.navigator_mut().go_to_previous()
    }

    fn finish_transition(&mut self) -> bool {
        self.navigator_mut().finish_transition()
    }

    fn jump_to(&mut self, index: usize) -> usize {
        self.navigator_mut().jump_to(index)
    }

    fn progress_fraction(&self) -> f64 {
        self.navigator().progress_fraction()
    }
}

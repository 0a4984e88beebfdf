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

//! eduview-core: turning generated study content into typed records.
//!
//! This library has no I/O and builds for WASM. It provides:
//! - Extraction of flashcards, short notes, concept cards and lesson plans
//!   from JSON envelopes, sentinel-delimited markup and loose Markdown
//! - A pager with transition state, and a kind filter for flashcards
//! - The viewer model hosts render from

pub mod config;
pub mod deck;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod markdown;
pub mod pager;
pub mod text;
pub mod types;
pub mod viewer;

// Re-exports for convenience
pub use config::ViewerConfig;
pub use deck::{EmptyState, FlashcardDeck, KindFilter};
pub use error::{ErrorReport, Fallible, fail};
pub use extract::concepts::extract_concepts;
pub use extract::flashcards::extract_flashcards;
pub use extract::lessons::{extract_lessons, extract_lessons_with_raw};
pub use extract::notes::extract_notes;
pub use extract::{Extraction, ExtractionPath};
pub use frontmatter::{ContentMetadata, extract_frontmatter};
pub use pager::{NavKey, Navigate, Navigation, Pager};
pub use types::concept::{ConceptCard, Difficulty};
pub use types::flashcard::{Flashcard, FlashcardKind};
pub use types::kind::ContentKind;
pub use types::lesson::{LessonDuration, LessonPlan, LessonSection, SectionName};
pub use types::note::ShortNote;
pub use viewer::{Current, Viewer};

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


use eduview_core::deck::FlashcardDeck;
use eduview_core::deck::KindFilter;
use eduview_core::markdown::markdown_to_html_inline;
use eduview_core::pager::Navigate;
use eduview_core::types::concept::ConceptCard;
use eduview_core::types::concept::Difficulty;
use eduview_core::types::flashcard::Flashcard;
use eduview_core::types::flashcard::FlashcardKind;
use eduview_core::types::lesson::LessonPlan;
use eduview_core::types::note::ShortNote;
use eduview_core::viewer::Current;
use eduview_core::viewer::Viewer;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

fn rich(text: &str) -> Markup {
    PreEscaped(markdown_to_html_inline(text))
}

fn points(items: &[String]) -> Markup {
    html! {
        ul {
            @for item in items {
                li { (rich(item)) }
            }
        }
    }
}

pub fn render_viewer(title: &str, viewer: &Viewer) -> Markup {
    let total = viewer.len();
    let percent = viewer.progress_fraction() * 100.0;
    html! {
        div.root {
            header {
                h1 { (title) }
                div.meta {
                    span.kind { (viewer.kind()) }
                    @if total > 0 {
                        span.position { (viewer.position() + 1) " / " (total) }
                    }
                }
                div.progress {
                    div.progress-fill style=(format!("width: {percent:.0}%;")) {}
                }
            }
            @if let Some(deck) = viewer.deck() {
                (render_filters(deck))
            }
            main.record {
                @match viewer.current() {
                    Some(current) => {
                        (render_current(current))
                    }
                    None => {
                        div.empty {
                            (viewer.empty_message().unwrap_or(viewer.kind().empty_message()))
                        }
                    }
                }
            }
            (render_controls(viewer))
        }
    }
}

fn render_filters(deck: &FlashcardDeck) -> Markup {
    html! {
        form.filters action="/" method="post" {
            input type="hidden" name="action" value="Filter";
            @for filter in KindFilter::ALL {
                @let active = deck.filter() == filter;
                button
                    type="submit"
                    name="filter"
                    value=(filter)
                    class=(if active { "filter active" } else { "filter" })
                    disabled[!deck.is_enabled(filter)] {
                    (filter.label()) " (" (deck.count(filter)) ")"
                }
            }
        }
    }
}

fn render_controls(viewer: &Viewer) -> Markup {
    html! {
        div.controls {
            form action="/" method="post" {
                button #previous type="submit" name="action" value="Previous"
                    disabled[viewer.position() == 0] { "Previous" }
            }
            @if viewer.len() > 1 {
                form.jump action="/" method="post" {
                    input type="hidden" name="action" value="Jump";
                    input type="number" name="index" min="1" max=(viewer.len())
                        value=(viewer.position() + 1) required;
                    button type="submit" { "Go" }
                }
            }
            form action="/" method="post" {
                button #next type="submit" name="action" value="Next"
                    disabled[viewer.position() + 1 >= viewer.len()] { "Next" }
            }
            form.quit action="/" method="post" {
                button #quit type="submit" name="action" value="Quit" { "Quit" }
            }
        }
    }
}

fn render_current(current: Current<'_>) -> Markup {
    match current {
        Current::Flashcard(card) => render_flashcard(card),
        Current::Note(note) => render_note(note),
        Current::Concept(concept) => render_concept(concept),
        Current::Lesson(lesson) => render_lesson(lesson),
    }
}

fn render_flashcard(card: &Flashcard) -> Markup {
    html! {
        div.flashcard {
            @if card.kind() != FlashcardKind::Unspecified {
                span.badge { (card.kind()) }
            }
            div.front { (rich(card.front())) }
            @if let Some(options) = card.options() {
                ol.options type="A" {
                    @for option in options {
                        li { (rich(option)) }
                    }
                }
            }
            details.back {
                summary { "Show answer" }
                div { (rich(card.back())) }
            }
        }
    }
}

fn render_note(note: &ShortNote) -> Markup {
    html! {
        div.note {
            h2 { (note.concept_name()) }
            @if let Some(summary) = note.summary() {
                div.summary { (rich(summary)) }
            }
            @if let Some(importance) = note.importance() {
                div.importance {
                    h3 { "Why it matters" }
                    (rich(importance))
                }
            }
            @if let Some(facts) = note.quick_facts() {
                div.facts {
                    h3 { "Quick facts" }
                    (points(facts))
                }
            }
        }
    }
}

fn render_concept(concept: &ConceptCard) -> Markup {
    html! {
        div.concept {
            h2 { (concept.concept_name()) }
            @if concept.difficulty() != Difficulty::Unspecified {
                span class=(format!("badge difficulty-{}", concept.difficulty())) {
                    (concept.difficulty())
                }
            }
            @if let Some(lesson) = concept.lesson() {
                div.lesson { (rich(lesson)) }
            }
            @if let Some(example) = concept.real_example() {
                div.example {
                    h3 { "Real-world example" }
                    (rich(example))
                }
            }
            @if let Some(key_points) = concept.key_points() {
                div.key-points {
                    h3 { "Key points" }
                    (points(key_points))
                }
            }
        }
    }
}

fn render_lesson(lesson: &LessonPlan) -> Markup {
    html! {
        div.lesson-plan {
            h2 { (lesson.lesson_name()) }
            div.meta {
                @if let Some(subject) = lesson.subject_area() {
                    span.subject { (subject) }
                }
                @if let Some(duration) = lesson.duration() {
                    span.duration {
                        (duration.periods) " × " (duration.minutes_per_period) " min ("
                        (duration.total_minutes()) " min)"
                    }
                }
            }
            @for (name, section) in lesson.sections() {
                section {
                    h3 {
                        (name)
                        @if let Some(minutes) = section.time_minutes() {
                            span.time { " · " (minutes) " min" }
                        }
                    }
                    (points(section.items()))
                }
            }
        }
    }
}

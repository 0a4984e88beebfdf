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

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::extract::Extraction;
use crate::extract::ExtractionPath;
use crate::extract::Extractor;
use crate::extract::RawSection;
use crate::extract::Skip;
use crate::extract::decode_entries;
use crate::extract::extract;
use crate::extract::lenient;
use crate::extract::markup::Field;
use crate::extract::markup::Fields;
use crate::extract::markup::Label;
use crate::extract::markup::Sentinels;
use crate::extract::markup::clean_title;
use crate::extract::markup::fields;
use crate::extract::markup::is_label;
use crate::extract::markup::list_or_paragraph;
use crate::extract::markup::paragraph;
use crate::extract::markup::segment_name;
use crate::extract::markup::sentinel_segments;
use crate::extract::wrong_section;
use crate::markdown::markdown_sections;
use crate::types::kind::ContentKind;
use crate::types::lesson::LessonDuration;
use crate::types::lesson::LessonPlan;
use crate::types::lesson::LessonSection;
use crate::types::lesson::SectionName;

const SENTINELS: Sentinels = Sentinels {
    start: "__LESSON_PLAN_START__",
    end: "__LESSON_PLAN_END__",
};

/// Section label keys are the same as `SectionName::key`.
const LABELS: &[Label] = &[
    Label {
        key: "lesson name",
        aliases: &["lesson title", "lesson topic", "title", "topic", "name"],
    },
    Label {
        key: "subject area",
        aliases: &["subject"],
    },
    Label {
        key: "duration",
        aliases: &["lesson duration", "time allotment", "time allocation"],
    },
    Label {
        key: "objectives",
        aliases: &["learning objectives", "lesson objectives", "objective"],
    },
    Label {
        key: "materials",
        aliases: &[
            "materials needed",
            "teaching materials",
            "materials/resources",
            "resources",
        ],
    },
    Label {
        key: "prerequisites",
        aliases: &["prior knowledge", "previous knowledge", "prerequisite"],
    },
    Label {
        key: "introduction",
        aliases: &["intro", "warm up", "warm-up"],
    },
    Label {
        key: "presentation",
        aliases: &[
            "development",
            "lesson development",
            "lesson presentation",
            "main lesson",
        ],
    },
    Label {
        key: "discussion",
        aliases: &["class discussion"],
    },
    Label {
        key: "activities",
        aliases: &["activity", "class activities", "student activities"],
    },
    Label {
        key: "values",
        aliases: &["values integration", "value integration", "values education"],
    },
    Label {
        key: "homework",
        aliases: &["assignment", "home work"],
    },
    Label {
        key: "evaluation",
        aliases: &["assessment", "evaluation/assessment"],
    },
];

static PERIODS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(\d+)\s*(?:(?:periods?|sessions?|classes|lessons?)\s*(?:of|x|×|@|,)?|x|×)",
        r"\s*(\d+)\s*-?\s*(?:minutes?|mins?)\b",
    ))
    .expect("valid regex")
});

static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*-?\s*(?:minutes?|mins?)\b").expect("valid regex"));

static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:hours?|hrs?)\b").expect("valid regex"));

/// A `Time: 10 minutes` line at the very start of a section body.
static TIME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:<[^>]+>\s*)*(?:\*\*)?\s*time\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*",
        r"(\d+)\s*(?:minutes?|mins?)\b\.?[ \t]*(?:</[^>]+>)*",
    ))
    .expect("valid regex")
});

/// Read a duration such as `2 periods of 40 minutes`, `40 minutes` or
/// `1 hour`.
pub fn parse_duration(text: &str) -> Option<LessonDuration> {
    if let Some(caps) = PERIODS.captures(text) {
        return Some(LessonDuration {
            periods: caps[1].parse().ok()?,
            minutes_per_period: caps[2].parse().ok()?,
        });
    }
    if let Some(caps) = MINUTES.captures(text) {
        return Some(LessonDuration {
            periods: 1,
            minutes_per_period: caps[1].parse().ok()?,
        });
    }
    let hours: u32 = HOURS.captures(text)?[1].parse().ok()?;
    Some(LessonDuration {
        periods: 1,
        minutes_per_period: hours.saturating_mul(60),
    })
}

/// Lesson plans in every supported representation.
pub struct Lessons;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Periods {
        #[serde(default = "one_period")]
        periods: u32,
        #[serde(alias = "minutesPerPeriod")]
        minutes_per_period: u32,
    },
    Minutes(u32),
    Text(String),
}

fn one_period() -> u32 {
    1
}

impl RawDuration {
    fn into_duration(self) -> Option<LessonDuration> {
        match self {
            RawDuration::Periods {
                periods,
                minutes_per_period,
            } => Some(LessonDuration {
                periods,
                minutes_per_period,
            }),
            RawDuration::Minutes(minutes) => Some(LessonDuration {
                periods: 1,
                minutes_per_period: minutes,
            }),
            RawDuration::Text(text) => parse_duration(&text),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSectionBody {
    List(Vec<String>),
    Timed {
        #[serde(default, alias = "timeMinutes")]
        time_minutes: Option<u32>,
        #[serde(default)]
        items: Vec<String>,
    },
    Text(String),
}

impl RawSectionBody {
    fn into_section(self) -> Option<LessonSection> {
        match self {
            RawSectionBody::List(items) => Some(LessonSection::List(items)),
            RawSectionBody::Timed {
                time_minutes: Some(time_minutes),
                items,
            } => Some(LessonSection::Timed {
                time_minutes,
                items,
            }),
            RawSectionBody::Timed {
                time_minutes: None,
                items,
            } => {
                if items.is_empty() {
                    None
                } else {
                    Some(LessonSection::List(items))
                }
            }
            RawSectionBody::Text(text) => {
                if text.trim().is_empty() {
                    None
                } else {
                    Some(LessonSection::List(vec![text]))
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct RawLesson {
    #[serde(
        default,
        deserialize_with = "lenient",
        alias = "lessonName",
        alias = "name",
        alias = "title"
    )]
    lesson_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", alias = "subjectArea", alias = "subject")]
    subject_area: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    duration: Option<RawDuration>,
    #[serde(default, deserialize_with = "lenient", alias = "learning_objectives")]
    objectives: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient", alias = "materials_needed")]
    materials: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient", alias = "prior_knowledge")]
    prerequisites: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient")]
    introduction: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient", alias = "development")]
    presentation: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient")]
    discussion: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient")]
    activities: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient", alias = "values_integration")]
    values: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient", alias = "assignment")]
    homework: Option<RawSectionBody>,
    #[serde(default, deserialize_with = "lenient", alias = "assessment")]
    evaluation: Option<RawSectionBody>,
}

impl RawLesson {
    fn into_plan(self) -> Option<LessonPlan> {
        let plan = LessonPlan::new(self.lesson_name?)?
            .with_subject_area(self.subject_area)
            .with_duration(self.duration.and_then(RawDuration::into_duration));
        let sections = [
            (SectionName::Objectives, self.objectives),
            (SectionName::Materials, self.materials),
            (SectionName::Prerequisites, self.prerequisites),
            (SectionName::Introduction, self.introduction),
            (SectionName::Presentation, self.presentation),
            (SectionName::Discussion, self.discussion),
            (SectionName::Activities, self.activities),
            (SectionName::Values, self.values),
            (SectionName::Homework, self.homework),
            (SectionName::Evaluation, self.evaluation),
        ];
        Some(sections.into_iter().fold(plan, |plan, (name, body)| {
            plan.with_section(name, body.and_then(RawSectionBody::into_section))
        }))
    }
}

fn plans_from_entries(entries: &[Value]) -> Vec<LessonPlan> {
    decode_entries::<RawLesson>(entries)
        .into_iter()
        .filter_map(RawLesson::into_plan)
        .collect()
}

impl Extractor for Lessons {
    type Record = LessonPlan;

    const KIND: ContentKind = ContentKind::Lessons;

    fn from_entries(section: RawSection<'_>) -> Result<Vec<LessonPlan>, Skip> {
        match section {
            RawSection::Lessons(entries) => Ok(plans_from_entries(entries)),
            other @ (RawSection::Flashcards(_)
            | RawSection::Notes(_)
            | RawSection::Concepts(_)
            | RawSection::Unrecognized) => Err(wrong_section(&other)),
        }
    }

    fn from_markup(text: &str) -> Vec<LessonPlan> {
        sentinel_segments(text, &SENTINELS)
            .into_iter()
            .filter_map(plan_from_segment)
            .collect()
    }

    fn from_markdown(text: &str) -> Vec<LessonPlan> {
        let sections: Vec<_> = markdown_sections(text)
            .into_iter()
            .filter(|section| !is_label(&section.title, LABELS))
            .collect();
        if sections.is_empty() {
            // A single lesson whose title heading was taken for a document
            // title: read the whole text as one plan.
            return plan_from_segment(text).into_iter().collect();
        }
        sections
            .into_iter()
            .filter_map(|section| {
                build(
                    clean_title(&section.title),
                    &fields(section.body, LABELS),
                )
            })
            .collect()
    }
}

fn plan_from_segment(segment: &str) -> Option<LessonPlan> {
    let fields = fields(segment, LABELS);
    let name = match segment_name(segment, LABELS) {
        Some(name) => name,
        None => fields.paragraph("lesson name").map(|name| clean_title(&name))?,
    };
    build(name, &fields)
}

fn build(name: String, fields: &Fields<'_>) -> Option<LessonPlan> {
    let plan = LessonPlan::new(name)?
        .with_subject_area(fields.paragraph("subject area"))
        .with_duration(fields.get("duration").and_then(read_duration));
    Some(SectionName::ALL.into_iter().fold(plan, |plan, name| {
        let section = fields.get(name.key()).and_then(read_section);
        plan.with_section(name, section)
    }))
}

fn read_duration(field: &Field<'_>) -> Option<LessonDuration> {
    paragraph(field.body)
        .and_then(|text| parse_duration(&text))
        .or_else(|| {
            field.time_minutes.map(|minutes| LessonDuration {
                periods: 1,
                minutes_per_period: minutes,
            })
        })
}

fn read_section(field: &Field<'_>) -> Option<LessonSection> {
    let (leading, body) = match TIME_LINE.captures(field.body) {
        Some(caps) => {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (caps[1].parse::<u32>().ok(), &field.body[end..])
        }
        None => (None, field.body),
    };
    let items = list_or_paragraph(body);
    match field.time_minutes.or(leading) {
        Some(time_minutes) => Some(LessonSection::Timed {
            time_minutes,
            items: items.unwrap_or_default(),
        }),
        None => items.map(LessonSection::List),
    }
}

/// Read lesson plans from a content string.
pub fn extract_lessons(content: &str) -> Extraction<LessonPlan> {
    extract::<Lessons>(content)
}

/// Read lesson plans, preferring an already-structured object over the
/// content string when one is given.
pub fn extract_lessons_with_raw(
    content: &str,
    raw_content: Option<&Value>,
) -> Extraction<LessonPlan> {
    if let Some(raw) = raw_content {
        match structured_entries(raw) {
            Some(entries) => {
                let records = plans_from_entries(entries);
                if !records.is_empty() {
                    log::debug!(
                        "Read {} {} via {}.",
                        records.len(),
                        ContentKind::Lessons,
                        ExtractionPath::RawContent
                    );
                    return Extraction {
                        records,
                        path: ExtractionPath::RawContent,
                    };
                }
            }
            None => log::debug!("Raw content holds no lesson plans."),
        }
    }
    extract_lessons(content)
}

/// The lesson entries of a structured object: an array of lessons, an
/// object with a `lessons` or `lesson_plans` array (possibly under `raw`),
/// or a single lesson.
fn structured_entries(raw: &Value) -> Option<&[Value]> {
    match raw {
        Value::Array(entries) => Some(entries),
        Value::Object(map) => {
            for key in ["lessons", "lesson_plans"] {
                if let Some(Value::Array(entries)) = map.get(key) {
                    return Some(entries);
                }
            }
            if let Some(inner) = map.get("raw") {
                return structured_entries(inner);
            }
            if map.contains_key("lesson_name") || map.contains_key("lessonName") {
                return Some(std::slice::from_ref(raw));
            }
            None
        }
        _ => None,
    }
}

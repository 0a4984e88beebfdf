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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

/// How long a lesson runs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDuration {
    pub periods: u32,
    pub minutes_per_period: u32,
}

impl LessonDuration {
    pub fn total_minutes(self) -> u32 {
        self.periods.saturating_mul(self.minutes_per_period)
    }
}

/// One structured part of a lesson plan.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(untagged)]
pub enum LessonSection {
    /// A flat list of points.
    List(Vec<String>),
    /// A timed block of the lesson.
    Timed {
        #[serde(rename = "timeMinutes")]
        time_minutes: u32,
        items: Vec<String>,
    },
}

impl LessonSection {
    pub fn items(&self) -> &[String] {
        match self {
            LessonSection::List(items) => items,
            LessonSection::Timed { items, .. } => items,
        }
    }

    pub fn time_minutes(&self) -> Option<u32> {
        match self {
            LessonSection::List(_) => None,
            LessonSection::Timed { time_minutes, .. } => Some(*time_minutes),
        }
    }
}

/// The named sub-sections of a lesson plan, in display order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SectionName {
    Objectives,
    Materials,
    Prerequisites,
    Introduction,
    Presentation,
    Discussion,
    Activities,
    Values,
    Homework,
    Evaluation,
}

impl SectionName {
    pub const ALL: [SectionName; 10] = [
        SectionName::Objectives,
        SectionName::Materials,
        SectionName::Prerequisites,
        SectionName::Introduction,
        SectionName::Presentation,
        SectionName::Discussion,
        SectionName::Activities,
        SectionName::Values,
        SectionName::Homework,
        SectionName::Evaluation,
    ];

    /// The snake_case key used in structured payloads.
    pub fn key(self) -> &'static str {
        match self {
            SectionName::Objectives => "objectives",
            SectionName::Materials => "materials",
            SectionName::Prerequisites => "prerequisites",
            SectionName::Introduction => "introduction",
            SectionName::Presentation => "presentation",
            SectionName::Discussion => "discussion",
            SectionName::Activities => "activities",
            SectionName::Values => "values",
            SectionName::Homework => "homework",
            SectionName::Evaluation => "evaluation",
        }
    }
}

impl Display for SectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let title = match self {
            SectionName::Objectives => "Learning Objectives",
            SectionName::Materials => "Materials",
            SectionName::Prerequisites => "Prerequisites",
            SectionName::Introduction => "Introduction",
            SectionName::Presentation => "Presentation",
            SectionName::Discussion => "Discussion",
            SectionName::Activities => "Activities",
            SectionName::Values => "Values",
            SectionName::Homework => "Homework",
            SectionName::Evaluation => "Evaluation",
        };
        write!(f, "{title}")
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    lesson_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<LessonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    objectives: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    materials: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prerequisites: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    introduction: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presentation: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discussion: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    activities: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    homework: Option<LessonSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluation: Option<LessonSection>,
}

impl LessonPlan {
    /// Returns `None` if the lesson name is blank.
    pub fn new(lesson_name: impl Into<String>) -> Option<Self> {
        let lesson_name = lesson_name.into();
        if lesson_name.trim().is_empty() {
            return None;
        }
        Some(Self {
            lesson_name,
            subject_area: None,
            duration: None,
            objectives: None,
            materials: None,
            prerequisites: None,
            introduction: None,
            presentation: None,
            discussion: None,
            activities: None,
            values: None,
            homework: None,
            evaluation: None,
        })
    }

    pub fn with_subject_area(mut self, subject_area: Option<String>) -> Self {
        self.subject_area = subject_area;
        self
    }

    pub fn with_duration(mut self, duration: Option<LessonDuration>) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_section(mut self, name: SectionName, section: Option<LessonSection>) -> Self {
        *self.slot(name) = section;
        self
    }

    fn slot(&mut self, name: SectionName) -> &mut Option<LessonSection> {
        match name {
            SectionName::Objectives => &mut self.objectives,
            SectionName::Materials => &mut self.materials,
            SectionName::Prerequisites => &mut self.prerequisites,
            SectionName::Introduction => &mut self.introduction,
            SectionName::Presentation => &mut self.presentation,
            SectionName::Discussion => &mut self.discussion,
            SectionName::Activities => &mut self.activities,
            SectionName::Values => &mut self.values,
            SectionName::Homework => &mut self.homework,
            SectionName::Evaluation => &mut self.evaluation,
        }
    }

    pub fn lesson_name(&self) -> &str {
        &self.lesson_name
    }

    pub fn subject_area(&self) -> Option<&str> {
        self.subject_area.as_deref()
    }

    pub fn duration(&self) -> Option<LessonDuration> {
        self.duration
    }

    pub fn section(&self, name: SectionName) -> Option<&LessonSection> {
        match name {
            SectionName::Objectives => self.objectives.as_ref(),
            SectionName::Materials => self.materials.as_ref(),
            SectionName::Prerequisites => self.prerequisites.as_ref(),
            SectionName::Introduction => self.introduction.as_ref(),
            SectionName::Presentation => self.presentation.as_ref(),
            SectionName::Discussion => self.discussion.as_ref(),
            SectionName::Activities => self.activities.as_ref(),
            SectionName::Values => self.values.as_ref(),
            SectionName::Homework => self.homework.as_ref(),
            SectionName::Evaluation => self.evaluation.as_ref(),
        }
    }

    /// The sections present in this plan, in display order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionName, &LessonSection)> {
        SectionName::ALL
            .into_iter()
            .filter_map(|name| self.section(name).map(|section| (name, section)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_sections() {
        let plan = LessonPlan::new("Fractions")
            .unwrap()
            .with_duration(Some(LessonDuration {
                periods: 2,
                minutes_per_period: 40,
            }))
            .with_section(
                SectionName::Objectives,
                Some(LessonSection::List(vec!["Add fractions".to_string()])),
            )
            .with_section(
                SectionName::Introduction,
                Some(LessonSection::Timed {
                    time_minutes: 5,
                    items: vec!["Pizza slices".to_string()],
                }),
            );
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lessonName": "Fractions",
                "duration": {"periods": 2, "minutesPerPeriod": 40},
                "objectives": ["Add fractions"],
                "introduction": {"timeMinutes": 5, "items": ["Pizza slices"]},
            })
        );
    }

    #[test]
    fn test_sections_in_display_order() {
        let plan = LessonPlan::new("Fractions")
            .unwrap()
            .with_section(SectionName::Homework, Some(LessonSection::List(vec![])))
            .with_section(SectionName::Objectives, Some(LessonSection::List(vec![])));
        let names: Vec<SectionName> = plan.sections().map(|(name, _)| name).collect();
        assert_eq!(names, vec![SectionName::Objectives, SectionName::Homework]);
    }

    #[test]
    fn test_total_minutes() {
        let duration = LessonDuration {
            periods: 3,
            minutes_per_period: 45,
        };
        assert_eq!(duration.total_minutes(), 135);
    }
}

//! Swimmer category classification.
//!
//! An event groups swimmers under exactly one of four systems:
//! - AGE_GROUP: six age tiers computed at the event date
//! - LETTER: up to nine configured birth-date ranges, A through I
//! - GRADE: the school grade label, verbatim
//! - SCHOOL_LEVEL: grades bucketed into five primary/middle/senior groups
//!
//! Failures are reported as sentinel categories rather than errors so that
//! callers can filter them out. Unknown categories are never defaulted.

use crate::types::{CategorySystem, EventConfig, Letter, Swimmer};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Category Labels
// ============================================================================

/// Age tiers for the AGE_GROUP system (inclusive bounds)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    NineAndUnder,
    TenEleven,
    TwelveThirteen,
    FourteenFifteen,
    SixteenEighteen,
    NineteenAndOver,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::NineAndUnder,
        AgeGroup::TenEleven,
        AgeGroup::TwelveThirteen,
        AgeGroup::FourteenFifteen,
        AgeGroup::SixteenEighteen,
        AgeGroup::NineteenAndOver,
    ];

    pub fn from_age(age: u32) -> Self {
        match age {
            0..=9 => AgeGroup::NineAndUnder,
            10..=11 => AgeGroup::TenEleven,
            12..=13 => AgeGroup::TwelveThirteen,
            14..=15 => AgeGroup::FourteenFifteen,
            16..=18 => AgeGroup::SixteenEighteen,
            _ => AgeGroup::NineteenAndOver,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::NineAndUnder => "9 & under",
            AgeGroup::TenEleven => "10-11",
            AgeGroup::TwelveThirteen => "12-13",
            AgeGroup::FourteenFifteen => "14-15",
            AgeGroup::SixteenEighteen => "16-18",
            AgeGroup::NineteenAndOver => "19 & over",
        }
    }
}

/// Grade buckets for the SCHOOL_LEVEL system
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolLevel {
    /// Primary (SD) grades 1-2
    PrimaryLower,
    /// Primary (SD) grades 3-4
    PrimaryMiddle,
    /// Primary (SD) grades 5-6
    PrimaryUpper,
    /// Middle school (SMP) grades 7-9
    Middle,
    /// Senior school (SMA/SMK) grades 10-12
    Senior,
}

impl SchoolLevel {
    pub const ALL: [SchoolLevel; 5] = [
        SchoolLevel::PrimaryLower,
        SchoolLevel::PrimaryMiddle,
        SchoolLevel::PrimaryUpper,
        SchoolLevel::Middle,
        SchoolLevel::Senior,
    ];

    pub fn from_grade(grade: u32) -> Option<Self> {
        match grade {
            1..=2 => Some(SchoolLevel::PrimaryLower),
            3..=4 => Some(SchoolLevel::PrimaryMiddle),
            5..=6 => Some(SchoolLevel::PrimaryUpper),
            7..=9 => Some(SchoolLevel::Middle),
            10..=12 => Some(SchoolLevel::Senior),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SchoolLevel::PrimaryLower => "1-2 SD",
            SchoolLevel::PrimaryMiddle => "3-4 SD",
            SchoolLevel::PrimaryUpper => "5-6 SD",
            SchoolLevel::Middle => "7-9 SMP",
            SchoolLevel::Senior => "10-12 SMA",
        }
    }
}

/// The category a swimmer competes in, or why none could be determined
///
/// Serialized tagged by system, so a free-form grade label never reads
/// back as an age, letter or school bucket with the same text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "system", content = "label", rename_all = "snake_case")]
pub enum Category {
    Age(AgeGroup),
    Letter(Letter),
    School(SchoolLevel),
    /// Free-form grade label (GRADE system)
    Grade(String),
    UnknownAge,
    GradeNotSpecified,
    Ungrouped,
    /// No letter range matched; carries the computed age when available
    UnknownLetter(Option<u32>),
}

impl Category {
    /// Whether this is a real category rather than a classification failure
    pub fn is_known(&self) -> bool {
        !matches!(
            self,
            Category::UnknownAge
                | Category::GradeNotSpecified
                | Category::Ungrouped
                | Category::UnknownLetter(_)
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Age(group) => f.write_str(group.label()),
            Category::Letter(letter) => write!(f, "Group {}", letter.as_char()),
            Category::School(level) => f.write_str(level.label()),
            Category::Grade(label) => f.write_str(label),
            Category::UnknownAge => f.write_str("UNKNOWN_AGE"),
            Category::GradeNotSpecified => f.write_str("GRADE_NOT_SPECIFIED"),
            Category::Ungrouped => f.write_str("UNGROUPED"),
            Category::UnknownLetter(Some(age)) => write!(f, "UNKNOWN_LETTER({})", age),
            Category::UnknownLetter(None) => f.write_str("UNKNOWN_LETTER(?)"),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classify a swimmer under the event's category system
pub fn classify(swimmer: &Swimmer, event: &EventConfig) -> Category {
    match event.category_system {
        CategorySystem::Grade => match non_blank(swimmer.grade_level.as_deref()) {
            Some(level) => Category::Grade(level.to_string()),
            None => Category::GradeNotSpecified,
        },
        CategorySystem::SchoolLevel => match non_blank(swimmer.grade_level.as_deref()) {
            Some(level) => classify_school_level(level),
            None => Category::GradeNotSpecified,
        },
        CategorySystem::AgeGroup => swimmer
            .date_of_birth
            .and_then(|dob| age_at(dob, event.event_date))
            .map(|age| Category::Age(AgeGroup::from_age(age)))
            .unwrap_or(Category::UnknownAge),
        CategorySystem::Letter => classify_letter(swimmer.date_of_birth, event),
    }
}

/// Whole years between birth and the given date
///
/// Returns None when the birth date falls after `on`.
pub fn age_at(date_of_birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    if date_of_birth > on {
        return None;
    }
    let mut years = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

fn classify_letter(date_of_birth: Option<NaiveDate>, event: &EventConfig) -> Category {
    let age = date_of_birth.and_then(|dob| age_at(dob, event.event_date));

    let Some(dob) = date_of_birth else {
        return Category::UnknownLetter(age);
    };

    Letter::ALL
        .iter()
        .find(|letter| {
            event
                .letter_ranges
                .get(*letter)
                .map_or(false, |range| range.contains(dob))
        })
        .map(|letter| Category::Letter(*letter))
        .unwrap_or(Category::UnknownLetter(age))
}

fn classify_school_level(level: &str) -> Category {
    parse_grade(level)
        .and_then(SchoolLevel::from_grade)
        .map(Category::School)
        .unwrap_or(Category::Ungrouped)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Clone, Copy, PartialEq)]
enum School {
    Primary,
    Middle,
    Senior,
}

impl School {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "sd" | "mi" => Some(School::Primary),
            "smp" | "mts" => Some(School::Middle),
            "sma" | "smk" | "ma" => Some(School::Senior),
            _ => None,
        }
    }

    fn accepts(&self, grade: u32) -> bool {
        match self {
            School::Primary => (1..=6).contains(&grade),
            School::Middle => (7..=9).contains(&grade),
            School::Senior => (10..=12).contains(&grade),
        }
    }
}

/// Extract the grade number from a label such as "SD Kelas 3" or "SMP 8"
///
/// A school prefix, when present, must agree with the number.
fn parse_grade(level: &str) -> Option<u32> {
    let lowered = level.to_lowercase();
    let mut school = None;
    let mut grade = None;

    for token in lowered.split_whitespace() {
        if let Some(s) = School::parse(token) {
            if school.replace(s).is_some() {
                return None;
            }
        } else if let Ok(n) = token.parse::<u32>() {
            if grade.replace(n).is_some() {
                return None;
            }
        } else if !matches!(token, "kelas" | "grade" | "class") {
            return None;
        }
    }

    let grade = grade?;
    match school {
        Some(s) if !s.accepts(grade) => None,
        _ => Some(grade),
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Total order over category labels across all four systems
///
/// Age tiers come first, then letters, school buckets and recognised grade
/// labels. Sentinels and unrecognised labels share the maximum key.
pub fn sort_key(category: &Category) -> u32 {
    match category {
        Category::Age(group) => 100 + *group as u32,
        Category::Letter(letter) => 200 + letter.index(),
        Category::School(level) => 300 + *level as u32,
        Category::Grade(label) => match parse_grade(label) {
            Some(n) if (1..=12).contains(&n) => 400 + n,
            _ => u32::MAX,
        },
        _ => u32::MAX,
    }
}

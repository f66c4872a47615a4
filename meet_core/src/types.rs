//! Core domain types for the meet program and results engine.
//!
//! This module defines the plain data the engine consumes and produces:
//! - Swimmers, event configuration and entries (caller-owned inputs)
//! - Race keys and numbered races
//! - Heats and lanes
//! - Ranked results and medal tallies

use crate::category::Category;
use crate::time::parse_time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Swimmers
// ============================================================================

/// Competition gender of a swimmer (and therefore of a race)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Mixed,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Mixed => "Mixed",
        };
        f.write_str(label)
    }
}

/// A registered swimmer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Swimmer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub grade_level: Option<String>,
    #[serde(default)]
    pub club: String,
}

// ============================================================================
// Event Configuration
// ============================================================================

/// Which scheme an event uses to group swimmers into categories
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategorySystem {
    AgeGroup,
    Letter,
    Grade,
    SchoolLevel,
}

impl CategorySystem {
    /// Whether categories come from the grade level rather than the birth date
    pub fn uses_grade_level(&self) -> bool {
        matches!(self, CategorySystem::Grade | CategorySystem::SchoolLevel)
    }
}

/// Letter groups for the LETTER system, declared in priority order
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
}

impl Letter {
    /// All letters in evaluation priority order
    pub const ALL: [Letter; 9] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::H,
        Letter::I,
    ];

    pub fn index(&self) -> u32 {
        *self as u32
    }

    pub fn as_char(&self) -> char {
        (b'A' + *self as u8) as char
    }

    pub fn from_char(c: char) -> Option<Letter> {
        Letter::ALL
            .iter()
            .copied()
            .find(|l| l.as_char() == c.to_ascii_uppercase())
    }
}

/// Inclusive range of birth dates
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

fn default_lanes_per_heat() -> u32 {
    8
}

/// Per-event configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub event_date: NaiveDate,
    pub category_system: CategorySystem,
    /// Birth-date ranges for the LETTER system. Empty means not configured.
    #[serde(default)]
    pub letter_ranges: BTreeMap<Letter, DateRange>,
    #[serde(default = "default_lanes_per_heat")]
    pub lanes_per_heat: u32,
}

// ============================================================================
// Entries
// ============================================================================

/// Swim stroke of a race
///
/// Labels outside the standard five are kept verbatim in `Other`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum Style {
    Freestyle,
    Backstroke,
    Breaststroke,
    Butterfly,
    IndividualMedley,
    Other(String),
}

impl Style {
    pub fn label(&self) -> &str {
        match self {
            Style::Freestyle => "Freestyle",
            Style::Backstroke => "Backstroke",
            Style::Breaststroke => "Breaststroke",
            Style::Butterfly => "Butterfly",
            Style::IndividualMedley => "Individual Medley",
            Style::Other(name) => name,
        }
    }
}

impl From<String> for Style {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "freestyle" | "free" | "gaya bebas" | "bebas" => Style::Freestyle,
            "backstroke" | "back" | "gaya punggung" | "punggung" => Style::Backstroke,
            "breaststroke" | "breast" | "gaya dada" | "dada" => Style::Breaststroke,
            "butterfly" | "fly" | "gaya kupu-kupu" | "kupu-kupu" => Style::Butterfly,
            "individual medley" | "im" | "medley" | "gaya ganti" | "ganti" => {
                Style::IndividualMedley
            }
            _ => Style::Other(s.trim().to_string()),
        }
    }
}

impl From<&str> for Style {
    fn from(s: &str) -> Self {
        Style::from(s.to_string())
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        style.label().to_string()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Official remark attached to an entry
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Remark {
    /// Disqualified
    Dq,
    /// Did not start
    Dns,
    /// Did not finish
    Dnf,
    /// Special entry, swims unranked
    Sp,
}

impl Remark {
    pub const ALL: [Remark; 4] = [Remark::Dq, Remark::Dns, Remark::Dnf, Remark::Sp];
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Remark::Dq => "DQ",
            Remark::Dns => "DNS",
            Remark::Dnf => "DNF",
            Remark::Sp => "SP",
        };
        f.write_str(code)
    }
}

/// A swimmer's entry into one style/distance at an event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub swimmer_id: String,
    pub event_id: String,
    pub style: Style,
    pub distance: u32,
    #[serde(default)]
    pub seed_time: Option<String>,
    #[serde(default)]
    pub final_time: Option<String>,
    #[serde(default)]
    pub remark: Option<Remark>,
}

impl Entry {
    /// Seed time in milliseconds, 0 if absent or malformed
    pub fn seed_ms(&self) -> u64 {
        self.seed_time.as_deref().map(parse_time).unwrap_or(0)
    }

    /// Final time in milliseconds, 0 if absent or malformed
    pub fn final_ms(&self) -> u64 {
        self.final_time.as_deref().map(parse_time).unwrap_or(0)
    }
}

/// An entry joined with the swimmer who owns it
#[derive(Clone, Debug, PartialEq)]
pub struct Entrant {
    pub entry: Entry,
    pub swimmer: Swimmer,
}

impl Entrant {
    pub fn new(entry: Entry, swimmer: Swimmer) -> Self {
        Self { entry, swimmer }
    }

    pub fn name(&self) -> &str {
        &self.swimmer.name
    }

    pub fn club(&self) -> &str {
        &self.swimmer.club
    }
}

// ============================================================================
// Races
// ============================================================================

/// Structural identity of a race within an event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RaceKey {
    pub style: Style,
    pub distance: u32,
    pub gender: Gender,
    pub category: Category,
}

impl fmt::Display for RaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}m {} {} {}",
            self.distance, self.style, self.gender, self.category
        )
    }
}

/// A race with its slot in the printed program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Race {
    pub acara_number: u32,
    pub key: RaceKey,
}

// ============================================================================
// Heats
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub number: u32,
    pub entrant: Option<Entrant>,
}

/// One heat of a race; lanes are listed 1..=lanes_per_heat
#[derive(Clone, Debug, PartialEq)]
pub struct Heat {
    pub heat_number: u32,
    pub lanes: Vec<Lane>,
}

impl Heat {
    /// Occupied lanes only, in lane order
    pub fn occupied(&self) -> impl Iterator<Item = (u32, &Entrant)> {
        self.lanes
            .iter()
            .filter_map(|lane| lane.entrant.as_ref().map(|e| (lane.number, e)))
    }
}

// ============================================================================
// Results and Medals
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
        };
        f.write_str(label)
    }
}

/// An entrant's place in a race result
#[derive(Clone, Debug, PartialEq)]
pub struct RankedEntry {
    pub entrant: Entrant,
    /// Final time in milliseconds, 0 when not recorded
    pub final_ms: u64,
    pub rank: Option<u32>,
    pub medal: Option<Medal>,
}

/// Ranked results of one race
#[derive(Clone, Debug, PartialEq)]
pub struct RaceResult {
    pub race: Race,
    pub entries: Vec<RankedEntry>,
}

/// Gold/silver/bronze counts
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub fn add(&mut self, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    /// Key that orders counts best-first when sorted descending
    pub fn score(&self) -> (u32, u32, u32) {
        (self.gold, self.silver, self.bronze)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SwimmerMedalTally {
    pub swimmer_id: String,
    pub name: String,
    pub club: String,
    pub medals: MedalCount,
    pub rank: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClubMedalTally {
    pub club: String,
    pub medals: MedalCount,
    pub rank: u32,
}

/// Top medal winners within one category and gender
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BestSwimmerGroup {
    pub category: Category,
    pub gender: Gender,
    pub swimmers: Vec<SwimmerMedalTally>,
}

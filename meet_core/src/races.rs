//! Race discovery.
//!
//! A race is identified by (style, distance, gender, category). The set of
//! races run at an event is derived from its entries; entries that cannot be
//! placed in a known category are skipped rather than defaulted.

use crate::category::classify;
use crate::types::{Entry, EventConfig, RaceKey, Swimmer};
use std::collections::{BTreeSet, HashMap};

/// Race key an entry belongs to, if its swimmer can be classified
///
/// Requires a gender, plus a birth date (AGE_GROUP/LETTER) or a grade
/// level (GRADE/SCHOOL_LEVEL), and a known category. Seed times are not
/// checked here.
pub fn race_key_for(entry: &Entry, swimmer: &Swimmer, event: &EventConfig) -> Option<RaceKey> {
    let gender = swimmer.gender?;

    let has_basis = if event.category_system.uses_grade_level() {
        swimmer.grade_level.is_some()
    } else {
        swimmer.date_of_birth.is_some()
    };
    if !has_basis {
        return None;
    }

    let category = classify(swimmer, event);
    if !category.is_known() {
        return None;
    }

    Some(RaceKey {
        style: entry.style.clone(),
        distance: entry.distance,
        gender,
        category,
    })
}

/// Discover the distinct races present in an event's entries
///
/// Entries for other events, entries whose swimmer is missing or cannot be
/// classified, and entries without a parseable seed time are skipped.
pub fn discover(
    entries: &[Entry],
    swimmers: &HashMap<String, Swimmer>,
    event: &EventConfig,
) -> BTreeSet<RaceKey> {
    let mut races = BTreeSet::new();
    let mut skipped = 0usize;

    for entry in entries {
        if entry.event_id != event.id {
            continue;
        }

        let Some(swimmer) = swimmers.get(&entry.swimmer_id) else {
            tracing::debug!("Entry references unknown swimmer {}", entry.swimmer_id);
            skipped += 1;
            continue;
        };

        if entry.seed_ms() == 0 {
            tracing::debug!(
                "Skipping {} {}m {}: no valid seed time",
                swimmer.name,
                entry.distance,
                entry.style
            );
            skipped += 1;
            continue;
        }

        match race_key_for(entry, swimmer, event) {
            Some(key) => {
                races.insert(key);
            }
            None => {
                tracing::debug!("Skipping {}: no known category", swimmer.name);
                skipped += 1;
            }
        }
    }

    tracing::info!(
        "Discovered {} races for event {} ({} entries skipped)",
        races.len(),
        event.id,
        skipped
    );

    races
}

//! Program sequencing: numbering the races of an event.
//!
//! Races are numbered 1..=N ("acara" numbers). A custom order saved by the
//! meet organiser takes precedence; races it does not mention follow in the
//! default order:
//! 1. Category sort key
//! 2. Style priority (unlisted styles after, by name)
//! 3. Distance
//! 4. Gender (Male, Female, Mixed)

use crate::category::sort_key;
use crate::config::ProgramConfig;
use crate::store::ProgramOrderStore;
use crate::types::{Race, RaceKey, Style};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Default style priority for the printed program
pub const DEFAULT_STYLE_PRIORITY: [Style; 5] = [
    Style::Freestyle,
    Style::Backstroke,
    Style::Breaststroke,
    Style::Butterfly,
    Style::IndividualMedley,
];

/// Direction for a single-step program move
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Orders race keys into a numbered program
#[derive(Clone, Debug)]
pub struct ProgramSequencer {
    style_priority: Vec<Style>,
}

impl Default for ProgramSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE_PRIORITY.to_vec())
    }
}

impl ProgramSequencer {
    pub fn new(style_priority: Vec<Style>) -> Self {
        Self { style_priority }
    }

    pub fn from_config(config: &ProgramConfig) -> Self {
        Self::new(config.style_priority.clone())
    }

    fn style_rank(&self, style: &Style) -> usize {
        self.style_priority
            .iter()
            .position(|s| s == style)
            .unwrap_or(self.style_priority.len())
    }

    /// Default program order between two races
    pub fn default_compare(&self, a: &RaceKey, b: &RaceKey) -> Ordering {
        sort_key(&a.category)
            .cmp(&sort_key(&b.category))
            .then_with(|| self.style_rank(&a.style).cmp(&self.style_rank(&b.style)))
            .then_with(|| a.style.label().cmp(b.style.label()))
            .then_with(|| a.distance.cmp(&b.distance))
            .then_with(|| a.gender.cmp(&b.gender))
            .then_with(|| a.category.cmp(&b.category))
    }

    /// Number races, honouring a custom order when one is supplied
    ///
    /// Custom keys that are no longer run at the event are dropped; the
    /// remaining races follow in default order.
    pub fn order<'a, I>(&self, race_keys: I, custom_order: Option<&[RaceKey]>) -> Vec<Race>
    where
        I: IntoIterator<Item = &'a RaceKey>,
    {
        let available: HashSet<&RaceKey> = race_keys.into_iter().collect();
        let mut placed: HashSet<&RaceKey> = HashSet::new();
        let mut ordered: Vec<&RaceKey> = Vec::with_capacity(available.len());

        if let Some(custom) = custom_order {
            for key in custom {
                if let Some(known) = available.get(key) {
                    if placed.insert(*known) {
                        ordered.push(*known);
                    }
                }
            }
        }

        let mut rest: Vec<&RaceKey> = available
            .iter()
            .copied()
            .filter(|key| !placed.contains(key))
            .collect();
        rest.sort_by(|a, b| self.default_compare(a, b));

        tracing::debug!(
            "Program order: {} custom, {} default",
            ordered.len(),
            rest.len()
        );

        ordered.extend(rest);
        number(ordered.into_iter().cloned())
    }

    /// Load the event's custom order from `store` and number the races
    pub fn order_from_store<'a, I>(
        &self,
        store: &dyn ProgramOrderStore,
        event_id: &str,
        race_keys: I,
    ) -> Result<Vec<Race>>
    where
        I: IntoIterator<Item = &'a RaceKey>,
    {
        let custom = store.load(event_id)?;
        Ok(self.order(race_keys, custom.as_deref()))
    }

    /// Move one race and persist the resulting order as the custom order
    pub fn move_and_save(
        &self,
        store: &mut dyn ProgramOrderStore,
        event_id: &str,
        races: &[Race],
        key: &RaceKey,
        direction: Direction,
    ) -> Result<Vec<Race>> {
        let moved = move_race(races, key, direction);
        let keys: Vec<RaceKey> = moved.iter().map(|r| r.key.clone()).collect();
        store.save(event_id, &keys)?;
        Ok(moved)
    }
}

/// Assign 1-based acara numbers in iteration order
pub fn number<I>(keys: I) -> Vec<Race>
where
    I: IntoIterator<Item = RaceKey>,
{
    keys.into_iter()
        .enumerate()
        .map(|(i, key)| Race {
            acara_number: i as u32 + 1,
            key,
        })
        .collect()
}

/// Swap a race with its immediate neighbour and renumber
///
/// Moving the first race up, the last race down, or a race not in the
/// program leaves the order unchanged.
pub fn move_race(races: &[Race], key: &RaceKey, direction: Direction) -> Vec<Race> {
    let mut keys: Vec<RaceKey> = races.iter().map(|r| r.key.clone()).collect();

    if let Some(idx) = keys.iter().position(|k| k == key) {
        let neighbour = match direction {
            Direction::Up => idx.checked_sub(1),
            Direction::Down => Some(idx + 1).filter(|n| *n < keys.len()),
        };
        match neighbour {
            Some(n) => keys.swap(idx, n),
            None => tracing::debug!("Move {:?} of {} is a no-op", direction, key),
        }
    }

    number(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{AgeGroup, Category};
    use crate::store::MemoryOrderStore;
    use crate::types::Gender;

    fn key(style: Style, distance: u32, gender: Gender, age: AgeGroup) -> RaceKey {
        RaceKey {
            style,
            distance,
            gender,
            category: Category::Age(age),
        }
    }

    fn sample_keys() -> Vec<RaceKey> {
        vec![
            key(Style::Butterfly, 50, Gender::Male, AgeGroup::TenEleven),
            key(Style::Freestyle, 100, Gender::Female, AgeGroup::NineAndUnder),
            key(Style::Freestyle, 50, Gender::Female, AgeGroup::NineAndUnder),
            key(Style::Freestyle, 50, Gender::Male, AgeGroup::NineAndUnder),
            key(Style::Other("Kick".into()), 25, Gender::Male, AgeGroup::NineAndUnder),
            key(Style::Backstroke, 50, Gender::Male, AgeGroup::NineAndUnder),
        ]
    }

    fn acara_numbers(races: &[Race]) -> Vec<u32> {
        races.iter().map(|r| r.acara_number).collect()
    }

    #[test]
    fn test_default_order() {
        let keys = sample_keys();
        let races = ProgramSequencer::default().order(&keys, None);

        let order: Vec<&RaceKey> = races.iter().map(|r| &r.key).collect();
        assert_eq!(order[0], &keys[3]); // 9&U Free 50 Male
        assert_eq!(order[1], &keys[2]); // 9&U Free 50 Female
        assert_eq!(order[2], &keys[1]); // 9&U Free 100
        assert_eq!(order[3], &keys[5]); // 9&U Back
        assert_eq!(order[4], &keys[4]); // 9&U unlisted style
        assert_eq!(order[5], &keys[0]); // 10-11 Fly
        assert_eq!(acara_numbers(&races), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_custom_order_precedes_and_keeps_relative_order() {
        let keys = sample_keys();
        let stale = key(Style::Breaststroke, 200, Gender::Male, AgeGroup::SixteenEighteen);
        let custom = vec![keys[0].clone(), stale, keys[4].clone(), keys[0].clone()];

        let races = ProgramSequencer::default().order(&keys, Some(&custom));

        assert_eq!(races.len(), keys.len());
        assert_eq!(races[0].key, keys[0]);
        assert_eq!(races[1].key, keys[4]);
        assert_eq!(races[2].key, keys[3]);
        assert_eq!(acara_numbers(&races), (1..=6).collect::<Vec<_>>());
    }

    #[test]
    fn test_configured_style_priority() {
        let keys = sample_keys();
        let sequencer = ProgramSequencer::new(vec![Style::Backstroke, Style::Freestyle]);
        let races = sequencer.order(&keys, None);
        assert_eq!(races[0].key, keys[5]);
    }

    #[test]
    fn test_move_first_up_is_noop() {
        let keys = sample_keys();
        let races = ProgramSequencer::default().order(&keys, None);

        let moved = move_race(&races, &races[0].key, Direction::Up);
        assert_eq!(moved, races);

        let last = &races[races.len() - 1].key;
        let moved = move_race(&races, last, Direction::Down);
        assert_eq!(moved, races);
    }

    #[test]
    fn test_move_swaps_neighbours_and_renumbers() {
        let keys = sample_keys();
        let races = ProgramSequencer::default().order(&keys, None);

        let moved = move_race(&races, &races[2].key, Direction::Up);
        assert_eq!(moved[1].key, races[2].key);
        assert_eq!(moved[2].key, races[1].key);
        assert_eq!(moved[1].acara_number, 2);
        assert_eq!(acara_numbers(&moved), acara_numbers(&races));
    }

    #[test]
    fn test_move_and_save_round_trips_through_store() {
        let keys = sample_keys();
        let sequencer = ProgramSequencer::default();
        let mut store = MemoryOrderStore::default();

        let races = sequencer.order_from_store(&store, "ev1", &keys).unwrap();
        let moved = sequencer
            .move_and_save(&mut store, "ev1", &races, &races[3].key, Direction::Down)
            .unwrap();

        let reloaded = sequencer.order_from_store(&store, "ev1", &keys).unwrap();
        assert_eq!(reloaded, moved);
        assert_eq!(reloaded[4].key, races[3].key);

        // Other events are unaffected
        let other = sequencer.order_from_store(&store, "ev2", &keys).unwrap();
        assert_eq!(other, races);
    }
}

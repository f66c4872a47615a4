//! Meet data and the program → heats → results pipeline.
//!
//! A `Meet` holds one event's configuration, its roster and its entries,
//! and wires the engine stages together for callers that want whole
//! sheets rather than single stages.

use crate::heats::HeatBuilder;
use crate::program::{Direction, ProgramSequencer};
use crate::races::{discover, race_key_for};
use crate::results::rank_race;
use crate::store::ProgramOrderStore;
use crate::types::{Entrant, Entry, EventConfig, Heat, Race, RaceKey, RaceResult, Remark, Swimmer};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// JSON meet file layout
#[derive(Debug, Serialize, Deserialize)]
pub struct MeetFile {
    pub event: EventConfig,
    #[serde(default)]
    pub swimmers: Vec<Swimmer>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Heats of one numbered race
#[derive(Clone, Debug, PartialEq)]
pub struct RaceHeats {
    pub race: Race,
    pub heats: Vec<Heat>,
}

/// One event with its roster and entries
#[derive(Clone, Debug)]
pub struct Meet {
    event: EventConfig,
    swimmers: HashMap<String, Swimmer>,
    entries: Vec<Entry>,
}

impl Meet {
    /// Build a meet, keeping only entries for this event
    ///
    /// If two swimmers share an id the first one is kept.
    pub fn new(event: EventConfig, swimmers: Vec<Swimmer>, entries: Vec<Entry>) -> Self {
        let mut roster = HashMap::with_capacity(swimmers.len());
        for swimmer in swimmers {
            if roster.contains_key(&swimmer.id) {
                tracing::warn!("Duplicate swimmer id {}, keeping the first", swimmer.id);
                continue;
            }
            roster.insert(swimmer.id.clone(), swimmer);
        }

        let total = entries.len();
        let entries: Vec<Entry> = entries
            .into_iter()
            .filter(|e| e.event_id == event.id)
            .collect();
        if entries.len() < total {
            tracing::debug!(
                "Ignoring {} entries for other events",
                total - entries.len()
            );
        }

        if event.lanes_per_heat == 0 {
            tracing::warn!("Event {} has no lanes configured", event.id);
        }

        Self {
            event,
            swimmers: roster,
            entries,
        }
    }

    /// Load a meet from a JSON meet file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: MeetFile = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded meet {} from {:?}: {} swimmers, {} entries",
            file.event.id,
            path,
            file.swimmers.len(),
            file.entries.len()
        );
        Ok(Self::new(file.event, file.swimmers, file.entries))
    }

    pub fn event(&self) -> &EventConfig {
        &self.event
    }

    pub fn swimmer(&self, id: &str) -> Option<&Swimmer> {
        self.swimmers.get(id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Distinct races run at this event
    pub fn races(&self) -> BTreeSet<RaceKey> {
        discover(&self.entries, &self.swimmers, &self.event)
    }

    /// Numbered program, honouring the saved custom order
    pub fn program(
        &self,
        store: &dyn ProgramOrderStore,
        sequencer: &ProgramSequencer,
    ) -> Result<Vec<Race>> {
        let races = self.races();
        sequencer.order_from_store(store, &self.event.id, &races)
    }

    /// Move the race with the given acara number one step and save the order
    pub fn move_race(
        &self,
        store: &mut dyn ProgramOrderStore,
        sequencer: &ProgramSequencer,
        acara_number: u32,
        direction: Direction,
    ) -> Result<Vec<Race>> {
        let program = self.program(store, sequencer)?;
        let key = find_race(&program, acara_number)?.key.clone();
        sequencer.move_and_save(store, &self.event.id, &program, &key, direction)
    }

    /// Drop the saved order so the default order applies again
    pub fn reset_program(&self, store: &mut dyn ProgramOrderStore) -> Result<()> {
        store.clear(&self.event.id)
    }

    /// Every entrant whose entry belongs to the race, with or without times
    pub fn entrants_for(&self, key: &RaceKey) -> Vec<Entrant> {
        self.entries
            .iter()
            .filter(|e| e.style == key.style && e.distance == key.distance)
            .filter_map(|entry| {
                let swimmer = self.swimmers.get(&entry.swimmer_id)?;
                match race_key_for(entry, swimmer, &self.event) {
                    Some(k) if &k == key => Some(Entrant::new(entry.clone(), swimmer.clone())),
                    _ => None,
                }
            })
            .collect()
    }

    /// Heats for one race; entrants without a valid seed time are left out
    pub fn heat_sheet(&self, key: &RaceKey, builder: &HeatBuilder) -> Vec<Heat> {
        let seeded: Vec<Entrant> = self
            .entrants_for(key)
            .into_iter()
            .filter(|e| e.entry.seed_ms() > 0)
            .collect();
        builder.build(&seeded, self.event.lanes_per_heat)
    }

    /// Heats for every race of a program
    pub fn heat_sheets(&self, program: &[Race], builder: &HeatBuilder) -> Vec<RaceHeats> {
        program
            .iter()
            .map(|race| RaceHeats {
                race: race.clone(),
                heats: self.heat_sheet(&race.key, builder),
            })
            .collect()
    }

    /// Ranked result of one race
    pub fn results(&self, race: &Race, excluded_remarks: &[Remark]) -> RaceResult {
        rank_race(race, &self.entrants_for(&race.key), excluded_remarks)
    }

    /// Ranked results of every race of a program
    pub fn results_book(&self, program: &[Race], excluded_remarks: &[Remark]) -> Vec<RaceResult> {
        program
            .iter()
            .map(|race| self.results(race, excluded_remarks))
            .collect()
    }
}

/// Race with the given acara number
pub fn find_race(program: &[Race], acara_number: u32) -> Result<&Race> {
    program
        .iter()
        .find(|r| r.acara_number == acara_number)
        .ok_or_else(|| {
            Error::Meet(format!(
                "No acara {} in a program of {} races",
                acara_number,
                program.len()
            ))
        })
}

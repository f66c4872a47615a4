//! Heat and lane assignment.
//!
//! Entrants are seeded slowest-first. The first heat takes the leftover
//! (`total mod lanes`) slowest swimmers so that every later heat is full,
//! and heats then run in increasing speed. Within a heat the fastest swimmer
//! gets the centre lane and the rest fan outwards.

use crate::config::HeatConfig;
use crate::types::{Entrant, Heat, Lane};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How entrants with identical seed times are ordered
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Coin-flip between dead-heat seeds
    #[default]
    Random,
    /// Alphabetical by swimmer name
    SwimmerName,
    /// By swimmer id
    SwimmerId,
}

/// Centre-out lane order for a pool with `lanes` lanes
///
/// The i-th fastest swimmer of a heat swims in `lane_preference(n)[i]`.
pub fn lane_preference(lanes: u32) -> Vec<u32> {
    match lanes {
        8 => vec![4, 5, 3, 6, 2, 7, 1, 8],
        6 => vec![3, 4, 2, 5, 1, 6],
        4 => vec![2, 3, 1, 4],
        n => {
            let center = (n + 1) / 2;
            let mut order = Vec::with_capacity(n as usize);
            if n > 0 {
                order.push(center);
            }
            let mut offset = 1;
            while (order.len() as u32) < n {
                if center + offset <= n {
                    order.push(center + offset);
                }
                if offset < center {
                    order.push(center - offset);
                }
                offset += 1;
            }
            order
        }
    }
}

/// Number of swimmers in heat 1 for `total` entrants
pub fn first_heat_size(total: usize, lanes_per_heat: usize) -> usize {
    if total == 0 || lanes_per_heat == 0 {
        return 0;
    }
    match total % lanes_per_heat {
        0 => lanes_per_heat,
        remainder => remainder,
    }
}

/// Builds heat sheets for a single race
#[derive(Clone, Debug, Default)]
pub struct HeatBuilder {
    tie_break: TieBreak,
    seed: Option<u64>,
}

impl HeatBuilder {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            seed: None,
        }
    }

    /// Fix the random tie-break so repeated builds give the same sheet
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_config(config: &HeatConfig) -> Self {
        Self {
            tie_break: config.tie_break,
            seed: config.seed,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Split entrants into heats and assign lanes
    ///
    /// Entrants are expected to carry a valid seed time; any with a 0 ms
    /// seed are left out. Returns no heats for an empty field or a pool
    /// without lanes.
    pub fn build(&self, entrants: &[Entrant], lanes_per_heat: u32) -> Vec<Heat> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.build_with_rng(entrants, lanes_per_heat, &mut rng)
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        entrants: &[Entrant],
        lanes_per_heat: u32,
        rng: &mut R,
    ) -> Vec<Heat> {
        if lanes_per_heat == 0 {
            tracing::warn!("Cannot build heats for a pool with no lanes");
            return Vec::new();
        }

        let mut seeded: Vec<&Entrant> = entrants
            .iter()
            .filter(|e| {
                let valid = e.entry.seed_ms() > 0;
                if !valid {
                    tracing::warn!("Leaving {} out of heats: no valid seed time", e.name());
                }
                valid
            })
            .collect();

        if seeded.is_empty() {
            return Vec::new();
        }

        self.sort_slowest_first(&mut seeded, rng);

        let lanes = lanes_per_heat as usize;
        let first = first_heat_size(seeded.len(), lanes);
        let preference = lane_preference(lanes_per_heat);

        let mut groups = vec![&seeded[..first]];
        groups.extend(seeded[first..].chunks(lanes));

        let heats: Vec<Heat> = groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let mut heat_lanes: Vec<Lane> = (1..=lanes_per_heat)
                    .map(|number| Lane {
                        number,
                        entrant: None,
                    })
                    .collect();

                // group is slowest-first; lanes are filled fastest-first
                for (entrant, lane) in group.iter().rev().zip(&preference) {
                    heat_lanes[*lane as usize - 1].entrant = Some((*entrant).clone());
                }

                Heat {
                    heat_number: i as u32 + 1,
                    lanes: heat_lanes,
                }
            })
            .collect();

        tracing::debug!(
            "Seeded {} entrants into {} heats of {} lanes",
            seeded.len(),
            heats.len(),
            lanes_per_heat
        );

        heats
    }

    fn sort_slowest_first<R: Rng + ?Sized>(&self, seeded: &mut [&Entrant], rng: &mut R) {
        match self.tie_break {
            TieBreak::Random => {
                // Stable sort keeps the shuffled order among equal seeds
                seeded.shuffle(rng);
                seeded.sort_by(|a, b| b.entry.seed_ms().cmp(&a.entry.seed_ms()));
            }
            TieBreak::SwimmerName => seeded.sort_by(|a, b| {
                b.entry
                    .seed_ms()
                    .cmp(&a.entry.seed_ms())
                    .then_with(|| a.name().cmp(b.name()))
                    .then_with(|| a.swimmer.id.cmp(&b.swimmer.id))
            }),
            TieBreak::SwimmerId => seeded.sort_by(|a, b| {
                b.entry
                    .seed_ms()
                    .cmp(&a.entry.seed_ms())
                    .then_with(|| a.swimmer.id.cmp(&b.swimmer.id))
            }),
        }
    }
}

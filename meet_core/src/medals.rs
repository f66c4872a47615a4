//! Medal award and tabulation.
//!
//! Per race:
//! - Gold goes to every rank-1 entrant
//! - Silver goes to rank-2 entrants only when gold was not shared
//! - Bronze goes to rank-3 entrants only while fewer than three gold and
//!   silver medals have been handed out
//!
//! Only ranked entries can medal, so the remark set that keeps an entry out
//! of the ranking also keeps it off the podium.

use crate::category::{sort_key, Category};
use crate::results::competition_ranks;
use crate::types::{
    BestSwimmerGroup, ClubMedalTally, Gender, Medal, MedalCount, RaceResult, RankedEntry,
    SwimmerMedalTally,
};
use std::collections::{BTreeMap, HashMap};

/// Medal for a rank, given how many golds and silvers the race awarded
pub fn medal_for(rank: u32, gold_count: usize, silver_count: usize) -> Option<Medal> {
    match rank {
        1 => Some(Medal::Gold),
        2 if gold_count == 1 => Some(Medal::Silver),
        3 if gold_count + silver_count < 3 => Some(Medal::Bronze),
        _ => None,
    }
}

/// Set the medal of every entry in one race result
pub fn award(entries: &mut [RankedEntry]) {
    let count = |place: u32| entries.iter().filter(|e| e.rank == Some(place)).count();

    let gold_count = count(1);
    let silver_count = if gold_count == 1 { count(2) } else { 0 };

    for entry in entries.iter_mut() {
        entry.medal = entry
            .rank
            .and_then(|place| medal_for(place, gold_count, silver_count));
    }
}

struct SwimmerAccumulator {
    name: String,
    club: String,
    medals: MedalCount,
}

fn accumulate_swimmers<'a, I>(entries: I) -> BTreeMap<String, SwimmerAccumulator>
where
    I: IntoIterator<Item = &'a RankedEntry>,
{
    let mut by_swimmer: BTreeMap<String, SwimmerAccumulator> = BTreeMap::new();
    for entry in entries {
        if let Some(medal) = entry.medal {
            let swimmer = &entry.entrant.swimmer;
            let acc = by_swimmer
                .entry(swimmer.id.clone())
                .or_insert_with(|| SwimmerAccumulator {
                    name: swimmer.name.clone(),
                    club: swimmer.club.clone(),
                    medals: MedalCount::default(),
                });
            acc.medals.add(medal);
        }
    }
    by_swimmer
}

fn swimmer_leaderboard(by_swimmer: BTreeMap<String, SwimmerAccumulator>) -> Vec<SwimmerMedalTally> {
    let mut tallies: Vec<SwimmerMedalTally> = by_swimmer
        .into_iter()
        .map(|(swimmer_id, acc)| SwimmerMedalTally {
            swimmer_id,
            name: acc.name,
            club: acc.club,
            medals: acc.medals,
            rank: 0,
        })
        .collect();

    tallies.sort_by(|a, b| {
        b.medals
            .score()
            .cmp(&a.medals.score())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.swimmer_id.cmp(&b.swimmer_id))
    });

    let ranks = competition_ranks(&tallies, |t| t.medals.score());
    for (tally, rank) in tallies.iter_mut().zip(ranks) {
        tally.rank = rank;
    }
    tallies
}

/// Medal leaderboard of individual swimmers across all races
pub fn tabulate_swimmers(results: &[RaceResult]) -> Vec<SwimmerMedalTally> {
    let tallies = swimmer_leaderboard(accumulate_swimmers(
        results.iter().flat_map(|r| r.entries.iter()),
    ));
    tracing::debug!("Tabulated medals for {} swimmers", tallies.len());
    tallies
}

/// Medal leaderboard of clubs across all races
///
/// A club's counts are the sum of its swimmers' medals. Swimmers without
/// a club are left out.
pub fn tabulate_clubs(results: &[RaceResult]) -> Vec<ClubMedalTally> {
    let mut by_club: BTreeMap<String, MedalCount> = BTreeMap::new();
    for entry in results.iter().flat_map(|r| r.entries.iter()) {
        let club = entry.entrant.club().trim();
        if let (Some(medal), false) = (entry.medal, club.is_empty()) {
            by_club.entry(club.to_string()).or_default().add(medal);
        }
    }

    let mut tallies: Vec<ClubMedalTally> = by_club
        .into_iter()
        .map(|(club, medals)| ClubMedalTally {
            club,
            medals,
            rank: 0,
        })
        .collect();

    tallies.sort_by(|a, b| {
        b.medals
            .score()
            .cmp(&a.medals.score())
            .then_with(|| a.club.cmp(&b.club))
    });

    let ranks = competition_ranks(&tallies, |t| t.medals.score());
    for (tally, rank) in tallies.iter_mut().zip(ranks) {
        tally.rank = rank;
    }

    tracing::debug!("Tabulated medals for {} clubs", tallies.len());
    tallies
}

/// Best swimmer(s) of each category and gender
///
/// Only the top-scoring swimmers of a group are kept; ties keep them all.
/// Groups are returned in program order of their category.
pub fn best_swimmers(results: &[RaceResult]) -> Vec<BestSwimmerGroup> {
    let mut groups: HashMap<(Category, Gender), Vec<&RankedEntry>> = HashMap::new();
    for result in results {
        let key = (result.race.key.category.clone(), result.race.key.gender);
        groups.entry(key).or_default().extend(result.entries.iter());
    }

    let mut best: Vec<BestSwimmerGroup> = groups
        .into_iter()
        .filter_map(|((category, gender), entries)| {
            let leaders: Vec<SwimmerMedalTally> = swimmer_leaderboard(accumulate_swimmers(entries))
                .into_iter()
                .filter(|t| t.rank == 1)
                .collect();
            if leaders.is_empty() {
                None
            } else {
                Some(BestSwimmerGroup {
                    category,
                    gender,
                    swimmers: leaders,
                })
            }
        })
        .collect();

    best.sort_by(|a, b| {
        sort_key(&a.category)
            .cmp(&sort_key(&b.category))
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.gender.cmp(&b.gender))
    });

    best
}

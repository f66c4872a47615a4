//! Race result ranking.
//!
//! Ranks use competition ranking: equal times share a place and the next
//! distinct time skips accordingly (1, 2, 2, 4). Entries without a valid
//! final time, or carrying an excluded remark, are listed after the ranked
//! field with no place.

use crate::medals::award;
use crate::types::{Entrant, Race, RaceResult, RankedEntry, Remark};

/// Competition ranks for items already sorted best-first
///
/// Items with equal keys share the rank of the first of them.
pub fn competition_ranks<T, K, F>(items: &[T], key: F) -> Vec<u32>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranks = Vec::with_capacity(items.len());
    let mut previous: Option<K> = None;

    for (i, item) in items.iter().enumerate() {
        let current = key(item);
        let rank = match (&previous, ranks.last()) {
            (Some(prev), Some(&last)) if *prev == current => last,
            _ => i as u32 + 1,
        };
        ranks.push(rank);
        previous = Some(current);
    }

    ranks
}

/// Whether an entrant takes part in the ranking
pub fn is_rankable(entrant: &Entrant, excluded_remarks: &[Remark]) -> bool {
    entrant.entry.final_ms() > 0
        && entrant
            .entry
            .remark
            .map_or(true, |remark| !excluded_remarks.contains(&remark))
}

/// Rank a race's entrants by final time
///
/// Medals are derived for the ranked entries. Unranked entries follow,
/// sorted by swimmer name.
pub fn rank(entrants: &[Entrant], excluded_remarks: &[Remark]) -> Vec<RankedEntry> {
    let (mut rankable, mut unranked): (Vec<&Entrant>, Vec<&Entrant>) = entrants
        .iter()
        .partition(|e| is_rankable(e, excluded_remarks));

    rankable.sort_by(|a, b| {
        a.entry
            .final_ms()
            .cmp(&b.entry.final_ms())
            .then_with(|| a.name().cmp(b.name()))
            .then_with(|| a.swimmer.id.cmp(&b.swimmer.id))
    });
    unranked.sort_by(|a, b| {
        a.name()
            .cmp(b.name())
            .then_with(|| a.swimmer.id.cmp(&b.swimmer.id))
    });

    let ranks = competition_ranks(&rankable, |e| e.entry.final_ms());

    let mut ranked: Vec<RankedEntry> = rankable
        .into_iter()
        .zip(ranks)
        .map(|(entrant, place)| RankedEntry {
            final_ms: entrant.entry.final_ms(),
            entrant: entrant.clone(),
            rank: Some(place),
            medal: None,
        })
        .collect();

    award(&mut ranked);

    tracing::debug!(
        "Ranked {} entrants, {} unranked",
        ranked.len(),
        unranked.len()
    );

    ranked.extend(unranked.into_iter().map(|entrant| RankedEntry {
        final_ms: entrant.entry.final_ms(),
        entrant: entrant.clone(),
        rank: None,
        medal: None,
    }));

    ranked
}

/// Rank one race and attach its program slot
pub fn rank_race(race: &Race, entrants: &[Entrant], excluded_remarks: &[Remark]) -> RaceResult {
    RaceResult {
        race: race.clone(),
        entries: rank(entrants, excluded_remarks),
    }
}

// Optimal lineup computation and bench efficiency for a single team-week.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::roster::{LineupSlots, RosterEntry};
use super::slot::{Position, Slot};

/// Points started, points an optimal lineup would have started, and the gap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamWeekResult {
    pub actual: f64,
    pub potential: f64,
    pub left: f64,
}

/// One player placed by the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalStarter {
    pub slot: Slot,
    pub player_key: String,
    pub position: Position,
    pub points: f64,
}

/// The best legal lineup for a team-week.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptimalLineup {
    pub starters: Vec<OptimalStarter>,
}

impl OptimalLineup {
    pub fn total(&self) -> f64 {
        self.starters.iter().fold(0.0, |total, s| total + s.points)
    }
}

/// A deduplicated, scorable player.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    key: Cow<'a, str>,
    position: Position,
    points: f64,
}

/// Sum the points of every entry the manager actually started.
///
/// An entry counts when its slot is one of `starting` and it has a known
/// position and finite points. Everything else contributes 0.
pub fn actual_starter_points(entries: &[RosterEntry], starting: &BTreeSet<Slot>) -> f64 {
    entries
        .iter()
        .filter(|e| e.slot.is_some_and(|s| s.is_starting() && starting.contains(&s)))
        .filter(|e| e.position.is_some())
        .filter_map(RosterEntry::scored)
        .fold(0.0, |total, p| total + p)
}

/// Compute the highest-scoring legal lineup.
///
/// Fill order:
/// 1. Collapse duplicate appearances of a player to their best score
/// 2. Fill QB, RB, WR, TE, DST, K from each position pool, best first
/// 3. Fill FLEX from the remaining RB/WR/TE
/// 4. Fill SUPERFLEX from the remaining QB/RB/WR/TE
///
/// Filling narrow slots before wide ones is exact because eligibility is
/// nested (each FLEX position has its own strict slot, FLEX ⊂ SUPERFLEX).
/// Slots without enough eligible players stay empty.
pub fn optimal_lineup(entries: &[RosterEntry], slots: &LineupSlots) -> OptimalLineup {
    let candidates = best_appearances(entries);

    let mut pools: HashMap<Position, Vec<&Candidate>> = HashMap::new();
    for c in &candidates {
        pools.entry(c.position).or_default().push(c);
    }
    for pool in pools.values_mut() {
        pool.sort_by(|a, b| by_points_desc(a, b));
    }

    let mut used: HashSet<&str> = HashSet::new();
    let mut starters = Vec::new();

    // Slot::ALL lists single-position slots first and FLEX before SUPERFLEX
    let (flex_slots, strict_slots): (Vec<Slot>, Vec<Slot>) = Slot::ALL
        .into_iter()
        .filter(Slot::is_starting)
        .partition(Slot::is_flex);

    for slot in strict_slots {
        let count = slots.count(slot);
        if count == 0 {
            continue;
        }
        let Some(pool) = slot.eligible_positions().first().and_then(|p| pools.get(p)) else {
            continue;
        };
        for c in pool.iter().take(count) {
            used.insert(&*c.key);
            starters.push(starter(slot, c));
        }
    }

    for slot in flex_slots {
        let count = slots.count(slot);
        if count == 0 {
            continue;
        }
        let mut remaining: Vec<&Candidate> = slot
            .eligible_positions()
            .iter()
            .filter_map(|p| pools.get(p))
            .flatten()
            .copied()
            .filter(|c| !used.contains(&*c.key))
            .collect();
        remaining.sort_by(|a, b| by_points_desc(a, b));
        for c in remaining.into_iter().take(count) {
            used.insert(&*c.key);
            starters.push(starter(slot, c));
        }
    }

    OptimalLineup { starters }
}

/// Total points of the optimal lineup.
pub fn optimal_starter_points(entries: &[RosterEntry], slots: &LineupSlots) -> f64 {
    optimal_lineup(entries, slots).total()
}

/// Points the optimal lineup would have added over what was started.
/// Never negative; an actual total above the optimum means inconsistent
/// input, not a manager beating the optimizer.
pub fn bench_points_left(entries: &[RosterEntry], slots: &LineupSlots) -> f64 {
    evaluate_team_week(entries, slots).left
}

/// Actual, potential and left-on-bench for one team-week.
pub fn evaluate_team_week(entries: &[RosterEntry], slots: &LineupSlots) -> TeamWeekResult {
    let actual = actual_starter_points(entries, &slots.starting_slots());
    let potential = optimal_starter_points(entries, slots);
    TeamWeekResult {
        actual,
        potential,
        left: (potential - actual).max(0.0),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Keep one candidate per player: their highest-scoring appearance with a
/// known position. Output is ordered by first appearance.
///
/// Entries with neither id nor name cannot be matched to anything else, so
/// each one stands alone under a key derived from its row index.
fn best_appearances(entries: &[RosterEntry]) -> Vec<Candidate<'_>> {
    let mut index: HashMap<Cow<str>, usize> = HashMap::new();
    let mut out: Vec<Candidate> = Vec::new();

    for (row, e) in entries.iter().enumerate() {
        let (Some(position), Some(points)) = (e.position, e.scored()) else {
            continue;
        };
        let key: Cow<str> = match e.player_key() {
            "" => Cow::Owned(format!("#{row}")),
            key => Cow::Borrowed(key),
        };
        match index.get(&key) {
            Some(&i) => {
                if points > out[i].points {
                    out[i].points = points;
                    out[i].position = position;
                }
            }
            None => {
                index.insert(key.clone(), out.len());
                out.push(Candidate {
                    key,
                    position,
                    points,
                });
            }
        }
    }

    out
}

fn by_points_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.points
        .partial_cmp(&a.points)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.key.cmp(&b.key))
}

fn starter(slot: Slot, c: &Candidate) -> OptimalStarter {
    OptimalStarter {
        slot,
        player_key: c.key.to_string(),
        position: c.position,
        points: c.points,
    }
}

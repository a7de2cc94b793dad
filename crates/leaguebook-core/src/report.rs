// Bench-efficiency reporting across a league's history.
//
// Runs the optimizer once per team-week and rolls the results up by
// canonical owner and season. Nothing here carries state between calls:
// callers re-run the whole evaluation whenever inputs change.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::identity::AliasMap;
use crate::lineup::{evaluate_team_week, RosterEntry, SeasonLineups, TeamWeekResult};

// ---------------------------------------------------------------------------
// Inputs and per-week output
// ---------------------------------------------------------------------------

/// One team's roster for one scoring week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWeek {
    pub season: u16,
    pub week: u16,
    /// Team name as it appeared that season.
    pub team: String,
    /// Raw owner name as it appeared in the source data.
    pub owner: String,
    pub entries: Vec<RosterEntry>,
}

/// Evaluated team-week, keyed by canonical owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWeekReport {
    pub season: u16,
    pub week: u16,
    pub team: String,
    pub owner: String,
    pub result: TeamWeekResult,
}

// ---------------------------------------------------------------------------
// Roll-ups
// ---------------------------------------------------------------------------

/// Summed results over some set of team-weeks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EfficiencyTotals {
    pub weeks: usize,
    pub actual: f64,
    pub potential: f64,
    pub left: f64,
}

impl EfficiencyTotals {
    pub fn add(&mut self, result: &TeamWeekResult) {
        self.weeks += 1;
        self.actual += result.actual;
        self.potential += result.potential;
        self.left += result.left;
    }

    /// Share of potential points actually started, in 0.0..=1.0.
    /// None when there was nothing to start.
    pub fn efficiency(&self) -> Option<f64> {
        (self.potential > 0.0).then(|| (self.actual / self.potential).min(1.0))
    }

    /// Average points left on the bench per week.
    pub fn left_per_week(&self) -> f64 {
        if self.weeks == 0 {
            0.0
        } else {
            self.left / self.weeks as f64
        }
    }
}

/// Career and per-season bench efficiency for one canonical owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub owner: String,
    pub career: EfficiencyTotals,
    pub seasons: BTreeMap<u16, EfficiencyTotals>,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Evaluate every team-week.
///
/// The owner is canonicalized through `aliases` and the lineup requirements
/// come from the team-week's season. Output is ordered by season, week, team.
pub fn evaluate(
    team_weeks: &[TeamWeek],
    lineups: &SeasonLineups,
    aliases: &AliasMap,
) -> Vec<TeamWeekReport> {
    let mut reports: Vec<TeamWeekReport> = team_weeks
        .iter()
        .map(|tw| {
            let result = evaluate_team_week(&tw.entries, lineups.for_season(tw.season));
            debug!(
                "{} week {} {}: actual={:.2} potential={:.2} left={:.2}",
                tw.season, tw.week, tw.team, result.actual, result.potential, result.left
            );
            TeamWeekReport {
                season: tw.season,
                week: tw.week,
                team: tw.team.clone(),
                owner: aliases.canonicalize(&tw.owner),
                result,
            }
        })
        .collect();

    reports.sort_by(|a, b| {
        (a.season, a.week)
            .cmp(&(b.season, b.week))
            .then_with(|| a.team.cmp(&b.team))
    });
    reports
}

/// Group reports by canonical owner.
///
/// Sorted by career points left on the bench, most first; ties by name.
/// Reports with a blank owner are grouped under the empty string.
pub fn summarize_by_owner(reports: &[TeamWeekReport]) -> Vec<OwnerSummary> {
    let mut by_owner: BTreeMap<&str, OwnerSummary> = BTreeMap::new();

    for r in reports {
        let summary = by_owner
            .entry(r.owner.as_str())
            .or_insert_with(|| OwnerSummary {
                owner: r.owner.clone(),
                career: EfficiencyTotals::default(),
                seasons: BTreeMap::new(),
            });
        summary.career.add(&r.result);
        summary.seasons.entry(r.season).or_default().add(&r.result);
    }

    let mut summaries: Vec<OwnerSummary> = by_owner.into_values().collect();
    summaries.sort_by(|a, b| {
        b.career
            .left
            .partial_cmp(&a.career.left)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.owner.cmp(&b.owner))
    });
    summaries
}

/// The `limit` team-weeks with the most points left on the bench.
pub fn biggest_misses(reports: &[TeamWeekReport], limit: usize) -> Vec<&TeamWeekReport> {
    let mut sorted: Vec<&TeamWeekReport> = reports.iter().filter(|r| r.result.left > 0.0).collect();
    sorted.sort_by(|a, b| {
        b.result
            .left
            .partial_cmp(&a.result.left)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(limit);
    sorted
}

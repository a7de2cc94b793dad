// Weekly roster entries and league lineup requirements.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::slot::{Position, Slot};

/// One player on one team's roster for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Source player id. May be blank for hand-entered rows.
    pub player_id: String,
    pub player_name: String,
    /// The slot the manager actually put the player in. None if the source
    /// slot code was missing or unrecognized.
    pub slot: Option<Slot>,
    /// The player's eligible position. None if missing or unrecognized.
    pub position: Option<Position>,
    /// Actual fantasy points for the week.
    pub points: Option<f64>,
    #[serde(default)]
    pub projected: Option<f64>,
}

impl RosterEntry {
    /// Identity used to collapse duplicate appearances of the same player:
    /// the source id when present, otherwise the trimmed name.
    pub fn player_key(&self) -> &str {
        let id = self.player_id.trim();
        if id.is_empty() {
            self.player_name.trim()
        } else {
            id
        }
    }

    /// Points usable in a total. Missing and non-finite values (NaN from a
    /// bad numeric parse) count as nothing.
    pub fn scored(&self) -> Option<f64> {
        self.points.filter(|p| p.is_finite())
    }
}

/// Slot counts for one league season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupSlots {
    counts: BTreeMap<Slot, usize>,
}

impl LineupSlots {
    /// A lineup with no slots at all.
    pub fn empty() -> Self {
        LineupSlots {
            counts: BTreeMap::new(),
        }
    }

    /// Build lineup slots from a config mapping slot codes to counts, e.g.
    /// `{"QB": 1, "RB": 2, "FLEX": 1, "BE": 7}`.
    ///
    /// Unrecognized codes are skipped with a warning. Codes that map to the
    /// same slot ("BE" and "BN") are summed.
    pub fn from_config(config: &HashMap<String, usize>) -> Self {
        let mut counts = BTreeMap::new();
        for (code, &count) in config {
            match Slot::from_str_slot(code) {
                Some(slot) => *counts.entry(slot).or_insert(0) += count,
                None => warn!("ignoring unknown lineup slot code {:?}", code),
            }
        }
        LineupSlots { counts }
    }

    /// Set the count for a slot, returning self for chaining.
    pub fn with(mut self, slot: Slot, count: usize) -> Self {
        self.counts.insert(slot, count);
        self
    }

    pub fn count(&self, slot: Slot) -> usize {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    /// Slot types that score for this league: every slot with a positive
    /// count, excluding bench and IR.
    pub fn starting_slots(&self) -> BTreeSet<Slot> {
        self.counts
            .iter()
            .filter(|(slot, &count)| slot.is_starting() && count > 0)
            .map(|(&slot, _)| slot)
            .collect()
    }

    /// Total number of starters an optimal lineup may use.
    pub fn starter_count(&self) -> usize {
        self.counts
            .iter()
            .filter(|(slot, _)| slot.is_starting())
            .map(|(_, &count)| count)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        self.counts.iter().map(|(&slot, &count)| (slot, count))
    }
}

impl Default for LineupSlots {
    /// 1 QB, 2 RB, 2 WR, 1 TE, 1 FLEX, 1 DST, 1 K, 7 bench, 1 IR.
    fn default() -> Self {
        LineupSlots::empty()
            .with(Slot::Quarterback, 1)
            .with(Slot::RunningBack, 2)
            .with(Slot::WideReceiver, 2)
            .with(Slot::TightEnd, 1)
            .with(Slot::Flex, 1)
            .with(Slot::Defense, 1)
            .with(Slot::Kicker, 1)
            .with(Slot::Bench, 7)
            .with(Slot::InjuredReserve, 1)
    }
}

/// Lineup requirements across a league's history. Leagues change their
/// starting slots over time (adding a superflex, dropping kickers), so each
/// season may override the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonLineups {
    pub default: LineupSlots,
    pub by_season: BTreeMap<u16, LineupSlots>,
}

impl SeasonLineups {
    pub fn new(default: LineupSlots) -> Self {
        SeasonLineups {
            default,
            by_season: BTreeMap::new(),
        }
    }

    pub fn with_season(mut self, season: u16, slots: LineupSlots) -> Self {
        self.by_season.insert(season, slots);
        self
    }

    pub fn for_season(&self, season: u16) -> &LineupSlots {
        self.by_season.get(&season).unwrap_or(&self.default)
    }
}

// Lineup slots, player positions, and the eligibility table between them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ESPN lineup slot ID constants (from ESPN Fantasy API v3, football)
// ---------------------------------------------------------------------------

pub const ESPN_SLOT_QB: u16 = 0;
pub const ESPN_SLOT_RB: u16 = 2;
pub const ESPN_SLOT_WR: u16 = 4;
pub const ESPN_SLOT_TE: u16 = 6;
pub const ESPN_SLOT_OP: u16 = 7; // QB/RB/WR/TE superflex
pub const ESPN_SLOT_DST: u16 = 16;
pub const ESPN_SLOT_K: u16 = 17;
pub const ESPN_SLOT_BE: u16 = 20;
pub const ESPN_SLOT_IR: u16 = 21;
pub const ESPN_SLOT_FLEX: u16 = 23; // RB/WR/TE

// ESPN `defaultPositionId` values.
pub const ESPN_POS_QB: u16 = 1;
pub const ESPN_POS_RB: u16 = 2;
pub const ESPN_POS_WR: u16 = 3;
pub const ESPN_POS_TE: u16 = 4;
pub const ESPN_POS_K: u16 = 5;
pub const ESPN_POS_DST: u16 = 16;

/// A player's eligible position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position string. Accepts ESPN, Yahoo and Sleeper spellings
    /// ("D/ST", "DEF", "PK") as well as a bare numeric ESPN position id.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u16>() {
            return position_from_espn_id(id);
        }
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" | "DEFENSE" => Some(Position::Defense),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A weekly lineup slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Flex,
    Superflex,
    Defense,
    Kicker,
    Bench,
    InjuredReserve,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::Quarterback,
        Slot::RunningBack,
        Slot::WideReceiver,
        Slot::TightEnd,
        Slot::Flex,
        Slot::Superflex,
        Slot::Defense,
        Slot::Kicker,
        Slot::Bench,
        Slot::InjuredReserve,
    ];

    /// Parse a slot string.
    ///
    /// Handles the common platform spellings:
    /// - "FLEX", "RB/WR/TE", "W/R/T" -> Flex
    /// - "SUPERFLEX", "SUPER_FLEX", "OP", "Q/W/R/T" -> Superflex
    /// - "BE", "BN", "BENCH" -> Bench
    ///
    /// A bare number is treated as an ESPN lineup slot id.
    pub fn from_str_slot(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u16>() {
            return slot_from_espn_id(id);
        }
        match s.to_uppercase().as_str() {
            "QB" => Some(Slot::Quarterback),
            "RB" => Some(Slot::RunningBack),
            "WR" => Some(Slot::WideReceiver),
            "TE" => Some(Slot::TightEnd),
            "FLEX" | "RB/WR/TE" | "W/R/T" | "WRRB_FLEX" => Some(Slot::Flex),
            "SUPERFLEX" | "SUPER_FLEX" | "SFLEX" | "OP" | "Q/W/R/T" => Some(Slot::Superflex),
            "DST" | "D/ST" | "DEF" => Some(Slot::Defense),
            "K" | "PK" => Some(Slot::Kicker),
            "BE" | "BN" | "BENCH" => Some(Slot::Bench),
            "IR" | "IL" => Some(Slot::InjuredReserve),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Slot::Quarterback => "QB",
            Slot::RunningBack => "RB",
            Slot::WideReceiver => "WR",
            Slot::TightEnd => "TE",
            Slot::Flex => "FLEX",
            Slot::Superflex => "SUPERFLEX",
            Slot::Defense => "DST",
            Slot::Kicker => "K",
            Slot::Bench => "BE",
            Slot::InjuredReserve => "IR",
        }
    }

    /// Whether players in this slot count toward the weekly score.
    pub fn is_starting(&self) -> bool {
        !matches!(self, Slot::Bench | Slot::InjuredReserve)
    }

    /// Whether this slot accepts more than one position.
    pub fn is_flex(&self) -> bool {
        matches!(self, Slot::Flex | Slot::Superflex)
    }

    /// Positions that may be started in this slot.
    pub fn eligible_positions(&self) -> &'static [Position] {
        match self {
            Slot::Quarterback => &[Position::Quarterback],
            Slot::RunningBack => &[Position::RunningBack],
            Slot::WideReceiver => &[Position::WideReceiver],
            Slot::TightEnd => &[Position::TightEnd],
            Slot::Flex => &[
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd,
            ],
            Slot::Superflex => &[
                Position::Quarterback,
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd,
            ],
            Slot::Defense => &[Position::Defense],
            Slot::Kicker => &[Position::Kicker],
            Slot::Bench | Slot::InjuredReserve => &[],
        }
    }

    pub fn accepts(&self, pos: Position) -> bool {
        self.eligible_positions().contains(&pos)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// ESPN ID mapping functions
// ---------------------------------------------------------------------------

/// Map an ESPN lineup slot id to a Slot.
/// Returns None for slots a standard league never uses (IDP, TQB, HC, ...).
pub fn slot_from_espn_id(slot_id: u16) -> Option<Slot> {
    match slot_id {
        ESPN_SLOT_QB => Some(Slot::Quarterback),
        ESPN_SLOT_RB => Some(Slot::RunningBack),
        ESPN_SLOT_WR => Some(Slot::WideReceiver),
        ESPN_SLOT_TE => Some(Slot::TightEnd),
        ESPN_SLOT_OP => Some(Slot::Superflex),
        ESPN_SLOT_DST => Some(Slot::Defense),
        ESPN_SLOT_K => Some(Slot::Kicker),
        ESPN_SLOT_BE => Some(Slot::Bench),
        ESPN_SLOT_IR => Some(Slot::InjuredReserve),
        ESPN_SLOT_FLEX => Some(Slot::Flex),
        _ => None,
    }
}

/// Map an ESPN `defaultPositionId` to a Position.
pub fn position_from_espn_id(position_id: u16) -> Option<Position> {
    match position_id {
        ESPN_POS_QB => Some(Position::Quarterback),
        ESPN_POS_RB => Some(Position::RunningBack),
        ESPN_POS_WR => Some(Position::WideReceiver),
        ESPN_POS_TE => Some(Position::TightEnd),
        ESPN_POS_K => Some(Position::Kicker),
        ESPN_POS_DST => Some(Position::Defense),
        _ => None,
    }
}

// Lineup domain: slots and positions, roster entries, and the optimizer that
// measures points left on the bench.

pub mod optimizer;
pub mod roster;
pub mod slot;

pub use optimizer::{
    actual_starter_points, bench_points_left, evaluate_team_week, optimal_lineup,
    optimal_starter_points, OptimalLineup, OptimalStarter, TeamWeekResult,
};
pub use roster::{LineupSlots, RosterEntry, SeasonLineups};
pub use slot::{Position, Slot};

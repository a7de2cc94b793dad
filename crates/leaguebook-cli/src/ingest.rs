// Roster history loading from normalized CSV.
//
// One row per player per team-week:
// season,week,team,owner,player_id,player,slot,position,points,projected
//
// Slot and position columns accept either platform string codes or ESPN
// numeric ids. Points that are blank or not numbers are kept as missing so
// the optimizer can exclude them.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use leaguebook_core::lineup::{Position, RosterEntry, Slot};
use leaguebook_core::report::TeamWeek;
use serde::Deserialize;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no `{column}` column; expected header {expected}")]
    MissingColumn {
        path: String,
        column: &'static str,
        expected: &'static str,
    },
}

/// Canonical header. Only season and week are required.
const EXPECTED_HEADER: &str = "season,week,team,owner,player_id,player,slot,position,points,projected";
const REQUIRED_COLUMNS: [&str; 2] = ["season", "week"];

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Every column is read as text; numeric parsing happens per field so one
/// bad cell does not drop the whole row.
#[derive(Debug, Deserialize)]
struct RawRosterRow {
    season: String,
    week: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    player_id: String,
    #[serde(default, alias = "player_name", alias = "name")]
    player: String,
    #[serde(default, alias = "lineup_slot")]
    slot: String,
    #[serde(default, alias = "pos")]
    position: String,
    #[serde(default, alias = "actual")]
    points: String,
    #[serde(default, alias = "proj")]
    projected: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a points cell. Blank, non-numeric and non-finite values are missing.
fn parse_points(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|p| p.is_finite())
}

fn to_entry(raw: &RawRosterRow) -> RosterEntry {
    let slot = Slot::from_str_slot(&raw.slot);
    if slot.is_none() && !raw.slot.trim().is_empty() {
        warn!("unknown slot {:?} for '{}'", raw.slot, raw.player.trim());
    }
    let position = Position::from_str_pos(&raw.position);
    if position.is_none() && !raw.position.trim().is_empty() {
        warn!("unknown position {:?} for '{}'", raw.position, raw.player.trim());
    }

    RosterEntry {
        player_id: raw.player_id.trim().to_string(),
        player_name: raw.player.trim().to_string(),
        slot,
        position,
        points: parse_points(&raw.points),
        projected: parse_points(&raw.projected),
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

/// Read roster rows and group them into team-weeks.
///
/// Team-weeks come out in first-seen order. The owner of a team-week is the
/// first non-blank owner seen for it. An unreadable header or one without
/// season and week columns is an error; after that, rows that fail to parse
/// or whose season or week is not a number are skipped.
pub fn read_team_weeks<R: Read>(rdr: R) -> Result<Vec<TeamWeek>, IngestError> {
    read_named(rdr, "<input>")
}

fn read_named<R: Read>(rdr: R, path: &str) -> Result<Vec<TeamWeek>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(rdr);

    let headers = reader.headers().map_err(|e| IngestError::Csv {
        path: path.to_string(),
        source: e,
    })?;
    if let Some(column) = REQUIRED_COLUMNS
        .into_iter()
        .find(|c| !headers.iter().any(|h| h == *c))
    {
        return Err(IngestError::MissingColumn {
            path: path.to_string(),
            column,
            expected: EXPECTED_HEADER,
        });
    }

    let mut index: HashMap<(u16, u16, String), usize> = HashMap::new();
    let mut team_weeks: Vec<TeamWeek> = Vec::new();

    for result in reader.deserialize::<RawRosterRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
                continue;
            }
        };

        let (Ok(season), Ok(week)) = (raw.season.trim().parse::<u16>(), raw.week.trim().parse::<u16>())
        else {
            warn!(
                "skipping row for '{}': bad season/week {:?}/{:?}",
                raw.player.trim(),
                raw.season,
                raw.week
            );
            continue;
        };

        let team = raw.team.trim().to_string();
        let owner = raw.owner.trim();
        let entry = to_entry(&raw);

        let key = (season, week, team.clone());
        match index.get(&key) {
            Some(&i) => {
                let tw = &mut team_weeks[i];
                if tw.owner.is_empty() && !owner.is_empty() {
                    tw.owner = owner.to_string();
                }
                tw.entries.push(entry);
            }
            None => {
                index.insert(key, team_weeks.len());
                team_weeks.push(TeamWeek {
                    season,
                    week,
                    team,
                    owner: owner.to_string(),
                    entries: vec![entry],
                });
            }
        }
    }

    Ok(team_weeks)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load roster history from a CSV file.
pub fn load_team_weeks(path: &Path) -> Result<Vec<TeamWeek>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let team_weeks = read_named(file, &path.display().to_string())?;
    info!(
        "Loaded {} team-weeks ({} roster rows) from {}",
        team_weeks.len(),
        team_weeks.iter().map(|tw| tw.entries.len()).sum::<usize>(),
        path.display()
    );
    Ok(team_weeks)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "season,week,team,owner,player_id,player,slot,position,points,projected\n";

    fn read(body: &str) -> Vec<TeamWeek> {
        read_team_weeks(format!("{HEADER}{body}").as_bytes()).expect("csv should parse")
    }

    #[test]
    fn groups_rows_by_team_week() {
        let weeks = read(
            "2020,1,Gridiron Gang,Jacob966788,1,Josh Allen,QB,QB,30.5,22.1\n\
             2020,1,Gridiron Gang,Jacob966788,2,Derrick Henry,RB,RB,18,\n\
             2020,1,Bench Mob,Mike,3,Davante Adams,WR,WR,24.2,19\n\
             2020,2,Gridiron Gang,Jacob966788,1,Josh Allen,QB,QB,12,\n",
        );
        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[0].team, "Gridiron Gang");
        assert_eq!(weeks[0].entries.len(), 2);
        assert_eq!(weeks[0].owner, "Jacob966788");
        assert_eq!(weeks[1].team, "Bench Mob");
        assert_eq!(weeks[2].week, 2);

        let allen = &weeks[0].entries[0];
        assert_eq!(allen.player_id, "1");
        assert_eq!(allen.slot, Some(Slot::Quarterback));
        assert_eq!(allen.position, Some(Position::Quarterback));
        assert_eq!(allen.points, Some(30.5));
        assert_eq!(allen.projected, Some(22.1));
        assert_eq!(weeks[0].entries[1].projected, None);
    }

    #[test]
    fn accepts_espn_numeric_codes() {
        let weeks = read("2021,3,T,O,9,Travis Kelce,23,4,11.3,\n2021,3,T,O,10,Bills,20,16,7,\n");
        assert_eq!(weeks[0].entries[0].slot, Some(Slot::Flex));
        assert_eq!(weeks[0].entries[0].position, Some(Position::TightEnd));
        assert_eq!(weeks[0].entries[1].slot, Some(Slot::Bench));
        assert_eq!(weeks[0].entries[1].position, Some(Position::Defense));
    }

    #[test]
    fn bad_points_and_codes_become_missing() {
        let weeks = read("2021,1,T,O,1,A,XX,QB,abc,\n2021,1,T,O,2,B,QB,LB,NaN,\n2021,1,T,O,3,C,QB,QB,,\n");
        let entries = &weeks[0].entries;
        assert_eq!(entries[0].slot, None);
        assert_eq!(entries[0].points, None);
        assert_eq!(entries[1].position, None);
        assert_eq!(entries[1].points, None);
        assert_eq!(entries[2].points, None);
    }

    #[test]
    fn skips_rows_with_bad_season_or_week() {
        let weeks = read("20x0,1,T,O,1,A,QB,QB,1,\n2020,,T,O,2,B,QB,QB,1,\n2020,1,T,O,3,C,QB,QB,1,\n");
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].entries.len(), 1);
        assert_eq!(weeks[0].entries[0].player_name, "C");
    }

    #[test]
    fn owner_taken_from_first_non_blank_row() {
        let weeks = read("2020,1,T,,1,A,QB,QB,1,\n2020,1,T, Mike ,2,B,RB,RB,1,\n2020,1,T,Other,3,C,WR,WR,1,\n");
        assert_eq!(weeks[0].owner, "Mike");
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "season,week,team,owner,player,slot,position,points\n2020,1,T,O,Josh Allen,QB,QB,20\n";
        let weeks = read_team_weeks(csv.as_bytes()).unwrap();
        let e = &weeks[0].entries[0];
        assert_eq!(e.player_id, "");
        assert_eq!(e.player_key(), "Josh Allen");
        assert_eq!(e.projected, None);
    }

    #[test]
    fn header_without_season_or_week_is_an_error() {
        let csv = "year,round,team,owner,player,slot,position,points\n2020,1,T,O,A,QB,QB,20\n";
        let err = read_team_weeks(csv.as_bytes()).unwrap_err();
        match err {
            IngestError::MissingColumn { column, .. } => assert_eq!(column, "season"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }

        let err = read_team_weeks("".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }

    #[test]
    fn non_utf8_header_is_an_error() {
        let mut csv = b"season,week,te".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe]);
        csv.extend_from_slice(b"am\n2020,1,T\n");
        let err = read_team_weeks(csv.as_slice()).unwrap_err();
        assert!(matches!(err, IngestError::Csv { .. }));
    }

    #[test]
    fn load_reports_path_for_bad_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrong.csv");
        std::fs::write(&path, "name,score\nA,1\n").unwrap();
        let err = load_team_weeks(&path).unwrap_err();
        assert!(err.to_string().contains("wrong.csv"));
        assert!(err.to_string().contains("season"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_team_weeks(Path::new("/nonexistent/roster.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}

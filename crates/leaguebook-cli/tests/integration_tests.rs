// Integration tests for leaguebook.
//
// These drive the library crate's public API end to end: league.toml
// loading, roster CSV ingestion, alias store edits, and the bench /
// summary reports built on the core optimizer.

use std::path::{Path, PathBuf};

use clap::Parser;
use leaguebook_cli::cli::Cli;
use leaguebook_cli::commands;
use leaguebook_cli::config::load_config;
use leaguebook_cli::ingest::load_team_weeks;
use leaguebook_cli::store::AliasStore;
use leaguebook_core::identity::AliasMap;
use leaguebook_core::report::{self, TeamWeekReport};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Write a league.toml into `dir` whose alias store also lives in `dir`.
///
/// 2019 uses QB/RB/WR/FLEX; 2020 adds a superflex (OP).
fn write_config(dir: &Path) -> PathBuf {
    let store = dir.join("aliases.json");
    let text = format!(
        r#"
[league]
id = "espn-42"
name = "Integration League"

[league.lineup]
QB = 1
RB = 1
WR = 1
FLEX = 1
BE = 3

[league.seasons.2020.lineup]
QB = 1
RB = 1
WR = 1
FLEX = 1
OP = 1
BE = 3
IR = 1

[storage]
alias_store = {:?}
"#,
        store.display().to_string()
    );
    let path = dir.join("league.toml");
    std::fs::write(&path, text).unwrap();
    path
}

/// Run a command line against the config in `dir`, returning stdout.
fn run(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let config = write_config(dir);
    let mut argv = vec!["leaguebook", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::parse_from(argv);
    let mut out = Vec::new();
    commands::run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn fixture_reports(aliases: &AliasMap) -> Vec<TeamWeekReport> {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&write_config(dir.path())).unwrap();
    let team_weeks = load_team_weeks(&fixture("roster.csv")).unwrap();
    report::evaluate(&team_weeks, &config.season_lineups(), aliases)
}

fn find<'a>(reports: &'a [TeamWeekReport], season: u16, team: &str) -> &'a TeamWeekReport {
    reports
        .iter()
        .find(|r| r.season == season && r.team == team)
        .unwrap_or_else(|| panic!("no report for {season} {team}"))
}

// ===========================================================================
// Library pipeline
// ===========================================================================

#[test]
fn fixture_ingests_four_team_weeks() {
    let team_weeks = load_team_weeks(&fixture("roster.csv")).unwrap();
    // The 20x0 typo row is skipped
    assert_eq!(team_weeks.len(), 4);
    let total_rows: usize = team_weeks.iter().map(|tw| tw.entries.len()).sum();
    assert_eq!(total_rows, 23);
}

#[test]
fn flex_week_bench_points() {
    let reports = fixture_reports(&AliasMap::new());

    // Started 25+10+15+8; Lockett (12) belonged in FLEX over Ekeler (8)
    let gang = find(&reports, 2019, "Gridiron Gang");
    assert_eq!(gang.result.actual, 58.0);
    assert_eq!(gang.result.potential, 62.0);
    assert_eq!(gang.result.left, 4.0);

    // Murray (28) benched behind Rodgers (20)
    let mob = find(&reports, 2019, "Bench Mob");
    assert_eq!(mob.result.actual, 54.0);
    assert_eq!(mob.result.potential, 62.0);
    assert_eq!(mob.result.left, 8.0);
}

#[test]
fn superflex_week_uses_season_lineup_and_dedupes_corrections() {
    let reports = fixture_reports(&AliasMap::new());

    // ESPN numeric codes; Adams corrected to 13; Burrow (22) belonged in OP
    // over Tannehill (18)
    let gang = find(&reports, 2020, "Gridiron Gang 2");
    assert_eq!(gang.result.actual, 83.0);
    assert_eq!(gang.result.potential, 90.0);
    assert_eq!(gang.result.left, 7.0);

    // Perfect lineup; the IR row with unparsable points is ignored
    let mob = find(&reports, 2020, "Bench Mob");
    assert_eq!(mob.result.actual, 68.0);
    assert_eq!(mob.result.potential, 68.0);
    assert_eq!(mob.result.left, 0.0);
}

#[test]
fn aliases_merge_owners_across_seasons() {
    let aliases = AliasMap::new().add_rule("Jacob966788", "Jake Teitelbaum");
    let summaries = report::summarize_by_owner(&fixture_reports(&aliases));
    assert_eq!(summaries.len(), 2);

    let jake = &summaries[0];
    assert_eq!(jake.owner, "Jake Teitelbaum");
    assert_eq!(jake.career.weeks, 2);
    assert_eq!(jake.career.left, 11.0);
    assert_eq!(jake.career.actual, 141.0);
    assert_eq!(jake.career.potential, 152.0);
    assert_eq!(jake.seasons.keys().copied().collect::<Vec<_>>(), vec![2019, 2020]);

    let mike = &summaries[1];
    assert_eq!(mike.owner, "Mike");
    assert_eq!(mike.career.left, 8.0);
}

#[test]
fn without_aliases_owners_stay_split() {
    let summaries = report::summarize_by_owner(&fixture_reports(&AliasMap::new()));
    let owners: Vec<_> = summaries.iter().map(|s| s.owner.as_str()).collect();
    assert_eq!(owners, vec!["Mike", "Jake Teitelbaum", "Jacob966788"]);
}

#[test]
fn every_team_week_respects_bench_invariants() {
    for r in fixture_reports(&AliasMap::new()) {
        assert!(r.result.left >= 0.0);
        assert!(r.result.potential >= r.result.actual);
        assert_eq!(r.result.left, r.result.potential - r.result.actual);
    }
}

// ===========================================================================
// Command line
// ===========================================================================

#[test]
fn alias_add_persists_and_resolves() {
    let dir = tempfile::tempdir().unwrap();

    let out = run(dir.path(), &["alias", "add", "Jacob966788", "Jake Teitelbaum"]).unwrap();
    assert_eq!(out, "Jacob966788 -> Jake Teitelbaum\n");

    let store = AliasStore::open(&dir.path().join("aliases.json")).unwrap();
    assert_eq!(store.get("espn-42").get("Jacob966788"), Some("Jake Teitelbaum"));

    let out = run(dir.path(), &["alias", "resolve", "Jacob966788"]).unwrap();
    assert_eq!(out, "Jake Teitelbaum\n");
}

#[test]
fn alias_chain_is_stored_flat() {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path(), &["alias", "add", "B", "C"]).unwrap();
    let out = run(dir.path(), &["alias", "add", "A", "B"]).unwrap();
    assert_eq!(out, "A -> C\n");

    let store = AliasStore::open(&dir.path().join("aliases.json")).unwrap();
    let expected: AliasMap = [("A", "C"), ("B", "C")].into_iter().collect();
    assert_eq!(store.get("espn-42"), expected);

    let out = run(dir.path(), &["alias", "list"]).unwrap();
    assert_eq!(out, "C\n  A\n  B\n");
}

#[test]
fn alias_add_refuses_self_alias_and_cycles() {
    let dir = tempfile::tempdir().unwrap();

    let err = run(dir.path(), &["alias", "add", "Mike", " Mike "]).unwrap_err();
    assert!(err.to_string().contains("cannot add alias rule"));

    run(dir.path(), &["alias", "add", "A", "B"]).unwrap();
    let err = run(dir.path(), &["alias", "add", "B", "A"]).unwrap_err();
    assert!(err.to_string().contains("cycle"));

    // The refused rule never reached disk
    let store = AliasStore::open(&dir.path().join("aliases.json")).unwrap();
    let expected: AliasMap = [("A", "B")].into_iter().collect();
    assert_eq!(store.get("espn-42"), expected);
}

#[test]
fn alias_remove() {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path(), &["alias", "add", "jt", "Jake"]).unwrap();

    assert_eq!(run(dir.path(), &["alias", "remove", "jt"]).unwrap(), "removed jt\n");
    assert_eq!(
        run(dir.path(), &["alias", "remove", "jt"]).unwrap(),
        "no alias rule for jt\n"
    );
    assert_eq!(run(dir.path(), &["alias", "list"]).unwrap(), "no aliases configured\n");
}

#[test]
fn bench_filters_by_resolved_owner_and_season() {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path(), &["alias", "add", "Jacob966788", "Jake Teitelbaum"]).unwrap();
    let csv = fixture("roster.csv");
    let csv = csv.to_str().unwrap();

    let out = run(dir.path(), &["bench", csv, "--owner", "Jacob966788"]).unwrap();
    let lines: Vec<_> = out.lines().collect();
    // header + two team-weeks + totals
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("Gridiron Gang"));
    assert!(lines[2].contains("Gridiron Gang 2"));
    assert!(lines[3].starts_with("2 team-weeks, 11.00 points left"));

    let out = run(dir.path(), &["bench", csv, "--season", "2020"]).unwrap();
    assert_eq!(out.lines().count(), 4);
    assert!(out.contains("68.00"));
}

#[test]
fn summary_ranks_owners_and_lists_misses() {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path(), &["alias", "add", "Jacob966788", "Jake Teitelbaum"]).unwrap();
    let csv = fixture("roster.csv");

    let out = run(dir.path(), &["summary", csv.to_str().unwrap(), "--top", "2"]).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert!(lines[0].starts_with("owner"));
    assert!(lines[1].starts_with("Jake Teitelbaum"));
    assert!(lines[1].contains("11.00"));
    assert!(lines[2].starts_with("  2019"));
    assert!(lines[3].starts_with("  2020"));
    assert!(lines[4].starts_with("Mike"));

    let misses_at = lines.iter().position(|l| *l == "Biggest misses").unwrap();
    let misses = &lines[misses_at + 1..];
    assert_eq!(misses.len(), 2);
    assert!(misses[0].contains("8.00 left") && misses[0].contains("Mike"));
    assert!(misses[1].contains("7.00 left") && misses[1].contains("Jake Teitelbaum"));
}

#[test]
fn missing_config_is_reported() {
    let cli = Cli::parse_from(["leaguebook", "--config", "/nonexistent/league.toml", "alias", "list"]);
    let mut out = Vec::new();
    let err = commands::run(cli, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("config file not found"));
}

#[test]
fn missing_roster_csv_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(dir.path(), &["summary", "/nonexistent/roster.csv"]).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load roster history"));
}

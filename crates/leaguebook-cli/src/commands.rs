// Subcommand handlers. Each writes its report to the given writer so the
// binary prints to stdout and tests capture into a buffer.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use leaguebook_core::identity::AliasMap;
use leaguebook_core::report::{self, EfficiencyTotals, TeamWeekReport};
use tracing::info;

use crate::cli::{AliasAction, Cli, Commands};
use crate::config::{load_config, Config};
use crate::ingest::load_team_weeks;
use crate::store::AliasStore;

/// Load configuration and dispatch the parsed command.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    info!(
        "Config loaded: league={} ({}), alias store {}",
        config.league.id,
        config.league.name,
        config.alias_store.display()
    );

    match cli.command {
        Commands::Alias { action } => run_alias(&config, action, out),
        Commands::Bench { csv, season, owner } => {
            run_bench(&config, &csv, season, owner.as_deref(), out)
        }
        Commands::Summary { csv, top } => run_summary(&config, &csv, top, out),
    }
}

// ---------------------------------------------------------------------------
// alias
// ---------------------------------------------------------------------------

fn open_store(config: &Config) -> Result<AliasStore> {
    AliasStore::open(&config.alias_store).context("failed to open alias store")
}

pub fn run_alias<W: Write>(config: &Config, action: AliasAction, out: &mut W) -> Result<()> {
    let mut store = open_store(config)?;
    let league = config.league.id.as_str();
    let current = store.get(league);

    match action {
        AliasAction::Add { alias, canonical } => {
            if let Err(e) = current.check_rule(&alias, &canonical) {
                bail!("cannot add alias rule: {e}");
            }
            let next = current.add_rule(&alias, &canonical);
            store.set(league, &next);
            store.save().context("failed to save alias store")?;
            writeln!(out, "{} -> {}", alias.trim(), next.canonicalize(&alias))?;
        }
        AliasAction::Remove { alias } => {
            if current.get(alias.trim()).is_none() {
                writeln!(out, "no alias rule for {}", alias.trim())?;
                return Ok(());
            }
            let next = current.remove_rule(&alias);
            store.set(league, &next);
            store.save().context("failed to save alias store")?;
            writeln!(out, "removed {}", alias.trim())?;
        }
        AliasAction::List => write_alias_groups(&current, out)?,
        AliasAction::Resolve { name } => writeln!(out, "{}", current.canonicalize(&name))?,
    }

    Ok(())
}

fn write_alias_groups<W: Write>(aliases: &AliasMap, out: &mut W) -> Result<()> {
    let canonical_names = aliases.canonical_names();
    if canonical_names.is_empty() {
        writeln!(out, "no aliases configured")?;
        return Ok(());
    }
    for canonical in canonical_names {
        writeln!(out, "{canonical}")?;
        for name in aliases.aliases_of(canonical) {
            writeln!(out, "  {name}")?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// bench / summary
// ---------------------------------------------------------------------------

fn load_reports(config: &Config, csv: &Path) -> Result<(AliasMap, Vec<TeamWeekReport>)> {
    let aliases = open_store(config)?.get(&config.league.id);
    let team_weeks = load_team_weeks(csv).context("failed to load roster history")?;
    let reports = report::evaluate(&team_weeks, &config.season_lineups(), &aliases);
    Ok((aliases, reports))
}

pub fn run_bench<W: Write>(
    config: &Config,
    csv: &Path,
    season: Option<u16>,
    owner: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let (aliases, reports) = load_reports(config, csv)?;
    let owner = owner.map(|o| aliases.canonicalize(o));

    let selected: Vec<&TeamWeekReport> = reports
        .iter()
        .filter(|r| season.map_or(true, |s| r.season == s))
        .filter(|r| owner.as_ref().map_or(true, |o| &r.owner == o))
        .collect();

    writeln!(
        out,
        "{:<6} {:>4}  {:<24} {:<24} {:>8} {:>9} {:>7}",
        "season", "week", "team", "owner", "actual", "potential", "left"
    )?;
    let mut totals = EfficiencyTotals::default();
    for r in &selected {
        writeln!(
            out,
            "{:<6} {:>4}  {:<24} {:<24} {:>8.2} {:>9.2} {:>7.2}",
            r.season, r.week, r.team, r.owner, r.result.actual, r.result.potential, r.result.left
        )?;
        totals.add(&r.result);
    }
    writeln!(
        out,
        "{} team-weeks, {:.2} points left on the bench, efficiency {}",
        totals.weeks,
        totals.left,
        format_pct(totals.efficiency())
    )?;
    Ok(())
}

pub fn run_summary<W: Write>(config: &Config, csv: &Path, top: usize, out: &mut W) -> Result<()> {
    let (_, reports) = load_reports(config, csv)?;

    writeln!(
        out,
        "{:<24} {:>5} {:>9} {:>9} {:>8} {:>6}",
        "owner", "weeks", "actual", "left", "left/wk", "eff"
    )?;
    for summary in report::summarize_by_owner(&reports) {
        write_totals_line(out, &summary.owner, &summary.career)?;
        for (season, totals) in &summary.seasons {
            write_totals_line(out, &format!("  {season}"), totals)?;
        }
    }

    let misses = report::biggest_misses(&reports, top);
    if !misses.is_empty() {
        writeln!(out)?;
        writeln!(out, "Biggest misses")?;
        for r in misses {
            writeln!(
                out,
                "  {:.2} left  {} week {}  {} ({})  started {:.2} of {:.2}",
                r.result.left, r.season, r.week, r.owner, r.team, r.result.actual, r.result.potential
            )?;
        }
    }
    Ok(())
}

fn write_totals_line<W: Write>(out: &mut W, label: &str, t: &EfficiencyTotals) -> Result<()> {
    writeln!(
        out,
        "{:<24} {:>5} {:>9.2} {:>9.2} {:>8.2} {:>6}",
        label,
        t.weeks,
        t.actual,
        t.left,
        t.left_per_week(),
        format_pct(t.efficiency())
    )?;
    Ok(())
}

fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

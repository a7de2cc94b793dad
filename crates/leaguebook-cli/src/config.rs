// Configuration loading and parsing (league.toml).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use leaguebook_core::lineup::{LineupSlots, SeasonLineups, Slot};
use serde::Deserialize;
use thiserror::Error;

/// Default location of league.toml, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/league.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    /// JSON file holding the alias maps for every league.
    pub alias_store: PathBuf,
}

impl Config {
    /// Lineup requirements for every season, with per-season overrides.
    pub fn season_lineups(&self) -> SeasonLineups {
        self.league.season_lineups()
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueConfig,
    #[serde(default)]
    storage: StorageSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StorageSection {
    alias_store: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// Key the league's alias map is stored under.
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Default lineup: slot code -> count. Empty means the standard lineup.
    #[serde(default)]
    pub lineup: HashMap<String, usize>,
    /// Per-season overrides keyed by season year ("2019").
    #[serde(default)]
    pub seasons: HashMap<String, SeasonConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonConfig {
    pub lineup: HashMap<String, usize>,
}

impl LeagueConfig {
    pub fn season_lineups(&self) -> SeasonLineups {
        let default = if self.lineup.is_empty() {
            LineupSlots::default()
        } else {
            LineupSlots::from_config(&self.lineup)
        };
        let mut lineups = SeasonLineups::new(default);
        for (season, cfg) in &self.seasons {
            // Keys are checked by validate(); anything unparsable is skipped
            if let Ok(year) = season.trim().parse::<u16>() {
                lineups = lineups.with_season(year, LineupSlots::from_config(&cfg.lineup));
            }
        }
        lineups
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from the given league.toml path.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    parse_config(&text, path)
}

/// Parse and validate league.toml contents. `path` is used for error
/// messages only.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let alias_store = file
        .storage
        .alias_store
        .map(PathBuf::from)
        .unwrap_or_else(default_alias_store_path);

    let config = Config {
        league: file.league,
        alias_store,
    };

    validate(&config)?;

    Ok(config)
}

/// Platform data directory location for the alias store, falling back to
/// the working directory when no home directory can be determined.
pub fn default_alias_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "leaguebook")
        .map(|dirs| dirs.data_dir().join("aliases.json"))
        .unwrap_or_else(|| PathBuf::from("aliases.json"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.id".into(),
            message: "must not be empty".into(),
        });
    }

    if !league.lineup.is_empty() {
        validate_lineup("league.lineup", &league.lineup)?;
    }

    for (season, cfg) in &league.seasons {
        let field = format!("league.seasons.{season}");
        if season.trim().parse::<u16>().is_err() {
            return Err(ConfigError::ValidationError {
                field,
                message: "season key must be a year".into(),
            });
        }
        validate_lineup(&format!("{field}.lineup"), &cfg.lineup)?;
    }

    Ok(())
}

fn validate_lineup(field: &str, lineup: &HashMap<String, usize>) -> Result<(), ConfigError> {
    if let Some(code) = lineup.keys().find(|code| Slot::from_str_slot(code).is_none()) {
        return Err(ConfigError::ValidationError {
            field: format!("{field}.{code}"),
            message: "unknown lineup slot".into(),
        });
    }

    if LineupSlots::from_config(lineup).starter_count() == 0 {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: "must have at least one starting slot".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

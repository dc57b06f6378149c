// Team id → name lookup.
//
// The thirty franchises ship embedded as CSV (`data/teams.csv`); a config
// path can replace them with a user-maintained file in the same format.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::config::TeamsConfig;
use crate::model::TeamId;

const BUILTIN_TEAMS_CSV: &str = include_str!("../data/teams.csv");

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub abbreviation: String,
    pub city: String,
    pub nickname: String,
}

impl Team {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.nickname)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TeamDirectoryError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("team list {path} has no valid rows")]
    Empty { path: String },
}

/// Lookup table from team id to team names.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<TeamId, Team>,
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: TeamId,
    abbreviation: String,
    city: String,
    nickname: String,
}

fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<Team>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut teams = Vec::new();
    for result in reader.deserialize::<RawTeam>() {
        match result {
            Ok(raw) => teams.push(Team {
                id: raw.id,
                abbreviation: raw.abbreviation.trim().to_string(),
                city: raw.city.trim().to_string(),
                nickname: raw.nickname.trim().to_string(),
            }),
            Err(e) => warn!("skipping malformed team row: {}", e),
        }
    }
    Ok(teams)
}

// ---------------------------------------------------------------------------
// TeamDirectory
// ---------------------------------------------------------------------------

impl TeamDirectory {
    pub fn from_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        TeamDirectory {
            teams: teams.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    /// The embedded list of NBA franchises.
    pub fn builtin() -> Self {
        // The embedded file is covered by tests; a bad row only drops a team.
        let teams = load_from_reader(BUILTIN_TEAMS_CSV.as_bytes()).unwrap_or_default();
        TeamDirectory::from_teams(teams)
    }

    pub fn load(path: &Path) -> Result<Self, TeamDirectoryError> {
        let file = std::fs::File::open(path).map_err(|e| TeamDirectoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let teams = load_from_reader(file).map_err(|e| TeamDirectoryError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        if teams.is_empty() {
            return Err(TeamDirectoryError::Empty {
                path: path.display().to_string(),
            });
        }
        Ok(TeamDirectory::from_teams(teams))
    }

    /// The configured override file, or the embedded list.
    pub fn from_config(config: &TeamsConfig) -> Result<Self, TeamDirectoryError> {
        match &config.csv_path {
            Some(path) => TeamDirectory::load(Path::new(path)),
            None => Ok(TeamDirectory::builtin()),
        }
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// "Boston Celtics", or "Team <id>" for unknown ids.
    pub fn full_name(&self, id: TeamId) -> String {
        self.get(id)
            .map(Team::full_name)
            .unwrap_or_else(|| format!("Team {id}"))
    }

    /// "BOS", or "Team <id>" for unknown ids.
    pub fn abbreviation(&self, id: TeamId) -> String {
        self.get(id)
            .map(|t| t.abbreviation.clone())
            .unwrap_or_else(|| format!("Team {id}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_thirty_teams() {
        let dir = TeamDirectory::builtin();
        assert_eq!(dir.len(), 30);
        for id in 1610612737..=1610612766 {
            assert!(dir.get(id).is_some(), "missing team {id}");
        }
    }

    #[test]
    fn names_and_fallback() {
        let dir = TeamDirectory::builtin();
        assert_eq!(dir.full_name(1610612738), "Boston Celtics");
        assert_eq!(dir.abbreviation(1610612752), "NYK");
        assert_eq!(dir.full_name(1610612757), "Portland Trail Blazers");
        assert_eq!(dir.full_name(42), "Team 42");
        assert_eq!(dir.abbreviation(42), "Team 42");
    }

    #[test]
    fn reader_skips_malformed_rows() {
        let csv_data = "\
id,abbreviation,city,nickname
1,AAA,Alpha, Aces
not-a-number,BBB,Beta,Bees
3,CCC,Gamma,Cats
";
        let teams = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].nickname, "Aces");
        assert_eq!(teams[1].id, 3);
    }

    #[test]
    fn load_from_override_file() {
        let tmp = std::env::temp_dir().join("courtmetrics_teams_override.csv");
        std::fs::write(&tmp, "id,abbreviation,city,nickname\n7,SEA,Seattle,SuperSonics\n").unwrap();
        let config = TeamsConfig {
            csv_path: Some(tmp.display().to_string()),
        };
        let dir = TeamDirectory::from_config(&config).unwrap();
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.full_name(7), "Seattle SuperSonics");
        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn missing_override_is_io_error() {
        let config = TeamsConfig {
            csv_path: Some("/nonexistent/courtmetrics/teams.csv".into()),
        };
        assert!(matches!(
            TeamDirectory::from_config(&config).unwrap_err(),
            TeamDirectoryError::Io { .. }
        ));
    }

    #[test]
    fn header_only_override_is_empty_error() {
        let tmp = std::env::temp_dir().join("courtmetrics_teams_empty.csv");
        std::fs::write(&tmp, "id,abbreviation,city,nickname\n").unwrap();
        let err = TeamDirectory::load(&tmp).unwrap_err();
        assert!(matches!(err, TeamDirectoryError::Empty { .. }));
        let _ = std::fs::remove_file(&tmp);
    }
}

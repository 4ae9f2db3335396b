use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Everything a season run needs to know: the roster and where the results files live.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    /// Team name to baseline skill rating.
    pub teams: BTreeMap<String, u8>,
    /// Results files for the seasons used to seed team records.
    pub history: Vec<PathBuf>,
    pub fixture: PathBuf,
    pub venue_aliases: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl League {
    /// Reads a league file. Relative paths inside it are taken relative to the file itself.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<League> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut league: League = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        league.validate()?;

        if let Some(base) = path.parent() {
            league.rebase(base);
        }
        Ok(league)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.teams.is_empty(), "league has no teams");
        for (name, &rating) in &self.teams {
            ensure!(
                (MIN_RATING..=MAX_RATING).contains(&rating),
                "{} has rating {}, expected {} to {}",
                name,
                rating,
                MIN_RATING,
                MAX_RATING
            );
        }
        Ok(())
    }

    fn rebase(&mut self, base: &Path) {
        for path in self
            .history
            .iter_mut()
            .chain(Some(&mut self.fixture))
            .chain(Some(&mut self.venue_aliases))
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

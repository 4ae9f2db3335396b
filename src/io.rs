use crate::record::Scoreline;
use crate::schedule::Fixture;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A completed match from a previous season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalMatch {
    pub home: String,
    pub away: String,
    pub venue: String,
    pub score: Scoreline,
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    home: String,
    away: String,
    venue: String,
    score: String,
}

fn reader<R: Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

pub fn history_from_reader<R: Read>(rdr: R) -> Result<Vec<HistoricalMatch>> {
    let mut matches = Vec::new();
    for (i, row) in reader(rdr).deserialize::<HistoryRow>().enumerate() {
        let row = row.with_context(|| format!("row {}", i + 1))?;
        let score = row
            .score
            .parse::<Scoreline>()
            .with_context(|| format!("row {}", i + 1))?;
        matches.push(HistoricalMatch {
            home: row.home,
            away: row.away,
            venue: row.venue,
            score,
        });
    }
    Ok(matches)
}

pub fn read_history(path: &Path) -> Result<Vec<HistoricalMatch>> {
    history_from_reader(open(path)?).with_context(|| format!("in {}", path.display()))
}

pub fn fixture_from_reader<R: Read>(rdr: R) -> Result<Vec<Fixture>> {
    reader(rdr)
        .deserialize::<Fixture>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("row {}", i + 1)))
        .collect()
}

pub fn read_fixture(path: &Path) -> Result<Vec<Fixture>> {
    fixture_from_reader(open(path)?).with_context(|| format!("in {}", path.display()))
}

/// Maps old venue names to the name currently in use. Each row of the source table is the
/// current name followed by any former names.
#[derive(Debug, Default)]
pub struct VenueAliases(FxHashMap<String, String>);

impl VenueAliases {
    pub fn from_reader<R: Read>(rdr: R) -> Result<VenueAliases> {
        let mut aliases = FxHashMap::default();
        for (i, record) in reader(rdr).records().enumerate() {
            let record = record.with_context(|| format!("row {}", i + 1))?;
            let mut names = record.iter().filter(|name| !name.is_empty());
            if let Some(canonical) = names.next() {
                for alias in std::iter::once(canonical).chain(names) {
                    aliases
                        .entry(alias.to_string())
                        .or_insert_with(|| canonical.to_string());
                }
            }
        }
        Ok(VenueAliases(aliases))
    }

    pub fn load(path: &Path) -> Result<VenueAliases> {
        VenueAliases::from_reader(open(path)?).with_context(|| format!("in {}", path.display()))
    }

    /// The current name for `venue`, or `venue` itself if it isn't in the table.
    pub fn resolve<'a>(&'a self, venue: &'a str) -> &'a str {
        self.0.get(venue).map_or(venue, String::as_str)
    }
}

use crate::record::TeamRecord;
use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;

/// Every team in the league, looked up by name.
#[derive(Debug, Default)]
pub struct Teams {
    records: Vec<TeamRecord>,
    index: FxHashMap<String, usize>,
}

impl Teams {
    /// Builds the registry from `(name, skill rating)` pairs. Every team gets an empty
    /// head-to-head entry against every other team.
    pub fn new<I, S>(roster: I) -> Result<Teams>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let mut teams = Teams::default();
        for (name, rating) in roster {
            let name = name.into();
            if teams.index.contains_key(&name) {
                bail!("team {:?} is listed twice", name);
            }
            teams.index.insert(name.clone(), teams.records.len());
            teams.records.push(TeamRecord::new(name, rating));
        }

        let names: Vec<String> = teams.names().map(str::to_string).collect();
        for record in &mut teams.records {
            for opponent in &names {
                if opponent != record.name() {
                    record.meet(opponent);
                }
            }
        }
        Ok(teams)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(TeamRecord::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamRecord> {
        self.records.iter()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Like [`Teams::position`], but an unknown name is an error.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.position(name)
            .with_context(|| format!("unknown team {:?}", name))
    }

    pub fn get(&self, name: &str) -> Option<&TeamRecord> {
        self.position(name).map(|i| &self.records[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TeamRecord> {
        let i = self.position(name)?;
        Some(&mut self.records[i])
    }

    /// Mutable access to two distinct teams at once.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Result<(&mut TeamRecord, &mut TeamRecord)> {
        if a == b {
            bail!("{} cannot play itself", self.records[a].name());
        }
        if a < b {
            let (left, right) = self.records.split_at_mut(b);
            Ok((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.records.split_at_mut(a);
            Ok((&mut right[0], &mut left[b]))
        }
    }
}

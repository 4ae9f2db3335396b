use anyhow::{bail, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

impl Standing {
    pub fn played(&self) -> u32 {
        self.wins + self.losses
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.wins, self.losses)
    }
}

/// The season ladder: most wins first, then alphabetical by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    entries: Vec<Standing>,
}

impl Standings {
    pub fn new<I, S>(names: I) -> Standings
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut standings = Standings {
            entries: names
                .into_iter()
                .map(|name| Standing {
                    name: name.into(),
                    wins: 0,
                    losses: 0,
                })
                .collect(),
        };
        standings.sort();
        standings
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Adds one win per name in `winners` and one loss per name in `losers`, then re-sorts. A
    /// name that isn't on the ladder is an error and leaves the ladder unchanged.
    pub fn apply_round<'a, W, L>(&mut self, winners: W, losers: L) -> Result<()>
    where
        W: IntoIterator<Item = &'a str>,
        L: IntoIterator<Item = &'a str>,
    {
        let mut wins = Vec::new();
        for name in winners {
            match self.position(name) {
                Some(i) => wins.push(i),
                None => bail!("{:?} is not on the ladder", name),
            }
        }
        let mut losses = Vec::new();
        for name in losers {
            match self.position(name) {
                Some(i) => losses.push(i),
                None => bail!("{:?} is not on the ladder", name),
            }
        }

        for i in wins {
            self.entries[i].wins += 1;
        }
        for i in losses {
            self.entries[i].losses += 1;
        }
        self.sort();
        Ok(())
    }

    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
    }

    pub fn get(&self, name: &str) -> Option<&Standing> {
        self.position(name).map(|i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.entries.iter()
    }

    pub fn render(&self) -> Vec<String> {
        self.entries.iter().map(Standing::to_string).collect()
    }
}

impl fmt::Display for Standings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

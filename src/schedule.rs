use crate::outcome::Noise;
use crate::registry::Teams;
use crate::simulator::{MatchResult, MatchSimulator};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fixture {
    pub round: u32,
    pub home: String,
    pub away: String,
    pub venue: String,
}

/// The season's remaining fixtures, grouped by round number. Rounds are handed out in order
/// starting from round 0, and each fixture is handed out exactly once.
#[derive(Debug, Default)]
pub struct Schedule {
    rounds: BTreeMap<u32, Vec<Fixture>>,
    next: u32,
}

#[derive(Debug)]
pub struct Round {
    pub number: u32,
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug)]
pub struct RoundOutcome {
    pub number: u32,
    pub results: Vec<MatchResult>,
    pub upsets: usize,
}

impl Schedule {
    pub fn new<I: IntoIterator<Item = Fixture>>(fixtures: I) -> Schedule {
        let mut rounds: BTreeMap<u32, Vec<Fixture>> = BTreeMap::new();
        for fixture in fixtures {
            rounds.entry(fixture.round).or_default().push(fixture);
        }
        Schedule { rounds, next: 0 }
    }

    pub fn is_finished(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.rounds.values().map(Vec::len).sum()
    }

    /// Takes the fixtures of the next round. A round number with nothing scheduled yields an
    /// empty round; `None` once every fixture has been handed out.
    pub fn next_round(&mut self) -> Option<Round> {
        if self.is_finished() {
            return None;
        }
        let number = self.next;
        self.next += 1;
        Some(Round {
            number,
            fixtures: self.rounds.remove(&number).unwrap_or_default(),
        })
    }
}

impl Round {
    /// Simulates every fixture in order. All team names are resolved before any match is
    /// played, so an unknown team leaves the registry untouched.
    #[instrument(name = "Round::play", skip(self, teams, noise), fields(round = self.number))]
    pub fn play<N: Noise>(self, teams: &mut Teams, noise: &mut N) -> Result<RoundOutcome> {
        let number = self.number;
        let registry: &Teams = teams;
        let simulators = self
            .fixtures
            .iter()
            .map(|fixture| {
                MatchSimulator::new(registry, fixture).with_context(|| {
                    format!(
                        "round {}: {} vs {} at {}",
                        number, fixture.home, fixture.away, fixture.venue
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut results = Vec::with_capacity(simulators.len());
        let mut upsets = 0;
        for simulator in simulators {
            let result = simulator.simulate(teams, noise)?;
            if result.is_upset() {
                upsets += 1;
            }
            results.push(result);
        }

        debug!(matches = results.len(), upsets, "round complete");
        Ok(RoundOutcome {
            number,
            results,
            upsets,
        })
    }
}

impl RoundOutcome {
    pub fn winners(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(MatchResult::winner)
    }

    pub fn losers(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(MatchResult::loser)
    }
}

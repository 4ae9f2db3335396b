use anyhow::{bail, Context, Error, Result};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Whether a result comes from the historical window or from the simulated season. Only
/// historical results move the win rate, which the outcome model treats as a fixed feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPhase {
    Historical,
    Simulated,
}

/// A final score as written in the results files, home score first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    /// Dummy scoreline used to feed a simulated result back through the same update path as a
    /// historical one.
    pub fn win_for(side: Side) -> Scoreline {
        match side {
            Side::Home => Scoreline { home: 1, away: 0 },
            Side::Away => Scoreline { home: 0, away: 1 },
        }
    }

    /// Winning margin from `side`'s point of view.
    pub fn margin(self, side: Side) -> i64 {
        let (ours, theirs) = match side {
            Side::Home => (self.home, self.away),
            Side::Away => (self.away, self.home),
        };
        i64::from(ours) - i64::from(theirs)
    }
}

impl FromStr for Scoreline {
    type Err = Error;

    fn from_str(s: &str) -> Result<Scoreline> {
        let fields: Vec<&str> = s.split('-').map(str::trim).collect();
        if fields.len() != 2 {
            bail!("malformed scoreline {:?}: expected two scores", s);
        }
        let parse = |field: &str| {
            field
                .parse::<u32>()
                .with_context(|| format!("malformed scoreline {:?}", s))
        };
        Ok(Scoreline {
            home: parse(fields[0])?,
            away: parse(fields[1])?,
        })
    }
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Win/draw/loss tally against one opponent or at one venue.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Tally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_ratio: f64,
    pub net_wins: i64,
}

impl Tally {
    pub fn played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn record(&mut self, margin: i64) {
        match margin.cmp(&0) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.draws += 1,
        }
        self.win_ratio = f64::from(self.wins) / f64::from(self.played());
        self.net_wins = i64::from(self.wins) - i64::from(self.losses);
    }

    /// The win ratio, or 0 for a tally with nothing recorded yet.
    pub fn ratio(&self) -> f64 {
        if self.played() == 0 {
            0.0
        } else {
            self.win_ratio
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamRecord {
    name: String,
    skill_rating: u8,
    head_to_head: FxHashMap<String, Tally>,
    venues: FxHashMap<String, Tally>,
    historical_wins: u32,
    historical_matches: u32,
}

impl TeamRecord {
    pub fn new(name: impl Into<String>, skill_rating: u8) -> TeamRecord {
        TeamRecord {
            name: name.into(),
            skill_rating,
            head_to_head: FxHashMap::default(),
            venues: FxHashMap::default(),
            historical_wins: 0,
            historical_matches: 0,
        }
    }

    /// Creates an empty head-to-head entry so later ratio reads never see a missing opponent.
    pub fn meet(&mut self, opponent: &str) {
        self.head_to_head.entry(opponent.to_string()).or_default();
    }

    /// Folds one result into the head-to-head and venue tallies. `side` is this team's side of
    /// the scoreline.
    pub fn record_match(
        &mut self,
        side: Side,
        opponent: &str,
        venue: &str,
        score: Scoreline,
        phase: RecordPhase,
    ) {
        let margin = score.margin(side);
        self.head_to_head
            .entry(opponent.to_string())
            .or_default()
            .record(margin);
        self.venues.entry(venue.to_string()).or_default().record(margin);

        if phase == RecordPhase::Historical {
            self.historical_matches += 1;
            if margin > 0 {
                self.historical_wins += 1;
            }
        }

        trace!(team = %self.name, opponent, venue, %score, ?phase, "recorded match");
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skill_rating(&self) -> u8 {
        self.skill_rating
    }

    pub fn head_to_head(&self) -> &FxHashMap<String, Tally> {
        &self.head_to_head
    }

    pub fn venues(&self) -> &FxHashMap<String, Tally> {
        &self.venues
    }

    pub fn head_to_head_ratio(&self, opponent: &str) -> f64 {
        self.head_to_head.get(opponent).map_or(0.0, Tally::ratio)
    }

    pub fn venue_ratio(&self, venue: &str) -> f64 {
        self.venues.get(venue).map_or(0.0, Tally::ratio)
    }

    /// Share of historical matches won; 0 when the team has no history.
    pub fn win_rate(&self) -> f64 {
        if self.historical_matches == 0 {
            0.0
        } else {
            f64::from(self.historical_wins) / f64::from(self.historical_matches)
        }
    }
}

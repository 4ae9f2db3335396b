use crate::record::{Side, TeamRecord};
use crate::util::HomeAway;
use rand::Rng;
use tracing::{instrument, trace};

const HOME_VENUE_WEIGHT: f64 = 1.2;
const AWAY_VENUE_WEIGHT: f64 = 0.8;
const HEAD_TO_HEAD_WEIGHT: f64 = 1.0;
const WIN_RATE_WEIGHT: f64 = 0.2;

/// Half-width of each uniform draw added to a side's strength.
pub const SPREAD: f64 = 3.0;

/// Source of the random perturbation added to each side's strength.
pub trait Noise {
    fn jitter(&mut self) -> f64;
}

impl<N: Noise + ?Sized> Noise for &mut N {
    fn jitter(&mut self) -> f64 {
        (**self).jitter()
    }
}

/// Sum of two independent uniform draws on `[-SPREAD, SPREAD)`, giving a triangular spread that
/// peaks at zero.
#[derive(Debug)]
pub struct UniformNoise<R> {
    rng: R,
}

impl<R: Rng> UniformNoise<R> {
    pub fn new(rng: R) -> UniformNoise<R> {
        UniformNoise { rng }
    }
}

impl<R: Rng> Noise for UniformNoise<R> {
    fn jitter(&mut self) -> f64 {
        self.rng.gen_range(-SPREAD, SPREAD) + self.rng.gen_range(-SPREAD, SPREAD)
    }
}

/// No randomisation at all: the favourite always wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct Calm;

impl Noise for Calm {
    fn jitter(&mut self) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub strength: HomeAway<f64>,
    pub score: HomeAway<f64>,
    pub favourite: Side,
    pub winner: Side,
    pub upset: bool,
}

/// Strength of `team` against `opponent` at `venue` before any randomisation.
pub fn strength(team: &TeamRecord, opponent: &TeamRecord, venue: &str, side: Side) -> f64 {
    let venue_weight = match side {
        Side::Home => HOME_VENUE_WEIGHT,
        Side::Away => AWAY_VENUE_WEIGHT,
    };
    f64::from(team.skill_rating())
        + team.venue_ratio(venue) * venue_weight
        + team.head_to_head_ratio(opponent.name()) * HEAD_TO_HEAD_WEIGHT
        + team.win_rate() * WIN_RATE_WEIGHT
}

// ties go to the home side
fn leader(scores: HomeAway<f64>) -> Side {
    if scores.home >= scores.away {
        Side::Home
    } else {
        Side::Away
    }
}

#[instrument(
    name = "outcome::predict",
    skip(home, away, noise),
    fields(home_team = %home.name(), away_team = %away.name())
)]
pub fn predict<N: Noise>(
    home: &TeamRecord,
    away: &TeamRecord,
    venue: &str,
    noise: &mut N,
) -> Prediction {
    let strength = HomeAway {
        home: strength(home, away, venue, Side::Home),
        away: strength(away, home, venue, Side::Away),
    };
    let favourite = leader(strength);

    let score = HomeAway {
        home: strength.home + noise.jitter(),
        away: strength.away + noise.jitter(),
    };
    let winner = leader(score);
    let upset = winner != favourite;

    trace!(
        strength.home,
        strength.away,
        score.home,
        score.away,
        ?favourite,
        ?winner,
        upset,
    );

    Prediction {
        strength,
        score,
        favourite,
        winner,
        upset,
    }
}

use crate::outcome::{predict, Noise, Prediction};
use crate::record::{RecordPhase, Scoreline, Side};
use crate::registry::Teams;
use crate::schedule::Fixture;
use crate::util::HomeAway;
use anyhow::Result;
use std::fmt;
use tracing::{debug, instrument};

/// One fixture with both teams resolved against the registry.
#[derive(Debug, Clone)]
pub struct MatchSimulator {
    teams: HomeAway<usize>,
    venue: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub teams: HomeAway<String>,
    pub venue: String,
    pub prediction: Prediction,
}

impl MatchSimulator {
    pub fn new(teams: &Teams, fixture: &Fixture) -> Result<MatchSimulator> {
        Ok(MatchSimulator {
            teams: HomeAway {
                home: teams.resolve(&fixture.home)?,
                away: teams.resolve(&fixture.away)?,
            },
            venue: fixture.venue.clone(),
        })
    }

    /// Predicts the match, then records the predicted result against both teams so it
    /// counts towards every later prediction.
    #[instrument(name = "MatchSimulator::simulate", skip(teams, noise))]
    pub fn simulate<N: Noise>(&self, teams: &mut Teams, noise: &mut N) -> Result<MatchResult> {
        let (home, away) = teams.pair_mut(self.teams.home, self.teams.away)?;
        let prediction = predict(home, away, &self.venue, noise);

        let score = Scoreline::win_for(prediction.winner);
        away.record_match(
            Side::Away,
            home.name(),
            &self.venue,
            score,
            RecordPhase::Simulated,
        );
        home.record_match(
            Side::Home,
            away.name(),
            &self.venue,
            score,
            RecordPhase::Simulated,
        );

        let result = MatchResult {
            teams: HomeAway {
                home: home.name().to_string(),
                away: away.name().to_string(),
            },
            venue: self.venue.clone(),
            prediction,
        };
        debug!(winner = result.winner(), upset = prediction.upset, "simulated match");
        Ok(result)
    }
}

impl MatchResult {
    fn side(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.teams.home,
            Side::Away => &self.teams.away,
        }
    }

    pub fn winner(&self) -> &str {
        self.side(self.prediction.winner)
    }

    pub fn loser(&self) -> &str {
        self.side(self.prediction.winner.other())
    }

    pub fn is_upset(&self) -> bool {
        self.prediction.upset
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {} @ {} WINNER: {} || PRE: {} || POST: {}",
            self.teams.home,
            self.teams.away,
            self.venue,
            self.winner(),
            self.prediction.strength,
            self.prediction.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::MatchSimulator;
    use crate::outcome::Calm;
    use crate::record::{RecordPhase, Scoreline, Side};
    use crate::registry::Teams;
    use crate::schedule::Fixture;
    use assert_approx_eq::assert_approx_eq;

    fn fixture(home: &str, away: &str) -> Fixture {
        Fixture {
            round: 0,
            home: home.to_string(),
            away: away.to_string(),
            venue: "Adelaide Oval".to_string(),
        }
    }

    fn teams() -> Teams {
        Teams::new(vec![("Port Adelaide", 6), ("Richmond", 1), ("Adelaide Crows", 6)]).unwrap()
    }

    #[test]
    fn test_result_feeds_back() {
        let mut teams = teams();
        let sim = MatchSimulator::new(&teams, &fixture("Richmond", "Port Adelaide")).unwrap();
        let result = sim.simulate(&mut teams, &mut Calm).unwrap();
        assert_eq!(result.winner(), "Port Adelaide");
        assert_eq!(result.loser(), "Richmond");
        assert!(!result.is_upset());

        let port = teams.get("Port Adelaide").unwrap();
        assert_eq!(port.head_to_head()["Richmond"].wins, 1);
        assert_eq!(port.venues()["Adelaide Oval"].wins, 1);
        let richmond = teams.get("Richmond").unwrap();
        assert_eq!(richmond.head_to_head()["Port Adelaide"].losses, 1);
        assert_eq!(richmond.venues()["Adelaide Oval"].losses, 1);
        assert_eq!(richmond.head_to_head()["Adelaide Crows"].played(), 0);
    }

    #[test]
    fn test_later_predictions_see_earlier_results() {
        let mut teams = teams();
        let derby =
            MatchSimulator::new(&teams, &fixture("Adelaide Crows", "Port Adelaide")).unwrap();
        let first = derby.simulate(&mut teams, &mut Calm).unwrap();
        assert_eq!(first.winner(), "Adelaide Crows");
        assert_approx_eq!(first.prediction.strength.home, 6.0);

        let second = derby.simulate(&mut teams, &mut Calm).unwrap();
        // 6 + 1.0 * 1.2 at the venue + 1.0 head to head
        assert_approx_eq!(second.prediction.strength.home, 8.2);
        assert_approx_eq!(second.prediction.strength.away, 6.0);
        assert_eq!(
            teams.get("Adelaide Crows").unwrap().head_to_head()["Port Adelaide"].wins,
            2
        );
    }

    #[test]
    fn test_simulated_results_leave_win_rate_alone() {
        let mut teams = teams();
        teams.get_mut("Richmond").unwrap().record_match(
            Side::Home,
            "Adelaide Crows",
            "MCG",
            Scoreline { home: 100, away: 50 },
            RecordPhase::Historical,
        );
        let sim = MatchSimulator::new(&teams, &fixture("Richmond", "Port Adelaide")).unwrap();
        sim.simulate(&mut teams, &mut Calm).unwrap();
        assert_approx_eq!(teams.get("Richmond").unwrap().win_rate(), 1.0);
        assert_approx_eq!(teams.get("Port Adelaide").unwrap().win_rate(), 0.0);
    }

    #[test]
    fn test_unknown_team() {
        let teams = teams();
        let err = MatchSimulator::new(&teams, &fixture("Fitzroy", "Richmond")).unwrap_err();
        assert!(err.to_string().contains("Fitzroy"));
    }

    #[test]
    fn test_display() {
        let mut teams = teams();
        let sim = MatchSimulator::new(&teams, &fixture("Port Adelaide", "Richmond")).unwrap();
        let result = sim.simulate(&mut teams, &mut Calm).unwrap();
        assert_eq!(
            result.to_string(),
            "Port Adelaide vs Richmond @ Adelaide Oval WINNER: Port Adelaide \
             || PRE: 6.000-1.000 || POST: 6.000-1.000"
        );
    }
}

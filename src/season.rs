use crate::io::{HistoricalMatch, VenueAliases};
use crate::outcome::Noise;
use crate::record::{RecordPhase, Side};
use crate::registry::Teams;
use crate::schedule::{Fixture, Schedule};
use crate::simulator::MatchResult;
use crate::standings::Standings;
use anyhow::{Context, Result};
use std::fmt;
use tracing::{debug, info, instrument};

/// A whole simulated season: the team registry, the fixtures still to play and the ladder.
#[derive(Debug)]
pub struct Season {
    teams: Teams,
    schedule: Schedule,
    standings: Standings,
}

#[derive(Debug)]
pub struct RoundReport {
    pub round: u32,
    pub results: Vec<MatchResult>,
    pub upsets: usize,
    pub standings: Standings,
}

impl Season {
    pub fn new(teams: Teams, fixtures: Vec<Fixture>) -> Season {
        let standings = Standings::new(teams.names());
        Season {
            teams,
            schedule: Schedule::new(fixtures),
            standings,
        }
    }

    /// Folds previous seasons' results into the team records. Venues are recorded under their
    /// current name; a team outside the league gets no record of its own.
    #[instrument(name = "Season::seed", skip(self, history, aliases))]
    pub fn seed<'a, I>(&mut self, history: I, aliases: &VenueAliases)
    where
        I: IntoIterator<Item = &'a HistoricalMatch>,
    {
        let mut count = 0_usize;
        for game in history {
            let venue = aliases.resolve(&game.venue);
            for (side, name, opponent) in [
                (Side::Home, &game.home, &game.away),
                (Side::Away, &game.away, &game.home),
            ]
            .iter()
            {
                match self.teams.get_mut(name) {
                    Some(team) => team.record_match(
                        *side,
                        opponent,
                        venue,
                        game.score,
                        RecordPhase::Historical,
                    ),
                    None => debug!(team = %name, "skipping team outside the league"),
                }
            }
            count += 1;
        }

        for team in self.teams.iter() {
            debug!(
                team = team.name(),
                win_rate = team.win_rate(),
                head_to_head = ?team.head_to_head(),
                venues = ?team.venues(),
                "seeded"
            );
        }
        info!(matches = count, "seeded team records");
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn standings(&self) -> &Standings {
        &self.standings
    }

    pub fn is_finished(&self) -> bool {
        self.schedule.is_finished()
    }

    /// Plays the next round and updates the ladder. `None` once the fixture is exhausted.
    pub fn play_round<N: Noise>(&mut self, noise: &mut N) -> Result<Option<RoundReport>> {
        let round = match self.schedule.next_round() {
            Some(round) => round,
            None => return Ok(None),
        };
        let number = round.number;
        let outcome = round.play(&mut self.teams, noise)?;
        self.standings
            .apply_round(outcome.winners(), outcome.losers())
            .with_context(|| format!("round {}", number))?;

        Ok(Some(RoundReport {
            round: outcome.number,
            results: outcome.results,
            upsets: outcome.upsets,
            standings: self.standings.clone(),
        }))
    }

    /// Plays every remaining round, handing each report to `report` as it completes.
    pub fn run<N, F>(&mut self, noise: &mut N, mut report: F) -> Result<()>
    where
        N: Noise,
        F: FnMut(&RoundReport),
    {
        let mut matches = 0;
        let mut upsets = 0;
        while let Some(round) = self.play_round(noise)? {
            matches += round.results.len();
            upsets += round.upsets;
            report(&round);
        }
        info!(matches, upsets, "season complete");
        Ok(())
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n-=-Round {}-=-\n", self.round)?;
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        writeln!(f, "\nRound Upsets: {}", self.upsets)?;
        write!(f, "\nPost-Round Ladder\n\n{}", self.standings)
    }
}

#[cfg(test)]
mod tests {
    use super::Season;
    use crate::io::{HistoricalMatch, VenueAliases};
    use crate::outcome::{Calm, UniformNoise};
    use crate::record::Scoreline;
    use crate::registry::Teams;
    use crate::schedule::Fixture;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn teams() -> Teams {
        Teams::new(vec![
            ("Brisbane Lions", 9),
            ("Geelong Cats", 8),
            ("Richmond", 1),
            ("West Coast Eagles", 3),
        ])
        .unwrap()
    }

    fn game(
        home: &str,
        away: &str,
        venue: &str,
        home_score: u32,
        away_score: u32,
    ) -> HistoricalMatch {
        HistoricalMatch {
            home: home.to_string(),
            away: away.to_string(),
            venue: venue.to_string(),
            score: Scoreline {
                home: home_score,
                away: away_score,
            },
        }
    }

    fn fixture(round: u32, home: &str, away: &str, venue: &str) -> Fixture {
        Fixture {
            round,
            home: home.to_string(),
            away: away.to_string(),
            venue: venue.to_string(),
        }
    }

    fn history() -> Vec<HistoricalMatch> {
        vec![
            game("Richmond", "Geelong Cats", "MCG", 90, 60),
            game("Geelong Cats", "Richmond", "GMHBA Stadium", 100, 50),
            game("Geelong Cats", "Richmond", "Kardinia Park", 70, 70),
            game("Brisbane Lions", "Fitzroy", "Gabba", 80, 40),
            game("West Coast Eagles", "Brisbane Lions", "Optus Stadium", 50, 120),
        ]
    }

    fn aliases() -> VenueAliases {
        VenueAliases::from_reader("GMHBA Stadium,Kardinia Park\n".as_bytes()).unwrap()
    }

    #[test]
    fn test_seed() {
        let mut season = Season::new(teams(), Vec::new());
        season.seed(&history(), &aliases());

        let geelong = season.teams().get("Geelong Cats").unwrap();
        let richmond = geelong.head_to_head()["Richmond"];
        assert_eq!((richmond.wins, richmond.draws, richmond.losses), (1, 1, 1));
        assert_approx_eq!(richmond.win_ratio, 1.0 / 3.0);
        assert_eq!(geelong.venues()["GMHBA Stadium"].played(), 2);
        assert!(!geelong.venues().contains_key("Kardinia Park"));
        assert_eq!(geelong.head_to_head()["Brisbane Lions"].played(), 0);

        let brisbane = season.teams().get("Brisbane Lions").unwrap();
        assert_eq!(brisbane.head_to_head()["Fitzroy"].wins, 1);
        assert!(season.teams().get("Fitzroy").is_none());
        assert_approx_eq!(brisbane.win_rate(), 1.0);
        assert_approx_eq!(season.teams().get("West Coast Eagles").unwrap().win_rate(), 0.0);
    }

    #[test]
    fn test_seeded_tallies_match_history() {
        let history = history();
        let mut season = Season::new(teams(), Vec::new());
        season.seed(&history, &aliases());

        for team in season.teams().iter() {
            for (opponent, tally) in team.head_to_head() {
                let meetings = history
                    .iter()
                    .filter(|g| {
                        (g.home == team.name() && &g.away == opponent)
                            || (g.away == team.name() && &g.home == opponent)
                    })
                    .count();
                assert_eq!(tally.played() as usize, meetings);
                assert!(tally.ratio() >= 0.0 && tally.ratio() <= 1.0);
            }
        }
    }

    #[test]
    fn test_run_without_noise() {
        let mut season = Season::new(
            teams(),
            vec![
                fixture(0, "Richmond", "Brisbane Lions", "MCG"),
                fixture(0, "West Coast Eagles", "Geelong Cats", "Optus Stadium"),
                fixture(1, "Geelong Cats", "Brisbane Lions", "GMHBA Stadium"),
                fixture(1, "West Coast Eagles", "Richmond", "Optus Stadium"),
            ],
        );
        season.seed(&history(), &aliases());

        let mut reports = Vec::new();
        season
            .run(&mut Calm, |report| reports.push(report.to_string()))
            .unwrap();
        assert!(season.is_finished());
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("-=-Round 0-=-"));
        assert!(reports[1].contains("Round Upsets: 0"));

        assert_eq!(
            season.standings().render(),
            [
                "Brisbane Lions 2 0",
                "Geelong Cats 1 1",
                "West Coast Eagles 1 1",
                "Richmond 0 2",
            ]
        );
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let play = |seed| {
            let mut season = Season::new(
                teams(),
                vec![
                    fixture(0, "Richmond", "Brisbane Lions", "MCG"),
                    fixture(0, "West Coast Eagles", "Geelong Cats", "Optus Stadium"),
                    fixture(1, "Geelong Cats", "Brisbane Lions", "GMHBA Stadium"),
                    fixture(1, "West Coast Eagles", "Richmond", "Optus Stadium"),
                    fixture(2, "Brisbane Lions", "West Coast Eagles", "Gabba"),
                    fixture(2, "Richmond", "Geelong Cats", "MCG"),
                ],
            );
            season.seed(&history(), &aliases());
            let mut noise = UniformNoise::new(StdRng::seed_from_u64(seed));
            let mut lines = Vec::new();
            season
                .run(&mut noise, |report| lines.push(report.to_string()))
                .unwrap();
            lines
        };
        assert_eq!(play(2025), play(2025));
    }

    #[test]
    fn test_unknown_fixture_team() {
        let mut season = Season::new(teams(), vec![fixture(0, "Fitzroy", "Richmond", "MCG")]);
        let err = season.play_round(&mut Calm).unwrap_err();
        assert!(format!("{:#}", err).contains("Fitzroy"));
    }
}

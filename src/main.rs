#![warn(clippy::pedantic, rust_2018_idioms)]

use afl_season_sim::config::League;
use afl_season_sim::io::{read_fixture, read_history, VenueAliases};
use afl_season_sim::outcome::UniformNoise;
use afl_season_sim::registry::Teams;
use afl_season_sim::season::Season;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let league = League::load("league.json")?;
    let aliases = VenueAliases::load(&league.venue_aliases)?;
    let mut history = Vec::new();
    for path in &league.history {
        history.extend(read_history(path)?);
    }
    let fixtures = read_fixture(&league.fixture)?;

    let teams = Teams::new(league.teams.iter().map(|(name, &rating)| (name.as_str(), rating)))?;
    let mut season = Season::new(teams, fixtures);
    season.seed(&history, &aliases);

    let rng = match league.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    season.run(&mut UniformNoise::new(rng), |report| println!("{}", report))
}

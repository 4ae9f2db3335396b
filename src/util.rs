use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HomeAway<T> {
    pub home: T,
    pub away: T,
}

impl fmt::Display for HomeAway<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}-{:.3}", self.home, self.away)
    }
}

#[cfg(test)]
#[test]
fn test_display() {
    let scores = HomeAway {
        home: 6.123_456,
        away: 3.0,
    };
    assert_eq!(scores.to_string(), "6.123-3.000");
    let negative = HomeAway { home: 0.0, away: -0.5 };
    assert_eq!(negative.to_string(), "0.000--0.500");
}

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatMetric {
    Completions,
    Attempts,
    PassingYards,
    PassingTds,
    Interceptions,
    Carries,
    RushingYards,
    RushingTds,
    Receptions,
    Targets,
    ReceivingYards,
    ReceivingTds,
    FantasyPoints,
}

impl StatMetric {
    /// Panel order, top to bottom.
    pub const ALL: [StatMetric; 13] = [
        StatMetric::Completions,
        StatMetric::Attempts,
        StatMetric::PassingYards,
        StatMetric::PassingTds,
        StatMetric::Interceptions,
        StatMetric::Carries,
        StatMetric::RushingYards,
        StatMetric::RushingTds,
        StatMetric::Receptions,
        StatMetric::Targets,
        StatMetric::ReceivingYards,
        StatMetric::ReceivingTds,
        StatMetric::FantasyPoints,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StatMetric::Completions => "completions",
            StatMetric::Attempts => "attempts",
            StatMetric::PassingYards => "passing_yards",
            StatMetric::PassingTds => "passing_tds",
            StatMetric::Interceptions => "interceptions",
            StatMetric::Carries => "carries",
            StatMetric::RushingYards => "rushing_yards",
            StatMetric::RushingTds => "rushing_tds",
            StatMetric::Receptions => "receptions",
            StatMetric::Targets => "targets",
            StatMetric::ReceivingYards => "receiving_yards",
            StatMetric::ReceivingTds => "receiving_tds",
            StatMetric::FantasyPoints => "fantasy_points",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatMetric::Completions => "Completions",
            StatMetric::Attempts => "Attempts",
            StatMetric::PassingYards => "Passing Yards",
            StatMetric::PassingTds => "Passing TDs",
            StatMetric::Interceptions => "Interceptions",
            StatMetric::Carries => "Carries",
            StatMetric::RushingYards => "Rushing Yards",
            StatMetric::RushingTds => "Rushing TDs",
            StatMetric::Receptions => "Receptions",
            StatMetric::Targets => "Targets",
            StatMetric::ReceivingYards => "Receiving Yards",
            StatMetric::ReceivingTds => "Receiving TDs",
            StatMetric::FantasyPoints => "Fantasy Points",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StatMetric::Completions => "The number of successful passes thrown by a quarterback.",
            StatMetric::Attempts => "The number of passes thrown by a quarterback.",
            StatMetric::PassingYards => {
                "The total yards gained by the quarterback through passing."
            }
            StatMetric::PassingTds => "The number of touchdown passes thrown by a quarterback.",
            StatMetric::Interceptions => {
                "The number of passes intercepted by the opposing defense."
            }
            StatMetric::Carries => "The number of rushing attempts by a player.",
            StatMetric::RushingYards => "The total yards gained by a player through rushing.",
            StatMetric::RushingTds => {
                "The number of touchdowns scored by a player through rushing."
            }
            StatMetric::Receptions => "The number of successful catches made by a receiver.",
            StatMetric::Targets => "The number of times a receiver was thrown the ball.",
            StatMetric::ReceivingYards => {
                "The total yards gained by a receiver through catching passes."
            }
            StatMetric::ReceivingTds => {
                "The number of touchdowns scored by a receiver through catching passes."
            }
            StatMetric::FantasyPoints => {
                "A scoring system used in fantasy football to evaluate player performance."
            }
        }
    }

    pub fn from_key(raw: &str) -> Result<Self, DashboardError> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| DashboardError::UnknownMetric(raw.to_string()))
    }

    pub fn all_keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.key()).collect()
    }
}

impl FromStr for StatMetric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

impl fmt::Display for StatMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the seasonal table. `None` marks an empty or non-numeric cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlayerSeasonRecord {
    pub display_name: String,
    pub season: i32,
    pub completions: Option<f64>,
    pub attempts: Option<f64>,
    pub passing_yards: Option<f64>,
    pub passing_tds: Option<f64>,
    pub interceptions: Option<f64>,
    pub carries: Option<f64>,
    pub rushing_yards: Option<f64>,
    pub rushing_tds: Option<f64>,
    pub receptions: Option<f64>,
    pub targets: Option<f64>,
    pub receiving_yards: Option<f64>,
    pub receiving_tds: Option<f64>,
    pub fantasy_points: Option<f64>,
}

impl PlayerSeasonRecord {
    pub fn new(display_name: impl Into<String>, season: i32) -> Self {
        Self {
            display_name: display_name.into(),
            season,
            ..Self::default()
        }
    }

    pub fn with_stat(mut self, metric: StatMetric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    pub fn value(&self, metric: StatMetric) -> Option<f64> {
        match metric {
            StatMetric::Completions => self.completions,
            StatMetric::Attempts => self.attempts,
            StatMetric::PassingYards => self.passing_yards,
            StatMetric::PassingTds => self.passing_tds,
            StatMetric::Interceptions => self.interceptions,
            StatMetric::Carries => self.carries,
            StatMetric::RushingYards => self.rushing_yards,
            StatMetric::RushingTds => self.rushing_tds,
            StatMetric::Receptions => self.receptions,
            StatMetric::Targets => self.targets,
            StatMetric::ReceivingYards => self.receiving_yards,
            StatMetric::ReceivingTds => self.receiving_tds,
            StatMetric::FantasyPoints => self.fantasy_points,
        }
    }

    pub(crate) fn set(&mut self, metric: StatMetric, value: Option<f64>) {
        let slot = match metric {
            StatMetric::Completions => &mut self.completions,
            StatMetric::Attempts => &mut self.attempts,
            StatMetric::PassingYards => &mut self.passing_yards,
            StatMetric::PassingTds => &mut self.passing_tds,
            StatMetric::Interceptions => &mut self.interceptions,
            StatMetric::Carries => &mut self.carries,
            StatMetric::RushingYards => &mut self.rushing_yards,
            StatMetric::RushingTds => &mut self.rushing_tds,
            StatMetric::Receptions => &mut self.receptions,
            StatMetric::Targets => &mut self.targets,
            StatMetric::ReceivingYards => &mut self.receiving_yards,
            StatMetric::ReceivingTds => &mut self.receiving_tds,
            StatMetric::FantasyPoints => &mut self.fantasy_points,
        };
        *slot = value;
    }
}

/// Whole numbers print without a fraction, everything else with up to two decimals.
pub fn format_stat_value(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "n/a".to_string();
    };
    if v.fract() == 0.0 {
        return format!("{v:.0}");
    }
    let raw = format!("{v:.2}");
    raw.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_key() {
        for metric in StatMetric::ALL {
            assert_eq!(StatMetric::from_key(metric.key()).unwrap(), metric);
        }
        assert!(matches!(
            StatMetric::from_key("sacks"),
            Err(DashboardError::UnknownMetric(ref m)) if m == "sacks"
        ));
    }

    #[test]
    fn stat_values_format_compactly() {
        assert_eq!(format_stat_value(Some(100.0)), "100");
        assert_eq!(format_stat_value(Some(212.36)), "212.36");
        assert_eq!(format_stat_value(Some(12.5)), "12.5");
        assert_eq!(format_stat_value(None), "n/a");
        assert_eq!(format_stat_value(Some(f64::NAN)), "n/a");
    }
}

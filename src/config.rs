use std::env;
use std::path::PathBuf;

use crate::cohort::{DEFAULT_COHORT_LIMIT, DEFAULT_COHORT_METRIC};

pub const DEFAULT_SEASONAL_DATA: &str = "all_seasonal_players_df.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub seasonal_data: PathBuf,
    pub cohort_metric: String,
    pub cohort_limit: usize,
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seasonal_data: PathBuf::from(DEFAULT_SEASONAL_DATA),
            cohort_metric: DEFAULT_COHORT_METRIC.to_string(),
            cohort_limit: DEFAULT_COHORT_LIMIT,
            export_dir: PathBuf::from("."),
        }
    }
}

impl DashboardConfig {
    /// Read `.env.local` / `.env`, then the environment, then command-line flags.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = env::args().skip(1).collect::<Vec<_>>();
        let mut cfg = Self::from_env();
        cfg.apply_args(&args);
        cfg
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(path) = env_nonempty("NFL_SEASONAL_DATA") {
            cfg.seasonal_data = PathBuf::from(path);
        }
        if let Some(metric) = env_nonempty("NFL_COHORT_METRIC") {
            cfg.cohort_metric = metric;
        }
        if let Some(limit) = env_nonempty("NFL_COHORT_LIMIT").and_then(|v| v.parse().ok()) {
            cfg.cohort_limit = limit;
        }
        if let Some(dir) = env_nonempty("NFL_EXPORT_DIR") {
            cfg.export_dir = PathBuf::from(dir);
        }
        cfg
    }

    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(path) = arg_value(args, "--data") {
            self.seasonal_data = PathBuf::from(path);
        }
        if let Some(metric) = arg_value(args, "--metric") {
            self.cohort_metric = metric;
        }
        if let Some(limit) = arg_value(args, "--limit").and_then(|v| v.parse().ok()) {
            self.cohort_limit = limit;
        }
        if let Some(dir) = arg_value(args, "--export-dir") {
            self.export_dir = PathBuf::from(dir);
        }
    }
}

/// Accepts both `--flag=value` and `--flag value`.
pub fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

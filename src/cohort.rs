use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::stats::{PlayerSeasonRecord, StatMetric};

pub const DEFAULT_COHORT_LIMIT: usize = 200;
pub const DEFAULT_COHORT_METRIC: &str = "fantasy_points";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortEntry {
    pub rank: usize,
    pub display_name: String,
    pub total: f64,
    pub seasons: usize,
}

/// Rank players by their all-time total of `metric`, highest first.
///
/// Totals treat missing values as zero. Equal totals keep name order, so the
/// result is deterministic for a given record set regardless of row order.
pub fn rank_cohort(
    records: &[PlayerSeasonRecord],
    metric: &str,
    limit: usize,
) -> Result<Vec<CohortEntry>> {
    let metric = StatMetric::from_key(metric)?;

    let mut groups: BTreeMap<&str, (f64, BTreeSet<i32>)> = BTreeMap::new();
    for record in records {
        let slot = groups
            .entry(record.display_name.as_str())
            .or_insert_with(|| (0.0, BTreeSet::new()));
        slot.0 += record.value(metric).unwrap_or(0.0);
        slot.1.insert(record.season);
    }

    let mut totals = groups.into_iter().collect::<Vec<_>>();
    // Stable sort: ties stay in name order.
    totals.sort_by(|a, b| b.1.0.total_cmp(&a.1.0));
    totals.truncate(limit);

    Ok(totals
        .into_iter()
        .enumerate()
        .map(|(idx, (name, (total, seasons)))| CohortEntry {
            rank: idx + 1,
            display_name: name.to_string(),
            total,
            seasons: seasons.len(),
        })
        .collect())
}

pub fn select_top_cohort(
    records: &[PlayerSeasonRecord],
    metric: &str,
    limit: usize,
) -> Result<Vec<String>> {
    Ok(rank_cohort(records, metric, limit)?
        .into_iter()
        .map(|entry| entry.display_name)
        .collect())
}

pub fn filter_to_cohort(
    records: &[PlayerSeasonRecord],
    cohort: &HashSet<String>,
) -> Vec<PlayerSeasonRecord> {
    records
        .iter()
        .filter(|r| cohort.contains(&r.display_name))
        .cloned()
        .collect()
}

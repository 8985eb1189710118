use std::collections::{BTreeSet, HashSet};

use nfl_yearly_terminal::cohort::{filter_to_cohort, rank_cohort, select_top_cohort};
use nfl_yearly_terminal::error::DashboardError;
use nfl_yearly_terminal::stats::{PlayerSeasonRecord, StatMetric};

fn fp(name: &str, season: i32, points: f64) -> PlayerSeasonRecord {
    PlayerSeasonRecord::new(name, season).with_stat(StatMetric::FantasyPoints, points)
}

fn two_player_records() -> Vec<PlayerSeasonRecord> {
    vec![
        fp("A", 2020, 100.0),
        fp("A", 2021, 150.0),
        fp("B", 2020, 90.0),
        fp("B", 2021, 200.0),
    ]
}

fn league(players: usize) -> Vec<PlayerSeasonRecord> {
    let mut out = Vec::new();
    for p in 0..players {
        for season in 2015..2020 {
            let points = ((p * 37 + season as usize * 11) % 301) as f64;
            out.push(fp(&format!("Player {p:03}"), season, points));
        }
    }
    out
}

#[test]
fn higher_total_ranks_first() {
    let names = select_top_cohort(&two_player_records(), "fantasy_points", 10).unwrap();
    assert_eq!(names, vec!["B".to_string(), "A".to_string()]);
}

#[test]
fn cohort_length_is_min_of_limit_and_players() {
    let records = league(40);
    assert_eq!(select_top_cohort(&records, "fantasy_points", 200).unwrap().len(), 40);
    assert_eq!(select_top_cohort(&records, "fantasy_points", 25).unwrap().len(), 25);
    assert!(select_top_cohort(&records, "fantasy_points", 0).unwrap().is_empty());
}

#[test]
fn cohort_totals_are_non_increasing() {
    let ranked = rank_cohort(&league(60), "fantasy_points", 200).unwrap();
    for pair in ranked.windows(2) {
        assert!(pair[0].total >= pair[1].total);
        assert_eq!(pair[0].rank + 1, pair[1].rank);
    }
    assert!(ranked.iter().all(|e| e.seasons == 5));
}

#[test]
fn cohort_is_subset_of_dataset_names() {
    let records = league(30);
    let all = records
        .iter()
        .map(|r| r.display_name.clone())
        .collect::<BTreeSet<_>>();
    let names = select_top_cohort(&records, "rushing_yards", 10).unwrap();
    assert!(names.iter().all(|n| all.contains(n)));
}

#[test]
fn cohort_does_not_depend_on_row_order() {
    let mut records = league(25);
    let forward = select_top_cohort(&records, "fantasy_points", 10).unwrap();
    records.reverse();
    let backward = select_top_cohort(&records, "fantasy_points", 10).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn empty_input_gives_empty_cohort() {
    assert!(select_top_cohort(&[], "fantasy_points", 200).unwrap().is_empty());
}

#[test]
fn unknown_metric_fails_fast() {
    let err = select_top_cohort(&two_player_records(), "fantasy_pts", 10).unwrap_err();
    assert!(matches!(err, DashboardError::UnknownMetric(ref m) if m == "fantasy_pts"));
    assert!(err.to_string().contains("unknown metric"));

    // Even with no rows to aggregate.
    assert!(select_top_cohort(&[], "nope", 10).is_err());
}

#[test]
fn filter_keeps_order_and_is_idempotent() {
    let records = vec![
        fp("A", 2021, 1.0),
        fp("C", 2020, 1.0),
        fp("B", 2020, 1.0),
        fp("A", 2020, 1.0),
    ];
    let cohort = HashSet::from(["A".to_string(), "B".to_string()]);
    let once = filter_to_cohort(&records, &cohort);
    let seen = once
        .iter()
        .map(|r| (r.display_name.as_str(), r.season))
        .collect::<Vec<_>>();
    assert_eq!(seen, vec![("A", 2021), ("B", 2020), ("A", 2020)]);

    let twice = filter_to_cohort(&once, &cohort);
    assert_eq!(once, twice);
}

#[test]
fn filter_with_unknown_names_is_empty() {
    let cohort = HashSet::from(["Nobody".to_string()]);
    assert!(filter_to_cohort(&two_player_records(), &cohort).is_empty());
}

use std::collections::BTreeSet;

use nfl_yearly_terminal::error::DashboardError;
use nfl_yearly_terminal::figure::{FIGURE_HEIGHT, FIGURE_TITLE, FIGURE_WIDTH, SeriesMode, build_figure};
use nfl_yearly_terminal::palette::{PLOTLY_QUALITATIVE, color_for};
use nfl_yearly_terminal::stats::{PlayerSeasonRecord, StatMetric};

fn fp(name: &str, season: i32, points: f64) -> PlayerSeasonRecord {
    PlayerSeasonRecord::new(name, season)
        .with_stat(StatMetric::FantasyPoints, points)
        .with_stat(StatMetric::Receptions, (season - 2000) as f64)
}

fn two_player_records() -> Vec<PlayerSeasonRecord> {
    vec![
        fp("A", 2020, 100.0),
        fp("A", 2021, 150.0),
        fp("B", 2020, 90.0),
        fp("B", 2021, 200.0),
    ]
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn fantasy_panel_has_one_series_per_player() {
    let metrics = StatMetric::all_keys();
    let figure = build_figure(&two_player_records(), &names(&["B", "A"]), &metrics).unwrap();
    assert_eq!(figure.panels.len(), 13);

    let panel = figure.panel(StatMetric::FantasyPoints).expect("fantasy panel");
    assert_eq!(panel.title, "Fantasy Points");
    assert_eq!(panel.row, 13);
    assert_eq!(panel.series.len(), 2);
    assert!(panel.series.iter().all(|s| s.points.len() == 2));

    let a = panel.series.iter().find(|s| s.player == "A").unwrap();
    let pts = a
        .points
        .iter()
        .map(|p| (p.season, p.value))
        .collect::<Vec<_>>();
    assert_eq!(pts, vec![(2020, Some(100.0)), (2021, Some(150.0))]);
    assert_eq!(a.mode, SeriesMode::LinesMarkers);
    assert_eq!(a.points[1].hover, "A\nSeason: 2021\nFantasy Points: 150");
}

#[test]
fn points_are_sorted_by_season_regardless_of_input_order() {
    let records = vec![fp("A", 2022, 3.0), fp("A", 2019, 1.0), fp("A", 2021, 2.0)];
    let figure = build_figure(&records, &names(&["A"]), &["fantasy_points"]).unwrap();
    let seasons = figure.panels[0].series[0]
        .points
        .iter()
        .map(|p| p.season)
        .collect::<Vec<_>>();
    assert_eq!(seasons, vec![2019, 2021, 2022]);
}

#[test]
fn point_count_matches_distinct_seasons() {
    let records = vec![
        fp("A", 2018, 1.0),
        fp("A", 2019, 1.0),
        fp("A", 2020, 1.0),
        fp("B", 2020, 1.0),
    ];
    let metrics = StatMetric::all_keys();
    let figure = build_figure(&records, &names(&["A", "B"]), &metrics).unwrap();
    for panel in &figure.panels {
        for series in &panel.series {
            let expected = records
                .iter()
                .filter(|r| r.display_name == series.player)
                .map(|r| r.season)
                .collect::<BTreeSet<_>>()
                .len();
            assert_eq!(series.points.len(), expected);
        }
    }
}

#[test]
fn legend_appears_once_per_player_on_first_panel() {
    let metrics = StatMetric::all_keys();
    let selected = names(&["A", "B"]);
    let figure = build_figure(&two_player_records(), &selected, &metrics).unwrap();

    let legends = figure.legend_entries().collect::<Vec<_>>();
    assert_eq!(legends.len(), selected.len());
    assert!(figure.panels[0].series.iter().all(|s| s.show_legend));
    assert_eq!(figure.panels[0].series[0].legend_name.as_deref(), Some("A"));
    for panel in &figure.panels[1..] {
        assert!(panel.series.iter().all(|s| !s.show_legend && s.legend_name.is_none()));
    }
}

#[test]
fn legend_follows_metric_order_not_fixed_panel() {
    let figure = build_figure(
        &two_player_records(),
        &names(&["A"]),
        &["fantasy_points", "receptions"],
    )
    .unwrap();
    assert_eq!(figure.panels[0].metric, StatMetric::FantasyPoints);
    assert!(figure.panels[0].series[0].show_legend);
    assert!(!figure.panels[1].series[0].show_legend);
}

#[test]
fn player_color_is_stable_across_panels() {
    let metrics = StatMetric::all_keys();
    let figure = build_figure(&two_player_records(), &names(&["B", "A"]), &metrics).unwrap();
    for (idx, player) in ["B", "A"].iter().enumerate() {
        let colors = figure
            .panels
            .iter()
            .flat_map(|p| p.series.iter())
            .filter(|s| s.player == *player)
            .map(|s| s.color)
            .collect::<BTreeSet<_>>();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors.into_iter().next(), Some(color_for(idx)));
    }
    assert_eq!(figure.color_of("B"), Some(PLOTLY_QUALITATIVE[0]));
}

#[test]
fn colors_reuse_only_after_palette_is_exhausted() {
    let selected = (0..12).map(|i| format!("P{i}")).collect::<Vec<_>>();
    let figure = build_figure(&[], &selected, &["fantasy_points"]).unwrap();
    let colors = figure.panels[0]
        .series
        .iter()
        .map(|s| s.color)
        .collect::<Vec<_>>();
    let first_ten = colors[..10].iter().collect::<BTreeSet<_>>();
    assert_eq!(first_ten.len(), 10);
    assert_eq!(colors[10], colors[0]);
    assert_eq!(colors[11], colors[1]);
}

#[test]
fn empty_selection_yields_thirteen_empty_panels() {
    let metrics = StatMetric::all_keys();
    let figure = build_figure(&two_player_records(), &[], &metrics).unwrap();
    assert_eq!(figure.panels.len(), 13);
    assert!(figure.panels.iter().all(|p| p.series.is_empty()));
    assert!(figure.is_empty());
    assert_eq!(figure.layout.title, FIGURE_TITLE);
    assert_eq!(figure.layout.height, FIGURE_HEIGHT);
    assert_eq!(figure.layout.width, FIGURE_WIDTH);
    assert_eq!(figure.layout.rows, 13);
}

#[test]
fn unknown_player_gets_empty_series() {
    let figure = build_figure(
        &two_player_records(),
        &names(&["A", "Ghost"]),
        &["fantasy_points"],
    )
    .unwrap();
    let ghost = figure.panels[0]
        .series
        .iter()
        .find(|s| s.player == "Ghost")
        .unwrap();
    assert!(ghost.points.is_empty());
}

#[test]
fn duplicate_selection_names_collapse() {
    let figure = build_figure(&two_player_records(), &names(&["A", "A", "B"]), &["fantasy_points"])
        .unwrap();
    assert_eq!(figure.panels[0].series.len(), 2);
    assert_eq!(figure.color_of("B"), Some(color_for(1)));
}

#[test]
fn unknown_metric_is_an_error() {
    let err = build_figure(&two_player_records(), &names(&["A"]), &["fantasy_points", "yards"])
        .unwrap_err();
    assert!(matches!(err, DashboardError::UnknownMetric(ref m) if m == "yards"));
}

#[test]
fn missing_value_is_kept_as_gap() {
    let records = vec![
        PlayerSeasonRecord::new("A", 2020),
        fp("A", 2021, 10.0),
    ];
    let figure = build_figure(&records, &names(&["A"]), &["fantasy_points"]).unwrap();
    let series = &figure.panels[0].series[0];
    assert_eq!(series.points.len(), 2);
    assert_eq!(series.points[0].value, None);
    assert!(series.points[0].hover.ends_with("Fantasy Points: n/a"));
}

#[test]
fn figure_serializes_to_json() {
    let figure = build_figure(&two_player_records(), &names(&["A"]), &["fantasy_points"]).unwrap();
    let json = serde_json::to_value(&figure).unwrap();
    assert_eq!(json["panels"][0]["metric"], "fantasy_points");
    assert_eq!(json["panels"][0]["series"][0]["mode"], "lines_markers");
    assert_eq!(json["layout"]["width"], 800);
}

#[test]
fn shared_name_and_season_rows_are_both_plotted() {
    let records = vec![fp("A", 2021, 2.0), fp("A", 2020, 1.0), fp("A", 2020, 3.0)];
    let figure = build_figure(&records, &names(&["A"]), &["fantasy_points"]).unwrap();
    let series = &figure.panels[0].series[0];

    let seasons = series.points.iter().map(|p| p.season).collect::<Vec<_>>();
    assert_eq!(seasons, vec![2020, 2020, 2021]);
    let values = series.points.iter().map(|p| p.value).collect::<Vec<_>>();
    assert_eq!(values, vec![Some(1.0), Some(3.0), Some(2.0)]);
}

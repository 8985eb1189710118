use nfl_yearly_terminal::cohort::rank_cohort;
use nfl_yearly_terminal::state::{AppState, ExportState, Focus};
use nfl_yearly_terminal::stats::{PlayerSeasonRecord, StatMetric};

fn records() -> Vec<PlayerSeasonRecord> {
    let mut out = Vec::new();
    for (name, base) in [("A", 100.0), ("B", 300.0), ("C", 200.0), ("D", 10.0)] {
        for season in 2019..2022 {
            out.push(
                PlayerSeasonRecord::new(name, season)
                    .with_stat(StatMetric::FantasyPoints, base + season as f64 - 2019.0),
            );
        }
    }
    out
}

fn app_state(limit: usize) -> AppState {
    let records = records();
    let cohort = rank_cohort(&records, "fantasy_points", limit).unwrap();
    AppState::new(cohort, StatMetric::FantasyPoints, &records, "2019-2021")
}

#[test]
fn starts_with_top_two_selected() {
    let state = app_state(3);
    assert_eq!(state.selection.names(), ["B".to_string(), "C".to_string()]);
    let figure = state.figure.as_ref().expect("figure built on start");
    assert_eq!(figure.panels.len(), 13);
    assert_eq!(figure.panels[0].series.len(), 2);
    assert_eq!(state.title(), "NFL Yearly Top Player Statistics (2019-2021)");
}

#[test]
fn rows_outside_cohort_are_dropped() {
    let state = app_state(3);
    assert!(state.cohort_records.iter().all(|r| r.display_name != "D"));
    assert_eq!(state.cohort_records.len(), 9);
}

#[test]
fn toggling_rebuilds_figure_and_logs() {
    let mut state = app_state(3);
    state.cursor = 2; // "A"
    state.toggle_current();
    assert!(state.selection.contains("A"));
    assert_eq!(state.figure.as_ref().unwrap().panels[0].series.len(), 3);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] Selected A"));

    state.toggle_current();
    assert!(!state.selection.contains("A"));
    assert_eq!(state.figure.as_ref().unwrap().panels[0].series.len(), 2);
}

#[test]
fn clear_and_reset_selection() {
    let mut state = app_state(3);
    state.clear_selection();
    assert!(state.selection.is_empty());
    assert!(state.figure.as_ref().unwrap().is_empty());

    state.reset_selection();
    assert_eq!(state.selection.len(), 2);
}

#[test]
fn cursor_wraps_in_player_list() {
    let mut state = app_state(3);
    state.select_prev();
    assert_eq!(state.cursor, 2);
    state.select_next();
    assert_eq!(state.cursor, 0);
}

#[test]
fn panel_scroll_is_clamped() {
    let mut state = app_state(3);
    state.toggle_focus();
    assert_eq!(state.focus, Focus::Panels);
    for _ in 0..50 {
        state.select_next();
    }
    assert_eq!(state.panel_scroll, 13 - state.panels_per_page);
    assert_eq!(state.visible_panels().len(), state.panels_per_page);
    assert_eq!(
        state.visible_panels().last().map(|p| p.metric),
        Some(StatMetric::FantasyPoints)
    );
    for _ in 0..50 {
        state.select_prev();
    }
    assert_eq!(state.panel_scroll, 0);
}

#[test]
fn empty_cohort_is_safe() {
    let mut state = AppState::new(Vec::new(), StatMetric::FantasyPoints, &[], "no seasons");
    state.select_next();
    state.toggle_current();
    assert_eq!(state.cursor, 0);
    assert!(state.selection.is_empty());
    assert_eq!(state.panel_count(), 13);
}

#[test]
fn console_log_is_bounded() {
    let mut state = app_state(3);
    for i in 0..500 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] line 499"));
}

#[test]
fn export_status_shows_written_path_or_failure() {
    let mut export = ExportState::default();
    assert_eq!(export.status_line(), None);

    export.message = "Exported 52 points".to_string();
    export.path = Some("out/figure.json".to_string());
    assert_eq!(
        export.status_line().as_deref(),
        Some("Exported 52 points -> out/figure.json")
    );

    export.failed = true;
    export.path = None;
    export.message = "Export failed: disk full".to_string();
    assert_eq!(export.status_line().as_deref(), Some("Export failed: disk full"));
}

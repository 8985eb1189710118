use std::collections::HashSet;

use serde::Serialize;

use crate::error::Result;
use crate::palette::color_for;
use crate::stats::{PlayerSeasonRecord, StatMetric, format_stat_value};

pub const FIGURE_TITLE: &str = "Yearly Analysis of Selected Players' Performance";
pub const FIGURE_HEIGHT: u32 = 2500 * 2;
pub const FIGURE_WIDTH: u32 = 800;
pub const X_AXIS_TITLE: &str = "Season";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    LinesMarkers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub season: i32,
    pub value: Option<f64>,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub player: String,
    pub color: &'static str,
    pub mode: SeriesMode,
    pub show_legend: bool,
    pub legend_name: Option<String>,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub row: usize,
    pub metric: StatMetric,
    pub title: &'static str,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: &'static str,
    pub height: u32,
    pub width: u32,
    pub rows: usize,
    pub cols: usize,
    pub x_axis_title: &'static str,
    pub use_container_width: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSpec {
    pub layout: FigureLayout,
    pub player_colors: Vec<(String, &'static str)>,
    pub panels: Vec<Panel>,
}

impl FigureSpec {
    pub fn panel(&self, metric: StatMetric) -> Option<&Panel> {
        self.panels.iter().find(|p| p.metric == metric)
    }

    pub fn legend_entries(&self) -> impl Iterator<Item = &Series> {
        self.panels
            .iter()
            .flat_map(|p| p.series.iter())
            .filter(|s| s.show_legend)
    }

    pub fn color_of(&self, player: &str) -> Option<&'static str> {
        self.player_colors
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, color)| *color)
    }

    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(|p| p.series.is_empty())
    }
}

/// Compose the multi-panel figure for `selected_players` over `metrics`.
///
/// Every metric key is resolved up front; an unknown key fails before any
/// panel is built. Unknown players produce empty series.
pub fn build_figure(
    records: &[PlayerSeasonRecord],
    selected_players: &[String],
    metrics: &[&str],
) -> Result<FigureSpec> {
    let metrics = metrics
        .iter()
        .map(|key| StatMetric::from_key(key))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let players = selected_players
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .collect::<Vec<_>>();

    let player_colors = players
        .iter()
        .enumerate()
        .map(|(idx, name)| ((*name).clone(), color_for(idx)))
        .collect::<Vec<_>>();

    let player_rows = players
        .iter()
        .map(|name| rows_for_player(records, name))
        .collect::<Vec<_>>();

    let panels = metrics
        .iter()
        .enumerate()
        .map(|(panel_idx, metric)| {
            let first_panel = panel_idx == 0;
            let series = player_colors
                .iter()
                .zip(&player_rows)
                .map(|((name, color), rows)| Series {
                    player: name.clone(),
                    color: *color,
                    mode: SeriesMode::LinesMarkers,
                    show_legend: first_panel,
                    legend_name: first_panel.then(|| name.clone()),
                    points: rows
                        .iter()
                        .map(|r| {
                            let value = r.value(*metric);
                            SeriesPoint {
                                season: r.season,
                                value,
                                hover: hover_label(name, r.season, *metric, value),
                            }
                        })
                        .collect(),
                })
                .collect();
            Panel {
                row: panel_idx + 1,
                metric: *metric,
                title: metric.label(),
                series,
            }
        })
        .collect::<Vec<_>>();

    Ok(FigureSpec {
        layout: FigureLayout {
            title: FIGURE_TITLE,
            height: FIGURE_HEIGHT,
            width: FIGURE_WIDTH,
            rows: panels.len(),
            cols: 1,
            x_axis_title: X_AXIS_TITLE,
            use_container_width: true,
        },
        player_colors,
        panels,
    })
}

pub fn hover_label(player: &str, season: i32, metric: StatMetric, value: Option<f64>) -> String {
    format!(
        "{player}\nSeason: {season}\n{}: {}",
        metric.label(),
        format_stat_value(value)
    )
}

/// Rows sharing a season (two people under one name) are all kept, in input order.
fn rows_for_player<'a>(records: &'a [PlayerSeasonRecord], name: &str) -> Vec<&'a PlayerSeasonRecord> {
    let mut rows = records
        .iter()
        .filter(|r| r.display_name == name)
        .collect::<Vec<_>>();
    rows.sort_by_key(|r| r.season);
    rows
}

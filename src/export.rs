use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::cohort::CohortEntry;
use crate::figure::FigureSpec;
use crate::stats::format_stat_value;

pub struct ExportReport {
    pub path: PathBuf,
    /// `None` for figure JSON, which carries no cohort table.
    pub cohort_rows: Option<usize>,
    pub series_rows: usize,
}

pub fn default_export_path(dir: &Path, ext: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("nfl_yearly_{stamp}.{ext}"))
}

pub fn figure_json(figure: &FigureSpec) -> Result<String> {
    serde_json::to_string_pretty(figure).context("serialize figure spec")
}

pub fn write_figure_json(path: &Path, figure: &FigureSpec) -> Result<ExportReport> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create export dir {}", parent.display()))?;
    }
    let json = figure_json(figure)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(ExportReport {
        path: path.to_path_buf(),
        cohort_rows: None,
        series_rows: figure
            .panels
            .iter()
            .flat_map(|panel| &panel.series)
            .map(|series| series.points.len())
            .sum(),
    })
}

pub fn export_workbook(
    path: &Path,
    cohort: &[CohortEntry],
    figure: &FigureSpec,
) -> Result<ExportReport> {
    let mut cohort_rows = vec![vec![
        "Rank".to_string(),
        "Player".to_string(),
        "Total".to_string(),
        "Seasons".to_string(),
    ]];
    cohort_rows.extend(cohort.iter().map(|entry| {
        vec![
            entry.rank.to_string(),
            entry.display_name.clone(),
            format_stat_value(Some(entry.total)),
            entry.seasons.to_string(),
        ]
    }));
    let series_rows = series_rows(figure);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Cohort")?;
        write_rows(sheet, &cohort_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Series")?;
        write_rows(sheet, &series_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        cohort_rows: Some(cohort_rows.len().saturating_sub(1)),
        series_rows: series_rows.len().saturating_sub(1),
    })
}

/// One row per plotted point, header first.
fn series_rows(figure: &FigureSpec) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Panel".to_string(),
        "Player".to_string(),
        "Season".to_string(),
        "Value".to_string(),
        "Color".to_string(),
    ]];
    for panel in &figure.panels {
        for series in &panel.series {
            for point in &series.points {
                rows.push(vec![
                    panel.title.to_string(),
                    series.player.clone(),
                    point.season.to_string(),
                    point
                        .value
                        .map(|v| format_stat_value(Some(v)))
                        .unwrap_or_default(),
                    series.color.to_string(),
                ]);
            }
        }
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

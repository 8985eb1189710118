use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use nfl_yearly_terminal::cohort::{filter_to_cohort, rank_cohort};
use nfl_yearly_terminal::config::{DashboardConfig, arg_value, parse_name_list};
use nfl_yearly_terminal::dataset::load_dataset;
use nfl_yearly_terminal::export::{figure_json, write_figure_json};
use nfl_yearly_terminal::figure::build_figure;
use nfl_yearly_terminal::selection::Selection;
use nfl_yearly_terminal::stats::StatMetric;

fn main() -> Result<()> {
    let config = DashboardConfig::load();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let dataset = load_dataset(&config.seasonal_data)
        .with_context(|| format!("load seasonal data {}", config.seasonal_data.display()))?;
    if dataset.is_empty() {
        return Err(anyhow!(
            "no player rows in {}",
            config.seasonal_data.display()
        ));
    }

    let cohort = rank_cohort(dataset.records(), &config.cohort_metric, config.cohort_limit)?;
    let names = cohort
        .iter()
        .map(|entry| entry.display_name.clone())
        .collect();
    let cohort_records = filter_to_cohort(dataset.records(), &names);

    let selection = match arg_value(&args, "--players") {
        Some(raw) => Selection::from_names(parse_name_list(&raw)),
        None => Selection::default_for(&cohort),
    };
    for name in selection.names() {
        if !names.contains(name) {
            eprintln!("warning: {name} is not in the top {} cohort", cohort.len());
        }
    }

    let metrics = StatMetric::all_keys();
    let figure = build_figure(&cohort_records, selection.names(), &metrics)?;

    match arg_value(&args, "--out") {
        Some(out) => {
            let report = write_figure_json(&PathBuf::from(out), &figure)?;
            println!("Figure export complete");
            println!("Data: {}", dataset.source.display());
            println!(
                "Rows: {} read, {} skipped, {} players, seasons {}",
                dataset.report.rows_read,
                dataset.report.rows_skipped,
                dataset.report.players,
                dataset.report.season_range_label()
            );
            println!("Cohort: {} by {}", cohort.len(), config.cohort_metric);
            println!("Selected: {}", selection.names().join(", "));
            println!("Points: {}", report.series_rows);
            println!("Written: {}", report.path.display());
        }
        None => println!("{}", figure_json(&figure)?),
    }

    Ok(())
}

use std::collections::{HashSet, VecDeque};

use crate::cohort::{CohortEntry, filter_to_cohort};
use crate::figure::{FigureSpec, build_figure};
use crate::selection::Selection;
use crate::stats::{PlayerSeasonRecord, StatMetric};

pub const APP_TITLE: &str = "NFL Yearly Top Player Statistics";
const MAX_LOGS: usize = 200;
const DEFAULT_PANELS_PER_PAGE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Players,
    Panels,
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub path: Option<String>,
    pub message: String,
    pub failed: bool,
    pub last_updated: Option<std::time::Instant>,
}

impl ExportState {
    pub fn clear_if_done_for(&mut self, now: std::time::Instant, keep_secs: u64) {
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::default();
        }
    }

    /// Header status: the message, plus the written file when there is one.
    pub fn status_line(&self) -> Option<String> {
        if self.message.is_empty() {
            return None;
        }
        match (&self.path, self.failed) {
            (Some(path), false) => Some(format!("{} -> {path}", self.message)),
            _ => Some(self.message.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub season_range: String,
    pub cohort_metric: StatMetric,
    pub cohort: Vec<CohortEntry>,
    pub cohort_records: Vec<PlayerSeasonRecord>,
    pub selection: Selection,
    pub figure: Option<FigureSpec>,
    pub cursor: usize,
    pub panel_scroll: usize,
    pub panels_per_page: usize,
    pub focus: Focus,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
}

impl AppState {
    /// `records` may be the whole table; only rows for cohort players are kept.
    pub fn new(
        cohort: Vec<CohortEntry>,
        cohort_metric: StatMetric,
        records: &[PlayerSeasonRecord],
        season_range: impl Into<String>,
    ) -> Self {
        let names = cohort
            .iter()
            .map(|entry| entry.display_name.clone())
            .collect::<HashSet<_>>();
        let cohort_records = filter_to_cohort(records, &names);
        let selection = Selection::default_for(&cohort);
        let mut state = Self {
            season_range: season_range.into(),
            cohort_metric,
            cohort,
            cohort_records,
            selection,
            figure: None,
            cursor: 0,
            panel_scroll: 0,
            panels_per_page: DEFAULT_PANELS_PER_PAGE,
            focus: Focus::Players,
            logs: VecDeque::new(),
            help_overlay: false,
            export: ExportState::default(),
        };
        state.refresh_figure();
        state
    }

    pub fn title(&self) -> String {
        format!("{APP_TITLE} ({})", self.season_range)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn refresh_figure(&mut self) {
        let metrics = StatMetric::all_keys();
        match build_figure(&self.cohort_records, self.selection.names(), &metrics) {
            Ok(figure) => self.figure = Some(figure),
            Err(err) => {
                self.figure = None;
                self.push_log(format!("[ERR] figure build failed: {err}"));
            }
        }
    }

    pub fn current_player(&self) -> Option<&CohortEntry> {
        self.cohort.get(self.cursor)
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Players => {
                if self.cohort.is_empty() {
                    self.cursor = 0;
                    return;
                }
                self.cursor = (self.cursor + 1) % self.cohort.len();
            }
            Focus::Panels => self.scroll_panels_down(),
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Players => {
                if self.cohort.is_empty() {
                    self.cursor = 0;
                    return;
                }
                self.cursor = if self.cursor == 0 {
                    self.cohort.len() - 1
                } else {
                    self.cursor - 1
                };
            }
            Focus::Panels => self.scroll_panels_up(),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Players => Focus::Panels,
            Focus::Panels => Focus::Players,
        };
    }

    pub fn toggle_current(&mut self) {
        let Some(name) = self.current_player().map(|e| e.display_name.clone()) else {
            return;
        };
        if self.selection.toggle(&name) {
            self.push_log(format!("[INFO] Selected {name}"));
        } else {
            self.push_log(format!("[INFO] Removed {name}"));
        }
        self.refresh_figure();
    }

    pub fn reset_selection(&mut self) {
        self.selection = Selection::default_for(&self.cohort);
        self.push_log("[INFO] Selection reset to top two");
        self.refresh_figure();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.push_log("[INFO] Selection cleared");
        self.refresh_figure();
    }

    pub fn panel_count(&self) -> usize {
        self.figure.as_ref().map(|f| f.panels.len()).unwrap_or(0)
    }

    pub fn scroll_panels_down(&mut self) {
        let max = self.panel_count().saturating_sub(self.panels_per_page.max(1));
        self.panel_scroll = (self.panel_scroll + 1).min(max);
    }

    pub fn scroll_panels_up(&mut self) {
        self.panel_scroll = self.panel_scroll.saturating_sub(1);
    }

    pub fn cycle_panels_per_page(&mut self) {
        self.panels_per_page = match self.panels_per_page {
            1 => 2,
            2 => 3,
            3 => 4,
            _ => 1,
        };
        let max = self.panel_count().saturating_sub(self.panels_per_page);
        self.panel_scroll = self.panel_scroll.min(max);
    }

    /// Panels currently on screen, in figure order.
    pub fn visible_panels(&self) -> &[crate::figure::Panel] {
        let Some(figure) = self.figure.as_ref() else {
            return &[];
        };
        let start = self.panel_scroll.min(figure.panels.len());
        let end = (start + self.panels_per_page.max(1)).min(figure.panels.len());
        &figure.panels[start..end]
    }
}

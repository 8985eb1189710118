pub mod cohort;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod figure;
pub mod palette;
pub mod selection;
pub mod state;
pub mod stats;

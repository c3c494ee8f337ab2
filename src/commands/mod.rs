//! Command implementations

pub mod analyze;
pub mod compare;
pub mod generate;
pub mod list;
pub mod solve;
pub mod source;

pub use analyze::{AnalysisResult, Structure, analyze_level};
pub use compare::{Comparison, ComparisonSummary, compare_level, compare_levels};
pub use generate::{GenerateConfig, GenerateResult, generate_levels};
pub use list::{LevelSummary, list_levels};
pub use solve::{SolveReport, solve_puzzle};
pub use source::{NamedLevel, resolve};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar in the house style
pub(crate) fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

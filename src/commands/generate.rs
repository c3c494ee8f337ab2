//! Level generation command
//!
//! Runs the batch generator with a progress bar and writes the accepted
//! levels to a JSON file.

use super::progress_bar;
use crate::generator::{
    GenerationReport, GeneratorConfig, GroupConfig, SlotOutcome, builtin_groups, generate,
    load_groups,
};
use crate::levels::loader::save_to_file;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Configuration for a generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    /// JSON file with group definitions (built-in groups otherwise)
    pub groups_file: Option<PathBuf>,
    /// Only generate the group with this label
    pub group: Option<String>,
    pub levels_per_group: usize,
    pub max_attempts: Option<usize>,
    /// Random seed (drawn from the thread generator otherwise)
    pub seed: Option<u64>,
    /// Where to write the accepted levels
    pub output: Option<PathBuf>,
}

/// Result of a generation run
#[derive(Debug)]
pub struct GenerateResult {
    pub report: GenerationReport,
    pub seed: u64,
    pub output: Option<PathBuf>,
}

fn select_groups(config: &GenerateConfig) -> Result<Vec<GroupConfig>> {
    let groups = match &config.groups_file {
        Some(path) => {
            load_groups(path).with_context(|| format!("loading groups from {}", path.display()))?
        }
        None => builtin_groups(),
    };

    let Some(label) = &config.group else {
        return Ok(groups);
    };

    let selected: Vec<GroupConfig> = groups
        .into_iter()
        .filter(|g| g.label.eq_ignore_ascii_case(label))
        .collect();
    if selected.is_empty() {
        bail!("unknown group '{label}'");
    }
    Ok(selected)
}

/// Generate levels
///
/// # Errors
///
/// Returns an error if the group file cannot be loaded, the group is
/// unknown, or the output file cannot be written.
pub fn generate_levels(config: &GenerateConfig) -> Result<GenerateResult> {
    let groups = select_groups(config)?;
    let seed = config.seed.unwrap_or_else(rand::random);

    let mut gen_config =
        GeneratorConfig::new(groups, seed).with_levels_per_group(config.levels_per_group.max(1));
    if let Some(attempts) = config.max_attempts {
        gen_config = gen_config.with_max_attempts(attempts);
    }

    let pb = progress_bar(gen_config.slot_count() as u64);
    let report = generate(&gen_config, |outcome| {
        match outcome {
            SlotOutcome::Accepted(level) => {
                pb.set_message(format!("{}: {} moves", level.group, level.optimal_moves));
            }
            SlotOutcome::Failed(failure) => {
                pb.set_message(format!("{}: failed", failure.group));
            }
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    if let Some(path) = &config.output {
        save_to_file(path, &report.level_configs())
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(GenerateResult {
        report,
        seed,
        output: config.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_builtin_group_by_label() {
        let config = GenerateConfig {
            group: Some("expert".to_string()),
            ..GenerateConfig::default()
        };
        let groups = select_groups(&config).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Expert");
    }

    #[test]
    fn all_builtin_groups_by_default() {
        let groups = select_groups(&GenerateConfig::default()).unwrap();
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn unknown_group_is_an_error() {
        let config = GenerateConfig {
            group: Some("mythic".to_string()),
            ..GenerateConfig::default()
        };
        assert!(select_groups(&config).is_err());
    }

    #[test]
    fn missing_groups_file_is_an_error() {
        let config = GenerateConfig {
            groups_file: Some(PathBuf::from("/no/such/groups.json")),
            ..GenerateConfig::default()
        };
        assert!(select_groups(&config).is_err());
    }
}

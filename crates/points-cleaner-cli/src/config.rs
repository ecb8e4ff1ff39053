//! Configuration loading and command-line overrides

use std::fs;
use std::path::Path;

use clap::Args;
use points_cleaner::{AutoCenterConfig, CleanerConfig};
use tracing::debug;

use crate::error::CliError;

/// Per-parameter overrides applied on top of the config file
#[derive(Args, Debug, Default, Clone)]
pub struct TuningArgs {
    /// Delta window length
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Jumps larger than this (radians) pass straight through
    #[arg(long)]
    pub threshold1: Option<f32>,

    /// Corrections no larger than this (radians) are dropped
    #[arg(long)]
    pub threshold2: Option<f32>,

    /// Fraction (0-1) of window deltas that must agree in sign
    #[arg(long)]
    pub match_fraction: Option<f32>,

    /// Share (0-1) of the agreeing deltas' mean to apply
    #[arg(long)]
    pub reaction_speed: Option<f32>,

    /// Samples to discard before auto-center calibration (enables auto-center)
    #[arg(long)]
    pub auto_center_lead_in: Option<u32>,

    /// Half of the symmetric output range (enables auto-center)
    #[arg(long, allow_negative_numbers = true)]
    pub auto_center_half_range: Option<f32>,
}

impl TuningArgs {
    /// Overlay the overrides onto `config`.
    pub fn apply(&self, mut config: CleanerConfig) -> CleanerConfig {
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(threshold1) = self.threshold1 {
            config.threshold1 = threshold1;
        }
        if let Some(threshold2) = self.threshold2 {
            config.threshold2 = threshold2;
        }
        if let Some(match_fraction) = self.match_fraction {
            config.match_fraction = match_fraction;
        }
        if let Some(reaction_speed) = self.reaction_speed {
            config.reaction_speed = reaction_speed;
        }

        if self.auto_center_lead_in.is_some() || self.auto_center_half_range.is_some() {
            let mut auto_center = config.auto_center.unwrap_or_default();
            if let Some(lead_in) = self.auto_center_lead_in {
                auto_center.lead_in = lead_in;
            }
            if let Some(half_range) = self.auto_center_half_range {
                auto_center.half_range = half_range;
            }
            config.auto_center = Some(auto_center);
        }

        config
    }
}

/// Read a JSON or YAML config file, chosen by extension.
pub fn load_config(path: &Path) -> Result<CleanerConfig, CliError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let config: CleanerConfig = match extension.as_deref() {
        Some("json") => serde_json::from_str(&fs::read_to_string(path)?)?,
        Some("yaml" | "yml") => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        _ => return Err(CliError::UnsupportedConfigFormat(path.to_path_buf())),
    };

    debug!(path = %path.display(), "loaded cleaner config");
    Ok(config)
}

/// Build the effective configuration: defaults, then file, then flags.
pub fn resolve_config(path: Option<&Path>, tuning: &TuningArgs) -> Result<CleanerConfig, CliError> {
    let base = match path {
        Some(path) => load_config(path)?,
        None => CleanerConfig::default(),
    };
    let config = tuning.apply(base);
    config.validate()?;
    Ok(config)
}

/// Auto-center settings in effect, for logging.
pub fn describe_auto_center(config: &CleanerConfig) -> String {
    match config.auto_center {
        Some(AutoCenterConfig {
            lead_in,
            half_range,
        }) => format!("lead-in {lead_in}, half range {half_range}"),
        None => "disabled".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = TuningArgs::default().apply(CleanerConfig::default());
        assert_eq!(config, CleanerConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let tuning = TuningArgs {
            window_size: Some(4),
            match_fraction: Some(0.5),
            ..TuningArgs::default()
        };
        let config = tuning.apply(CleanerConfig::default());
        assert_eq!(config.window_size, 4);
        assert!((config.match_fraction - 0.5).abs() < f32::EPSILON);
        assert!(config.auto_center.is_none());
    }

    #[test]
    fn test_single_auto_center_flag_enables_with_defaults() -> TestResult {
        let tuning = TuningArgs {
            auto_center_half_range: Some(3.0),
            ..TuningArgs::default()
        };
        let config = tuning.apply(CleanerConfig::default());
        let auto_center = config.auto_center.ok_or("auto-center not enabled")?;
        assert_eq!(auto_center.lead_in, 3);
        assert!((auto_center.half_range - 3.0).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn test_load_yaml_config() -> TestResult {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        writeln!(file, "window_size: 7\nreaction_speed: 0.5")?;
        let config = load_config(file.path())?;
        assert_eq!(config.window_size, 7);
        assert!((config.reaction_speed - 0.5).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn test_unknown_extension_rejected() -> TestResult {
        let file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        let result = load_config(file.path());
        assert!(matches!(result, Err(CliError::UnsupportedConfigFormat(_))));
        Ok(())
    }

    #[test]
    fn test_resolve_validates_overrides() {
        let tuning = TuningArgs {
            window_size: Some(0),
            ..TuningArgs::default()
        };
        let result = resolve_config(None, &tuning);
        assert!(matches!(result, Err(CliError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_describe_auto_center() {
        let config = CleanerConfig::default().with_auto_center(2, 1.5);
        assert_eq!(describe_auto_center(&config), "lead-in 2, half range 1.5");
        assert_eq!(describe_auto_center(&CleanerConfig::default()), "disabled");
    }
}

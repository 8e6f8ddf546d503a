// THEORY:
// A run is described by a `DetectionConfig`. It is read from a JSON file when
// one is given, then command-line flags are laid over it through `Overrides`.
// Validation happens once, after merging, so a flag can repair a bad file value.

use crate::core_modules::scan::Confidence;
use crate::pipeline::PipelineConfig;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path, path::PathBuf, str::FromStr};

/// One target to search for: a name for the reports and the file holding its grid.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TargetConfig {
    pub name: String,
    pub path: PathBuf,
}

impl FromStr for TargetConfig {
    type Err = String;

    /// Parses `NAME=PATH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, path)) if !name.is_empty() && !path.is_empty() => Ok(TargetConfig {
                name: name.to_string(),
                path: PathBuf::from(path),
            }),
            _ => Err(format!("invalid target '{s}', expected NAME=PATH")),
        }
    }
}

/// Reads a blank character given as text; anything but exactly one char is rejected.
pub fn parse_blank(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("blank character must be exactly one character, got {text:?}"),
    }
}

fn default_blank() -> String {
    " ".to_string()
}

fn default_confidence() -> Confidence {
    0.75
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default = "default_blank")]
    pub blank_character: String,
    #[serde(default = "default_confidence")]
    pub minimum_confidence: Confidence,
    pub workers: Option<usize>,
    pub echo_file: Option<PathBuf>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub report_misses: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            image: None,
            targets: Vec::new(),
            blank_character: default_blank(),
            minimum_confidence: default_confidence(),
            workers: None,
            echo_file: None,
            log_level: None,
            report_misses: false,
        }
    }
}

/// Command-line values that replace whatever the config file says.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub image: Option<PathBuf>,
    pub targets: Vec<TargetConfig>,
    pub blank_character: Option<String>,
    pub minimum_confidence: Option<Confidence>,
    pub workers: Option<usize>,
    pub echo_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub report_misses: bool,
}

impl DetectionConfig {
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(image) = overrides.image {
            self.image = Some(image);
        }
        if !overrides.targets.is_empty() {
            self.targets = overrides.targets;
        }
        if let Some(blank) = overrides.blank_character {
            self.blank_character = blank;
        }
        if let Some(c) = overrides.minimum_confidence {
            self.minimum_confidence = c;
        }
        if let Some(w) = overrides.workers {
            self.workers = Some(w);
        }
        if let Some(path) = overrides.echo_file {
            self.echo_file = Some(path);
        }
        if let Some(level) = overrides.log_level {
            self.log_level = Some(level);
        }
        if overrides.report_misses {
            self.report_misses = true;
        }
    }

    /// The blank character as a single `char`.
    pub fn blank(&self) -> Result<char> {
        parse_blank(&self.blank_character)
    }

    pub fn validate(&self) -> Result<()> {
        if self.image.is_none() {
            bail!("no snapper image given");
        }
        if self.targets.is_empty() {
            bail!("at least one target is required");
        }
        if !(0.0..=1.0).contains(&self.minimum_confidence) {
            bail!(
                "minimum confidence must lie within [0, 1], got {}",
                self.minimum_confidence
            );
        }
        if self.workers == Some(0) {
            bail!("workers must be >= 1");
        }
        self.blank()?;
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            minimum_confidence: self.minimum_confidence,
            report_misses: self.report_misses,
        }
    }
}

pub fn load_config(path: &Path) -> Result<DetectionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: DetectionConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_target_pairs() {
        let t: TargetConfig = "Starship=targets/starship.txt".parse().expect("target");
        assert_eq!(t.name, "Starship");
        assert_eq!(t.path, PathBuf::from("targets/starship.txt"));
        assert!("no-equals".parse::<TargetConfig>().is_err());
        assert!("=path".parse::<TargetConfig>().is_err());
    }

    #[test]
    fn fills_defaults_from_sparse_json() {
        let cfg: DetectionConfig = serde_json::from_str(
            r#"{"image": "image.txt", "targets": [{"name": "Torpedo", "path": "t.txt"}]}"#,
        )
        .expect("config");
        assert_eq!(cfg.blank_character, " ");
        assert_eq!(cfg.minimum_confidence, 0.75);
        assert!(!cfg.report_misses);
        cfg.validate().expect("valid");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = DetectionConfig {
            image: Some("a.txt".into()),
            targets: vec!["A=a.txt".parse().expect("target")],
            ..DetectionConfig::default()
        };
        cfg.apply_overrides(Overrides {
            targets: vec!["B=b.txt".parse().expect("target")],
            minimum_confidence: Some(1.0),
            blank_character: Some("0".to_string()),
            ..Overrides::default()
        });
        assert_eq!(cfg.image, Some(PathBuf::from("a.txt")));
        assert_eq!(cfg.targets[0].name, "B");
        assert_eq!(cfg.minimum_confidence, 1.0);
        assert_eq!(cfg.blank().expect("blank"), '0');
    }

    #[test]
    fn rejects_bad_values() {
        let base = DetectionConfig {
            image: Some("a.txt".into()),
            targets: vec!["A=a.txt".parse().expect("target")],
            ..DetectionConfig::default()
        };

        let mut cfg = base.clone();
        cfg.minimum_confidence = 1.2;
        assert!(cfg.validate().is_err());

        let mut cfg = base.clone();
        cfg.blank_character = "ab".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = base.clone();
        cfg.targets.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = base;
        cfg.workers = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_must_be_a_single_char() {
        assert_eq!(parse_blank("0").expect("blank"), '0');
        assert_eq!(parse_blank("·").expect("blank"), '·');
        assert!(parse_blank("").is_err());
        assert!(parse_blank("  ").is_err());
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_config(Path::new("/nope/config.json")).unwrap_err();
        assert!(err.to_string().contains("opening config"));
    }
}

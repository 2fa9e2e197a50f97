use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use strata_merge::ArrayMerge;

use crate::cli::MergeArgs;

/// Options for `strata merge`, as read from a TOML file.
///
/// ```toml
/// arrays = "incremental"
/// layers = ["defaults.toml", "site.json"]
/// output = "merged.json"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Array policy used when two arrays meet.
    pub arrays: ArrayMerge,
    /// Layer files, lowest precedence first.
    pub layers: Vec<PathBuf>,
    /// Where to write the result.
    pub output: Option<PathBuf>,
}

impl CliConfig {
    /// Read a config file. Relative paths inside it are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.layers = config.layers.into_iter().map(|p| base.join(p)).collect();
        config.output = config.output.map(|p| base.join(p));
        Ok(config)
    }

    /// Command-line flags win over file values.
    pub fn with_overrides(mut self, args: &MergeArgs) -> Self {
        if let Some(arrays) = args.arrays {
            self.arrays = arrays;
        }
        if !args.layers.is_empty() {
            self.layers = args.layers.clone();
        }
        if let Some(output) = &args.output {
            self.output = Some(output.clone());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.arrays, ArrayMerge::Replace);
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        fs::write(
            &path,
            "arrays = \"inc\"\nlayers = [\"a.json\", \"/abs/b.json\"]\noutput = \"out.json\"\n",
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.arrays, ArrayMerge::Incremental);
        assert_eq!(
            config.layers,
            vec![dir.path().join("a.json"), PathBuf::from("/abs/b.json")]
        );
        assert_eq!(config.output, Some(dir.path().join("out.json")));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        fs::write(&path, "arrays = \"zip\"\n").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }

    #[test]
    fn flags_override_file() {
        let config = CliConfig {
            arrays: ArrayMerge::Append,
            layers: vec!["from-file.json".into()],
            output: None,
        };
        let args = MergeArgs {
            layers: vec!["cli.json".into()],
            arrays: Some(ArrayMerge::Incremental),
            output: Some("out.toml".into()),
            ..Default::default()
        };
        let merged = config.with_overrides(&args);
        assert_eq!(merged.arrays, ArrayMerge::Incremental);
        assert_eq!(merged.layers, vec![PathBuf::from("cli.json")]);
        assert_eq!(merged.output, Some(PathBuf::from("out.toml")));
    }

    #[test]
    fn missing_flags_keep_file_values() {
        let config = CliConfig {
            arrays: ArrayMerge::Append,
            layers: vec!["from-file.json".into()],
            output: None,
        };
        let merged = config.clone().with_overrides(&MergeArgs::default());
        assert_eq!(merged, config);
    }
}

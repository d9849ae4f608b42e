// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report configuration, read from TOML files.

use crate::errors::ConfigParseError;
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, File, FileFormat};
use serde::Deserialize;

/// Settings for a report.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ReportConfig {
    /// The path to write the report to.
    #[serde(default)]
    pub path: Option<Utf8PathBuf>,

    /// Overrides the suite name, which is otherwise derived from `path`.
    #[serde(default)]
    pub suite_name: Option<String>,

    /// Error events are recorded only if their text contains this string.
    pub error_filter: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    report: ReportConfig,
}

impl ReportConfig {
    /// The path, relative to the current directory, at which a config file is looked up if none
    /// is given explicitly.
    pub const CONFIG_PATH: &'static str = ".config/xunit-log.toml";

    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config, layering `file` (or `CONFIG_PATH` under `root`, if it exists) on top of
    /// the defaults.
    pub fn from_sources(
        root: &Utf8Path,
        file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let config_file_contents = Config::builder()
            .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(source)
            .build()
            .and_then(|config| config.try_deserialize::<ConfigFile>())
            .map_err(|err| ConfigParseError::new(&config_file, err))?;

        tracing::debug!("loaded config (file: {config_file})");
        Ok(config_file_contents.report)
    }

    /// Returns the default config.
    pub fn default_config() -> Self {
        Config::builder()
            .add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize::<ConfigFile>())
            .map(|config_file| config_file.report)
            .expect("default config is always valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;

    fn temp_dir() -> Utf8TempDir {
        camino_tempfile::Builder::new()
            .prefix("xunit-report-config")
            .tempdir()
            .expect("tempdir created")
    }

    #[test]
    fn defaults_without_file() {
        let dir = temp_dir();
        let config = ReportConfig::from_sources(dir.path(), None).expect("defaults parse");
        assert_eq!(config, ReportConfig::default_config());
        assert_eq!(config.path, None);
        assert_eq!(config.suite_name, None);
        assert_eq!(config.error_filter, "Exception");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = temp_dir();
        let config_path = dir.path().join(ReportConfig::CONFIG_PATH);
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(
            &config_path,
            indoc! {r#"
                [report]
                path = "out/ui-tests.xml"
                error-filter = "Assertion"
            "#},
        )
        .unwrap();

        let config = ReportConfig::from_sources(dir.path(), None).expect("config parses");
        assert_eq!(config.path.as_deref(), Some(Utf8Path::new("out/ui-tests.xml")));
        assert_eq!(config.suite_name, None);
        assert_eq!(config.error_filter, "Assertion");
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = temp_dir();
        let missing = dir.path().join("missing.toml");
        let error = ReportConfig::from_sources(dir.path(), Some(missing.as_path()))
            .expect_err("missing explicit config file is an error");
        assert_eq!(error.config_file(), &missing);
    }

    #[test]
    fn wrong_type_is_an_error() {
        let dir = temp_dir();
        let config_path = dir.path().join("bad.toml");
        std::fs::write(
            &config_path,
            indoc! {r#"
                [report]
                suite-name = ["not", "a", "string"]
            "#},
        )
        .unwrap();

        ReportConfig::from_sources(dir.path(), Some(config_path.as_path()))
            .expect_err("suite-name must be a string");
    }
}

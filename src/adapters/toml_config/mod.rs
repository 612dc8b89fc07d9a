// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::fs_scanner::DEFAULT_VIDEO_EXTENSIONS;
use crate::domain::errors::*;
use crate::ports::LogLevel;
use crate::utils::logging::LogFormat;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "segmerge.toml";

/// Complete file configuration; every field has a default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergerConfig {
    pub paths: PathsConfig,
    pub tools: ToolsConfig,
    pub merge: MergeConfig,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub output_dir: Option<PathBuf>,
    pub diagnostics_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub ffprobe: String,
    pub ffmpeg: String,
    /// Per-invocation limit; unset means no limit
    pub timeout_secs: Option<u64>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub video_extensions: Vec<String>,
    pub duration_tolerance_secs: f64,
    pub duration_tolerance_ratio: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            video_extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            duration_tolerance_secs: 5.0,
            duration_tolerance_ratio: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<MergerConfig, DomainError> {
        let config: MergerConfig = toml::from_str(content).map_err(|e| {
            DomainError::InvalidConfig(format!("Failed to parse TOML config: {}", e))
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<MergerConfig, DomainError> {
        if !path.exists() {
            return Err(DomainError::FsFail(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Load `explicit` if given, else `segmerge.toml` from `search_dir` if present, else defaults.
    ///
    /// Returns the file the configuration came from.
    pub fn discover(
        explicit: Option<&Path>,
        search_dir: &Path,
    ) -> Result<(MergerConfig, Option<PathBuf>), DomainError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidate = search_dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Ok((Self::load(&candidate)?, Some(candidate)));
        }

        Ok((MergerConfig::default(), None))
    }

    /// Serialize config to TOML string
    pub fn to_toml_string(config: &MergerConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::InternalError(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(config: &MergerConfig) -> Result<(), DomainError> {
        LogLevel::parse(&config.logging.level)?;

        if config.merge.video_extensions.is_empty()
            || config
                .merge
                .video_extensions
                .iter()
                .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(DomainError::InvalidConfig(
                "merge.video_extensions must list at least one non-empty extension".to_string(),
            ));
        }

        let tolerances = [
            ("merge.duration_tolerance_secs", config.merge.duration_tolerance_secs),
            ("merge.duration_tolerance_ratio", config.merge.duration_tolerance_ratio),
        ];
        for (key, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
        }

        if config.tools.ffprobe.trim().is_empty() || config.tools.ffmpeg.trim().is_empty() {
            return Err(DomainError::InvalidConfig(
                "tools.ffprobe and tools.ffmpeg must not be empty".to_string(),
            ));
        }

        if config.tools.timeout_secs == Some(0) {
            return Err(DomainError::InvalidConfig(
                "tools.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = TomlConfigAdapter::from_toml_str("").unwrap();
        assert_eq!(config, MergerConfig::default());
        assert_eq!(config.merge.video_extensions, ["mp4", "mkv"]);
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let config = TomlConfigAdapter::from_toml_str(
            r#"
            [tools]
            ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
            timeout_secs = 600

            [merge]
            video_extensions = ["mp4", "mov"]

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.tools.ffprobe, "ffprobe");
        assert_eq!(config.tools.timeout_secs, Some(600));
        assert_eq!(config.merge.video_extensions, ["mp4", "mov"]);
        assert_eq!(config.merge.duration_tolerance_secs, 5.0);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(TomlConfigAdapter::from_toml_str("[logging]\nlevel = \"loud\"").is_err());
        assert!(TomlConfigAdapter::from_toml_str("[merge]\nvideo_extensions = []").is_err());
        let negative = "[merge]\nduration_tolerance_secs = -1.0";
        assert!(TomlConfigAdapter::from_toml_str(negative).is_err());
        assert!(TomlConfigAdapter::from_toml_str("[tools]\ntimeout_secs = 0").is_err());
        assert!(TomlConfigAdapter::from_toml_str("[unknown]\nkey = 1").is_err());
    }

    #[test]
    fn test_discover_prefers_explicit_then_working_dir() {
        let dir = TempDir::new().unwrap();
        let (config, source) = TomlConfigAdapter::discover(None, dir.path()).unwrap();
        assert_eq!(config, MergerConfig::default());
        assert!(source.is_none());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let (config, source) = TomlConfigAdapter::discover(None, dir.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(source, Some(dir.path().join(DEFAULT_CONFIG_FILE)));

        let missing = dir.path().join("other.toml");
        assert!(TomlConfigAdapter::discover(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_discover_emits_no_log_events() {
        use std::sync::{Arc, Mutex};

        // Runs before any subscriber is installed, so nothing it logs would be seen.
        let lines = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink = Arc::clone(&lines);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || CaptureWriter(Arc::clone(&sink)))
            .finish();

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "").unwrap();
        tracing::subscriber::with_default(subscriber, || {
            TomlConfigAdapter::discover(None, dir.path()).unwrap();
        });

        assert!(lines.lock().unwrap().is_empty());
    }

    struct CaptureWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = MergerConfig::default();
        let text = TomlConfigAdapter::to_toml_string(&config).unwrap();
        assert_eq!(TomlConfigAdapter::from_toml_str(&text).unwrap(), config);
    }
}

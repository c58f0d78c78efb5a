//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Download root used when neither the CLI nor the config file names one.
pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// TOML-backed file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Root directory holding every download.
    pub download_dir: Option<PathBuf>,
    /// Free-space reserve kept by `check-storage`, in MiB.
    pub storage_threshold_mib: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Shell command that makes the transfer client drop all jobs.
    pub transfer_client_remove_command: Option<String>,
    /// Shell command that makes the peer-to-peer client drop all jobs.
    pub peer_client_remove_command: Option<String>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.download_dir
            && dir.as_os_str().is_empty()
        {
            bail!("Invalid config value for `download_dir`: must not be empty");
        }

        if let Some(mib) = self.storage_threshold_mib
            && mib > u64::MAX / BYTES_PER_MIB
        {
            bail!(
                "Invalid config value for `storage_threshold_mib`: {mib}. Expected range: 0..={}",
                u64::MAX / BYTES_PER_MIB
            );
        }

        validate_command(
            "transfer_client_remove_command",
            self.transfer_client_remove_command.as_deref(),
        )?;
        validate_command(
            "peer_client_remove_command",
            self.peer_client_remove_command.as_deref(),
        )?;
        Ok(())
    }
}

fn validate_command(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(command) = value
        && command.trim().is_empty()
    {
        bail!("Invalid config value for `{field}`: must not be blank");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbositySetting {
    #[default]
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Effective settings after merging CLI flags, the config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub download_dir: PathBuf,
    pub storage_threshold_bytes: u64,
    pub verbosity: VerbositySetting,
    pub transfer_client_remove_command: Option<String>,
    pub peer_client_remove_command: Option<String>,
}

impl Settings {
    /// CLI values win over the file, the file wins over defaults.
    #[must_use]
    pub fn resolve(cli_download_dir: Option<&Path>, file: Option<&FileConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();
        let download_dir = cli_download_dir
            .map(Path::to_path_buf)
            .or(file.download_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR));
        Self {
            download_dir,
            storage_threshold_bytes: file
                .storage_threshold_mib
                .unwrap_or(0)
                .saturating_mul(BYTES_PER_MIB),
            verbosity: file.verbosity.unwrap_or_default(),
            transfer_client_remove_command: file.transfer_client_remove_command,
            peer_client_remove_command: file.peer_client_remove_command,
        }
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/storekeep/config.toml`
/// 2. `$HOME/.config/storekeep/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("storekeep")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("storekeep")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` if given, else from the default path if present.
///
/// An explicit path that does not exist is an error; a missing default file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
storage_threshold_mib = 512
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.storage_threshold_mib, Some(512));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.download_dir.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
download_dir = "/srv/downloads"
storage_threshold_mib = 0
verbosity = "quiet" # keep it short
transfer_client_remove_command = "aria2-purge"
peer_client_remove_command = "qbt-purge --all"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/srv/downloads")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
        assert_eq!(cfg.peer_client_remove_command.as_deref(), Some("qbt-purge --all"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("unknown_key"), "got: {err}");
    }

    #[test]
    fn test_parse_config_rejects_invalid_verbosity() {
        let err = parse_config_str(r#"verbosity = "loud""#).expect_err("invalid verbosity expected");
        assert!(err.to_string().contains("verbosity"), "got: {err}");
    }

    #[test]
    fn test_parse_config_rejects_threshold_overflow() {
        let err = parse_config_str("storage_threshold_mib = 18446744073709551")
            .expect_err("threshold overflow expected");
        assert!(err.to_string().contains("storage_threshold_mib"));
    }

    #[test]
    fn test_parse_config_rejects_blank_remove_command() {
        let err = parse_config_str(r#"peer_client_remove_command = "   ""#)
            .expect_err("blank command expected");
        assert!(err.to_string().contains("peer_client_remove_command"));
    }

    #[test]
    fn test_settings_cli_wins_over_file() {
        let file = FileConfig {
            download_dir: Some(PathBuf::from("/from/file")),
            storage_threshold_mib: Some(2),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(Some(Path::new("/from/cli")), Some(&file));
        assert_eq!(settings.download_dir, PathBuf::from("/from/cli"));
        assert_eq!(settings.storage_threshold_bytes, 2 * 1024 * 1024);

        let settings = Settings::resolve(None, Some(&file));
        assert_eq!(settings.download_dir, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_settings_defaults_without_file() {
        let settings = Settings::resolve(None, None);
        assert_eq!(settings.download_dir, PathBuf::from(DEFAULT_DOWNLOAD_DIR));
        assert_eq!(settings.storage_threshold_bytes, 0);
        assert_eq!(settings.verbosity, VerbositySetting::Default);
        assert!(settings.transfer_client_remove_command.is_none());
    }

    #[test]
    fn test_load_config_explicit_missing_path_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(&temp.path().join("absent.toml")))
            .expect_err("missing explicit config expected");
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("storekeep.toml");
        fs::write(&path, "storage_threshold_mib = 7\n").unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert!(loaded.loaded_from_file);
        assert_eq!(loaded.config.unwrap().storage_threshold_mib, Some(7));
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Verbose.as_str(), "verbose");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.as_str(), "debug");
    }
}

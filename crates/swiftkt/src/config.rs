//! Configuration loading for swiftkt.
//!
//! Loads config from:
//! 1. Global: ~/.config/swiftkt/config.toml (or `$XDG_CONFIG_HOME/swiftkt`)
//! 2. Per-project: .swiftkt/config.toml (overrides global)
//!
//! Files are merged key by key before deserializing, so a project file that
//! only sets `[output] indent_width` keeps every other global setting.

use std::path::{Path, PathBuf};
use swiftkt_translate::TranslateConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Global config path, if a config directory can be found.
pub fn global_config_path() -> Option<PathBuf> {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
    Some(config_home.join("swiftkt").join("config.toml"))
}

pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(".swiftkt").join("config.toml")
}

/// Load the global config, then the project config under `root`.
pub fn load(root: &Path) -> Result<TranslateConfig, ConfigError> {
    let mut paths: Vec<PathBuf> = global_config_path().into_iter().collect();
    paths.push(project_config_path(root));
    load_layers(&paths)
}

/// Merge the given files in order; later files win. Missing files are skipped.
pub fn load_layers(paths: &[PathBuf]) -> Result<TranslateConfig, ConfigError> {
    let mut merged = toml::Table::new();
    for path in paths {
        let Some(table) = read_table(path)? else {
            continue;
        };
        tracing::debug!(path = %path.display(), "loaded config layer");
        merge(&mut merged, table);
    }
    // Layers were validated one by one; this only fails on shape conflicts.
    toml::Value::Table(merged)
        .try_into()
        .map_err(|source| ConfigError::Parse {
            path: paths.last().cloned().unwrap_or_default(),
            source,
        })
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let parse_error = |source: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let table: toml::Table = content.parse().map_err(parse_error)?;
    // Validate the layer alone so errors point at the file that caused them.
    let _: TranslateConfig = toml::Value::Table(table.clone())
        .try_into()
        .map_err(parse_error)?;
    Ok(Some(table))
}

/// Overlay `other` onto `base`, recursing into tables.
fn merge(base: &mut toml::Table, other: toml::Table) {
    for (key, value) in other {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_layers(&[dir.path().join("nope.toml")]).unwrap();
        assert_eq!(config, TranslateConfig::default());
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[output]\nindent_width = 8\n\n[tree]\nhorizontal_limit = 40\n",
        );
        let project = write(dir.path(), "project.toml", "[output]\nindent_width = 2\n");

        let config = load_layers(&[global, project]).unwrap();
        assert_eq!(config.output.indent_width, 2);
        assert_eq!(config.tree.horizontal_limit, 40);
        assert_eq!(config.translate, Default::default());
    }

    #[test]
    fn test_invalid_layer_names_its_file() {
        let dir = TempDir::new().unwrap();
        let bad = write(dir.path(), "bad.toml", "[output]\nindent_width = \"wide\"\n");
        let err = load_layers(&[bad.clone()]).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, bad),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reads_project_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".swiftkt")).unwrap();
        write(
            &dir.path().join(".swiftkt"),
            "config.toml",
            "[translate]\ndropped_imports = [\"Foundation\", \"Combine\"]\n",
        );
        let config = load_layers(&[project_config_path(dir.path())]).unwrap();
        assert!(config.translate.drops_import("Combine"));
        assert!(!config.translate.drops_import("UIKit"));
    }
}

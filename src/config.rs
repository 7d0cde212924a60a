// Configuration
// Resolves what to scan and how to print it from CLI/environment input

use crate::error::Result;
use crate::query::executor::IdLine;
use crate::query::filter::{Filter, Preset, Term};
use crate::query::parser::{QueryParser, ReadOnlySelect};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

pub const DEFAULT_TABLE: &str = "generic_string_objects";
pub const DEFAULT_ID_COLUMN: &str = "id";
pub const DEFAULT_DATA_COLUMN: &str = "data";

/// File name of Warp's database inside its data directory
pub const DB_FILE_NAME: &str = "warp.sqlite";

/// Environment overrides for the data directory, checked in this order
const DATA_DIR_OVERRIDES: [&str; 2] = ["WARP_DATA_DIR", "WARP_DATA_PATH"];

/// How matches are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// An id line followed by the pretty-printed document
    #[default]
    Text,
    /// One compact JSON object per match
    Jsonl,
}

/// The platform families Warp lays its data out differently on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Default database file: Warp's data directory plus `warp.sqlite`
pub fn default_db_path() -> Option<PathBuf> {
    warp_data_dir(
        Platform::current(),
        dirs::home_dir().as_deref(),
        dirs::data_local_dir().as_deref(),
        |key| std::env::var(key).ok(),
    )
    .map(|dir| dir.join(DB_FILE_NAME))
}

/// Locate Warp's data directory
///
/// An existing `WARP_DATA_DIR` or `WARP_DATA_PATH` wins. Otherwise Windows
/// uses `<local app data>/warp/Warp/data`; macOS and Linux walk a list of
/// candidates, preferring one that already holds `warp.sqlite`, then the
/// first that exists, then a fixed fallback.
pub fn warp_data_dir<F>(
    platform: Platform,
    home: Option<&Path>,
    local_data: Option<&Path>,
    env: F,
) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let env_path = |key: &str| {
        env(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    };

    for key in DATA_DIR_OVERRIDES {
        if let Some(path) = env_path(key).filter(|p| p.exists()) {
            return Some(path);
        }
    }

    match platform {
        Platform::Windows => local_data.map(|dir| dir.join("warp").join("Warp").join("data")),
        Platform::MacOs => {
            let home = home?;
            let support = home.join("Library").join("Application Support");
            let candidates = [
                support.join("dev.warp.Warp"),
                support.join("warp"),
                home.join(".warp"),
            ];
            Some(pick_candidate(&candidates).unwrap_or_else(|| home.join(".warp")))
        }
        Platform::Linux => {
            let home = home?;
            let xdg_data = env_path("XDG_DATA_HOME").unwrap_or_else(|| home.join(".local/share"));
            let xdg_state =
                env_path("XDG_STATE_HOME").unwrap_or_else(|| home.join(".local/state"));
            let flatpak = home.join(".var/app/dev.warp.Warp/data");
            let candidates = [
                xdg_state.join("warp-terminal"),
                home.join(".local/state/warp-terminal"),
                home.join(".config/warp-terminal"),
                home.join(".config/warp"),
                xdg_data.join("warp/Warp/data"),
                xdg_data.join("warp"),
                xdg_data.join("warp-terminal"),
                flatpak.join("warp/Warp/data"),
                flatpak.join("warp"),
                flatpak.clone(),
                home.join("snap/warp/common"),
            ];
            Some(pick_candidate(&candidates).unwrap_or_else(|| xdg_data.join("warp")))
        }
    }
}

/// First candidate holding the database, else the first that exists
fn pick_candidate(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| dir.join(DB_FILE_NAME).exists())
        .or_else(|| candidates.iter().find(|dir| dir.exists()))
        .cloned()
}

/// Everything a scan needs, fully resolved
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub db_path: PathBuf,
    pub select: ReadOnlySelect,
    pub filter: Filter,
    pub max_chars: Option<usize>,
    pub format: OutputFormat,
    pub id_line: IdLine,
    /// Header line for text output
    pub header: String,
}

impl ScanConfig {
    /// Combine a preset with explicit overrides
    ///
    /// Explicit terms replace the preset's terms, `max_chars` replaces its
    /// limit, and `full` disables truncation entirely. A custom SQL string
    /// takes precedence over the table/column names.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        db_path: PathBuf,
        table: &str,
        id_column: &str,
        data_column: &str,
        sql: Option<&str>,
        preset: Preset,
        terms: &[String],
        max_chars: Option<usize>,
        full: bool,
        format: OutputFormat,
    ) -> Result<Self> {
        let select = match sql {
            Some(sql) => QueryParser::parse(sql)?,
            None => ReadOnlySelect::table(table, id_column, data_column)?,
        };

        let (filter, header) = if terms.is_empty() {
            (Filter::new(preset.terms()), preset.header(select.source()))
        } else {
            let parsed = terms
                .iter()
                .map(|t| t.parse::<Term>())
                .collect::<Result<Vec<_>>>()?;
            let header = format!(
                "=== {} - matching {} ===",
                select.source(),
                parsed
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            (Filter::new(parsed), header)
        };

        let max_chars = if full {
            None
        } else {
            max_chars.or_else(|| preset.max_chars())
        };

        Ok(Self {
            db_path,
            select,
            filter,
            max_chars,
            format,
            id_line: preset.id_line(),
            header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn resolve(
        sql: Option<&str>,
        preset: Preset,
        terms: &[&str],
        max_chars: Option<usize>,
        full: bool,
    ) -> Result<ScanConfig> {
        let terms: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
        ScanConfig::resolve(
            PathBuf::from("warp.sqlite"),
            DEFAULT_TABLE,
            DEFAULT_ID_COLUMN,
            DEFAULT_DATA_COLUMN,
            sql,
            preset,
            &terms,
            max_chars,
            full,
            OutputFormat::Text,
        )
    }

    fn env_of(pairs: &[(&str, &Path)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.display().to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_preset_defaults() {
        let config = resolve(None, Preset::Profiles, &[], None, false).unwrap();
        assert_eq!(config.max_chars, Some(500));
        assert_eq!(config.filter.terms().len(), 5);
        assert_eq!(config.id_line, IdLine::Prefixed);
        assert_eq!(
            config.header,
            "=== generic_string_objects - looking for agent profiles ==="
        );
    }

    #[test]
    fn test_models_preset_output_shape() {
        let config = resolve(None, Preset::Models, &[], None, false).unwrap();
        assert_eq!(config.id_line, IdLine::Trailing);
        assert_eq!(config.header, "=== 所有 generic_string_objects 记录 ===");
    }

    #[test]
    fn test_explicit_terms_replace_preset() {
        let config = resolve(None, Preset::Profiles, &["key:base_model", "Model"], None, false)
            .unwrap();
        assert_eq!(
            config.filter.terms(),
            &[Term::key("base_model"), Term::contains("model")]
        );
        assert_eq!(
            config.header,
            "=== generic_string_objects - matching key:base_model, model ==="
        );
    }

    #[test]
    fn test_truncation_overrides() {
        assert_eq!(
            resolve(None, Preset::Profiles, &[], Some(80), false).unwrap().max_chars,
            Some(80)
        );
        assert_eq!(
            resolve(None, Preset::Profiles, &[], Some(80), true).unwrap().max_chars,
            None
        );
        assert_eq!(
            resolve(None, Preset::Models, &[], None, false).unwrap().max_chars,
            None
        );
    }

    #[test]
    fn test_custom_sql() {
        let config = resolve(
            Some("SELECT id, data FROM generic_string_objects LIMIT 5"),
            Preset::Profiles,
            &[],
            None,
            false,
        )
        .unwrap();
        assert_eq!(config.header, "=== custom query - looking for agent profiles ===");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(resolve(Some("DELETE FROM x"), Preset::Models, &[], None, false).is_err());
        assert!(resolve(None, Preset::Models, &[""], None, false).is_err());
    }

    #[test]
    fn test_data_dir_override_wins() {
        let home = tempfile::tempdir().unwrap();
        let custom = tempfile::tempdir().unwrap();

        let dir = warp_data_dir(
            Platform::Linux,
            Some(home.path()),
            None,
            env_of(&[("WARP_DATA_DIR", custom.path())]),
        );
        assert_eq!(dir.as_deref(), Some(custom.path()));

        let dir = warp_data_dir(
            Platform::MacOs,
            Some(home.path()),
            None,
            env_of(&[("WARP_DATA_PATH", custom.path())]),
        );
        assert_eq!(dir.as_deref(), Some(custom.path()));
    }

    #[test]
    fn test_missing_override_is_ignored() {
        let home = tempfile::tempdir().unwrap();
        let missing = home.path().join("does-not-exist");

        let dir = warp_data_dir(
            Platform::Linux,
            Some(home.path()),
            None,
            env_of(&[("WARP_DATA_DIR", missing.as_path())]),
        );
        assert_eq!(dir, Some(home.path().join(".local/share/warp")));
    }

    #[test]
    fn test_linux_prefers_directory_with_database() {
        let home = tempfile::tempdir().unwrap();
        let state = home.path().join(".local/state/warp-terminal");
        let config = home.path().join(".config/warp-terminal");
        fs::create_dir_all(&state).unwrap();
        fs::create_dir_all(&config).unwrap();
        fs::write(config.join(DB_FILE_NAME), b"").unwrap();

        let dir = warp_data_dir(Platform::Linux, Some(home.path()), None, env_of(&[]));
        assert_eq!(dir, Some(config));
    }

    #[test]
    fn test_linux_falls_back_to_existing_then_default() {
        let home = tempfile::tempdir().unwrap();
        let snap = home.path().join("snap/warp/common");
        fs::create_dir_all(&snap).unwrap();

        let dir = warp_data_dir(Platform::Linux, Some(home.path()), None, env_of(&[]));
        assert_eq!(dir, Some(snap));

        let empty = tempfile::tempdir().unwrap();
        let xdg = empty.path().join("xdg-data");
        let dir = warp_data_dir(
            Platform::Linux,
            Some(empty.path()),
            None,
            env_of(&[("XDG_DATA_HOME", xdg.as_path())]),
        );
        assert_eq!(dir, Some(xdg.join("warp")));
    }

    #[test]
    fn test_macos_candidates() {
        let home = tempfile::tempdir().unwrap();
        let dot_warp = home.path().join(".warp");
        let support = home.path().join("Library/Application Support/warp");
        fs::create_dir_all(&dot_warp).unwrap();
        fs::create_dir_all(&support).unwrap();
        fs::write(dot_warp.join(DB_FILE_NAME), b"").unwrap();

        let dir = warp_data_dir(Platform::MacOs, Some(home.path()), None, env_of(&[]));
        assert_eq!(dir, Some(dot_warp));
    }

    #[test]
    fn test_windows_uses_local_app_data() {
        let local = PathBuf::from("C:/Users/someone/AppData/Local");
        let dir = warp_data_dir(Platform::Windows, None, Some(local.as_path()), env_of(&[]));
        assert_eq!(dir, Some(local.join("warp").join("Warp").join("data")));
        assert_eq!(
            warp_data_dir(Platform::Windows, None, None, env_of(&[])),
            None
        );
    }

    #[test]
    fn test_default_db_path_honors_environment() {
        // The only test that touches the real process environment
        let custom = tempfile::tempdir().unwrap();
        std::env::set_var("WARP_DATA_DIR", custom.path());
        let path = default_db_path();
        std::env::remove_var("WARP_DATA_DIR");

        assert_eq!(path, Some(custom.path().join(DB_FILE_NAME)));
    }
}

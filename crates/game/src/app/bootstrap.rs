use std::path::PathBuf;

use engine::{load_input_script, InputCollector, InputScriptError, InputSource, LoopConfig, ScriptedInputSource};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::kitchen::{default_layout, load_kitchen_config, ConfigError, KitchenConfig, KitchenScene};

const LAYOUT_ENV_VAR: &str = "KITCHEN_LAYOUT";
const INPUT_SCRIPTS_ENV_VAR: &str = "KITCHEN_INPUT_SCRIPTS";
const SEED_ENV_VAR: &str = "KITCHEN_SEED";
const TICKS_ENV_VAR: &str = "KITCHEN_TICKS";
const REALTIME_ENV_VAR: &str = "KITCHEN_REALTIME";
const DUMP_STATE_ENV_VAR: &str = "KITCHEN_DUMP_STATE";
/// One minute of play at 60 TPS.
const DEFAULT_TICKS: u64 = 3600;

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    InputScript(#[from] InputScriptError),
    #[error("invalid {name}='{value}': expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: KitchenScene,
    pub(crate) input: InputCollector,
    pub(crate) dump_state: bool,
}

/// Startup knobs read from the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EnvSettings {
    pub(crate) layout: Option<PathBuf>,
    pub(crate) input_scripts: Vec<PathBuf>,
    pub(crate) seed: Option<u64>,
    /// `None` runs until the scene quits.
    pub(crate) max_ticks: Option<u64>,
    pub(crate) realtime: bool,
    pub(crate) dump_state: bool,
}

impl EnvSettings {
    fn from_env() -> Result<Self, BootstrapError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, BootstrapError> {
        let seed = lookup(SEED_ENV_VAR)
            .map(|raw| parse_number(SEED_ENV_VAR, &raw))
            .transpose()?;
        let max_ticks = match lookup(TICKS_ENV_VAR) {
            Some(raw) => match parse_number(TICKS_ENV_VAR, &raw)? {
                0 => None,
                ticks => Some(ticks),
            },
            None => Some(DEFAULT_TICKS),
        };

        Ok(Self {
            layout: lookup(LAYOUT_ENV_VAR)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from),
            input_scripts: lookup(INPUT_SCRIPTS_ENV_VAR)
                .map(|raw| split_paths(&raw))
                .unwrap_or_default(),
            seed,
            max_ticks,
            realtime: parse_flag(lookup(REALTIME_ENV_VAR)),
            dump_state: parse_flag(lookup(DUMP_STATE_ENV_VAR)),
        })
    }
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Kitchen Startup ===");

    let settings = EnvSettings::from_env()?;
    build_app_from(&settings)
}

pub(crate) fn build_app_from(settings: &EnvSettings) -> Result<AppWiring, BootstrapError> {
    let mut kitchen = match &settings.layout {
        Some(path) => load_kitchen_config(path)?,
        None => default_layout(),
    };
    if let Some(seed) = settings.seed {
        kitchen = kitchen.with_seed(seed);
    }

    let input = build_input_collector(&settings.input_scripts, &kitchen)?;
    let layout_label = settings
        .layout
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "default".to_string());
    info!(
        layout = %layout_label,
        seed = kitchen.seed,
        input_scripts = settings.input_scripts.len(),
        max_ticks = ?settings.max_ticks,
        "kitchen_config"
    );

    let config = LoopConfig {
        max_ticks: settings.max_ticks,
        realtime: settings.realtime,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: KitchenScene::new(kitchen),
        input,
        dump_state: settings.dump_state,
    })
}

fn build_input_collector(
    script_paths: &[PathBuf],
    kitchen: &KitchenConfig,
) -> Result<InputCollector, BootstrapError> {
    if script_paths.len() > kitchen.players.len() {
        info!(
            scripts = script_paths.len(),
            players = kitchen.players.len(),
            "input_scripts_exceed_players"
        );
    }
    let mut sources: Vec<Box<dyn InputSource>> = Vec::with_capacity(script_paths.len());
    for path in script_paths {
        let script = load_input_script(path)?;
        sources.push(Box::new(ScriptedInputSource::new(script)));
    }
    Ok(InputCollector::new(sources))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("yes")
    )
}

fn parse_number(name: &'static str, raw: &str) -> Result<u64, BootstrapError> {
    raw.trim().parse().map_err(|_| BootstrapError::InvalidEnv {
        name,
        value: raw.to_string(),
        expected: "unsigned integer",
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn settings_from(pairs: &[(&'static str, &str)]) -> Result<EnvSettings, BootstrapError> {
        let vars = pairs
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect::<HashMap<_, _>>();
        EnvSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = settings_from(&[]).expect("defaults");

        assert_eq!(
            settings,
            EnvSettings {
                max_ticks: Some(DEFAULT_TICKS),
                ..EnvSettings::default()
            }
        );
    }

    #[test]
    fn parses_every_variable() {
        let settings = settings_from(&[
            (LAYOUT_ENV_VAR, " kitchen.json "),
            (INPUT_SCRIPTS_ENV_VAR, "a.json, ,b.json"),
            (SEED_ENV_VAR, "42"),
            (TICKS_ENV_VAR, "0"),
            (REALTIME_ENV_VAR, "1"),
            (DUMP_STATE_ENV_VAR, "true"),
        ])
        .expect("settings");

        assert_eq!(settings.layout, Some(PathBuf::from("kitchen.json")));
        assert_eq!(
            settings.input_scripts,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.max_ticks, None);
        assert!(settings.realtime);
        assert!(settings.dump_state);
    }

    #[test]
    fn rejects_non_numeric_seed() {
        let error = settings_from(&[(SEED_ENV_VAR, "abc")]).expect_err("bad seed");
        assert_eq!(
            error.to_string(),
            "invalid KITCHEN_SEED='abc': expected unsigned integer"
        );
    }

    #[test]
    fn wires_default_layout_with_scripts() {
        let mut script = tempfile::NamedTempFile::new().expect("temp file");
        write!(script, r#"{{"steps": [{{"ticks": 2, "hold": ["move_left"]}}]}}"#)
            .expect("write script");
        let settings = EnvSettings {
            input_scripts: vec![script.path().to_path_buf()],
            seed: Some(9),
            max_ticks: Some(10),
            ..EnvSettings::default()
        };

        let app = build_app_from(&settings).expect("wiring");

        assert_eq!(app.input.source_count(), 1);
        assert_eq!(app.config.max_ticks, Some(10));
        assert!(!app.config.realtime);
        assert!(app.scene.world().is_none());
    }

    #[test]
    fn missing_layout_file_fails_startup() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = EnvSettings {
            layout: Some(dir.path().join("nope.json")),
            ..EnvSettings::default()
        };

        let error = build_app_from(&settings).err().expect("missing layout");
        assert!(matches!(error, BootstrapError::Config(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn malformed_script_fails_startup() {
        let mut script = tempfile::NamedTempFile::new().expect("temp file");
        write!(script, r#"{{"steps": [{{"ticks": 1, "hold": ["jump"]}}]}}"#).expect("write");
        let settings = EnvSettings {
            input_scripts: vec![script.path().to_path_buf()],
            ..EnvSettings::default()
        };

        let error = build_app_from(&settings).err().expect("bad script");
        assert!(error.to_string().contains("steps[0].hold[0]"), "{error}");
    }
}

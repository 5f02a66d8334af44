use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rotary::{KnobOptions, OptionsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    /// Extra CSS loaded on top of the built-in styles.
    pub stylesheet: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 400,
            stylesheet: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub knob: KnobOptions,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid knob options: {0}")]
    Options(#[from] OptionsError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Command line values that take precedence over the config file, including
/// after a reload.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub diameter: Option<f64>,
    pub tick_spacing: Option<f64>,
    pub snap: bool,
}

impl Overrides {
    pub fn apply(&self, knob: &mut KnobOptions) {
        if let Some(diameter) = self.diameter {
            knob.diameter = diameter;
        }
        if let Some(spacing) = self.tick_spacing {
            knob.tick_spacing = spacing;
        }
        if self.snap {
            knob.snap_to_ticks = true;
            knob.show_tick_marks = true;
        }
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "rotary", "rotary-demo").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder()
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    let s = builder
        .add_source(
            config::Environment::with_prefix("ROTARY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.knob.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    finish(builder().add_source(config::File::from(path).required(false)))
}

pub fn load_or_default(path: &Path) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!(
                "Falling back to default config ({}): {}",
                path.display(),
                e
            );
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Directory to watch and the path events will report for the config file.
///
/// Editors often replace the file instead of writing it, so the parent
/// directory is watched and events are filtered by file name. The directory is
/// created if needed and canonicalized, since notify reports absolute paths.
fn watch_target(config_path: &Path) -> Result<(PathBuf, PathBuf), ConfigError> {
    let file_name = config_path
        .file_name()
        .ok_or(ConfigError::ConfigDirNotFound)?;
    let dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs_err::create_dir_all(dir)?;
    let dir = fs_err::canonicalize(dir)?;
    let file = dir.join(file_name);
    Ok((dir, file))
}

/// Whether a watch event should trigger a config reload.
fn is_config_change(event: &notify::Event, config_file: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    relevant && event.paths.iter().any(|p| p == config_file)
}

fn start_watcher(
    dir: &Path,
    bridge_tx: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Sends [`AppEvent::ConfigReload`] each time the config file changes, until
/// the receiving side closes.
pub async fn run_async_watcher(tx: Sender<AppEvent>, config_path: PathBuf) {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let (config_file, _watcher) = match watch_target(&config_path)
        .and_then(|(dir, file)| Ok((file, start_watcher(&dir, bridge_tx)?)))
    {
        Ok(started) => started,
        Err(e) => {
            log::error!(
                "Config reload disabled ({}): {}",
                config_path.display(),
                e
            );
            return;
        }
    };
    log::debug!("Watching {}", config_file.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_config_change(&event, &config_file) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotary::{BoundaryMode, RangePolicy};

    fn parse_toml(toml: &str) -> Result<Config, ConfigError> {
        finish(builder().add_source(config::File::from_str(toml, config::FileFormat::Toml)))
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.knob.tick_spacing, 30.0);
        assert!(config.knob.show_value_label);
        assert_eq!(config.knob.boundary, BoundaryMode::Wrap);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_toml(
            r#"
            [knob]
            boundary = "Clamp"
            max = 270.0
            "#,
        )
        .unwrap();
        assert_eq!(
            config.knob.range_policy().unwrap(),
            RangePolicy::Clamp {
                min: 0.0,
                max: 270.0
            }
        );
        assert_eq!(config.knob.diameter, KnobOptions::default().diameter);
        assert_eq!(config.window.width, 500);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = parse_toml(
            r#"
            [knob]
            tick_spacing = -5.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Options(OptionsError::InvalidTickSpacing(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("rotary-demo-missing/config.toml");
        let config = load_or_default(&path);
        assert_eq!(config.knob, KnobOptions::default());
    }

    #[test]
    fn test_config_serializes_lowercase_boundary() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["knob"]["boundary"], "wrap");
        assert_eq!(json["window"]["stylesheet"], serde_json::Value::Null);
    }

    #[test]
    fn test_watch_target() {
        let dir = std::env::temp_dir().join("rotary-demo-watch/nested");
        let (watched, file) = watch_target(&dir.join("config.toml")).unwrap();
        assert!(watched.is_absolute() && watched.is_dir());
        assert_eq!(file, watched.join("config.toml"));

        let (watched, file) = watch_target(Path::new("config.toml")).unwrap();
        assert_eq!(watched, fs_err::canonicalize(".").unwrap());
        assert_eq!(file.file_name().unwrap(), "config.toml");

        assert!(matches!(
            watch_target(Path::new("/")),
            Err(ConfigError::ConfigDirNotFound)
        ));
    }

    #[test]
    fn test_is_config_change() {
        use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};

        let file = PathBuf::from("/home/user/.config/rotary-demo/config.toml");
        let other = PathBuf::from("/home/user/.config/rotary-demo/config.toml~");
        let cases = vec![
            (EventKind::Modify(ModifyKind::Data(DataChange::Content)), &file, true),
            (EventKind::Modify(ModifyKind::Name(RenameMode::To)), &file, true),
            (EventKind::Create(CreateKind::File), &file, true),
            (EventKind::Remove(RemoveKind::File), &file, true),
            (EventKind::Access(AccessKind::Read), &file, false),
            (EventKind::Modify(ModifyKind::Data(DataChange::Content)), &other, false),
        ];

        for (kind, path, expected) in cases {
            let event = notify::Event::new(kind).add_path(path.clone());
            assert_eq!(
                is_config_change(&event, &file),
                expected,
                "{:?} {path:?}",
                event.kind
            );
        }
    }

    #[test]
    fn test_overrides() {
        let mut knob = KnobOptions::default();
        Overrides {
            diameter: Some(200.0),
            tick_spacing: Some(45.0),
            snap: true,
        }
        .apply(&mut knob);
        assert_eq!(knob.diameter, 200.0);
        assert_eq!(knob.tick_spacing, 45.0);
        assert!(knob.snap_to_ticks && knob.show_tick_marks);

        let mut untouched = KnobOptions::default();
        Overrides::default().apply(&mut untouched);
        assert_eq!(untouched, KnobOptions::default());
    }
}

use crate::config::Settings;
use crate::model::ActivityData;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_DIR: &str = ".actgraph";
const SETTINGS_FILE: &str = "settings.yml";
const DATA_FILE: &str = "data.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultScope {
    Project,
    Global,
}

#[derive(Debug, Clone)]
pub struct VaultLocation {
    /// Directory holding the notes.
    pub root: PathBuf,
    /// Where settings, activity data and logs live.
    pub state_dir: PathBuf,
    pub scope: VaultScope,
}

impl VaultLocation {
    pub fn settings_path(&self) -> PathBuf {
        self.state_dir.join(SETTINGS_FILE)
    }

    pub fn data_path(&self) -> PathBuf {
        self.state_dir.join(DATA_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}

/// Persisted plugin data; only the activity map for now.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PluginData {
    #[serde(default)]
    pub activity_data: ActivityData,
}

/// Persistence of the date -> count map.
pub trait ActivityStore {
    fn load(&self) -> Result<ActivityData>;
    fn save(&self, data: &ActivityData) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct YamlStore {
    path: PathBuf,
}

impl YamlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        YamlStore { path: path.into() }
    }

    pub fn for_location(location: &VaultLocation) -> Self {
        YamlStore::new(location.data_path())
    }
}

impl ActivityStore for YamlStore {
    fn load(&self) -> Result<ActivityData> {
        if !self.path.exists() {
            return Ok(ActivityData::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {:?}", self.path))?;
        if raw.trim().is_empty() {
            return Ok(ActivityData::new());
        }
        let data: PluginData = serde_yaml::from_str(&raw).context("parsing activity data")?;
        info!(
            "loaded {} day(s) of activity from {}",
            data.activity_data.len(),
            self.path.display()
        );
        Ok(data.activity_data)
    }

    fn save(&self, data: &ActivityData) -> Result<()> {
        let payload = PluginData {
            activity_data: data.clone(),
        };
        write_yaml(&self.path, &payload).context("serializing activity data")
    }
}

pub fn init_vault(root: &Path) -> Result<VaultLocation> {
    let state_dir = root.join(STATE_DIR);
    fs::create_dir_all(&state_dir).context("failed to create .actgraph directory")?;
    let location = VaultLocation {
        root: root.to_path_buf(),
        state_dir,
        scope: VaultScope::Project,
    };
    if !location.settings_path().exists() {
        save_settings(&location, &Settings::default())?;
    }
    if !location.data_path().exists() {
        YamlStore::for_location(&location).save(&ActivityData::new())?;
    }
    Ok(location)
}

pub fn locate_vault(start: &Path) -> Result<VaultLocation> {
    if let Some(root) = find_project_vault(start) {
        return Ok(VaultLocation {
            state_dir: root.join(STATE_DIR),
            root,
            scope: VaultScope::Project,
        });
    }
    Ok(VaultLocation {
        root: start.to_path_buf(),
        state_dir: global_state_dir()?,
        scope: VaultScope::Global,
    })
}

pub fn load_settings(location: &VaultLocation) -> Result<Settings> {
    let path = location.settings_path();
    if path.exists() {
        let raw = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        let settings: Settings = serde_yaml::from_str(&raw).context("parsing settings file")?;
        Ok(settings)
    } else {
        let settings = Settings::default();
        save_settings(location, &settings)?;
        Ok(settings)
    }
}

pub fn save_settings(location: &VaultLocation, settings: &Settings) -> Result<()> {
    write_yaml(&location.settings_path(), settings).context("serializing settings")
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_yaml::to_string(value)?;
    fs::write(path, serialized).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}

fn find_project_vault(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        if current.join(STATE_DIR).is_dir() {
            return Some(current.to_path_buf());
        }
        dir = current.parent();
    }
    None
}

fn global_state_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "actgraph").context("locating data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

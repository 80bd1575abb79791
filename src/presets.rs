use crate::config::RunConfig;
use crate::error::SimError;
use crate::settings::{BoundaryLayout, RunMode};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub config: RunConfig,
}

impl Preset {
    pub fn new(name: impl Into<String>, description: impl Into<String>, config: RunConfig) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the tool
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    dir: Option<PathBuf>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    /// Built-in presets plus any user presets in the config directory
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    /// Built-in presets plus user presets stored under `dir`
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("eden-annihilation").join("presets"))
    }

    fn load_user_presets(&mut self) {
        let Some(dir) = &self.dir else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(SimError::from)
                .and_then(|content| Ok(serde_json::from_str::<Preset>(&content)?));
            match parsed {
                Ok(preset) => self.user.push(preset),
                Err(err) => warn!("Skipping preset {}: {err}", path.display()),
            }
        }
    }

    fn preset_path(&self, name: &str) -> Result<PathBuf, SimError> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| SimError::invalid("could not determine config directory"))?;
        let filename: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        Ok(dir.join(format!("{filename}.json")))
    }

    /// Save a preset to disk, replacing any user preset of the same name
    pub fn save_preset(&mut self, preset: Preset) -> Result<PathBuf, SimError> {
        preset.config.validate()?;
        let path = self.preset_path(&preset.name)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&preset)?)?;

        self.user.retain(|p| !p.name.eq_ignore_ascii_case(&preset.name));
        self.user.push(preset);
        Ok(path)
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), SimError> {
        let before = self.user.len();
        self.user.retain(|p| !p.name.eq_ignore_ascii_case(name));
        if self.user.len() == before {
            return Err(SimError::PresetNotFound(name.to_string()));
        }
        let path = self.preset_path(name)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// All presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name; user presets shadow built-ins
    pub fn find(&self, name: &str) -> Result<&Preset, SimError> {
        self.user
            .iter()
            .chain(self.builtin.iter())
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::PresetNotFound(name.to_string()))
    }
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "lattice2d",
            "Snapshot every step of a 32x32 growth with three species",
            RunConfig::default(),
        ),
        Preset::new(
            "mass3d",
            "Filled-cell count of a 24^3 growth with three species",
            RunConfig {
                mode: RunMode::Mass,
                side_length: 24,
                dimensions: 3,
                step_budget: 8192,
                ..Default::default()
            },
        ),
        Preset::new(
            "survival2d",
            "Time of death over 1000 runs on a 128x128 lattice",
            RunConfig {
                mode: RunMode::Survival,
                side_length: 128,
                step_budget: 4096,
                simulation_count: 1000,
                ..Default::default()
            },
        ),
        Preset::new(
            "survival3d",
            "Time of death over 1000 runs on a 16^3 lattice",
            RunConfig {
                mode: RunMode::Survival,
                side_length: 16,
                dimensions: 3,
                step_budget: 1024,
                simulation_count: 1000,
                ..Default::default()
            },
        ),
        Preset::new(
            "periodic2d",
            "Growth on a 64x64 torus",
            RunConfig {
                mode: RunMode::Mass,
                side_length: 64,
                step_budget: 16384,
                boundary: BoundaryLayout::Periodic,
                ..Default::default()
            },
        ),
    ]
}

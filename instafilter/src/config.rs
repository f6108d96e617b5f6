use anyhow::{Context, Result, bail};
use derivative::Derivative;
use image_effect::FilterKind;
use log::{debug, warn};
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Mutex, MutexGuard},
};

static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(skip)]
    pub app_name: String,

    #[serde(default)]
    pub preference: Preference,

    #[serde(default)]
    pub usage: Usage,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Preference {
    #[derivative(Default(value = "FilterKind::default().to_string()"))]
    pub default_filter: String,

    #[derivative(Default(value = "0.5"))]
    pub default_intensity: f32,

    #[derivative(Default(value = "20"))]
    pub review_threshold: u32,
}

/// Counters that survive restarts.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Usage {
    pub filter_count: u32,
}

impl Preference {
    /// Filter a new session starts with, falling back to sepia on unknown names.
    pub fn filter(&self) -> FilterKind {
        FilterKind::from_str(&self.default_filter).unwrap_or_else(|_| {
            warn!("unknown default filter `{}`", self.default_filter);
            FilterKind::default()
        })
    }

    pub fn intensity(&self) -> f32 {
        if self.default_intensity.is_finite() {
            self.default_intensity.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

impl Config {
    /// Resolves the platform config directory and loads the config file from it.
    pub fn init(&mut self) -> Result<()> {
        self.app_name = env!("CARGO_PKG_NAME").to_string();

        let app_dirs = AppDirs::new(Some(&self.app_name), true)
            .with_context(|| "resolve application directories failed")?;
        self.init_in(&app_dirs.config_dir)
    }

    /// Loads `<app_name>.toml` from `config_dir`, creating it when missing.
    pub fn init_in(&mut self, config_dir: &Path) -> Result<()> {
        if self.app_name.is_empty() {
            self.app_name = env!("CARGO_PKG_NAME").to_string();
        }

        fs::create_dir_all(config_dir)?;
        self.config_path = config_dir.join(format!("{}.toml", self.app_name));
        self.load().with_context(|| "load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        let text = match fs::read_to_string(&self.config_path) {
            Ok(text) => text,
            Err(_) => return self.reset(),
        };

        match toml::from_str::<Config>(&text) {
            Ok(mut c) => {
                c.config_path = self.config_path.clone();
                c.is_first_run = self.is_first_run;
                c.app_name = self.app_name.clone();
                *self = c;
                Ok(())
            }
            Err(e) => {
                warn!("parse {} failed: {e}", self.config_path.display());
                self.reset()
            }
        }
    }

    /// Keeps a `.bak` copy of whatever was on disk and writes the defaults.
    fn reset(&mut self) -> Result<()> {
        self.is_first_run = true;

        if self.config_path.exists() {
            let mut bak_file = self.config_path.clone().into_os_string();
            bak_file.push(".bak");
            _ = fs::copy(&self.config_path, bak_file);
        }

        self.save()
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }
}

fn lock() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(|e| e.into_inner())
}

/// Initializes the global configuration from the platform config directory.
///
/// This should be called once at application startup.
pub fn init() -> Result<()> {
    lock().init()
}

/// Initializes the global configuration from an explicit directory.
pub fn init_in(config_dir: &Path) -> Result<()> {
    let mut config = Config::default();
    config.init_in(config_dir)?;
    *lock() = config;
    Ok(())
}

pub fn all() -> Config {
    lock().clone()
}

/// Saves a new configuration and updates the global instance.
pub fn save(conf: Config) -> Result<()> {
    let mut config = lock();
    *config = conf;
    config.save()
}

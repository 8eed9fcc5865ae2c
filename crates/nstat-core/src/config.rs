//! Configuration types for nstat.
//!
//! [`Config::load`] reads `~/.config/nstat/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::diff::PresencePolicy;
use anyhow::bail;
use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ui]
theme                   = "default"
top_n                   = 10
snapshot_pane_width_pct = 25

[compare]
presence = "reported"

[keybindings]
set_baseline = "b"
set_current  = "c"
delete       = "d"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/nstat/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Rows shown in the top-primops / functions / attributes lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_snapshot_pane_width_pct")]
    pub snapshot_pane_width_pct: u16,
}

fn default_theme() -> String { "default".to_string() }
fn default_top_n() -> usize { 10 }
fn default_snapshot_pane_width_pct() -> u16 { 25 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            top_n: default_top_n(),
            snapshot_pane_width_pct: default_snapshot_pane_width_pct(),
        }
    }
}

/// `[compare]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareConfig {
    #[serde(default)]
    pub presence: PresencePolicy,
}

/// `[keybindings]` section of `config.toml`. Each binding is a single key.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_set_baseline")]
    pub set_baseline: String,
    #[serde(default = "default_set_current")]
    pub set_current: String,
    #[serde(default = "default_delete")]
    pub delete: String,
}

fn default_set_baseline() -> String { "b".to_string() }
fn default_set_current() -> String { "c".to_string() }
fn default_delete() -> String { "d".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            set_baseline: default_set_baseline(),
            set_current: default_set_current(),
            delete: default_delete(),
        }
    }
}

/// Keys the viewer binds before user bindings are consulted.
pub const RESERVED_KEYS: &[char] = &['q', 'h', 'j', 'k', 'l', '1', '2', ':', '?'];

impl KeybindingsConfig {
    /// First character of a binding, if it is non-empty.
    pub fn key(binding: &str) -> Option<char> {
        binding.chars().next()
    }

    /// Each binding must be one key, distinct, and not in [`RESERVED_KEYS`].
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = Vec::new();
        for (name, binding) in [
            ("set_baseline", &self.set_baseline),
            ("set_current", &self.set_current),
            ("delete", &self.delete),
        ] {
            let mut chars = binding.chars();
            let (Some(key), None) = (chars.next(), chars.next()) else {
                bail!("keybindings.{name} must be a single key, got {binding:?}");
            };
            if RESERVED_KEYS.contains(&key) {
                bail!("keybindings.{name} = {key:?} is reserved by the viewer");
            }
            if seen.contains(&key) {
                bail!("keybindings.{name} = {key:?} is already bound");
            }
            seen.push(key);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/nstat/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(config::File::from(path.as_path()).required(false))
    }

    /// Built-in defaults with one extra TOML document layered on top.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        Self::layered(config::File::from_str(src, config::FileFormat::Toml))
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn layered<S>(source: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(source)
            .build()?
            .try_deserialize()?;
        cfg.keybindings.validate()?;
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("nstat")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

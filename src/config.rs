use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Timing and geometry settings for the sync core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    /// Delay before source edits replace the rendered document
    pub debounce_ms: u64,
    /// How long a mirrored scroll blocks the other pane's echo
    pub lock_ms: u64,
    /// Ease the passive pane to its exact target once scrolling settles
    pub smooth_snap: bool,
    /// Idle time before the settle ease starts
    pub snap_idle_ms: u64,
    /// Lock window held while the settle ease runs
    pub snap_lock_ms: u64,
    /// Duration of the settle ease
    pub snap_duration_ms: u64,
    /// Source pane line height in pixels
    pub line_height: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            lock_ms: 250,
            smooth_snap: false,
            snap_idle_ms: 120,
            snap_lock_ms: 360,
            snap_duration_ms: 180,
            line_height: 20.0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    pub smooth_snap: bool,
    pub watch: bool,
    pub debounce_ms: Option<u64>,
    pub lock_ms: Option<u64>,
    pub snap_idle_ms: Option<u64>,
    pub snap_duration_ms: Option<u64>,
    pub line_height: Option<f64>,
}

impl ConfigFlags {
    /// Merge two flag sets; `other` wins for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            smooth_snap: self.smooth_snap || other.smooth_snap,
            watch: self.watch || other.watch,
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            lock_ms: other.lock_ms.or(self.lock_ms),
            snap_idle_ms: other.snap_idle_ms.or(self.snap_idle_ms),
            snap_duration_ms: other.snap_duration_ms.or(self.snap_duration_ms),
            line_height: other.line_height.or(self.line_height),
        }
    }

    /// Resolve into a [`SyncConfig`], filling unset options with defaults.
    pub fn to_sync_config(&self) -> SyncConfig {
        let defaults = SyncConfig::default();
        SyncConfig {
            debounce_ms: self.debounce_ms.unwrap_or(defaults.debounce_ms),
            lock_ms: self.lock_ms.unwrap_or(defaults.lock_ms),
            smooth_snap: self.smooth_snap,
            snap_idle_ms: self.snap_idle_ms.unwrap_or(defaults.snap_idle_ms),
            snap_lock_ms: defaults.snap_lock_ms,
            snap_duration_ms: self.snap_duration_ms.unwrap_or(defaults.snap_duration_ms),
            line_height: self
                .line_height
                .filter(|h| h.is_finite() && *h > 0.0)
                .unwrap_or(defaults.line_height),
        }
    }
}

/// Directory name under the platform config root.
pub const APP_NAME: &str = "panesync";
/// File holding the saved defaults inside [`APP_NAME`]'s directory.
const GLOBAL_FILE: &str = "config";
/// Per-directory override, also the fallback when no config root exists.
const LOCAL_FILE: &str = ".panesyncrc";

/// Platform config root: `%APPDATA%`, `~/Library/Application Support`,
/// or `$XDG_CONFIG_HOME` falling back to `~/.config`.
fn config_root() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
    }
}

/// Where `--save` writes and startup reads the user's defaults.
pub fn global_config_path() -> PathBuf {
    config_root().map_or_else(local_override_path, |root| {
        root.join(APP_NAME).join(GLOBAL_FILE)
    })
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Read flag tokens from `path`; a missing file yields no flags.
///
/// Blank lines and `#` comments are skipped.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ConfigFlags::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read config {}", path.display()));
        }
    };
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec![format!("# {APP_NAME} defaults (saved with --save)")];
    if flags.smooth_snap {
        lines.push("--smooth-snap".to_string());
    }
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if let Some(ms) = flags.lock_ms {
        lines.push(format!("--lock-ms {ms}"));
    }
    if let Some(ms) = flags.snap_idle_ms {
        lines.push(format!("--snap-idle-ms {ms}"));
    }
    if let Some(ms) = flags.snap_duration_ms {
        lines.push(format!("--snap-duration-ms {ms}"));
    }
    if let Some(px) = flags.line_height {
        lines.push(format!("--line-height {px}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved defaults; clearing an absent file succeeds.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => {
            Err(err).with_context(|| format!("Failed to remove {}", path.display()))
        }
        _ => Ok(()),
    }
}

/// Extract known flags from raw argument or config-file tokens.
///
/// Unknown tokens and unparsable values are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        match name {
            "--smooth-snap" => flags.smooth_snap = true,
            "--watch" => flags.watch = true,
            "--debounce-ms" | "--lock-ms" | "--snap-idle-ms" | "--snap-duration-ms"
            | "--line-height" => {
                let value = match inline_value {
                    Some(v) => Some(v),
                    None => {
                        i += 1;
                        tokens.get(i).map(String::as_str)
                    }
                };
                if let Some(value) = value {
                    apply_valued_flag(&mut flags, name, value);
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--debounce-ms" => flags.debounce_ms = value.parse().ok(),
        "--lock-ms" => flags.lock_ms = value.parse().ok(),
        "--snap-idle-ms" => flags.snap_idle_ms = value.parse().ok(),
        "--snap-duration-ms" => flags.snap_duration_ms = value.parse().ok(),
        "--line-height" => flags.line_height = value.parse().ok(),
        _ => {}
    }
}

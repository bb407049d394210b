//! Configuration layers and where their files live
//!
//! Settings are layered lowest precedence first: built-in defaults, the
//! user file under `$XDG_CONFIG_HOME/beacon`, the project file under
//! `.beacon/` (or `BEACON_PROJECT_CONFIG_DIR`), then `BEACON_*` variables.

use std::fmt;
use std::path::PathBuf;

const APP_DIR: &str = "beacon";
const CONFIG_FILE: &str = "config.toml";
const ASSIGNMENTS_FILE: &str = "assignments.json";

/// A source of configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Default,
    User,
    Project,
    Env,
}

impl Layer {
    /// File backing this layer, for the file-based layers.
    pub fn file(self) -> Option<PathBuf> {
        match self {
            Layer::User => Some(xdg_home("XDG_CONFIG_HOME", ".config").join(APP_DIR).join(CONFIG_FILE)),
            Layer::Project => Some(project_dir().join(CONFIG_FILE)),
            Layer::Default | Layer::Env => None,
        }
    }

    /// The file-based layers in merge order.
    pub fn files() -> Vec<(Layer, PathBuf)> {
        [Layer::User, Layer::Project]
            .into_iter()
            .filter_map(|layer| layer.file().map(|path| (layer, path)))
            .collect()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Layer::Default => "default",
            Layer::User => "user",
            Layer::Project => "project",
            Layer::Env => "env",
        };
        f.pad(label)
    }
}

/// Where assignments are kept when no `store_path` is configured.
pub fn default_assignments_path() -> PathBuf {
    xdg_home("XDG_DATA_HOME", ".local/share")
        .join(APP_DIR)
        .join(ASSIGNMENTS_FILE)
}

fn project_dir() -> PathBuf {
    match std::env::var_os("BEACON_PROJECT_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(".beacon"),
    }
}

/// `$var` when set, else `fallback` under the home directory.
fn xdg_home(var: &str, fallback: &str) -> PathBuf {
    match std::env::var_os(var) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir().unwrap_or_default().join(fallback),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_layers_follow_xdg_and_project_env() {
        // SAFETY: serialized with the other env-reading tests
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/beacon-xdg/config");
            std::env::set_var("XDG_DATA_HOME", "/tmp/beacon-xdg/data");
            std::env::set_var("BEACON_PROJECT_CONFIG_DIR", "/tmp/beacon-project");
        }
        let files = Layer::files();
        let assignments = default_assignments_path();
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
            std::env::remove_var("XDG_DATA_HOME");
            std::env::remove_var("BEACON_PROJECT_CONFIG_DIR");
        }

        assert_eq!(
            files,
            vec![
                (Layer::User, PathBuf::from("/tmp/beacon-xdg/config/beacon/config.toml")),
                (Layer::Project, PathBuf::from("/tmp/beacon-project/config.toml")),
            ]
        );
        assert_eq!(
            assignments,
            PathBuf::from("/tmp/beacon-xdg/data/beacon/assignments.json")
        );
    }

    #[test]
    #[serial]
    fn test_project_layer_defaults_to_dot_beacon() {
        unsafe { std::env::remove_var("BEACON_PROJECT_CONFIG_DIR") };

        assert_eq!(
            Layer::Project.file(),
            Some(PathBuf::from(".beacon/config.toml"))
        );
        assert_eq!(Layer::Env.file(), None);
        assert_eq!(Layer::Env.to_string(), "env");
    }
}

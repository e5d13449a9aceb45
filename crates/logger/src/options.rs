use level::{LevelValue, LogLevels};
use tokio::runtime::Handle;
use tracing::warn;

const ENV_GLOBAL_LEVEL: &str = "LOGGER_GLOBAL_LEVEL";
const ENV_CONSOLE: &str = "LOGGER_CONSOLE";
const ENV_GROUPS_START_ENABLED: &str = "LOGGER_GROUPS_START_ENABLED";

/// A group to create when the logger is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOptions {
    pub id: String,
    pub level: u64,
}

impl GroupOptions {
    pub fn new(id: impl Into<String>, level: u64) -> Self {
        Self { id: id.into(), level }
    }
}

/// Logger construction options.
///
/// | field                  | default                        |
/// |------------------------|--------------------------------|
/// | `id`                   | generated                      |
/// | `console_enabled`      | `false`                        |
/// | `global_level`         | `ERROR \| WARN \| INFO`        |
/// | `groups_start_enabled` | `true`                         |
/// | `starting_groups`      | none                           |
/// | `runtime`              | the ambient tokio runtime      |
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub id: Option<String>,
    /// Attaches the console transport to the `global` group.
    pub console_enabled: bool,
    pub global_level: u64,
    /// Whether lazily or explicitly created groups start enabled.
    pub groups_start_enabled: bool,
    pub starting_groups: Vec<GroupOptions>,
    /// Runtime that dispatch tasks are spawned on.
    pub runtime: Option<Handle>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            id: None,
            console_enabled: false,
            global_level: LogLevels::DEFAULT,
            groups_start_enabled: true,
            starting_groups: Vec::new(),
            runtime: None,
        }
    }
}

impl LoggerOptions {
    /// Defaults overridden by `LOGGER_GLOBAL_LEVEL`, `LOGGER_CONSOLE` and
    /// `LOGGER_GROUPS_START_ENABLED`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(raw) = lookup(ENV_GLOBAL_LEVEL) {
            match LogLevels::parse(&raw) {
                Ok(mask) => options.global_level = mask,
                Err(err) => {
                    warn!(variable = ENV_GLOBAL_LEVEL, value = %raw, error = %err, "ignoring invalid level")
                }
            }
        }
        if let Some(enabled) = lookup(ENV_CONSOLE).and_then(|raw| parse_flag(ENV_CONSOLE, &raw)) {
            options.console_enabled = enabled;
        }
        let groups_start_enabled = lookup(ENV_GROUPS_START_ENABLED)
            .and_then(|raw| parse_flag(ENV_GROUPS_START_ENABLED, &raw));
        if let Some(enabled) = groups_start_enabled {
            options.groups_start_enabled = enabled;
        }

        options
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    /// Sets the global level. An invalid value leaves the current one.
    pub fn with_global_level(mut self, level: impl LevelValue) -> Self {
        if let Some(mask) = level.to_mask() {
            self.global_level = mask;
        }
        self
    }

    pub fn with_groups_start_enabled(mut self, enabled: bool) -> Self {
        self.groups_start_enabled = enabled;
        self
    }

    pub fn with_starting_group(mut self, id: impl Into<String>, level: u64) -> Self {
        self.starting_groups.push(GroupOptions::new(id, level));
        self
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

fn parse_flag(variable: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(variable, value = %raw, "ignoring invalid boolean");
            None
        }
    }
}

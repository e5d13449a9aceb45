use std::{
    collections::{HashMap, hash_map::Entry},
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use futures_util::future::{self, BoxFuture, FutureExt};
use level::{Level, LevelValue, LogLevels, mask_or_zero};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use transport::{Message, Transport};

use crate::{
    DispatchReport, LoggerOptions,
    group::{DEFAULT_GROUP_LEVEL, Group},
};

/// Group receiving messages that name no group, or an unknown one.
pub const ALL_GROUP: &str = "all";
/// Group receiving every message regardless of its target.
pub const GLOBAL_GROUP: &str = "global";

static NEXT_LOGGER: AtomicU64 = AtomicU64::new(0);

/// The logging facade.
///
/// Owns a registry of [`Group`]s, always containing `all` and `global`, and a
/// global level that is ORed into every group's filter. Each logging call
/// builds one [`Message`] and dispatches it to the target group (or `all`)
/// and, independently, to `global`.
///
/// Mutators take `&mut self`; callers sharing a logger across threads provide
/// their own locking.
#[derive(Debug)]
pub struct Logger {
    id: String,
    global_level: Level,
    groups: HashMap<String, Group>,
    group_keys: Vec<String>,
    groups_start_enabled: bool,
    runtime: Option<Handle>,
    tasks: TaskTracker,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerOptions::default())
    }
}

impl Logger {
    pub fn new(options: LoggerOptions) -> Self {
        let id = options.id.filter(|id| !id.is_empty()).unwrap_or_else(generate_id);
        let mut logger = Self {
            id,
            global_level: Level::with_fallback(options.global_level, LogLevels::DEFAULT),
            groups: HashMap::new(),
            group_keys: Vec::new(),
            groups_start_enabled: options.groups_start_enabled,
            runtime: options.runtime,
            tasks: TaskTracker::new(),
        };
        logger.seed_builtin_groups();

        if options.console_enabled {
            logger.add_global_transport(Arc::new(transport::console(LogLevels::NONE)));
        }
        for group in options.starting_groups {
            if !logger.make_group(&group.id, group.level) {
                debug!(logger = %logger.id, group = %group.id, "skipping starting group");
            }
        }

        debug!(logger = %logger.id, global_level = logger.global_level(), "logger created");
        logger
    }

    fn seed_builtin_groups(&mut self) {
        for id in [ALL_GROUP, GLOBAL_GROUP] {
            self.groups.insert(id.to_owned(), Group::new(id, DEFAULT_GROUP_LEVEL, true));
            self.group_keys.push(id.to_owned());
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Builds a message from `parts` joined by single spaces.
    pub fn create_message<I>(timestamp: impl Into<String>, level: u64, parts: I) -> Message
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Message::create(timestamp, level, parts)
    }

    // -------------------------------------------------------------------------
    // Global level
    // -------------------------------------------------------------------------

    pub fn global_level(&self) -> u64 {
        self.global_level.get()
    }

    pub fn set_global_level(&mut self, level: impl LevelValue) -> bool {
        self.global_level.set(level)
    }

    pub fn enable_global_level(&mut self, bit: impl LevelValue) -> bool {
        self.global_level.enable(bit)
    }

    pub fn enable_global_levels<I>(&mut self, bits: I) -> usize
    where
        I: IntoIterator,
        I::Item: LevelValue,
    {
        self.global_level.enable_multiple(bits)
    }

    pub fn disable_global_level(&mut self, bit: impl LevelValue) -> bool {
        self.global_level.disable(bit)
    }

    pub fn disable_global_levels<I>(&mut self, bits: I) -> usize
    where
        I: IntoIterator,
        I::Item: LevelValue,
    {
        self.global_level.disable_multiple(bits)
    }

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    /// Returns the group named `id`, creating it with [`DEFAULT_GROUP_LEVEL`]
    /// if it does not exist yet.
    pub fn get_group(&mut self, id: &str) -> &mut Group {
        match self.groups.entry(id.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.group_keys.push(id.to_owned());
                entry.insert(Group::new(id, DEFAULT_GROUP_LEVEL, self.groups_start_enabled))
            }
        }
    }

    /// Creates the group `id`. Returns `false` if `id` is empty or the group
    /// already exists.
    pub fn make_group(&mut self, id: &str, level: impl LevelValue) -> bool {
        if id.is_empty() || self.groups.contains_key(id) {
            return false;
        }
        self.groups.insert(id.to_owned(), Group::new(id, level, self.groups_start_enabled));
        self.group_keys.push(id.to_owned());
        true
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.get_mut(id)
    }

    pub fn has_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Known group ids in creation order.
    pub fn group_keys(&self) -> &[String] {
        &self.group_keys
    }

    pub fn set_group_level(&mut self, id: &str, level: impl LevelValue) -> bool {
        self.groups.get_mut(id).is_some_and(|group| group.set_log_level(level))
    }

    pub fn enable_group(&mut self, id: &str) -> bool {
        self.groups.get_mut(id).map(Group::enable).is_some()
    }

    pub fn disable_group(&mut self, id: &str) -> bool {
        self.groups.get_mut(id).map(Group::disable).is_some()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Logs `parts` at `level` to `group_id` (or `all` when it is `None` or
    /// unknown) and to `global`. A `level` outside the valid range is treated
    /// as `NONE` and fires nothing.
    ///
    /// The two dispatches are spawned as independent tasks on the logger's
    /// runtime; this call does not wait for them. See [`Logger::flush`].
    /// Without a runtime, each dispatch is polled once in place: transports
    /// that settle immediately still deliver and the rest are dropped.
    pub fn log<I>(&self, group_id: Option<&str>, level: u64, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let (target, global) = self.route(group_id, build_message(level, parts));
        match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => {
                self.tasks.spawn_on(target, &handle);
                self.tasks.spawn_on(global, &handle);
            }
            None => {
                // Synchronous transports settle on the first poll.
                for pending in [target, global] {
                    if pending.now_or_never().is_none() {
                        warn!(
                            logger = %self.id,
                            "no tokio runtime available, dropping pending transports"
                        );
                    }
                }
            }
        }
        self
    }

    /// Same routing as [`Logger::log`], but returns a future resolving once
    /// both dispatches have settled.
    pub fn dispatch<I>(
        &self,
        group_id: Option<&str>,
        level: u64,
        parts: I,
    ) -> BoxFuture<'static, DispatchReport>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let (target, global) = self.route(group_id, build_message(level, parts));
        future::join(target, global).map(|(target, global)| target.merge(global)).boxed()
    }

    /// Waits for every dispatch spawned by [`Logger::log`] so far.
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn route(
        &self,
        group_id: Option<&str>,
        message: Message,
    ) -> (BoxFuture<'static, DispatchReport>, BoxFuture<'static, DispatchReport>) {
        let message = Arc::new(message);
        let global_level = self.global_level.get();
        let target = group_id
            .and_then(|id| self.groups.get(id))
            .or_else(|| self.groups.get(ALL_GROUP));

        let dispatch = |group: Option<&Group>| match group {
            Some(group) => group.log(global_level, Arc::clone(&message)),
            None => future::ready(DispatchReport::default()).boxed(),
        };
        (dispatch(target), dispatch(self.groups.get(GLOBAL_GROUP)))
    }

    pub fn error<I>(&self, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(None, LogLevels::ERROR, parts)
    }

    pub fn warn<I>(&self, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(None, LogLevels::WARN, parts)
    }

    pub fn info<I>(&self, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(None, LogLevels::INFO, parts)
    }

    pub fn debug<I>(&self, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(None, LogLevels::DEBUG, parts)
    }

    pub fn trace<I>(&self, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(None, LogLevels::TRACE, parts)
    }

    pub fn error_group<I>(&self, group_id: &str, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(Some(group_id), LogLevels::ERROR, parts)
    }

    pub fn warn_group<I>(&self, group_id: &str, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(Some(group_id), LogLevels::WARN, parts)
    }

    pub fn info_group<I>(&self, group_id: &str, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(Some(group_id), LogLevels::INFO, parts)
    }

    pub fn debug_group<I>(&self, group_id: &str, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(Some(group_id), LogLevels::DEBUG, parts)
    }

    pub fn trace_group<I>(&self, group_id: &str, parts: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.log(Some(group_id), LogLevels::TRACE, parts)
    }

    // -------------------------------------------------------------------------
    // Transports
    // -------------------------------------------------------------------------

    /// Adds `transport` to the `all` group.
    pub fn add_transport(&mut self, transport: Arc<Transport>) -> bool {
        self.add_group_transport(None, transport)
    }

    /// Adds `transport` to the `global` group.
    pub fn add_global_transport(&mut self, transport: Arc<Transport>) -> bool {
        self.add_group_transport(Some(GLOBAL_GROUP), transport)
    }

    /// Adds `transport` to `group_id`, creating the group if needed, or to
    /// `all` when `group_id` is `None`. An empty `group_id` is rejected.
    pub fn add_group_transport(
        &mut self,
        group_id: Option<&str>,
        transport: Arc<Transport>,
    ) -> bool {
        if group_id.is_some_and(str::is_empty) {
            debug!(logger = %self.id, transport = %transport.id(), "rejected empty group id");
            return false;
        }
        self.get_group(group_id.unwrap_or(ALL_GROUP)).add_transport(transport)
    }

    /// Removes `transport` from the `all` group.
    pub fn remove_transport(&mut self, transport: &Arc<Transport>) -> bool {
        self.remove_group_transport(None, transport)
    }

    /// Removes `transport` from the `global` group.
    pub fn remove_global_transport(&mut self, transport: &Arc<Transport>) -> bool {
        self.remove_group_transport(Some(GLOBAL_GROUP), transport)
    }

    /// Removes `transport` from `group_id` (or `all`). Unknown groups are not
    /// created.
    pub fn remove_group_transport(
        &mut self,
        group_id: Option<&str>,
        transport: &Arc<Transport>,
    ) -> bool {
        self.groups
            .get_mut(group_id.unwrap_or(ALL_GROUP))
            .is_some_and(|group| group.remove_transport(transport))
    }

    /// Removes every transport with `transport_id` from `group_id` (or `all`).
    pub fn remove_group_transport_by_id(
        &mut self,
        group_id: Option<&str>,
        transport_id: &str,
    ) -> bool {
        self.groups
            .get_mut(group_id.unwrap_or(ALL_GROUP))
            .is_some_and(|group| group.remove_transport_by_id(transport_id))
    }

    /// Removes every transport with `transport_id` from every known group.
    ///
    /// Walks all groups and all of their members; meant for cleanup paths.
    pub fn remove_transport_everywhere(&mut self, transport_id: &str) -> bool {
        let mut removed = false;
        for key in &self.group_keys {
            if let Some(group) = self.groups.get_mut(key) {
                removed |= group.remove_transport_by_id(transport_id);
            }
        }
        removed
    }

    /// Empties every group, then forgets all groups except `all` and
    /// `global`.
    pub fn clear_all(&mut self) {
        for group in self.groups.values_mut() {
            group.clear();
        }
        self.groups.retain(|id, _| id == ALL_GROUP || id == GLOBAL_GROUP);
        self.group_keys = vec![ALL_GROUP.to_owned(), GLOBAL_GROUP.to_owned()];
        debug!(logger = %self.id, "cleared all groups");
    }
}

fn build_message<I>(level: u64, parts: I) -> Message
where
    I: IntoIterator,
    I::Item: Display,
{
    Message::now(mask_or_zero(level), parts)
}

fn generate_id() -> String {
    let sequence = NEXT_LOGGER.fetch_add(1, Ordering::Relaxed);
    format!("logger-{:x}-{sequence}", chrono::Utc::now().timestamp_millis())
}

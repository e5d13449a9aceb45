use std::{collections::HashSet, sync::Arc};

use futures_util::future::{BoxFuture, FutureExt};
use level::{Level, LevelValue, LogLevels, mask_or_zero};
use tracing::{debug, error};
use transport::{Message, Transport};

use crate::DispatchReport;

/// Level a group gets when none (or an invalid one) is supplied.
pub const DEFAULT_GROUP_LEVEL: u64 = LogLevels::NONE | LogLevels::ERROR;

/// Identity of a shared transport, derived from its `Arc` allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TransportKey(usize);

impl TransportKey {
    fn of(transport: &Arc<Transport>) -> Self {
        Self(Arc::as_ptr(transport) as usize)
    }
}

/// A named routing bucket of transports sharing one level mask and one
/// enabled flag.
///
/// `transports` keeps insertion order, which is also execution order.
/// `added` mirrors it for constant-time duplicate detection; the two are only
/// ever mutated together.
#[derive(Debug)]
pub struct Group {
    id: String,
    log_level: Level,
    enabled: bool,
    transports: Vec<Arc<Transport>>,
    added: HashSet<TransportKey>,
}

impl Group {
    /// Creates an empty group. An invalid `level` falls back to
    /// [`DEFAULT_GROUP_LEVEL`].
    pub fn new(id: impl Into<String>, level: impl LevelValue, enabled: bool) -> Self {
        Self {
            id: id.into(),
            log_level: Level::with_fallback(level, DEFAULT_GROUP_LEVEL),
            enabled,
            transports: Vec::new(),
            added: HashSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn log_level(&self) -> u64 {
        self.log_level.get()
    }

    /// Replaces the group mask; invalid input is ignored.
    pub fn set_log_level(&mut self, level: impl LevelValue) -> bool {
        let applied = self.log_level.set(level);
        if !applied {
            debug!(group = %self.id, "rejected invalid group level");
        }
        applied
    }

    pub fn enable_level(&mut self, bit: impl LevelValue) -> bool {
        self.log_level.enable(bit)
    }

    pub fn disable_level(&mut self, bit: impl LevelValue) -> bool {
        self.log_level.disable(bit)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Members in execution order.
    pub fn transports(&self) -> &[Arc<Transport>] {
        &self.transports
    }

    pub fn len(&self) -> usize {
        self.transports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Returns whether this exact transport instance is a member.
    pub fn contains(&self, transport: &Arc<Transport>) -> bool {
        self.added.contains(&TransportKey::of(transport))
    }

    /// Decides whether `transport` fires for a message of `msg_level`.
    ///
    /// The active mask is the union of the global, group and transport masks,
    /// each counting as zero when invalid. The transport fires when that
    /// union shares at least one bit with `msg_level`, so any single
    /// permissive layer is enough.
    pub fn can_execute(
        &self,
        transport: &Transport,
        global_level: impl LevelValue,
        msg_level: u64,
    ) -> bool {
        if !self.enabled || msg_level == LogLevels::NONE {
            return false;
        }
        let active = mask_or_zero(global_level)
            | mask_or_zero(&self.log_level)
            | mask_or_zero(transport.levels());
        active & msg_level != 0
    }

    /// Appends `transport` unless this instance is already a member.
    pub fn add_transport(&mut self, transport: Arc<Transport>) -> bool {
        if !self.added.insert(TransportKey::of(&transport)) {
            debug!(group = %self.id, transport = %transport.id(), "transport already in group");
            return false;
        }
        self.transports.push(transport);
        true
    }

    /// Removes `transport` by identity. Returns `false` if it was not a member.
    pub fn remove_transport(&mut self, transport: &Arc<Transport>) -> bool {
        if !self.added.remove(&TransportKey::of(transport)) {
            return false;
        }
        self.transports.retain(|member| !Arc::ptr_eq(member, transport));
        true
    }

    /// Removes every listed transport. Returns whether at least one was a
    /// member.
    pub fn remove_transports<'a, I>(&mut self, transports: I) -> bool
    where
        I: IntoIterator<Item = &'a Arc<Transport>>,
    {
        transports
            .into_iter()
            .fold(false, |removed, transport| self.remove_transport(transport) || removed)
    }

    /// Removes every member whose id equals `transport_id`.
    pub fn remove_transport_by_id(&mut self, transport_id: &str) -> bool {
        let before = self.transports.len();
        let added = &mut self.added;
        self.transports.retain(|member| {
            if member.id() == transport_id {
                added.remove(&TransportKey::of(member));
                false
            } else {
                true
            }
        });
        self.transports.len() != before
    }

    /// Drops every member.
    pub fn clear(&mut self) {
        self.transports.clear();
        self.added.clear();
    }

    /// Dispatches `message` to every qualifying member.
    ///
    /// Membership and masks are captured when this is called; the returned
    /// future then runs the qualifying transports one after another in
    /// insertion order. A failing transport is reported and skipped over,
    /// never propagated.
    pub fn log(
        &self,
        global_level: impl LevelValue,
        message: Arc<Message>,
    ) -> BoxFuture<'static, DispatchReport> {
        let considered = self.transports.len();
        if !self.enabled || message.level() == LogLevels::NONE {
            return futures_util::future::ready(DispatchReport { considered, ..Default::default() })
                .boxed();
        }

        let global_level = mask_or_zero(global_level);
        let qualifying: Vec<Arc<Transport>> = self
            .transports
            .iter()
            .filter(|transport| self.can_execute(transport, global_level, message.level()))
            .cloned()
            .collect();
        let group = self.id.clone();

        async move {
            let mut report = DispatchReport { considered, ..Default::default() };
            for transport in qualifying {
                report.executed += 1;
                match transport.execute(Arc::clone(&message)).await {
                    Ok(true) => report.delivered += 1,
                    Ok(false) => {}
                    Err(err) => {
                        report.failed += 1;
                        error!(
                            group = %group,
                            transport = %transport.id(),
                            error = %err,
                            "transport execution failed"
                        );
                    }
                }
            }
            report
        }
        .boxed()
    }
}

//! Index types for the widget table.
//!
//! Both indices are plain newtypes over `usize` that serve as direct indices
//! into the store's sub-tables. They carry no validity on their own: a value
//! that was valid before a reconfiguration may be out of range afterwards,
//! so every consumer re-validates against the current table.

use std::fmt;

/// Position of a widget across all registered widgets, in role order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GlobalIndex(pub usize);

impl GlobalIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for GlobalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalIndex({})", self.0)
    }
}

impl fmt::Display for GlobalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of a widget inside its own role's sub-table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RelativeIndex(pub usize);

impl RelativeIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// True when this index addresses an entry of a sub-table of `count` entries.
    #[inline]
    pub fn is_within(self, count: usize) -> bool {
        self.0 < count
    }
}

impl fmt::Debug for RelativeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelativeIndex({})", self.0)
    }
}

impl fmt::Display for RelativeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identifier handed out by the notification hub for one subscription.
///
/// Never reused within a hub, so a stale id can't alias a newer subscriber.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

/// Identifier of a host registered with the dashboard.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HostId(pub u32);

impl HostId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

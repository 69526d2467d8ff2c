//! The watch/subscription table
//!
//! Maps watch-keys (exact paths or `prefix*` patterns) to bounded delivery
//! queues, and reference-counts transport-level matches per
//! (interface, signal) pair so that a match shared by several subscribers is
//! only added on the first and removed on the last. The table only does
//! bookkeeping under its locks; the transport round trips happen in the
//! client, outside any lock.

use std::collections::HashMap;
use std::fmt;

use bluekit_bus::{ObjectPath, SignalKind};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::event::ChangeEvent;

/// Number of slash components in an adapter-level path such as
/// `/org/bluez/hci0`. Object-manager added/removed signals are broadcast to
/// watchers registered at this level because discovered children surface
/// under their parent adapter.
pub(crate) const ADAPTER_PATH_COMPONENTS: usize = 4;

/// What a subscriber asked to watch: an exact path or a path prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WatchKey {
    Exact(ObjectPath),
    Prefix(String),
}

impl WatchKey {
    /// Parse a raw key; a trailing `*` marks a prefix pattern
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix('*') {
            Some(prefix) => WatchKey::Prefix(prefix.to_string()),
            None => WatchKey::Exact(ObjectPath::from(raw)),
        }
    }

    /// Whether this key matches a concrete event path
    pub fn matches(&self, path: &ObjectPath) -> bool {
        match self {
            WatchKey::Exact(exact) => exact == path,
            WatchKey::Prefix(prefix) => path.has_prefix(prefix),
        }
    }

    /// Component count of the watched path or prefix
    pub fn component_count(&self) -> usize {
        match self {
            WatchKey::Exact(path) => path.component_count(),
            WatchKey::Prefix(prefix) => prefix.trim_end_matches('/').split('/').count(),
        }
    }
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchKey::Exact(path) => f.write_str(path.as_str()),
            WatchKey::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

struct WatchEntry {
    tx: mpsc::Sender<ChangeEvent>,
    kinds: Vec<SignalKind>,
}

/// Subscription table with per-signal-kind match reference counts
pub struct WatchTable {
    entries: RwLock<HashMap<WatchKey, WatchEntry>>,
    match_refs: RwLock<HashMap<SignalKind, usize>>,
}

impl WatchTable {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            match_refs: RwLock::new(HashMap::new()),
        }
    }

    pub fn contains(&self, key: &WatchKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Store a delivery queue for `key`; at most one queue per exact key.
    ///
    /// On conflict the sender is handed back so the caller can roll back.
    pub fn insert(
        &self,
        key: WatchKey,
        tx: mpsc::Sender<ChangeEvent>,
        kinds: Vec<SignalKind>,
    ) -> std::result::Result<(), mpsc::Sender<ChangeEvent>> {
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return Err(tx);
        }
        entries.insert(key, WatchEntry { tx, kinds });
        Ok(())
    }

    /// Drop the entry for `key`, closing its queue, and return the signal
    /// kinds it was registered for
    pub fn remove(&self, key: &WatchKey) -> Option<Vec<SignalKind>> {
        self.entries.write().remove(key).map(|entry| entry.kinds)
    }

    /// Bump the reference count for each kind; returns the kinds that went
    /// from zero to one and therefore need a transport-level AddMatch
    pub fn acquire_matches(&self, kinds: &[SignalKind]) -> Vec<SignalKind> {
        let mut refs = self.match_refs.write();
        let mut newly_active = Vec::new();
        for kind in kinds {
            let count = refs.entry(kind.clone()).or_insert(0);
            if *count == 0 {
                newly_active.push(kind.clone());
            }
            *count += 1;
        }
        newly_active
    }

    /// Drop one reference for each kind; returns the kinds that reached zero
    /// and therefore need a transport-level RemoveMatch
    pub fn release_matches(&self, kinds: &[SignalKind]) -> Vec<SignalKind> {
        let mut refs = self.match_refs.write();
        let mut drained = Vec::new();
        for kind in kinds {
            match refs.get_mut(kind) {
                Some(count) => {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        refs.remove(kind);
                        drained.push(kind.clone());
                    }
                }
                None => {
                    tracing::warn!(%kind.interface, %kind.signal, "released a match with no references");
                }
            }
        }
        drained
    }

    /// Current reference count for one signal kind
    pub fn match_count(&self, kind: &SignalKind) -> usize {
        self.match_refs.read().get(kind).copied().unwrap_or(0)
    }

    /// Number of active subscriptions
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Queues that should receive an event for `path` carrying `member`.
    ///
    /// A subscription qualifies when the member matches one of its signal
    /// kinds and either its key matches the path, or the signal is an
    /// object-manager added/removed (`broadened`) and the key sits at the
    /// adapter level - discovery watchers register on the adapter but the
    /// children appear below it.
    pub fn deliveries_for(
        &self,
        path: &ObjectPath,
        member: &str,
        broadened: bool,
    ) -> Vec<mpsc::Sender<ChangeEvent>> {
        let entries = self.entries.read();
        entries
            .iter()
            .filter(|(key, entry)| {
                let kind_match = entry.kinds.iter().any(|kind| kind.member() == member);
                if !kind_match {
                    return false;
                }
                key.matches(path)
                    || (broadened && key.component_count() == ADAPTER_PATH_COMPONENTS)
            })
            .map(|(_, entry)| entry.tx.clone())
            .collect()
    }
}

impl Default for WatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added() -> SignalKind {
        SignalKind::interfaces_added()
    }

    fn props_changed() -> SignalKind {
        SignalKind::properties_changed()
    }

    fn entry(table: &WatchTable, key: &str, kinds: Vec<SignalKind>) -> mpsc::Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel(4);
        table.insert(WatchKey::parse(key), tx, kinds).ok().unwrap();
        rx
    }

    #[test]
    fn test_watch_key_parse() {
        assert_eq!(
            WatchKey::parse("/org/bluez/hci0"),
            WatchKey::Exact(ObjectPath::from("/org/bluez/hci0"))
        );
        assert_eq!(
            WatchKey::parse("/org/bluez/hci0*"),
            WatchKey::Prefix("/org/bluez/hci0".to_string())
        );
    }

    #[test]
    fn test_watch_key_matching() {
        let device = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");

        assert!(WatchKey::parse("/org/bluez/hci0*").matches(&device));
        assert!(WatchKey::parse("/org/bluez/hci0/dev_11_22_33_44_55_66").matches(&device));
        assert!(!WatchKey::parse("/org/bluez/hci0").matches(&device));
        assert!(!WatchKey::parse("/org/bluez/hci1*").matches(&device));
    }

    #[test]
    fn test_insert_rejects_duplicate_key() {
        let table = WatchTable::new();
        let _rx = entry(&table, "/org/bluez/hci0", vec![added()]);

        let (tx, _rx2) = mpsc::channel(4);
        assert!(table
            .insert(WatchKey::parse("/org/bluez/hci0"), tx, vec![added()])
            .is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_match_reference_counting() {
        let table = WatchTable::new();
        let kinds = vec![added()];

        assert_eq!(table.acquire_matches(&kinds), kinds);
        assert!(table.acquire_matches(&kinds).is_empty());
        assert_eq!(table.match_count(&added()), 2);

        assert!(table.release_matches(&kinds).is_empty());
        assert_eq!(table.release_matches(&kinds), kinds);
        assert_eq!(table.match_count(&added()), 0);
    }

    #[test]
    fn test_release_without_references() {
        let table = WatchTable::new();
        assert!(table.release_matches(&[props_changed()]).is_empty());
    }

    #[test]
    fn test_deliveries_exact_and_prefix() {
        let table = WatchTable::new();
        let device = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");

        let _exact = entry(
            &table,
            "/org/bluez/hci0/dev_11_22_33_44_55_66",
            vec![props_changed()],
        );
        let _prefix = entry(&table, "/org/bluez/hci0*", vec![props_changed()]);
        let _other = entry(&table, "/org/bluez/hci1*", vec![props_changed()]);

        let targets = table.deliveries_for(&device, "PropertiesChanged", false);
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_deliveries_filter_by_kind() {
        let table = WatchTable::new();
        let device = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");

        let _rx = entry(
            &table,
            "/org/bluez/hci0/dev_11_22_33_44_55_66",
            vec![added()],
        );
        assert!(table
            .deliveries_for(&device, "PropertiesChanged", false)
            .is_empty());
    }

    #[test]
    fn test_broadened_delivery_for_adapter_watchers() {
        let table = WatchTable::new();
        let device = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");

        // Adapter-level watcher, path does not literally match the device
        let _adapter = entry(&table, "/org/bluez/hci0", vec![added()]);
        // Deep watcher at a non-adapter level, no match either way
        let _deep = entry(
            &table,
            "/org/bluez/hci0/dev_99_88_77_66_55_44",
            vec![added()],
        );

        let broadened = table.deliveries_for(&device, "InterfacesAdded", true);
        assert_eq!(broadened.len(), 1);

        let ordinary = table.deliveries_for(&device, "InterfacesAdded", false);
        assert!(ordinary.is_empty());
    }
}

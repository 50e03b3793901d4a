use std::io;
use std::sync::{Arc, RwLock};

/// Persists the serialized session on behalf of the client
pub trait ConfigStore: Send + Sync {
    /// Previously saved bytes, empty if nothing was saved yet
    fn load(&self) -> io::Result<Vec<u8>>;

    /// Replace the saved bytes
    fn save(&self, bytes: &[u8]) -> io::Result<()>;
}

/// In-memory config store for testing and simple use cases.
///
/// Clones share the same state, so a clone kept by the caller observes what
/// the client saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    bytes: Vec<u8>,
    saves: usize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out with `bytes` already saved
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.inner.write() {
            state.bytes = bytes.into();
        }
        store
    }

    /// Currently saved bytes
    pub fn bytes(&self) -> Vec<u8> {
        self.inner
            .read()
            .map(|state| state.bytes.clone())
            .unwrap_or_default()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.inner.read().map(|state| state.saves).unwrap_or_default()
    }
}

fn poisoned() -> io::Error {
    io::Error::other("Lock poisoned")
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> io::Result<Vec<u8>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.bytes.clone())
    }

    fn save(&self, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        state.bytes = bytes.to_vec();
        state.saves += 1;
        Ok(())
    }
}

/// Config store backed by a pair of caller supplied callbacks
pub struct FnConfigStore<L, S> {
    load: L,
    save: S,
}

impl<L, S> FnConfigStore<L, S>
where
    L: Fn() -> io::Result<Vec<u8>> + Send + Sync,
    S: Fn(&[u8]) -> io::Result<()> + Send + Sync,
{
    pub fn new(load: L, save: S) -> Self {
        Self { load, save }
    }
}

impl<L, S> std::fmt::Debug for FnConfigStore<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnConfigStore").finish_non_exhaustive()
    }
}

impl<L, S> ConfigStore for FnConfigStore<L, S>
where
    L: Fn() -> io::Result<Vec<u8>> + Send + Sync,
    S: Fn(&[u8]) -> io::Result<()> + Send + Sync,
{
    fn load(&self) -> io::Result<Vec<u8>> {
        (self.load)()
    }

    fn save(&self, bytes: &[u8]) -> io::Result<()> {
        (self.save)(bytes)
    }
}

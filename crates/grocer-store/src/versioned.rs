//! Single-document slots with optimistic concurrency control.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{KeyValueStore, Store, StoreError};

/// Maximum retry attempts for optimistic concurrency control.
const MAX_UPDATE_RETRIES: u32 = 3;

/// A document as it is persisted in a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// The document itself.
    pub data: T,
    /// Incremented on every successful write. 0 means "never written".
    pub version: u64,
    /// When the document was last written.
    pub updated_at: DateTime<Utc>,
}

/// What to do when a slot holds bytes that do not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptPolicy {
    /// Surface [`StoreError::Serialize`] to the caller.
    #[default]
    Fail,
    /// Log and continue from `T::default()`; the next write replaces the bad bytes.
    Reset,
}

/// A typed document stored under one key, written atomically as a whole.
///
/// # Example
///
/// ```rust,ignore
/// let slot = VersionedSlot::<_, OverlayDocument>::new(store, "catalog:default:overlay");
/// slot.update(|doc| {
///     doc.deleted.push(id.clone());
///     Ok::<_, StoreError>(())
/// })?;
/// ```
pub struct VersionedSlot<S, T> {
    store: Store<S>,
    key: String,
    policy: CorruptPolicy,
    _phantom: std::marker::PhantomData<T>,
}

impl<S, T> VersionedSlot<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            store: Store::new(backend),
            key: key.into(),
            policy: CorruptPolicy::Fail,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Set how undecodable slot contents are handled by writes.
    pub fn with_corrupt_policy(mut self, policy: CorruptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The typed store this slot writes through.
    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Get the full persisted document including version.
    ///
    /// Always strict: corrupt contents are returned as an error regardless
    /// of the slot's policy.
    pub fn load_versioned(&self) -> Result<Option<Versioned<T>>, StoreError> {
        self.store.get::<Versioned<T>>(&self.key)
    }

    /// Get the document, or `T::default()` if the slot was never written.
    pub fn load(&self) -> Result<T, StoreError> {
        Ok(self.load_versioned()?.map(|v| v.data).unwrap_or_default())
    }

    /// Current version (0 if the slot was never written).
    pub fn version(&self) -> Result<u64, StoreError> {
        Ok(self.load_versioned()?.map(|v| v.version).unwrap_or(0))
    }

    /// Replace the document unconditionally.
    pub fn replace(&self, data: T) -> Result<u64, StoreError> {
        let current = self.store.backend().get(&self.key)?;
        let (_, version) = self.decode(current.as_deref())?;
        let next = Versioned {
            data,
            version: version + 1,
            updated_at: Utc::now(),
        };
        self.store.set(&self.key, &next)?;
        Ok(next.version)
    }

    /// Remove the slot entirely.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(&self.key)
    }

    /// Read-modify-write the document with a closure.
    ///
    /// The write only lands if the slot still holds the bytes that were read;
    /// otherwise the closure is re-run against the fresh document, up to
    /// MAX_UPDATE_RETRIES times. An error from the closure aborts without
    /// writing.
    ///
    /// # Returns
    /// - `Ok(R)` - The closure's result after a successful write
    /// - `Err(StoreError::ConcurrentModification)` - If all retries failed
    pub fn update<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnMut(&mut T) -> Result<R, E>,
        E: From<StoreError>,
    {
        self.update_inner(None, f)
    }

    /// Like [`update`](Self::update), but fails immediately with
    /// [`StoreError::ConcurrentModification`] if the persisted version is not
    /// `expected_version`.
    pub fn update_at<R, E, F>(&self, expected_version: u64, f: F) -> Result<R, E>
    where
        F: FnMut(&mut T) -> Result<R, E>,
        E: From<StoreError>,
    {
        self.update_inner(Some(expected_version), f)
    }

    fn update_inner<R, E, F>(&self, expected_version: Option<u64>, mut f: F) -> Result<R, E>
    where
        F: FnMut(&mut T) -> Result<R, E>,
        E: From<StoreError>,
    {
        for attempt in 0..MAX_UPDATE_RETRIES {
            let current = self.store.backend().get(&self.key)?;
            let (mut data, version) = self.decode(current.as_deref())?;

            if let Some(expected) = expected_version {
                if expected != version {
                    return Err(StoreError::ConcurrentModification(format!(
                        "{}: expected version {}, found {}",
                        self.key, expected, version
                    ))
                    .into());
                }
            }

            let result = f(&mut data)?;

            let next = Versioned {
                data,
                version: version + 1,
                updated_at: Utc::now(),
            };
            let bytes = serde_json::to_vec(&next).map_err(StoreError::from)?;

            if self
                .store
                .backend()
                .compare_and_swap(&self.key, current.as_deref(), &bytes)?
            {
                tracing::trace!(key = %self.key, version = next.version, "slot written");
                return Ok(result);
            }

            tracing::debug!(key = %self.key, attempt, "slot changed during update, retrying");
        }

        Err(StoreError::ConcurrentModification(format!("{}: max retries exceeded", self.key)).into())
    }

    fn decode(&self, bytes: Option<&[u8]>) -> Result<(T, u64), StoreError> {
        let Some(bytes) = bytes else {
            return Ok((T::default(), 0));
        };
        match serde_json::from_slice::<Versioned<T>>(bytes) {
            Ok(v) => Ok((v.data, v.version)),
            Err(e) if self.policy == CorruptPolicy::Reset => {
                tracing::warn!(key = %self.key, error = %e, "corrupt slot contents, starting from empty");
                Ok((T::default(), 0))
            }
            Err(e) => Err(e.into()),
        }
    }
}

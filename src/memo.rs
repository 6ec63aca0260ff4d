use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;

use crate::Result;
use crate::models::PlanRequest;
use crate::planning::TripPlan;

/// Content hash of a planning request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanKey(pub u64);

impl PlanKey {
    /// Fx hash of the postcard encoding of the request.
    /// Equal requests always produce equal keys.
    pub fn for_request(request: &PlanRequest) -> Result<Self> {
        let bytes = postcard::to_stdvec(request)?;
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        Ok(Self(hasher.finish()))
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Storage for finished plans, keyed by request content
pub trait PlanMemo {
    fn get(&self, key: PlanKey) -> Result<Option<TripPlan>>;
    fn put(&mut self, key: PlanKey, plan: &TripPlan) -> Result<()>;
}

/// Process-local memo holding postcard-encoded plans
#[derive(Debug, Default)]
pub struct InMemoryPlanMemo {
    entries: FxHashMap<PlanKey, Vec<u8>>,
}

impl InMemoryPlanMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, key: PlanKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl PlanMemo for InMemoryPlanMemo {
    #[tracing::instrument(name = "query_memo", level = "debug", skip(self))]
    fn get(&self, key: PlanKey) -> Result<Option<TripPlan>> {
        match self.entries.get(&key) {
            Some(bytes) => {
                tracing::debug!("Key found");
                Ok(Some(postcard::from_bytes(bytes)?))
            }
            None => {
                tracing::debug!("Key not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(name = "put_memo", level = "debug", skip(self, plan))]
    fn put(&mut self, key: PlanKey, plan: &TripPlan) -> Result<()> {
        let bytes = postcard::to_stdvec(plan)?;
        self.entries.insert(key, bytes);
        Ok(())
    }
}

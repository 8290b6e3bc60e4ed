//! Per-region cache of host models built by plugin functions
//!
//! Some plugins need an expensive host object (a thermophysical model, a
//! cloud of particles) to compute their result. The first call for a region
//! builds it; every later call, from any evaluator sharing the registry,
//! gets the same instance. Entries are never evicted.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::fieldcalc::error::{ExprError, Result};

type Model = Arc<dyn Any + Send + Sync>;
type Slot = Arc<OnceCell<Model>>;

#[derive(Default)]
pub struct ModelCache {
    slots: Mutex<HashMap<(TypeId, String), Slot>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model of type `T` for `region`, building it with `build` on first
    /// use. The map lock is only held to find the slot; concurrent callers
    /// for the same key wait on the slot while one of them builds.
    pub fn get_or_try_insert<T, F>(&self, region: &str, build: F) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T>,
    {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(
                slots
                    .entry((TypeId::of::<T>(), region.to_string()))
                    .or_default(),
            )
        };
        let model = slot.get_or_try_init(|| {
            debug!(model = type_name::<T>(), region, "model not yet in memory, building");
            build().map(|model| Arc::new(model) as Model)
        })?;
        downcast(Arc::clone(model))
    }

    /// The model of type `T` for `region`, if it has been built.
    pub fn get<T: Any + Send + Sync>(&self, region: &str) -> Option<Arc<T>> {
        let slots = self.slots.lock();
        let model = slots
            .get(&(TypeId::of::<T>(), region.to_string()))?
            .get()?;
        downcast(Arc::clone(model)).ok()
    }

    pub fn contains<T: Any + Send + Sync>(&self, region: &str) -> bool {
        self.get::<T>(region).is_some()
    }

    /// Number of built models.
    pub fn len(&self) -> usize {
        self.slots.lock().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn downcast<T: Any + Send + Sync>(model: Model) -> Result<Arc<T>> {
    model.downcast::<T>().map_err(|_| ExprError::Plugin {
        name: type_name::<T>().into(),
        message: "cached model has an unexpected type".into(),
    })
}

impl fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCache").field("models", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    struct Thermo {
        gamma: f64,
    }

    #[test]
    fn test_builds_once_per_region() {
        let cache = ModelCache::new();
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok(Thermo { gamma: 1.4 })
        };

        let first = cache.get_or_try_insert("fluid", build).expect("first build");
        let second = cache
            .get_or_try_insert("fluid", || Ok(Thermo { gamma: 0.0 }))
            .expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.get(), 1);

        cache
            .get_or_try_insert("solid", || Ok(Thermo { gamma: 1.0 }))
            .expect("second region");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get::<Thermo>("solid").map(|t| t.gamma), Some(1.0));
    }

    #[test]
    fn test_failed_build_is_retried() {
        let cache = ModelCache::new();
        let failed = cache.get_or_try_insert::<Thermo, _>("fluid", || {
            Err(ExprError::Host {
                message: "no thermophysical properties".into(),
            })
        });
        assert!(failed.is_err());
        assert!(cache.is_empty());

        cache
            .get_or_try_insert("fluid", || Ok(Thermo { gamma: 1.3 }))
            .expect("retry succeeds");
        assert!(cache.contains::<Thermo>("fluid"));
    }

    #[test]
    fn test_types_are_separate_keys() {
        let cache = ModelCache::new();
        cache
            .get_or_try_insert("fluid", || Ok(Thermo { gamma: 1.4 }))
            .expect("thermo");
        assert!(!cache.contains::<String>("fluid"));
        cache
            .get_or_try_insert("fluid", || Ok(String::from("cloud")))
            .expect("string model");
        assert_eq!(cache.len(), 2);
    }
}

//! Memoized table storage keyed by configuration.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::{HueSatLut, LutConfig, LutKey};

/// Tables built so far, one per distinct [`LutConfig`].
///
/// Configurations are fixed per kernel variant, so entries are never
/// invalidated.
#[derive(Default)]
pub struct LutCache {
    tables: RwLock<HashMap<LutKey, Arc<HueSatLut>>>,
}

impl LutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by all sessions.
    pub fn global() -> &'static LutCache {
        static CACHE: OnceLock<LutCache> = OnceLock::new();
        CACHE.get_or_init(LutCache::new)
    }

    /// Return the table for `config`, building it on first use.
    pub fn get_or_build(&self, config: &LutConfig) -> Arc<HueSatLut> {
        let key = config.cache_key();
        if let Some(lut) = self.tables.read().get(&key) {
            return Arc::clone(lut);
        }

        let mut tables = self.tables.write();
        let lut = tables.entry(key).or_insert_with(|| {
            tracing::debug!(
                "building hue LUT ({} anchors, sigma {})",
                config.anchors.len(),
                config.sigma
            );
            Arc::new(config.build())
        });
        Arc::clone(lut)
    }

    /// Number of distinct tables held.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

//! Memoized gamma tables keyed by quantized exponent.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::contrast::lut::{GammaLut, LutKey};
use crate::error::{Result, StageError};

/// Grow-only cache of [`GammaLut`]s.
///
/// Keys come from a small domain (tenths of a realistic exponent range), so
/// entries are never evicted. Lookups share the read lock; a miss builds the
/// table under the write lock, so each key is built at most once even when
/// several threads miss together.
#[derive(Debug, Default)]
pub struct LutCache {
    tables: RwLock<HashMap<LutKey, Arc<GammaLut>>>,
    builds: AtomicUsize,
}

impl LutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `exponent`'s key, building it on first use.
    ///
    /// Tables are evaluated at the key's exponent, so every exponent in one
    /// tenth maps through the same curve no matter which arrived first.
    /// Non-finite exponents are rejected and never reach the map.
    pub fn get_or_build(&self, exponent: f64) -> Result<Arc<GammaLut>> {
        let key = finite_key(exponent)?;
        if let Some(lut) = self.tables.read().get(&key) {
            tracing::trace!("gamma LUT cache hit for key {key}");
            return Ok(Arc::clone(lut));
        }

        let mut tables = self.tables.write();
        let mut built = false;
        let lut = Arc::clone(tables.entry(key).or_insert_with(|| {
            built = true;
            Arc::new(GammaLut::build(key.exponent()))
        }));

        if built {
            self.builds.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                "built gamma LUT for key {key} (requested {exponent}), {} cached",
                tables.len()
            );
            if key.tenths() <= 0 {
                tracing::warn!("contrast exponent {exponent} is not positive; LUT is degenerate");
            }
        }
        Ok(lut)
    }

    /// Cached table for `exponent`'s key, if one has been built.
    pub fn get(&self, exponent: f64) -> Option<Arc<GammaLut>> {
        let key = finite_key(exponent).ok()?;
        self.tables.read().get(&key).cloned()
    }

    pub fn contains(&self, key: LutKey) -> bool {
        self.tables.read().contains_key(&key)
    }

    /// Number of distinct keys cached.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Total number of tables built over the cache's lifetime.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

fn finite_key(exponent: f64) -> Result<LutKey> {
    if !exponent.is_finite() {
        return Err(StageError::InvalidArgument(format!(
            "contrast multiplier must be finite, got {exponent}"
        )));
    }
    Ok(LutKey::quantize(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_empty() {
        let cache = LutCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.builds(), 0);
        assert!(cache.get(2.0).is_none());
    }

    #[test]
    fn test_same_tenth_builds_once() {
        let cache = LutCache::new();
        let a = cache.get_or_build(2.0).unwrap();
        let b = cache.get_or_build(2.04).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.builds(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_table_built_from_key_exponent() {
        let warm = LutCache::new();
        warm.get_or_build(1.96).unwrap();
        let reused = warm.get_or_build(2.04).unwrap();
        let fresh = LutCache::new().get_or_build(2.04).unwrap();

        assert_eq!(reused.exponent(), 2.0);
        assert_eq!(reused.as_array(), fresh.as_array());
        assert_eq!(fresh.as_array(), GammaLut::build(2.0).as_array());
    }

    #[test]
    fn test_non_finite_exponent_is_rejected() {
        let cache = LutCache::new();
        for exponent in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = cache.get_or_build(exponent).unwrap_err();
            assert!(err.is_invalid_argument());
            assert!(cache.get(exponent).is_none());
        }
        assert!(cache.is_empty());
        assert_eq!(cache.builds(), 0);

        // NaN would quantize onto the zero-exponent key.
        let zero = cache.get_or_build(0.0).unwrap();
        assert!(zero.as_array().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_distinct_tenths_build_separately() {
        let cache = LutCache::new();
        cache.get_or_build(2.0).unwrap();
        cache.get_or_build(2.1).unwrap();
        cache.get_or_build(0.0).unwrap();
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.builds(), 3);
        assert!(cache.contains(LutKey::quantize(2.1)));
        assert!(!cache.contains(LutKey::quantize(2.2)));
    }
}

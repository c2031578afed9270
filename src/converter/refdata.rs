//! Shared reference-data resolver
//!
//! Bylaws, predecessors, authorities, taxpayer types and KVED codes are
//! global rows deduplicated by natural key. The cache is warmed once from
//! storage when a converter run starts and kept current as new values are
//! created mid-run, so each distinct key costs at most one storage write
//! for the lifetime of the process. The resolver is an explicit object
//! passed into the converter, not ambient state, which keeps runs
//! reproducible in tests.

use std::collections::HashMap;

use crate::models::{Authority, Bylaw, KvedCode, Predecessor, TaxpayerType};
use crate::traits::RegistryStorage;
use crate::types::RegistryResult;

/// In-memory create-or-fetch cache over the shared reference tables
#[derive(Debug, Default)]
pub struct ReferenceCache {
    bylaws: HashMap<String, Bylaw>,
    predecessors: HashMap<String, Predecessor>,
    authorities: HashMap<String, Authority>,
    taxpayer_types: HashMap<String, TaxpayerType>,
    /// Keyed by code + name: the registry reuses codes across revisions
    /// with different names
    kveds: HashMap<(String, String), KvedCode>,
}

impl ReferenceCache {
    /// Build a cache warmed from the current table contents
    pub fn warm<S: RegistryStorage>(store: &S) -> RegistryResult<Self> {
        let mut cache = Self::default();
        for bylaw in store.load_bylaws()? {
            cache.bylaws.insert(bylaw.name.clone(), bylaw);
        }
        for predecessor in store.load_predecessors()? {
            cache
                .predecessors
                .insert(predecessor.name.clone(), predecessor);
        }
        for authority in store.load_authorities()? {
            cache.authorities.insert(authority.name.clone(), authority);
        }
        for taxpayer_type in store.load_taxpayer_types()? {
            cache
                .taxpayer_types
                .insert(taxpayer_type.name.clone(), taxpayer_type);
        }
        for kved in store.load_kveds()? {
            cache
                .kveds
                .insert((kved.code.clone(), kved.name.clone()), kved);
        }
        Ok(cache)
    }

    pub fn bylaw<S: RegistryStorage>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> RegistryResult<Bylaw> {
        if let Some(bylaw) = self.bylaws.get(name) {
            return Ok(bylaw.clone());
        }
        let created = store.create_bylaw(name)?;
        self.bylaws.insert(name.to_string(), created.clone());
        Ok(created)
    }

    /// Predecessors are keyed by lower-cased name; a cached entry whose
    /// EDRPOU differs from the incoming one is superseded by a fresh row.
    pub fn predecessor<S: RegistryStorage>(
        &mut self,
        store: &mut S,
        name: &str,
        edrpou: Option<&str>,
    ) -> RegistryResult<Predecessor> {
        let key = name.to_lowercase();
        if let Some(predecessor) = self.predecessors.get(&key) {
            if predecessor.edrpou.as_deref() == edrpou {
                return Ok(predecessor.clone());
            }
        }
        let created = store.create_predecessor(&key, edrpou)?;
        self.predecessors.insert(key, created.clone());
        Ok(created)
    }

    pub fn authority<S: RegistryStorage>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> RegistryResult<Authority> {
        if let Some(authority) = self.authorities.get(name) {
            return Ok(authority.clone());
        }
        let created = store.create_authority(name)?;
        self.authorities.insert(name.to_string(), created.clone());
        Ok(created)
    }

    pub fn taxpayer_type<S: RegistryStorage>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> RegistryResult<TaxpayerType> {
        if let Some(taxpayer_type) = self.taxpayer_types.get(name) {
            return Ok(taxpayer_type.clone());
        }
        let created = store.create_taxpayer_type(name)?;
        self.taxpayer_types
            .insert(name.to_string(), created.clone());
        Ok(created)
    }

    pub fn kved<S: RegistryStorage>(
        &mut self,
        store: &mut S,
        code: &str,
        name: &str,
    ) -> RegistryResult<KvedCode> {
        let key = (code.to_string(), name.to_string());
        if let Some(kved) = self.kveds.get(&key) {
            return Ok(kved.clone());
        }
        let created = store.create_kved(code, name)?;
        self.kveds.insert(key, created.clone());
        Ok(created)
    }
}

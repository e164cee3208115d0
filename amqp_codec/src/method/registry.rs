use std::collections::{HashMap, HashSet};

use amqp_wire::types::{AmqpClassId, AmqpMethodId};
use tracing::debug;

use super::{catalog, MethodDef, MethodHeader};
use crate::error::{Error, Result};

/// Read-only catalog index, built once and shared by reference.
///
/// Two lookups are supported: by (class-id, method-id) for decoding and by
/// protocol name for constructing outgoing calls.
#[derive(Debug)]
pub struct MethodRegistry {
    by_id: HashMap<MethodHeader, &'static MethodDef>,
    by_name: HashMap<&'static str, &'static MethodDef>,
    responses: HashSet<MethodHeader>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        let mut by_id = HashMap::with_capacity(catalog::DEFS.len());
        let mut by_name = HashMap::with_capacity(catalog::DEFS.len());
        let mut responses = HashSet::new();
        for def in catalog::DEFS {
            let prev = by_id.insert(*def.header(), def);
            debug_assert!(prev.is_none(), "duplicate method id {}", def.header());
            let prev = by_name.insert(def.name(), def);
            debug_assert!(prev.is_none(), "duplicate method name {}", def.name());
            responses.extend(def.responses().iter().copied());
        }
        debug!("method registry built with {} definitions", by_id.len());
        Self {
            by_id,
            by_name,
            responses,
        }
    }

    pub fn lookup(&self, class_id: AmqpClassId, method_id: AmqpMethodId) -> Result<&'static MethodDef> {
        self.lookup_header(&MethodHeader::new(class_id, method_id))
    }

    pub fn lookup_header(&self, header: &MethodHeader) -> Result<&'static MethodDef> {
        self.by_id.get(header).copied().ok_or(Error::UnknownMethod {
            class_id: header.class_id(),
            method_id: header.method_id(),
        })
    }

    /// Lookup by protocol name, e.g. `"exchange.delete"`.
    pub fn lookup_name(&self, name: &str) -> Option<&'static MethodDef> {
        self.by_name.get(name).copied()
    }

    /// True when the method appears in some other method's valid-response
    /// set; such methods are never acceptable unsolicited.
    pub fn is_response(&self, header: &MethodHeader) -> bool {
        self.responses.contains(header)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static MethodDef> + '_ {
        self.by_id.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

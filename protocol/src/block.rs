//! Block data that travels beside the transaction list.

use serde::{Deserialize, Serialize};

use crate::namespace::NamespaceId;

/// A namespaced payload placed into the square, separate from transaction
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub namespace_id: NamespaceId,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(namespace_id: NamespaceId, data: Vec<u8>) -> Self {
        Self { namespace_id, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Opaque, already-encoded evidence of validator misbehaviour. Only its size
/// matters here: it occupies compact shares in the evidence namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(pub Vec<u8>);

impl Evidence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

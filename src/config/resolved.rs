//! Resource registry: each schema bound 1:1 to its backing collection, fixed after startup.

use crate::config::ResourceSchema;
use crate::store::Collection;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ResourceBinding {
    pub schema: Arc<ResourceSchema>,
    pub collection: Collection,
}

impl ResourceBinding {
    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    bindings: Vec<ResourceBinding>,
}

impl ResourceRegistry {
    pub fn new(bindings: Vec<ResourceBinding>) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[ResourceBinding] {
        &self.bindings
    }

    pub fn get(&self, name: &str) -> Option<&ResourceBinding> {
        self.bindings.iter().find(|b| b.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.bindings.iter().map(ResourceBinding::name).collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

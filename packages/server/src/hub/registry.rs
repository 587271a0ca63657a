//! Handler registry: `domain -> action -> handler`.
//!
//! Built once before the hub accepts connections and read-only afterwards,
//! so lookups need no synchronization.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;

use crate::domain::{Kind, Payload};

use super::{error::HandlerError, manager::Hub, session::Session};

/// A message handler registered under one `(domain, action)` pair.
///
/// Handlers run on the session's own dispatch loop, one message at a time.
/// Authentication handlers must call `Session::authenticate` on success.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        hub: &Hub,
        session: &Arc<Session>,
        data: Payload,
    ) -> Result<(), HandlerError>;
}

/// Immutable routing table.
#[derive(Default)]
pub struct HandlerRegistry {
    domains: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// Find the handler for `kind`. A miss is not an error.
    pub fn lookup(&self, kind: &Kind) -> Option<&Arc<dyn Handler>> {
        self.domains.get(kind.domain())?.get(kind.action())
    }

    /// Number of registered `(domain, action)` pairs
    pub fn len(&self) -> usize {
        self.domains.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self
            .domains
            .iter()
            .flat_map(|(domain, actions)| {
                actions
                    .keys()
                    .map(move |action| format!("{domain}:{action}"))
            })
            .collect();
        kinds.sort();
        f.debug_struct("HandlerRegistry").field("kinds", &kinds).finish()
    }
}

/// Collects routes; `build()` freezes them.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    domains: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistryBuilder {
    /// Register `handler` for `kind`. A later route for the same kind wins.
    pub fn route(mut self, kind: Kind, handler: impl Handler + 'static) -> Self {
        self.domains
            .entry(kind.domain().to_string())
            .or_default()
            .insert(kind.action().to_string(), Arc::new(handler));
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            domains: self.domains,
        }
    }
}

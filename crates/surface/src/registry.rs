//! Surface Registry - the host's revision provider
//!
//! Each running surface owns one `ArcSwap<Revision>` slot. Readers load the
//! current revision lock-free; a commit swaps in a complete new revision, so
//! a reader never observes a partially updated tree. Stopping a surface
//! removes its slot and the provider reports no revision from then on.

use crate::config::HostConfig;
use crate::error::{HostError, Result};
use crate::events::{EventBus, SurfaceEvent};
use arc_swap::ArcSwap;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dom::{DomError, Node, Revision, RevisionProvider, SurfaceId};
use std::sync::Arc;

pub struct SurfaceRegistry {
    config: HostConfig,
    surfaces: DashMap<SurfaceId, ArcSwap<Revision>>,
    event_bus: EventBus,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        let event_bus = EventBus::with_capacity(config.event_capacity);
        Self {
            config,
            surfaces: DashMap::new(),
            event_bus,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Start a surface with its first committed tree (sequence 1)
    pub fn start_surface(&self, surface_id: SurfaceId, root: Arc<Node>) -> Result<Arc<Revision>> {
        let revision = Arc::new(self.build_revision(surface_id, 1, root)?);

        match self.surfaces.entry(surface_id) {
            Entry::Occupied(_) => return Err(HostError::SurfaceAlreadyRunning(surface_id)),
            Entry::Vacant(entry) => {
                entry.insert(ArcSwap::new(revision.clone()));
            }
        }

        tracing::info!("Surface {} started", surface_id);
        self.event_bus
            .publish(SurfaceEvent::Started { surface_id });
        Ok(revision)
    }

    /// Publish a new tree for a running surface
    ///
    /// The new revision's sequence is one greater than the one it replaces,
    /// even when commits race. The surface entry stays borrowed until the
    /// event is published, so a concurrent stop lands strictly after it.
    pub fn commit(&self, surface_id: SurfaceId, root: Arc<Node>) -> Result<Arc<Revision>> {
        let candidate = self.build_revision(surface_id, 0, root)?;

        let slot = self
            .surfaces
            .get(&surface_id)
            .ok_or(HostError::SurfaceNotRunning(surface_id))?;

        let mut committed = None;
        slot.rcu(|current| {
            let next = Arc::new(candidate.with_sequence(current.sequence() + 1));
            committed = Some(next.clone());
            next
        });
        let committed = committed.unwrap_or_else(|| slot.load_full());

        tracing::debug!(
            "Surface {} committed revision {}",
            surface_id,
            committed.sequence()
        );
        self.event_bus.publish(SurfaceEvent::Committed {
            surface_id,
            sequence: committed.sequence(),
        });
        drop(slot);

        Ok(committed)
    }

    /// Tear a surface down; later lookups report no revision
    pub fn stop_surface(&self, surface_id: SurfaceId) -> Result<()> {
        if self.surfaces.remove(&surface_id).is_none() {
            return Err(HostError::SurfaceNotRunning(surface_id));
        }

        tracing::info!("Surface {} stopped", surface_id);
        self.event_bus
            .publish(SurfaceEvent::Stopped { surface_id });
        Ok(())
    }

    pub fn running_surfaces(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = self.surfaces.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    fn build_revision(
        &self,
        surface_id: SurfaceId,
        sequence: u64,
        root: Arc<Node>,
    ) -> Result<Revision> {
        if self.config.validate_commits {
            return Ok(Revision::new(surface_id, sequence, root)?);
        }

        if !root.is_root() {
            return Err(DomError::NotARoot(root.id).into());
        }
        if root.surface_id != surface_id {
            return Err(DomError::SurfaceMismatch {
                expected: surface_id,
                actual: root.surface_id,
            }
            .into());
        }
        Ok(Revision::new_unchecked(surface_id, sequence, root))
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RevisionProvider for SurfaceRegistry {
    fn current_revision(&self, surface_id: SurfaceId) -> Option<Arc<Revision>> {
        self.surfaces
            .get(&surface_id)
            .map(|slot| slot.load_full())
    }
}

//! In-process graph registry
//!
//! Holds draft builders and published graphs by [`GraphId`]. Each draft sits
//! behind its own mutex, so writers to different drafts never contend.
//! Publishing takes the builder out of its slot under that mutex and hands
//! out an `Arc<Graph>` that any number of readers can share. A writer that
//! reaches an emptied slot gets an error instead of editing a builder nobody
//! will build.

use crate::builder::GraphBuilder;
use crate::error::{EntityKind, GraphError, Result};
use crate::graph::{Graph, GraphId};
use crate::node::RootEntity;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Draft slot; `None` once the draft was published or removed
type Draft = Arc<Mutex<Option<GraphBuilder>>>;

/// Drafts and published graphs
#[derive(Debug, Default)]
pub struct GraphRegistry {
    drafts: DashMap<GraphId, Draft>,
    published: DashMap<GraphId, Arc<Graph>>,
}

impl GraphRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a draft for `root` and return its id
    pub fn open(&self, root: RootEntity) -> GraphId {
        self.open_builder(GraphBuilder::new(root))
    }

    /// Register an existing builder as a draft
    pub fn open_builder(&self, builder: GraphBuilder) -> GraphId {
        let id = builder.graph_id();
        self.drafts.insert(id, Arc::new(Mutex::new(Some(builder))));
        tracing::debug!(graph = %id, "draft opened");
        id
    }

    /// Run `f` with exclusive access to draft `id`
    pub fn with_draft<T, F>(&self, id: GraphId, f: F) -> Result<T>
    where
        F: FnOnce(&mut GraphBuilder) -> Result<T>,
    {
        let draft = self.draft(id)?;
        self.edit(id, &draft, f)
    }

    /// Clone the slot handle so the map shard is not held while a writer runs
    fn draft(&self, id: GraphId) -> Result<Draft> {
        self.drafts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| self.missing_draft(id))
    }

    fn edit<T, F>(&self, id: GraphId, draft: &Mutex<Option<GraphBuilder>>, f: F) -> Result<T>
    where
        F: FnOnce(&mut GraphBuilder) -> Result<T>,
    {
        let mut slot = draft.lock();
        // Emptied by a publish or remove that won the race for the lock
        let builder = slot.as_mut().ok_or_else(|| self.missing_draft(id))?;
        f(builder)
    }

    /// Conflict when `id` is already published, NotFound otherwise
    fn missing_draft(&self, id: GraphId) -> GraphError {
        if self.published.contains_key(&id) {
            GraphError::conflict(EntityKind::Graph, id)
        } else {
            GraphError::not_found(EntityKind::Graph, id)
        }
    }

    /// Build draft `id` and make it readable
    pub fn publish(&self, id: GraphId) -> Result<Arc<Graph>> {
        let Some((_, draft)) = self.drafts.remove(&id) else {
            return Err(self.missing_draft(id));
        };
        let builder = draft.lock().take().ok_or_else(|| self.missing_draft(id))?;
        let graph = Arc::new(builder.build());
        self.published.insert(id, Arc::clone(&graph));
        tracing::info!(graph = %id, "graph published");
        Ok(graph)
    }

    /// Published graph `id`
    #[must_use]
    pub fn get(&self, id: GraphId) -> Option<Arc<Graph>> {
        self.published.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop graph `id`, draft or published; true if anything was removed
    pub fn remove(&self, id: GraphId) -> bool {
        let draft = match self.drafts.remove(&id) {
            Some((_, draft)) => draft.lock().take().is_some(),
            None => false,
        };
        let published = self.published.remove(&id).is_some();
        draft || published
    }

    /// Published graph count
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.len()
    }

    /// True when nothing is published
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    /// Open draft count
    #[must_use]
    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    /// Published ids, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<GraphId> {
        let mut ids: Vec<GraphId> = self.published.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::node::{DomainNode, NodeAttrs};
    use std::thread;

    fn root() -> RootEntity {
        RootEntity::new("SARS-CoV-2", 29.9).unwrap()
    }

    fn virology(id: String) -> DomainNode {
        DomainNode::virology(id, NodeAttrs::new("v", 1, 0.5), "t", "d").unwrap()
    }

    #[test]
    fn draft_then_publish() {
        let registry = GraphRegistry::new();
        let id = registry.open(root());
        registry
            .with_draft(id, |b| b.add_node(virology("spike".into())))
            .unwrap();
        assert!(registry.get(id).is_none());

        let graph = registry.publish(id).unwrap();
        assert_eq!(graph.id(), id);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.draft_count(), 0);
        assert!(Arc::ptr_eq(&graph, &registry.get(id).unwrap()));
    }

    #[test]
    fn publish_twice_is_conflict_and_unknown_is_not_found() {
        let registry = GraphRegistry::new();
        let id = registry.open(root());
        registry.publish(id).unwrap();
        assert_eq!(registry.publish(id).unwrap_err().kind(), ErrorKind::Conflict);

        let unknown = GraphId::new();
        assert_eq!(registry.publish(unknown).unwrap_err().kind(), ErrorKind::NotFound);
        let err = registry.with_draft(unknown, |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn failed_draft_edit_leaves_draft_usable() {
        let registry = GraphRegistry::new();
        let id = registry.open(root());
        registry
            .with_draft(id, |b| b.add_node(virology("a".into())))
            .unwrap();
        let err = registry
            .with_draft(id, |b| b.add_node(virology("a".into())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(registry.with_draft(id, |b| Ok(b.node_count())).unwrap(), 1);
    }

    #[test]
    fn writer_holding_a_published_draft_gets_conflict() {
        let registry = GraphRegistry::new();
        let id = registry.open(root());
        let retained = registry.draft(id).unwrap();

        registry.publish(id).unwrap();
        let err = registry
            .edit(id, &retained, |b| b.add_node(virology("late".into())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(registry.get(id).unwrap().node_count(), 0);
        assert!(retained.lock().is_none());
    }

    #[test]
    fn writer_holding_a_removed_draft_gets_not_found() {
        let registry = GraphRegistry::new();
        let id = registry.open(root());
        let retained = registry.draft(id).unwrap();

        assert!(registry.remove(id));
        let err = registry
            .edit(id, &retained, |b| b.add_node(virology("late".into())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn concurrent_writers_on_separate_drafts() {
        let registry = Arc::new(GraphRegistry::new());
        let ids: Vec<GraphId> = (0..4).map(|_| registry.open(root())).collect();

        let handles: Vec<_> = ids
            .iter()
            .copied()
            .map(|id| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..25 {
                        registry
                            .with_draft(id, |b| b.add_node(virology(format!("n{i}"))))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for id in ids {
            assert_eq!(registry.publish(id).unwrap().node_count(), 25);
        }
        assert_eq!(registry.ids().len(), 4);
    }

    #[test]
    fn remove_drops_either_state() {
        let registry = GraphRegistry::new();
        let draft = registry.open(root());
        let published = registry.open(root());
        registry.publish(published).unwrap();

        assert!(registry.remove(draft));
        assert!(registry.remove(published));
        assert!(!registry.remove(published));
        assert!(registry.is_empty());
    }
}

//! Depth-first path search over the undirected edge adjacency
//!
//! Edge direction is ignored: connectivity, not causality, is the question
//! here. Neighbors are visited in ascending node id order so results are
//! deterministic. The search uses an explicit stack, so deep chains cannot
//! overflow the call stack.

use crate::domain::Domain;
use crate::error::{EntityKind, GraphError, Result};
use crate::graph::Graph;
use crate::node::{DomainNode, NodeId};
use std::collections::{btree_set, BTreeMap, BTreeSet, HashSet};

/// Adjacency index over one graph, reusable for many queries
#[derive(Debug)]
pub struct PathFinder<'g> {
    graph: &'g Graph,
    adjacency: BTreeMap<&'g NodeId, BTreeSet<&'g NodeId>>,
    isolated: BTreeSet<&'g NodeId>,
}

impl<'g> PathFinder<'g> {
    /// Index `graph`
    #[must_use]
    pub fn new(graph: &'g Graph) -> Self {
        let mut adjacency: BTreeMap<&'g NodeId, BTreeSet<&'g NodeId>> =
            graph.nodes().map(|n| (n.id(), BTreeSet::new())).collect();
        for edge in graph.edges() {
            adjacency.entry(edge.source()).or_default().insert(edge.target());
            adjacency.entry(edge.target()).or_default().insert(edge.source());
        }
        Self {
            graph,
            adjacency,
            isolated: BTreeSet::new(),
        }
    }

    /// First path from `start` to `target`, or `None` if they are not
    /// connected
    pub fn find_path(&self, start: &NodeId, target: &NodeId) -> Result<Option<Vec<NodeId>>> {
        if !self.graph.contains_node(target) {
            return Err(GraphError::not_found(EntityKind::Node, target));
        }
        self.find_path_where(start, |node| node.id() == target)
    }

    /// First path from `start` to any node in `domain`
    pub fn find_path_to_domain(&self, start: &NodeId, domain: Domain) -> Result<Option<Vec<NodeId>>> {
        self.find_path_where(start, |node| node.domain() == domain)
    }

    /// First path from `start` to a node satisfying `is_target`
    ///
    /// A start node that already satisfies the predicate yields `[start]`.
    pub fn find_path_where<F>(&self, start: &NodeId, is_target: F) -> Result<Option<Vec<NodeId>>>
    where
        F: Fn(&DomainNode) -> bool,
    {
        let (start, start_node) = self.resolve(start)?;
        if is_target(start_node) {
            return Ok(Some(vec![start.clone()]));
        }

        let mut visited: HashSet<&NodeId> = HashSet::from([start]);
        let mut stack: Vec<(&NodeId, btree_set::Iter<'_, &NodeId>)> =
            vec![(start, self.neighbors(start))];

        while let Some((_, neighbors)) = stack.last_mut() {
            let Some(&next) = neighbors.next() else {
                stack.pop();
                continue;
            };
            if !visited.insert(next) {
                continue;
            }
            if self.graph.node(next).is_some_and(&is_target) {
                let mut path: Vec<NodeId> = stack.iter().map(|(id, _)| (*id).clone()).collect();
                path.push(next.clone());
                return Ok(Some(path));
            }
            stack.push((next, self.neighbors(next)));
        }

        Ok(None)
    }

    /// Domains of every node connected to `start`, `start` included
    pub fn reachable_domains(&self, start: &NodeId) -> Result<BTreeSet<Domain>> {
        let (start, _) = self.resolve(start)?;
        let mut visited: HashSet<&NodeId> = HashSet::from([start]);
        let mut stack = vec![start];
        let mut domains = BTreeSet::new();

        while let Some(id) = stack.pop() {
            if let Some(node) = self.graph.node(id) {
                domains.insert(node.domain());
            }
            for &next in self.neighbors(id) {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        Ok(domains)
    }

    /// Whether two nodes are connected
    pub fn connected(&self, a: &NodeId, b: &NodeId) -> Result<bool> {
        Ok(self.find_path(a, b)?.is_some())
    }

    fn resolve(&self, id: &NodeId) -> Result<(&'g NodeId, &'g DomainNode)> {
        self.graph
            .nodes
            .get_key_value(id)
            .ok_or_else(|| GraphError::not_found(EntityKind::Node, id))
    }

    fn neighbors(&self, id: &NodeId) -> btree_set::Iter<'_, &'g NodeId> {
        self.adjacency.get(id).unwrap_or(&self.isolated).iter()
    }
}

/// One-shot [`PathFinder::find_path`]
pub fn find_path(graph: &Graph, start: &NodeId, target: &NodeId) -> Result<Option<Vec<NodeId>>> {
    PathFinder::new(graph).find_path(start, target)
}

/// One-shot [`PathFinder::find_path_to_domain`]
pub fn find_path_to_domain(
    graph: &Graph,
    start: &NodeId,
    domain: Domain,
) -> Result<Option<Vec<NodeId>>> {
    PathFinder::new(graph).find_path_to_domain(start, domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::edge::{EdgeKind, EdgeSpec};
    use crate::error::ErrorKind;
    use crate::node::{NodeAttrs, RootEntity};

    fn node(id: &str, domain: Domain) -> DomainNode {
        let attrs = NodeAttrs::new(id, 1, 0.5);
        match domain {
            Domain::Virology => DomainNode::virology(id, attrs, "t", "d"),
            Domain::Immunology => DomainNode::immunology(id, attrs, "t", "d"),
            Domain::Genomics => DomainNode::genomics(id, attrs, "v", Vec::<String>::new()),
            Domain::Treatment => DomainNode::treatment(id, attrs, "t", "m"),
            Domain::PublicHealth => DomainNode::public_health(id, attrs, "p", "e"),
        }
        .unwrap()
    }

    fn graph(nodes: &[(&str, Domain)], edges: &[(&str, &str)]) -> Graph {
        let mut b = GraphBuilder::new(RootEntity::new("SARS-CoV-2", 29.9).unwrap());
        for (id, domain) in nodes {
            b.add_node(node(id, *domain)).unwrap();
        }
        for (s, t) in edges {
            b.add_edge(EdgeSpec::new(*s, *t, EdgeKind::Causal, "e", vec![], 0.5))
                .unwrap();
        }
        b.build()
    }

    fn ids(path: &[NodeId]) -> Vec<&str> {
        path.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn follows_chain() {
        let g = graph(
            &[("A", Domain::Virology), ("B", Domain::Virology), ("C", Domain::Virology)],
            &[("A", "B"), ("B", "C")],
        );
        let path = find_path(&g, &"A".into(), &"C".into()).unwrap().unwrap();
        assert_eq!(ids(&path), vec!["A", "B", "C"]);
    }

    #[test]
    fn ignores_edge_direction() {
        let g = graph(
            &[("A", Domain::Virology), ("B", Domain::Virology), ("C", Domain::Virology)],
            &[("B", "A"), ("C", "B")],
        );
        let path = find_path(&g, &"A".into(), &"C".into()).unwrap().unwrap();
        assert_eq!(ids(&path), vec!["A", "B", "C"]);
    }

    #[test]
    fn prefers_smaller_ids_first() {
        // A connects to both B and C; D hangs off C and B. DFS via B first.
        let g = graph(
            &[
                ("A", Domain::Virology),
                ("B", Domain::Virology),
                ("C", Domain::Virology),
                ("D", Domain::Virology),
            ],
            &[("A", "C"), ("A", "B"), ("C", "D"), ("B", "D")],
        );
        let path = find_path(&g, &"A".into(), &"D".into()).unwrap().unwrap();
        assert_eq!(ids(&path), vec!["A", "B", "D"]);
    }

    #[test]
    fn backtracks_out_of_dead_ends() {
        let g = graph(
            &[
                ("A", Domain::Virology),
                ("B", Domain::Virology),
                ("C", Domain::Virology),
                ("Z", Domain::Virology),
            ],
            &[("A", "B"), ("A", "C"), ("C", "Z")],
        );
        let path = find_path(&g, &"A".into(), &"Z".into()).unwrap().unwrap();
        assert_eq!(ids(&path), vec!["A", "C", "Z"]);
    }

    #[test]
    fn reports_no_path_and_missing_ids() {
        let g = graph(&[("A", Domain::Virology), ("B", Domain::Genomics)], &[]);
        assert_eq!(find_path(&g, &"A".into(), &"B".into()).unwrap(), None);

        let err = find_path(&g, &"X".into(), &"B".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = find_path(&g, &"A".into(), &"X".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn domain_target_and_reachability() {
        let g = graph(
            &[
                ("A", Domain::Genomics),
                ("B", Domain::Immunology),
                ("C", Domain::Treatment),
                ("D", Domain::PublicHealth),
            ],
            &[("A", "B"), ("B", "C")],
        );
        let path = find_path_to_domain(&g, &"A".into(), Domain::Treatment)
            .unwrap()
            .unwrap();
        assert_eq!(ids(&path), vec!["A", "B", "C"]);

        let start_matches = find_path_to_domain(&g, &"A".into(), Domain::Genomics)
            .unwrap()
            .unwrap();
        assert_eq!(ids(&start_matches), vec!["A"]);

        assert_eq!(
            find_path_to_domain(&g, &"A".into(), Domain::PublicHealth).unwrap(),
            None
        );

        let finder = PathFinder::new(&g);
        let reachable = finder.reachable_domains(&"A".into()).unwrap();
        assert_eq!(
            reachable.into_iter().collect::<Vec<_>>(),
            vec![Domain::Immunology, Domain::Genomics, Domain::Treatment]
        );
        assert!(!finder.connected(&"A".into(), &"D".into()).unwrap());
    }
}

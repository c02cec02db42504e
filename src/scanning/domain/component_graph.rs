use super::{Component, ComponentKind, ContentHash, Ecosystem, LicenseRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Identity key of a component: the (ecosystem, name, version text) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ComponentKey {
    ecosystem: Ecosystem,
    name: String,
    version: String,
}

impl ComponentKey {
    fn of(component: &Component) -> Self {
        Self {
            ecosystem: component.ecosystem(),
            name: component.name().to_string(),
            version: component.version().as_str().to_string(),
        }
    }
}

/// The unified component graph produced by a scan.
///
/// Nodes are components (the scanned projects and their resolved packages),
/// edges point from dependent to dependency. Insertion is idempotent on the
/// identity triple, insertion order is observable, and nodes are never
/// removed, so a `NodeIndex` handed out by this graph stays valid for the
/// graph's lifetime.
#[derive(Debug, Default)]
pub struct ComponentGraph {
    graph: DiGraph<Component, ()>,
    index: HashMap<ComponentKey, NodeIndex>,
    order: Vec<NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl ComponentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component, or returns the existing node with the same
    /// identity triple. The first insertion wins; payload on `component` is
    /// ignored for an already-present identity.
    pub fn add_component(&mut self, component: Component) -> NodeIndex {
        let key = ComponentKey::of(&component);
        if let Some(&existing) = self.index.get(&key) {
            return existing;
        }
        let is_root = component.kind() == ComponentKind::Root;
        let node = self.graph.add_node(component);
        self.index.insert(key, node);
        self.order.push(node);
        if is_root {
            self.roots.push(node);
        }
        node
    }

    /// Adds a directed dependency edge. Re-adding an existing edge is a no-op.
    ///
    /// # Panics
    /// Panics if either handle does not belong to this graph; handles are
    /// only ever produced by `add_component`, so a foreign index is a
    /// programming error rather than a reportable scan condition.
    pub fn connect(&mut self, from: NodeIndex, to: NodeIndex) {
        assert!(
            self.graph.node_weight(from).is_some() && self.graph.node_weight(to).is_some(),
            "connect called with a handle that is not a node of this graph"
        );
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    /// All nodes matching (ecosystem, name) exactly, in insertion order.
    pub fn find_by_ecosystem_and_name(&self, ecosystem: Ecosystem, name: &str) -> Vec<NodeIndex> {
        self.order
            .iter()
            .copied()
            .filter(|&node| {
                let component = &self.graph[node];
                component.ecosystem() == ecosystem && component.name() == name
            })
            .collect()
    }

    /// Looks up the node with an exact identity triple.
    pub fn find_exact(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Option<NodeIndex> {
        self.index
            .get(&ComponentKey {
                ecosystem,
                name: name.to_string(),
                version: version.to_string(),
            })
            .copied()
    }

    /// # Panics
    /// Panics if the handle does not belong to this graph.
    pub fn component(&self, node: NodeIndex) -> &Component {
        &self.graph[node]
    }

    /// Attaches or overwrites the license record of a node.
    pub fn set_license(&mut self, node: NodeIndex, record: LicenseRecord) {
        self.graph[node].set_license(record);
    }

    /// Attaches or overwrites the content hash of a node.
    pub fn set_content_hash(&mut self, node: NodeIndex, hash: ContentHash) {
        self.graph[node].set_content_hash(hash);
    }

    /// All components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (NodeIndex, &Component)> {
        self.order.iter().map(move |&node| (node, &self.graph[node]))
    }

    /// Direct dependencies of a node, in the order their edges were added.
    pub fn dependencies_of(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph iterates neighbors in reverse insertion order
        let mut dependencies: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        dependencies.reverse();
        dependencies
    }

    /// Root components in insertion order.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn first_root(&self) -> Option<NodeIndex> {
        self.roots.first().copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

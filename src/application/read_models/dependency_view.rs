//! Dependency view structs for the read model

/// One rendered dependency relation: a component and what it depends on
///
/// There is one entry per node with outgoing edges, plus one for each scanned
/// root even when it has no dependencies, all in graph insertion order.
#[derive(Debug, Clone)]
pub struct DependencyEdgeView {
    /// BOM reference of the dependent component
    pub bom_ref: String,
    /// BOM references of its direct dependencies, in edge insertion order
    pub depends_on: Vec<String>,
}

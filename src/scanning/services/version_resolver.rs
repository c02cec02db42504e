use crate::scanning::domain::{ComponentGraph, Ecosystem, VersionRange};
use petgraph::graph::NodeIndex;

/// Outcome of resolving a dependency constraint against the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionResolution {
    /// A candidate satisfied the range (ordered match or exact literal match)
    Exact(NodeIndex),
    /// No candidate satisfied the range, but exactly one candidate exists;
    /// it is returned under the leniency rule and callers warn about it
    SoleCandidate(NodeIndex),
    /// No candidate satisfied the range and the pool was empty or ambiguous
    Unresolved,
}

/// VersionResolver service matching declared constraints to graph nodes
///
/// This service contains pure matching logic. It has no I/O dependencies and
/// works only with domain objects.
pub struct VersionResolver;

impl VersionResolver {
    /// Resolves `range` against every component named `name` in `ecosystem`.
    ///
    /// Structured ranges consider only ordered versions and pick the lowest
    /// satisfying one, which keeps resolution deterministic regardless of
    /// lock-file ordering. Literal ranges consider only opaque versions and
    /// take the first exact text match in insertion order. When neither path
    /// matches, a pool of exactly one candidate is taken on trust
    /// (`SoleCandidate`); anything else is `Unresolved`.
    pub fn resolve(
        graph: &ComponentGraph,
        ecosystem: Ecosystem,
        name: &str,
        range: &VersionRange,
    ) -> VersionResolution {
        let candidates = graph.find_by_ecosystem_and_name(ecosystem, name);

        let exact = match range {
            VersionRange::Structured { .. } => candidates
                .iter()
                .filter(|&&node| range.admits(graph.component(node).version()))
                .min_by(|&&a, &&b| {
                    let left = graph.component(a).version().semantic();
                    let right = graph.component(b).version().semantic();
                    // admits() only passes semantic versions for structured ranges
                    left.cmp(&right)
                })
                .copied(),
            VersionRange::Literal(_) => candidates
                .iter()
                .find(|&&node| range.admits(graph.component(node).version()))
                .copied(),
        };

        if let Some(node) = exact {
            return VersionResolution::Exact(node);
        }
        match candidates.as_slice() {
            [only] => VersionResolution::SoleCandidate(*only),
            _ => VersionResolution::Unresolved,
        }
    }
}

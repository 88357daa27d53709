// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::types::ComponentName;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DepNode {
    /// Direct prerequisites, in input order (duplicates kept).
    deps: Vec<ComponentName>,
    /// Components listing this one as a prerequisite (deduplicated).
    dependents: Vec<ComponentName>,
}

/// Component → prerequisite adjacency, keyed by component name.
///
/// Unlike a validated task DAG, input here comes straight from user config:
/// duplicates, self-references, cycles and names missing from the dataset
/// are all tolerated. Queries never fail and never loop.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<ComponentName, DepNode>,
}

impl DependencyGraph {
    /// Build from a `component → prerequisites` map.
    pub fn from_map(map: &BTreeMap<ComponentName, Vec<ComponentName>>) -> Self {
        map.iter()
            .map(|(name, deps)| (name.clone(), deps.clone()))
            .collect()
    }

    /// All component names mentioned, either as a key or as a prerequisite.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate prerequisites of a component, in input order.
    pub fn direct_dependencies(&self, name: &str) -> &[ComponentName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a component.
    pub fn dependents_of(&self, name: &str) -> &[ComponentName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Every component reachable through prerequisite edges from `name`.
    ///
    /// A component that depends on itself, directly or through a cycle,
    /// appears in its own result.
    pub fn all_transitive_dependencies(&self, name: &str) -> BTreeSet<ComponentName> {
        let mut visited = BTreeSet::new();
        self.collect_transitive(name, &mut visited)
    }

    /// Worklist walk behind [`all_transitive_dependencies`]. `visited` holds
    /// the components already expanded; passing a shared set across calls
    /// skips re-expanding them.
    ///
    /// [`all_transitive_dependencies`]: Self::all_transitive_dependencies
    pub fn collect_transitive(
        &self,
        root: &str,
        visited: &mut BTreeSet<ComponentName>,
    ) -> BTreeSet<ComponentName> {
        let mut reached = BTreeSet::new();
        let mut stack: Vec<&str> = vec![root];
        visited.insert(root.to_string());

        while let Some(name) = stack.pop() {
            for dep in self.direct_dependencies(name) {
                reached.insert(dep.clone());
                if visited.insert(dep.clone()) {
                    stack.push(dep.as_str());
                }
            }
        }

        reached
    }

    /// Transitive prerequisites for each of `components`.
    pub fn resolve_all<'a, I>(&self, components: I) -> BTreeMap<ComponentName, BTreeSet<ComponentName>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        components
            .into_iter()
            .map(|c| (c.to_string(), self.all_transitive_dependencies(c)))
            .collect()
    }

    /// Groups of components that depend on each other, including single
    /// components that list themselves. Sorted for stable output.
    pub fn cycles(&self) -> Vec<Vec<ComponentName>> {
        // Edge direction: dep -> component.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }
        for (name, node) in self.nodes.iter() {
            for dep in node.deps.iter() {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }

        let mut cycles: Vec<Vec<ComponentName>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<ComponentName> = scc.into_iter().map(str::to_string).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// View of the graph limited to `selection`.
    ///
    /// - Members keep selection order; repeated names collapse to the first.
    /// - Edges to components outside the selection are dropped.
    /// - Duplicate edges and self-references are dropped.
    pub fn restrict_to(&self, selection: &[ComponentName]) -> Subgraph {
        let mut members: Vec<ComponentName> = Vec::new();
        let mut member_set: HashSet<&str> = HashSet::new();
        for name in selection {
            if member_set.insert(name.as_str()) {
                members.push(name.clone());
            }
        }

        let mut deps: HashMap<ComponentName, Vec<ComponentName>> = HashMap::new();
        let mut dependents: HashMap<ComponentName, Vec<ComponentName>> = HashMap::new();

        for name in members.iter() {
            let mut kept: Vec<ComponentName> = Vec::new();
            for dep in self.direct_dependencies(name) {
                if dep == name {
                    debug!(component = %name, "ignoring self-dependency");
                    continue;
                }
                if member_set.contains(dep.as_str()) && !kept.contains(dep) {
                    kept.push(dep.clone());
                }
            }
            for dep in kept.iter() {
                dependents.entry(dep.clone()).or_default().push(name.clone());
            }
            deps.insert(name.clone(), kept);
        }

        Subgraph {
            members,
            deps,
            dependents,
        }
    }
}

impl FromIterator<(ComponentName, Vec<ComponentName>)> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = (ComponentName, Vec<ComponentName>)>>(iter: I) -> Self {
        let mut nodes: BTreeMap<ComponentName, DepNode> = BTreeMap::new();

        // First pass: create nodes with their dependency lists.
        for (name, deps) in iter {
            nodes.entry(name).or_default().deps.extend(deps);
        }

        // Second pass: make sure prerequisites exist as nodes and populate
        // dependents.
        let edges: Vec<(ComponentName, ComponentName)> = nodes
            .iter()
            .flat_map(|(name, node)| node.deps.iter().map(move |dep| (dep.clone(), name.clone())))
            .collect();

        for (dep, dependent) in edges {
            let dep_node = nodes.entry(dep).or_default();
            if !dep_node.dependents.contains(&dependent) {
                dep_node.dependents.push(dependent);
            }
        }

        Self { nodes }
    }
}

/// A [`DependencyGraph`] restricted to one scheduling selection.
#[derive(Debug, Clone)]
pub struct Subgraph {
    members: Vec<ComponentName>,
    deps: HashMap<ComponentName, Vec<ComponentName>>,
    dependents: HashMap<ComponentName, Vec<ComponentName>>,
}

impl Subgraph {
    /// Selected components, in selection order.
    pub fn members(&self) -> &[ComponentName] {
        &self.members
    }

    pub fn contains(&self, name: &str) -> bool {
        self.deps.contains_key(name)
    }

    /// Prerequisites of `name` that are themselves selected.
    pub fn dependencies_of(&self, name: &str) -> &[ComponentName] {
        self.deps.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Selected components that list `name` as a prerequisite.
    pub fn dependents_of(&self, name: &str) -> &[ComponentName] {
        self.dependents.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

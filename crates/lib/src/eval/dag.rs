//! Module dependency graph.
//!
//! Edges run from a dependency to its dependent, so a topological order
//! generates every module after the modules it uses.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::blueprint::BlueprintError;

/// A DAG over module names.
#[derive(Debug)]
pub struct ModuleGraph {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
  /// Build the graph from `(name, dependencies)` pairs in declaration order.
  ///
  /// Dependencies on names that are not declared get no edge; they are
  /// reported by the module that needs them when it generates.
  ///
  /// # Errors
  ///
  /// [`BlueprintError::Cycle`] if the dependencies form a cycle.
  pub fn new<'a>(modules: impl IntoIterator<Item = (&'a str, Vec<String>)>) -> Result<Self, BlueprintError> {
    let modules: Vec<_> = modules.into_iter().collect();
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for (name, _) in &modules {
      let idx = graph.add_node(name.to_string());
      nodes.insert(name.to_string(), idx);
    }

    for (name, deps) in &modules {
      let dependent = nodes[*name];
      for dep in deps {
        if let Some(&dependency) = nodes.get(dep) {
          graph.update_edge(dependency, dependent, ());
        }
      }
    }

    toposort(&graph, None).map_err(|cycle| BlueprintError::Cycle(graph[cycle.node_id()].clone()))?;

    Ok(Self { graph, nodes })
  }

  /// Module names in generation order.
  ///
  /// Among modules whose dependencies are all satisfied, the one declared
  /// first comes first, so the order is stable across runs.
  pub fn order(&self) -> Vec<&str> {
    let mut in_degree: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|idx| (idx, self.graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    let mut ready: BTreeSet<NodeIndex> = in_degree
      .iter()
      .filter(|(_, degree)| **degree == 0)
      .map(|(idx, _)| *idx)
      .collect();

    let mut order = Vec::with_capacity(self.graph.node_count());
    while let Some(idx) = ready.pop_first() {
      order.push(self.graph[idx].as_str());
      for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(degree) = in_degree.get_mut(&dependent) {
          *degree -= 1;
          if *degree == 0 {
            ready.insert(dependent);
          }
        }
      }
    }

    order
  }

  /// Declared modules `name` directly depends on.
  pub fn dependencies(&self, name: &str) -> Vec<&str> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };
    let mut deps: Vec<_> = self
      .graph
      .neighbors_directed(idx, Direction::Incoming)
      .map(|dep| self.graph[dep].as_str())
      .collect();
    deps.sort();
    deps
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }
}

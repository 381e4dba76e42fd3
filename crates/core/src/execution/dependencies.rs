//! Task dependency resolution
//!
//! This module turns the declared hooks into a linear execution order for a
//! requested task. Hooks become edges of a directed graph (`X -> Y` meaning X runs
//! before Y), restricted to the requested task's closure, which is then sorted
//! topologically. Ties are broken by registration order so plans are stable.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;
use tracing::debug;

use crate::registry::Registry;
use crate::types::{StagehandError, StagehandResult};

/// Resolve the ordered list of tasks to run for `requested`
pub fn resolve(registry: &Registry, requested: &str) -> StagehandResult<Vec<String>> {
    validate_references(registry, requested)?;

    let closure = collect_closure(registry, requested);
    let graph = build_hook_graph(registry, &closure);

    if let Some(cycle) = find_cycle(&graph) {
        return Err(StagehandError::CyclicDependency(cycle));
    }

    let order = sort_stable(&graph)?;
    debug!(task = requested, order = ?order, "resolved execution order");
    Ok(order)
}

/// Every hook must name registered tasks, and so must the request itself
fn validate_references(registry: &Registry, requested: &str) -> StagehandResult<()> {
    if !registry.contains(requested) {
        return Err(StagehandError::UnknownTask(requested.to_string()));
    }

    for hook in registry.hooks() {
        for name in [&hook.target, &hook.task] {
            if !registry.contains(name) {
                return Err(StagehandError::UnknownTask(name.clone()));
            }
        }
    }

    Ok(())
}

/// The requested task plus everything hooked onto it, transitively.
///
/// A task pulled in by an after-hook brings its own before-hooks along too.
fn collect_closure<'a>(registry: &'a Registry, requested: &'a str) -> HashSet<&'a str> {
    let mut closure = HashSet::new();
    let mut queue = VecDeque::from([requested]);

    while let Some(name) = queue.pop_front() {
        if !closure.insert(name) {
            continue;
        }

        for hook in registry.hooks().iter().filter(|h| h.target == name) {
            queue.push_back(hook.task.as_str());
        }
    }

    closure
}

/// Build the ordering graph. Nodes are added in registration order, so node
/// indices double as the tie-break key.
fn build_hook_graph<'a>(registry: &'a Registry, closure: &HashSet<&'a str>) -> DiGraph<&'a str, ()> {
    let mut graph = DiGraph::<&str, ()>::new();
    let mut node_indices = HashMap::new();

    for task in registry.tasks().filter(|t| closure.contains(t.name.as_str())) {
        let node_index = graph.add_node(task.name.as_str());
        node_indices.insert(task.name.as_str(), node_index);
    }

    for hook in registry.hooks() {
        let (first, second) = hook.edge();
        if let (Some(&from), Some(&to)) = (node_indices.get(first), node_indices.get(second)) {
            graph.update_edge(from, to, ());
        }
    }

    graph
}

/// Find one cycle, reported as a path starting at its earliest-registered task
fn find_cycle(graph: &DiGraph<&str, ()>) -> Option<Vec<String>> {
    let mut cyclic_components: Vec<Vec<NodeIndex>> = kosaraju_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|mut component| {
            component.sort();
            component
        })
        .collect();

    cyclic_components.sort();
    let component = cyclic_components.into_iter().next()?;
    let path = trace_cycle(graph, &component);

    Some(path.into_iter().map(|node| graph[node].to_string()).collect())
}

/// Walk a strongly connected component from its first node back to itself
fn trace_cycle(graph: &DiGraph<&str, ()>, component: &[NodeIndex]) -> Vec<NodeIndex> {
    let start = component[0];
    let members: HashSet<NodeIndex> = component.iter().copied().collect();
    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        let mut neighbors: Vec<NodeIndex> = graph.neighbors(node).collect();
        neighbors.sort();

        for neighbor in neighbors {
            if neighbor == start {
                let mut path = vec![node];
                let mut current = node;
                while let Some(&parent) = parents.get(&current) {
                    path.push(parent);
                    current = parent;
                }
                path.reverse();
                return path;
            }
            if members.contains(&neighbor) && neighbor != start && !parents.contains_key(&neighbor) {
                parents.insert(neighbor, node);
                queue.push_back(neighbor);
            }
        }
    }

    // Unreachable for a genuine SCC; fall back to listing its members
    component.to_vec()
}

/// Kahn's algorithm, always taking the earliest-registered ready task
fn sort_stable(graph: &DiGraph<&str, ()>) -> StagehandResult<Vec<String>> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|node| (node, graph.neighbors_directed(node, Incoming).count()))
        .collect();

    let mut ready: BTreeSet<NodeIndex> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(&node, _)| node)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(node) = ready.pop_first() {
        order.push(graph[node].to_string());

        for next in graph.neighbors(node) {
            if let Some(degree) = in_degree.get_mut(&next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(next);
                }
            }
        }
    }

    if order.len() != graph.node_count() {
        let stuck: Vec<String> = graph
            .node_indices()
            .filter(|node| in_degree.get(node).is_some_and(|&d| d > 0))
            .map(|node| graph[node].to_string())
            .collect();
        return Err(StagehandError::CyclicDependency(stuck));
    }

    Ok(order)
}

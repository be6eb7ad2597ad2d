//! Different ways of describing edges, all reduced to [`crate::sort`].

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use itertools::Itertools;

use crate::error::SortError;
use crate::graph::Graph;
use crate::tsort::sort;

/// Something that can list its nodes and look up the edges of each one.
pub trait DependencyGraph<T> {
    /// Every node of the graph, each exactly once.
    fn nodes(&self) -> Vec<T>;

    /// The nodes `node` depends on, or `None` if the graph can't tell.
    fn edges(&self, node: &T) -> Option<Vec<T>>;
}

impl<T: Clone + Eq + Hash> DependencyGraph<T> for Graph<T> {
    fn nodes(&self) -> Vec<T> {
        self.values().to_vec()
    }

    fn edges(&self, node: &T) -> Option<Vec<T>> {
        Graph::edges(self, node)
    }
}

/// Keys in map order followed by dependencies that have no key of their own.
/// Missing keys mean no edges.
impl<T: Clone + Ord + Hash> DependencyGraph<T> for BTreeMap<T, Vec<T>> {
    fn nodes(&self) -> Vec<T> {
        let extra = self
            .values()
            .flatten()
            .filter(|v| !self.contains_key(*v))
            .unique();
        self.keys().chain(extra).cloned().collect()
    }

    fn edges(&self, node: &T) -> Option<Vec<T>> {
        Some(self.get(node).cloned().unwrap_or_default())
    }
}

pub fn sort_graph<T, G>(graph: &G) -> Result<Vec<T>, SortError<T>>
where
    T: Clone + Debug + Eq + Hash,
    G: DependencyGraph<T> + ?Sized,
{
    sort(graph.nodes(), |n| graph.edges(n))
}

/// Sorts with an edges factory that also gets to see every node, which helps
/// when edges are derived from properties of the other nodes.
pub fn sort_with<T, F, I>(nodes: &[T], mut factory: F) -> Result<Vec<T>, SortError<T>>
where
    T: Clone + Debug + Eq + Hash,
    F: FnMut(&T, &[T]) -> Option<I>,
    I: IntoIterator<Item = T>,
{
    sort(nodes.iter().cloned(), |n| factory(n, nodes))
}

pub fn sort_map<T>(deps: &BTreeMap<T, Vec<T>>) -> Result<Vec<T>, SortError<T>>
where
    T: Clone + Debug + Ord + Hash,
{
    sort_graph(deps)
}

/// Like [`sort_with`], but reorders `nodes` itself. On error `nodes` is left
/// as it was.
pub fn sort_in_place<T, F, I>(nodes: &mut Vec<T>, factory: F) -> Result<(), SortError<T>>
where
    T: Clone + Debug + Eq + Hash,
    F: FnMut(&T, &[T]) -> Option<I>,
    I: IntoIterator<Item = T>,
{
    *nodes = sort_with(nodes, factory)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Violation};
    use crate::graph::graph_of;

    #[test]
    fn test_sort_graph_five_nodes() {
        let graph = graph_of([("c", vec!["b"]), ("d", vec!["c", "a"]), ("e", vec!["d", "b"])]);
        assert_eq!(sort_graph(&graph), Ok(vec!["b", "c", "a", "d", "e"]));
    }

    #[test]
    fn test_sort_graph_cycle() {
        let graph = graph_of([("a", vec!["b"]), ("b", vec!["a"])]);
        let err = sort_graph(&graph).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CycleDetected);
    }

    #[test]
    fn test_map_nodes_include_dependencies() {
        let deps: BTreeMap<&str, Vec<&str>> =
            [("b", vec!["z", "a"]), ("c", vec!["z"])].into_iter().collect();
        assert_eq!(deps.nodes(), vec!["b", "c", "z", "a"]);
        assert_eq!(DependencyGraph::edges(&deps, &"a"), Some(vec![]));
    }

    #[test]
    fn test_sort_map() {
        let deps: BTreeMap<&str, Vec<&str>> =
            [("a", vec!["c"]), ("b", vec!["a"])].into_iter().collect();
        assert_eq!(sort_map(&deps), Ok(vec!["c", "a", "b"]));
    }

    #[test]
    fn test_sort_with_sees_all_nodes() {
        // Every number depends on its proper divisors in the list.
        let nodes = [12, 2, 6, 3, 1];
        let sorted = sort_with(&nodes, |n, all| {
            Some(
                all.iter()
                    .copied()
                    .filter(|d| d != n && n % d == 0)
                    .collect::<Vec<_>>(),
            )
        });
        assert_eq!(sorted, Ok(vec![1, 2, 3, 6, 12]));
    }

    #[test]
    fn test_sort_in_place() {
        let mut nodes = vec!["a", "b"];
        sort_in_place(&mut nodes, |n, _| Some(if *n == "a" { vec!["b"] } else { vec![] }))
            .unwrap();
        assert_eq!(nodes, vec!["b", "a"]);
    }

    #[test]
    fn test_sort_in_place_leaves_input_on_error() {
        let mut nodes = vec!["a", "b"];
        let err = sort_in_place(&mut nodes, |n, _| {
            if *n == "a" {
                Some(vec!["b"])
            } else {
                None
            }
        })
        .unwrap_err();
        assert_eq!(err, SortError::ContractViolation(Violation::MissingEdges("b")));
        assert_eq!(nodes, vec!["a", "b"]);
    }
}

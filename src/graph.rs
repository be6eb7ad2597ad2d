use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap},
    hash::Hash,
};

/// A `node dependency` pair: `self.0` needs `self.1` to come first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T: Clone>(pub T, pub T);

impl<T: Clone> Edge<T> {
    pub fn invert(&self) -> Self {
        Edge(self.1.clone(), self.0.clone())
    }
}

/// Dependency map fixed at construction time.
///
/// Nodes are kept in order of first appearance, whether they show up as a key
/// or only as somebody's dependency. Nodes without an entry have no edges.
#[derive(Debug, Clone)]
pub struct Graph<T: Clone + Eq + Hash> {
    values: Vec<T>,
    value_to_index: HashMap<T, usize>,
    deps: HashMap<usize, Vec<usize>>,
}

impl<T: Clone + Eq + Hash> Default for Graph<T> {
    fn default() -> Self {
        Graph {
            values: Vec::new(),
            value_to_index: HashMap::new(),
            deps: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> FromIterator<Edge<T>> for Graph<T> {
    fn from_iter<I: IntoIterator<Item = Edge<T>>>(iter: I) -> Self {
        Self::from_deps(iter.into_iter().map(|e| (e.0, vec![e.1])))
    }
}

impl<T: Clone + Eq + Hash> From<BTreeMap<T, Vec<T>>> for Graph<T> {
    fn from(deps: BTreeMap<T, Vec<T>>) -> Self {
        Self::from_deps(deps)
    }
}

/// Builds a [`Graph`] from `(node, dependencies)` pairs.
///
/// ```
/// use toposorter::{graph_of, sort_graph};
///
/// let graph = graph_of([("a", vec!["b"]), ("c", vec!["a", "b"])]);
/// assert_eq!(sort_graph(&graph).unwrap(), vec!["b", "a", "c"]);
/// ```
pub fn graph_of<T, I>(pairs: I) -> Graph<T>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = (T, Vec<T>)>,
{
    Graph::from_deps(pairs)
}

impl<T: Clone + Eq + Hash> Graph<T> {
    /// Repeated keys append to the dependencies already recorded for the node.
    pub fn from_deps<I: IntoIterator<Item = (T, Vec<T>)>>(iter: I) -> Self {
        let mut graph = Graph::<T>::default();
        for (node, tos) in iter {
            let from = graph.index_of(node);
            let tos: Vec<usize> = tos.into_iter().map(|to| graph.index_of(to)).collect();
            match graph.deps.entry(from) {
                Entry::Occupied(mut o) => o.get_mut().extend(tos),
                Entry::Vacant(v) => {
                    v.insert(tos);
                }
            };
        }
        graph
    }

    fn index_of(&mut self, k: T) -> usize {
        match self.value_to_index.entry(k) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                let i = self.values.len();
                self.values.push(v.key().clone());
                v.insert(i);
                i
            }
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `None` if `node` isn't part of the graph.
    pub fn edges(&self, node: &T) -> Option<Vec<T>> {
        let i = self.value_to_index.get(node)?;
        let tos = self.deps.get(i).map(Vec::as_slice).unwrap_or_default();
        Some(tos.iter().map(|to| self.values[*to].clone()).collect())
    }

    pub fn to_edges(&self) -> Vec<Edge<T>> {
        let mut edges = vec![];
        for (from, k) in self.values.iter().enumerate() {
            let Some(tos) = self.deps.get(&from) else { continue; };
            for to in tos {
                edges.push(Edge(k.clone(), self.values[*to].clone()))
            }
        }
        edges
    }

    /// Flips every edge. Node order and isolated nodes are preserved.
    pub fn invert(&self) -> Self {
        let nodes = self.values.iter().map(|v| (v.clone(), vec![]));
        let edges = self.to_edges().into_iter().map(|e| {
            let Edge(from, to) = e.invert();
            (from, vec![to])
        });
        Self::from_deps(nodes.chain(edges))
    }

    pub fn to_btree_map(&self) -> BTreeMap<T, Vec<T>>
    where
        T: Ord,
    {
        self.values
            .iter()
            .map(|v| (v.clone(), self.edges(v).unwrap_or_default()))
            .collect()
    }
}

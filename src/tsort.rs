use std::collections::{hash_map::Entry, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, trace};

use crate::error::{SortError, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Orders `nodes` so that every node comes after the nodes returned by
/// `edges_of` for it.
///
/// Roots are taken in the order `nodes` yields them and dependencies are
/// followed in the order `edges_of` yields them, so the result only depends on
/// those two orders. Returning `None` from `edges_of` is reported as
/// [`Violation::MissingEdges`].
///
/// The depth-first walk keeps its own stack, so long dependency chains don't
/// grow the call stack.
pub fn sort<T, N, F, I>(nodes: N, mut edges_of: F) -> Result<Vec<T>, SortError<T>>
where
    T: Clone + Debug + Eq + Hash,
    N: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<I>,
    I: IntoIterator<Item = T>,
{
    let mut roots: Vec<T> = vec![];
    let mut marks: HashMap<T, Mark> = HashMap::new();
    for n in nodes {
        match marks.entry(n.clone()) {
            Entry::Occupied(_) => {
                return Err(SortError::InvalidArgument(format!(
                    "node {:?} appears more than once",
                    n
                )));
            }
            Entry::Vacant(v) => {
                v.insert(Mark::Unvisited);
            }
        }
        roots.push(n);
    }
    debug!("sorting {} nodes", roots.len());

    let mut sorted: Vec<T> = Vec::with_capacity(roots.len());
    let mut stack: Vec<(T, I::IntoIter)> = vec![];
    for root in roots {
        if marks.get(&root) == Some(&Mark::Done) {
            continue;
        }
        stack.push(enter(root, &mut marks, &mut edges_of)?);
        while let Some(frame) = stack.last_mut() {
            let Some(next) = frame.1.next() else {
                let Some((node, _)) = stack.pop() else { break; };
                marks.insert(node.clone(), Mark::Done);
                trace!("sorted {:?}", node);
                sorted.push(node);
                continue;
            };
            match marks.get(&next).copied() {
                Some(Mark::Done) => {}
                Some(Mark::Unvisited) => {
                    stack.push(enter(next, &mut marks, &mut edges_of)?);
                }
                Some(Mark::InProgress) => {
                    // Only nodes on the stack are marked in progress.
                    let start = stack.iter().position(|(n, _)| *n == next);
                    debug_assert!(start.is_some(), "{:?} in progress but not on the stack", next);
                    let start = start.unwrap_or(0);
                    let cycle = stack[start..].iter().map(|(n, _)| n.clone()).collect();
                    debug!("cycle detected at {:?}", next);
                    return Err(SortError::CycleDetected { node: next, cycle });
                }
                None => {
                    return Err(Violation::UnknownNode {
                        from: frame.0.clone(),
                        to: next,
                    }
                    .into());
                }
            }
        }
    }
    debug!("sorted {} nodes", sorted.len());
    Ok(sorted)
}

fn enter<T, F, I>(
    node: T,
    marks: &mut HashMap<T, Mark>,
    edges_of: &mut F,
) -> Result<(T, I::IntoIter), SortError<T>>
where
    T: Clone + Debug + Eq + Hash,
    F: FnMut(&T) -> Option<I>,
    I: IntoIterator<Item = T>,
{
    marks.insert(node.clone(), Mark::InProgress);
    let Some(edges) = edges_of(&node) else {
        return Err(Violation::MissingEdges(node).into());
    };
    Ok((node, edges.into_iter()))
}

//! Topological sorting of dependency graphs with cycle detection.
//!
//! Nodes are ordered so that everything a node depends on comes before it:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let deps = HashMap::from([("app", vec!["db", "log"]), ("db", vec!["log"])]);
//! let order = toposorter::sort(["app", "db", "log"], |n| {
//!     Some(deps.get(n).cloned().unwrap_or_default())
//! })
//! .unwrap();
//! assert_eq!(order, vec!["log", "db", "app"]);
//! ```

pub mod adapters;
pub mod error;
pub mod graph;
mod tsort;

pub use adapters::{sort_graph, sort_in_place, sort_map, sort_with, DependencyGraph};
pub use error::{ErrorKind, SortError, Violation};
pub use graph::{graph_of, Edge, Graph};
pub use tsort::sort;

//! Pathfinding algorithms
//!
//! BFS (unweighted shortest path and hop distances), Dijkstra (weighted
//! shortest path), reachability, and all-simple-paths enumeration.

use super::common::{AlgoError, AlgoResult, Direction, GraphView};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Node indices from source to target, both included
    pub path: Vec<usize>,
    /// Hop count for BFS, summed edge weight for Dijkstra
    pub cost: f64,
}

impl PathResult {
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Breadth-First Search (Unweighted Shortest Path)
///
/// Neighbors are discovered in adjacency order, so among equally short
/// paths the one whose branch choices come first wins.
pub fn bfs(view: &GraphView, source: usize, target: usize, direction: Direction) -> Option<PathResult> {
    if source == target {
        return Some(PathResult {
            path: vec![source],
            cost: 0.0,
        });
    }

    let mut parent: Vec<Option<usize>> = vec![None; view.node_count];
    let mut visited = vec![false; view.node_count];
    let mut queue = VecDeque::new();

    visited[source] = true;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for next in view.neighbors(current, direction) {
            if visited[next] {
                continue;
            }
            visited[next] = true;
            parent[next] = Some(current);

            if next == target {
                let path = reconstruct(&parent, target);
                return Some(PathResult {
                    cost: (path.len() - 1) as f64,
                    path,
                });
            }
            queue.push_back(next);
        }
    }

    None
}

/// Hop distance from `source` to every node it reaches within `max_depth`
/// hops (unbounded when `None`). Unreached nodes are `None`; the source
/// itself is `Some(0)`.
pub fn bfs_distances(
    view: &GraphView,
    source: usize,
    direction: Direction,
    max_depth: Option<usize>,
) -> Vec<Option<usize>> {
    let mut dist: Vec<Option<usize>> = vec![None; view.node_count];
    let mut queue = VecDeque::new();

    dist[source] = Some(0);
    queue.push_back((source, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        if max_depth.is_some_and(|limit| depth >= limit) {
            continue;
        }
        for next in view.neighbors(current, direction) {
            if dist[next].is_none() {
                dist[next] = Some(depth + 1);
                queue.push_back((next, depth + 1));
            }
        }
    }

    dist
}

/// Whether `target` is reachable from `source`. Stops at the first sighting
/// of the target and never records parents.
pub fn has_path(view: &GraphView, source: usize, target: usize, direction: Direction) -> bool {
    if source == target {
        return true;
    }

    let mut visited = vec![false; view.node_count];
    let mut queue = VecDeque::new();
    visited[source] = true;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for next in view.neighbors(current, direction) {
            if next == target {
                return true;
            }
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    false
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    seq: usize,
    node: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap; equal costs pop in push order
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's Algorithm (Weighted Shortest Path)
///
/// Fails with [`AlgoError::NegativeWeight`] as soon as it relaxes an edge
/// whose weight is below zero.
pub fn dijkstra(
    view: &GraphView,
    source: usize,
    target: usize,
    direction: Direction,
) -> AlgoResult<Option<PathResult>> {
    let mut dist = vec![f64::INFINITY; view.node_count];
    let mut parent: Vec<Option<usize>> = vec![None; view.node_count];
    let mut settled = vec![false; view.node_count];
    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;

    dist[source] = 0.0;
    heap.push(State { cost: 0.0, seq, node: source });

    while let Some(State { cost, node, .. }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        if node == target {
            return Ok(Some(PathResult {
                path: reconstruct(&parent, target),
                cost,
            }));
        }

        for arc in view.arcs(node, direction) {
            if arc.weight < 0.0 {
                return Err(AlgoError::NegativeWeight {
                    edge: arc.edge,
                    weight: arc.weight,
                });
            }
            let next_cost = cost + arc.weight;
            if next_cost < dist[arc.node] {
                dist[arc.node] = next_cost;
                parent[arc.node] = Some(node);
                seq += 1;
                heap.push(State {
                    cost: next_cost,
                    seq,
                    node: arc.node,
                });
            }
        }
    }

    Ok(None)
}

/// Enumerate every simple path from `source` to `target` of at most
/// `max_depth` edges (unbounded when `None`).
///
/// Depth-first with a path-local visited set, so a node may appear on
/// several branches. Paths come out in the order of the branch choices
/// taken at each step, following adjacency order. Parallel edges yield one
/// path, not one per edge.
pub fn all_simple_paths(
    view: &GraphView,
    source: usize,
    target: usize,
    direction: Direction,
    max_depth: Option<usize>,
) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    let cutoff = max_depth.unwrap_or(view.node_count.saturating_sub(1));
    if source == target || cutoff == 0 {
        return paths;
    }

    let mut on_path = vec![false; view.node_count];
    let mut path = vec![source];
    on_path[source] = true;
    let mut stack = vec![view.distinct_neighbors(source, direction).into_iter()];

    while let Some(children) = stack.last_mut() {
        match children.next() {
            Some(child) => {
                if on_path[child] {
                    continue;
                }
                if child == target {
                    let mut found = path.clone();
                    found.push(child);
                    paths.push(found);
                } else if path.len() < cutoff {
                    on_path[child] = true;
                    path.push(child);
                    stack.push(view.distinct_neighbors(child, direction).into_iter());
                }
            }
            None => {
                stack.pop();
                if let Some(last) = path.pop() {
                    on_path[last] = false;
                }
            }
        }
    }

    paths
}

fn reconstruct(parent: &[Option<usize>], target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = parent[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// lb(0) -> s1(1), lb -> s2(2), s1 -> db(3), s2 -> db
    fn diamond() -> GraphView {
        GraphView::from_edges(4, true, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 5.0), (2, 3, 1.0)])
    }

    #[test]
    fn test_bfs() {
        // 1->2->3
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (1, 2, 1.0)]);

        let result = bfs(&view, 0, 2, Direction::Outgoing).unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.cost, 2.0);
        assert!(bfs(&view, 2, 0, Direction::Outgoing).is_none());
        assert_eq!(bfs(&view, 2, 0, Direction::Incoming).unwrap().path, vec![2, 1, 0]);
    }

    #[test]
    fn test_bfs_tie_break_follows_adjacency_order() {
        let result = bfs(&diamond(), 0, 3, Direction::Outgoing).unwrap();
        assert_eq!(result.path, vec![0, 1, 3]);
        assert_eq!(result.hops(), 2);
    }

    #[test]
    fn test_dijkstra() {
        // 1->2 (10.0), 2->3 (5.0), 1->3 (50.0)
        let view = GraphView::from_edges(3, true, &[(0, 1, 10.0), (0, 2, 50.0), (1, 2, 5.0)]);

        let result = dijkstra(&view, 0, 2, Direction::Outgoing).unwrap().unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.cost, 15.0);
    }

    #[test]
    fn test_dijkstra_prefers_lighter_branch() {
        let result = dijkstra(&diamond(), 0, 3, Direction::Outgoing).unwrap().unwrap();
        assert_eq!(result.path, vec![0, 2, 3]);
        assert_eq!(result.cost, 2.0);
    }

    #[test]
    fn test_dijkstra_rejects_negative_weight() {
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (1, 2, -2.0)]);
        let err = dijkstra(&view, 0, 2, Direction::Outgoing).unwrap_err();
        assert_eq!(err, AlgoError::NegativeWeight { edge: 1, weight: -2.0 });
    }

    #[test]
    fn test_dijkstra_unreachable() {
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0)]);
        assert_eq!(dijkstra(&view, 0, 2, Direction::Outgoing).unwrap(), None);
    }

    #[test]
    fn test_bfs_distances_respect_depth_limit() {
        // chain 0->1->2->3
        let view = GraphView::from_edges(4, true, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);

        let dist = bfs_distances(&view, 0, Direction::Outgoing, Some(2));
        assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);

        let dist = bfs_distances(&view, 3, Direction::Incoming, None);
        assert_eq!(dist, vec![Some(3), Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_has_path() {
        let view = diamond();
        assert!(has_path(&view, 0, 3, Direction::Outgoing));
        assert!(!has_path(&view, 3, 0, Direction::Outgoing));
        assert!(has_path(&view, 3, 0, Direction::Both));
        assert!(has_path(&view, 2, 2, Direction::Outgoing));
    }

    #[test]
    fn test_all_simple_paths_order_and_cutoff() {
        let view = diamond();
        let paths = all_simple_paths(&view, 0, 3, Direction::Outgoing, None);
        assert_eq!(paths, vec![vec![0, 1, 3], vec![0, 2, 3]]);

        assert!(all_simple_paths(&view, 0, 3, Direction::Outgoing, Some(1)).is_empty());
        assert_eq!(all_simple_paths(&view, 0, 3, Direction::Outgoing, Some(2)).len(), 2);
    }

    #[test]
    fn test_all_simple_paths_in_cycle() {
        // 0->1, 1->2, 2->0, 0->2
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (0, 2, 1.0)]);
        let paths = all_simple_paths(&view, 0, 2, Direction::Outgoing, None);
        assert_eq!(paths, vec![vec![0, 1, 2], vec![0, 2]]);
    }

    #[test]
    fn test_all_simple_paths_collapse_parallel_edges() {
        let view = GraphView::from_edges(2, true, &[(0, 1, 1.0), (0, 1, 2.0)]);
        assert_eq!(all_simple_paths(&view, 0, 1, Direction::Outgoing, None), vec![vec![0, 1]]);
    }
}

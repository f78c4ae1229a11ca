//! Graph topology analysis algorithms
//!
//! Triangle counting, clustering coefficients, cycle detection, density and
//! all-pairs distance summaries (eccentricity, diameter, radius, average
//! path length).

use super::common::{Direction, GraphView};
use super::pathfinding::bfs_distances;
use rustc_hash::FxHashSet;

/// Undirected simple adjacency: distinct neighbors, self excluded.
fn simple_neighbors(view: &GraphView) -> Vec<FxHashSet<usize>> {
    (0..view.node_count)
        .map(|u| {
            view.neighbors(u, Direction::Both)
                .filter(|&v| v != u)
                .collect()
        })
        .collect()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph, each counted once.
/// Direction, self-loops and parallel edges are ignored.
pub fn count_triangles(view: &GraphView) -> usize {
    let neighbors = simple_neighbors(view);
    let mut triangle_count = 0;

    // Only count u < v < w so every triangle is seen once
    for u in 0..view.node_count {
        for &v in &neighbors[u] {
            if v <= u {
                continue;
            }
            triangle_count += neighbors[v]
                .iter()
                .filter(|&&w| w > v && neighbors[u].contains(&w))
                .count();
        }
    }

    triangle_count
}

/// Local clustering coefficient per node: the fraction of neighbor pairs that
/// are themselves adjacent. `None` for nodes with fewer than two distinct
/// neighbors.
pub fn local_clustering(view: &GraphView) -> Vec<Option<f64>> {
    let neighbors = simple_neighbors(view);

    neighbors
        .iter()
        .map(|around| {
            let k = around.len();
            if k < 2 {
                return None;
            }
            let links = around
                .iter()
                .flat_map(|&a| around.iter().map(move |&b| (a, b)))
                .filter(|&(a, b)| a < b && neighbors[a].contains(&b))
                .count();
            Some(2.0 * links as f64 / (k * (k - 1)) as f64)
        })
        .collect()
}

/// Mean local clustering over the nodes where it is defined; zero when no
/// node has two neighbors.
pub fn average_clustering(view: &GraphView) -> f64 {
    let defined: Vec<f64> = local_clustering(view).into_iter().flatten().collect();
    if defined.is_empty() {
        0.0
    } else {
        defined.iter().sum::<f64>() / defined.len() as f64
    }
}

/// Edge density. E / (N(N-1)) directed, E / (N(N-1)/2) undirected, zero
/// below two nodes.
pub fn density(view: &GraphView) -> f64 {
    let n = view.node_count as f64;
    if view.node_count < 2 {
        return 0.0;
    }
    let pairs = n * (n - 1.0);
    let edges = view.edge_count() as f64;
    if view.directed {
        edges / pairs
    } else {
        2.0 * edges / pairs
    }
}

/// Whether the graph contains a cycle.
///
/// Directed graphs look for a DFS back edge, so a self-loop counts.
/// Undirected graphs count a self-loop, a parallel edge or any edge that
/// closes a loop in the DFS forest; walking back over the tree edge we
/// arrived by does not.
pub fn has_cycle(view: &GraphView) -> bool {
    if view.directed {
        directed_cycle(view)
    } else {
        undirected_cycle(view)
    }
}

const WHITE: u8 = 0;
const GRAY: u8 = 1;
const BLACK: u8 = 2;

fn directed_cycle(view: &GraphView) -> bool {
    let n = view.node_count;
    let mut color = vec![WHITE; n];

    for root in 0..n {
        if color[root] != WHITE {
            continue;
        }
        color[root] = GRAY;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (v, next) = *frame;
            let successors = view.successors(v);
            if next < successors.len() {
                frame.1 += 1;
                let w = successors[next];
                match color[w] {
                    GRAY => return true,
                    WHITE => {
                        color[w] = GRAY;
                        stack.push((w, 0));
                    }
                    _ => {}
                }
            } else {
                color[v] = BLACK;
                stack.pop();
            }
        }
    }

    false
}

fn undirected_cycle(view: &GraphView) -> bool {
    let n = view.node_count;
    let mut visited = vec![false; n];

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        // (node, edge it was reached by)
        let mut stack: Vec<(usize, Option<usize>)> = vec![(root, None)];

        while let Some((v, via)) = stack.pop() {
            for arc in view.arcs(v, Direction::Both) {
                if Some(arc.edge) == via {
                    continue;
                }
                if arc.node == v || visited[arc.node] {
                    return true;
                }
                visited[arc.node] = true;
                stack.push((arc.node, Some(arc.edge)));
            }
        }
    }

    false
}

/// All-pairs hop-distance summary
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSummary {
    /// Greatest distance from each node to any other node
    pub eccentricity: Vec<usize>,
    pub diameter: usize,
    pub radius: usize,
    /// Mean over ordered pairs of distinct nodes
    pub average_path_length: f64,
}

/// BFS from every node following edge direction.
///
/// Returns `None` for the empty graph or when some node cannot reach some
/// other node. A single node yields zero diameter and radius.
pub fn distance_summary(view: &GraphView) -> Option<DistanceSummary> {
    let n = view.node_count;
    if n == 0 {
        return None;
    }

    let mut eccentricity = Vec::with_capacity(n);
    let mut total: usize = 0;

    for source in 0..n {
        let mut farthest = 0;
        for d in bfs_distances(view, source, Direction::Outgoing, None) {
            let d = d?;
            farthest = farthest.max(d);
            total += d;
        }
        eccentricity.push(farthest);
    }

    let diameter = eccentricity.iter().copied().max().unwrap_or(0);
    let radius = eccentricity.iter().copied().min().unwrap_or(0);
    let average_path_length = if n > 1 {
        total as f64 / (n * (n - 1)) as f64
    } else {
        0.0
    };

    Some(DistanceSummary {
        eccentricity,
        diameter,
        radius,
        average_path_length,
    })
}

//! Component decomposition
//!
//! Weakly connected components via union-find, strongly connected
//! components via Tarjan's algorithm. Both run in O(V + E).

use super::common::GraphView;

/// A partition of the nodes into components.
///
/// `groups` is ordered by descending size, ties broken by the smallest node
/// index in the group. Members inside a group are ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    /// Member node indices of each component
    pub groups: Vec<Vec<usize>>,
    /// Component position (in `groups`) of each node
    pub node_component: Vec<usize>,
}

impl Components {
    /// Group nodes by an arbitrary per-node label and put the groups in
    /// canonical order.
    fn from_labels(labels: &[usize]) -> Self {
        let mut slot_of_label = vec![usize::MAX; labels.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for (node, &label) in labels.iter().enumerate() {
            if slot_of_label[label] == usize::MAX {
                slot_of_label[label] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot_of_label[label]].push(node);
        }

        // Members are pushed in ascending order, so group[0] is the minimum
        groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

        let mut node_component = vec![0; labels.len()];
        for (position, group) in groups.iter().enumerate() {
            for &node in group {
                node_component[node] = position;
            }
        }

        Components {
            groups,
            node_component,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        // Iterative with path halving; recursion would overflow on long chains
        let mut current = i;
        while self.parent[current] != current {
            self.parent[current] = self.parent[self.parent[current]];
            current = self.parent[current];
        }
        current
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction; isolated nodes form singleton components. On an
/// undirected view these are the connected components.
pub fn weakly_connected_components(view: &GraphView) -> Components {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    // Iterate all edges and Union connected nodes
    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let labels: Vec<usize> = (0..n).map(|i| uf.find(i)).collect();
    Components::from_labels(&labels)
}

const UNVISITED: usize = usize::MAX;

/// Strongly Connected Components (Tarjan)
///
/// Two nodes share a component iff each reaches the other following edge
/// direction. The DFS keeps an explicit call stack of `(node, next arc)`
/// frames so deep graphs cannot overflow the thread stack.
pub fn strongly_connected_components(view: &GraphView) -> Components {
    let n = view.node_count;
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut labels = vec![0usize; n];
    let mut next_index = 0usize;
    let mut next_label = 0usize;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        let mut calls: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = calls.last_mut() {
            let v = frame.0;
            let successors = view.successors(v);

            if frame.1 < successors.len() {
                let w = successors[frame.1];
                frame.1 += 1;

                if index[w] == UNVISITED {
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    calls.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
            } else {
                calls.pop();
                if let Some(&(parent, _)) = calls.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }

                if lowlink[v] == index[v] {
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        labels[w] = next_label;
                        if w == v {
                            break;
                        }
                    }
                    next_label += 1;
                }
            }
        }
    }

    Components::from_labels(&labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wcc() {
        // Nodes: 0..6
        // Edges: 0->1, 2->3->4, 5 (isolated)
        let view = GraphView::from_edges(6, true, &[(0, 1, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);

        let result = weakly_connected_components(&view);

        assert_eq!(result.len(), 3);
        assert_eq!(result.groups, vec![vec![2, 3, 4], vec![0, 1], vec![5]]);
        assert_eq!(result.node_component[0], result.node_component[1]);
        assert_eq!(result.node_component[3], result.node_component[4]);
        assert_ne!(result.node_component[0], result.node_component[2]);
        assert_eq!(result.sizes().iter().sum::<usize>(), 6);
    }

    #[test]
    fn test_equal_sizes_break_ties_by_smallest_member() {
        // 3-4, 0-1, 2 alone, 5 alone
        let view = GraphView::from_edges(6, false, &[(3, 4, 1.0), (0, 1, 1.0)]);
        let result = weakly_connected_components(&view);
        assert_eq!(result.groups, vec![vec![0, 1], vec![3, 4], vec![2], vec![5]]);
    }

    #[test]
    fn test_scc_cycle_and_tail() {
        // 0->1->2->0 cycle, 2->3 tail, 3->4
        let view = GraphView::from_edges(
            5,
            true,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (2, 3, 1.0), (3, 4, 1.0)],
        );

        let result = strongly_connected_components(&view);
        assert_eq!(result.groups, vec![vec![0, 1, 2], vec![3], vec![4]]);
    }

    #[test]
    fn test_scc_dag_is_all_singletons() {
        let view = GraphView::from_edges(3, true, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        let result = strongly_connected_components(&view);
        assert_eq!(result.len(), 3);
        assert!(result.groups.iter().all(|g| g.len() == 1));
    }

    #[test]
    fn test_scc_two_cycles_joined_one_way() {
        // {0,1} cycle -> {2,3} cycle
        let view = GraphView::from_edges(
            4,
            true,
            &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 2, 1.0)],
        );
        let result = strongly_connected_components(&view);
        assert_eq!(result.groups, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::from_edges(0, true, &[]);
        assert!(weakly_connected_components(&view).is_empty());
        assert!(strongly_connected_components(&view).is_empty());
    }
}

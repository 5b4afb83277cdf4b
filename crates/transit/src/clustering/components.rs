//! Connected components over stop links.
//!
//! Linking is not transitive by itself: A may link to B and B to C while A
//! and C are too far apart. All three still belong to one cluster, so the
//! clusters are the connected components of the link graph, found here with
//! a union-find over the edge list.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::clustering::matcher::LinkEdge;
use crate::clustering::{Cluster, ClusterMap};
use crate::identifiers::StopIdentifier;

/// Disjoint sets over `0..n` with path compression and union by rank
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Point everything on the path straight at the root
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets of `a` and `b`; false if they were already one set
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Clusters formed by the connected components of `edges`
///
/// The result does not depend on edge order or orientation.
pub fn connected_components(edges: &[LinkEdge]) -> ClusterMap {
    let mut nodes: Vec<&StopIdentifier> = Vec::new();
    let mut index: HashMap<&StopIdentifier, usize> = HashMap::new();

    let mut pairs = Vec::with_capacity(edges.len());
    for edge in edges {
        let [a, b] = [edge.a(), edge.b()].map(|id| {
            *index.entry(id).or_insert_with(|| {
                nodes.push(id);
                nodes.len() - 1
            })
        });
        pairs.push((a, b));
    }

    let mut sets = UnionFind::new(nodes.len());
    for (a, b) in pairs {
        sets.union(a, b);
    }

    let mut components: BTreeMap<usize, BTreeSet<StopIdentifier>> = BTreeMap::new();
    for (i, id) in nodes.iter().enumerate() {
        components.entry(sets.find(i)).or_default().insert((*id).clone());
    }

    components
        .into_values()
        .filter_map(Cluster::from_members)
        .map(|cluster| (cluster.canonical.clone(), cluster))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn edge(a: &str, b: &str) -> LinkEdge {
        LinkEdge::new(a.into(), b.into())
    }

    fn members(clusters: &ClusterMap) -> Vec<Vec<String>> {
        clusters
            .values()
            .map(|c| c.members.iter().map(|id| id.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_union_find() {
        let mut sets = UnionFind::new(5);
        assert_eq!(sets.len(), 5);

        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert_eq!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(1), sets.find(3));

        assert!(sets.union(1, 4));
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(2), sets.find(0));
    }

    #[test]
    fn test_long_chain_is_one_cluster() {
        // E-D, D-C, C-B, B-A: four hops from A to E
        let edges = vec![edge("E", "D"), edge("D", "C"), edge("C", "B"), edge("B", "A")];

        let clusters = connected_components(&edges);
        assert_eq!(members(&clusters), vec![vec!["A", "B", "C", "D", "E"]]);
        assert!(clusters.contains_key(&StopIdentifier::new("A")));
    }

    #[test]
    fn test_shared_member_joins_pair_clusters() {
        // Pair-minimum keyed merging would give {1,2} and {2,3}
        let edges = vec![edge("1", "2"), edge("2", "3"), edge("7", "8")];

        let clusters = connected_components(&edges);
        assert_eq!(members(&clusters), vec![vec!["1", "2", "3"], vec!["7", "8"]]);
    }

    #[test]
    fn test_edge_order_does_not_matter() {
        let mut edges = vec![
            edge("s9", "s4"),
            edge("s4", "s1"),
            edge("s2", "s3"),
            edge("s5", "s6"),
            edge("s6", "s7"),
            edge("s3", "s8"),
            edge("s8", "s9"),
        ];
        let expected = connected_components(&edges);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            edges.shuffle(&mut rng);
            assert_eq!(connected_components(&edges), expected);
        }

        let keys: Vec<&str> = expected.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["s1", "s5"]);
    }

    #[test]
    fn test_no_edges_no_clusters() {
        assert!(connected_components(&[]).is_empty());
    }

    #[test]
    fn test_partition() {
        let edges = vec![edge("a", "b"), edge("c", "d"), edge("b", "c"), edge("x", "y")];
        let clusters = connected_components(&edges);

        let mut seen = BTreeSet::new();
        for cluster in clusters.values() {
            assert!(cluster.len() >= 2);
            assert_eq!(cluster.canonical, *cluster.members.first().unwrap());
            for id in &cluster.members {
                assert!(seen.insert(id.clone()), "{id} in two clusters");
            }
        }
        assert_eq!(seen.len(), 6);
    }
}

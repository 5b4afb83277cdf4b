//! R-tree nodes for spatial indexing of stops.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries over stops use two stages:
//! 1. **R-tree filter**: planar distance in degrees, with a radius widened
//!    for the longitude shrink at the highest latitude involved
//! 2. **Haversine filter**: exact great-circle distance on what survives
//!
//! Circles crossing the ±180° meridian are searched on both sides of it.
//! Near the poles the planar stage is skipped and every node is measured.

use std::collections::HashSet;

use geo::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::spatial::queries::{degree_radius_for, haversine_km};

// ============================================================================
// Stop Spatial Node
// ============================================================================

/// A located stop, referenced by its row index in the stop table
#[derive(Clone, Debug)]
pub struct StopNode {
    pub row: usize,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(location: Point, row: usize) -> Self {
        Self {
            row,
            point: [location.x(), location.y()],
        }
    }

    pub fn location(&self) -> Point {
        Point::new(self.point[0], self.point[1])
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ============================================================================
// Stop Index
// ============================================================================

pub struct StopIndex {
    tree: RTree<StopNode>,
    max_abs_lat: f64,
}

impl StopIndex {
    pub fn new(nodes: Vec<StopNode>) -> Self {
        let max_abs_lat = nodes
            .iter()
            .map(|n| n.point[1].abs())
            .fold(0.0, f64::max);

        Self {
            tree: RTree::bulk_load(nodes),
            max_abs_lat,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nodes within `radius_km` of `center`, with their distance in km
    pub fn within_km(&self, center: Point, radius_km: f64) -> Vec<(&StopNode, f64)> {
        let max_lat = self.max_abs_lat.max(center.y().abs());
        let measure = |node: &StopNode| {
            let dist = haversine_km(center, node.location());
            (dist <= radius_km).then_some(dist)
        };

        let Some(radius_deg) = degree_radius_for(radius_km, max_lat) else {
            return self
                .tree
                .iter()
                .filter_map(|node| measure(node).map(|dist| (node, dist)))
                .collect();
        };

        // Wrapped copies of the center reach nodes across the ±180° meridian
        let mut centers = vec![center.x()];
        if center.x() - radius_deg < -180.0 {
            centers.push(center.x() + 360.0);
        }
        if center.x() + radius_deg > 180.0 {
            centers.push(center.x() - 360.0);
        }

        let mut seen = HashSet::new();
        centers
            .into_iter()
            .flat_map(|x| {
                self.tree
                    .locate_within_distance([x, center.y()], radius_deg * radius_deg)
            })
            .filter(|node| seen.insert(node.row))
            .filter_map(|node| measure(node).map(|dist| (node, dist)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helsinki_index() -> StopIndex {
        StopIndex::new(vec![
            StopNode::new(Point::new(24.9415, 60.1709), 0), // Rautatientori
            StopNode::new(Point::new(24.9335, 60.1986), 1), // Pasila, ~3.2 km
            StopNode::new(Point::new(23.7730, 61.4981), 2), // Tampere, ~160 km
        ])
    }

    #[test]
    fn test_within_km() {
        let index = helsinki_index();
        assert_eq!(index.len(), 3);

        let center = Point::new(24.9415, 60.1709);
        let mut rows: Vec<usize> = index.within_km(center, 5.0).iter().map(|(n, _)| n.row).collect();
        rows.sort();
        assert_eq!(rows, vec![0, 1]);

        let mut rows: Vec<usize> = index.within_km(center, 200.0).iter().map(|(n, _)| n.row).collect();
        rows.sort();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_east_west_neighbours_are_found() {
        // 8 km due east at 60°N is ~0.14° of longitude, well past 8 km / 111 km
        let index = StopIndex::new(vec![
            StopNode::new(Point::new(24.0, 60.0), 0),
            StopNode::new(Point::new(24.1435, 60.0), 1),
        ]);

        let found = index.within_km(Point::new(24.0, 60.0), 8.5);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_antimeridian_neighbours_are_found() {
        // ~2.2 km apart across the date line in Fiji
        let index = StopIndex::new(vec![
            StopNode::new(Point::new(179.99, -17.0), 0),
            StopNode::new(Point::new(-179.99, -17.0), 1),
        ]);

        let found = index.within_km(Point::new(179.99, -17.0), 5.0);
        let mut rows: Vec<usize> = found.iter().map(|(n, _)| n.row).collect();
        rows.sort();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_polar_neighbours_are_found() {
        // Opposite meridians, 1° apart through the pole
        let index = StopIndex::new(vec![
            StopNode::new(Point::new(0.0, 89.5), 0),
            StopNode::new(Point::new(180.0, 89.5), 1),
            StopNode::new(Point::new(90.0, 70.0), 2),
        ]);

        let found = index.within_km(Point::new(0.0, 89.5), 120.0);
        let mut rows: Vec<usize> = found.iter().map(|(n, _)| n.row).collect();
        rows.sort();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_empty_index() {
        let index = StopIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.within_km(Point::new(0.0, 0.0), 10.0).is_empty());
    }
}

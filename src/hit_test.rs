//! Vertex hit testing.
//!
//! The scan is first-match, not nearest-match: completed polygons are
//! visited in collection order, then the in-progress polygon, each in vertex
//! order, and the first vertex inside the radius wins even if a later one is
//! closer.

use crate::model::Point;
use crate::store::{ShapeStore, VertexOwner};

/// A vertex found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHit {
    pub owner: VertexOwner,
    pub point_index: usize,
    pub point: Point,
}

/// Find the first vertex within `tolerance_px` canvas pixels of `point`.
///
/// `point` is in image space; the tolerance is divided by `scale` so the grab
/// radius looks the same at any zoom. Rectangles expose no vertices and are
/// skipped.
pub fn find_near_vertex(
    store: &ShapeStore,
    point: Point,
    tolerance_px: f64,
    scale: f64,
) -> Option<VertexHit> {
    let radius = tolerance_px / scale;

    let completed = store
        .shapes()
        .iter()
        .enumerate()
        .filter_map(|(i, shape)| shape.vertices().map(|v| (VertexOwner::Completed(i), v)));
    let in_progress = std::iter::once((VertexOwner::InProgress, store.in_progress()));

    completed.chain(in_progress).find_map(|(owner, vertices)| {
        vertices
            .iter()
            .enumerate()
            .find(|(_, v)| v.distance_to(&point) < radius)
            .map(|(point_index, v)| VertexHit {
                owner,
                point_index,
                point: *v,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rectangle;

    fn store_with(polygons: &[&[Point]], in_progress: &[Point]) -> ShapeStore {
        let mut store = ShapeStore::new();
        for polygon in polygons {
            for p in *polygon {
                store.add_vertex(*p);
            }
            store.complete_shape().unwrap();
        }
        for p in in_progress {
            store.add_vertex(*p);
        }
        store
    }

    fn tri(x: f64, y: f64) -> [Point; 3] {
        [Point::new(x, y), Point::new(x + 40.0, y), Point::new(x + 40.0, y + 40.0)]
    }

    #[test]
    fn test_miss_returns_none() {
        let store = store_with(&[&tri(0.0, 0.0)], &[]);
        assert!(find_near_vertex(&store, Point::new(200.0, 200.0), 5.0, 1.0).is_none());
    }

    #[test]
    fn test_empty_store() {
        let store = ShapeStore::new();
        assert!(find_near_vertex(&store, Point::new(0.0, 0.0), 5.0, 1.0).is_none());
    }

    #[test]
    fn test_hit_completed_vertex() {
        let store = store_with(&[&tri(0.0, 0.0)], &[]);
        let hit = find_near_vertex(&store, Point::new(41.0, 1.0), 5.0, 1.0).unwrap();
        assert_eq!(hit.owner, VertexOwner::Completed(0));
        assert_eq!(hit.point_index, 1);
        assert_eq!(hit.point, Point::new(40.0, 0.0));
    }

    #[test]
    fn test_hit_in_progress_vertex() {
        let store = store_with(&[&tri(0.0, 0.0)], &[Point::new(300.0, 300.0)]);
        let hit = find_near_vertex(&store, Point::new(302.0, 301.0), 5.0, 1.0).unwrap();
        assert_eq!(hit.owner, VertexOwner::InProgress);
        assert_eq!(hit.point_index, 0);
    }

    #[test]
    fn test_earlier_shape_wins_over_closer_vertex() {
        // Both shapes have a vertex near (100, 100); the second one is exact.
        let first = [Point::new(103.0, 100.0), Point::new(0.0, 0.0), Point::new(0.0, 50.0)];
        let second = [Point::new(100.0, 100.0), Point::new(200.0, 0.0), Point::new(200.0, 50.0)];
        let store = store_with(&[&first, &second], &[]);

        let hit = find_near_vertex(&store, Point::new(100.0, 100.0), 5.0, 1.0).unwrap();
        assert_eq!(hit.owner, VertexOwner::Completed(0));
        assert_eq!(hit.point_index, 0);
    }

    #[test]
    fn test_earlier_point_wins_within_shape() {
        let points = [Point::new(12.0, 10.0), Point::new(10.0, 10.0), Point::new(0.0, 90.0)];
        let store = store_with(&[&points], &[]);

        let hit = find_near_vertex(&store, Point::new(10.0, 10.0), 5.0, 1.0).unwrap();
        assert_eq!(hit.point_index, 0);
    }

    #[test]
    fn test_completed_wins_over_in_progress() {
        let store = store_with(&[&tri(0.0, 0.0)], &[Point::new(0.0, 0.0)]);
        let hit = find_near_vertex(&store, Point::new(0.0, 0.0), 5.0, 1.0).unwrap();
        assert_eq!(hit.owner, VertexOwner::Completed(0));
    }

    #[test]
    fn test_tolerance_scales_with_zoom() {
        let store = store_with(&[&tri(0.0, 0.0)], &[]);
        let query = Point::new(8.0, 0.0);

        // 5 canvas px at scale 1.0 is 5 image px: miss
        assert!(find_near_vertex(&store, query, 5.0, 1.0).is_none());
        // 5 canvas px at scale 0.5 is 10 image px: hit
        assert!(find_near_vertex(&store, query, 5.0, 0.5).is_some());
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let store = store_with(&[&tri(0.0, 0.0)], &[]);
        assert!(find_near_vertex(&store, Point::new(5.0, 0.0), 5.0, 1.0).is_none());
    }

    #[test]
    fn test_rectangles_are_skipped_but_keep_index() {
        let mut store = ShapeStore::new();
        store.commit_rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        for p in tri(0.0, 0.0) {
            store.add_vertex(p);
        }
        store.complete_shape().unwrap();

        let hit = find_near_vertex(&store, Point::new(0.0, 0.0), 5.0, 1.0).unwrap();
        assert_eq!(hit.owner, VertexOwner::Completed(1));
    }
}

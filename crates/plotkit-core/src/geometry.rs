//! Geometry preprocessing
//!
//! Orders polygons so the cutting head travels monotonically across the
//! material, and maps design space (Y down, unscaled) into device space
//! (Y up, scaled). The swapped variant serves devices mounted at 90°.

use tracing::trace;

use crate::types::{Point, Polygon};

fn min_x(polygon: &Polygon) -> f64 {
    polygon.iter().map(|p| p.x).fold(f64::INFINITY, f64::min)
}

fn min_y(polygon: &Polygon) -> f64 {
    polygon.iter().map(|p| p.y).fold(f64::INFINITY, f64::min)
}

fn sort_by_key(polygons: &[Polygon], key: fn(&Polygon) -> f64) -> Vec<Polygon> {
    let mut keyed: Vec<(f64, &Polygon)> = polygons.iter().map(|p| (key(p), p)).collect();
    // sort_by is stable; equal keys keep their input order
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p.clone()).collect()
}

/// Stable sort by each polygon's minimum X. Empty polygons sort last.
pub fn sort_by_min_x(polygons: &[Polygon]) -> Vec<Polygon> {
    sort_by_key(polygons, min_x)
}

/// Stable sort by each polygon's minimum Y. Empty polygons sort last.
pub fn sort_by_min_y(polygons: &[Polygon]) -> Vec<Polygon> {
    sort_by_key(polygons, min_y)
}

/// Sorts by minimum X then maps `(x, y) -> (x * ratio, surface_height - y * ratio)`.
pub fn preprocess(polygons: &[Polygon], surface_height: f64, ratio: f64) -> Vec<Polygon> {
    trace!(
        "Preprocessing {} polygons (ratio={}, surface_height={})",
        polygons.len(),
        ratio,
        surface_height
    );
    sort_by_min_x(polygons)
        .into_iter()
        .map(|polygon| {
            polygon
                .into_iter()
                .map(|p| Point::new(p.x * ratio, surface_height - p.y * ratio))
                .collect()
        })
        .collect()
}

/// Sorts by minimum Y then maps `(x, y) -> (y * ratio, x * ratio)`.
pub fn preprocess_swapped(polygons: &[Polygon], ratio: f64) -> Vec<Polygon> {
    trace!(
        "Preprocessing {} polygons with swapped axes (ratio={})",
        polygons.len(),
        ratio
    );
    sort_by_min_y(polygons)
        .into_iter()
        .map(|polygon| {
            polygon
                .into_iter()
                .map(|p| Point::new(p.y * ratio, p.x * ratio))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[(f64, f64)]) -> Polygon {
        points.iter().map(|&p| Point::from(p)).collect()
    }

    #[test]
    fn test_sort_by_min_x_orders_polygons() {
        let input = vec![
            poly(&[(30.0, 0.0), (40.0, 0.0)]),
            poly(&[(10.0, 5.0), (5.0, 5.0)]),
            poly(&[(20.0, 0.0)]),
        ];
        let sorted = sort_by_min_x(&input);
        assert_eq!(sorted[0], input[1]);
        assert_eq!(sorted[1], input[2]);
        assert_eq!(sorted[2], input[0]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let a = poly(&[(0.0, 1.0)]);
        let b = poly(&[(0.0, 2.0)]);
        let c = poly(&[(0.0, 3.0)]);
        let sorted = sort_by_min_x(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(sorted, vec![a, b, c]);
    }

    #[test]
    fn test_empty_polygons_sort_last() {
        let sorted = sort_by_min_y(&[Vec::new(), poly(&[(0.0, 100.0)])]);
        assert_eq!(sorted[0].len(), 1);
        assert!(sorted[1].is_empty());
    }

    #[test]
    fn test_preprocess_flips_and_scales() {
        let input = vec![poly(&[(1.0, 2.0), (3.0, 4.0)])];
        let out = preprocess(&input, 100.0, 10.0);
        assert_eq!(out[0], poly(&[(10.0, 80.0), (30.0, 60.0)]));
    }

    #[test]
    fn test_preprocess_swapped_exchanges_axes() {
        let input = vec![poly(&[(5.0, 9.0)]), poly(&[(1.0, 2.0), (3.0, 4.0)])];
        let out = preprocess_swapped(&input, 2.0);
        // second polygon has the smaller minimum Y and comes first
        assert_eq!(out[0], poly(&[(4.0, 2.0), (8.0, 6.0)]));
        assert_eq!(out[1], poly(&[(18.0, 10.0)]));
    }
}

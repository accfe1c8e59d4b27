use nalgebra::{Point3, Vector3};

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Unweighted radius of gyration: the root mean squared distance of the points from their
/// centroid.
pub fn radius_of_gyration(points: &[Point3<f64>]) -> Option<f64> {
    let center = centroid(points)?;
    let mean_sq = points
        .iter()
        .map(|p| (p - center).norm_squared())
        .sum::<f64>()
        / points.len() as f64;
    Some(mean_sq.sqrt())
}

/// Median of the values; the mean of the two middle values for an even count.
///
/// Returns `None` for an empty slice or when any value is NaN.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

//! Rate-distortion curves for retrieval batch-size tuning
//!
//! The rate is a retrieval batch size; the distortion (redundancy, coverage
//! loss, ...) is measured by the retrieval backend and handed in either as a
//! function or as pre-computed values. A curve is immutable once computed.

use crate::error::{check_unit_interval, GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One (batch size, distortion) measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RdPoint {
    /// Batch size, strictly positive
    pub rate: u32,
    /// Distortion in `[0, 1]`
    pub distortion: f64,
}

/// Points sorted by strictly increasing rate plus the selected knee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDistortionCurve {
    points: Vec<RdPoint>,
    knee: RdPoint,
}

impl RateDistortionCurve {
    /// Evaluate `distortion_fn` at every batch size
    ///
    /// Fails with `InvalidArgument` on an empty list, a zero batch size or a
    /// duplicate batch size, and with `Validation` if the function returns a
    /// distortion outside `[0, 1]`.
    pub fn compute<F>(distortion_fn: F, batch_sizes: &[u32]) -> Result<Self>
    where
        F: Fn(u32) -> f64,
    {
        check_batch_sizes(batch_sizes)?;
        let points = batch_sizes
            .iter()
            .map(|&rate| RdPoint {
                rate,
                distortion: distortion_fn(rate),
            })
            .collect();
        Self::from_points(points)
    }

    /// Pair pre-computed distortions with their batch sizes
    pub fn from_measurements(batch_sizes: &[u32], distortions: &[f64]) -> Result<Self> {
        if batch_sizes.len() != distortions.len() {
            return Err(GraphError::invalid_argument(format!(
                "{} batch sizes but {} distortion values",
                batch_sizes.len(),
                distortions.len()
            )));
        }
        check_batch_sizes(batch_sizes)?;
        let points = batch_sizes
            .iter()
            .zip(distortions)
            .map(|(&rate, &distortion)| RdPoint { rate, distortion })
            .collect();
        Self::from_points(points)
    }

    /// Build from raw points in any order
    pub fn from_points(mut points: Vec<RdPoint>) -> Result<Self> {
        let rates: Vec<u32> = points.iter().map(|p| p.rate).collect();
        check_batch_sizes(&rates)?;
        for point in &points {
            check_unit_interval("distortion", point.distortion)?;
        }

        points.sort_by_key(|p| p.rate);
        let knee = find_knee(&points);
        tracing::debug!(
            points = points.len(),
            knee_rate = knee.rate,
            knee_distortion = knee.distortion,
            "computed rate-distortion curve"
        );
        Ok(Self { points, knee })
    }

    /// Points by ascending rate
    #[must_use]
    pub fn points(&self) -> &[RdPoint] {
        &self.points
    }

    /// Selected trade-off point
    #[must_use]
    pub fn knee(&self) -> RdPoint {
        self.knee
    }

    /// Operator-facing suggestion derived from the knee
    #[must_use]
    pub fn recommendation(&self) -> String {
        format!(
            "Use batch size {} for optimal coverage/quality",
            self.knee.rate
        )
    }

    /// Re-check a deserialized curve: sorted, valid, and carrying the knee
    /// the algorithm would select
    pub(crate) fn revalidate(&self) -> Result<()> {
        let rebuilt = Self::from_points(self.points.clone())?;
        if rebuilt.points != self.points {
            return Err(GraphError::validation(
                "rate-distortion points are not sorted by increasing rate",
            ));
        }
        if rebuilt.knee != self.knee {
            return Err(GraphError::validation(format!(
                "stored knee at rate {} does not match computed knee at rate {}",
                self.knee.rate, rebuilt.knee.rate
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_batch_sizes(batch_sizes: &[u32]) -> Result<()> {
    if batch_sizes.is_empty() {
        return Err(GraphError::invalid_argument("batch size list is empty"));
    }
    if batch_sizes.contains(&0) {
        return Err(GraphError::invalid_argument("batch sizes must be positive"));
    }
    let mut seen = BTreeSet::new();
    for &rate in batch_sizes {
        if !seen.insert(rate) {
            return Err(GraphError::invalid_argument(format!(
                "duplicate batch size {rate}"
            )));
        }
    }
    Ok(())
}

/// Knee of a non-empty curve sorted by rate
///
/// Interior point farthest from the chord joining the endpoints; ties go to
/// the smaller rate. With fewer than three points there is no interior, so
/// the point minimizing `rate / max_rate + distortion` is used instead.
fn find_knee(points: &[RdPoint]) -> RdPoint {
    if points.len() < 3 {
        let max_rate = f64::from(points[points.len() - 1].rate);
        let score = |p: &RdPoint| f64::from(p.rate) / max_rate + p.distortion;
        let mut best = points[0];
        for point in &points[1..] {
            if score(point) < score(&best) {
                best = *point;
            }
        }
        return best;
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let (x1, y1) = (f64::from(first.rate), first.distortion);
    let (x2, y2) = (f64::from(last.rate), last.distortion);
    let dx = x2 - x1;
    let dy = y2 - y1;
    let chord = dx.hypot(dy);

    let distance = |p: &RdPoint| {
        let (x0, y0) = (f64::from(p.rate), p.distortion);
        (dy * x0 - dx * y0 + x2 * y1 - y2 * x1).abs() / chord
    };

    let interior = &points[1..points.len() - 1];
    let mut best = interior[0];
    let mut best_distance = distance(&best);
    for point in &interior[1..] {
        let d = distance(point);
        if d > best_distance {
            best = *point;
            best_distance = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn reference_curve() -> RateDistortionCurve {
        RateDistortionCurve::from_measurements(
            &[5, 10, 15, 20, 25, 30],
            &[0.9, 0.6, 0.5, 0.45, 0.4, 0.38],
        )
        .unwrap()
    }

    #[test]
    fn knee_is_farthest_from_chord() {
        // Vertical gaps to the 5→30 chord: 0.196, 0.192, 0.138, 0.084
        let knee = reference_curve().knee();
        assert_eq!(knee.rate, 10);
        assert_eq!(knee.distortion, 0.6);
    }

    #[test]
    fn compute_sorts_by_rate() {
        let curve = RateDistortionCurve::compute(|b| 1.0 / f64::from(b), &[20, 5, 10]).unwrap();
        let rates: Vec<_> = curve.points().iter().map(|p| p.rate).collect();
        assert_eq!(rates, vec![5, 10, 20]);
    }

    #[test]
    fn knee_tie_goes_to_smaller_rate() {
        // Symmetric bump above a flat chord
        let curve =
            RateDistortionCurve::from_measurements(&[1, 2, 3, 4], &[0.5, 0.1, 0.1, 0.5]).unwrap();
        assert_eq!(curve.knee().rate, 2);
    }

    #[test]
    fn short_curve_uses_combined_score() {
        // 10/20 + 0.8 = 1.3 vs 20/20 + 0.1 = 1.1
        let curve = RateDistortionCurve::from_measurements(&[10, 20], &[0.8, 0.1]).unwrap();
        assert_eq!(curve.knee().rate, 20);

        let single = RateDistortionCurve::from_measurements(&[7], &[0.3]).unwrap();
        assert_eq!(single.knee().rate, 7);
    }

    #[test]
    fn rejects_bad_batch_lists() {
        let kind = |r: Result<RateDistortionCurve>| r.unwrap_err().kind();
        assert_eq!(
            kind(RateDistortionCurve::compute(|_| 0.5, &[])),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            kind(RateDistortionCurve::compute(|_| 0.5, &[5, 10, 5])),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            kind(RateDistortionCurve::compute(|_| 0.5, &[0, 10])),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            kind(RateDistortionCurve::from_measurements(&[5, 10], &[0.5])),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn rejects_distortion_out_of_range() {
        let err = RateDistortionCurve::compute(|b| f64::from(b), &[1, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn recommendation_names_knee_rate() {
        assert_eq!(
            reference_curve().recommendation(),
            "Use batch size 10 for optimal coverage/quality"
        );
    }

    #[test]
    fn revalidate_catches_tampered_knee() {
        let mut curve = reference_curve();
        assert!(curve.revalidate().is_ok());
        curve.knee = curve.points[3];
        assert_eq!(curve.revalidate().unwrap_err().kind(), ErrorKind::Validation);
    }
}

// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Sweep axes built from sub-ranges of independent granularity.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Fixed step, `stop` excluded.
    Step(f64),
    /// Evenly spaced points, `stop` included.
    Points(usize),
}

/// One stretch of a sweep, e.g. the points taken while an inversion pulse plays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubRange {
    pub start: f64,
    pub stop: f64,
    pub sampling: Sampling,
}

impl SubRange {
    pub fn arange(start: f64, stop: f64, step: f64) -> Self {
        SubRange {
            start,
            stop,
            sampling: Sampling::Step(step),
        }
    }

    pub fn linspace(start: f64, stop: f64, points: usize) -> Self {
        SubRange {
            start,
            stop,
            sampling: Sampling::Points(points),
        }
    }

    pub fn points(&self) -> Result<Array1<f64>> {
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(Error::InvalidSweep(format!(
                "non-finite range [{}, {}]",
                self.start, self.stop
            )));
        }
        match self.sampling {
            Sampling::Step(step) => {
                if !(step.is_finite() && step > 0.0) {
                    return Err(Error::InvalidSweep(format!(
                        "step must be positive, got {step}"
                    )));
                }
                if self.stop <= self.start {
                    return Ok(Array1::zeros(0));
                }
                let count = ((self.stop - self.start) / step).ceil();
                if !(count.is_finite() && count <= usize::MAX as f64) {
                    return Err(Error::InvalidSweep(format!(
                        "[{}, {}) in steps of {step} has too many points",
                        self.start, self.stop
                    )));
                }
                Ok(Array1::range(self.start, self.stop, step))
            }
            Sampling::Points(0) => Err(Error::InvalidSweep(
                "a sub-range needs at least one point".to_string(),
            )),
            Sampling::Points(n) => {
                let mut values = Array1::linspace(self.start, self.stop, n);
                // land exactly on the stop so it matches the closing cut point
                if n > 1 {
                    values[n - 1] = self.stop;
                }
                Ok(values)
            }
        }
    }
}

/// A flat, ordered sweep axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepAxis {
    values: Array1<f64>,
}

impl SweepAxis {
    pub fn new(values: Array1<f64>) -> Self {
        SweepAxis { values }
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-decreasing; duplicated boundary samples are allowed.
    pub fn is_monotonic(&self) -> bool {
        self.values
            .iter()
            .zip(self.values.iter().skip(1))
            .all(|(a, b)| a <= b)
    }
}

/// A point of a segmented sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Position on the concatenated axis.
    pub index: usize,
    /// Sub-range the point was generated by.
    pub segment: usize,
    pub value: f64,
}

/// Sub-axes kept apart so each point remembers where it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentedAxis {
    segments: Vec<Array1<f64>>,
}

impl SegmentedAxis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges(ranges: &[SubRange]) -> Result<Self> {
        let segments = ranges
            .iter()
            .map(SubRange::points)
            .collect::<Result<Vec<_>>>()?;
        Ok(SegmentedAxis { segments })
    }

    pub fn push(&mut self, segment: Array1<f64>) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Array1<f64>] {
        &self.segments
    }

    pub fn segment_lens(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.len()).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = SweepPoint> + '_ {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(segment, values)| values.iter().map(move |value| (segment, *value)))
            .enumerate()
            .map(|(index, (segment, value))| SweepPoint {
                index,
                segment,
                value,
            })
    }

    /// Concatenate the sub-axes in order. Coinciding boundary points are kept,
    /// so the length is always the sum of the segment lengths.
    pub fn concatenate(&self) -> Result<SweepAxis> {
        if self.segments.is_empty() {
            return Err(Error::EmptyInput("sub-axis"));
        }
        let views: Vec<_> = self.segments.iter().map(|s| s.view()).collect();
        let values = ndarray::concatenate(Axis(0), &views).map_err(Error::new)?;
        Ok(SweepAxis::new(values))
    }

    /// Global indices of points equal to the last point of the preceding segment.
    pub fn coincident_boundaries(&self) -> Vec<usize> {
        let mut found = vec![];
        let mut offset = 0;
        let mut previous_last: Option<f64> = None;
        for segment in &self.segments {
            if matches!((previous_last, segment.first()), (Some(last), Some(first)) if last == *first)
            {
                found.push(offset);
            }
            if let Some(last) = segment.last() {
                previous_last = Some(*last);
            }
            offset += segment.len();
        }
        found
    }
}

/// Concatenate 2-D blocks along their rows.
///
/// All blocks must have the same number of columns; a mismatch is reported
/// instead of producing a truncated table.
pub fn concatenate_rows(parts: &[ArrayView2<'_, f64>]) -> Result<Array2<f64>> {
    let Some(first) = parts.first() else {
        return Err(Error::EmptyInput("array"));
    };
    let expected = first.ncols();
    if let Some((index, part)) = parts
        .iter()
        .enumerate()
        .find(|(_, part)| part.ncols() != expected)
    {
        return Err(Error::ShapeMismatch {
            index,
            expected,
            found: part.ncols(),
        });
    }
    ndarray::concatenate(Axis(0), parts).map_err(Error::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn test_arange_excludes_stop() {
        let points = SubRange::arange(0.0, 80.0, 20.0).points().unwrap();
        assert_eq!(points, array![0.0, 20.0, 40.0, 60.0]);
        assert!(SubRange::arange(80.0, 80.0, 20.0).points().unwrap().is_empty());
    }

    #[test]
    fn test_linspace_includes_stop() {
        let points = SubRange::linspace(5.0, 205.0, 5).points().unwrap();
        assert_eq!(points, array![5.0, 55.0, 105.0, 155.0, 205.0]);
    }

    #[test]
    fn test_invalid_sampling() {
        assert!(SubRange::arange(0.0, 10.0, 0.0).points().is_err());
        assert!(SubRange::arange(0.0, 10.0, -1.0).points().is_err());
        assert!(SubRange::linspace(0.0, 10.0, 0).points().is_err());
        assert!(SubRange::arange(0.0, f64::INFINITY, 1.0).points().is_err());
    }

    #[test]
    fn test_reversed_arange_is_empty() {
        assert!(SubRange::arange(10.0, 0.0, 1.0).points().unwrap().is_empty());
        let axis = SegmentedAxis::from_ranges(&[
            SubRange::arange(0.0, 40.0, 20.0),
            SubRange::arange(300.0, 200.0, 20.0),
        ])
        .unwrap();
        assert_eq!(axis.segment_lens(), vec![2, 0]);
    }

    #[test]
    fn test_arange_too_many_points() {
        let err = SubRange::arange(-f64::MAX, f64::MAX, 1.0).points().unwrap_err();
        assert!(matches!(err, Error::InvalidSweep(_)));
        assert!(SubRange::arange(0.0, 1.0e300, 1.0e-300).points().is_err());
    }

    #[test]
    fn test_sub_range_from_config() {
        let ranges: Vec<SubRange> = serde_json::from_str(
            r#"[
                {"start": 0.0, "stop": 160.0, "sampling": {"step": 20.0}},
                {"start": 160.0, "stop": 200.0, "sampling": {"points": 3}}
            ]"#,
        )
        .unwrap();
        assert_eq!(ranges[0], SubRange::arange(0.0, 160.0, 20.0));
        assert_eq!(ranges[1], SubRange::linspace(160.0, 200.0, 3));
        let axis = SegmentedAxis::from_ranges(&ranges).unwrap();
        assert_eq!(axis.segment_lens(), vec![8, 3]);

        let json = serde_json::to_value(SubRange::linspace(5.0, 205.0, 5)).unwrap();
        assert_eq!(json["sampling"]["points"], 5);
    }

    #[test]
    fn test_concatenate_keeps_coinciding_points() {
        let axis = SegmentedAxis::from_ranges(&[
            SubRange::linspace(0.0, 40.0, 3),
            SubRange::linspace(40.0, 100.0, 4),
            SubRange::linspace(100.0, 140.0, 3),
        ])
        .unwrap();
        let flat = axis.concatenate().unwrap();
        assert_eq!(axis.segment_lens(), vec![3, 4, 3]);
        assert_eq!(flat.len(), 10);
        assert_eq!(axis.coincident_boundaries(), vec![3, 7]);
        assert!(flat.is_monotonic());
    }

    #[test]
    fn test_step_ranges_do_not_coincide() {
        let axis = SegmentedAxis::from_ranges(&[
            SubRange::arange(0.0, 80.0, 20.0),
            SubRange::arange(80.0, 120.0, 20.0),
        ])
        .unwrap();
        assert!(axis.coincident_boundaries().is_empty());
        assert_eq!(axis.concatenate().unwrap().to_vec(), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_points_track_segments() {
        let axis = SegmentedAxis::from_ranges(&[
            SubRange::arange(0.0, 40.0, 20.0),
            SubRange::arange(40.0, 60.0, 20.0),
        ])
        .unwrap();
        let points: Vec<_> = axis.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[2],
            SweepPoint {
                index: 2,
                segment: 1,
                value: 40.0
            }
        );
    }

    #[test]
    fn test_concatenate_empty() {
        assert!(matches!(
            SegmentedAxis::new().concatenate(),
            Err(Error::EmptyInput(_))
        ));
        assert!(matches!(concatenate_rows(&[]), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_concatenate_rows_shape_mismatch() {
        let a = Array2::<f64>::zeros((3, 2));
        let b = Array2::<f64>::zeros((4, 2));
        let c = Array2::<f64>::zeros((1, 3));
        let joined = concatenate_rows(&[a.view(), b.view()]).unwrap();
        assert_eq!(joined.dim(), (7, 2));
        let err = concatenate_rows(&[a.view(), b.view(), c.view()]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                index: 2,
                expected: 2,
                found: 3
            }
        ));
    }
}

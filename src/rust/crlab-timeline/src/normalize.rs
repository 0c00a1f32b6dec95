// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! Min-max scaling of measured magnitudes onto `[-1, 1]`.

use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};

/// Smallest and largest finite value, `None` if there is none.
pub fn min_max(data: ArrayView1<'_, f64>) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

/// Extrema over both series together.
pub fn min_max_pair(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Option<(f64, f64)> {
    match (min_max(a), min_max(b)) {
        (Some((lo_a, hi_a)), Some((lo_b, hi_b))) => Some((lo_a.min(lo_b), hi_a.max(hi_b))),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Map `min` to -1 and `max` to +1.
pub fn min_max_normalize(min: f64, max: f64, data: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Err(Error::new(format!(
            "Cannot normalize with range [{min}, {max}]: the data is flat or invalid."
        )));
    }
    let span = max - min;
    Ok(data.mapv(|x| (x - min) / span * 2.0 - 1.0))
}

/// Normalize two series with their combined extrema, e.g. control in |0> and |1>.
pub fn normalize_pair(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
) -> Result<(Array1<f64>, Array1<f64>, (f64, f64))> {
    let (min, max) = min_max_pair(a, b).ok_or(Error::EmptyInput("finite value"))?;
    Ok((
        min_max_normalize(min, max, a)?,
        min_max_normalize(min, max, b)?,
        (min, max),
    ))
}

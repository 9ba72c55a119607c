// src/math.rs - vector and statistics kernel
//
// Pure helpers shared by the angle calculator and every dimension
// analyzer. All functions are total: degenerate inputs (empty slices,
// zero-magnitude vectors, zero variance) return 0 rather than NaN.

use nalgebra::Vector3;

/// Angle at `center` formed by `prev` and `next`, in degrees (0-180).
///
/// Returns 0 when either limb vector has zero magnitude, which happens
/// when two landmarks coincide. That case carries no information, so it
/// is reported as "no angle" instead of an error.
pub fn angle_between(prev: &Vector3<f64>, center: &Vector3<f64>, next: &Vector3<f64>) -> f64 {
    let v1 = prev - center;
    let v2 = next - center;

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    let cos = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N). Fewer than two samples
/// have no spread and return 0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation: std / |mean|, or 0 when the mean is 0.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg == 0.0 {
        return 0.0;
    }
    std_dev(values) / avg.abs()
}

/// Pearson correlation. Length mismatch, empty input, or zero variance
/// on either side returns 0.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut numerator = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    let denominator = (denom_x * denom_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Indices of local maxima at least `min_height` tall and at least
/// `min_distance` apart.
pub fn find_peaks(values: &[f64], min_height: f64, min_distance: usize) -> Vec<usize> {
    let mut peaks = Vec::new();
    for i in 1..values.len().saturating_sub(1) {
        if values[i] > values[i - 1] && values[i] > values[i + 1] && values[i] >= min_height {
            if peaks.last().map_or(true, |&p: &usize| i - p >= min_distance) {
                peaks.push(i);
            }
        }
    }
    peaks
}

/// Indices of local minima no taller than `max_height` and at least
/// `min_distance` apart.
pub fn find_valleys(values: &[f64], max_height: f64, min_distance: usize) -> Vec<usize> {
    let mut valleys = Vec::new();
    for i in 1..values.len().saturating_sub(1) {
        if values[i] < values[i - 1] && values[i] < values[i + 1] && values[i] <= max_height {
            if valleys.last().map_or(true, |&v: &usize| i - v >= min_distance) {
                valleys.push(i);
            }
        }
    }
    valleys
}

/// Linear score clamp shared by every dimension analyzer.
///
/// Maps `value` onto 0-100: at `ideal_bound` or better the score is 100,
/// at `worst_bound` or beyond it is 0, linear in between. The direction
/// follows from the bounds: `worst > ideal` penalizes large values,
/// `worst < ideal` penalizes small ones.
pub fn score_from_deviation(value: f64, ideal_bound: f64, worst_bound: f64) -> f64 {
    if worst_bound == ideal_bound {
        return if value == ideal_bound { 100.0 } else { 0.0 };
    }
    let score = 100.0 - (value - ideal_bound) / (worst_bound - ideal_bound) * 100.0;
    score.clamp(0.0, 100.0)
}

/// Absolute frame-to-frame deltas of a series.
pub fn frame_deltas(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}

/// Index of the maximum value (0 for an empty slice).
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Index of the minimum value (0 for an empty slice).
pub fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Round to one decimal place (presentation precision for angles).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places (coefficients and confidences).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

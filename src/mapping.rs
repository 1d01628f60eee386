//! Piecewise-linear offset mapping between two stop sequences.
//!
//! Both sequences are resampled to a common length so that index `i` on
//! one side and index `i` on the other name the same structural
//! landmark, then the offset is interpolated inside its bracketing
//! segment. The third heading of the source lands on the third heading
//! of the rendered pane even when the panes' heights differ wildly.

/// Map `from_offset` in one pane to the corresponding offset in the
/// other.
///
/// Pure and total. The result is not clamped to `to_max`; the caller
/// clamps when it writes.
///
/// # Example
///
/// ```
/// use panesync::mapping::map;
///
/// let to = map(100.0, &[0.0, 100.0, 400.0], &[0.0, 50.0, 500.0], 400.0, 500.0);
/// assert!((to - 50.0).abs() < 1e-9);
/// ```
pub fn map(from_offset: f64, from_stops: &[f64], to_stops: &[f64], from_max: f64, to_max: f64) -> f64 {
    let from_offset = finite_or_zero(from_offset);
    let from_max = finite_or_zero(from_max).max(0.0);
    let to_max = finite_or_zero(to_max).max(0.0);

    if from_max <= 0.0 || to_max <= 0.0 {
        if from_max <= 0.0 {
            return 0.0;
        }
        return (from_offset / from_max).clamp(0.0, 1.0) * to_max;
    }

    let trivial_from = [0.0, from_max];
    let trivial_to = [0.0, to_max];
    let from_stops = if from_stops.len() < 2 { &trivial_from[..] } else { from_stops };
    let to_stops = if to_stops.len() < 2 { &trivial_to[..] } else { to_stops };

    let len = from_stops.len().min(to_stops.len()).max(2);
    let from = resample(from_stops, len);
    let to = resample(to_stops, len);

    let offset = from_offset.clamp(0.0, from_max);
    let segment = (0..len - 1)
        .find(|&i| offset <= from[i + 1])
        .unwrap_or(len - 2);

    let (a, b) = (from[segment], from[segment + 1]);
    let width = b - a;
    let t = if width > 0.0 {
        ((offset - a) / width).clamp(0.0, 1.0)
    } else {
        0.0
    };
    to[segment] + (to[segment + 1] - to[segment]) * t
}

/// Resample `stops` to `len` entries by interpolating over index
/// position. The first and last entries are preserved.
pub fn resample(stops: &[f64], len: usize) -> Vec<f64> {
    if stops.len() == len || stops.is_empty() || len == 0 {
        return stops.to_vec();
    }
    if stops.len() == 1 || len == 1 {
        return vec![stops[0]; len];
    }
    let last = stops.len() - 1;
    let scale = last as f64 / (len - 1) as f64;
    (0..len)
        .map(|i| {
            if i == len - 1 {
                return stops[last];
            }
            let pos = i as f64 * scale;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lo = (pos.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            let frac = pos - lo as f64;
            stops[lo] + (stops[hi] - stops[lo]) * frac
        })
        .collect()
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

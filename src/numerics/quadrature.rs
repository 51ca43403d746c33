//! Composite Simpson integration over uniformly spaced samples.

/// Integrate uniformly spaced samples with composite Simpson's rule.
///
/// `spacing` is the distance between consecutive sample points. An even
/// sample count leaves one interval that Simpson's rule cannot pair;
/// that trailing interval is closed with the trapezoid rule.
///
/// # Panics
///
/// Panics if fewer than two samples are supplied or `spacing` is not a
/// positive finite number.
pub fn simpson_uniform(values: &[f64], spacing: f64) -> f64 {
    assert!(values.len() >= 2, "Simpson integration needs at least two samples");
    assert!(
        spacing.is_finite() && spacing > 0.0,
        "Simpson integration needs a positive finite spacing"
    );

    let n = values.len();
    if n == 2 {
        return 0.5 * spacing * (values[0] + values[1]);
    }

    // Largest odd sample count covers the Simpson segment; an even count
    // leaves the final interval for the trapezoid closure below.
    let simpson_end = if n % 2 == 1 { n } else { n - 1 };

    let mut sum = values[0] + values[simpson_end - 1];
    for (i, &v) in values.iter().enumerate().take(simpson_end - 1).skip(1) {
        sum += if i % 2 == 1 { 4.0 * v } else { 2.0 * v };
    }
    let mut integral = sum * spacing / 3.0;

    if simpson_end < n {
        integral += 0.5 * spacing * (values[n - 2] + values[n - 1]);
    }
    integral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrates_constant_exactly() {
        let values = vec![2.0; 51];
        let integral = simpson_uniform(&values, 0.1);
        assert!((integral - 2.0 * 5.0).abs() < 1e-12);
    }

    #[test]
    fn integrates_parabola_exactly() {
        // Simpson is exact for cubics; x^2 over [0, 1] = 1/3.
        let n = 101;
        let dx = 1.0 / (n - 1) as f64;
        let values: Vec<f64> = (0..n).map(|i| (i as f64 * dx).powi(2)).collect();
        let integral = simpson_uniform(&values, dx);
        assert!((integral - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn handles_even_sample_count() {
        // sin over [0, pi] = 2; 50 samples exercises the trapezoid tail.
        let n = 50;
        let dx = std::f64::consts::PI / (n - 1) as f64;
        let values: Vec<f64> = (0..n).map(|i| (i as f64 * dx).sin()).collect();
        let integral = simpson_uniform(&values, dx);
        assert!((integral - 2.0).abs() < 1e-3);
    }

    #[test]
    fn two_samples_fall_back_to_trapezoid() {
        let integral = simpson_uniform(&[1.0, 3.0], 0.5);
        assert!((integral - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "at least two samples")]
    fn rejects_single_sample() {
        simpson_uniform(&[1.0], 0.1);
    }
}

//! Paired significance testing.
//!
//! Implements the matched-samples (paired) t-test used to compare two
//! retrieval configurations evaluated on the same queries, with a two-tailed
//! p-value from the t distribution. Smucker et al. (2007, "A comparison of
//! statistical significance tests for information retrieval evaluation")
//! motivates the choice of test for per-query effectiveness scores.

use crate::error::{IrevalError, Result};

/// Outcome of a paired t-test.
#[derive(Debug, Clone, Copy)]
pub struct PairedTTest {
    /// Positive when the first sample's mean exceeds the second's.
    pub statistic: f64,
    /// Two-tailed p-value under the null hypothesis of zero mean difference.
    pub p_value: f64,
    /// Degrees of freedom (n - 1).
    pub df: usize,
}

/// Paired t-test over two samples measured on the same units, same order.
///
/// Position `k` in both slices must refer to the same unit (here: the same
/// query). Fails with `InsufficientData` for fewer than 2 pairs; a paired
/// test on 0 or 1 observations is not meaningful and is rejected rather than
/// silently computed.
///
/// When every paired difference is identical the standard error is zero:
/// a zero mean difference yields statistic 0 with p = 1, a non-zero mean
/// difference yields an infinite statistic with p = 0.
pub fn paired_ttest(sample_a: &[f64], sample_b: &[f64]) -> Result<PairedTTest> {
    if sample_a.len() != sample_b.len() {
        return Err(IrevalError::Format(format!(
            "paired samples differ in length: {} vs {}",
            sample_a.len(),
            sample_b.len()
        )));
    }
    if sample_a.len() < 2 {
        return Err(IrevalError::InsufficientData(format!(
            "{} paired observation(s), need at least 2",
            sample_a.len()
        )));
    }

    let n = sample_a.len();
    let df = n - 1;

    let diffs: Vec<f64> = sample_a
        .iter()
        .zip(sample_b.iter())
        .map(|(a, b)| a - b)
        .collect();
    let mean_diff = diffs.iter().sum::<f64>() / n as f64;
    let var_diff = diffs.iter().map(|d| (d - mean_diff).powi(2)).sum::<f64>() / df as f64;
    let se = (var_diff / n as f64).sqrt();

    if se == 0.0 {
        let (statistic, p_value) = if mean_diff == 0.0 {
            (0.0, 1.0)
        } else {
            (mean_diff.signum() * f64::INFINITY, 0.0)
        };
        return Ok(PairedTTest {
            statistic,
            p_value,
            df,
        });
    }

    let statistic = mean_diff / se;
    let p_value = student_t_p_value(statistic.abs(), df);

    Ok(PairedTTest {
        statistic,
        p_value,
        df,
    })
}

/// Two-tailed p-value for |t| under the t distribution with `df` degrees of
/// freedom, via p = I_{df/(df+t²)}(df/2, 1/2). Falls back to the normal
/// distribution for large df, where the two are indistinguishable.
fn student_t_p_value(t_abs: f64, df: usize) -> f64 {
    let p = if df > 100 {
        2.0 * (1.0 - normal_cdf(t_abs))
    } else {
        let x = df as f64 / (df as f64 + t_abs * t_abs);
        betai(df as f64 / 2.0, 0.5, x)
    };
    p.clamp(0.0, 1.0)
}

fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf_approx(x / std::f64::consts::SQRT_2))
}

/// Abramowitz & Stegun 7.1.26, maximum absolute error 1.5e-7.
fn erf_approx(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Regularized incomplete beta function I_x(a, b).
fn betai(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let front =
        (gammaln(a + b) - gammaln(a) - gammaln(b) + a * x.ln() + b * (1.0 - x).ln()).exp();

    // The continued fraction converges fast only for x below the mean of the
    // distribution; otherwise evaluate the symmetric complement.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * betai_cf(a, b, x) / a
    } else {
        1.0 - front * betai_cf(b, a, 1.0 - x) / b
    }
}

/// Lentz's continued fraction for the incomplete beta function.
fn betai_cf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-12;
    const TINY: f64 = 1e-30;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let numerator = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + numerator * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let numerator = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + numerator * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Lanczos approximation of ln Γ(x) for x > 0.
fn gammaln(x: f64) -> f64 {
    const COEFFS: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];

    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();

    let mut series = 1.000000000190015;
    for (i, coeff) in COEFFS.iter().enumerate() {
        series += coeff / (x + 1.0 + i as f64);
    }

    -tmp + (2.5066282746310005 * series / x).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_difference_is_significant() {
        let a = vec![0.90, 0.92, 0.88, 0.91, 0.89];
        let b = vec![0.70, 0.73, 0.69, 0.70, 0.71];
        let result = paired_ttest(&a, &b).unwrap();
        assert!(result.statistic > 0.0);
        assert_eq!(result.df, 4);
        assert!(result.p_value < 0.001, "p = {}", result.p_value);
    }

    #[test]
    fn noise_is_not_significant() {
        let a = vec![0.85, 0.87, 0.86, 0.84, 0.85];
        let b = vec![0.84, 0.86, 0.87, 0.85, 0.86];
        let result = paired_ttest(&a, &b).unwrap();
        // t ≈ -0.41 with 4 degrees of freedom; p ≈ 0.70.
        assert!(result.statistic < 0.0);
        assert!(result.p_value > 0.05);
        assert!(result.p_value > 0.6 && result.p_value < 0.8, "p = {}", result.p_value);
    }

    #[test]
    fn identical_samples_yield_p_one() {
        let a = vec![0.5, 0.6, 0.7];
        let result = paired_ttest(&a, &a).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn constant_nonzero_difference_is_degenerate() {
        let a = vec![0.8, 0.7, 0.6];
        let b = vec![0.7, 0.6, 0.5];
        let result = paired_ttest(&a, &b).unwrap();
        assert!(result.statistic.is_infinite() && result.statistic > 0.0);
        assert_eq!(result.p_value, 0.0);
    }

    #[test]
    fn one_pair_is_insufficient() {
        let err = paired_ttest(&[0.5], &[0.6]).unwrap_err();
        assert!(matches!(err, IrevalError::InsufficientData(_)));
    }

    #[test]
    fn empty_is_insufficient() {
        let err = paired_ttest(&[], &[]).unwrap_err();
        assert!(matches!(err, IrevalError::InsufficientData(_)));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = paired_ttest(&[0.5, 0.6], &[0.5]).unwrap_err();
        assert!(matches!(err, IrevalError::Format(_)));
    }

    #[test]
    fn p_value_matches_critical_points() {
        // t = 2.776 is the two-tailed 5% critical value at 4 degrees of freedom.
        let p = student_t_p_value(2.776, 4);
        assert!((p - 0.05).abs() < 0.005, "p = {}", p);
        // Large df falls back to the normal distribution: t = 1.96 → p ≈ 0.05.
        let p = student_t_p_value(1.96, 1000);
        assert!((p - 0.05).abs() < 0.005, "p = {}", p);
    }

    #[test]
    fn normal_cdf_reference_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((normal_cdf(-1.96) - 0.025).abs() < 1e-3);
    }
}

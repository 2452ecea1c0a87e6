//! Latency-vs-throughput curve fitting.
//!
//! Fits `latency ~ throughput` as a generalized linear model with an
//! inverse-Gaussian response under its canonical inverse-squared link,
//! estimated by iteratively reweighted least squares. The link keeps
//! predictions positive, monotone, and convex toward a capacity ceiling,
//! which is how latency behaves as a load test approaches saturation;
//! the right-skewed inverse-Gaussian response matches latency
//! distributions better than ordinary least squares.

use crate::error::PipelineError;
use crate::model::{EnrichedSample, FitPoint, PipelineConfig};
use tracing::debug;

/// The inverse-squared link is only defined for a positive linear
/// predictor; intermediate iterates are floored here to stay in range.
const ETA_FLOOR: f64 = 1e-12;

/// Fit the model and evaluate it at every integer throughput in
/// [min observed, max observed).
pub fn fit_curve(
    samples: &[EnrichedSample],
    cfg: &PipelineConfig,
) -> Result<Vec<FitPoint>, PipelineError> {
    if samples.len() < 2 {
        return Err(PipelineError::InsufficientData);
    }
    for sample in samples {
        if !(sample.latency_s > 0.0) {
            return Err(PipelineError::NonPositiveLatency(sample.latency_s));
        }
    }

    let min = samples.iter().map(|s| s.throughput).min().unwrap_or(0);
    let max = samples.iter().map(|s| s.throughput).max().unwrap_or(0);
    if min == max {
        return Err(PipelineError::SingularFit(
            "throughput is constant across all samples",
        ));
    }

    let xs: Vec<f64> = samples.iter().map(|s| s.throughput as f64).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.latency_s).collect();
    let (b0, b1) = irls(&xs, &ys, cfg)?;

    let curve: Vec<FitPoint> = (min..max)
        .map(|throughput| FitPoint {
            throughput,
            latency_s: predict(b0, b1, throughput as f64),
        })
        .collect();
    if curve.iter().any(|p| !p.latency_s.is_finite()) {
        return Err(PipelineError::SingularFit(
            "the fitted curve is undefined over the observed domain",
        ));
    }
    Ok(curve)
}

fn predict(b0: f64, b1: f64, x: f64) -> f64 {
    let eta = b0 + b1 * x;
    eta.powf(-0.5)
}

/// Iteratively reweighted least squares for the two-parameter model.
///
/// With the canonical link g(mu) = mu^-2: g'(mu) = -2 mu^-3 and
/// Var(mu) = mu^3, so the working weight reduces to mu^3 / 4. The
/// weighted normal equations are solved in closed form; a vanishing
/// determinant means a degenerate design and is fatal. Hitting the
/// iteration cap without convergence keeps the last estimate, matching
/// common GLM implementations.
fn irls(xs: &[f64], ys: &[f64], cfg: &PipelineConfig) -> Result<(f64, f64), PipelineError> {
    // Start from the observed response, the usual GLM initialization.
    let mut mu: Vec<f64> = ys.to_vec();
    let mut eta: Vec<f64> = mu.iter().map(|m| m.powi(-2)).collect();
    let (mut b0, mut b1) = (0.0, 0.0);

    for iteration in 0..cfg.max_fit_iterations {
        let (mut s0, mut s1, mut s2) = (0.0, 0.0, 0.0);
        let (mut t0, mut t1) = (0.0, 0.0);
        for i in 0..xs.len() {
            let m = mu[i];
            let g_prime = -2.0 / (m * m * m);
            let weight = m * m * m / 4.0;
            let z = eta[i] + (ys[i] - m) * g_prime;
            let x = xs[i];
            s0 += weight;
            s1 += weight * x;
            s2 += weight * x * x;
            t0 += weight * z;
            t1 += weight * x * z;
        }

        let det = s0 * s2 - s1 * s1;
        if !det.is_finite() || det.abs() < 1e-12 * s0.max(1.0) * s2.max(1.0) {
            return Err(PipelineError::SingularFit(
                "weighted design matrix is singular",
            ));
        }
        let next_b0 = (t0 * s2 - s1 * t1) / det;
        let next_b1 = (s0 * t1 - s1 * t0) / det;
        let delta = (next_b0 - b0).abs() + (next_b1 - b1).abs();
        b0 = next_b0;
        b1 = next_b1;

        for i in 0..xs.len() {
            eta[i] = (b0 + b1 * xs[i]).max(ETA_FLOOR);
            mu[i] = eta[i].powf(-0.5);
        }

        if delta < cfg.fit_tolerance * (1.0 + b0.abs() + b1.abs()) {
            debug!(iterations = iteration + 1, b0, b1, "IRLS converged");
            return Ok((b0, b1));
        }
    }

    debug!(
        iterations = cfg.max_fit_iterations,
        b0, b1, "IRLS hit the iteration cap"
    );
    Ok((b0, b1))
}

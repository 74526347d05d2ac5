/// Descriptive statistics over a set of per-round latency means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyMetrics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

/// Compute latency metrics (mean, median, min, max, sample std dev) from samples.
/// Returns `None` for an empty slice. A single sample has a std dev of exactly 0.
pub fn compute_latency_metrics(samples: &[f64]) -> Option<LatencyMetrics> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    Some(LatencyMetrics {
        mean: mean(samples),
        median,
        min: sorted[0],
        max: sorted[n - 1],
        std_dev: sample_std_dev(samples),
    })
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Fewer than two samples give 0.
pub fn sample_std_dev(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let sum_sq: f64 = samples.iter().map(|x| (x - m) * (x - m)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Z-score of every sample against the group's own mean and sample std dev.
/// Groups with fewer than two samples, or with no spread, score 0 everywhere.
pub fn z_scores(samples: &[f64]) -> Vec<f64> {
    let sigma = sample_std_dev(samples);
    if samples.len() < 2 || sigma == 0.0 {
        return vec![0.0; samples.len()];
    }
    let mu = mean(samples);
    samples.iter().map(|x| (x - mu) / sigma).collect()
}

//! Aggregation of trial totals into the distribution report.
//!
//! Percentiles use linear interpolation between order statistics
//! (rank `p/100 · (n-1)`). Pull percentiles are truncated to whole pulls;
//! returns percentiles stay continuous.

use serde::Serialize;

use crate::constants::REPORTED_PERCENTILES;

use super::engine::TrialResult;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PullSummary {
    pub mean: f64,
    pub p25: u64,
    pub p50: u64,
    pub p75: u64,
    pub p90: u64,
    pub p95: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReturnSummary {
    pub mean: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DistributionReport {
    pub pulls: PullSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnSummary>,
}

/// Interpolated percentile `p` (0..=100) of an ascending slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sorted_percentiles(values: &mut [f64]) -> [f64; 5] {
    values.sort_unstable_by(f64::total_cmp);
    REPORTED_PERCENTILES.map(|p| percentile(values, p))
}

pub fn summarize_pulls(pulls: &[u64]) -> PullSummary {
    let mut values: Vec<f64> = pulls.iter().map(|&p| p as f64).collect();
    let mean = mean(&values);
    let [p25, p50, p75, p90, p95] = sorted_percentiles(&mut values).map(|v| v as u64);
    PullSummary {
        mean,
        p25,
        p50,
        p75,
        p90,
        p95,
    }
}

pub fn summarize_returns(returns: &[f64]) -> ReturnSummary {
    let mut values = returns.to_vec();
    let mean = mean(&values);
    let [p25, p50, p75, p90, p95] = sorted_percentiles(&mut values);
    ReturnSummary {
        mean,
        p25,
        p50,
        p75,
        p90,
        p95,
    }
}

/// Percentage (0–100) of trials finishing within `budget` pulls.
pub fn success_rate(pulls: &[u64], budget: u64) -> f64 {
    if pulls.is_empty() {
        return 0.0;
    }
    let hits = pulls.iter().filter(|&&p| p <= budget).count();
    hits as f64 / pulls.len() as f64 * 100.0
}

pub fn aggregate(results: &[TrialResult], budget: Option<u64>, with_returns: bool) -> DistributionReport {
    let pulls: Vec<u64> = results.iter().map(|r| r.pulls).collect();
    let returns = with_returns.then(|| {
        let values: Vec<f64> = results.iter().map(|r| r.returns).collect();
        summarize_returns(&values)
    });
    DistributionReport {
        pulls: summarize_pulls(&pulls),
        success_rate: budget.map(|b| success_rate(&pulls, b)),
        returns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 4.0);
        assert!((percentile(&v, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&v, 25.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_pull_percentiles_truncate() {
        let s = summarize_pulls(&[10, 20, 30, 40]);
        assert_eq!(s.mean, 25.0);
        assert_eq!(s.p25, 17); // 17.5
        assert_eq!(s.p50, 25);
        assert_eq!(s.p95, 38); // 38.5
    }

    #[test]
    fn test_success_rate() {
        let pulls = [50, 60, 70, 80];
        assert_eq!(success_rate(&pulls, 49), 0.0);
        assert_eq!(success_rate(&pulls, 60), 50.0);
        assert_eq!(success_rate(&pulls, 1000), 100.0);
    }

    #[test]
    fn test_aggregate_optional_blocks() {
        let results = vec![
            TrialResult { pulls: 10, returns: 5.0 },
            TrialResult { pulls: 20, returns: 15.0 },
        ];
        let r = aggregate(&results, None, false);
        assert!(r.success_rate.is_none() && r.returns.is_none());
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("returns").is_none());

        let r = aggregate(&results, Some(15), true);
        assert_eq!(r.success_rate, Some(50.0));
        assert_eq!(r.returns.unwrap().mean, 10.0);
    }
}

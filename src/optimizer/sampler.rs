//! The two parameter samplers behind `OptimizerMode::{Grid, Optuna}`
//! (§4.5): deterministic cartesian-product enumeration for grid search,
//! and a hand-rolled tree-structured Parzen estimator (TPE) for the
//! Bayesian mode. No external TPE crate appears anywhere in the example
//! pack, so this is built directly on `rand` — the same crate the
//! teacher already depends on for its Monte Carlo and random-walk
//! modules (`SPEC_FULL.md` §4.5).

use crate::optimizer::param::ParamSet;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// One parameter's search range: `low..=high` stepped by `step`. Grid
/// search enumerates every step; TPE treats it as a continuous interval
/// and snaps samples back onto the step grid so both modes explore the
/// same discretized space.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub low: Decimal,
    pub high: Decimal,
    pub step: Decimal,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, low: Decimal, high: Decimal, step: Decimal) -> Self {
        ParamSpec { name: name.into(), low, high, step }
    }

    /// Every value on the `low..=high` grid, in ascending order.
    pub fn grid_values(&self) -> Vec<Decimal> {
        if self.step <= Decimal::ZERO || self.low > self.high {
            return vec![self.low];
        }
        let mut values = Vec::new();
        let mut v = self.low;
        while v <= self.high {
            values.push(v);
            v += self.step;
        }
        values
    }

    fn snap(&self, raw: f64) -> Decimal {
        let low = self.low.to_f64().unwrap_or(0.0);
        let high = self.high.to_f64().unwrap_or(0.0);
        let step = self.step.to_f64().unwrap_or(0.0);
        let clamped = raw.clamp(low.min(high), low.max(high));
        if step <= 0.0 {
            return Decimal::from_f64(clamped).unwrap_or(self.low);
        }
        let steps = ((clamped - low) / step).round();
        let snapped = low + steps * step;
        Decimal::from_f64(snapped).unwrap_or(self.low)
    }
}

/// Total size of the cartesian product across `specs`, used to pick
/// between grid and Bayesian mode automatically (§4.5 "threshold 1000 by
/// default").
pub fn grid_size(specs: &[ParamSpec]) -> usize {
    specs.iter().map(|s| s.grid_values().len().max(1)).product()
}

/// Enumerates the full cartesian product in deterministic order: specs
/// sorted by name, values within each spec ascending. Grid search's
/// entire contract rests on this being reproducible across runs.
pub fn grid_combinations(specs: &[ParamSpec]) -> Vec<ParamSet> {
    let mut sorted: Vec<&ParamSpec> = specs.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut combinations: Vec<ParamSet> = vec![ParamSet::new()];
    for spec in sorted {
        let values = spec.grid_values();
        let mut next = Vec::with_capacity(combinations.len() * values.len());
        for partial in &combinations {
            for value in &values {
                let mut extended = partial.clone();
                extended.insert(spec.name.clone(), *value);
                next.push(extended);
            }
        }
        combinations = next;
    }
    combinations
}

/// A tree-structured Parzen estimator (§4.5 "Bayesian (TPE)"): splits
/// trials seen so far into a "good" group (top `gamma` fraction by
/// metric) and a "bad" group, fits a Gaussian-kernel density per
/// parameter to each, and proposes the candidate (among several drawn
/// from the good density) with the highest good/bad likelihood ratio.
pub struct TpeSampler {
    specs: Vec<ParamSpec>,
    n_startup_trials: usize,
    gamma: f64,
    candidates_per_trial: usize,
    rng: StdRng,
}

impl TpeSampler {
    /// `seed` derives the sampler's entire random stream — the optimizer
    /// never reads wall-clock entropy, so a run is reproducible end to
    /// end given the same seed (§5 "random seeds per trial are derived
    /// deterministically from the sampler's master seed").
    pub fn new(specs: Vec<ParamSpec>, n_startup_trials: usize, seed: u64) -> Self {
        TpeSampler { specs, n_startup_trials, gamma: 0.25, candidates_per_trial: 24, rng: StdRng::seed_from_u64(seed) }
    }

    /// Proposes the next parameter set. `trial_index` below
    /// `n_startup_trials` draws uniformly at random (§4.5 "the first
    /// N_startup trials are uniform-random for exploration"); afterward
    /// it samples from the fitted good-density model.
    pub fn sample(&mut self, trial_index: usize, observed: &[(ParamSet, Decimal)]) -> ParamSet {
        if trial_index < self.n_startup_trials || observed.len() < 4 {
            return self.sample_uniform();
        }

        let mut good: Vec<&ParamSet> = observed.iter().map(|(p, _)| p).collect();
        let mut scored: Vec<(Decimal, &ParamSet)> = observed.iter().map(|(p, m)| (*m, p)).collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        let split = ((scored.len() as f64) * self.gamma).ceil().max(1.0) as usize;
        let (good_scored, bad_scored) = scored.split_at(split.min(scored.len()));
        good = good_scored.iter().map(|(_, p)| *p).collect();
        let bad: Vec<&ParamSet> = bad_scored.iter().map(|(_, p)| *p).collect();

        let mut best: Option<(f64, ParamSet)> = None;
        for _ in 0..self.candidates_per_trial {
            let candidate = self.sample_from_group(&good);
            let score = self.log_likelihood_ratio(&candidate, &good, &bad);
            if best.as_ref().map(|(s, _)| score > *s).unwrap_or(true) {
                best = Some((score, candidate));
            }
        }
        best.map(|(_, p)| p).unwrap_or_else(|| self.sample_uniform())
    }

    fn sample_uniform(&mut self) -> ParamSet {
        let mut out = ParamSet::new();
        for spec in self.specs.clone() {
            let low = spec.low.to_f64().unwrap_or(0.0);
            let high = spec.high.to_f64().unwrap_or(low);
            let raw = if high > low { self.rng.gen_range(low..=high) } else { low };
            out.insert(spec.name.clone(), spec.snap(raw));
        }
        out
    }

    /// Draws one candidate per parameter from a Gaussian centered on a
    /// randomly chosen member of `group`, bandwidth proportional to the
    /// spec's range — the standard TPE "kernel per observed point"
    /// construction, simplified to a single shared bandwidth per
    /// parameter rather than Scott's-rule-per-kernel.
    fn sample_from_group(&mut self, group: &[&ParamSet]) -> ParamSet {
        let mut out = ParamSet::new();
        for spec in self.specs.clone() {
            let range = (spec.high - spec.low).to_f64().unwrap_or(1.0).abs().max(1e-9);
            let bandwidth = (range / 6.0).max(1e-6);
            let center = group
                .get(self.rng.gen_range(0..group.len().max(1)))
                .and_then(|p| p.get(&spec.name))
                .and_then(|d| d.to_f64())
                .unwrap_or_else(|| spec.low.to_f64().unwrap_or(0.0));
            let sample = center + self.rng.gen_range(-1.0..1.0) * bandwidth;
            out.insert(spec.name.clone(), spec.snap(sample));
        }
        out
    }

    /// `log(l(x)) - log(g(x))`, the TPE acquisition criterion: how much
    /// more plausible `candidate` is under the good-trial density than
    /// the bad-trial density, summed independently across parameters
    /// (the estimator's standard factorized-kernel assumption).
    fn log_likelihood_ratio(&self, candidate: &ParamSet, good: &[&ParamSet], bad: &[&ParamSet]) -> f64 {
        self.specs
            .iter()
            .map(|spec| {
                let x = candidate.get(&spec.name).and_then(|d| d.to_f64()).unwrap_or(0.0);
                let range = (spec.high - spec.low).to_f64().unwrap_or(1.0).abs().max(1e-9);
                let bandwidth = (range / 6.0).max(1e-6);
                let good_density = kernel_density(x, good, &spec.name, bandwidth);
                let bad_density = kernel_density(x, bad, &spec.name, bandwidth);
                (good_density.max(1e-12) / bad_density.max(1e-12)).ln()
            })
            .sum()
    }
}

/// Gaussian-kernel density estimate of `x` under the empirical
/// distribution of `group`'s values for `param_name`. An empty group
/// falls back to a flat (uniform-equivalent) density of 1.0 so an empty
/// bad/good split never produces a division by zero in the ratio above.
fn kernel_density(x: f64, group: &[&ParamSet], param_name: &str, bandwidth: f64) -> f64 {
    let values: Vec<f64> = group.iter().filter_map(|p| p.get(param_name)).filter_map(|d| d.to_f64()).collect();
    if values.is_empty() {
        return 1.0;
    }
    let norm = 1.0 / (bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let density: f64 = values
        .iter()
        .map(|&center| {
            let z = (x - center) / bandwidth;
            norm * (-0.5 * z * z).exp()
        })
        .sum();
    density / values.len() as f64
}

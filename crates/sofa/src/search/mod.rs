//! Branch-and-bound driver.
//!
//! Purpose
//! - Per node: price every admissible bisection, branch along the one with
//!   the largest gain, prune children below the target area.
//! - Across nodes: fork–join batches over independent worker tasks; nodes
//!   are owned by exactly one worker at a time and move only at batch
//!   boundaries, so workers share no mutable state.

use num_traits::{ToPrimitive, Zero};
use rayon::prelude::*;

use crate::geom::Rat;
use crate::node::{HalveType, Interval, Sofa};

/// Driver tunables.
#[derive(Clone, Debug)]
pub struct SearchCfg {
    /// Nodes whose area drops below this are discarded.
    pub target: Rat,
    /// Worker tasks per batch.
    pub num_workers: usize,
    /// Iterations per worker before survivors are redistributed.
    pub iters_per_batch: usize,
}

impl SearchCfg {
    pub fn new(target: Rat) -> SearchCfg {
        SearchCfg {
            target,
            num_workers: 30,
            iters_per_batch: 10_000,
        }
    }
}

/// Split a node along the admissible bisection with the largest gain.
///
/// The pivot's mu axis is frozen, so `(mu_fix_idx, Mu*)` is skipped. The
/// children satisfy `child.area + gain == parent.area` for their respective
/// gains.
pub fn branch(sofa: &Sofa) -> (Sofa, Sofa) {
    let mut best: Option<(usize, HalveType, Rat)> = None;
    for idx in 0..sofa.n {
        for t in HalveType::ALL {
            if idx == sofa.mu_fix_idx && t.is_mu() {
                continue;
            }
            let gain = sofa.halve_gain(idx, t);
            let better = match &best {
                None => true,
                Some((_, _, g)) => gain > *g,
            };
            if better {
                best = Some((idx, t, gain));
            }
        }
    }
    let (idx, t, gain) = best.expect("a node always has a halvable axis");
    debug_assert!(gain > Rat::zero());

    let (down, up) = if t.is_mu() {
        (HalveType::MuDown, HalveType::MuUp)
    } else {
        (HalveType::NuDown, HalveType::NuUp)
    };
    let sd = sofa.halve(idx, down);
    let su = sofa.halve(idx, up);
    debug_assert!(&sd.area + sofa.halve_gain(idx, down) == sofa.area);
    debug_assert!(&su.area + sofa.halve_gain(idx, up) == sofa.area);
    (sd, su)
}

/// One worker batch: explore LIFO, prune below `target`, stop after `iters`
/// iterations. Returns the surviving nodes and the iteration count.
pub fn worker(
    mut sofas: Vec<Sofa>,
    target: &Rat,
    iters: usize,
    worker_idx: usize,
) -> (Vec<Sofa>, usize) {
    let mut iter_cnt = 0usize;
    while iter_cnt < iters {
        let Some(s) = sofas.pop() else { break };
        if s.area >= *target {
            let (sd, su) = branch(&s);
            for child in [sd, su] {
                if child.area >= *target {
                    sofas.push(child);
                }
            }
        }
        iter_cnt += 1;
        if iter_cnt % 1000 == 0 {
            progress(worker_idx, iter_cnt, &sofas);
        }
    }
    (sofas, iter_cnt)
}

fn ranges_text(ranges: &[Interval]) -> String {
    ranges
        .iter()
        .map(|i| format!("[{}, {}]", i.max, i.min))
        .collect::<Vec<_>>()
        .join(", ")
}

fn progress(worker_idx: usize, iter_cnt: usize, sofas: &[Sofa]) {
    let Some(top) = sofas.last() else { return };
    tracing::info!(
        worker = worker_idx,
        iter = iter_cnt,
        depth = sofas.len(),
        area = top.area.to_f64().unwrap_or(f64::NAN),
        mu_range = %ranges_text(&top.mu_range),
        nu_range = %ranges_text(&top.nu_range),
        "progress"
    );
}

/// Fork–join batch loop: round-robin the pool over workers, run every
/// worker to completion, regather survivors, repeat until the pool drains.
/// Returns the total iteration count.
pub fn run(mut sofas: Vec<Sofa>, cfg: &SearchCfg) -> usize {
    let mut total_iter = 0usize;
    let mut batch_num = 1usize;
    while !sofas.is_empty() {
        tracing::info!(
            batch = batch_num,
            total_iter,
            pool = sofas.len(),
            "batch start"
        );

        let w = cfg.num_workers.max(1);
        let mut tasks: Vec<Vec<Sofa>> = (0..w).map(|_| Vec::new()).collect();
        for (i, s) in sofas.drain(..).enumerate() {
            tasks[i % w].push(s);
        }

        let results: Vec<(Vec<Sofa>, usize)> = tasks
            .into_par_iter()
            .enumerate()
            .map(|(i, task)| worker(task, &cfg.target, cfg.iters_per_batch, i))
            .collect();

        for (survivors, iter_cnt) in results {
            total_iter += iter_cnt;
            sofas.extend(survivors);
        }
        batch_num += 1;
    }
    total_iter
}

#[cfg(test)]
mod tests;

use rand::Rng;
use std::io::{self, Write};
use std::path::PathBuf;

/// Running win rate after `trial` rounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePoint {
    pub trial: u64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub trials: u64,
    pub wins: u64,
    pub points: Vec<ConvergencePoint>,
}

impl Simulation {
    pub fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }
}

/// Play one round per outcome against a threshold drawn uniformly from
/// `[1, N)`, keeping every `every`-th point of the running win rate.
pub fn run<I, R>(outcomes: I, partition_size: usize, every: u64, rng: &mut R) -> Simulation
where
    I: IntoIterator<Item = f64>,
    R: Rng + ?Sized,
{
    let span = partition_size.saturating_sub(1) as f64;
    let every = every.max(1);
    let mut sim = Simulation::default();

    for outcome in outcomes {
        let threshold = 1.0 + rng.gen::<f64>() * span;
        sim.trials += 1;
        if outcome > threshold {
            sim.wins += 1;
        }
        if sim.trials % every == 0 {
            sim.points.push(ConvergencePoint {
                trial: sim.trials,
                win_rate: sim.win_rate(),
            });
        }
    }

    sim
}

/// Write the convergence series as `trial,win_rate,target` rows.
pub fn write_csv<W: Write>(sim: &Simulation, target: f64, mut out: W) -> io::Result<()> {
    writeln!(out, "trial,win_rate,target")?;
    for p in &sim.points {
        writeln!(out, "{},{:.6},{:.6}", p.trial, p.win_rate, target)?;
    }
    out.flush()
}

pub fn default_output(target: f64) -> PathBuf {
    PathBuf::from(format!("convergence_{target:.6}.csv"))
}

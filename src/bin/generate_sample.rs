/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic training run.
struct Run {
    id: &'static str,
    /// Exponential decay rate of the loss curve.
    decay: f64,
    /// Loss plateau the run converges to.
    floor: f64,
    /// Evaluation interval in steps (runs log at different cadences).
    eval_every: i64,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let total_steps: i64 = 2000;

    let runs = [
        Run { id: "baseline", decay: 0.0015, floor: 0.45, eval_every: 50 },
        Run { id: "lr-3e-4", decay: 0.0025, floor: 0.32, eval_every: 50 },
        Run { id: "lr-1e-3", decay: 0.0040, floor: 0.38, eval_every: 100 },
        Run { id: "warmup-cosine", decay: 0.0030, floor: 0.28, eval_every: 25 },
    ];

    let output_path = "sample_experiments.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    // Deliberately not the canonical column order, plus an extra column.
    writer
        .write_record(["step", "experiment_id", "value", "metric_name", "epoch"])
        .expect("Failed to write header");

    let mut rows = 0usize;
    for run in &runs {
        for step in (0..=total_steps).step_by(run.eval_every as usize) {
            let t = step as f64;
            let epoch = (step / 500).to_string();

            let loss = run.floor + (2.3 - run.floor) * (-run.decay * t).exp() + rng.gauss(0.0, 0.02);
            let accuracy = (1.0 - loss / 2.5 + rng.gauss(0.0, 0.01)).clamp(0.0, 1.0);

            for (metric, value) in [("loss", loss), ("accuracy", accuracy)] {
                writer
                    .write_record([
                        step.to_string(),
                        run.id.to_string(),
                        format!("{value:.6}"),
                        metric.to_string(),
                        epoch.clone(),
                    ])
                    .expect("Failed to write row");
                rows += 1;
            }
        }
    }

    writer.flush().expect("Failed to flush output");

    println!(
        "Wrote {rows} rows for {} experiments to {output_path}",
        runs.len()
    );
}

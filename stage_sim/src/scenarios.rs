//! Built-in scenarios.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use stage_env::{Line, Scenario};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Mean drops from 0.8 to 0.4 after step 1000
    Abrupt,

    /// Mean slides linearly from 0.8 to 0.2 over steps 1000..2000
    Gradual,

    /// One step that makes the actor sleep
    Sleep,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![ScenarioId::Abrupt, ScenarioId::Gradual, ScenarioId::Sleep]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Abrupt => "abrupt",
            ScenarioId::Gradual => "gradual",
            ScenarioId::Sleep => "sleep",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Abrupt => "3000 noisy samples, mean 0.8 -> 0.4 at t=1000, fed to ADWIN",
            ScenarioId::Gradual => "4000 noisy samples, mean 0.8 -> 0.2 over t=1000..2000, fed to ADWIN",
            ScenarioId::Sleep => "single step sleeping a fixed time, for progress demos",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abrupt" => Ok(ScenarioId::Abrupt),
            "gradual" => Ok(ScenarioId::Gradual),
            "sleep" | "progress" => Ok(ScenarioId::Sleep),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

/// Shape of the mean over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftProfile {
    Abrupt,
    Gradual,
}

impl DriftProfile {
    /// Number of steps a scenario with this profile produces.
    pub fn steps(&self) -> i64 {
        match self {
            DriftProfile::Abrupt => 3000,
            DriftProfile::Gradual => 4000,
        }
    }

    /// True mean at step `t`.
    pub fn mu(&self, t: i64) -> f64 {
        match self {
            DriftProfile::Abrupt => {
                if t > 1000 {
                    0.4
                } else {
                    0.8
                }
            }
            DriftProfile::Gradual => {
                if t < 1000 {
                    0.8
                } else if t < 2000 {
                    -0.0006 * (t - 1000) as f64 + 0.8
                } else {
                    0.2
                }
            }
        }
    }
}

/// Gaussian samples around a drifting mean.
///
/// Lines carry `mu` (the true mean) and `x` (the noisy observation).
pub struct DriftScenario {
    profile: DriftProfile,
    t: i64,
    limit: i64,
    noise_std: f64,
    rng: ChaCha8Rng,
    mu: f64,
    x: f64,
}

impl DriftScenario {
    /// Noise standard deviation around the mean.
    pub const NOISE_STD: f64 = 0.05;

    pub fn new(profile: DriftProfile, seed: u64) -> Self {
        Self {
            profile,
            t: -1,
            limit: profile.steps(),
            noise_std: Self::NOISE_STD,
            rng: ChaCha8Rng::seed_from_u64(seed),
            mu: 0.0,
            x: 0.0,
        }
    }

    /// Factory for the abrupt-change scenario.
    pub fn abrupt(seed: u64) -> Self {
        Self::new(DriftProfile::Abrupt, seed)
    }

    /// Factory for the gradual-change scenario.
    pub fn gradual(seed: u64) -> Self {
        Self::new(DriftProfile::Gradual, seed)
    }
}

impl Scenario for DriftScenario {
    fn scan(&mut self) -> bool {
        self.t += 1;
        if self.t >= self.limit {
            return false;
        }
        self.mu = self.profile.mu(self.t);
        let z: f64 = self.rng.sample(StandardNormal);
        self.x = z * self.noise_std + self.mu;
        true
    }

    fn line(&self) -> Line {
        Line::new().with("mu", self.mu).with("x", self.x)
    }
}

/// A single step asking the actor to sleep.
pub struct SleepScenario {
    t: i64,
    limit: i64,
    sleep_ms: u64,
}

impl SleepScenario {
    pub fn new(sleep_ms: u64) -> Self {
        Self {
            t: -1,
            limit: 1,
            sleep_ms,
        }
    }
}

impl Scenario for SleepScenario {
    fn scan(&mut self) -> bool {
        self.t += 1;
        self.t < self.limit
    }

    fn line(&self) -> Line {
        Line::new().with("sleep_ms", self.sleep_ms)
    }
}

//! Collision statistics tracking for the event loop driver.
//! Tracks collision, secondary and per-species counts during a run.

use hadronic::types::Secondary;
use hadronic::utils::logging;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

// ------------------------------------------------------------------------------------------------
// Statistics Tracking
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Collisions requested from the generator
    pub collisions: usize,
    /// Collisions for which the generator returned no interaction
    pub empty_interactions: usize,
    /// Secondaries handed to the analysis
    pub secondaries: usize,
    /// Secondaries per species name
    pub species: BTreeMap<String, usize>,
    /// Wall time of the event loop
    pub elapsed_seconds: f64,
    #[serde(skip)]
    start_time: Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            collisions: 0,
            empty_interactions: 0,
            secondaries: 0,
            species: BTreeMap::new(),
            elapsed_seconds: 0.0,
            start_time: Instant::now(),
        }
    }

    /// Records one collision; `None` means the generator produced no interaction
    pub fn record_collision(&mut self, secondaries: Option<&[Secondary]>) {
        self.collisions += 1;
        match secondaries {
            Some(secondaries) => {
                self.secondaries += secondaries.len();
                for s in secondaries {
                    *self.species.entry(s.kind.name.to_string()).or_insert(0) += 1;
                }
            }
            None => self.empty_interactions += 1,
        }
    }

    /// Stops the clock
    pub fn finish(&mut self) {
        self.elapsed_seconds = self.start_time.elapsed().as_secs_f64();
    }

    pub fn mean_multiplicity(&self) -> f64 {
        if self.collisions == 0 {
            0.0
        } else {
            self.secondaries as f64 / self.collisions as f64
        }
    }

    pub fn print_final_stats(&self) {
        logging::log("DRIVER", "=== Run Statistics ===");
        logging::log("DRIVER", &format!("Duration: {:.2}s", self.elapsed_seconds));
        logging::log("DRIVER", &format!("Collisions: {}", self.collisions));
        logging::log("DRIVER", &format!("Empty interactions: {}", self.empty_interactions));
        logging::log("DRIVER", &format!("Secondaries: {}", self.secondaries));
        logging::log("DRIVER", &format!("Mean multiplicity: {:.2}", self.mean_multiplicity()));
        for (name, count) in &self.species {
            logging::log("DRIVER", &format!("  {:<12} {}", name, count));
        }
        logging::log("DRIVER", "======================");
    }
}

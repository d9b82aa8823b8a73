use hadronic::generator::InteractionGenerator;
use hadronic::kinematics::CollisionKinematics;
use hadronic::plugin::AnalysisHandle;
use hadronic::types::{Material, ParticleKind};
use hadronic::utils::logging;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::DriverError;
use crate::stats::RunStats;

// ------------------------------------------------------------------------------------------------
// Collision Setup
// ------------------------------------------------------------------------------------------------

/// Everything that stays fixed across the collisions of a run
#[derive(Debug, Clone)]
pub struct CollisionSetup {
    pub projectile: ParticleKind,
    /// Projectile lab momentum (GeV/c)
    pub momentum: f64,
    pub material: Material,
    pub kinematics: CollisionKinematics,
    pub num_collisions: usize,
    pub print_gap: usize,
}

// ------------------------------------------------------------------------------------------------
// Event Loop
// ------------------------------------------------------------------------------------------------

/// Runs `setup.num_collisions` collisions and feeds every secondary to `analysis`.
///
/// Collisions run in order and secondaries are filled in the order the
/// generator returns them. The analysis must already be initialized.
pub fn run_collisions(
    setup: &CollisionSetup,
    generator: &mut dyn InteractionGenerator,
    analysis: &mut AnalysisHandle,
    show_progress: bool,
) -> Result<RunStats, DriverError> {
    let progress_bar = if show_progress {
        ProgressBar::new(setup.num_collisions as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} collisions ({eta})")
    {
        progress_bar.set_style(style.progress_chars("##-"));
    }

    let print_gap = setup.print_gap.max(1);
    let mut stats = RunStats::new();

    for i in 0..setup.num_collisions {
        let secondaries = generator.generate_interaction(&setup.projectile, setup.momentum, &setup.material);
        stats.record_collision(secondaries.as_deref());

        let print_secondaries = logging::is_enabled() && i % print_gap == 0;
        if logging::is_enabled() {
            logging::log("DRIVER", &format!(
                "Collision {} ; projectile={} ; p[GeV/c]={} ; material={} --> #secondaries={}",
                i,
                setup.projectile,
                setup.momentum,
                setup.material,
                secondaries.as_ref().map_or(0, Vec::len)
            ));
            if print_secondaries {
                logging::log("DRIVER", "List of produced secondaries:");
            }
        }

        for (j, secondary) in secondaries.iter().flatten().enumerate() {
            if print_secondaries {
                logging::log("DRIVER", &format!("  j={}\t{}\tp={} GeV", j, secondary.kind, secondary.p4));
            }
            let observables = setup.kinematics.observe(&secondary.p4, secondary.kind.mass);
            analysis.fill(&observables, &secondary.kind)?;
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_and_clear();
    stats.finish();
    Ok(stats)
}

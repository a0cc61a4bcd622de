/*!
 * Singleton Demo - Main Entry Point
 *
 * Stress-tests each singleton variant and reports what it observed:
 * - distinct instances handed out under contention
 * - constructor runs
 * - partially constructed reads
 * - teardown at process exit
 */

use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use singleton_patterns::{
    init_tracing, stress_singleton, DeferredSingleton, EagerSingleton, GuardedSingleton,
    HarnessConfig, NaiveSingleton, ProcessLifetime, RunContext, Singleton, StressReport, Variant,
    VariantProfile,
};

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("Singleton demo starting...");
    info!("================================================");

    // SAFETY: the guard lives until the end of main, after every stress run
    // has joined its threads.
    let lifetime = unsafe { ProcessLifetime::enter() };

    let context = RunContext::install()?;
    info!(run_id = %context.run_id(), "Run context ready");

    let config = HarnessConfig::global()?;
    info!(
        threads = config.threads,
        rounds = config.rounds,
        construction_delay_us = config.construction_delay_us,
        "Harness configured"
    );

    for variant in Variant::ALL {
        let profile = VariantProfile::from(variant);
        info!(
            variant = %variant,
            init = profile.init_timing,
            thread_safety = profile.thread_safety,
            cleanup = profile.cleanup,
            defect = profile.known_defect.unwrap_or("none"),
            "Variant profile"
        );
    }

    let stress_config = config.stress_config();
    let reports: Vec<StressReport> = vec![
        stress_singleton::<NaiveSingleton>(&stress_config),
        stress_singleton::<GuardedSingleton>(&stress_config),
        stress_singleton::<DeferredSingleton>(&stress_config),
        stress_singleton::<EagerSingleton>(&stress_config),
    ];

    if NaiveSingleton::constructions() > 1 {
        warn!(
            constructions = NaiveSingleton::constructions(),
            surviving_serial = NaiveSingleton::instance().serial(),
            "Naive singleton raced: extra instances leaked"
        );
    }

    if config.json_report {
        for report in &reports {
            println!("{}", report.to_json().into_diagnostic()?);
        }
    }

    info!("================================================");
    info!(
        elapsed_ms = context.started_at().elapsed().as_millis() as u64,
        "Stress runs complete, tearing down"
    );

    drop(lifetime);

    info!(
        destructions = GuardedSingleton::destructions(),
        "Guarded singleton teardown finished"
    );
    Ok(())
}

// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_log::{diagnostic, info, warn};
use crlab_platform::{
    ExecutionParameters, Platform, PulseSequence, Session, create_platform, measurement_of,
};
use crlab_timeline::{QubitId, ResultSeries};
use indexmap::IndexMap;

use crate::config::LabConfig;
use crate::error::{Error, Result};
use crate::experiments::{ExperimentPlan, series_label};
use crate::persist::ExperimentRecord;

/// Set readout attenuations. Must happen before the platform is connected.
pub fn apply_attenuation(
    platform: &mut dyn Platform,
    attenuation: &IndexMap<u32, u32>,
) -> Result<()> {
    for (qubit, db) in attenuation {
        platform.set_readout_attenuation(QubitId(*qubit), *db)?;
        info!("Readout attenuation of q{} set to {} dB", qubit, db);
    }
    Ok(())
}

/// Sweep every run of `plan` over its axis and collect the readout magnitudes.
///
/// The platform is connected for the duration of the sweep and disconnected
/// afterwards, also when a point fails.
pub fn run_experiment(
    platform: &mut dyn Platform,
    plan: &ExperimentPlan,
    options: &ExecutionParameters,
) -> Result<ExperimentRecord> {
    options.validate()?;
    let axis = plan.axis.concatenate()?;
    // reject points outside a plan before anything is played
    for run in &plan.runs {
        plan.check(run)?;
    }
    let coincident = plan.axis.coincident_boundaries();
    if !coincident.is_empty() {
        warn!(
            "Sweep of '{}' repeats {} boundary point(s) at indices {:?}",
            plan.name,
            coincident.len(),
            coincident
        );
    }

    let mut series: IndexMap<String, ResultSeries> = IndexMap::new();
    for run in &plan.runs {
        for qubit in run.readout_qubits() {
            let label = series_label(&run.label, qubit);
            series.insert(label.clone(), ResultSeries::new(label, axis.len()));
        }
    }

    let mut session = Session::open(platform)?;
    info!(
        "Running '{}': {} run(s) over {} point(s)",
        plan.name,
        plan.runs.len(),
        axis.len()
    );
    for run in &plan.runs {
        for point in plan.axis.points() {
            let timeline = plan.timeline(run, point.value)?;
            let sequence = PulseSequence::from_timeline(&timeline, session.platform())?;
            let results = session.execute(&sequence, options)?;
            for readout in sequence.readout_pulses() {
                let label = series_label(&run.label, readout.qubit());
                let magnitude = measurement_of(&results, readout.serial)?.magnitude();
                series
                    .get_mut(&label)
                    .ok_or_else(|| Error::new(format!("No series for readout '{label}'")))?
                    .record(point.index, magnitude)?;
            }
            diagnostic!(
                "{} point {} (value {}, sub-range {}) done",
                run.label,
                point.index,
                point.value,
                point.segment
            );
        }
        info!("Run '{}' of '{}' finished", run.label, plan.name);
    }
    let platform_name = session.platform().name().to_string();
    session.close()?;

    let mut collected = IndexMap::new();
    for (label, values) in series {
        collected.insert(label, values.to_array()?.to_vec());
    }
    Ok(ExperimentRecord {
        experiment: plan.name.clone(),
        platform: platform_name,
        parameter: plan.parameter,
        execution: *options,
        axis: axis.to_vec(),
        segment_lens: plan.axis.segment_lens(),
        coincident_boundaries: coincident,
        series: collected,
    })
}

/// Run the experiment described by a sanitized configuration.
pub fn run_lab(config: &LabConfig) -> Result<ExperimentRecord> {
    let mut platform = create_platform(&config.platform)?;
    apply_attenuation(platform.as_mut(), &config.readout_attenuation)?;
    let plan = config.experiment.plan(platform.as_ref())?;
    run_experiment(platform.as_mut(), &plan, &config.execution)
}

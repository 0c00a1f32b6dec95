// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use crlab_timeline::normalize::{min_max_normalize, min_max_pair};
use crlab_timeline::{
    AnchorDurations, Channel, ExperimentContext, PhasePlan, PhaseSpec, PulseRole, QubitId,
    SegmentedAxis, SubRange, build_timeline,
};
use crlab_units::nanoseconds;
use ndarray::Array1;
use proptest::prelude::*;

fn role_phase(role: u8, qubit: u32) -> PhaseSpec {
    let channel = Channel::drive(qubit);
    match role % 4 {
        0 => PhaseSpec::idle(channel),
        1 => PhaseSpec::drive(channel),
        2 => PhaseSpec::inversion(channel),
        _ => PhaseSpec::echo(channel).amplitude(-1.0),
    }
}

fn context(start: f64, lengths: &[f64], roles: &[u8]) -> ExperimentContext {
    let mut builder = PhasePlan::starting_at(nanoseconds(start));
    for (length, role) in lengths.iter().zip(roles) {
        builder = builder.then(role_phase(*role, 0), nanoseconds(*length));
    }
    let anchors = AnchorDurations {
        pi_pulse: nanoseconds(40.0),
        readout: nanoseconds(2000.0),
    };
    ExperimentContext::new(anchors, builder.build().unwrap())
        .read_out(Channel::readout(QubitId(0)))
}

fn plan_strategy() -> impl Strategy<Value = (f64, Vec<f64>, Vec<u8>, f64)> {
    (1usize..6)
        .prop_flat_map(|n| {
            (
                0.0f64..100.0,
                prop::collection::vec(0.5f64..500.0, n),
                prop::collection::vec(any::<u8>(), n),
                0.0f64..=1.0,
            )
        })
}

proptest! {
    #[test]
    fn segments_follow_the_cut_points((start, lengths, roles, fraction) in plan_strategy()) {
        let offset = 45.0;
        let ctx = context(start, &lengths, &roles).offset(nanoseconds(offset));
        let t = (start + fraction * (ctx.plan.end().value() - start)).min(ctx.plan.end().value());
        let current = ctx.plan.locate(t).unwrap();
        let timeline = build_timeline(&ctx, t).unwrap();
        let cuts = ctx.plan.boundaries();
        let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * b.abs().max(1.0);

        let segments: Vec<_> = timeline.iter().filter(|iv| iv.role != PulseRole::Readout).collect();
        prop_assert_eq!(segments.len(), current + 1);
        for (k, iv) in segments.iter().enumerate() {
            prop_assert!(iv.duration.value() >= 0.0);
            prop_assert!(close(iv.start.value(), cuts[k].value() + offset));
            let finish = iv.start.value() + iv.duration.value();
            let expected = if k < current { cuts[k + 1].value() } else { t };
            prop_assert!(close(finish, expected + offset), "segment {}: {} vs {}", k, finish, expected + offset);
        }
    }

    #[test]
    fn sequential_segments_are_chained((start, lengths, roles, fraction) in plan_strategy()) {
        let ctx = context(start, &lengths, &roles);
        let t = (start + fraction * (ctx.plan.end().value() - start)).min(ctx.plan.end().value());
        let timeline = build_timeline(&ctx, t).unwrap();
        let ivs = timeline.intervals();
        for pair in ivs.windows(2) {
            prop_assert_eq!(pair[1].start, pair[0].finish());
        }
        prop_assert_eq!(ivs.last().unwrap().role, PulseRole::Readout);
        prop_assert!(timeline.validate().is_ok());
    }

    #[test]
    fn cut_points_open_the_later_phase(lengths in prop::collection::vec(1u32..200, 2..6)) {
        let lengths: Vec<f64> = lengths.into_iter().map(f64::from).collect();
        let roles: Vec<u8> = (0..lengths.len() as u8).collect();
        let ctx = context(0.0, &lengths, &roles);
        for (k, cut) in ctx.plan.boundaries().iter().enumerate().take(lengths.len()) {
            let timeline = build_timeline(&ctx, cut.value()).unwrap();
            let segments: Vec<_> = timeline.iter().filter(|iv| iv.role != PulseRole::Readout).collect();
            prop_assert_eq!(segments.len(), k + 1);
            prop_assert!(segments[k].duration.is_zero());
        }
    }

    #[test]
    fn concatenated_length_is_sum(
        ranges in prop::collection::vec((0.0f64..1000.0, 1.0f64..400.0, 1usize..30), 1..6)
    ) {
        let subs: Vec<SubRange> = ranges
            .iter()
            .map(|(start, span, n)| SubRange::linspace(*start, start + span, *n))
            .collect();
        let axis = SegmentedAxis::from_ranges(&subs).unwrap();
        let flat = axis.concatenate().unwrap();
        prop_assert_eq!(flat.len(), ranges.iter().map(|r| r.2).sum::<usize>());
        prop_assert_eq!(axis.points().count(), flat.len());
    }

    #[test]
    fn normalization_is_affine_and_ordered(
        a in prop::collection::vec(-1e5f64..1e5, 1..40),
        b in prop::collection::vec(-1e5f64..1e5, 1..40),
    ) {
        let a = Array1::from_vec(a);
        let b = Array1::from_vec(b);
        let (min, max) = min_max_pair(a.view(), b.view()).unwrap();
        prop_assume!(max > min);
        let na = min_max_normalize(min, max, a.view()).unwrap();
        let nb = min_max_normalize(min, max, b.view()).unwrap();
        let all: Vec<(f64, f64)> = a.iter().chain(b.iter()).copied()
            .zip(na.iter().chain(nb.iter()).copied())
            .collect();
        for (raw, norm) in &all {
            prop_assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(norm));
            if *raw == min {
                prop_assert!((norm + 1.0).abs() < 1e-12);
            }
            if *raw == max {
                prop_assert!((norm - 1.0).abs() < 1e-12);
            }
        }
        for (x, nx) in &all {
            for (y, ny) in &all {
                if x < y {
                    prop_assert!(nx <= ny);
                }
            }
        }
    }
}

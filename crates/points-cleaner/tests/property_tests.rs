//! Property-Based Tests for the Points Cleaner
//!
//! These tests check the filter's invariants across randomly generated
//! sample sequences and tunings.

use points_cleaner::prelude::*;
use points_cleaner::SymmetricRange;

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn tuned(
        window_size: usize,
        match_fraction: f32,
        reaction_speed: f32,
        threshold2: f32,
    ) -> Result<PointsCleaner, CleanerError> {
        let config = CleanerConfig::default()
            .with_window_size(window_size)
            .with_match_fraction(match_fraction)
            .with_reaction_speed(reaction_speed)
            .with_thresholds(0.15, threshold2);
        PointsCleaner::from_config(&config)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn output_always_finite(
            samples in prop::collection::vec(-10.0f32..10.0f32, 1..200),
            window_size in 1usize..16,
        ) {
            let mut cleaner = PointsCleaner::new(window_size)?;
            for raw in samples {
                let out = cleaner.process_sample(raw)?;
                prop_assert!(out.value().is_some_and(f32::is_finite));
            }
        }

        #[test]
        fn large_jump_passes_through_and_skips_window(
            warmup in prop::collection::vec(-1.0f32..1.0f32, 0..30),
            extra in 0.01f32..5.0f32,
            upward in any::<bool>(),
        ) {
            let mut cleaner = PointsCleaner::new(6)?;
            for raw in warmup {
                cleaner.process_sample(raw)?;
            }

            let before = cleaner.deltas().to_vec();
            let jump = cleaner.threshold1() + extra;
            let target = if upward {
                cleaner.last_accepted() + jump
            } else {
                cleaner.last_accepted() - jump
            };

            let out = cleaner.process_sample(target)?;
            prop_assert_eq!(out, Reading::Clean(target));
            prop_assert_eq!(cleaner.deltas(), before.as_slice());
        }

        #[test]
        fn corrections_are_damped_and_thresholded(
            samples in prop::collection::vec(-0.5f32..0.5f32, 1..200),
            window_size in 1usize..12,
            match_fraction in 0.0f32..=1.0f32,
            reaction_speed in 0.0f32..=1.0f32,
            threshold2 in 0.0f32..0.05f32,
        ) {
            let mut cleaner = tuned(window_size, match_fraction, reaction_speed, threshold2)?;

            for raw in samples {
                let before = cleaner.last_accepted();
                let out = cleaner.process_sample(raw)?.value().unwrap_or(f32::NAN);
                let largest = cleaner
                    .deltas()
                    .iter()
                    .fold(0.0f32, |acc, d| acc.max(d.abs()));

                let decision = cleaner.last_decision();
                if !matches!(decision, Decision::Bypassed { .. }) {
                    prop_assert!((out - (before + decision.applied_correction())).abs() < 1e-5);
                }

                match decision {
                    Decision::Corrected { correction, .. } => {
                        prop_assert!(correction.abs() > threshold2);
                        prop_assert!(correction.abs() <= largest * reaction_speed + 1e-6);
                        prop_assert!((out - (before + correction)).abs() < 1e-5);
                    }
                    Decision::Suppressed { correction, .. } => {
                        prop_assert!(correction.abs() <= threshold2);
                        prop_assert!((out - before).abs() < f32::EPSILON);
                    }
                    Decision::NoConsensus { matches, required } => {
                        prop_assert!(matches < required);
                        prop_assert!((out - before).abs() < f32::EPSILON);
                    }
                    Decision::Bypassed { .. } => {
                        prop_assert!((out - raw).abs() < f32::EPSILON);
                    }
                    Decision::Pending => prop_assert!(false, "no auto-center configured"),
                }
            }
        }

        #[test]
        fn constant_input_never_moves(
            start in prop_oneof![0.2f32..10.0f32, -10.0f32..-0.2f32],
            window_size in 1usize..16,
            match_fraction in 0.0f32..=1.0f32,
            repeats in 1usize..200,
        ) {
            let mut cleaner = tuned(window_size, match_fraction, 1.0, 0.0)?;

            // First sample jumps past threshold1 and is accepted as-is
            prop_assert_eq!(cleaner.process_sample(start)?, Reading::Clean(start));
            for _ in 0..repeats {
                prop_assert_eq!(cleaner.process_sample(start)?, Reading::Clean(start));
            }
        }

        #[test]
        fn required_matches_is_ceiling(
            match_fraction in 0.0f32..=1.0f32,
            window_size in 1usize..64,
        ) {
            let mut cleaner = PointsCleaner::new(window_size)?;
            cleaner.set_match_fraction(match_fraction)?;

            let exact = f64::from(match_fraction) * window_size as f64;
            let required = cleaner.required_matches();
            prop_assert!(required <= window_size);
            prop_assert!(required as f64 >= exact - 1e-6);
            prop_assert!((required as f64) < exact + 1.0);
        }

        #[test]
        fn wrapped_output_stays_in_range(
            half_range in 0.5f32..4.0f32,
            first in -1.0f32..1.0f32,
            follow in prop::collection::vec(-1.0f32..1.0f32, 1..50),
        ) {
            let mut center = AutoCenter::new(0, half_range)?;
            let range = SymmetricRange::new(half_range);
            prop_assert_eq!(center.apply(first * half_range), Some(0.0));

            for unit in follow {
                let out = center.apply(unit * half_range).unwrap_or(f32::NAN);
                prop_assert!(out >= range.min - 1e-5);
                prop_assert!(out < range.max + 1e-5);
            }
        }

        #[test]
        fn extreme_samples_never_reach_window_as_non_finite(
            samples in prop::collection::vec(
                prop_oneof![
                    -1.5e38f32..1.5e38f32,
                    Just(f32::MAX),
                    Just(f32::MIN),
                    -1.0f32..1.0f32,
                ],
                1..100,
            ),
            half_range in prop_oneof![Just(1.0f32), Just(f32::MAX / 2.0)],
        ) {
            let mut cleaner = PointsCleaner::new(4)?;
            cleaner.enable_auto_center(0, half_range)?;

            for raw in samples {
                let last = cleaner.last_accepted();
                match cleaner.process_sample(raw) {
                    Ok(reading) => prop_assert!(reading.value().is_some_and(f32::is_finite)),
                    Err(e) => {
                        prop_assert!(matches!(e, CleanerError::CenteredOverflow(_)));
                        prop_assert_eq!(cleaner.last_accepted().to_bits(), last.to_bits());
                    }
                }
                prop_assert!(cleaner.deltas().iter().all(|d| d.is_finite()));
            }
        }

        #[test]
        fn non_finite_sample_leaves_state(
            warmup in prop::collection::vec(-1.0f32..1.0f32, 0..30),
            bad in prop_oneof![Just(f32::NAN), Just(f32::INFINITY), Just(f32::NEG_INFINITY)],
        ) {
            let mut cleaner = PointsCleaner::new(4)?;
            for raw in warmup {
                cleaner.process_sample(raw)?;
            }

            let deltas = cleaner.deltas().to_vec();
            let last = cleaner.last_accepted();
            let decision = cleaner.last_decision();

            let rejected = cleaner.process_sample(bad);
            prop_assert!(matches!(rejected, Err(CleanerError::NonFiniteSample(_))));
            prop_assert_eq!(cleaner.deltas(), deltas.as_slice());
            prop_assert_eq!(cleaner.last_accepted().to_bits(), last.to_bits());
            prop_assert_eq!(cleaner.last_decision(), decision);
        }
    }
}

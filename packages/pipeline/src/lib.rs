#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The filter/classify/partition pass over a loaded crash record set.
//!
//! Data flows one way: sample → time-window filter → severity partition.
//! Nothing here mutates the loaded set; each dashboard filter change
//! re-runs the pass from the same records.

use crash_map_crash_models::{CrashRecord, Severity, TimeWindow};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

/// Maximum number of records handed to the renderer.
pub const MAX_RENDER_RECORDS: usize = 20_000;

/// Fixed seed for display sampling, so identical inputs render
/// identically across runs.
pub const SAMPLE_SEED: u64 = 42;

/// Caps the working set to `bound` records for rendering performance.
///
/// Collections at or below the bound are returned unchanged. Larger
/// collections are reduced to a uniform random sample without
/// replacement, drawn with a seeded [`StdRng`] so the result is
/// reproducible for a given input and seed. Source order is preserved in
/// the sample.
#[must_use]
pub fn sample_for_display(records: &[CrashRecord], bound: usize, seed: u64) -> Vec<CrashRecord> {
    if records.len() <= bound {
        return records.to_vec();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, records.len(), bound).into_vec();
    indices.sort_unstable();

    log::info!(
        "Sampled {bound} of {} records for display (seed {seed})",
        records.len()
    );

    indices.into_iter().map(|i| records[i]).collect()
}

/// Selects the records whose `crash_hour` falls in the given window.
///
/// Order-preserving; an empty result is valid. The input is not mutated.
#[must_use]
pub fn filter_by_window(records: &[CrashRecord], window: TimeWindow) -> Vec<CrashRecord> {
    records
        .iter()
        .filter(|r| window.contains_hour(r.crash_hour))
        .copied()
        .collect()
}

/// The three disjoint severity buckets handed to the map renderer.
///
/// Every filtered record lands in exactly one bucket; bucket order is
/// stable relative to the filtered collection's order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeverityBuckets {
    /// Records classified [`Severity::Minor`].
    pub minor: Vec<CrashRecord>,
    /// Records classified [`Severity::Moderate`].
    pub moderate: Vec<CrashRecord>,
    /// Records classified [`Severity::Severe`].
    pub severe: Vec<CrashRecord>,
}

impl SeverityBuckets {
    /// Returns the bucket for the given severity.
    #[must_use]
    pub fn bucket(&self, severity: Severity) -> &[CrashRecord] {
        match severity {
            Severity::Minor => &self.minor,
            Severity::Moderate => &self.moderate,
            Severity::Severe => &self.severe,
        }
    }

    /// Total number of records across all three buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.minor.len() + self.moderate.len() + self.severe.len()
    }

    /// Returns whether all three buckets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every record across the three buckets.
    pub fn iter(&self) -> impl Iterator<Item = &CrashRecord> {
        self.minor
            .iter()
            .chain(self.moderate.iter())
            .chain(self.severe.iter())
    }
}

/// Groups records into severity buckets by classifying each one.
#[must_use]
pub fn partition_by_severity(records: &[CrashRecord]) -> SeverityBuckets {
    let mut buckets = SeverityBuckets::default();

    for record in records {
        match record.severity() {
            Severity::Minor => buckets.minor.push(*record),
            Severity::Moderate => buckets.moderate.push(*record),
            Severity::Severe => buckets.severe.push(*record),
        }
    }

    buckets
}

/// Runs one full filter → classify → partition pass.
#[must_use]
pub fn run(records: &[CrashRecord], window: TimeWindow) -> SeverityBuckets {
    let filtered = filter_by_window(records, window);
    let buckets = partition_by_severity(&filtered);

    log::debug!(
        "{window}: {} filtered -> {} minor / {} moderate / {} severe",
        filtered.len(),
        buckets.minor.len(),
        buckets.moderate.len(),
        buckets.severe.len()
    );

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hour: u8, fatal: u32, incap: u32, non_incap: u32) -> CrashRecord {
        CrashRecord {
            latitude: 41.8 + f64::from(hour) * 0.001,
            longitude: -87.6,
            crash_hour: hour,
            injuries_fatal: fatal,
            injuries_incapacitating: incap,
            injuries_non_incapacitating: non_incap,
        }
    }

    fn example_records() -> Vec<CrashRecord> {
        vec![
            CrashRecord {
                latitude: 41.8,
                longitude: -87.6,
                crash_hour: 7,
                injuries_fatal: 0,
                injuries_incapacitating: 0,
                injuries_non_incapacitating: 0,
            },
            CrashRecord {
                latitude: 41.9,
                longitude: -87.7,
                crash_hour: 20,
                injuries_fatal: 1,
                injuries_incapacitating: 0,
                injuries_non_incapacitating: 0,
            },
            CrashRecord {
                latitude: 41.7,
                longitude: -87.5,
                crash_hour: 13,
                injuries_fatal: 0,
                injuries_incapacitating: 0,
                injuries_non_incapacitating: 2,
            },
        ]
    }

    /// Builds `count` records distinguishable by coordinates.
    fn many_records(count: u32) -> Vec<CrashRecord> {
        (0..count)
            .map(|i| {
                let mut r = record(u8::try_from(i % 24).unwrap(), 0, 0, 0);
                r.longitude += f64::from(i) * 1e-6;
                r
            })
            .collect()
    }

    #[test]
    fn sampling_is_a_noop_below_the_bound() {
        let records = many_records(100);
        let sampled = sample_for_display(&records, MAX_RENDER_RECORDS, SAMPLE_SEED);
        assert_eq!(sampled, records);
    }

    #[test]
    fn sampling_is_deterministic() {
        let records = many_records(500);
        let first = sample_for_display(&records, 50, SAMPLE_SEED);
        let second = sample_for_display(&records, 50, SAMPLE_SEED);
        assert_eq!(first, second);
        assert_eq!(first.len(), 50);
    }

    #[test]
    fn sampling_preserves_source_order() {
        let records = many_records(500);
        let sampled = sample_for_display(&records, 50, SAMPLE_SEED);

        let mut positions = Vec::new();
        for item in &sampled {
            let pos = records
                .iter()
                .position(|r| r == item)
                .expect("sampled record not in source");
            positions.push(pos);
        }
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn different_seeds_draw_different_samples() {
        let records = many_records(5_000);
        let a = sample_for_display(&records, 100, 42);
        let b = sample_for_display(&records, 100, 43);
        assert_ne!(a, b);
    }

    #[test]
    fn filter_keeps_only_matching_hours() {
        let records = example_records();
        let morning = filter_by_window(&records, TimeWindow::Morning);
        assert_eq!(morning.len(), 1);
        assert_eq!(morning[0].crash_hour, 7);
    }

    #[test]
    fn filter_empty_result_is_valid() {
        let records = vec![record(7, 0, 0, 0)];
        let night = filter_by_window(&records, TimeWindow::Night);
        assert!(night.is_empty());
    }

    #[test]
    fn all_window_passes_everything_through() {
        let records = example_records();
        assert_eq!(filter_by_window(&records, TimeWindow::All), records);
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let records: Vec<CrashRecord> = (0..60u32)
            .map(|i| {
                let mut r = record(
                    u8::try_from(i % 24).unwrap(),
                    u32::from(i % 5 == 0),
                    u32::from(i % 7 == 0),
                    u32::from(i % 3 == 0),
                );
                r.longitude += f64::from(i) * 1e-6;
                r
            })
            .collect();
        let buckets = partition_by_severity(&records);

        assert_eq!(buckets.len(), records.len());
        for item in &records {
            let hits = Severity::all()
                .iter()
                .filter(|s| buckets.bucket(**s).contains(item))
                .count();
            assert_eq!(hits, 1, "record must land in exactly one bucket");
        }
    }

    #[test]
    fn partition_preserves_filtered_order() {
        let records = vec![
            record(1, 0, 0, 0),
            record(2, 0, 0, 0),
            record(3, 0, 0, 1),
            record(4, 0, 0, 0),
        ];
        let buckets = partition_by_severity(&records);
        assert_eq!(buckets.minor[0].crash_hour, 1);
        assert_eq!(buckets.minor[1].crash_hour, 2);
        assert_eq!(buckets.minor[2].crash_hour, 4);
        assert_eq!(buckets.moderate[0].crash_hour, 3);
    }

    #[test]
    fn end_to_end_all_window() {
        let records = example_records();
        let buckets = run(&records, TimeWindow::All);

        assert_eq!(buckets.minor.len(), 1);
        assert_eq!(buckets.moderate.len(), 1);
        assert_eq!(buckets.severe.len(), 1);
        assert_eq!(buckets.minor[0].crash_hour, 7);
        assert_eq!(buckets.severe[0].crash_hour, 20);
        assert_eq!(buckets.moderate[0].crash_hour, 13);
    }

    #[test]
    fn end_to_end_morning_window() {
        let records = example_records();
        let buckets = run(&records, TimeWindow::Morning);

        assert_eq!(buckets.minor.len(), 1);
        assert!(buckets.moderate.is_empty());
        assert!(buckets.severe.is_empty());
    }
}

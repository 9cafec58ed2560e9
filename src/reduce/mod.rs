//! Raw dataset -> ranked dataset.
//!
//! Stages run in a fixed order, each producing a new sequence:
//! deduplicate by description, coerce ratings, keep ratings at or above the
//! configured quantile, coerce price and review count, then sort by price
//! ascending with review count descending as the tie-break.
//!
//! Coerced numbers are only sort/filter keys. Ranked records keep the
//! extraction-time text of every field.

pub mod coerce;
pub mod errors;
pub mod quantile;

pub use errors::{CoercedField, CoercionError, ReduceError};

use std::collections::HashSet;

use tracing::{info, warn};

use crate::extractor::Record;

/// What to do with a record whose rating or price text does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Fail the whole reduction with the first coercion error.
    Abort,
    /// Drop the record, log a warning, keep going.
    #[default]
    SkipWithWarning,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReduceStats {
    pub input: usize,
    pub deduplicated: usize,
    /// `None` when no rating survived coercion.
    pub threshold: Option<f64>,
    pub above_threshold: usize,
    pub skipped: Vec<CoercionError>,
    pub output: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReduceOutcome {
    pub records: Vec<Record>,
    pub stats: ReduceStats,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reducer {
    quantile: f64,
    policy: CoercionPolicy,
}

impl Reducer {
    pub fn new(quantile: f64, policy: CoercionPolicy) -> Result<Self, ReduceError> {
        if !(0.0..=1.0).contains(&quantile) {
            return Err(ReduceError::InvalidQuantile(quantile));
        }
        Ok(Self { quantile, policy })
    }

    pub fn reduce(&self, records: Vec<Record>) -> Result<ReduceOutcome, ReduceError> {
        self.run(records, None)
    }

    /// Same stages, but filter against a known threshold instead of
    /// recomputing the quantile over `records`.
    pub fn reduce_with_threshold(
        &self,
        records: Vec<Record>,
        threshold: f64,
    ) -> Result<ReduceOutcome, ReduceError> {
        self.run(records, Some(threshold))
    }

    fn run(
        &self,
        records: Vec<Record>,
        fixed_threshold: Option<f64>,
    ) -> Result<ReduceOutcome, ReduceError> {
        let mut stats = ReduceStats {
            input: records.len(),
            ..ReduceStats::default()
        };

        let unique = deduplicate(records);
        stats.deduplicated = unique.len();

        let rated = self.coerce_all(unique, coerce::rating, &mut stats.skipped)?;

        let threshold = match fixed_threshold {
            Some(t) => Some(t),
            None => {
                let ratings: Vec<f64> = rated.iter().map(|(_, r)| *r).collect();
                quantile::quantile(&ratings, self.quantile)
            }
        };
        stats.threshold = threshold;

        let Some(threshold) = threshold else {
            info!(input = stats.input, "no ratings to rank, ranked dataset is empty");
            return Ok(ReduceOutcome {
                records: Vec::new(),
                stats,
            });
        };

        let kept = filter_at_threshold(rated, threshold);
        stats.above_threshold = kept.len();

        let keyed = self.coerce_all(
            kept.into_iter().map(|(record, _)| record).collect(),
            |record| Ok((coerce::price(record)?, coerce::review_count(record)?)),
            &mut stats.skipped,
        )?;

        let ranked = sort_by_price_then_reviews(keyed);
        stats.output = ranked.len();

        info!(
            input = stats.input,
            deduplicated = stats.deduplicated,
            threshold,
            ranked = stats.output,
            skipped = stats.skipped.len(),
            "reduced raw dataset"
        );

        Ok(ReduceOutcome {
            records: ranked,
            stats,
        })
    }

    fn coerce_all<K>(
        &self,
        records: Vec<Record>,
        key: impl Fn(&Record) -> Result<K, CoercionError>,
        skipped: &mut Vec<CoercionError>,
    ) -> Result<Vec<(Record, K)>, ReduceError> {
        let mut keyed = Vec::with_capacity(records.len());
        for record in records {
            match key(&record) {
                Ok(k) => keyed.push((record, k)),
                Err(e) => match self.policy {
                    CoercionPolicy::Abort => return Err(e.into()),
                    CoercionPolicy::SkipWithWarning => {
                        warn!("skipping listing: {}", e);
                        skipped.push(e);
                    }
                },
            }
        }
        Ok(keyed)
    }
}

/// Keep the first record for each description, in first-seen order.
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.description.clone()))
        .collect()
}

/// Keep records whose rating meets or exceeds `threshold`.
pub fn filter_at_threshold(rated: Vec<(Record, f64)>, threshold: f64) -> Vec<(Record, f64)> {
    rated
        .into_iter()
        .filter(|(_, rating)| *rating >= threshold)
        .collect()
}

/// Price ascending, then review count descending. Stable.
pub fn sort_by_price_then_reviews(mut keyed: Vec<(Record, (f64, u64))>) -> Vec<Record> {
    keyed.sort_by(|(_, (price_a, reviews_a)), (_, (price_b, reviews_b))| {
        price_a
            .total_cmp(price_b)
            .then_with(|| reviews_b.cmp(reviews_a))
    });
    keyed.into_iter().map(|(record, _)| record).collect()
}

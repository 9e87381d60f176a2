//! Per-species rollup and ranking.

use std::cmp::Ordering;
use std::collections::HashMap;

use byt_types::Sighting;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::record::ObservationRecord;

/// Every observation of one species folded together.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesAggregate {
    /// Species key (code, or synthesized from the names).
    pub code: String,
    /// Common name from the first record seen.
    pub common_name: String,
    /// Scientific name from the first record seen.
    pub scientific_name: Option<String>,
    /// Number of records folded in.
    pub observation_count: u64,
    /// Sum of per-record individual counts. Malformed records can make
    /// this fractional, negative, or smaller than `observation_count`.
    pub individual_count: f64,
    /// Earliest valid observation time.
    pub earliest: Option<DateTime<Utc>>,
    /// Latest valid observation time.
    pub latest: Option<DateTime<Utc>>,
}

impl SpeciesAggregate {
    fn empty(code: String, record: &ObservationRecord) -> Self {
        Self {
            code,
            common_name: record.common_name().to_owned(),
            scientific_name: record.sci_name.clone(),
            observation_count: 0,
            individual_count: 0.0,
            earliest: None,
            latest: None,
        }
    }

    fn absorb(&mut self, individuals: f64, observed_at: Option<DateTime<Utc>>) {
        self.observation_count = self.observation_count.saturating_add(1);
        self.individual_count += individuals;
        if let Some(ts) = observed_at {
            self.earliest = Some(self.earliest.map_or(ts, |e| e.min(ts)));
            self.latest = Some(self.latest.map_or(ts, |l| l.max(ts)));
        }
    }

    /// Public projection, with the resolved thumbnail.
    pub fn into_sighting(self, image_url: Option<String>) -> Sighting {
        Sighting {
            code: self.code,
            common_name: self.common_name,
            scientific_name: self.scientific_name,
            count: self.observation_count,
            image_url,
        }
    }
}

/// Fold records into one aggregate per species key, in first-seen order.
pub fn fold(records: &[ObservationRecord], timezone: Tz) -> Vec<SpeciesAggregate> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut aggregates: Vec<SpeciesAggregate> = Vec::new();

    for record in records {
        let key = record.species_key();
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                let i = aggregates.len();
                aggregates.push(SpeciesAggregate::empty(key.clone(), record));
                index.insert(key, i);
                i
            }
        };
        if let Some(agg) = aggregates.get_mut(slot) {
            agg.absorb(record.individuals(), record.observed_at(timezone));
        }
    }

    aggregates
}

/// Ranking order: most observations, then most individuals, then most
/// recent. Species with no valid time sort after those with one.
pub fn by_rank(a: &SpeciesAggregate, b: &SpeciesAggregate) -> Ordering {
    b.observation_count
        .cmp(&a.observation_count)
        .then_with(|| b.individual_count.total_cmp(&a.individual_count))
        .then_with(|| b.latest.cmp(&a.latest))
}

/// Sort aggregates best first. Full ties keep their input order.
pub fn rank(aggregates: &mut [SpeciesAggregate]) {
    aggregates.sort_by(by_rank);
}

/// Earliest valid observation among `selected`.
pub fn window_start(selected: &[SpeciesAggregate]) -> Option<DateTime<Utc>> {
    selected.iter().filter_map(|a| a.earliest).min()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const NY: Tz = chrono_tz::America::New_York;

    fn records(values: &[serde_json::Value]) -> Vec<ObservationRecord> {
        values.iter().map(ObservationRecord::from_value).collect()
    }

    #[test]
    fn folds_counts_and_time_bounds() {
        let recs = records(&[
            json!({"speciesCode": "A", "howMany": 2, "obsDt": "2024-05-01 08:00"}),
            json!({"speciesCode": "A", "howMany": 3, "obsDt": "2024-05-01 10:00"}),
            json!({"speciesCode": "B", "howMany": 1, "obsDt": "2024-05-01 09:00"}),
        ]);
        let aggs = fold(&recs, NY);
        assert_eq!(aggs.len(), 2);

        let a = aggs.first().cloned();
        assert_eq!(a.as_ref().map(|a| a.observation_count), Some(2));
        assert_eq!(
            a.as_ref().map(|a| a.individual_count.to_bits()),
            Some(5.0_f64.to_bits())
        );
        assert_eq!(
            a.as_ref().and_then(|a| a.earliest),
            recs.first().and_then(|r| r.observed_at(NY))
        );
        assert_eq!(
            a.as_ref().and_then(|a| a.latest),
            recs.get(1).and_then(|r| r.observed_at(NY))
        );
    }

    #[test]
    fn invalid_timestamps_leave_bounds_untouched() {
        let recs = records(&[
            json!({"speciesCode": "A", "obsDt": "2024-05-01 08:00"}),
            json!({"speciesCode": "A", "obsDt": "not a date"}),
            json!({"speciesCode": "A"}),
            json!({"speciesCode": "B", "obsDt": "garbage"}),
        ]);
        let aggs = fold(&recs, NY);
        let expected = recs.first().and_then(|r| r.observed_at(NY));

        let a = aggs.first();
        assert_eq!(a.map(|a| a.observation_count), Some(3));
        assert_eq!(a.and_then(|a| a.earliest), expected);
        assert_eq!(a.and_then(|a| a.latest), expected);

        let b = aggs.get(1);
        assert_eq!(b.map(|b| b.observation_count), Some(1));
        assert_eq!(b.and_then(|b| b.earliest), None);
        assert_eq!(b.and_then(|b| b.latest), None);
    }

    #[test]
    fn codeless_records_collapse_only_on_identical_names() {
        let recs = records(&[
            json!({"comName": "Mute Swan", "sciName": "Cygnus olor"}),
            json!({"comName": "Mute Swan", "sciName": "Cygnus olor"}),
            json!({"comName": "Mute Swan", "sciName": "Cygnus atratus"}),
            json!({"comName": "Black Swan", "sciName": "Cygnus olor"}),
        ]);
        let aggs = fold(&recs, NY);
        let counts: Vec<u64> = aggs.iter().map(|a| a.observation_count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
    }

    #[test]
    fn malformed_counts_are_summed_as_given() {
        let recs = records(&[
            json!({"speciesCode": "A", "howMany": -4}),
            json!({"speciesCode": "A", "howMany": 2.5}),
        ]);
        let aggs = fold(&recs, NY);
        let a = aggs.first();
        assert_eq!(a.map(|a| a.observation_count), Some(2));
        assert_eq!(
            a.map(|a| a.individual_count.to_bits()),
            Some((-1.5_f64).to_bits())
        );
    }

    #[test]
    fn negative_individuals_rank_below_default_counts() {
        let recs = records(&[
            json!({"speciesCode": "neg", "howMany": -3}),
            json!({"speciesCode": "one"}),
            json!({"speciesCode": "half", "howMany": 1.5}),
        ]);
        let mut aggs = fold(&recs, NY);
        rank(&mut aggs);
        let codes: Vec<&str> = aggs.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["half", "one", "neg"]);
    }

    #[test]
    fn rank_uses_three_keys_descending() {
        let recs = records(&[
            json!({"speciesCode": "few", "howMany": 50, "obsDt": "2024-05-01 08:00"}),
            json!({"speciesCode": "old", "obsDt": "2024-05-01 08:00"}),
            json!({"speciesCode": "old", "obsDt": "2024-05-01 08:00"}),
            json!({"speciesCode": "new", "obsDt": "2024-05-02 08:00"}),
            json!({"speciesCode": "new", "obsDt": "2024-05-02 08:00"}),
            json!({"speciesCode": "big", "howMany": 4}),
            json!({"speciesCode": "big", "howMany": 4}),
        ]);
        let mut aggs = fold(&recs, NY);
        rank(&mut aggs);
        let codes: Vec<&str> = aggs.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["big", "new", "old", "few"]);
    }

    #[test]
    fn full_ties_keep_encounter_order() {
        let recs = records(&[
            json!({"speciesCode": "x"}),
            json!({"speciesCode": "y"}),
            json!({"speciesCode": "z"}),
        ]);
        let mut aggs = fold(&recs, NY);
        rank(&mut aggs);
        let codes: Vec<&str> = aggs.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["x", "y", "z"]);
    }

    #[test]
    fn undated_species_rank_after_dated_ties() {
        let recs = records(&[
            json!({"speciesCode": "undated"}),
            json!({"speciesCode": "dated", "obsDt": "2024-05-01 08:00"}),
        ]);
        let mut aggs = fold(&recs, NY);
        rank(&mut aggs);
        assert_eq!(aggs.first().map(|a| a.code.as_str()), Some("dated"));
    }

    #[test]
    fn window_start_ignores_undated_aggregates() {
        let recs = records(&[
            json!({"speciesCode": "A", "obsDt": "2024-05-02 08:00"}),
            json!({"speciesCode": "B"}),
            json!({"speciesCode": "C", "obsDt": "2024-05-01 08:00"}),
        ]);
        let aggs = fold(&recs, NY);
        assert_eq!(
            window_start(&aggs),
            recs.get(2).and_then(|r| r.observed_at(NY))
        );
        assert_eq!(window_start(aggs.get(1..2).unwrap_or_default()), None);
        assert_eq!(window_start(&[]), None);
    }
}

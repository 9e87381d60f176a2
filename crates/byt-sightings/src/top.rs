//! End-to-end ranking: fold, rank, truncate, and enrich.

use byt_types::SightingsResponse;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::aggregate::{fold, rank, window_start};
use crate::enrich::{enrich, ImageLookup};
use crate::record::ObservationRecord;
use crate::summary::ObservationSite;

/// Ranked, enriched species and the window they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSightings {
    /// Earliest valid observation among the ranked species.
    pub window_start: Option<DateTime<Utc>>,
    /// Ranked species, best first.
    pub ranked: Vec<byt_types::Sighting>,
}

impl TopSightings {
    /// Attach the site metadata to produce the response body.
    pub fn into_response(self, site: &ObservationSite, now: DateTime<Utc>) -> SightingsResponse {
        SightingsResponse {
            metadata: site.metadata(self.window_start, now),
            sightings: self.ranked,
        }
    }
}

/// Fold, rank, and enrich the top `limit` species.
///
/// The window start covers only the selected species, not the whole
/// input. Image lookups run with concurrency `limit`; their failures
/// only blank the affected entry's image.
pub async fn aggregate_top<L: ImageLookup>(
    records: &[ObservationRecord],
    limit: usize,
    timezone: Tz,
    lookup: &L,
) -> TopSightings {
    let mut aggregates = fold(records, timezone);
    rank(&mut aggregates);
    let species = aggregates.len();
    aggregates.truncate(limit);

    let window_start = window_start(&aggregates);
    debug!(
        records = records.len(),
        species,
        selected = aggregates.len(),
        "Aggregated sightings"
    );

    let ranked = enrich(aggregates, limit, lookup).await;
    TopSightings {
        window_start,
        ranked,
    }
}

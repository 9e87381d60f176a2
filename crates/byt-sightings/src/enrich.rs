//! Best-effort thumbnail enrichment.
//!
//! Lookups for every selected species run concurrently, bounded by the
//! number of selected species, and their results are reassembled in rank
//! order. A lookup can only ever produce `None`; it cannot fail the
//! aggregation.

use std::future::Future;

use byt_types::Sighting;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::aggregate::SpeciesAggregate;

/// Resolves a page title to a thumbnail URL.
///
/// Implementations must swallow their own failures and return `None`.
pub trait ImageLookup: Send + Sync {
    /// Thumbnail URL for `title`, or `None` on any failure.
    fn thumbnail(&self, title: &str) -> impl Future<Output = Option<String>> + Send;
}

/// Look up by common name first, then by scientific name.
pub async fn resolve_image<L: ImageLookup>(
    lookup: &L,
    common_name: Option<&str>,
    scientific_name: Option<&str>,
) -> Option<String> {
    for title in [common_name, scientific_name].into_iter().flatten() {
        if title.is_empty() {
            continue;
        }
        if let Some(url) = lookup.thumbnail(title).await {
            return Some(url);
        }
    }
    None
}

/// Resolve thumbnails for `selected` with at most `concurrency` lookups
/// in flight. Output order matches input order.
pub async fn enrich<L: ImageLookup>(
    selected: Vec<SpeciesAggregate>,
    concurrency: usize,
    lookup: &L,
) -> Vec<Sighting> {
    stream::iter(selected)
        .map(|agg| async move {
            let image_url = resolve_image(
                lookup,
                Some(agg.common_name.as_str()),
                agg.scientific_name.as_deref(),
            )
            .await;
            if image_url.is_none() {
                debug!(code = %agg.code, "No thumbnail resolved");
            }
            agg.into_sighting(image_url)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

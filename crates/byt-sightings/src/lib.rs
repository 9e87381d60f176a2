//! Observation aggregation for the bird sightings feed.
//!
//! Collapses a raw list of sightings into ranked per-species summaries
//! and decorates the top entries with a thumbnail:
//!
//! 1. [`record`] -- lenient decoding of raw observation records
//! 2. [`aggregate`] -- fold by species, rank, pick the window start
//! 3. [`enrich`] -- bounded, order-preserving image lookups that degrade
//!    to `null` instead of failing
//! 4. [`summary`] -- the fixed observation site and response metadata
//!
//! [`aggregate_top`] runs the whole pipeline.

pub mod aggregate;
pub mod enrich;
pub mod record;
pub mod summary;
mod top;

pub use aggregate::SpeciesAggregate;
pub use enrich::ImageLookup;
pub use record::ObservationRecord;
pub use summary::ObservationSite;
pub use top::{aggregate_top, TopSightings};

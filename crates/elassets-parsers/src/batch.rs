//! Parallel decoding of many in-memory assets
//!
//! Each item is decoded independently on the rayon pool. Results come back
//! in input order and one failing item never affects the others.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::logging::instrument_decode;
use crate::registry::{DecodedAsset, DecoderRegistry, RegistryError};
use crate::traits::DecodeOptions;

/// Outcome of decoding one batch item
#[derive(Debug)]
pub struct BatchItem {
    pub name: String,
    pub result: Result<DecodedAsset, RegistryError>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Success and failure counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(items: &[BatchItem]) -> Self {
        let succeeded = items.iter().filter(|i| i.is_ok()).count();
        Self {
            succeeded,
            failed: items.len() - succeeded,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Decode `(name, bytes)` pairs in parallel
pub fn decode_batch<N, B>(
    registry: &DecoderRegistry,
    items: &[(N, B)],
    options: &DecodeOptions,
) -> Vec<BatchItem>
where
    N: AsRef<str> + Sync,
    B: AsRef<[u8]> + Sync,
{
    let results: Vec<BatchItem> = items
        .par_iter()
        .map(|(name, data)| {
            let name = name.as_ref();
            let result = instrument_decode("batch", name, || {
                registry.decode(name, data.as_ref(), options)
            });
            if let Err(e) = &result {
                warn!(file = %name, error = %e, "Batch item failed");
            }
            BatchItem {
                name: name.to_string(),
                result,
            }
        })
        .collect();

    let summary = BatchSummary::of(&results);
    debug!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Decoded batch"
    );
    results
}

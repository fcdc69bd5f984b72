//! Bucket set resolution.

use serde::{Deserialize, Serialize};
use sl_error::{Result, SlError};
use tracing::{debug, info};

use crate::backend::ListingBackend;
use crate::parse::bucket_name_from_line;

/// Which buckets a run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketSelection {
    /// The named buckets, in the given order
    Explicit(Vec<String>),

    /// Every bucket visible to the credentials
    All,
}

/// Resolve a selection to an ordered list of bucket names.
///
/// Explicit names keep their order; blank names are dropped, and a list with
/// nothing left is a configuration error. `All` asks the backend for its
/// bucket enumeration and takes the last token of each line.
pub async fn resolve_buckets<B: ListingBackend + ?Sized>(
    selection: &BucketSelection,
    backend: &B,
) -> Result<Vec<String>> {
    let buckets: Vec<String> = match selection {
        BucketSelection::Explicit(names) => {
            let names: Vec<String> = names
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                return Err(SlError::Config("no bucket names given".to_string()));
            }
            names
        }
        BucketSelection::All => {
            debug!(backend = backend.name(), "Enumerating buckets");
            backend
                .list_buckets()
                .await?
                .iter()
                .filter_map(|line| bucket_name_from_line(line))
                .map(str::to_string)
                .collect()
        }
    };

    info!(count = buckets.len(), "Resolved buckets");
    Ok(buckets)
}

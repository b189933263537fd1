//! Fallback-aware fetching.
//!
//! The primary source is always asked first. Only when its result fails
//! the sufficiency check is the secondary source asked, and the primary
//! items are placed ahead of the secondary ones. Nothing is deduplicated.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::CanonicalEnvelope;

/// Sufficiency rule: at least `n` items.
pub fn at_least(n: usize) -> impl Fn(&CanonicalEnvelope) -> bool {
    move |envelope| envelope.len() >= n
}

/// Fetch from `primary`, topping up from `secondary` when the primary
/// result is not sufficient.
///
/// A failed primary counts as an empty result. A failed secondary leaves
/// the primary result as the answer. Neither failure is returned; both are
/// logged with `operation` and `input`.
pub async fn fetch_with_fallback<P, S, SFut, F>(
    operation: &str,
    input: &str,
    primary: P,
    secondary: S,
    is_sufficient: F,
) -> CanonicalEnvelope
where
    P: Future<Output = Result<CanonicalEnvelope>>,
    S: FnOnce() -> SFut,
    SFut: Future<Output = Result<CanonicalEnvelope>>,
    F: FnOnce(&CanonicalEnvelope) -> bool,
{
    let primary = match primary.await {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(operation, input, error = %e, "primary source failed");
            CanonicalEnvelope::empty()
        }
    };

    if is_sufficient(&primary) {
        return primary;
    }

    debug!(
        operation,
        input,
        primary_items = primary.len(),
        "primary result insufficient, asking secondary source"
    );

    match secondary().await {
        Ok(fallback) => {
            let mut items = primary.items;
            items.extend(fallback.items);
            CanonicalEnvelope::new(items)
        }
        Err(e) => {
            warn!(operation, input, error = %e, "secondary source failed");
            primary
        }
    }
}

//! Concurrent query dispatch.
//!
//! [`dispatch`] runs a fixed set of item queries side by side and merges
//! their capped results as each one finishes. [`fan_out`] runs one job per
//! input and keeps the successes in input order. Both wait for every task;
//! a failing task is logged and contributes nothing.
//!
//! Admission control lives in [`PooledProvider`](crate::api::PooledProvider):
//! the tasks here are cheap until they call the provider.

use std::future::Future;

use futures_util::future::{join_all, BoxFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{CanonicalEnvelope, CanonicalItem};

/// A named query producing canonical items.
pub struct Query<'a> {
    name: String,
    future: BoxFuture<'a, Result<Vec<CanonicalItem>>>,
}

impl<'a> Query<'a> {
    /// `name` identifies the query (operation and input) in logs.
    pub fn new<S, F>(name: S, future: F) -> Self
    where
        S: Into<String>,
        F: Future<Output = Result<Vec<CanonicalItem>>> + Send + 'a,
    {
        Self {
            name: name.into(),
            future: Box::pin(future),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Run every query concurrently and merge their outputs.
///
/// Each query's list is cut to `per_query_cap` before merging. Lists are
/// appended in completion order; items within one list keep their order.
pub async fn dispatch(queries: Vec<Query<'_>>, per_query_cap: usize) -> CanonicalEnvelope {
    let mut pending: FuturesUnordered<_> = queries
        .into_iter()
        .map(|query| async move { (query.name, query.future.await) })
        .collect();

    let mut items = Vec::new();
    while let Some((name, result)) = pending.next().await {
        match result {
            Ok(mut found) => {
                let total = found.len();
                found.truncate(per_query_cap);
                debug!(query = name.as_str(), total, kept = found.len(), "query finished");
                items.extend(found);
            }
            Err(e) => {
                warn!(query = name.as_str(), error = %e, "query failed, contributing nothing");
            }
        }
    }

    CanonicalEnvelope::new(items)
}

/// Run `job` once per input, concurrently, keeping successful outputs in
/// input order. Failures are logged with `operation` and the input's
/// `label`.
pub async fn fan_out<I, S, T, L, F, Fut>(
    operation: &str,
    inputs: I,
    label: L,
    job: F,
) -> Vec<T>
where
    I: IntoIterator<Item = S>,
    L: Fn(&S) -> String,
    F: Fn(S) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let tasks = inputs.into_iter().map(|input| {
        let label = label(&input);
        let task = job(input);
        async move { (label, task.await) }
    });

    join_all(tasks)
        .await
        .into_iter()
        .filter_map(|(input, result)| match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(operation, input = input.as_str(), error = %e, "task failed");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::CatalogError;

    fn videos(prefix: &str, n: usize) -> Vec<CanonicalItem> {
        (0..n)
            .map(|i| {
                CanonicalItem::video(format!("{}{}", prefix, i), "t", "c", None, "PT0:00:01".into())
            })
            .collect()
    }

    fn ids(envelope: &CanonicalEnvelope) -> Vec<String> {
        envelope.items.iter().map(|i| i.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_failing_query_does_not_abort_siblings() {
        let queries = vec![
            Query::new("songs", async { Ok(videos("s", 3)) }),
            Query::new("broken", async {
                Err::<Vec<CanonicalItem>, _>(CatalogError::Provider("boom".into()))
            }),
            Query::new("albums", async { Ok(videos("a", 2)) }),
        ];

        let envelope = dispatch(queries, 10).await;
        let mut got = ids(&envelope);
        got.sort();
        assert_eq!(got, vec!["a0", "a1", "s0", "s1", "s2"]);
        assert_eq!(envelope.next_page_token, None);
    }

    #[tokio::test]
    async fn test_cap_applies_per_query() {
        let queries = vec![
            Query::new("songs", async { Ok(videos("s", 5)) }),
            Query::new("albums", async { Ok(videos("a", 5)) }),
        ];
        let envelope = dispatch(queries, 2).await;
        assert_eq!(envelope.len(), 4);
    }

    #[tokio::test]
    async fn test_merge_follows_completion_order() {
        let queries = vec![
            Query::new("slow", async {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok(videos("slow", 3))
            }),
            Query::new("fast", async { Ok(videos("fast", 2)) }),
        ];

        let envelope = dispatch(queries, 10).await;
        assert_eq!(
            ids(&envelope),
            vec!["fast0", "fast1", "slow0", "slow1", "slow2"]
        );
    }

    #[tokio::test]
    async fn test_fan_out_keeps_input_order_and_drops_failures() {
        let inputs = vec!["a", "bad", "c"];
        let results = fan_out("test", inputs, |id| id.to_string(), |id| async move {
            if id == "bad" {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Err(CatalogError::NotFound(id.to_string()))
            } else {
                Ok(id.to_uppercase())
            }
        })
        .await;
        assert_eq!(results, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_empty_inputs() {
        assert!(dispatch(vec![], 5).await.is_empty());
        let none: Vec<String> = fan_out(
            "test",
            Vec::<String>::new(),
            String::clone,
            |id| async move { Ok::<_, CatalogError>(id) },
        )
        .await;
        assert!(none.is_empty());
    }

    #[derive(Debug)]
    struct Hit {
        browse_id: String,
        rank: u32,
    }

    #[tokio::test]
    async fn test_fan_out_over_records() {
        let hits = vec![
            Hit { browse_id: "MPREb_a".into(), rank: 1 },
            Hit { browse_id: "MPREb_b".into(), rank: 2 },
        ];
        let ranks = fan_out(
            "search_albums",
            hits,
            |hit| hit.browse_id.clone(),
            |hit| async move {
                if hit.rank == 2 {
                    Err(CatalogError::NotFound(hit.browse_id))
                } else {
                    Ok(hit.rank)
                }
            },
        )
        .await;
        assert_eq!(ranks, vec![1]);
    }
}

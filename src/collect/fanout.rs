use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::source::{Metric, MetricsSource, SourceError};
use crate::billing::{RecordError, UsageRecord};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("malformed usage record: {0}")]
    InvalidRecord(#[from] RecordError),
    #[error("fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("collection cancelled")]
    Cancelled,
}

/// Fetch usage records for every region.
///
/// One task per region runs on a `JoinSet`, at most `concurrency` at a time.
/// All tasks are joined before anything is returned, and records come back
/// ordered by region then by function listing order. The first failure, or
/// `shutdown` resolving, drops the set and aborts every task still running.
pub async fn collect_usage<F>(
    source: Arc<dyn MetricsSource>,
    regions: &[String],
    concurrency: usize,
    progress: &ProgressBar,
    shutdown: F,
) -> Result<Vec<UsageRecord>, CollectError>
where
    F: Future<Output = ()>,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, region) in regions.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| CollectError::Cancelled)?;
            let records = collect_region(source.as_ref(), &region, concurrency).await?;
            Ok::<_, CollectError>((index, region, records))
        });
    }

    let join_all = async {
        let mut batches = Vec::with_capacity(regions.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, region, records) = joined??;
            debug!("Collected {} functions in {}", records.len(), region);
            progress.inc(1);
            batches.push((index, records));
        }
        Ok::<_, CollectError>(batches)
    };

    let mut batches = tokio::select! {
        batches = join_all => batches?,
        _ = shutdown => {
            info!("Interrupted, abandoning in-flight fetches");
            return Err(CollectError::Cancelled);
        }
    };

    batches.sort_by_key(|(index, _)| *index);
    Ok(batches.into_iter().flat_map(|(_, records)| records).collect())
}

/// List one region's functions and fetch both daily metrics for each.
///
/// Up to `concurrency` functions are fetched at once; records keep the
/// listing order.
pub async fn collect_region(
    source: &dyn MetricsSource,
    region: &str,
    concurrency: usize,
) -> Result<Vec<UsageRecord>, CollectError> {
    let functions = source.list_functions(region).await?;

    stream::iter(functions)
        .map(move |function| async move {
            let (invocations, avg_duration_ms) = tokio::try_join!(
                source.fetch_metric(region, &function.name, Metric::InvocationSum),
                source.fetch_metric(region, &function.name, Metric::AverageDuration),
            )?;

            Ok::<_, CollectError>(UsageRecord::new(
                function.name,
                region,
                function.memory_size_mb,
                avg_duration_ms,
                invocations,
            )?)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

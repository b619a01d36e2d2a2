use contracts::shared::list::ListEnvelope;
use std::future::Future;

use super::accumulator::{PrintAccumulator, PrintError};
use crate::shared::config::PrintConfig;
use crate::shared::error::ApiError;
use crate::shared::fetch::CancelToken;

/// Rows collected for printing
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOutcome<T> {
    pub items: Vec<T>,
    /// false when a page kept failing and the rest was skipped
    pub complete: bool,
    pub error: Option<ApiError>,
}

/// Fetch every page of a list, strictly in order, into one `Vec`.
///
/// Page 1 is fetched first; its `count` fixes how many pages follow. Page
/// N+1 is requested only after page N was appended. A failing page is
/// retried `config.max_retries` times, waiting `sleep(n * retry_delay_ms)`
/// before retry n. After that, collection stops and the rows gathered so far
/// are printed with `complete = false`. `on_ready` runs exactly once when
/// collection ends, and never when `cancel` fires first.
pub async fn accumulate_pages<T, F, Fut, S, SleepFut, R>(
    config: &PrintConfig,
    cancel: &CancelToken,
    mut fetch_page: F,
    mut sleep: S,
    on_ready: R,
) -> Result<PrintOutcome<T>, PrintError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<ListEnvelope<T>, ApiError>>,
    S: FnMut(u32) -> SleepFut,
    SleepFut: Future<Output = ()>,
    R: FnOnce(&PrintOutcome<T>),
{
    let (items, failure) = match fetch_with_retry(1, config, cancel, &mut fetch_page, &mut sleep)
        .await?
    {
        Err(error) => (Vec::new(), Some(error)),
        Ok(first) => {
            let mut accumulator = PrintAccumulator::new(first.count, config.page_size);
            log::debug!(
                "Collecting {} rows in {} pages for printing",
                first.count,
                accumulator.total_pages()
            );
            accumulator.append(1, first.results)?;

            let mut failure = None;
            while let Some(page) = accumulator.next_page() {
                match fetch_with_retry(page, config, cancel, &mut fetch_page, &mut sleep).await? {
                    Ok(envelope) => {
                        accumulator.append(page, envelope.results)?;
                    }
                    Err(error) => {
                        failure = Some(error);
                        accumulator.abort();
                    }
                }
            }
            (accumulator.into_items(), failure)
        }
    };

    let outcome = PrintOutcome {
        complete: failure.is_none(),
        error: failure,
        items,
    };
    on_ready(&outcome);
    Ok(outcome)
}

/// One page with retries; the inner error is the last failure once retries
/// are used up
async fn fetch_with_retry<T, F, Fut, S, SleepFut>(
    page: u32,
    config: &PrintConfig,
    cancel: &CancelToken,
    fetch_page: &mut F,
    sleep: &mut S,
) -> Result<Result<ListEnvelope<T>, ApiError>, PrintError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<ListEnvelope<T>, ApiError>>,
    S: FnMut(u32) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let mut attempt = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(PrintError::Cancelled);
        }
        let result = fetch_page(page, config.page_size).await;
        if cancel.is_cancelled() {
            return Err(PrintError::Cancelled);
        }

        match result {
            Ok(envelope) => return Ok(Ok(envelope)),
            Err(error) if attempt < config.max_retries => {
                attempt += 1;
                log::warn!("Print page {} failed ({}), retry {}", page, error, attempt);
                if config.retry_delay_ms > 0 {
                    sleep(config.retry_delay_ms.saturating_mul(attempt)).await;
                }
            }
            Err(error) => {
                log::error!("Print page {} failed, printing partial data: {}", page, error);
                return Ok(Err(error));
            }
        }
    }
}

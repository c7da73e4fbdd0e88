use std::fmt::Display;
use std::future::Future;
use tracing::{debug, info, warn};

/// Result of trying one candidate in a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The candidate produced a value; the cascade stops here.
    Success(T),
    /// The candidate reported rate limiting; move to the next one immediately.
    RateLimited,
    /// Any other failure (including timeouts); move to the next one.
    Failed(String),
    /// Stop the whole cascade without a result (e.g. shutdown requested).
    Abort(String),
}

/// Try `candidates` strictly in order and return the first success.
///
/// Every candidate is attempted at most once and no attempt starts before the
/// previous one has finished. There is no backoff between candidates.
///
/// # Arguments
/// * `operation_name` - Name of the operation for logging
/// * `candidates` - Ordered candidates (their `Display` is used in logs)
/// * `attempt` - Async closure that tries a single candidate
///
/// # Returns
/// The first successful value, or `None` if every candidate failed or the
/// cascade was aborted.
pub async fn first_success<I, C, T, F, Fut>(
    operation_name: &str,
    candidates: I,
    mut attempt: F,
) -> Option<T>
where
    I: IntoIterator<Item = C>,
    C: Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let candidates: Vec<C> = candidates.into_iter().collect();
    let total = candidates.len();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let label = candidate.to_string();
        debug!(
            "{}: trying {} ({}/{})",
            operation_name,
            label,
            index + 1,
            total
        );

        match attempt(candidate).await {
            Attempt::Success(value) => {
                if index > 0 {
                    debug!(
                        "{}: {} succeeded after {} failed candidate(s)",
                        operation_name, label, index
                    );
                }
                return Some(value);
            }
            Attempt::RateLimited => {
                warn!("{}: {} is rate limited, moving on", operation_name, label);
            }
            Attempt::Failed(reason) => {
                debug!("{}: {} failed ({})", operation_name, label, reason);
            }
            Attempt::Abort(reason) => {
                info!("{}: aborted at {} ({})", operation_name, label, reason);
                return None;
            }
        }
    }

    if total > 0 {
        warn!("{}: all {} candidates failed", operation_name, total);
    }
    None
}

// Best-effort enrichment: run a secondary lookup, keep the base record untouched on failure.

use std::fmt::Display;
use std::future::Future;

/// Awaits `lookup` and applies its value to `record`. On error the record is
/// returned unmodified and the failure is only logged at debug level.
pub async fn enrich<T, V, E, Fut>(
    mut record: T,
    operation: &'static str,
    lookup: Fut,
    apply: impl FnOnce(&mut T, V),
) -> T
where
    Fut: Future<Output = Result<V, E>>,
    E: Display,
{
    match lookup.await {
        Ok(value) => apply(&mut record, value),
        Err(e) => {
            tracing::debug!(error = %e, operation, "enrichment skipped");
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn applies_value_on_success() {
        let out = enrich(
            (1, None),
            "test",
            async { Ok::<_, String>("cwd") },
            |r, v| r.1 = Some(v),
        )
        .await;
        assert_eq!(out, (1, Some("cwd")));
    }

    #[tokio::test]
    async fn keeps_record_on_failure() {
        let out = enrich(
            (1, Some("old")),
            "test",
            async { Err::<&str, _>("gone") },
            |r, v| r.1 = Some(v),
        )
        .await;
        assert_eq!(out, (1, Some("old")));
    }
}

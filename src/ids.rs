//! Identifier generation for points and photos.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generate a time-based identifier.
///
/// The millisecond timestamp keeps ids roughly sortable by creation time.
/// A process-wide counter is appended so ids generated within the same
/// millisecond (a multi-image import, for instance) stay unique.
pub fn generate_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = Utc::now().timestamp_millis();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_in_tight_loop() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_starts_with_timestamp() {
        let before = Utc::now().timestamp_millis();
        let id = generate_id();
        let millis: i64 = id.split('-').next().unwrap().parse().unwrap();
        assert!(millis >= before);
    }
}

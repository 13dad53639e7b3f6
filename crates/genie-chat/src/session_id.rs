//! Per-call session identifiers sent alongside each chat message

use chrono::Utc;

const PREFIX: &str = "session-";

/// Generates `session-<unix millis>` ids, strictly increasing within one generator.
#[derive(Debug, Default)]
pub struct SessionIds {
    last: i64,
}

impl SessionIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id; bumps past the clock when two calls land in the same millisecond
    pub fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        format!("{}{}", PREFIX, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(id: &str) -> i64 {
        id.strip_prefix(PREFIX).unwrap().parse().unwrap()
    }

    #[test]
    fn test_ids_are_prefixed_millis() {
        let before = Utc::now().timestamp_millis();
        let id = SessionIds::new().next_id();
        assert!(id.starts_with("session-"));
        assert!(suffix(&id) >= before);
    }

    #[test]
    fn test_ids_strictly_increase_in_a_burst() {
        let mut ids = SessionIds::new();
        let burst: Vec<i64> = (0..500).map(|_| suffix(&ids.next_id())).collect();
        assert!(burst.windows(2).all(|w| w[1] > w[0]));
    }
}

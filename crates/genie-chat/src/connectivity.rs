//! Startup connectivity check

use genie_api::ChatGateway;

/// Backend reachability as shown in the status indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectivityState {
    #[default]
    Checking,
    Connected,
    Error,
}

impl ConnectivityState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityState::Checking => "Connecting...",
            ConnectivityState::Connected => "Backend Connected",
            ConnectivityState::Error => "Backend Error",
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, ConnectivityState::Checking)
    }
}

/// Check the health endpoint once. Any failure maps to `Error`; no retry.
pub async fn check(gateway: &dyn ChatGateway) -> ConnectivityState {
    match gateway.check_health().await {
        Ok(body) => {
            tracing::info!("Backend health check: {}", body);
            ConnectivityState::Connected
        }
        Err(e) => {
            tracing::warn!("Backend connection failed: {}", e);
            ConnectivityState::Error
        }
    }
}

/// Holds the connectivity state and enforces its single transition
#[derive(Debug, Default)]
pub struct Connectivity {
    state: ConnectivityState,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    /// Apply a health check result. Only the first settlement sticks; returns whether it applied.
    pub fn resolve(&mut self, state: ConnectivityState) -> bool {
        if self.state.is_settled() {
            tracing::debug!(current = ?self.state, ignored = ?state, "connectivity already settled");
            return false;
        }
        if !state.is_settled() {
            return false;
        }
        self.state = state;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use genie_api::{ChatReply, Error, Result};

    struct HealthOnly(fn() -> Result<serde_json::Value>);

    #[async_trait]
    impl ChatGateway for HealthOnly {
        async fn check_health(&self) -> Result<serde_json::Value> {
            (self.0)()
        }

        async fn send_message(&self, _text: &str, _session_id: &str) -> Result<ChatReply> {
            unreachable!("health check never chats")
        }
    }

    #[tokio::test]
    async fn test_health_ok_is_connected() {
        let gateway = HealthOnly(|| Ok(serde_json::json!({"status": "healthy"})));
        assert_eq!(check(&gateway).await, ConnectivityState::Connected);
    }

    #[tokio::test]
    async fn test_health_server_error_is_error() {
        let gateway = HealthOnly(|| Err(Error::status(500, "")));
        assert_eq!(check(&gateway).await, ConnectivityState::Error);
    }

    #[tokio::test]
    async fn test_health_malformed_body_is_error() {
        let gateway = HealthOnly(|| {
            Err(serde_json::from_str::<serde_json::Value>("not json")
                .unwrap_err()
                .into())
        });
        assert_eq!(check(&gateway).await, ConnectivityState::Error);
    }

    #[test]
    fn test_starts_checking() {
        let c = Connectivity::new();
        assert_eq!(c.state(), ConnectivityState::Checking);
        assert_eq!(c.state().label(), "Connecting...");
    }

    #[test]
    fn test_resolves_exactly_once() {
        let mut c = Connectivity::new();
        assert!(c.resolve(ConnectivityState::Connected));
        assert!(!c.resolve(ConnectivityState::Error));
        assert_eq!(c.state(), ConnectivityState::Connected);

        let mut c = Connectivity::new();
        assert!(c.resolve(ConnectivityState::Error));
        assert!(!c.resolve(ConnectivityState::Connected));
        assert_eq!(c.state(), ConnectivityState::Error);
    }

    #[test]
    fn test_resolving_to_checking_is_ignored() {
        let mut c = Connectivity::new();
        assert!(!c.resolve(ConnectivityState::Checking));
        assert!(c.resolve(ConnectivityState::Error));
    }
}

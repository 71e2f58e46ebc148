//! Optional, fire-and-forget calendar export for new tasks and habits.
//!
//! # Responsibility
//! - Hold at most one connected calendar connector.
//! - Forward a [`CalendarSyncRequest`] and swallow failures after logging.
//!
//! # Invariants
//! - Calendar failures never fail or roll back the originating mutation.

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarItemKind {
    Task,
    Event,
}

/// Payload handed to the connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSyncRequest {
    pub title: String,
    pub scheduled_time: Option<String>,
    pub end_time: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: CalendarItemKind,
    pub notes: Option<String>,
}

/// Failure reported by a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarError {
    pub connector_id: String,
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl CalendarError {
    pub fn new(
        connector_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            connector_id: connector_id.into(),
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.connector_id, self.code, self.message)
    }
}

impl Error for CalendarError {}

/// Calendar backend adapter.
pub trait CalendarConnector {
    fn connector_id(&self) -> &str;
    fn submit(&self, request: &CalendarSyncRequest) -> Result<(), CalendarError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarBridgeError {
    InvalidConnectorId(String),
}

impl Display for CalendarBridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConnectorId(value) => write!(f, "connector id is invalid: {value}"),
        }
    }
}

impl Error for CalendarBridgeError {}

#[derive(Default)]
pub struct CalendarBridge {
    connector: Option<Arc<dyn CalendarConnector>>,
}

impl CalendarBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects `connector`, replacing any previous one.
    pub fn connect(
        &mut self,
        connector: Arc<dyn CalendarConnector>,
    ) -> Result<(), CalendarBridgeError> {
        let connector_id = connector.connector_id().trim().to_string();
        if !is_valid_connector_id(&connector_id) {
            return Err(CalendarBridgeError::InvalidConnectorId(connector_id));
        }
        info!("event=calendar_connect module=sync status=ok connector={connector_id}");
        self.connector = Some(connector);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.connector = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connector.is_some()
    }

    pub fn connector_id(&self) -> Option<&str> {
        self.connector.as_deref().map(|connector| connector.connector_id())
    }

    /// Forwards `request` when a connector is present. Returns whether the
    /// connector accepted it.
    pub fn submit(&self, request: &CalendarSyncRequest) -> bool {
        let Some(connector) = self.connector.as_deref() else {
            info!("event=calendar_submit module=sync status=skip reason=not_connected");
            return false;
        };

        match connector.submit(request) {
            Ok(()) => {
                info!(
                    "event=calendar_submit module=sync status=ok connector={} kind={:?}",
                    connector.connector_id(),
                    request.kind
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=calendar_submit module=sync status=error retryable={} error={err}",
                    err.retryable
                );
                false
            }
        }
    }
}

fn is_valid_connector_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{
        CalendarBridge, CalendarBridgeError, CalendarConnector, CalendarError, CalendarItemKind,
        CalendarSyncRequest,
    };
    use std::sync::{Arc, Mutex};

    struct RecordingConnector {
        id: String,
        fail: bool,
        seen: Mutex<Vec<String>>,
    }

    impl RecordingConnector {
        fn new(id: &str, fail: bool) -> Self {
            Self {
                id: id.to_string(),
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CalendarConnector for RecordingConnector {
        fn connector_id(&self) -> &str {
            &self.id
        }

        fn submit(&self, request: &CalendarSyncRequest) -> Result<(), CalendarError> {
            self.seen.lock().unwrap().push(request.title.clone());
            if self.fail {
                return Err(CalendarError::new(&self.id, "quota", "rate limited", true));
            }
            Ok(())
        }
    }

    fn request(title: &str) -> CalendarSyncRequest {
        CalendarSyncRequest {
            title: title.to_string(),
            scheduled_time: Some("09:00".to_string()),
            end_time: None,
            date: None,
            kind: CalendarItemKind::Task,
            notes: None,
        }
    }

    #[test]
    fn submit_without_connector_is_a_no_op() {
        let bridge = CalendarBridge::new();
        assert!(!bridge.is_connected());
        assert!(!bridge.submit(&request("Stand-up")));
    }

    #[test]
    fn forwards_to_connected_connector() {
        let connector = Arc::new(RecordingConnector::new("google_calendar", false));
        let mut bridge = CalendarBridge::new();
        bridge.connect(connector.clone()).unwrap();

        assert!(bridge.submit(&request("Stand-up")));
        assert_eq!(bridge.connector_id(), Some("google_calendar"));
        assert_eq!(*connector.seen.lock().unwrap(), vec!["Stand-up".to_string()]);

        bridge.disconnect();
        assert!(!bridge.submit(&request("Retro")));
        assert_eq!(connector.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn connector_failure_is_swallowed() {
        let mut bridge = CalendarBridge::new();
        bridge
            .connect(Arc::new(RecordingConnector::new("outlook", true)))
            .unwrap();
        assert!(!bridge.submit(&request("Dentist")));
    }

    #[test]
    fn rejects_invalid_connector_id() {
        let mut bridge = CalendarBridge::new();
        let err = bridge
            .connect(Arc::new(RecordingConnector::new("Google Calendar", false)))
            .unwrap_err();
        assert!(matches!(err, CalendarBridgeError::InvalidConnectorId(_)));
        assert!(!bridge.is_connected());
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let json = serde_json::to_value(request("Gym")).unwrap();
        assert_eq!(json["scheduledTime"], "09:00");
        assert_eq!(json["kind"], "task");
    }
}

//! Observable events
//!
//! Every event the service logs is named here so event strings stay
//! consistent across modules.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    SchemaReady,
    ServerStart,
    ServerStop,

    // Grid engine
    GridQueryComplete,
    GridFilterSkipped,

    // Store
    StoreQueryFailed,

    // Authentication
    AdminCreated,
    LoginSucceeded,
    LoginFailed,
    Logout,

    // Owners
    PersonReassigned,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaReady => "SCHEMA_READY",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::GridQueryComplete => "GRID_QUERY_COMPLETE",
            Event::GridFilterSkipped => "GRID_FILTER_SKIPPED",
            Event::StoreQueryFailed => "STORE_QUERY_FAILED",
            Event::AdminCreated => "ADMIN_CREATED",
            Event::LoginSucceeded => "LOGIN_SUCCEEDED",
            Event::LoginFailed => "LOGIN_FAILED",
            Event::Logout => "LOGOUT",
            Event::PersonReassigned => "PERSON_REASSIGNED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::GridFilterSkipped => Severity::Trace,
            Event::LoginFailed => Severity::Warn,
            Event::StoreQueryFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::GridQueryComplete.as_str(), "GRID_QUERY_COMPLETE");
        assert_eq!(Event::StoreQueryFailed.to_string(), "STORE_QUERY_FAILED");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::GridFilterSkipped.severity(), Severity::Trace);
        assert_eq!(Event::StoreQueryFailed.severity(), Severity::Error);
        assert_eq!(Event::ServerStart.severity(), Severity::Info);
    }
}

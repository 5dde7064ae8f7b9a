use std::fmt;

/// Credentials and target event for one board session.
///
/// Created once authentication succeeds and dropped when the operator
/// switches event or logs out. Nothing else holds the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    event_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            event_id: event_id.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

// Keep the token out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("event_id", &self.event_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token", "1234");
        let printed = format!("{:?}", session);

        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("1234"));
    }

    #[test]
    fn test_accessors() {
        let session = Session::new("tok", "2");
        assert_eq!(session.token(), "tok");
        assert_eq!(session.event_id(), "2");
    }
}

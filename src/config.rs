//! Listener configuration, captured once at startup and never mutated.

/// Lowest port the listener may bind; ports below this need privileges.
pub const PORT_MIN: u16 = 1024;
/// Default port the visual-programming tool is expected to post to.
pub const DEFAULT_PORT: u16 = 5555;
/// Message shown before anything has been received.
pub const DEFAULT_MESSAGE: &str = "Waiting for input...";

/// Immutable configuration for the message listener.
///
/// Constructed once before the listener starts. `new` is the only way to
/// build one, so a config in hand always has a valid port.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub port: u16,
    pub initial_message: String,
}

impl ListenerConfig {
    /// Validate and build a config. Ports below 1024 are rejected (the
    /// upper bound is enforced by `u16` itself).
    pub fn new(port: u16, initial_message: impl Into<String>) -> Result<Self, String> {
        if port < PORT_MIN {
            return Err(format!(
                "port {} out of range ({}-{})",
                port,
                PORT_MIN,
                u16::MAX
            ));
        }
        Ok(Self {
            port,
            initial_message: initial_message.into(),
        })
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            initial_message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_port() {
        let cfg = ListenerConfig::new(5555, "hello").unwrap();
        assert_eq!(cfg.port, 5555);
        assert_eq!(cfg.initial_message, "hello");
    }

    #[test]
    fn test_rejects_privileged_port() {
        assert!(ListenerConfig::new(80, "hello").is_err());
        assert!(ListenerConfig::new(1023, "hello").is_err());
        assert!(ListenerConfig::new(1024, "hello").is_ok());
    }

    #[test]
    fn test_default_config() {
        let cfg = ListenerConfig::default();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.initial_message, DEFAULT_MESSAGE);
    }
}

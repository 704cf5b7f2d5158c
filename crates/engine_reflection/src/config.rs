//! Registry configuration.

/// Environment variable that enables strict return checking when set to
/// `1`, `true`, `yes` or `on`.
pub const STRICT_RETURNS_ENV: &str = "ENGINE_REFLECTION_STRICT_RETURNS";

/// Behaviour switches for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// When set, [`Registry::invoke`](crate::Registry::invoke) fails with
    /// [`ReturnSizeMismatch`](crate::ReflectionError::ReturnSizeMismatch)
    /// instead of dropping a return value that does not fit the buffer.
    pub strict_returns: bool,
}

impl RegistryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from the process environment, falling back to
    /// defaults for unset variables.
    #[must_use]
    pub fn from_env() -> Self {
        let strict_returns = std::env::var(STRICT_RETURNS_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self { strict_returns }
    }

    #[must_use]
    pub fn with_strict_returns(mut self, strict: bool) -> Self {
        self.strict_returns = strict;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        assert!(!RegistryConfig::default().strict_returns);
        assert!(RegistryConfig::new().with_strict_returns(true).strict_returns);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}

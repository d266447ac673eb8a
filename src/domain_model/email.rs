use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex should compile")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("email is not valid")]
pub struct EmailError;

/// A lower-cased email address that matched the structural pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Lower-cases `raw`, then validates the result.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let normalized = raw.to_lowercase();
        if EMAIL_REGEX.is_match(&normalized) {
            Ok(Email(normalized))
        } else {
            Err(EmailError)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_lower_case() {
        let email = Email::parse("Jonah@Proton.me").expect("valid email");
        assert_eq!(email.as_str(), "jonah@proton.me");
    }

    #[test]
    fn accepts_common_shapes() {
        for raw in [
            "a@b",
            "first.last@example.com",
            "user+tag@sub.domain.org",
            "o'brien@mail-host.io",
            "x_y!z@a1.b2.c3",
        ] {
            assert!(Email::parse(raw).is_ok(), "{raw} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in [
            "invalid_email",
            "a@",
            "@b.com",
            "",
            "a@@b.com",
            "a b@c.com",
            "a@-b.com",
            "a@b-.com",
            "a@b..com",
            "a@b.com.",
        ] {
            assert_eq!(Email::parse(raw), Err(EmailError), "{raw} should be rejected");
        }
    }

    #[test]
    fn rejects_overlong_domain_label() {
        let label = "a".repeat(64);
        assert!(Email::parse(&format!("user@{label}.com")).is_err());
        let label = "a".repeat(63);
        assert!(Email::parse(&format!("user@{label}.com")).is_ok());
    }
}

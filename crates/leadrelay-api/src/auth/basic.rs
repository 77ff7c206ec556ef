/// HTTP basic auth for the Inbound Parse webhook
use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Authorization` header value for these credentials
    pub fn header_value(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.username, self.password))
        )
    }

    /// Checks an `Authorization` header against these credentials
    pub fn matches(&self, header: Option<&str>) -> bool {
        let Some((scheme, encoded)) = header.and_then(|h| h.trim().split_once(' ')) else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return false;
        }
        let Some(decoded) = STANDARD
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
        else {
            return false;
        };
        let Some((username, password)) = decoded.split_once(':') else {
            return false;
        };

        // compare digests, not the secrets themselves
        let user_ok = Sha256::digest(username) == Sha256::digest(&self.username);
        let pass_ok = Sha256::digest(password) == Sha256::digest(&self.password);
        user_ok & pass_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> BasicCredentials {
        BasicCredentials::new("sendgrid", "parse-secret")
    }

    #[test]
    fn test_header_round_trip() {
        let creds = creds();
        assert_eq!(creds.header_value(), "Basic c2VuZGdyaWQ6cGFyc2Utc2VjcmV0");
        assert!(creds.matches(Some(&creds.header_value())));
        assert!(creds.matches(Some("basic c2VuZGdyaWQ6cGFyc2Utc2VjcmV0")));
    }

    #[test]
    fn test_rejects_wrong_or_missing_credentials() {
        let creds = creds();
        let wrong = BasicCredentials::new("sendgrid", "guess").header_value();

        assert!(!creds.matches(None));
        assert!(!creds.matches(Some(&wrong)));
        assert!(!creds.matches(Some("Bearer c2VuZGdyaWQ6cGFyc2Utc2VjcmV0")));
        assert!(!creds.matches(Some("Basic %%%")));
        assert!(!creds.matches(Some("Basic c2VuZGdyaWQ=")));
    }
}

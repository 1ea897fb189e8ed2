// RFC 2617 HTTP Digest authentication
//
// The device's developer web server (sideload, screenshot) guards its
// endpoints with Digest auth. Each privileged request probes for a fresh
// challenge and computes a single-use header, so the nonce count never
// advances past 00000001.

use md5::{Digest, Md5};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};

/// Nonce count sent with every header. Digests are never reused.
pub const NONCE_COUNT: &str = "00000001";

/// Username shipped on developer-mode devices.
pub const DEFAULT_USERNAME: &str = "rokudev";

/// Password assumed when none is configured.
pub const DEFAULT_PASSWORD: &str = "1234";

/// Developer web server credentials.
#[derive(Debug, Clone)]
pub struct DeviceCredentials {
    pub username: String,
    pub password: SecretString,
}

impl DeviceCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl Default for DeviceCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

/// The directives we need from a `WWW-Authenticate: Digest ...` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: String,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// Directives are split on commas outside quotes. The first occurrence
    /// of each key wins and anything that doesn't look like `key=value` is
    /// skipped. Returns `None` unless realm, nonce and qop are all present.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let body = match header.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("digest") => rest,
            _ => header,
        };

        let mut realm = None;
        let mut nonce = None;
        let mut qop = None;

        for directive in split_directives(body) {
            let Some((key, value)) = directive.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim());
            let slot = match key.trim().to_ascii_lowercase().as_str() {
                "realm" => &mut realm,
                "nonce" => &mut nonce,
                "qop" => &mut qop,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_owned());
            }
        }

        Some(Self {
            realm: realm?,
            nonce: nonce?,
            qop: select_qop(&qop?)?,
        })
    }
}

/// Split on commas that are not inside a quoted string.
fn split_directives(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, ch) in input.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Pick `auth` out of a qop list, or the single offered value.
fn select_qop(offered: &str) -> Option<String> {
    let options: Vec<&str> = offered
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect();
    if options.iter().any(|o| o.eq_ignore_ascii_case("auth")) {
        return Some("auth".to_owned());
    }
    options.first().map(|o| (*o).to_owned())
}

/// Everything needed to compute one `Authorization` header.
///
/// Built per call and dropped after the header is produced.
#[derive(Debug, Clone)]
pub struct DigestContext {
    pub nonce: String,
    pub realm: String,
    pub qop: String,
    pub uri: String,
    pub method: String,
    pub username: String,
    pub password: SecretString,
}

impl DigestContext {
    pub fn new(
        challenge: DigestChallenge,
        uri: impl Into<String>,
        method: impl Into<String>,
        credentials: &DeviceCredentials,
    ) -> Self {
        Self {
            nonce: challenge.nonce,
            realm: challenge.realm,
            qop: challenge.qop,
            uri: uri.into(),
            method: method.into(),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        }
    }

    /// The `response` directive for a given client nonce.
    pub fn response(&self, cnonce: &str) -> String {
        let ha1 = hex_md5(&[&self.username, &self.realm, self.password.expose_secret()]);
        let ha2 = hex_md5(&[&self.method, &self.uri]);
        hex_md5(&[&ha1, &self.nonce, NONCE_COUNT, cnonce, &self.qop, &ha2])
    }

    /// Full `Authorization` header value.
    ///
    /// Field order and quoting match what the device firmware expects.
    pub fn authorization(&self, cnonce: &str) -> String {
        let response = self.response(cnonce);
        format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", cnonce="{cnonce}", nc={NONCE_COUNT}, qop="{}", response="{response}""#,
            self.username, self.realm, self.nonce, self.uri, self.qop,
        )
    }
}

/// 16 lowercase hex characters from 8 random bytes.
pub fn generate_cnonce() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hex_md5(parts: &[&str]) -> String {
    let mut h = Md5::new();
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            h.update(b":");
        }
        h.update(p.as_bytes());
    }
    hex::encode(h.finalize())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn rfc_context() -> DigestContext {
        let challenge = DigestChallenge {
            realm: "testrealm@host.com".into(),
            nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".into(),
            qop: "auth".into(),
        };
        DigestContext::new(
            challenge,
            "/dir/index.html",
            "GET",
            &DeviceCredentials::new("Mufasa", "Circle Of Life"),
        )
    }

    #[test]
    fn rfc2617_response_vector() {
        assert_eq!(
            rfc_context().response("0a4f113b"),
            "6629fae49393a05397450978507c4ef1"
        );
    }

    #[test]
    fn rfc2617_header_layout() {
        assert_eq!(
            rfc_context().authorization("0a4f113b"),
            r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", cnonce="0a4f113b", nc=00000001, qop="auth", response="6629fae49393a05397450978507c4ef1""#
        );
    }

    #[test]
    fn header_is_deterministic_for_fixed_cnonce() {
        let ctx = rfc_context();
        assert_eq!(ctx.authorization("abc"), ctx.authorization("abc"));
        assert_ne!(ctx.authorization("abc"), ctx.authorization("abd"));
    }

    #[test]
    fn cnonce_is_sixteen_lowercase_hex() {
        let cnonce = generate_cnonce();
        assert_eq!(cnonce.len(), 16);
        assert!(cnonce.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parses_roku_challenge() {
        let challenge = DigestChallenge::parse(
            r#"Digest qop="auth", realm="rokudev", nonce="1712345678""#,
        )
        .unwrap();
        assert_eq!(
            challenge,
            DigestChallenge {
                realm: "rokudev".into(),
                nonce: "1712345678".into(),
                qop: "auth".into(),
            }
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let challenge =
            DigestChallenge::parse(r#"Digest realm="a", realm="b", nonce="n", qop="auth""#).unwrap();
        assert_eq!(challenge.realm, "a");
    }

    #[test]
    fn malformed_directives_are_ignored() {
        let challenge = DigestChallenge::parse(
            r#"Digest garbage, realm="r", =oops, nonce="n", stale=false, qop="auth""#,
        )
        .unwrap();
        assert_eq!(challenge.nonce, "n");
    }

    #[test]
    fn quoted_commas_do_not_split() {
        let challenge =
            DigestChallenge::parse(r#"Digest realm="a, b", nonce="n", qop="auth,auth-int""#)
                .unwrap();
        assert_eq!(challenge.realm, "a, b");
        assert_eq!(challenge.qop, "auth");
    }

    #[test]
    fn bare_values_are_accepted() {
        let challenge = DigestChallenge::parse("Digest realm=r, nonce=n, qop=auth").unwrap();
        assert_eq!(challenge.qop, "auth");
    }

    #[test]
    fn missing_nonce_is_rejected() {
        assert!(DigestChallenge::parse(r#"Digest realm="r", qop="auth""#).is_none());
        assert!(DigestChallenge::parse("").is_none());
    }

    #[test]
    fn default_credentials_are_developer_defaults() {
        let creds = DeviceCredentials::default();
        assert_eq!(creds.username, "rokudev");
        assert_eq!(creds.password.expose_secret(), "1234");
    }
}

use url::Url;

use crate::error::{DialectError, Result};
use crate::transport::TransportKind;

/// Where a libSQL URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    /// Embedded engine on a local file (path kept verbatim, `:memory:` allowed).
    Local { path: String },
    /// Hrana server. `url` is the `http`/`https` endpoint to dial.
    Remote { kind: TransportKind, url: String },
}

impl ConnectTarget {
    #[must_use]
    pub fn kind(&self) -> TransportKind {
        match self {
            ConnectTarget::Local { .. } => TransportKind::Embedded,
            ConnectTarget::Remote { kind, .. } => *kind,
        }
    }
}

/// A libSQL database URL split into a connect target and an optional credential.
#[derive(Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub target: ConnectTarget,
    /// Token from the `authToken` query parameter
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for ParsedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedUrl")
            .field("target", &self.target)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Parse a libSQL URL.
///
/// Accepted forms:
/// - `file:<path>` / `file://<path>`: embedded database
/// - `http://`, `https://`: Hrana over HTTP
/// - `ws://`, `wss://`: Hrana server addressed by its WebSocket URL
/// - `libsql://`: TLS by default, `?tls=0` for plaintext
///
/// `?authToken=<token>` is accepted on remote URLs and stripped from the dialed endpoint.
/// WebSocket and `libsql:` URLs are dialed over HTTP(S) on the same host, because the
/// `libsql` client speaks Hrana over HTTP.
///
/// # Errors
///
/// Returns [`DialectError::Configuration`] for malformed URLs, unknown schemes or query
/// parameters, credentials in the userinfo part, fragments, and a query string on a
/// `file:` URL.
pub fn parse_libsql_url(raw: &str) -> Result<ParsedUrl> {
    if let Some(rest) = raw.strip_prefix("file:") {
        let path = rest.strip_prefix("//").unwrap_or(rest);
        if path.is_empty() {
            return Err(DialectError::Configuration(
                "file: URL has an empty path".to_string(),
            ));
        }
        if path.contains(['?', '#']) {
            return Err(DialectError::Configuration(
                "file: URLs take no query parameters or fragment".to_string(),
            ));
        }
        return Ok(ParsedUrl {
            target: ConnectTarget::Local {
                path: path.to_string(),
            },
            auth_token: None,
        });
    }

    // The token may sit in the query string; keep the raw URL out of error messages.
    let url = Url::parse(raw)
        .map_err(|e| DialectError::Configuration(format!("invalid database URL: {e}")))?;

    let (kind, default_tls) = match url.scheme() {
        "http" => (TransportKind::Http, false),
        "https" => (TransportKind::Http, true),
        "ws" => (TransportKind::WebSocket, false),
        "wss" => (TransportKind::WebSocket, true),
        "libsql" => (TransportKind::WebSocket, true),
        other => {
            return Err(DialectError::Configuration(format!(
                "unsupported URL scheme {other:?}; expected file, libsql, http, https, ws or wss"
            )));
        }
    };

    if !url.username().is_empty() || url.password().is_some() {
        return Err(DialectError::Configuration(
            "credentials in the URL userinfo are not supported; use authToken".to_string(),
        ));
    }
    if url.fragment().is_some() {
        return Err(DialectError::Configuration(
            "database URL must not contain a fragment".to_string(),
        ));
    }

    let mut auth_token = None;
    let mut tls = None;
    for (key, value) in url.query_pairs() {
        match &*key {
            "authToken" => auth_token = Some(value.into_owned()),
            "tls" => {
                if url.scheme() != "libsql" {
                    return Err(DialectError::Configuration(
                        "the tls parameter is only valid on libsql: URLs".to_string(),
                    ));
                }
                tls = Some(match &*value {
                    "0" => false,
                    "1" => true,
                    other => {
                        return Err(DialectError::Configuration(format!(
                            "unknown value for the tls parameter: {other:?}"
                        )));
                    }
                });
            }
            other => {
                return Err(DialectError::Configuration(format!(
                    "unknown URL query parameter {other:?}"
                )));
            }
        }
    }

    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(|| {
        DialectError::Configuration("remote database URL has no host".to_string())
    })?;
    let scheme = if tls.unwrap_or(default_tls) {
        "https"
    } else {
        "http"
    };
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();

    Ok(ParsedUrl {
        target: ConnectTarget::Remote {
            kind,
            url: format!("{scheme}://{host}{port}{}", url.path()),
        },
        auth_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(parsed: &ParsedUrl) -> (&TransportKind, &str) {
        match &parsed.target {
            ConnectTarget::Remote { kind, url } => (kind, url.as_str()),
            ConnectTarget::Local { .. } => panic!("expected a remote target"),
        }
    }

    #[test]
    fn file_urls_keep_path_verbatim() {
        let parsed = parse_libsql_url("file:test.db").expect("parse");
        assert_eq!(
            parsed.target,
            ConnectTarget::Local {
                path: "test.db".into()
            }
        );
        assert_eq!(parsed.target.kind(), TransportKind::Embedded);

        let parsed = parse_libsql_url("file:///var/db/app.db").expect("parse");
        assert_eq!(
            parsed.target,
            ConnectTarget::Local {
                path: "/var/db/app.db".into()
            }
        );
        assert!(parse_libsql_url("file:").is_err());
    }

    #[test]
    fn file_urls_reject_query_and_fragment() {
        for bad in ["file:test.db?mode=ro", "file:///var/db/app.db#main"] {
            let err = parse_libsql_url(bad).expect_err(bad);
            assert!(matches!(err, DialectError::Configuration(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn http_url_with_token() {
        let parsed = parse_libsql_url("https://db.example.com?authToken=secret").expect("parse");
        assert_eq!(parsed.auth_token.as_deref(), Some("secret"));
        let (kind, url) = remote(&parsed);
        assert_eq!(*kind, TransportKind::Http);
        assert_eq!(url, "https://db.example.com/");
    }

    #[test]
    fn websocket_urls_dial_http() {
        let parsed = parse_libsql_url("ws://localhost:8080").expect("parse");
        let (kind, url) = remote(&parsed);
        assert_eq!(*kind, TransportKind::WebSocket);
        assert_eq!(url, "http://localhost:8080/");

        let parsed = parse_libsql_url("wss://db.example.com/").expect("parse");
        assert_eq!(remote(&parsed).1, "https://db.example.com/");
    }

    #[test]
    fn libsql_scheme_honours_tls_flag() {
        let parsed = parse_libsql_url("libsql://db.example.com").expect("parse");
        assert_eq!(remote(&parsed).1, "https://db.example.com");

        let parsed = parse_libsql_url("libsql://localhost:8080?tls=0").expect("parse");
        assert_eq!(remote(&parsed).1, "http://localhost:8080");

        assert!(parse_libsql_url("libsql://localhost?tls=yes").is_err());
        assert!(parse_libsql_url("https://localhost?tls=0").is_err());
    }

    #[test]
    fn rejects_unsupported_inputs() {
        for bad in [
            "postgres://localhost/db",
            "https://user:pw@db.example.com",
            "https://db.example.com#frag",
            "https://db.example.com?mode=ro",
            "not a url",
        ] {
            let err = parse_libsql_url(bad).expect_err(bad);
            assert!(matches!(err, DialectError::Configuration(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn debug_redacts_token() {
        let parsed = parse_libsql_url("http://h?authToken=hunter2").expect("parse");
        let shown = format!("{parsed:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }
}

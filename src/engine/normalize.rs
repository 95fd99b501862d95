//! Turns a raw URL string into the canonical form used as node identity
//! (`spec.md` §4.1).

use std::fmt;

use thiserror::Error;
use url::Url;

/// An absolute, canonicalized URL: fragment and raw query stripped. The
/// sole identity key used throughout the engine (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot normalize")]
pub struct NormalizeError;

/// Normalizes `raw` into a [`CanonicalUrl`], optionally resolving a
/// root-relative path against `base_host`.
///
/// Implements `spec.md` §4.1 rules 1–6 in order:
/// 1. a leading `/` is resolved against `https://<base_host>`;
/// 2. otherwise `raw` must begin with the literal prefix `http` (so both
///    `http://` and `https://` pass, but `mailto:`, `javascript:`, and
///    `ftp://` do not);
/// 3. parse, retrying once with an `https://` prefix if the first parse
///    has no host;
/// 4. default an empty scheme to `https`;
/// 5. strip fragment and query;
/// 6. serialize.
pub fn normalize(raw: &str, base_host: Option<&str>) -> Result<CanonicalUrl, NormalizeError> {
    let candidate = if let Some(rest) = raw.strip_prefix('/') {
        let host = base_host.ok_or(NormalizeError)?;
        format!("https://{host}/{rest}")
    } else if !raw.starts_with("http") {
        return Err(NormalizeError);
    } else {
        raw.to_string()
    };

    let mut url = parse_with_host(&candidate)
        .or_else(|| parse_with_host(&format!("https://{candidate}")))
        .ok_or(NormalizeError)?;

    if url.scheme().is_empty() {
        url.set_scheme("https").map_err(|()| NormalizeError)?;
    }

    url.set_fragment(None);
    url.set_query(None);

    Ok(CanonicalUrl(url.to_string()))
}

fn parse_with_host(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    url.host().is_some().then_some(url)
}

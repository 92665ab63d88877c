//! Container image references
//!
//! Parses pull specs such as `quay.io/org/app:v1@sha256:<hex>` into their
//! registry, repository, tag and digest parts. Provenance is keyed by
//! content digest, so a reference without one is rejected.
//!
//! Docker Hub shorthand follows the usual normalization rules:
//! `nginx@sha256:...` is `docker.io/library/nginx`, and its familiar name
//! is `nginx` again.

use std::fmt;

const DEFAULT_DOMAIN: &str = "docker.io";
const LEGACY_DEFAULT_DOMAIN: &str = "index.docker.io";
const OFFICIAL_REPO_PREFIX: &str = "library/";
const MAX_TAG_LEN: usize = 128;

/// Errors produced while parsing an image reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageReferenceError {
    #[error("image reference is empty")]
    Empty,

    #[error("image reference does not contain a digest: {0}")]
    MissingDigest(String),

    #[error("invalid digest '{0}'")]
    InvalidDigest(String),

    #[error("invalid tag '{0}'")]
    InvalidTag(String),

    #[error("invalid repository name '{0}'")]
    InvalidRepository(String),
}

/// A parsed, digest-pinned image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    hostname: String,
    repository: String,
    tag: Option<String>,
    digest: String,
}

impl ImageReference {
    /// Parse a pull spec of the form `name[:tag]@algorithm:hex`
    pub fn parse(reference: &str) -> Result<Self, ImageReferenceError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ImageReferenceError::Empty);
        }

        let (name_and_tag, digest) = reference
            .split_once('@')
            .ok_or_else(|| ImageReferenceError::MissingDigest(reference.to_string()))?;
        validate_digest(digest)?;

        // A ':' after the last '/' separates the tag; earlier ones belong to a registry port
        let last_slash = name_and_tag.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (name, tag) = match name_and_tag[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                let tag = &name_and_tag[split + 1..];
                validate_tag(tag)?;
                (&name_and_tag[..split], Some(tag.to_string()))
            }
            None => (name_and_tag, None),
        };

        let (hostname, repository) = split_domain(name);
        validate_repository(&repository)?;

        Ok(Self {
            hostname,
            repository,
            tag,
            digest: digest.to_string(),
        })
    }

    /// Registry host (with port, if any)
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Repository path without the registry
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Tag, when the reference carried one next to the digest
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Content digest (`algorithm:hex`)
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Registry-qualified repository name without tag or digest, in the
    /// short form users type (Docker Hub references drop the default
    /// domain and the `library/` prefix)
    pub fn familiar_name(&self) -> String {
        if self.hostname == DEFAULT_DOMAIN {
            match self.repository.strip_prefix(OFFICIAL_REPO_PREFIX) {
                Some(rest) if !rest.contains('/') => rest.to_string(),
                _ => self.repository.clone(),
            }
        } else {
            format!("{}/{}", self.hostname, self.repository)
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.familiar_name())?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        write!(f, "@{}", self.digest)
    }
}

impl std::str::FromStr for ImageReference {
    type Err = ImageReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a name into (domain, path), applying Docker Hub defaults
fn split_domain(name: &str) -> (String, String) {
    let (domain, path) = match name.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            (first.to_string(), rest.to_string())
        }
        _ => (DEFAULT_DOMAIN.to_string(), name.to_string()),
    };

    let domain = if domain == LEGACY_DEFAULT_DOMAIN {
        DEFAULT_DOMAIN.to_string()
    } else {
        domain
    };

    let path = if domain == DEFAULT_DOMAIN && !path.contains('/') {
        format!("{}{}", OFFICIAL_REPO_PREFIX, path)
    } else {
        path
    };

    (domain, path)
}

/// Path components are lowercase alphanumeric runs joined by `.`, `_`, `__` or dashes
fn validate_repository(path: &str) -> Result<(), ImageReferenceError> {
    let invalid = || ImageReferenceError::InvalidRepository(path.to_string());
    if path.is_empty() {
        return Err(invalid());
    }

    for component in path.split('/') {
        let bytes = component.as_bytes();
        let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
            return Err(invalid());
        };
        if !is_lower_alnum(*first) || !is_lower_alnum(*last) {
            return Err(invalid());
        }

        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if is_lower_alnum(b) {
                i += 1;
                continue;
            }
            let run_start = i;
            while i < bytes.len() && !is_lower_alnum(bytes[i]) {
                i += 1;
            }
            let separator = &component[run_start..i];
            let valid = separator == "."
                || separator == "_"
                || separator == "__"
                || separator.bytes().all(|c| c == b'-');
            if !valid {
                return Err(invalid());
            }
        }
    }

    Ok(())
}

fn is_lower_alnum(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit()
}

fn validate_tag(tag: &str) -> Result<(), ImageReferenceError> {
    let mut chars = tag.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if first_ok && rest_ok && tag.len() <= MAX_TAG_LEN {
        Ok(())
    } else {
        Err(ImageReferenceError::InvalidTag(tag.to_string()))
    }
}

fn validate_digest(digest: &str) -> Result<(), ImageReferenceError> {
    let invalid = || ImageReferenceError::InvalidDigest(digest.to_string());
    let (algorithm, hex) = digest.split_once(':').ok_or_else(invalid)?;

    if algorithm.is_empty()
        || !algorithm
            .bytes()
            .all(|b| is_lower_alnum(b) || matches!(b, b'+' | b'.' | b'_' | b'-'))
    {
        return Err(invalid());
    }
    if !hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
        return Err(invalid());
    }

    let length_ok = match algorithm {
        "sha256" => hex.len() == 64,
        "sha512" => hex.len() == 128,
        _ => hex.len() >= 32,
    };
    if !length_ok {
        return Err(invalid());
    }

    Ok(())
}

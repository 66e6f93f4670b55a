//! Canonicalization of raw TLD tokens

/// ASCII-compatible encoding prefix of internationalized labels
pub const PUNYCODE_PREFIX: &str = "xn--";

/// Map a raw token to its canonical TLD, or `None` if it must be left out.
///
/// The token is lowercased. Punycode labels are rejected since their Unicode
/// form covers them, and so is the empty string. Anything else is accepted
/// as is: the line rule that produced the token is trusted.
///
/// # Examples
///
/// ```
/// use tldsgen::normalize::normalize;
///
/// assert_eq!(normalize("COM").as_deref(), Some("com"));
/// assert_eq!(normalize("XN--P1AI"), None);
/// ```
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let tld = raw.to_lowercase();
    if tld.is_empty() || tld.starts_with(PUNYCODE_PREFIX) {
        return None;
    }
    Some(tld)
}

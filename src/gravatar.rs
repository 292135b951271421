//! Gravatar URL construction: md5 of the trimmed, lowercased email.

/// Builds the avatar URL stored on the user at registration time.
/// 200px, pg-rated, "mystery man" fallback.
pub fn url(email: &str) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_stable_for_equivalent_emails() {
        let a = url("someone@example.com");
        let b = url("  Someone@Example.COM ");
        assert_eq!(a, b);
    }

    #[test]
    fn url_has_expected_shape() {
        let u = url("someone@example.com");
        assert!(u.starts_with("https://www.gravatar.com/avatar/"));
        assert!(u.ends_with("?s=200&r=pg&d=mm"));
    }
}

/// Commit SHA stamped by build.rs, if the crate was built inside a git checkout.
pub fn git_sha() -> Option<&'static str> {
    option_env!("TDSP_BUILD_GIT_SHA")
}

/// Version line shown by `tdsp --version`.
pub const LONG_VERSION: &str = env!("TDSP_LONG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_version_starts_with_package_version() {
        assert!(LONG_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn long_version_mentions_sha_when_stamped() {
        if let Some(sha) = git_sha() {
            assert!(LONG_VERSION.contains(sha));
        }
    }
}

//! Redirect-path glue for the dataset landing route.
//!
//! Pure functions over explicit inputs: the episode index list comes from
//! configuration, never from ambient process state at the call site.

/// Parse a whitespace-separated list of episode indices, keeping order and
/// dropping anything that is not a non-negative integer.
pub fn parse_episode_indices(raw: &str) -> Vec<u32> {
    raw.split_whitespace()
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .collect()
}

/// Target path for the dataset root: the first configured episode index, or
/// episode 0 when none is configured.
pub fn episode_redirect_path(org: &str, dataset: &str, episodes: &[u32]) -> String {
    let episode = episodes.first().copied().unwrap_or(0);
    format!("/data/{org}/{dataset}/episode_{episode}")
}

// Parse `find` and git plumbing output.

const GIT_DIR_SUFFIX: &str = "/.git";

/// Repository roots from `find <dir> -type d -name .git` output.
pub fn parse_find_output(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.strip_suffix(GIT_DIR_SUFFIX))
        .filter(|root| !root.is_empty())
        .map(String::from)
        .collect()
}

/// Number of entries in `git status --porcelain` output.
pub fn count_porcelain_entries(output: &str) -> u32 {
    output.lines().filter(|l| !l.trim().is_empty()).count() as u32
}

/// Output of `git rev-list --count`.
pub fn parse_count(output: &str) -> Option<u32> {
    output.trim().parse().ok()
}

/// First-seen order, duplicates removed, then capped.
pub fn dedupe_and_cap(paths: impl IntoIterator<Item = String>, max: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .take(max)
        .collect()
}

//! Polling branches for new commits.

use crate::client::SvnClient;
use crate::error::Result;
use crate::path::RepositoryPath;
use std::collections::BTreeMap;
use tracing::debug;

/// Branch name mapped to the revision of its last commit.
pub type CommitMap = BTreeMap<String, String>;

/// Snapshots the last commit of trunk and every branch of a repository.
#[derive(Debug, Clone)]
pub struct RepositoryMonitor {
    client: SvnClient,
    root: RepositoryPath,
}

impl RepositoryMonitor {
    /// Create a monitor for the repository at `repository_url`.
    pub fn new(client: SvnClient, repository_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            root: RepositoryPath::root(repository_url)?,
        })
    }

    /// Current snapshot keyed by `trunk` or `branches/<name>`.
    pub async fn current_commits(&self) -> Result<CommitMap> {
        let branches = self.client.enumerate_branches(&self.root).await?;
        let commits: CommitMap = branches
            .into_iter()
            .map(|b| (b.branch_name().to_string(), b.revision))
            .collect();
        debug!(count = commits.len(), root = %self.root, "branch snapshot");
        Ok(commits)
    }
}

/// Branches that are new in `current` or whose revision differs from `previous`.
///
/// Revisions are compared ignoring ASCII case.
#[must_use]
pub fn changed_branches(previous: &CommitMap, current: &CommitMap) -> Vec<String> {
    current
        .iter()
        .filter(|(name, revision)| {
            previous
                .get(*name)
                .is_none_or(|old| !old.eq_ignore_ascii_case(revision))
        })
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use crate::mock::MockProcessRunner;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const LISTING: &str = "<lists>\
<list path=\"r\"><entry kind=\"dir\"><name>trunk</name>\
<commit revision=\"40\"><date>2024-05-01T00:00:00Z</date></commit></entry></list>\
<list path=\"r/branches\"><entry kind=\"dir\"><name>rel-1</name>\
<commit revision=\"38\"><author>ci</author><date>2024-04-20T00:00:00Z</date></commit></entry></list>\
</lists>";

    fn map(pairs: &[(&str, &str)]) -> CommitMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn snapshot_keys_branches_by_name() {
        let mock = MockProcessRunner::new();
        mock.expect("ls").returns_stdout(LISTING).finish();
        let client = SvnClient::with_runner(ClientOptions::default(), Arc::new(mock.clone()));
        let monitor = RepositoryMonitor::new(client, "https://svn.example.com/repo").unwrap();

        let commits = monitor.current_commits().await.unwrap();
        assert_eq!(commits, map(&[("branches/rel-1", "38"), ("trunk", "40")]));
    }

    #[test]
    fn detects_new_and_moved_branches() {
        let previous = map(&[("trunk", "40"), ("branches/rel-1", "38"), ("branches/old", "5")]);
        let current = map(&[("trunk", "41"), ("branches/rel-1", "38"), ("branches/rel-2", "41")]);
        assert_eq!(
            changed_branches(&previous, &current),
            vec!["branches/rel-2", "trunk"]
        );
    }

    #[test]
    fn unchanged_snapshot_reports_nothing() {
        let snapshot = map(&[("trunk", "HEAD")]);
        let lower = map(&[("trunk", "head")]);
        assert!(changed_branches(&snapshot, &lower).is_empty());
    }
}

// src/git/mock.rs

use super::GitMetadataProvider;

/// Provider returning fixed values. Used for CLI overrides and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedGitMetadata {
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub rev: Option<String>,
}

impl FixedGitMetadata {
    pub fn new(
        repo: impl Into<String>,
        branch: impl Into<String>,
        rev: impl Into<String>,
    ) -> Self {
        Self {
            repo: Some(repo.into()),
            branch: Some(branch.into()),
            rev: Some(rev.into()),
        }
    }

    /// Fill every missing field from `fallback`.
    ///
    /// `fallback` is only queried for fields that are still `None`.
    pub fn or_from(self, fallback: &dyn GitMetadataProvider) -> Self {
        Self {
            repo: self.repo.or_else(|| fallback.repo()),
            branch: self.branch.or_else(|| fallback.branch()),
            rev: self.rev.or_else(|| fallback.rev()),
        }
    }
}

impl GitMetadataProvider for FixedGitMetadata {
    fn repo(&self) -> Option<String> {
        self.repo.clone()
    }

    fn branch(&self) -> Option<String> {
        self.branch.clone()
    }

    fn rev(&self) -> Option<String> {
        self.rev.clone()
    }
}

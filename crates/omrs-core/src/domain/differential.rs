//! Upgrade differential between an installed artifact set and a desired one.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::artifact::{Artifact, ArtifactKey, compare_versions};
use crate::domain::error::DomainError;

/// What has to change to go from an installed artifact list to a desired one.
///
/// Only additions and upgrades are reported. Modules present only in the
/// installed list and downgrades are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeDifferential {
    /// Modules in the desired list with no installed counterpart, in desired order.
    pub modules_to_add: Vec<Artifact>,
    /// `(installed, desired)` pairs, in desired order.
    pub update_old_to_new: Vec<(Artifact, Artifact)>,
    /// The desired platform when it must be installed or replaced.
    pub platform_artifact: Option<Artifact>,
}

impl UpgradeDifferential {
    /// Compute the differential from `old` (installed) to `new` (desired).
    ///
    /// The first `war` entry of each list is its platform; further wars are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`DomainError::DuplicateArtifact`] if a `(group_id, artifact_id)` key
    /// appears twice among the modules of either list.
    pub fn calculate(old: &[Artifact], new: &[Artifact]) -> Result<Self, DomainError> {
        let (old_platform, old_modules) = partition(old)?;
        let (new_platform, new_modules) = partition(new)?;

        let platform_artifact = match (old_platform, new_platform) {
            (_, None) => None,
            (None, Some(desired)) => Some(desired.clone()),
            (Some(installed), Some(desired)) if installed.version != desired.version => {
                Some(desired.clone())
            }
            (Some(_), Some(_)) => None,
        };

        let installed: HashMap<ArtifactKey, &Artifact> = old_modules
            .iter()
            .map(|artifact| (artifact.key(), *artifact))
            .collect();

        let mut differential = Self {
            platform_artifact,
            ..Self::default()
        };

        for desired in new_modules {
            match installed.get(&desired.key()) {
                None => differential.modules_to_add.push(desired.clone()),
                Some(current) if needs_update(current, desired) => differential
                    .update_old_to_new
                    .push(((*current).clone(), desired.clone())),
                Some(_) => {}
            }
        }

        Ok(differential)
    }

    pub fn is_empty(&self) -> bool {
        self.modules_to_add.is_empty()
            && self.update_old_to_new.is_empty()
            && self.platform_artifact.is_none()
    }

    /// Total number of artifacts to install.
    pub fn len(&self) -> usize {
        self.modules_to_add.len()
            + self.update_old_to_new.len()
            + usize::from(self.platform_artifact.is_some())
    }

    /// True when the only changes are snapshot modules fetched again at the
    /// version already installed.
    pub fn only_refreshes_snapshots(&self) -> bool {
        self.platform_artifact.is_none()
            && self.modules_to_add.is_empty()
            && !self.update_old_to_new.is_empty()
            && self
                .update_old_to_new
                .iter()
                .all(|(old, new)| new.is_snapshot() && old.version == new.version)
    }
}

fn needs_update(current: &Artifact, desired: &Artifact) -> bool {
    if current.version == desired.version {
        return desired.is_snapshot();
    }
    match compare_versions(&desired.version, &current.version) {
        Some(ordering) => ordering == Ordering::Greater,
        None => true,
    }
}

/// Split a list into its platform (first war) and modules, rejecting
/// duplicate module keys.
fn partition(artifacts: &[Artifact]) -> Result<(Option<&Artifact>, Vec<&Artifact>), DomainError> {
    let mut platform = None;
    let mut modules = Vec::with_capacity(artifacts.len());
    let mut seen = HashSet::with_capacity(artifacts.len());

    for artifact in artifacts {
        if artifact.is_platform() {
            if platform.is_none() {
                platform = Some(artifact);
            }
            continue;
        }
        let key = artifact.key();
        if !seen.insert(key.clone()) {
            return Err(DomainError::DuplicateArtifact {
                key: key.to_string(),
            });
        }
        modules.push(artifact);
    }

    Ok((platform, modules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::{ArtifactType, GROUP_WEB};
    use proptest::prelude::*;

    fn platform(version: &str) -> Artifact {
        Artifact::full("openmrs-webapp", version, GROUP_WEB, ArtifactType::War)
    }

    fn installed() -> Vec<Artifact> {
        vec![
            Artifact::new("webservices", "1.0"),
            Artifact::new("webapp", "1.12"),
            Artifact::new("appui", "0.1-SNAPSHOT"),
            platform("10.7"),
        ]
    }

    fn desired() -> Vec<Artifact> {
        vec![
            Artifact::new("webservices", "1.2"),
            Artifact::new("webapp", "1.12"),
            Artifact::new("appui", "0.1-SNAPSHOT"),
            Artifact::new("drugs", "0.2-SNAPSHOT"),
            platform("12.0"),
        ]
    }

    fn oldest() -> Vec<Artifact> {
        vec![
            Artifact::new("webservices", "0.7"),
            Artifact::new("webapp", "1.7"),
            platform("10.7"),
        ]
    }

    #[test]
    fn finds_additions() {
        let diff = UpgradeDifferential::calculate(&installed(), &desired()).unwrap();
        assert_eq!(diff.modules_to_add, vec![Artifact::new("drugs", "0.2-SNAPSHOT")]);
        assert_eq!(diff.modules_to_add[0].version, "0.2-SNAPSHOT");
    }

    #[test]
    fn finds_upgrades_and_snapshots() {
        let diff = UpgradeDifferential::calculate(&installed(), &desired()).unwrap();

        let pairs: Vec<(&str, &str, &str)> = diff
            .update_old_to_new
            .iter()
            .map(|(old, new)| (old.artifact_id.as_str(), old.version.as_str(), new.version.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("webservices", "1.0", "1.2"), ("appui", "0.1-SNAPSHOT", "0.1-SNAPSHOT")]
        );
    }

    #[test]
    fn finds_platform_upgrade() {
        let diff = UpgradeDifferential::calculate(&installed(), &desired()).unwrap();
        let platform = diff.platform_artifact.unwrap();
        assert_eq!(platform.version, "12.0");
        assert_eq!(platform.artifact_type, ArtifactType::War);
    }

    #[test]
    fn platform_only_lists() {
        let diff = UpgradeDifferential::calculate(&[platform("10.7")], &[platform("12.0")]).unwrap();
        assert_eq!(diff.platform_artifact, Some(platform("12.0")));
        assert!(diff.modules_to_add.is_empty());
    }

    #[test]
    fn first_platform_install_is_reported() {
        let diff = UpgradeDifferential::calculate(&[], &[platform("1.11.6")]).unwrap();
        assert_eq!(diff.platform_artifact.unwrap().version, "1.11.6");
    }

    #[test]
    fn downgrade_yields_nothing() {
        let diff = UpgradeDifferential::calculate(&installed(), &oldest()).unwrap();
        assert!(diff.platform_artifact.is_none());
        assert!(diff.modules_to_add.is_empty());
        assert!(diff.update_old_to_new.is_empty());
        assert!(diff.is_empty());
    }

    #[test]
    fn same_list_only_refreshes_snapshots() {
        let diff = UpgradeDifferential::calculate(&installed(), &installed()).unwrap();
        assert!(diff.platform_artifact.is_none());
        assert!(diff.modules_to_add.is_empty());
        assert_eq!(diff.update_old_to_new.len(), 1);
        assert_eq!(diff.update_old_to_new[0].0, Artifact::new("appui", "0.1-SNAPSHOT"));
        assert!(diff.only_refreshes_snapshots());

        let upgrade = UpgradeDifferential::calculate(&installed(), &desired()).unwrap();
        assert!(!upgrade.only_refreshes_snapshots());
        assert!(!UpgradeDifferential::default().only_refreshes_snapshots());
    }

    #[test]
    fn modules_only_installed_are_ignored() {
        let diff = UpgradeDifferential::calculate(&installed(), &[]).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn unparsable_versions_fall_back_to_inequality() {
        let old = [Artifact::new("legacy", "beta")];
        let new = [Artifact::new("legacy", "gamma")];
        let diff = UpgradeDifferential::calculate(&old, &new).unwrap();
        assert_eq!(diff.update_old_to_new.len(), 1);
    }

    #[test]
    fn release_replaces_its_snapshot() {
        let old = [Artifact::new("appui", "0.2-SNAPSHOT")];
        let new = [Artifact::new("appui", "0.2")];
        let diff = UpgradeDifferential::calculate(&old, &new).unwrap();
        assert_eq!(diff.update_old_to_new.len(), 1);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let new = [Artifact::new("appui", "1.0"), Artifact::new("appui", "1.1")];
        let err = UpgradeDifferential::calculate(&[], &new).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateArtifact { .. }));

        assert!(UpgradeDifferential::calculate(&new, &[]).is_err());
    }

    #[test]
    fn only_first_war_is_the_platform() {
        let new = [platform("2.0"), platform("3.0")];
        let diff = UpgradeDifferential::calculate(&[], &new).unwrap();
        assert_eq!(diff.platform_artifact.unwrap().version, "2.0");
        assert!(diff.modules_to_add.is_empty());
    }

    fn artifact_list() -> impl Strategy<Value = Vec<Artifact>> {
        prop::collection::btree_map("[a-e]", "[0-3](\\.[0-3]){0,2}(-SNAPSHOT)?", 0..5).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(id, version)| Artifact::new(id, version))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn is_empty_matches_parts(old in artifact_list(), new in artifact_list()) {
            let diff = UpgradeDifferential::calculate(&old, &new).unwrap();
            let parts_empty = diff.modules_to_add.is_empty()
                && diff.update_old_to_new.is_empty()
                && diff.platform_artifact.is_none();
            prop_assert_eq!(diff.is_empty(), parts_empty);
        }

        #[test]
        fn self_diff_is_snapshots_only(list in artifact_list()) {
            let diff = UpgradeDifferential::calculate(&list, &list).unwrap();
            let snapshots = list.iter().filter(|a| a.is_snapshot()).count();
            prop_assert!(diff.modules_to_add.is_empty());
            prop_assert_eq!(diff.update_old_to_new.len(), snapshots);
        }

        #[test]
        fn everything_new_is_an_addition(new in artifact_list()) {
            let diff = UpgradeDifferential::calculate(&[], &new).unwrap();
            prop_assert_eq!(diff.modules_to_add.len(), new.len());
        }
    }
}

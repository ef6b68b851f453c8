//! Human-readable description of an upgrade, and the confirmation step.

use crate::application::services::wizard::Wizard;
use crate::domain::UpgradeDifferential;
use crate::error::SdkResult;

pub const NOTHING_TO_UPGRADE: &str = "nothing to upgrade";

/// Outcome of presenting an upgrade to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeDecision {
    NothingToUpgrade,
    Confirmed,
    Declined,
}

/// One line per change: platform first, then module upgrades, then
/// additions.
pub fn describe(diff: &UpgradeDifferential, installed_platform: Option<&str>) -> Vec<String> {
    if diff.is_empty() {
        return vec![NOTHING_TO_UPGRADE.to_string()];
    }

    let mut lines = Vec::with_capacity(diff.len());

    if let Some(platform) = &diff.platform_artifact {
        lines.push(format!(
            "upgrade platform from {} to {}",
            installed_platform.unwrap_or("(none)"),
            platform.version
        ));
    }
    for (old, new) in &diff.update_old_to_new {
        lines.push(format!(
            "upgrade module {} from {} to {}",
            old.artifact_id, old.version, new.version
        ));
    }
    for added in &diff.modules_to_add {
        lines.push(format!(
            "add module {} version {}",
            added.artifact_id, added.version
        ));
    }

    lines
}

/// Show the planned changes and ask whether to go ahead.
///
/// An empty differential is reported without asking. A differential that
/// only refreshes snapshots, or `assume_yes`, shows the changes and
/// confirms them without a question.
pub fn confirm(
    wizard: &Wizard<'_>,
    diff: &UpgradeDifferential,
    installed_platform: Option<&str>,
    assume_yes: bool,
) -> SdkResult<UpgradeDecision> {
    if diff.is_empty() {
        wizard.show(NOTHING_TO_UPGRADE);
        return Ok(UpgradeDecision::NothingToUpgrade);
    }

    wizard.show("The following changes will be made to the server:");
    for line in describe(diff, installed_platform) {
        wizard.show(&format!("  {line}"));
    }

    if assume_yes
        || diff.only_refreshes_snapshots()
        || wizard.yes_no("Do you want to continue?")?
    {
        Ok(UpgradeDecision::Confirmed)
    } else {
        Ok(UpgradeDecision::Declined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::ScriptedPrompter;
    use crate::domain::Artifact;

    fn diff() -> UpgradeDifferential {
        UpgradeDifferential {
            modules_to_add: vec![Artifact::new("drugs", "0.2-SNAPSHOT")],
            update_old_to_new: vec![(
                Artifact::new("webservices", "1.0"),
                Artifact::new("webservices", "1.2"),
            )],
            platform_artifact: Some(Artifact::platform("12.0")),
        }
    }

    #[test]
    fn describes_each_change() {
        assert_eq!(
            describe(&diff(), Some("10.7")),
            vec![
                "upgrade platform from 10.7 to 12.0",
                "upgrade module webservices from 1.0 to 1.2",
                "add module drugs version 0.2-SNAPSHOT",
            ]
        );
    }

    #[test]
    fn describes_first_platform_install() {
        let diff = UpgradeDifferential {
            platform_artifact: Some(Artifact::platform("1.11.6")),
            ..UpgradeDifferential::default()
        };
        assert_eq!(describe(&diff, None), vec!["upgrade platform from (none) to 1.11.6"]);
    }

    #[test]
    fn empty_differential_needs_no_question() {
        let prompter = ScriptedPrompter::new(&[]);
        let decision = confirm(&Wizard::new(&prompter), &UpgradeDifferential::default(), None, false)
            .unwrap();
        assert_eq!(decision, UpgradeDecision::NothingToUpgrade);
        assert!(prompter.asked().is_empty());
        assert_eq!(prompter.shown(), vec![NOTHING_TO_UPGRADE]);
    }

    #[test]
    fn confirm_and_decline() {
        let prompter = ScriptedPrompter::new(&["y"]);
        assert_eq!(
            confirm(&Wizard::new(&prompter), &diff(), None, false).unwrap(),
            UpgradeDecision::Confirmed
        );

        let prompter = ScriptedPrompter::new(&["n"]);
        assert_eq!(
            confirm(&Wizard::new(&prompter), &diff(), None, false).unwrap(),
            UpgradeDecision::Declined
        );
    }

    #[test]
    fn assume_yes_skips_question() {
        let prompter = ScriptedPrompter::new(&[]);
        assert_eq!(
            confirm(&Wizard::new(&prompter), &diff(), Some("10.7"), true).unwrap(),
            UpgradeDecision::Confirmed
        );
        assert!(prompter.asked().is_empty());
        assert_eq!(prompter.shown().len(), 4);
    }

    #[test]
    fn snapshot_refresh_needs_no_question() {
        let diff = UpgradeDifferential {
            update_old_to_new: vec![(
                Artifact::new("appui-omod", "0.1-SNAPSHOT"),
                Artifact::new("appui-omod", "0.1-SNAPSHOT"),
            )],
            ..UpgradeDifferential::default()
        };
        let prompter = ScriptedPrompter::new(&[]);

        assert_eq!(
            confirm(&Wizard::new(&prompter), &diff, Some("2.0.0"), false).unwrap(),
            UpgradeDecision::Confirmed
        );
        assert!(prompter.asked().is_empty());
        assert_eq!(
            prompter.shown()[1],
            "  upgrade module appui-omod from 0.1-SNAPSHOT to 0.1-SNAPSHOT"
        );
    }
}

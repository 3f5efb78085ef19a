use crate::version::{Comparison, VersionComparator};
use std::fmt;

/// How the run was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    CheckOnly,
    Interactive,
    ForceApply,
    ExplicitVersion,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateMode::CheckOnly => "check only",
            UpdateMode::Interactive => "interactive",
            UpdateMode::ForceApply => "forced",
            UpdateMode::ExplicitVersion => "explicit version",
        };
        f.write_str(label)
    }
}

/// Caller-supplied flags.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub check_only: bool,
    pub update_to_latest: bool,
    pub force: bool,
    pub target_version: Option<String>,
}

impl PlanRequest {
    /// Check-only wins over everything, then an explicit target, then force.
    pub fn mode(&self) -> UpdateMode {
        if self.check_only {
            UpdateMode::CheckOnly
        } else if self.target_version.is_some() {
            UpdateMode::ExplicitVersion
        } else if self.force {
            UpdateMode::ForceApply
        } else {
            UpdateMode::Interactive
        }
    }
}

/// Versions and comparison for one invocation.
///
/// `comparison` is the target measured against the current pin: `Newer` means
/// the target is an upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub current_version: Option<String>,
    pub target_version: String,
    pub comparison: Comparison,
    pub mode: UpdateMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanWarning {
    /// The pinned version is ahead of the target (likely a prerelease pin).
    CurrentAheadOfTarget,
    /// The pinned version could not be read or parsed.
    CurrentUnknown,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::CurrentAheadOfTarget => f.write_str(
                "the pinned version is newer than the target; it may be a prerelease build",
            ),
            PlanWarning::CurrentUnknown => f.write_str(
                "the pinned version could not be determined, so it cannot be compared",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanDecision {
    /// Pinned version already equals the target; nothing to do.
    UpToDate(UpdatePlan),
    /// Check-only run; report and stop.
    ReportOnly(UpdatePlan),
    /// Mutate the manifest to `plan.target_version`.
    Apply(UpdatePlan),
    /// The operator has to pick latest, a custom version, or abort.
    AskOperator {
        plan: UpdatePlan,
        warning: Option<PlanWarning>,
    },
}

impl PlanDecision {
    #[cfg(test)]
    pub fn plan(&self) -> &UpdatePlan {
        match self {
            PlanDecision::UpToDate(plan)
            | PlanDecision::ReportOnly(plan)
            | PlanDecision::Apply(plan)
            | PlanDecision::AskOperator { plan, .. } => plan,
        }
    }
}

pub struct UpdatePlanner;

impl UpdatePlanner {
    pub fn plan(request: &PlanRequest, current: Option<&str>, latest: &str) -> PlanDecision {
        let explicit = request.target_version.as_deref();
        let target = explicit.unwrap_or(latest);
        let comparison = VersionComparator::compare(Some(target), current);

        let plan = UpdatePlan {
            current_version: current.map(str::to_string),
            target_version: target.to_string(),
            comparison,
            mode: request.mode(),
        };

        if request.check_only {
            return PlanDecision::ReportOnly(plan);
        }

        match comparison {
            Comparison::Same if request.force => PlanDecision::Apply(plan),
            Comparison::Same => PlanDecision::UpToDate(plan),
            Comparison::Newer => {
                if explicit.is_some() || request.force || request.update_to_latest {
                    PlanDecision::Apply(plan)
                } else {
                    PlanDecision::AskOperator {
                        plan,
                        warning: None,
                    }
                }
            }
            Comparison::Older => {
                if explicit.is_some() || request.force {
                    PlanDecision::Apply(plan)
                } else {
                    PlanDecision::AskOperator {
                        plan,
                        warning: Some(PlanWarning::CurrentAheadOfTarget),
                    }
                }
            }
            Comparison::Unknown => {
                if explicit.is_some() {
                    PlanDecision::Apply(plan)
                } else {
                    PlanDecision::AskOperator {
                        plan,
                        warning: Some(PlanWarning::CurrentUnknown),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PlanRequest {
        PlanRequest::default()
    }

    #[test]
    fn same_version_short_circuits_without_force() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                update_to_latest: true,
                ..request()
            },
            Some("1.0.150"),
            "1.0.150",
        );
        assert!(matches!(decision, PlanDecision::UpToDate(_)));
    }

    #[test]
    fn force_reapplies_same_version() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                force: true,
                ..request()
            },
            Some("1.0.150"),
            "1.0.150",
        );
        match decision {
            PlanDecision::Apply(plan) => {
                assert_eq!(plan.mode, UpdateMode::ForceApply);
                assert_eq!(plan.comparison, Comparison::Same);
            }
            other => panic!("expected apply, got {other:?}"),
        }
    }

    #[test]
    fn check_only_never_applies() {
        for (current, latest) in [
            (Some("1.0.140"), "1.0.150"),
            (Some("1.0.150"), "1.0.150"),
            (None, "1.0.150"),
        ] {
            let decision = UpdatePlanner::plan(
                &PlanRequest {
                    check_only: true,
                    force: true,
                    update_to_latest: true,
                    ..request()
                },
                current,
                latest,
            );
            assert!(matches!(decision, PlanDecision::ReportOnly(_)));
            assert_eq!(decision.plan().mode, UpdateMode::CheckOnly);
        }
    }

    #[test]
    fn newer_target_applies_with_update_to_latest() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                update_to_latest: true,
                ..request()
            },
            Some("1.0.140"),
            "1.0.150",
        );
        match decision {
            PlanDecision::Apply(plan) => {
                assert_eq!(plan.target_version, "1.0.150");
                assert_eq!(plan.comparison, Comparison::Newer);
                assert_eq!(plan.mode, UpdateMode::Interactive);
            }
            other => panic!("expected apply, got {other:?}"),
        }
    }

    #[test]
    fn newer_target_without_flags_asks_operator() {
        let decision = UpdatePlanner::plan(&request(), Some("1.0.140"), "1.0.150");
        assert!(matches!(
            decision,
            PlanDecision::AskOperator { warning: None, .. }
        ));
    }

    #[test]
    fn explicit_target_overrides_latest() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                target_version: Some("1.0.145".to_string()),
                ..request()
            },
            Some("1.0.140"),
            "1.0.150",
        );
        match decision {
            PlanDecision::Apply(plan) => {
                assert_eq!(plan.target_version, "1.0.145");
                assert_eq!(plan.mode, UpdateMode::ExplicitVersion);
            }
            other => panic!("expected apply, got {other:?}"),
        }
    }

    #[test]
    fn explicit_target_equal_to_current_is_up_to_date() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                target_version: Some("1.0.140".to_string()),
                ..request()
            },
            Some("1.0.140"),
            "1.0.150",
        );
        assert!(matches!(decision, PlanDecision::UpToDate(_)));
    }

    #[test]
    fn current_ahead_of_latest_warns_and_asks() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                update_to_latest: true,
                ..request()
            },
            Some("1.0.151"),
            "1.0.150",
        );
        assert!(matches!(
            decision,
            PlanDecision::AskOperator {
                warning: Some(PlanWarning::CurrentAheadOfTarget),
                ..
            }
        ));
    }

    #[test]
    fn unknown_current_requires_confirmation_or_explicit_target() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                update_to_latest: true,
                ..request()
            },
            None,
            "1.0.150",
        );
        assert!(matches!(
            decision,
            PlanDecision::AskOperator {
                warning: Some(PlanWarning::CurrentUnknown),
                ..
            }
        ));

        let decision = UpdatePlanner::plan(
            &PlanRequest {
                target_version: Some("1.0.150".to_string()),
                ..request()
            },
            None,
            "1.0.150",
        );
        assert!(matches!(decision, PlanDecision::Apply(_)));
    }

    #[test]
    fn force_alone_does_not_confirm_unknown_current() {
        let decision = UpdatePlanner::plan(
            &PlanRequest {
                force: true,
                ..request()
            },
            None,
            "1.0.150",
        );
        assert!(matches!(
            decision,
            PlanDecision::AskOperator {
                warning: Some(PlanWarning::CurrentUnknown),
                ..
            }
        ));
    }
}

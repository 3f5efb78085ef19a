// Update planning - decides whether and to what the manifest gets bumped
//
// - UpdatePlanner: pure decision over flags, pinned version and resolved latest
// - UpdateInteraction: the operator prompts for the cases flags do not settle
pub mod interaction;
pub mod planner;

pub use interaction::{OperatorChoice, StaleBackupAction, UpdateInteraction};
pub use planner::{PlanDecision, PlanRequest, UpdatePlan, UpdatePlanner};

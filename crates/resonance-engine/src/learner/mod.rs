//! Adaptive feedback learner.
//!
//! Consumes externally supplied per-field feedback, adjusts the fields it
//! names, and adapts three global gains from the batch's mean
//! effectiveness:
//!
//! ```text
//! amplitude ← amplitude · (1 + g_perf · (target_perf − performance))
//! entropy   ← entropy − g_coh · (target_coh − coherence)
//! stability ← stability + g_stab · (target_stab − stability)
//! ```
//!
//! Gains grow when the batch is effective and decay when it is not, and
//! always stay within the configured bounds.

mod learner;
#[cfg(test)]
mod tests;
mod types;

pub use learner::AdaptiveFeedbackLearner;
pub use types::{AdaptiveGains, LearnerSnapshot};

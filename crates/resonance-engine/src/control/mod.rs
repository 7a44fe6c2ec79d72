//! Stabilization and emergence controllers.
//!
//! Both controllers own an integrator, refresh metrics after every step,
//! and honor a shared [`CancelFlag`] checked once per iteration. Only one
//! controller should drive a given network at a time; see
//! [`crate::handle::SharedNetwork`].

pub mod cancel;
pub mod emergence;
pub mod stabilization;

pub use cancel::CancelFlag;
pub use emergence::{
    EmergenceController, EmergencePreparation, EmergenceTarget, NoPreparation, TAG_CANCELLED,
};
pub use stabilization::{ControlState, StabilizationController, StabilizationOutcome};

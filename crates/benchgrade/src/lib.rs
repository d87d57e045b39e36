#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use benchgrade_io as io;

#[doc(inline)]
pub use benchgrade_metrics as metrics;

#[doc(inline)]
pub use benchgrade_pose as pose;

#[doc(inline)]
pub use benchgrade_tasks as tasks;

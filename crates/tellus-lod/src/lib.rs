//! Horizon culling against an ellipsoidal body: point visibility tests and
//! conservative culling points summarizing whole point sets.

mod occluder;

pub use occluder::EllipsoidalOccluder;

//! Culling systems for GPU-efficient rendering.
//!
//! Implements frustum culling and occlusion culling to minimize GPU work.

mod frustum;
mod occlusion;

pub use frustum::FrustumCuller;
pub use occlusion::OcclusionCuller;

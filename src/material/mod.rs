//! PBR material model and BRDF evaluation.

pub mod brdf;
mod pbr;

pub use pbr::{AlphaMode, PbrMaterial, SampledMaterial, Workflow};

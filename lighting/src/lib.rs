#![forbid(unsafe_code)]

//! # `tera-lighting`: light propagation for `tera-blockdata` worlds
//!
//! Every cell of a world holds two light values from 0 to 15: sunlight, falling from the sky,
//! and light emitted by luminous blocks. Light fades by one level for every step it takes,
//! except for full sunlight falling straight down through transparent blocks.
//!
//! Lighting happens in three stages:
//!
//!  * `InternalLightProcessor` lights a new chunk on its own.
//!  * `LightPropagator::propagate_out_of_target_chunk` spreads light between that chunk and its
//!    loaded neighbours.
//!  * `LightPropagator::update` and `BulkLightPropagator::process` keep the light current as
//!    blocks change.
//!
//! The propagators work on a `LightingWorldView`, which may be a single chunk or a rectangle of
//! loaded chunks. Cells outside of the view are treated as opaque.

pub mod util;
pub mod rules;
pub mod view;
pub mod queue;
pub mod diamond;
pub mod spread;
pub mod bulk;
pub mod propagator;
pub mod internal;

#[cfg(test)]
mod testkit;

pub use bulk::{BlockChange, BulkLightPropagator};
pub use internal::InternalLightProcessor;
pub use propagator::LightPropagator;
pub use rules::{LightRules, PropagationRules, SunlightRules};
pub use util::{PropagationComparison, MAX_LIGHT};
pub use view::{ChunkView, LightingWorldView, TrackingView, WorldView};

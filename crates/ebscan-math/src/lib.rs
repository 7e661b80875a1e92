//! ebscan math utilities.

pub mod math;

pub use math::gumbel::*;
pub use math::negbin::*;
pub use math::score::*;

//! Core math modules.

pub mod gumbel;
pub mod negbin;
pub mod score;

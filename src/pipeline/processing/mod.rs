// Pipeline stages, in execution order

pub mod normalize;
pub mod extract;
pub mod gap;
pub mod guidance;

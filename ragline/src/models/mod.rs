mod answer;
mod chunk;

pub use answer::*;
pub use chunk::*;

mod solve;

pub use solve::*;

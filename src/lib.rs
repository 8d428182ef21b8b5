mod counter;
pub mod demo;
mod shared;
mod util;

pub use counter::{create, Counter, CounterError};
pub use shared::SharedCounter;
pub use util::OverflowPolicy;

pub mod client;
pub mod contracts;
pub mod executor;
pub mod fetch;
pub mod gate;
pub mod host;
#[cfg(test)]
mod test_utils;

pub use client::*;
pub use contracts::*;
pub use executor::*;
pub use fetch::*;
pub use gate::*;
pub use host::*;

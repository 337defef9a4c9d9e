pub mod types;
pub mod cipher;
pub mod iv;
pub mod digest;

pub use types::*;
pub use cipher::*;
pub use iv::*;
pub use digest::*;

pub mod responder;
pub mod store;

pub use responder::*;
pub use store::*;

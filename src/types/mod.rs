pub mod account;
pub mod auth;
pub mod holding;
pub mod market;
pub mod order;
pub mod squareoff;

pub use account::*;
pub use auth::*;
pub use holding::*;
pub use market::*;
pub use order::*;
pub use squareoff::*;

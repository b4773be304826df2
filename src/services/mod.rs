pub mod auth;
pub mod pnl;
pub mod quotes;
pub mod settlement;
pub mod store;

pub use auth::{AuthError, AuthService};
pub use pnl::ClosePnl;
pub use quotes::{Quote, QuoteCache};
pub use settlement::{SettlementEngine, SettlementError};
pub use store::{SqliteStore, StoreError};

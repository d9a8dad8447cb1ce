pub mod amount;
pub mod balance;
pub mod ids;

pub use amount::Amount;
pub use balance::Balance;
pub use ids::{AccountId, ISSUANCE_ACCOUNT};

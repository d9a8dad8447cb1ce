pub mod client;
pub mod retry;

pub use client::NodeClient;
pub use retry::RetryPolicy;

pub mod controller;
pub mod pending;
pub mod render;

pub use controller::{FetchTicket, RefreshOutcome, ViewController};
pub use pending::{PendingTransfer, PendingTransfers};
pub use render::{display_sender, render_screen, Screen};

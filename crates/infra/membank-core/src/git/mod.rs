pub mod classify;
pub mod oracle;

pub use classify::{CheckoutEvent, Classification, HISTORY_WINDOW, classify_checkout};
pub use oracle::{Git2Oracle, GitOracle};

//! The four wallet tabs. Each view owns its own state and is the boundary where RPC
//! errors turn into display text.
pub mod overview;
pub mod receive;
pub mod send;
pub mod transactions;

pub use overview::OverviewView;
pub use receive::ReceiveView;
pub use send::SendView;
pub use transactions::TransactionsView;

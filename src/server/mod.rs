// Server module entry point
// Listener creation, connection handling, and graceful shutdown

pub mod accept;
pub mod connection;
pub mod listener;
pub mod signal;

// Re-export commonly used items
pub use accept::run_accept_loop;
pub use listener::create_reusable_listener;
pub use signal::{start_signal_handler, SignalHandler};

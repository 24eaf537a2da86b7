//! RCON client domain: connection states, endpoint configuration and the
//! cumulative reconnect budget.

pub mod budget;
pub mod config;
pub mod state;

pub use budget::{
    BudgetVerdict, MAX_RCON_WAIT, RCON_RETRY_DELAY, ReconnectBudget, WaitClock, rounded_secs,
};
pub use config::{DEFAULT_RCON_HOST, RconConfig};
pub use state::RconState;

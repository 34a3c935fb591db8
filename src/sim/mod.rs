//! Simulation layer: mockable time and randomness, the fake payment
//! gateway, the cosmetic live-stats ticker, and the keyword-matching
//! support assistant. None of this talks to a network.

pub mod assistant;
pub mod clock;
pub mod live_stats;
pub mod payment;

pub use clock::{Clock, ManualClock, SystemClock};
pub use live_stats::{LiveStats, StatsTicker, StatsTickerHandle};
pub use payment::{PaymentError, PaymentGateway, PaymentReceipt};

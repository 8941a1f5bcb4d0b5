//! Model-View-Intent primitives shared by the client state machines.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! The form pipeline and the mutation coordinator both keep their
//! lifecycle as a state value that only a reducer may advance; async work
//! (network calls, timers) lives outside the reducer and reports back by
//! dispatching an intent.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::ViewState;

//! Form validation and submission pipeline.
//!
//! ```text
//! editing ──submit──→ validate ──errors──→ blocked
//!                        │
//!                        └──ok──→ submitting ──→ succeeded (cleared) ──timer──→ editing
//!                                      └──────→ failed (values kept)
//! ```

mod controller;
mod intent;
mod reducer;
mod rules;
mod state;

pub use controller::FormController;
pub use intent::FormIntent;
pub use reducer::FormReducer;
pub use rules::{FieldSpec, FormSchema, FormValues, Rule, ValidationErrors};
pub use state::{FormPhase, FormState};

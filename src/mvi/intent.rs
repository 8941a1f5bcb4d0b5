/// Marker trait for intent objects.
///
/// Intents are either user actions (editing a field, pressing submit) or
/// completions of async work (a request succeeded or failed).
pub trait Intent: Send + 'static {}

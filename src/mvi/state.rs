/// Marker trait for view-facing state.
///
/// States are cloned out to views and compared to detect changes.
pub trait ViewState: Clone + PartialEq + Default + Send + 'static {}

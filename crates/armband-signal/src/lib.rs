pub mod quantize;
pub mod tracker;
pub mod types;

pub use quantize::{quantize, TICKS_PER_RANGE};
pub use tracker::SignalTracker;
pub use types::*;

/// Receiver for derived axis values (the control-mapping layer).
pub trait AxisSink: Send {
    fn report(&mut self, axis: Axis, value: i32);
}

impl<F> AxisSink for F
where
    F: FnMut(Axis, i32) + Send,
{
    fn report(&mut self, axis: Axis, value: i32) {
        self(axis, value)
    }
}

/// Requests the tracker issues back to the armband.
pub trait DeviceControl {
    fn request_unlock(&mut self, mode: UnlockMode);
    fn notify_user_action(&mut self);
}

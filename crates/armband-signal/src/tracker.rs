use crate::quantize::quantize;
use crate::types::{
    Arm, Attachment, Axis, AxisValue, EventKind, OrientationTicks, Pose, SensorEvent, UnlockMode,
};
use crate::{AxisSink, DeviceControl};
use glam::Quat;
use std::fmt::Write as _;

/// Everything learned from the armband's event stream.
///
/// Reset as a unit on unpair; the default value is also the state before any
/// event has been seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DeviceState {
    ticks: OrientationTicks,
    attachment: Attachment,
    unlocked: bool,
    pose: Pose,
}

/// Tracks armband state from sensor events and derives control axes from it.
///
/// Event handlers only update state. Axis values are produced by [`emit`],
/// which the owner calls on its own sampling cadence.
///
/// [`emit`]: SignalTracker::emit
pub struct SignalTracker {
    state: DeviceState,
    sink: Option<Box<dyn AxisSink>>,
    debug_enabled: bool,
}

impl SignalTracker {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            state: DeviceState::default(),
            sink: None,
            debug_enabled,
        }
    }

    /// Install the sink that receives emitted axis values.
    pub fn start(&mut self, sink: Box<dyn AxisSink>) {
        self.sink = Some(sink);
    }

    /// Remove the sink. Later `emit` calls still derive but dispatch nothing.
    pub fn finish(&mut self) {
        self.sink = None;
    }

    pub fn is_started(&self) -> bool {
        self.sink.is_some()
    }

    pub fn ticks(&self) -> OrientationTicks {
        self.state.ticks
    }

    pub fn attachment(&self) -> Attachment {
        self.state.attachment
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.unlocked
    }

    pub fn pose(&self) -> Pose {
        self.state.pose
    }

    /// Route a transport event to the matching handler.
    pub fn handle(&mut self, event: &SensorEvent, device: &mut dyn DeviceControl) {
        tracing::trace!(timestamp = event.timestamp, kind = ?event.kind, "Sensor event");
        match event.kind {
            EventKind::Unpair => self.on_unpair(),
            EventKind::Orientation(quat) => self.on_orientation(quat),
            EventKind::Pose(pose) => self.on_pose(pose, device),
            EventKind::ArmSync { arm, .. } => self.on_arm_sync(arm),
            EventKind::ArmUnsync => self.on_arm_unsync(),
            EventKind::Unlock => self.on_unlock(),
            EventKind::Lock => self.on_lock(),
        }
    }

    pub fn on_unpair(&mut self) {
        self.state = DeviceState::default();
        tracing::info!("Armband unpaired, state reset");
    }

    pub fn on_orientation(&mut self, quat: Quat) {
        self.state.ticks = quantize(quat);
    }

    /// Store the new pose and ask the device to stay unlocked while a gesture
    /// is held.
    pub fn on_pose(&mut self, pose: Pose, device: &mut dyn DeviceControl) {
        self.state.pose = pose;
        if pose.is_gesture() {
            device.request_unlock(UnlockMode::Hold);
            device.notify_user_action();
        } else {
            device.request_unlock(UnlockMode::Timed);
        }
        tracing::debug!(%pose, "Pose changed");
    }

    pub fn on_arm_sync(&mut self, arm: Arm) {
        self.state.attachment = Attachment::OnArm(arm);
        tracing::info!(?arm, "Armband synced");
    }

    pub fn on_arm_unsync(&mut self) {
        self.state.attachment = Attachment::Detached;
        tracing::info!("Armband unsynced");
    }

    pub fn on_unlock(&mut self) {
        self.state.unlocked = true;
    }

    pub fn on_lock(&mut self) {
        self.state.unlocked = false;
    }

    /// Derive the current axis values in emission order.
    ///
    /// Only the inactive signal is produced unless the armband is both worn
    /// and unlocked.
    pub fn derive_axes(&self) -> Vec<AxisValue> {
        let DeviceState {
            ticks,
            attachment,
            unlocked,
            pose,
        } = self.state;

        let arm = match attachment {
            Attachment::OnArm(arm) if unlocked => arm,
            _ => return vec![AxisValue::INACTIVE],
        };

        let mut axes = Vec::with_capacity(11);
        axes.push(AxisValue::new(Axis::Locked, 0));
        axes.push(AxisValue::new(Axis::LeftOrRight, wave_direction(pose, arm)));
        axes.push(AxisValue::new(
            Axis::DoubleTap,
            i32::from(pose == Pose::DoubleTap),
        ));

        if pose == Pose::Fist {
            axes.push(AxisValue::new(Axis::Fist, 1));
            axes.push(AxisValue::new(Axis::FistPitchAngle, ticks.pitch));
            axes.push(AxisValue::new(Axis::FistRollAngle, ticks.roll));
            axes.push(AxisValue::new(Axis::FistYawAngle, ticks.yaw));
        } else {
            axes.push(AxisValue::new(Axis::Fist, 0));
        }

        if pose == Pose::FingersSpread {
            axes.push(AxisValue::new(Axis::FingersSpread, 1));
            axes.push(AxisValue::new(Axis::FingersSpreadPitchAngle, ticks.pitch));
            axes.push(AxisValue::new(Axis::FingersSpreadRollAngle, ticks.roll));
            axes.push(AxisValue::new(Axis::FingersSpreadYawAngle, ticks.yaw));
        } else {
            axes.push(AxisValue::new(Axis::FingersSpread, 0));
        }

        axes
    }

    /// Derive axis values and send each one to the installed sink.
    ///
    /// Returns the number of values dispatched.
    pub fn emit(&mut self) -> usize {
        if self.debug_enabled {
            tracing::info!("{}", self.status_line());
        }

        let axes = self.derive_axes();
        let Some(sink) = self.sink.as_mut() else {
            return 0;
        };
        for AxisValue { axis, value } in &axes {
            sink.report(*axis, *value);
        }
        axes.len()
    }

    /// Human-readable summary of the tracked state.
    pub fn status_line(&self) -> String {
        let DeviceState {
            ticks,
            attachment,
            unlocked,
            pose,
        } = self.state;

        let mut line = format!(
            "roll: {} pitch: {} yaw: {}",
            ticks.roll, ticks.pitch, ticks.yaw
        );
        if let Attachment::OnArm(arm) = attachment {
            let side = match arm {
                Arm::Left => "L",
                Arm::Right => "R",
            };
            let lock = if unlocked { "unlocked" } else { "locked  " };
            let _ = write!(line, " {lock} {side} {pose}");
        }
        line
    }
}

/// Wave direction in the wearer's frame: -1 leftward, +1 rightward, whichever arm.
fn wave_direction(pose: Pose, arm: Arm) -> i32 {
    match (pose, arm) {
        (Pose::WaveOut, Arm::Left) | (Pose::WaveIn, Arm::Right) => -1,
        (Pose::WaveIn, Arm::Left) | (Pose::WaveOut, Arm::Right) => 1,
        _ => 0,
    }
}

impl Default for SignalTracker {
    fn default() -> Self {
        Self::new(false)
    }
}

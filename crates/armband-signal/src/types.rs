use glam::Quat;
use std::fmt;

/// Discrete hand gesture reported by the armband's onboard classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Pose {
    Rest,
    Fist,
    WaveIn,
    WaveOut,
    FingersSpread,
    DoubleTap,
    #[default]
    Unknown,
}

impl Pose {
    /// Whether this pose is an actual gesture (not rest or unclassified).
    pub fn is_gesture(self) -> bool {
        !matches!(self, Pose::Rest | Pose::Unknown)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pose::Rest => "rest",
            Pose::Fist => "fist",
            Pose::WaveIn => "waveIn",
            Pose::WaveOut => "waveOut",
            Pose::FingersSpread => "fingersSpread",
            Pose::DoubleTap => "doubleTap",
            Pose::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Forearm the armband is worn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arm {
    Left,
    Right,
}

/// Which way the armband's +x axis points along the forearm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XDirection {
    TowardWrist,
    TowardElbow,
    Unknown,
}

/// Muscle warmup state reported at sync time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupState {
    Unknown,
    Cold,
    Warm,
}

/// How long an unlock requested from the device should last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockMode {
    /// Relock automatically after a short period.
    Timed,
    /// Stay unlocked until explicitly locked.
    Hold,
}

/// Whether the armband is currently worn, and on which side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attachment {
    #[default]
    Detached,
    OnArm(Arm),
}

impl Attachment {
    pub fn arm(self) -> Option<Arm> {
        match self {
            Attachment::Detached => None,
            Attachment::OnArm(arm) => Some(arm),
        }
    }
}

/// Discretized Euler angles, each in `0..TICKS_PER_RANGE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrientationTicks {
    pub roll: i32,
    pub pitch: i32,
    pub yaw: i32,
}

/// Event delivered by the sensor transport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    /// Device timestamp in microseconds. Not used by the tracking logic.
    pub timestamp: u64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    Unpair,
    Orientation(Quat),
    Pose(Pose),
    ArmSync {
        arm: Arm,
        x_direction: XDirection,
        rotation: f32,
        warmup: WarmupState,
    },
    ArmUnsync,
    Unlock,
    Lock,
}

/// Output axis understood by the control-mapping layer.
///
/// Discriminants are the numeric axis ids seen by consumers. `Locked` keeps
/// id 5 so that `(5, 1)` remains the "inactive" signal: consumers see
/// `(5, 0)` while the armband is active and `(5, 1)` while it is inactive,
/// both on the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    LeftOrRight = 0,
    DoubleTap = 1,
    Fist = 2,
    FistPitchAngle = 3,
    FistRollAngle = 4,
    Locked = 5,
    FistYawAngle = 6,
    FingersSpread = 7,
    FingersSpreadPitchAngle = 8,
    FingersSpreadRollAngle = 9,
    FingersSpreadYawAngle = 10,
}

impl Axis {
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// A single derived axis reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisValue {
    pub axis: Axis,
    pub value: i32,
}

impl AxisValue {
    /// Reported alone when the armband is not worn or is locked.
    pub const INACTIVE: AxisValue = AxisValue::new(Axis::Locked, 1);

    pub const fn new(axis: Axis, value: i32) -> Self {
        Self { axis, value }
    }
}

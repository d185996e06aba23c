use armband_signal::{Arm, EventKind, Pose, SensorEvent, UnlockMode, WarmupState, XDirection};
use glam::Quat;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Longest event line accepted before the buffer is discarded.
const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed event line: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Event line exceeds 64 KiB without a newline")]
    LineTooLong,
}

/// Request sent back to the armband bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    Unlock(UnlockMode),
    NotifyUserAction,
}

// Wire representation. Names follow the vendor SDK so bridges can forward
// its enums verbatim; everything is mapped onto local types on the way in.

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum WireEvent {
    Unpair {
        timestamp: u64,
    },
    Orientation {
        timestamp: u64,
        w: f32,
        x: f32,
        y: f32,
        z: f32,
    },
    Pose {
        timestamp: u64,
        pose: WirePose,
    },
    ArmSync {
        timestamp: u64,
        arm: WireArm,
        #[serde(rename = "xDirection", default)]
        x_direction: WireXDirection,
        #[serde(default)]
        rotation: f32,
        #[serde(rename = "warmupState", default)]
        warmup: WireWarmup,
    },
    ArmUnsync {
        timestamp: u64,
    },
    Unlock {
        timestamp: u64,
    },
    Lock {
        timestamp: u64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WirePose {
    Rest,
    Fist,
    WaveIn,
    WaveOut,
    FingersSpread,
    DoubleTap,
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireArm {
    Left,
    Right,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireXDirection {
    TowardWrist,
    TowardElbow,
    #[default]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireWarmup {
    #[default]
    Unknown,
    Cold,
    Warm,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
enum WireCommand {
    Unlock { mode: WireUnlockMode },
    NotifyUserAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum WireUnlockMode {
    Timed,
    Hold,
}

impl From<WirePose> for Pose {
    fn from(pose: WirePose) -> Self {
        match pose {
            WirePose::Rest => Pose::Rest,
            WirePose::Fist => Pose::Fist,
            WirePose::WaveIn => Pose::WaveIn,
            WirePose::WaveOut => Pose::WaveOut,
            WirePose::FingersSpread => Pose::FingersSpread,
            WirePose::DoubleTap => Pose::DoubleTap,
            WirePose::Unknown => Pose::Unknown,
        }
    }
}

impl From<WireArm> for Arm {
    fn from(arm: WireArm) -> Self {
        match arm {
            WireArm::Left => Arm::Left,
            WireArm::Right => Arm::Right,
        }
    }
}

impl From<WireXDirection> for XDirection {
    fn from(dir: WireXDirection) -> Self {
        match dir {
            WireXDirection::TowardWrist => XDirection::TowardWrist,
            WireXDirection::TowardElbow => XDirection::TowardElbow,
            WireXDirection::Unknown => XDirection::Unknown,
        }
    }
}

impl From<WireWarmup> for WarmupState {
    fn from(warmup: WireWarmup) -> Self {
        match warmup {
            WireWarmup::Unknown => WarmupState::Unknown,
            WireWarmup::Cold => WarmupState::Cold,
            WireWarmup::Warm => WarmupState::Warm,
        }
    }
}

impl From<WireEvent> for SensorEvent {
    fn from(event: WireEvent) -> Self {
        let (timestamp, kind) = match event {
            WireEvent::Unpair { timestamp } => (timestamp, EventKind::Unpair),
            WireEvent::Orientation { timestamp, w, x, y, z } => {
                (timestamp, EventKind::Orientation(Quat::from_xyzw(x, y, z, w)))
            }
            WireEvent::Pose { timestamp, pose } => (timestamp, EventKind::Pose(pose.into())),
            WireEvent::ArmSync {
                timestamp,
                arm,
                x_direction,
                rotation,
                warmup,
            } => (
                timestamp,
                EventKind::ArmSync {
                    arm: arm.into(),
                    x_direction: x_direction.into(),
                    rotation,
                    warmup: warmup.into(),
                },
            ),
            WireEvent::ArmUnsync { timestamp } => (timestamp, EventKind::ArmUnsync),
            WireEvent::Unlock { timestamp } => (timestamp, EventKind::Unlock),
            WireEvent::Lock { timestamp } => (timestamp, EventKind::Lock),
        };
        SensorEvent { timestamp, kind }
    }
}

/// Streaming parser for the newline-delimited JSON event stream.
///
/// Feed raw bytes via `push_data`, then drain parsed events via `next_event`.
pub struct EventParser {
    buffer: VecDeque<u8>,
}

impl EventParser {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(4096),
        }
    }

    pub fn push_data(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Try to extract the next complete event from the buffer.
    /// Returns `None` if no complete line is available yet.
    pub fn next_event(&mut self) -> Option<Result<SensorEvent, ProtocolError>> {
        loop {
            let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
                if self.buffer.len() > MAX_LINE_LEN {
                    self.buffer.clear();
                    return Some(Err(ProtocolError::LineTooLong));
                }
                return None;
            };

            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(parse_line(line));
        }
    }
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_line(line: &str) -> Result<SensorEvent, ProtocolError> {
    let event: WireEvent = serde_json::from_str(line)?;
    Ok(event.into())
}

/// Encode a command as a single newline-terminated JSON line.
pub fn encode_command(command: &DeviceCommand) -> Result<Vec<u8>, ProtocolError> {
    let wire = match command {
        DeviceCommand::Unlock(UnlockMode::Timed) => WireCommand::Unlock {
            mode: WireUnlockMode::Timed,
        },
        DeviceCommand::Unlock(UnlockMode::Hold) => WireCommand::Unlock {
            mode: WireUnlockMode::Hold,
        },
        DeviceCommand::NotifyUserAction => WireCommand::NotifyUserAction,
    };
    let mut line = serde_json::to_vec(&wire)?;
    line.push(b'\n');
    Ok(line)
}

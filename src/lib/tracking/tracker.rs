// Vision-side control loop: detections -> target -> PID -> clamped angles -> frame on the link.

use crate::controller::angles::AngleState;
use crate::controller::pid::AxisPid;
use crate::controller::pid_params::{PidGains, PAN_GAINS, TILT_GAINS};
use crate::protocol::frame::{encode, FRAME_LEN};
use crate::tracking::target::{
    select, DetectionBox, Selection, Target, TargetPoint, TargetStatus, FRAME_HEIGHT, FRAME_WIDTH,
};
use core::fmt;
use embedded_hal::serial;

// tilt nudge sent when tracking is (re)started, lifts the camera by 10 deg
pub const START_TILT_NUDGE_DEG: i32 = -10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    pub setpoint: TargetPoint,
    pub pan_gains: PidGains,
    pub tilt_gains: PidGains,
    pub initial_angles: AngleState,
}

impl Default for TrackerConfig {
    fn default() -> TrackerConfig {
        TrackerConfig {
            setpoint: TargetPoint {
                x: FRAME_WIDTH / 2,
                y: FRAME_HEIGHT / 2,
            },
            pan_gains: PAN_GAINS,
            tilt_gains: TILT_GAINS,
            initial_angles: AngleState::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteCommand {
    Start,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Paused,
    NoTarget,
    Sent { target: Target, angles: AngleState },
}

impl CycleOutcome {
    pub fn status(&self) -> TargetStatus {
        match self {
            CycleOutcome::Sent { target, .. } => target.status,
            _ => TargetStatus::Lost,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackError<E> {
    // `sent` bytes of the frame made it onto the link before `error`
    Transmit { sent: usize, error: E },
}

impl<E: fmt::Debug> fmt::Display for TrackError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::Transmit { sent, error } => write!(
                f,
                "link send failed after {}/{} bytes: {:?}",
                sent, FRAME_LEN, error
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub cycles: u32,
    pub no_target: u32,
    pub frames_sent: u32,
    pub send_failures: u32,
}

pub fn transmit<L>(link: &mut L, frame: &[u8; FRAME_LEN]) -> Result<(), TrackError<L::Error>>
where
    L: serial::Write<u8>,
{
    for (sent, &byte) in frame.iter().enumerate() {
        nb::block!(link.write(byte)).map_err(|error| TrackError::Transmit { sent, error })?;
    }
    nb::block!(link.flush()).map_err(|error| TrackError::Transmit {
        sent: FRAME_LEN,
        error,
    })
}

/// Producer half of the gimbal loop, run once per inference cycle.
///
/// Owns both axis controllers and the last commanded angles. Neither the
/// PID state nor the angles are shared; only the encoded frame leaves
/// through the link.
pub struct Tracker {
    config: TrackerConfig,
    pan_pid: AxisPid,
    tilt_pid: AxisPid,
    angles: AngleState,
    enabled: bool,
    stats: TrackerStats,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Tracker {
        Tracker {
            config,
            pan_pid: AxisPid::new(config.pan_gains),
            tilt_pid: AxisPid::new(config.tilt_gains),
            angles: config.initial_angles,
            enabled: true,
            stats: TrackerStats::default(),
        }
    }

    pub fn angles(&self) -> AngleState {
        self.angles
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pids(&self) -> (&AxisPid, &AxisPid) {
        (&self.pan_pid, &self.tilt_pid)
    }

    // An empty frame or a paused tracker leaves both PIDs untouched and sends nothing.
    pub fn process<L>(
        &mut self,
        boxes: &[DetectionBox],
        link: &mut L,
    ) -> Result<CycleOutcome, TrackError<L::Error>>
    where
        L: serial::Write<u8>,
    {
        self.stats.cycles = self.stats.cycles.wrapping_add(1);
        if !self.enabled {
            return Ok(CycleOutcome::Paused);
        }

        let target = match select(boxes) {
            Selection::NoTarget => {
                self.stats.no_target = self.stats.no_target.wrapping_add(1);
                return Ok(CycleOutcome::NoTarget);
            }
            Selection::Locked(target) => target,
        };

        let delta_x = self
            .pan_pid
            .calculate(self.config.setpoint.x, target.point.x);
        let delta_y = self
            .tilt_pid
            .calculate(self.config.setpoint.y, target.point.y);
        self.angles = self.angles.apply_delta(delta_x, delta_y);

        self.send_angles(link)?;
        Ok(CycleOutcome::Sent {
            target,
            angles: self.angles,
        })
    }

    pub fn handle_command<L>(
        &mut self,
        command: RemoteCommand,
        link: &mut L,
    ) -> Result<(), TrackError<L::Error>>
    where
        L: serial::Write<u8>,
    {
        match command {
            RemoteCommand::Start => {
                self.enabled = true;
                self.nudge_tilt(START_TILT_NUDGE_DEG, link)
            }
            RemoteCommand::Stop => {
                self.enabled = false;
                Ok(())
            }
        }
    }

    // same sign convention as the tilt PID: a negative delta raises the camera
    pub fn nudge_tilt<L>(&mut self, delta: i32, link: &mut L) -> Result<(), TrackError<L::Error>>
    where
        L: serial::Write<u8>,
    {
        self.angles = self.angles.apply_delta(0, delta);
        self.send_angles(link)
    }

    fn send_angles<L>(&mut self, link: &mut L) -> Result<(), TrackError<L::Error>>
    where
        L: serial::Write<u8>,
    {
        let frame = encode(self.angles.pan(), self.angles.tilt());
        match transmit(link, &frame) {
            Ok(()) => {
                self.stats.frames_sent = self.stats.frames_sent.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                Err(e)
            }
        }
    }
}

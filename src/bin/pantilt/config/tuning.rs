use pantilt::controller::actuator::ServoChannel;
use pantilt::controller::angles::{AngleState, PAN_LIMITS, TILT_LIMITS};

// pan: 270 deg servo, tilt: 180 deg servo
pub const PAN_SERVO: ServoChannel = ServoChannel {
    range_deg: 270,
    limits: PAN_LIMITS,
};
pub const TILT_SERVO: ServoChannel = ServoChannel {
    range_deg: 180,
    limits: TILT_LIMITS,
};

pub const START_PAN_DEG: u8 = 90;
pub const START_TILT_DEG: u8 = 140;

pub fn start_angles() -> AngleState {
    AngleState::new(START_PAN_DEG, START_TILT_DEG)
}

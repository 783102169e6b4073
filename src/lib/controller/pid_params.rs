#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

// tuned on the reference mount with a 640x384 detection frame
pub const PAN_GAINS: PidGains = PidGains {
    kp: 0.0165,
    ki: 0.037,
    kd: 0.035,
};
pub const TILT_GAINS: PidGains = PidGains {
    kp: 0.014,
    ki: 0.037,
    kd: 0.035,
};

// anti-windup bound on the raw error accumulator, independent of the gains
pub const INTEGRAL_LIMIT: i32 = 10;

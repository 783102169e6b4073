use crate::controller::pid_params::{PidGains, INTEGRAL_LIMIT};
use libm::roundf;
use num_traits::clamp;

/// Integer PID for one gimbal axis.
///
/// Converts a pixel error into an angle delta. The integral accumulates the
/// raw error and saturates at `INTEGRAL_LIMIT`, the derivative is taken on
/// the error (not the measurement) so the first call after a reset sees the
/// full error as derivative.
#[derive(Clone, Copy, Debug)]
pub struct AxisPid {
    gains: PidGains,
    integral: i32,
    last_error: i32,
}

impl AxisPid {
    pub fn new(gains: PidGains) -> AxisPid {
        AxisPid {
            gains,
            integral: 0,
            last_error: 0,
        }
    }

    pub fn calculate(&mut self, setpoint: i32, feedback: i32) -> i32 {
        let error = setpoint - feedback;

        self.integral = clamp(
            self.integral.saturating_add(error),
            -INTEGRAL_LIMIT,
            INTEGRAL_LIMIT,
        );
        let derivative = error - self.last_error;

        let output = self.gains.kp * error as f32
            + self.gains.ki * self.integral as f32
            + self.gains.kd * derivative as f32;

        self.last_error = error;
        // roundf rounds half away from zero, float to int casts saturate
        roundf(output) as i32
    }

    pub fn reset(&mut self) {
        self.integral = 0;
        self.last_error = 0;
    }

    pub fn integral(&self) -> i32 {
        self.integral
    }

    pub fn last_error(&self) -> i32 {
        self.last_error
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }
}

use crate::controller::angles::{AngleState, AxisLimits, PAN_LIMITS, TILT_LIMITS};
use crate::drivers::servo::pwm_servo::{pulse_width_us, ServoOutput};

// mechanical span of each servo on the reference mount
pub const PAN_RANGE_DEG: u16 = 270;
pub const TILT_RANGE_DEG: u16 = 180;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Pan,
    Tilt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServoChannel {
    pub range_deg: u16,
    pub limits: AxisLimits,
}

pub const PAN_CHANNEL: ServoChannel = ServoChannel {
    range_deg: PAN_RANGE_DEG,
    limits: PAN_LIMITS,
};
pub const TILT_CHANNEL: ServoChannel = ServoChannel {
    range_deg: TILT_RANGE_DEG,
    limits: TILT_LIMITS,
};

impl ServoChannel {
    // AngleState is already clamped, this guards the output stage on its own
    pub fn pulse_for(&self, angle: u8) -> u32 {
        pulse_width_us(self.limits.clamp(angle as i32), self.range_deg)
    }
}

/// Drives the pan and tilt servos from snapshots of the commanded angles.
///
/// The actuator never holds on to an `AngleState`: each call is given the
/// current snapshot, so it is decoupled from how often new angles arrive.
/// `service_next` alternates between the axes, so calling it every half
/// period refreshes each servo once per period with the two staggered.
pub struct Actuator<PAN, TILT> {
    pan: PAN,
    tilt: TILT,
    pan_channel: ServoChannel,
    tilt_channel: ServoChannel,
    next: Axis,
}

impl<PAN, TILT> Actuator<PAN, TILT>
where
    PAN: ServoOutput,
    TILT: ServoOutput,
{
    pub fn new(pan: PAN, tilt: TILT) -> Actuator<PAN, TILT> {
        Actuator::with_channels(pan, tilt, PAN_CHANNEL, TILT_CHANNEL)
    }

    pub fn with_channels(
        pan: PAN,
        tilt: TILT,
        pan_channel: ServoChannel,
        tilt_channel: ServoChannel,
    ) -> Actuator<PAN, TILT> {
        Actuator {
            pan,
            tilt,
            pan_channel,
            tilt_channel,
            next: Axis::Pan,
        }
    }

    pub fn service_next(&mut self, angles: AngleState) -> Axis {
        let serviced = self.next;
        match serviced {
            Axis::Pan => {
                self.pan.write_pulse(self.pan_channel.pulse_for(angles.pan()));
                self.next = Axis::Tilt;
            }
            Axis::Tilt => {
                self.tilt
                    .write_pulse(self.tilt_channel.pulse_for(angles.tilt()));
                self.next = Axis::Pan;
            }
        }
        serviced
    }

    pub fn refresh_all(&mut self, angles: AngleState) {
        self.pan.write_pulse(self.pan_channel.pulse_for(angles.pan()));
        self.tilt
            .write_pulse(self.tilt_channel.pulse_for(angles.tilt()));
    }

    pub fn outputs(&mut self) -> (&mut PAN, &mut TILT) {
        (&mut self.pan, &mut self.tilt)
    }
}

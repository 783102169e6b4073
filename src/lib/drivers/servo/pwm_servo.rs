use embedded_hal::PwmPin;

// 50 Hz servo refresh
pub const PERIOD_US: u32 = 20_000;
pub const MIN_PULSE_US: u32 = 500;
pub const PULSE_SPAN_US: u32 = 2000;

/*
Helper Function
input: angle in degrees, range = mechanical span of the servo in degrees
out: high time in us, 500 (0 deg) to 2500 (range deg)
Description: angles past the span are pinned to the span
*/
pub fn pulse_width_us(angle: u8, range_deg: u16) -> u32 {
    let range = range_deg.max(1) as u32;
    let angle = (angle as u32).min(range);
    MIN_PULSE_US + angle * PULSE_SPAN_US / range
}

pub trait ServoOutput {
    fn write_pulse(&mut self, high_time_us: u32);
}

// Servo on a hardware timer channel already running at PERIOD_US.
pub struct PwmServo<P> {
    pwm: P,
}

impl<P> PwmServo<P>
where
    P: PwmPin<Duty = u16>,
{
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn start(&mut self) {
        self.pwm.set_duty(0);
        self.pwm.enable();
    }

    pub fn stop(&mut self) {
        self.pwm.disable();
    }

    pub fn duty_for(&self, high_time_us: u32) -> u16 {
        let max_duty = self.pwm.get_max_duty() as u32;
        let high_time_us = high_time_us.min(PERIOD_US);
        (max_duty * high_time_us / PERIOD_US) as u16
    }
}

impl<P> ServoOutput for PwmServo<P>
where
    P: PwmPin<Duty = u16>,
{
    fn write_pulse(&mut self, high_time_us: u32) {
        let duty = self.duty_for(high_time_us);
        self.pwm.set_duty(duty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeChannel {
        enabled: bool,
        duty: u16,
        max: u16,
    }

    impl PwmPin for FakeChannel {
        type Duty = u16;

        fn disable(&mut self) {
            self.enabled = false;
        }
        fn enable(&mut self) {
            self.enabled = true;
        }
        fn get_duty(&self) -> Self::Duty {
            self.duty
        }
        fn get_max_duty(&self) -> Self::Duty {
            self.max
        }
        fn set_duty(&mut self, duty: Self::Duty) {
            self.duty = duty;
        }
    }

    fn channel(max: u16) -> FakeChannel {
        FakeChannel {
            enabled: false,
            duty: 7,
            max,
        }
    }

    #[test]
    fn pulse_width_spans_half_to_two_and_a_half_ms() {
        assert_eq!(pulse_width_us(0, 180), 500);
        assert_eq!(pulse_width_us(90, 180), 1500);
        assert_eq!(pulse_width_us(180, 180), 2500);
        assert_eq!(pulse_width_us(90, 270), 1166);
        assert_eq!(pulse_width_us(140, 180), 2055);
    }

    #[test]
    fn pulse_width_pins_angles_past_the_span() {
        assert_eq!(pulse_width_us(255, 180), 2500);
        assert_eq!(pulse_width_us(10, 0), 2500);
    }

    #[test]
    fn start_enables_with_no_pulse() {
        let mut servo = PwmServo::new(channel(20_000));
        servo.start();
        assert!(servo.pwm.enabled);
        assert_eq!(servo.pwm.duty, 0);
        servo.stop();
        assert!(!servo.pwm.enabled);
    }

    #[test]
    fn duty_scales_with_timer_resolution() {
        let mut servo = PwmServo::new(channel(20_000));
        servo.write_pulse(1500);
        assert_eq!(servo.pwm.duty, 1500);

        let mut servo = PwmServo::new(channel(60_000));
        servo.write_pulse(500);
        assert_eq!(servo.pwm.duty, 1500);
        servo.write_pulse(50_000);
        assert_eq!(servo.pwm.duty, 60_000);
    }
}

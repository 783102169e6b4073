use crate::drivers::servo::pwm_servo::{ServoOutput, PERIOD_US};
use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

// Servo on a plain GPIO pin. Only the high phase is busy-waited; the caller's
// scheduler owns the low phase of the period.
pub struct GpioServo<PIN, DELAY> {
    pin: PIN,
    delay: DELAY,
}

impl<PIN, DELAY> GpioServo<PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayUs<u32>,
{
    pub fn new(mut pin: PIN, delay: DELAY) -> Self {
        let _ = pin.set_low();
        Self { pin, delay }
    }

    pub fn release(self) -> (PIN, DELAY) {
        (self.pin, self.delay)
    }
}

impl<PIN, DELAY> ServoOutput for GpioServo<PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayUs<u32>,
{
    fn write_pulse(&mut self, high_time_us: u32) {
        if self.pin.set_high().is_err() {
            return;
        }
        self.delay.delay_us(high_time_us.min(PERIOD_US));
        let _ = self.pin.set_low();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Step {
        High,
        Low,
        Wait(u32),
    }

    type Trace = Rc<RefCell<Vec<Step>>>;

    struct TracePin(Trace);
    struct TraceDelay(Trace);

    impl OutputPin for TracePin {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Step::Low);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Step::High);
            Ok(())
        }
    }

    impl DelayUs<u32> for TraceDelay {
        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Step::Wait(us));
        }
    }

    struct StuckPin;

    impl OutputPin for StuckPin {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            Err(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            Err(())
        }
    }

    #[test]
    fn emits_high_for_pulse_width_then_low() {
        let trace: Trace = Rc::default();
        let mut servo = GpioServo::new(TracePin(trace.clone()), TraceDelay(trace.clone()));
        servo.write_pulse(1500);
        assert_eq!(
            *trace.borrow(),
            vec![Step::Low, Step::High, Step::Wait(1500), Step::Low]
        );
    }

    #[test]
    fn never_holds_high_past_one_period() {
        let trace: Trace = Rc::default();
        let mut servo = GpioServo::new(TracePin(trace.clone()), TraceDelay(trace.clone()));
        servo.write_pulse(90_000);
        assert!(trace.borrow().contains(&Step::Wait(PERIOD_US)));
    }

    #[test]
    fn failed_pin_skips_the_wait() {
        let trace: Trace = Rc::default();
        let mut servo = GpioServo::new(StuckPin, TraceDelay(trace.clone()));
        servo.write_pulse(1500);
        assert!(trace.borrow().is_empty());
        let (_pin, _delay) = servo.release();
    }
}

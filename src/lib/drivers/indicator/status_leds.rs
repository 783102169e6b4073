use crate::tracking::target::TargetStatus;
use embedded_hal::digital::v2::OutputPin;

// LED1 lit: one hand locked, LED2 lit: two hands averaged, both dark: nothing tracked
pub struct StatusLeds<L1, L2> {
    single: L1,
    multi: L2,
    status: TargetStatus,
    // false until both pins have taken the pattern for `status`
    synced: bool,
}

impl<L1, L2> StatusLeds<L1, L2>
where
    L1: OutputPin,
    L2: OutputPin,
{
    pub fn new(single: L1, multi: L2) -> Self {
        let mut leds = Self {
            single,
            multi,
            status: TargetStatus::Lost,
            synced: false,
        };
        leds.apply(TargetStatus::Lost);
        leds
    }

    pub fn show(&mut self, status: TargetStatus) {
        if status != self.status || !self.synced {
            self.apply(status);
        }
    }

    pub fn status(&self) -> TargetStatus {
        self.status
    }

    fn apply(&mut self, status: TargetStatus) {
        let (single_on, multi_on) = match status {
            TargetStatus::Lost => (false, false),
            TargetStatus::Single => (true, false),
            TargetStatus::Multi => (false, true),
        };
        let single_ok = set(&mut self.single, single_on).is_ok();
        let multi_ok = set(&mut self.multi, multi_on).is_ok();
        self.status = status;
        self.synced = single_ok && multi_ok;
    }
}

fn set<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), P::Error> {
    if on {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Led {
        lit: Rc<Cell<bool>>,
        writes: Rc<Cell<u32>>,
    }

    impl OutputPin for Led {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.lit.set(false);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.lit.set(true);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn maps_each_status_to_one_pattern() {
        let (l1, l2) = (Led::default(), Led::default());
        let mut leds = StatusLeds::new(l1.clone(), l2.clone());
        assert_eq!((l1.lit.get(), l2.lit.get()), (false, false));

        leds.show(TargetStatus::Single);
        assert_eq!((l1.lit.get(), l2.lit.get()), (true, false));

        leds.show(TargetStatus::Multi);
        assert_eq!((l1.lit.get(), l2.lit.get()), (false, true));

        leds.show(TargetStatus::Lost);
        assert_eq!((l1.lit.get(), l2.lit.get()), (false, false));
        assert_eq!(leds.status(), TargetStatus::Lost);
    }

    #[test]
    fn unchanged_status_does_not_touch_pins() {
        let (l1, l2) = (Led::default(), Led::default());
        let mut leds = StatusLeds::new(l1.clone(), l2.clone());
        leds.show(TargetStatus::Single);
        let writes = l1.writes.get();
        leds.show(TargetStatus::Single);
        assert_eq!(l1.writes.get(), writes);
    }

    // fails the first `failures` writes, then behaves
    struct FlakyLed {
        failures: u32,
        lit: Rc<Cell<bool>>,
    }

    impl FlakyLed {
        fn write(&mut self, on: bool) -> Result<(), ()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(());
            }
            self.lit.set(on);
            Ok(())
        }
    }

    impl OutputPin for FlakyLed {
        type Error = ();
        fn set_low(&mut self) -> Result<(), ()> {
            self.write(false)
        }
        fn set_high(&mut self) -> Result<(), ()> {
            self.write(true)
        }
    }

    #[test]
    fn failed_write_is_retried_on_next_show() {
        let lit = Rc::new(Cell::new(false));
        let flaky = FlakyLed {
            failures: 2,
            lit: lit.clone(),
        };
        let l2 = Led::default();
        // the initial Lost pattern eats the first failure
        let mut leds = StatusLeds::new(flaky, l2.clone());

        leds.show(TargetStatus::Single);
        assert!(!lit.get());

        // same status again, but the pin never took it
        leds.show(TargetStatus::Single);
        assert!(lit.get());
        assert_eq!(leds.status(), TargetStatus::Single);

        let writes = l2.writes.get();
        leds.show(TargetStatus::Single);
        assert_eq!(l2.writes.get(), writes);
    }
}

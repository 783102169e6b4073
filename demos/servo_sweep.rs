// Bit-banged servo sweep, no timer PWM needed.
// Pan servo signal on PB8, tilt on PB9. Walks both axes across their limits.

#![no_main]
#![no_std]

use core::fmt::Write;
use cortex_m_rt::entry;
use panic_write::PanicHandler;
use stm32f4xx_hal as hal;

use crate::hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};

use pantilt::controller::actuator::Actuator;
use pantilt::controller::angles::{AngleState, PAN_LIMITS, TILT_LIMITS};
use pantilt::drivers::servo::gpio_servo::GpioServo;

const STAGGER_MS: u32 = 10;
// pulses per axis before moving one degree
const PULSES_PER_STEP: u32 = 2;

#[entry]
fn main() -> ! {
    if let (Some(dp), Some(cp)) = (
        pac::Peripherals::take(),
        cortex_m::peripheral::Peripherals::take(),
    ) {
        let gpioa = dp.GPIOA.split();
        let gpiob = dp.GPIOB.split();

        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(48.MHz()).freeze();

        // Set up uart tx
        let tx_pin = gpioa.pa2.into_alternate();
        let serial = Serial::tx(
            dp.USART2,
            tx_pin,
            Config::default()
                .baudrate(115200.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();
        let mut tx = PanicHandler::new(serial);

        let pan = GpioServo::new(gpiob.pb8.into_push_pull_output(), cp.SYST.delay(&clocks));
        let tilt = GpioServo::new(gpiob.pb9.into_push_pull_output(), dp.TIM5.delay_us(&clocks));
        let mut actuator = Actuator::new(pan, tilt);
        let mut pacing = dp.TIM2.delay_ms(&clocks);

        writeln!(tx, "servo sweep\r").unwrap();

        let mut angles = AngleState::default();
        let mut pan_step: i32 = 1;
        let mut tilt_step: i32 = 1;
        loop {
            for _ in 0..PULSES_PER_STEP {
                // pan and tilt, STAGGER_MS apart
                for _ in 0..2 {
                    actuator.service_next(angles);
                    pacing.delay_ms(STAGGER_MS);
                }
            }

            if angles.pan() == PAN_LIMITS.max || angles.pan() == PAN_LIMITS.min {
                pan_step = if angles.pan() == PAN_LIMITS.max { -1 } else { 1 };
                writeln!(tx, "pan at {}\r", angles.pan()).unwrap();
            }
            if angles.tilt() == TILT_LIMITS.max || angles.tilt() == TILT_LIMITS.min {
                tilt_step = if angles.tilt() == TILT_LIMITS.max { 1 } else { -1 };
                writeln!(tx, "tilt at {}\r", angles.tilt()).unwrap();
            }
            // tilt delta is inverted, a positive step lowers the tilt angle
            angles = angles.apply_delta(pan_step, tilt_step);
        }
    }

    panic!("peripheral acquisiton failed");
}

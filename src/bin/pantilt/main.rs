#![no_main]
#![no_std]

mod actuation;
mod config;
mod link;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [SPI1, SPI2])]
mod app {
    use crate::config::{sys_config, tuning};
    use crate::actuation::servo_refresh;
    use crate::link::{usart1_rx, LinkEvent};
    use core::fmt::Write;
    use cortex_m::asm;
    use pantilt::controller::actuator::Actuator;
    use pantilt::controller::angles::AngleState;
    use pantilt::drivers::servo::pwm_servo::PwmServo;
    use pantilt::protocol::receiver::{FrameReceiver, ReceiverStats};
    use panic_write::PanicHandler;
    use stm32f4xx_hal::{
        gpio::{Output, PushPull, PA5},
        pac::{TIM3, USART1, USART2},
        prelude::*,
        serial::{Config, Rx, Serial, Tx},
        timer::pwm::PwmChannel,
    };
    use systick_monotonic::{fugit::Duration, Systick};

    type PanServo = PwmServo<PwmChannel<TIM3, 0>>;
    type TiltServo = PwmServo<PwmChannel<TIM3, 1>>;

    #[shared]
    struct Shared {
        angles: AngleState,
        link_stats: ReceiverStats,
    }

    #[local]
    struct Local {
        tx: core::pin::Pin<panic_write::PanicHandler<Tx<USART2>>>,
        led: PA5<Output<PushPull>>,
        link_rx: Rx<USART1>,
        receiver: FrameReceiver,
        actuator: Actuator<PanServo, TiltServo>,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<1000>;

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        // configure clocks
        let rcc = ctx.device.RCC.constrain();
        let mono = Systick::new(ctx.core.SYST, sys_config::SYSCLK_HZ);
        let clocks = rcc.cfgr.sysclk(sys_config::SYSCLK_HZ.Hz()).freeze();

        let gpioa = ctx.device.GPIOA.split();

        // set up debug uart tx
        let tx_pin = gpioa.pa2.into_alternate();
        let serial = Serial::tx(
            ctx.device.USART2,
            tx_pin,
            Config::default()
                .baudrate(sys_config::DEBUG_BAUD.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();
        let mut tx = PanicHandler::new(serial);

        // set up command link, only the receive half is used on this side
        let link = Serial::new(
            ctx.device.USART1,
            (gpioa.pa9.into_alternate(), gpioa.pa10.into_alternate()),
            Config::default()
                .baudrate(sys_config::LINK_BAUD.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();
        let (_link_tx, mut link_rx) = link.split();
        link_rx.listen();
        link_rx.listen_idle();

        // set up servo PWM, one timer for both axes
        let channels = (gpioa.pa6.into_alternate(), gpioa.pa7.into_alternate());
        let (pan_pwm, tilt_pwm) = ctx
            .device
            .TIM3
            .pwm_hz(channels, sys_config::SERVO_PWM_HZ.Hz(), &clocks)
            .split();
        let mut pan = PwmServo::new(pan_pwm);
        let mut tilt = PwmServo::new(tilt_pwm);
        pan.start();
        tilt.start();
        let actuator = Actuator::with_channels(pan, tilt, tuning::PAN_SERVO, tuning::TILT_SERVO);

        let mut led = gpioa.pa5.into_push_pull_output();
        led.set_low();

        let angles = tuning::start_angles();
        writeln!(
            tx,
            "system initialized, holding {} {}\r",
            angles.pan(),
            angles.tilt()
        )
        .unwrap();

        servo_refresh::spawn().unwrap();
        report::spawn_after(
            Duration::<u64, 1, 1000>::secs(sys_config::STATS_PERIOD_SECS),
            LinkEvent::StatsTick,
        )
        .ok();

        (
            Shared {
                angles,
                link_stats: ReceiverStats::default(),
            },
            Local {
                tx,
                led,
                link_rx,
                receiver: FrameReceiver::new(),
                actuator,
            },
            init::Monotonics(mono),
        )
    }

    #[task(local = [tx, led], shared = [link_stats], priority = 1, capacity = 8)]
    fn report(mut cx: report::Context, event: LinkEvent) {
        let tx = cx.local.tx;
        match event {
            LinkEvent::Accepted(angles) => {
                cx.local.led.toggle();
                writeln!(tx, "angle: {} {}\r", angles.pan(), angles.tilt()).unwrap();
            }
            LinkEvent::Rejected(e) => {
                writeln!(tx, "illegal frame: {}\r", e).unwrap();
            }
            LinkEvent::Truncated => {
                writeln!(tx, "partial frame dropped on idle line\r").unwrap();
            }
            LinkEvent::LineError => {
                writeln!(tx, "uart receive error\r").unwrap();
            }
            LinkEvent::StatsTick => {
                let stats = cx.shared.link_stats.lock(|stats| *stats);
                writeln!(
                    tx,
                    "link: ok {} bad_sync {} checksum {} truncated {} noise {}\r",
                    stats.accepted,
                    stats.bad_sync,
                    stats.checksum_mismatch,
                    stats.truncated,
                    stats.discarded_bytes
                )
                .unwrap();
                report::spawn_after(
                    Duration::<u64, 1, 1000>::secs(sys_config::STATS_PERIOD_SECS),
                    LinkEvent::StatsTick,
                )
                .ok();
            }
        }
    }

    extern "Rust" {
        #[task(binds = USART1, local = [link_rx, receiver], shared = [angles, link_stats], priority = 3)]
        fn usart1_rx(cx: usart1_rx::Context);

        #[task(local = [actuator], shared = [angles], priority = 2)]
        fn servo_refresh(cx: servo_refresh::Context);
    }

    #[idle]
    fn idle(_ctx: idle::Context) -> ! {
        loop {
            asm::nop();
        }
    }
}

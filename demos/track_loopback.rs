// Vision-side loop on the bench: replays scripted hand detections through the
// tracker and sends the resulting command frames out of USART1 (PA9).
// Wire PA9 to the receiver board's RX to close the loop without a camera.

#![no_main]
#![no_std]

use pantilt::tracking::target::DetectionBox;
use pantilt::tracking::tracker::RemoteCommand;

pub enum Step {
    Detect(&'static [DetectionBox]),
    Command(RemoteCommand),
}

const LEFT_HAND: &[DetectionBox] = &[DetectionBox::new(40, 150, 139, 249)];
const RIGHT_HAND: &[DetectionBox] = &[DetectionBox::new(480, 60, 579, 159)];
const CENTRED: &[DetectionBox] = &[DetectionBox::new(270, 142, 369, 241)];
const BOTH_HANDS: &[DetectionBox] = &[
    DetectionBox::new(40, 150, 139, 249),
    DetectionBox::new(600, 10, 619, 29),
    DetectionBox::new(480, 60, 589, 169),
];
const NOTHING: &[DetectionBox] = &[];

const SCRIPT: &[Step] = &[
    Step::Command(RemoteCommand::Start),
    Step::Detect(LEFT_HAND),
    Step::Detect(LEFT_HAND),
    Step::Detect(LEFT_HAND),
    Step::Detect(NOTHING),
    Step::Detect(RIGHT_HAND),
    Step::Detect(RIGHT_HAND),
    Step::Detect(BOTH_HANDS),
    Step::Detect(BOTH_HANDS),
    Step::Command(RemoteCommand::Stop),
    Step::Detect(LEFT_HAND),
    Step::Detect(CENTRED),
];

// roughly one inference cycle
const CYCLE_MS: u64 = 40;

#[rtic::app(device = stm32f4xx_hal::pac, peripherals = true, dispatchers = [SPI1])]
mod app {
    use crate::{Step, CYCLE_MS, SCRIPT};
    use core::fmt::Write;
    use pantilt::drivers::indicator::status_leds::StatusLeds;
    use pantilt::tracking::tracker::{CycleOutcome, Tracker, TrackerConfig};
    use panic_write::PanicHandler;
    use stm32f4xx_hal::{
        gpio::{Output, PushPull, PB0, PB7},
        pac::{USART1, USART2},
        prelude::*,
        serial::{Config, Serial, Tx},
    };
    use systick_monotonic::{fugit::Duration, Systick};

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        tx: core::pin::Pin<panic_write::PanicHandler<Tx<USART2>>>,
        link: Tx<USART1>,
        leds: StatusLeds<PB0<Output<PushPull>>, PB7<Output<PushPull>>>,
        tracker: Tracker,
        step: usize,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<1000>;

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        // configure clocks
        let rcc = ctx.device.RCC.constrain();
        let mono = Systick::new(ctx.core.SYST, 48_000_000);
        let clocks = rcc.cfgr.sysclk(48.MHz()).freeze();

        let gpioa = ctx.device.GPIOA.split();
        let gpiob = ctx.device.GPIOB.split();

        // set up uart tx
        let serial = Serial::tx(
            ctx.device.USART2,
            gpioa.pa2.into_alternate(),
            Config::default()
                .baudrate(115200.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();
        let mut tx = PanicHandler::new(serial);

        let link = Serial::tx(
            ctx.device.USART1,
            gpioa.pa9.into_alternate(),
            Config::default()
                .baudrate(230_400.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();

        let leds = StatusLeds::new(
            gpiob.pb0.into_push_pull_output(),
            gpiob.pb7.into_push_pull_output(),
        );

        writeln!(tx, "tracker initialized\r").unwrap();

        inference_cycle::spawn_after(Duration::<u64, 1, 1000>::secs(1)).unwrap();
        (
            Shared {},
            Local {
                tx,
                link,
                leds,
                tracker: Tracker::new(TrackerConfig::default()),
                step: 0,
            },
            init::Monotonics(mono),
        )
    }

    #[task(local = [tx, link, leds, tracker, step])]
    fn inference_cycle(cx: inference_cycle::Context) {
        let tx = cx.local.tx;
        let tracker = cx.local.tracker;

        match &SCRIPT[*cx.local.step] {
            Step::Command(command) => {
                if let Err(e) = tracker.handle_command(*command, cx.local.link) {
                    writeln!(tx, "{}\r", e).unwrap();
                }
                writeln!(tx, "command {:?}, enabled {}\r", command, tracker.is_enabled()).unwrap();
            }
            Step::Detect(boxes) => match tracker.process(boxes, cx.local.link) {
                Ok(outcome) => {
                    cx.local.leds.show(outcome.status());
                    match outcome {
                        CycleOutcome::Sent { target, angles } => writeln!(
                            tx,
                            "target ({}, {}) {:?} -> pan {} tilt {}\r",
                            target.point.x,
                            target.point.y,
                            target.status,
                            angles.pan(),
                            angles.tilt()
                        )
                        .unwrap(),
                        CycleOutcome::NoTarget => writeln!(tx, "no target\r").unwrap(),
                        CycleOutcome::Paused => writeln!(tx, "paused\r").unwrap(),
                    }
                }
                // a dropped frame is corrected by the next cycle
                Err(e) => writeln!(tx, "{}\r", e).unwrap(),
            },
        }

        *cx.local.step = (*cx.local.step + 1) % SCRIPT.len();
        if *cx.local.step == 0 {
            let stats = tracker.stats();
            writeln!(
                tx,
                "cycles {} empty {} sent {} failed {}\r",
                stats.cycles, stats.no_target, stats.frames_sent, stats.send_failures
            )
            .unwrap();
        }

        inference_cycle::spawn_after(Duration::<u64, 1, 1000>::millis(CYCLE_MS)).unwrap();
    }
}

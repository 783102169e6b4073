use crate::app::{report, usart1_rx};
use pantilt::controller::angles::AngleState;
use pantilt::protocol::frame::FrameError;
use pantilt::protocol::receiver::ReceiveEvent;
use rtic::Mutex;
use stm32f4xx_hal::prelude::*;

pub enum LinkEvent {
    Accepted(AngleState),
    Rejected(FrameError),
    Truncated,
    LineError,
    StatsTick,
}

// Runs on every RXNE / IDLE interrupt of the command link. No formatting here,
// anything worth logging is handed to the report task.
pub fn usart1_rx(mut cx: usart1_rx::Context) {
    let rx = cx.local.link_rx;
    let receiver = cx.local.receiver;

    loop {
        match rx.read() {
            Ok(byte) => match receiver.push(byte) {
                Some(ReceiveEvent::Accepted(angles)) => {
                    cx.shared.angles.lock(|shared| *shared = angles);
                    report::spawn(LinkEvent::Accepted(angles)).ok();
                }
                Some(ReceiveEvent::Rejected(e)) => {
                    report::spawn(LinkEvent::Rejected(e)).ok();
                }
                None => {}
            },
            Err(nb::Error::WouldBlock) => break,
            Err(nb::Error::Other(_)) => {
                // overrun or framing error, the buffered bytes are suspect
                receiver.flush_partial();
                report::spawn(LinkEvent::LineError).ok();
            }
        }
    }

    if rx.is_idle() {
        rx.clear_idle_interrupt();
        if receiver.flush_partial() {
            report::spawn(LinkEvent::Truncated).ok();
        }
    }

    let stats = receiver.stats();
    cx.shared.link_stats.lock(|shared| *shared = stats);
}

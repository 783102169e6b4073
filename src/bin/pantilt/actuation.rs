use crate::app::servo_refresh;
use crate::config::sys_config;
use rtic::Mutex;
use systick_monotonic::fugit::Duration;

pub fn servo_refresh(mut cx: servo_refresh::Context) {
    // copy the pair out so the receive interrupt is only held off for the copy
    let angles = cx.shared.angles.lock(|angles| *angles);
    cx.local.actuator.service_next(angles);

    servo_refresh::spawn_after(Duration::<u64, 1, 1000>::millis(
        sys_config::SERVO_STAGGER_MS,
    ))
    .unwrap();
}

pub const SYSCLK_HZ: u32 = 48_000_000;

// USART2, routed to the ST-Link virtual COM port
pub const DEBUG_BAUD: u32 = 115_200;
// USART1, 8N1 command link from the vision board
pub const LINK_BAUD: u32 = 230_400;

pub const SERVO_PWM_HZ: u32 = 50;
// pan and tilt are refreshed alternately, so each axis sees one pulse every 2 * SERVO_STAGGER_MS
pub const SERVO_STAGGER_MS: u64 = 10;

pub const STATS_PERIOD_SECS: u64 = 5;

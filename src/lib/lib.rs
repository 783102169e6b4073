#![cfg_attr(not(test), no_std)]

pub mod controller {
    pub mod actuator;
    pub mod angles;
    pub mod pid;
    pub mod pid_params;
}

pub mod drivers {
    pub mod indicator {
        pub mod status_leds;
    }
    pub mod servo {
        pub mod gpio_servo;
        pub mod pwm_servo;
    }
}

pub mod protocol {
    pub mod frame;
    pub mod receiver;
}

pub mod tracking {
    pub mod target;
    pub mod tracker;
}

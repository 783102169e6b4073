use num_traits::clamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisLimits {
    pub min: u8,
    pub max: u8,
}

impl AxisLimits {
    // clamp in signed space first so a large delta cannot wrap back into range
    pub fn clamp(&self, angle: i32) -> u8 {
        clamp(angle, self.min as i32, self.max as i32) as u8
    }
}

pub const PAN_LIMITS: AxisLimits = AxisLimits { min: 10, max: 170 };
pub const TILT_LIMITS: AxisLimits = AxisLimits { min: 80, max: 160 };

pub const DEFAULT_PAN_DEG: u8 = 90;
pub const DEFAULT_TILT_DEG: u8 = 140;

/// Last commanded pan/tilt pair.
///
/// The fields are private and every constructor clamps, so a value of this
/// type is always inside `PAN_LIMITS` / `TILT_LIMITS`. It is `Copy` so the
/// firmware can replace or snapshot the whole pair inside a single lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AngleState {
    pan: u8,
    tilt: u8,
}

impl AngleState {
    pub fn new(pan: u8, tilt: u8) -> AngleState {
        AngleState {
            pan: PAN_LIMITS.clamp(pan as i32),
            tilt: TILT_LIMITS.clamp(tilt as i32),
        }
    }

    pub fn pan(&self) -> u8 {
        self.pan
    }

    pub fn tilt(&self) -> u8 {
        self.tilt
    }

    // tilt moves against its delta because of how the tilt servo is mounted
    pub fn apply_delta(&self, delta_x: i32, delta_y: i32) -> AngleState {
        AngleState {
            pan: PAN_LIMITS.clamp((self.pan as i32).saturating_add(delta_x)),
            tilt: TILT_LIMITS.clamp((self.tilt as i32).saturating_sub(delta_y)),
        }
    }
}

impl Default for AngleState {
    fn default() -> AngleState {
        AngleState {
            pan: DEFAULT_PAN_DEG,
            tilt: DEFAULT_TILT_DEG,
        }
    }
}

pub fn update_angles(current: AngleState, delta_x: i32, delta_y: i32) -> AngleState {
    current.apply_delta(delta_x, delta_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_mount() {
        let angles = AngleState::default();
        assert_eq!((angles.pan(), angles.tilt()), (90, 140));
    }

    #[test]
    fn new_clamps_both_axes() {
        assert_eq!(AngleState::new(0, 0), AngleState::new(10, 80));
        assert_eq!(AngleState::new(255, 255), AngleState::new(170, 160));
        let inside = AngleState::new(104, 120);
        assert_eq!((inside.pan(), inside.tilt()), (104, 120));
    }

    #[test]
    fn pan_follows_delta_tilt_opposes_it() {
        let next = update_angles(AngleState::default(), 14, 5);
        assert_eq!((next.pan(), next.tilt()), (104, 135));
    }

    #[test]
    fn extreme_deltas_stay_in_range() {
        let starts = [
            AngleState::default(),
            AngleState::new(10, 80),
            AngleState::new(170, 160),
        ];
        for start in starts {
            for delta in [-1000, -300, -255, -1, 0, 1, 255, 300, 1000, i32::MIN, i32::MAX] {
                let next = update_angles(start, delta, delta);
                assert!((10..=170).contains(&next.pan()), "pan {}", next.pan());
                assert!((80..=160).contains(&next.tilt()), "tilt {}", next.tilt());
            }
        }
    }

    #[test]
    fn large_delta_does_not_wrap() {
        // 90 + 200 would wrap to 34 as a u8
        let next = update_angles(AngleState::default(), 200, 0);
        assert_eq!(next.pan(), 170);
        // 140 - (-150) would wrap to 34 as a u8
        let next = update_angles(AngleState::default(), 0, -150);
        assert_eq!(next.tilt(), 160);
    }
}

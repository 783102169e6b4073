// Per-frame target arbitration over hand detection boxes.
// No identity is kept between frames: the target is picked purely by box area.

// detection frame the vision pipeline reports in
pub const FRAME_WIDTH: i32 = 640;
pub const FRAME_HEIGHT: i32 = 384;

/// Axis-aligned box with inclusive pixel corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectionBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl DetectionBox {
    pub const fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> DetectionBox {
        DetectionBox {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn area(&self) -> i64 {
        let width = self.xmax as i64 - self.xmin as i64 + 1;
        let height = self.ymax as i64 - self.ymin as i64 + 1;
        width * height
    }

    pub fn center(&self) -> TargetPoint {
        TargetPoint {
            x: half_up(self.xmin as i64 + self.xmax as i64, 2),
            y: half_up(self.ymin as i64 + self.ymax as i64, 2),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetPoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetStatus {
    Lost,
    Single,
    Multi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub point: TargetPoint,
    pub status: TargetStatus,
    pub primary: usize,
    pub secondary: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    NoTarget,
    Locked(Target),
}

impl Selection {
    pub fn status(&self) -> TargetStatus {
        match self {
            Selection::NoTarget => TargetStatus::Lost,
            Selection::Locked(target) => target.status,
        }
    }

    pub fn target(&self) -> Option<Target> {
        match self {
            Selection::NoTarget => None,
            Selection::Locked(target) => Some(*target),
        }
    }
}

// Centres use integer division rounding half up, so the 0..=99 span centres on 50.
// Sums are taken in i64; the mean of i32 corners always fits back into i32.
fn half_up(sum: i64, parts: i64) -> i32 {
    (sum + parts / 2).div_euclid(parts) as i32
}

fn corner_sum(a: i32, b: i32, c: i32, d: i32) -> i64 {
    a as i64 + b as i64 + c as i64 + d as i64
}

// Index of the largest and second-largest box in one pass. On equal area the
// box seen first keeps its place.
fn two_largest(boxes: &[DetectionBox]) -> Option<(usize, Option<usize>)> {
    let first = boxes.first()?;
    let mut best = (0, first.area());
    let mut runner_up: Option<(usize, i64)> = None;

    for (idx, b) in boxes.iter().enumerate().skip(1) {
        let area = b.area();
        if area > best.1 {
            runner_up = Some(best);
            best = (idx, area);
        } else if runner_up.map_or(true, |(_, a)| area > a) {
            runner_up = Some((idx, area));
        }
    }
    Some((best.0, runner_up.map(|(idx, _)| idx)))
}

pub fn select(boxes: &[DetectionBox]) -> Selection {
    let (primary, secondary) = match two_largest(boxes) {
        Some(found) => found,
        None => return Selection::NoTarget,
    };

    let target = match secondary {
        None => Target {
            point: boxes[primary].center(),
            status: TargetStatus::Single,
            primary,
            secondary: None,
        },
        Some(secondary) => {
            let (a, b) = (boxes[primary], boxes[secondary]);
            Target {
                point: TargetPoint {
                    x: half_up(corner_sum(a.xmin, a.xmax, b.xmin, b.xmax), 4),
                    y: half_up(corner_sum(a.ymin, a.ymax, b.ymin, b.ymax), 4),
                },
                status: TargetStatus::Multi,
                primary,
                secondary: Some(secondary),
            }
        }
    };
    Selection::Locked(target)
}

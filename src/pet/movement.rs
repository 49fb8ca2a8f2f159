use glam::IVec2;

use super::animation::AnimState;

/// Result of one movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub pos: IVec2,
    pub state: AnimState,
}

/// Move `speed` pixels toward `delta` on one axis, if that axis is still
/// more than one step away.
fn approach(coord: i32, delta: i32, speed: i32) -> i32 {
    if delta.abs() > speed {
        coord + speed * delta.signum()
    } else {
        coord
    }
}

/// One tick of following the cursor.
///
/// Inside the stop box the pet idles in place. Otherwise each axis moves one
/// step toward the cursor; only horizontal motion changes which way the pet
/// faces, so purely vertical motion keeps `current`.
pub fn chase(
    pos: IVec2,
    cursor: IVec2,
    current: AnimState,
    speed: i32,
    stop_distance: i32,
) -> Step {
    let d = cursor - pos;

    if d.x.abs() < stop_distance && d.y.abs() < stop_distance {
        return Step {
            pos,
            state: AnimState::Idle,
        };
    }

    let state = if d.x.abs() > speed {
        AnimState::facing(d.x)
    } else {
        current
    };

    Step {
        pos: IVec2::new(approach(pos.x, d.x, speed), approach(pos.y, d.y, speed)),
        state,
    }
}

/// One tick of returning to the dock corner. Snaps onto `target` once both
/// axes are within a single step.
pub fn dock(pos: IVec2, target: IVec2, speed: i32) -> Step {
    let d = target - pos;

    if d.x.abs() <= speed && d.y.abs() <= speed {
        return Step {
            pos: target,
            state: AnimState::Idle,
        };
    }

    Step {
        pos: IVec2::new(approach(pos.x, d.x, speed), approach(pos.y, d.y, speed)),
        state: AnimState::facing(d.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: i32 = 8;
    const STOP: i32 = 50;

    #[test]
    fn chase_idles_inside_stop_box() {
        let pos = IVec2::new(100, 100);
        let step = chase(pos, IVec2::new(149, 51), AnimState::ChaseRight, SPEED, STOP);
        assert_eq!(step.pos, pos);
        assert_eq!(step.state, AnimState::Idle);
    }

    #[test]
    fn chase_stop_box_is_exclusive() {
        let pos = IVec2::new(100, 100);
        let step = chase(pos, IVec2::new(150, 100), AnimState::Idle, SPEED, STOP);
        assert_eq!(step.pos, IVec2::new(108, 100));
        assert_eq!(step.state, AnimState::ChaseRight);
    }

    #[test]
    fn chase_moves_diagonally() {
        let step = chase(IVec2::new(500, 500), IVec2::new(100, 900), AnimState::Idle, SPEED, STOP);
        assert_eq!(step.pos, IVec2::new(492, 508));
        assert_eq!(step.state, AnimState::ChaseLeft);
    }

    #[test]
    fn chase_vertical_keeps_facing() {
        let step = chase(
            IVec2::new(100, 100),
            IVec2::new(104, 400),
            AnimState::ChaseLeft,
            SPEED,
            STOP,
        );
        assert_eq!(step.pos, IVec2::new(100, 108));
        assert_eq!(step.state, AnimState::ChaseLeft);
    }

    #[test]
    fn dock_snaps_when_within_one_step() {
        let target = IVec2::new(1840, 1000);
        let step = dock(IVec2::new(1835, 1007), target, SPEED);
        assert_eq!(step.pos, target);
        assert_eq!(step.state, AnimState::Idle);
    }

    #[test]
    fn dock_walks_toward_target() {
        let step = dock(IVec2::new(100, 100), IVec2::new(1840, 1000), SPEED);
        assert_eq!(step.pos, IVec2::new(108, 108));
        assert_eq!(step.state, AnimState::ChaseRight);

        let step = dock(IVec2::new(1900, 1000), IVec2::new(1840, 1000), SPEED);
        assert_eq!(step.pos, IVec2::new(1892, 1000));
        assert_eq!(step.state, AnimState::ChaseLeft);
    }

    #[test]
    fn dock_converges() {
        let target = IVec2::new(1840, 1000);
        let mut pos = IVec2::new(3, 7);
        let bound = (target - pos).abs().max_element() / SPEED + 2;

        let mut ticks = 0;
        loop {
            let step = dock(pos, target, SPEED);
            pos = step.pos;
            ticks += 1;
            if step.state == AnimState::Idle {
                break;
            }
            assert!(ticks <= bound, "dock did not converge");
        }
        assert_eq!(pos, target);
    }
}

pub mod animation;
pub mod movement;

use glam::IVec2;

use crate::config::PetConfig;
use animation::{AnimState, Animation};

/// The one on-screen cat: where it is, what it is doing, and whether it is
/// following the cursor or heading home.
#[derive(Debug, Clone)]
pub struct Pet {
    /// Top-left of the pet window in screen pixels.
    pub pos: IVec2,
    pub anim: Animation,
    /// Follow the cursor (true) or walk back to `dock` (false).
    pub chasing: bool,
    /// Bottom-right corner the pet returns to.
    pub dock: IVec2,
    speed: i32,
    stop_distance: i32,
}

impl Pet {
    /// Spawn near the bottom-right corner of a `screen_w` x `screen_h` screen.
    pub fn spawn(config: &PetConfig, screen_w: u32, screen_h: u32) -> Self {
        let size = config.sprite_size as i32;
        let corner = IVec2::new(screen_w as i32 - size, screen_h as i32 - size);

        Self {
            pos: corner - IVec2::splat(config.spawn_inset),
            anim: Animation::default(),
            chasing: config.start_chasing,
            dock: corner,
            speed: config.chase_speed,
            stop_distance: config.stop_distance,
        }
    }

    pub fn state(&self) -> AnimState {
        self.anim.state
    }

    pub fn frame(&self) -> usize {
        self.anim.frame
    }

    /// Flip between follow and dock mode. Returns the new mode.
    pub fn toggle_follow(&mut self) -> bool {
        self.chasing = !self.chasing;
        if self.chasing {
            log::info!("Follow mode on");
        } else {
            log::info!("Follow mode off, heading to the corner");
        }
        self.chasing
    }

    /// Movement tick. Returns true if the window needs to move.
    pub fn update_position(&mut self, cursor: IVec2) -> bool {
        let step = if self.chasing {
            movement::chase(self.pos, cursor, self.anim.state, self.speed, self.stop_distance)
        } else {
            movement::dock(self.pos, self.dock, self.speed)
        };

        let moved = step.pos != self.pos;
        self.pos = step.pos;
        if self.anim.set_state(step.state) {
            log::debug!("Pet state -> {}", step.state.label());
        }
        moved
    }

    /// Animation tick.
    pub fn update_animation(&mut self, frame_count: usize) {
        self.anim.advance(frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> Pet {
        Pet::spawn(&PetConfig::default(), 1920, 1080)
    }

    #[test]
    fn spawns_inset_from_corner() {
        let pet = pet();
        assert_eq!(pet.dock, IVec2::new(1840, 1000));
        assert_eq!(pet.pos, IVec2::new(1790, 950));
        assert_eq!(pet.state(), AnimState::Idle);
        assert_eq!(pet.frame(), 0);
        assert!(pet.chasing);
    }

    #[test]
    fn toggle_flips_mode() {
        let mut pet = pet();
        assert!(!pet.toggle_follow());
        assert!(pet.toggle_follow());
    }

    #[test]
    fn chase_then_dock() {
        let mut pet = pet();
        pet.anim.frame = 3;

        assert!(pet.update_position(IVec2::new(0, 0)));
        assert_eq!(pet.pos, IVec2::new(1782, 942));
        assert_eq!(pet.state(), AnimState::ChaseLeft);
        assert_eq!(pet.frame(), 0);

        pet.toggle_follow();
        for _ in 0..100 {
            pet.update_position(IVec2::new(0, 0));
        }
        assert_eq!(pet.pos, pet.dock);
        assert_eq!(pet.state(), AnimState::Idle);
        assert!(!pet.update_position(IVec2::new(0, 0)));
    }

    #[test]
    fn caught_cursor_idles() {
        let mut pet = pet();
        pet.anim.set_state(AnimState::ChaseRight);
        let cursor = pet.pos + IVec2::new(10, 10);
        assert!(!pet.update_position(cursor));
        assert_eq!(pet.state(), AnimState::Idle);
    }

    #[test]
    fn frame_stays_in_bounds() {
        let mut pet = pet();
        for _ in 0..10 {
            pet.update_animation(4);
            assert!(pet.frame() < 4);
        }
    }
}

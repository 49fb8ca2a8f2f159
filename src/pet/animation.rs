/// Visual state of the pet. Each state owns its own frame list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AnimState {
    Idle,
    ChaseRight,
    ChaseLeft,
}

impl AnimState {
    pub const ALL: [AnimState; 3] = [Self::Idle, Self::ChaseRight, Self::ChaseLeft];

    /// Logical asset name for this state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ChaseRight => "chase_right",
            Self::ChaseLeft => "chase_left",
        }
    }

    /// Walking state facing the sign of `dx`. Zero faces left.
    pub fn facing(dx: i32) -> Self {
        if dx > 0 {
            Self::ChaseRight
        } else {
            Self::ChaseLeft
        }
    }
}

/// Current animation cursor: which state, which frame of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub state: AnimState,
    pub frame: usize,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            state: AnimState::Idle,
            frame: 0,
        }
    }
}

impl Animation {
    /// Switch state. Restarts from frame 0 only when the state actually changes.
    /// Returns true if it changed.
    pub fn set_state(&mut self, state: AnimState) -> bool {
        if state == self.state {
            return false;
        }
        self.state = state;
        self.frame = 0;
        true
    }

    /// Step to the next frame, wrapping at `frame_count`.
    pub fn advance(&mut self, frame_count: usize) {
        if frame_count == 0 {
            self.frame = 0;
            return;
        }
        self.frame = (self.frame + 1) % frame_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps() {
        let mut anim = Animation::default();
        for expected in [1, 2, 3, 0, 1] {
            anim.advance(4);
            assert_eq!(anim.frame, expected);
        }
    }

    #[test]
    fn state_change_resets_frame() {
        let mut anim = Animation {
            state: AnimState::Idle,
            frame: 3,
        };
        assert!(anim.set_state(AnimState::ChaseLeft));
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn same_state_keeps_frame() {
        let mut anim = Animation {
            state: AnimState::ChaseRight,
            frame: 2,
        };
        assert!(!anim.set_state(AnimState::ChaseRight));
        assert_eq!(anim.frame, 2);
    }

    #[test]
    fn empty_frame_list_pins_to_zero() {
        let mut anim = Animation {
            state: AnimState::Idle,
            frame: 2,
        };
        anim.advance(0);
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn facing_follows_sign() {
        assert_eq!(AnimState::facing(5), AnimState::ChaseRight);
        assert_eq!(AnimState::facing(-5), AnimState::ChaseLeft);
        assert_eq!(AnimState::facing(0), AnimState::ChaseLeft);
    }
}

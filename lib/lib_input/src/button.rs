/// Digital input state for one key, mouse button or gamepad button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Button {
    pub is_held: bool,
    pub is_pressed: bool,
    pub is_released: bool,
}

impl Button {
    /// Applies a held/not-held transition.
    ///
    /// Repeats of an already held button never produce a new press edge.
    pub fn set_held(&mut self, is_held: bool) {
        if is_held && !self.is_held {
            self.is_pressed = true;
        }
        if !is_held && self.is_held {
            self.is_released = true;
        }

        self.is_held = is_held;
    }

    pub fn end_frame(&mut self) {
        self.is_pressed = false;
        self.is_released = false;
    }

    /// Held, or pressed and released within the same frame.
    pub fn is_down(&self) -> bool {
        self.is_held || self.is_pressed
    }
}

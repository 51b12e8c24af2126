/// Analog input in `0.0..=1.0`, as reported by gamepad triggers and stick half-axes.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Value(pub f32);

impl Value {
    /// Analog inputs at or above this count as held.
    pub const HOLD_THRESHOLD: f32 = 0.5;

    pub fn is_held(self) -> bool {
        self.0 >= Self::HOLD_THRESHOLD
    }
}

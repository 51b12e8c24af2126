use crate::{Button, Value};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axis<T> {
    pub positive: T,
    pub negative: T,
}

impl<T> Axis<T> {
    pub fn new(positive: T, negative: T) -> Self {
        Self { positive, negative }
    }
}

impl Axis<Button> {
    pub fn value(&self) -> i8 {
        self.positive.is_held as i8 - self.negative.is_held as i8
    }
}

impl Axis<Value> {
    pub fn value(&self) -> f32 {
        self.positive.0 - self.negative.0
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::errors::{AppError, AppResult};

/// Inclusive range of the offset sliders, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for OffsetBounds {
    fn default() -> Self {
        Self { min: -30, max: 30 }
    }
}

impl OffsetBounds {
    pub fn new(min: i32, max: i32) -> AppResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.min > self.max {
            return Err(AppError::Configuration(format!(
                "offset bounds are inverted: [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Pull `value` into the range; never panics on inverted bounds
    pub fn clamp(&self, value: i32) -> i32 {
        value.max(self.min).min(self.max)
    }
}

/// Pixel offset held by a slider, always within its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Offset {
    value: i32,
    bounds: OffsetBounds,
}

impl Offset {
    pub fn new(value: i32, bounds: OffsetBounds) -> Self {
        Self { value: bounds.clamp(value), bounds }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn bounds(&self) -> OffsetBounds {
        self.bounds
    }

    /// Returns whether the stored value changed
    pub fn set(&mut self, value: i32) -> bool {
        let clamped = self.bounds.clamp(value);
        let changed = clamped != self.value;
        self.value = clamped;
        changed
    }
}

pub const DEFAULT_ANNOTATION_TEXT: &str = "Analysis";
pub const DEFAULT_DX: i32 = 0;
pub const DEFAULT_DY: i32 = -10;

/// Current values of the three page widgets
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    text: String,
    dx: Offset,
    dy: Offset,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOTATION_TEXT, DEFAULT_DX, DEFAULT_DY, OffsetBounds::default())
    }
}

impl ControlState {
    pub fn new(text: &str, dx: i32, dy: i32, bounds: OffsetBounds) -> Self {
        Self { text: text.to_string(), dx: Offset::new(dx, bounds), dy: Offset::new(dy, bounds) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dx(&self) -> i32 {
        self.dx.value()
    }

    pub fn dy(&self) -> i32 {
        self.dy.value()
    }

    pub fn bounds(&self) -> OffsetBounds {
        self.dx.bounds()
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        true
    }

    pub fn set_dx(&mut self, dx: i32) -> bool {
        self.dx.set(dx)
    }

    pub fn set_dy(&mut self, dy: i32) -> bool {
        self.dy.set(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_widgets() {
        let controls = ControlState::default();
        assert_eq!(controls.text(), "Analysis");
        assert_eq!(controls.dx(), 0);
        assert_eq!(controls.dy(), -10);
    }

    #[test]
    fn offsets_clamp_out_of_range_values() {
        let mut controls = ControlState::default();
        assert!(controls.set_dx(45));
        assert_eq!(controls.dx(), 30);
        assert!(controls.set_dy(-100));
        assert_eq!(controls.dy(), -30);
        assert!(!controls.set_dy(-31));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(OffsetBounds::new(10, -10).is_err());
        assert!(OffsetBounds::new(-5, 5).unwrap().contains(0));
    }
}

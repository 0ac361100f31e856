//! Resize options: what size the staged image should end up at.
//!
//! A resize is described either by an explicit box (`width` and/or `height`)
//! or by a `ratio` that grows or shrinks the source by `1/ratio` of one edge.
//! The two are mutually exclusive. An optional [`Anchor`] switches from an
//! exact scale to cover-and-crop.
//!
//! ```text
//! ratio = 4, width-oriented, shrink    2000x1000 → 1500x750
//! ratio = 4, height-oriented, maximize 2000x1000 → 2500x1250
//! width = 500                          2000x1000 → 500x250
//! width = 500, height = 500, Center    2000x1000 → 1000x500 cover, 500x500 crop
//! ```

use crate::error::HandleError;
use crate::imaging::{complete_dimensions, scale_edge};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anchor point for cropping after a cover resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Left,
        Anchor::Right,
        Anchor::BottomLeft,
        Anchor::Bottom,
        Anchor::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::TopLeft => "top-left",
            Anchor::Top => "top",
            Anchor::TopRight => "top-right",
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::Bottom => "bottom",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| format!("unknown anchor '{s}'"))
    }
}

/// How to resize a staged image.
///
/// All-zero/false is not a valid request; see [`ResizeOptions::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeOptions {
    /// Cover the target box and crop at this point. `None` scales exactly.
    pub anchor: Option<Anchor>,
    /// Grow/shrink by `edge / ratio`. Excludes `width` and `height`.
    pub ratio: u32,
    pub width: u32,
    pub height: u32,
    pub width_oriented: bool,
    pub height_oriented: bool,
    pub maximize: bool,
    pub minimize: bool,
}

impl ResizeOptions {
    /// Resize to a box; a zero edge follows the source aspect ratio.
    pub fn to_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Shrink (or with [`maximize`](Self::maximize), grow) by `1/ratio`.
    pub fn by_ratio(ratio: u32) -> Self {
        Self {
            ratio,
            ..Self::default()
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn width_oriented(mut self) -> Self {
        self.width_oriented = true;
        self
    }

    pub fn height_oriented(mut self) -> Self {
        self.height_oriented = true;
        self
    }

    pub fn maximize(mut self) -> Self {
        self.maximize = true;
        self
    }

    pub fn minimize(mut self) -> Self {
        self.minimize = true;
        self
    }

    pub fn validate(&self) -> Result<(), HandleError> {
        if self.ratio > 0 && (self.width > 0 || self.height > 0) {
            return Err(HandleError::InvalidResize(
                "both ratio and resolution cannot be specified at the same time".into(),
            ));
        }
        if self.maximize && self.minimize {
            return Err(HandleError::InvalidResize(
                "maximize and minimize cannot both be set".into(),
            ));
        }
        if self.ratio == 0 && self.width == 0 && self.height == 0 {
            return Err(HandleError::InvalidResize(
                "a ratio or at least one of width/height is required".into(),
            ));
        }
        Ok(())
    }

    /// Final output size for a source of the given dimensions.
    ///
    /// Assumes [`validate`](Self::validate) passed.
    pub fn target_dimensions(&self, source: (u32, u32)) -> (u32, u32) {
        if self.ratio == 0 {
            return complete_dimensions(source, self.width, self.height);
        }

        let grow = self.maximize;
        let by_width = self.width_oriented || !self.height_oriented;
        match (by_width, self.height_oriented) {
            (true, true) => (
                scale_edge(source.0, self.ratio, grow),
                scale_edge(source.1, self.ratio, grow),
            ),
            (false, true) => {
                complete_dimensions(source, 0, scale_edge(source.1, self.ratio, grow))
            }
            _ => complete_dimensions(source, scale_edge(source.0, self.ratio, grow), 0),
        }
    }
}

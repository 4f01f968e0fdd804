//! Style types and enums for context paint state.

use crate::error::{Context2dError, Context2dResult};
use crate::geometry::CanvasColor;
use crate::gradient::GradientShader;
use std::fmt;
use std::str::FromStr;

/// Fill brush for context operations.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color fill.
    Color(CanvasColor),
    /// Prebuilt gradient shader.
    Gradient(GradientShader),
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Color(CanvasColor::BLACK)
    }
}

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

impl FromStr for LineCap {
    type Err = Context2dError;

    fn from_str(s: &str) -> Context2dResult<Self> {
        match s {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            other => Err(Context2dError::InvalidLineCap(other.to_string())),
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

impl FromStr for LineJoin {
    type Err = Context2dError;

    fn from_str(s: &str) -> Context2dResult<Self> {
        match s {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            other => Err(Context2dError::InvalidLineJoin(other.to_string())),
        }
    }
}

/// Fill rule for path operations.
///
/// Determines how the interior of a path is calculated when filling,
/// clipping, or hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasFillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<CanvasFillRule> for tiny_skia::FillRule {
    fn from(rule: CanvasFillRule) -> Self {
        match rule {
            CanvasFillRule::NonZero => tiny_skia::FillRule::Winding,
            CanvasFillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Compositing operator applied when the source is drawn onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Clear,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl CompositeOperation {
    /// Every operator, in declaration order.
    pub const ALL: [CompositeOperation; 27] = [
        CompositeOperation::SourceOver,
        CompositeOperation::SourceIn,
        CompositeOperation::SourceOut,
        CompositeOperation::SourceAtop,
        CompositeOperation::DestinationOver,
        CompositeOperation::DestinationIn,
        CompositeOperation::DestinationOut,
        CompositeOperation::DestinationAtop,
        CompositeOperation::Lighter,
        CompositeOperation::Copy,
        CompositeOperation::Xor,
        CompositeOperation::Clear,
        CompositeOperation::Multiply,
        CompositeOperation::Screen,
        CompositeOperation::Overlay,
        CompositeOperation::Darken,
        CompositeOperation::Lighten,
        CompositeOperation::ColorDodge,
        CompositeOperation::ColorBurn,
        CompositeOperation::HardLight,
        CompositeOperation::SoftLight,
        CompositeOperation::Difference,
        CompositeOperation::Exclusion,
        CompositeOperation::Hue,
        CompositeOperation::Saturation,
        CompositeOperation::Color,
        CompositeOperation::Luminosity,
    ];

    /// CSS keyword for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::SourceIn => "source-in",
            CompositeOperation::SourceOut => "source-out",
            CompositeOperation::SourceAtop => "source-atop",
            CompositeOperation::DestinationOver => "destination-over",
            CompositeOperation::DestinationIn => "destination-in",
            CompositeOperation::DestinationOut => "destination-out",
            CompositeOperation::DestinationAtop => "destination-atop",
            CompositeOperation::Lighter => "lighter",
            CompositeOperation::Copy => "copy",
            CompositeOperation::Xor => "xor",
            CompositeOperation::Clear => "clear",
            CompositeOperation::Multiply => "multiply",
            CompositeOperation::Screen => "screen",
            CompositeOperation::Overlay => "overlay",
            CompositeOperation::Darken => "darken",
            CompositeOperation::Lighten => "lighten",
            CompositeOperation::ColorDodge => "color-dodge",
            CompositeOperation::ColorBurn => "color-burn",
            CompositeOperation::HardLight => "hard-light",
            CompositeOperation::SoftLight => "soft-light",
            CompositeOperation::Difference => "difference",
            CompositeOperation::Exclusion => "exclusion",
            CompositeOperation::Hue => "hue",
            CompositeOperation::Saturation => "saturation",
            CompositeOperation::Color => "color",
            CompositeOperation::Luminosity => "luminosity",
        }
    }

    /// Whether the operator modifies destination pixels the source does not
    /// cover. Layers for these operators must span the whole surface.
    pub fn affects_outside_source(&self) -> bool {
        matches!(
            self,
            CompositeOperation::Copy
                | CompositeOperation::Clear
                | CompositeOperation::SourceIn
                | CompositeOperation::SourceOut
                | CompositeOperation::DestinationIn
                | CompositeOperation::DestinationAtop
        )
    }
}

impl From<CompositeOperation> for tiny_skia::BlendMode {
    fn from(op: CompositeOperation) -> Self {
        use tiny_skia::BlendMode;
        match op {
            CompositeOperation::SourceOver => BlendMode::SourceOver,
            CompositeOperation::SourceIn => BlendMode::SourceIn,
            CompositeOperation::SourceOut => BlendMode::SourceOut,
            CompositeOperation::SourceAtop => BlendMode::SourceAtop,
            CompositeOperation::DestinationOver => BlendMode::DestinationOver,
            CompositeOperation::DestinationIn => BlendMode::DestinationIn,
            CompositeOperation::DestinationOut => BlendMode::DestinationOut,
            CompositeOperation::DestinationAtop => BlendMode::DestinationAtop,
            CompositeOperation::Lighter => BlendMode::Plus,
            CompositeOperation::Copy => BlendMode::Source,
            CompositeOperation::Xor => BlendMode::Xor,
            CompositeOperation::Clear => BlendMode::Clear,
            CompositeOperation::Multiply => BlendMode::Multiply,
            CompositeOperation::Screen => BlendMode::Screen,
            CompositeOperation::Overlay => BlendMode::Overlay,
            CompositeOperation::Darken => BlendMode::Darken,
            CompositeOperation::Lighten => BlendMode::Lighten,
            CompositeOperation::ColorDodge => BlendMode::ColorDodge,
            CompositeOperation::ColorBurn => BlendMode::ColorBurn,
            CompositeOperation::HardLight => BlendMode::HardLight,
            CompositeOperation::SoftLight => BlendMode::SoftLight,
            CompositeOperation::Difference => BlendMode::Difference,
            CompositeOperation::Exclusion => BlendMode::Exclusion,
            CompositeOperation::Hue => BlendMode::Hue,
            CompositeOperation::Saturation => BlendMode::Saturation,
            CompositeOperation::Color => BlendMode::Color,
            CompositeOperation::Luminosity => BlendMode::Luminosity,
        }
    }
}

impl FromStr for CompositeOperation {
    type Err = Context2dError;

    fn from_str(s: &str) -> Context2dResult<Self> {
        CompositeOperation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Context2dError::InvalidCompositeOperation(s.to_string()))
    }
}

impl fmt::Display for CompositeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! JSON command scripts and their application to a context.
//!
//! A script is fully deserialized and validated before anything is drawn, so
//! an unknown op or malformed value fails the run without partial output.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use skcanvas_context2d::{
    ArcParams, ArcToParams, CanvasColor, CanvasFillRule, CompositeOperation, Context2d,
    CubicBezierParams, DOMMatrix, DirtyRect, EllipseParams, GradientStop, ImageCropParams,
    ImageData, LineCap, LineJoin, LinearGradientParams, QuadraticBezierParams,
    RadialGradientParams, RectParams,
};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// A drawing script: surface size plus an ordered command list.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Script {
    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid script: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Create a context and run every command against it.
    pub fn render(&self) -> Result<Context2d> {
        let mut ctx = Context2d::new(self.width, self.height)
            .with_context(|| format!("Cannot create {}x{} surface", self.width, self.height))?;
        for (index, command) in self.commands.iter().enumerate() {
            apply(&mut ctx, command)
                .with_context(|| format!("Command {} ({:?}) failed", index, command))?;
        }
        Ok(ctx)
    }
}

/// Deserialize any `FromStr` type from a JSON string.
fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// Colors are `[r, g, b, a]` arrays or CSS color strings.
fn color<'de, D>(deserializer: D) -> Result<CanvasColor, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Rgba([u8; 4]),
        Css(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Rgba([r, g, b, a]) => Ok(CanvasColor::from_rgba8(r, g, b, a)),
        Repr::Css(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Premultiplied RGBA image given inline, checked for a consistent size.
fn image<'de, D>(deserializer: D) -> Result<ImageData, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Raw {
        width: u32,
        height: u32,
        data: Vec<u8>,
    }

    let raw = Raw::deserialize(deserializer)?;
    ImageData::new(raw.width, raw.height, raw.data).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stop {
    pub offset: f32,
    #[serde(deserialize_with = "color")]
    pub color: CanvasColor,
}

impl From<&Stop> for GradientStop {
    fn from(stop: &Stop) -> Self {
        GradientStop::new(stop.offset, stop.color)
    }
}

/// Fill rule as written in scripts.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    #[default]
    Nonzero,
    Evenodd,
}

impl From<Rule> for CanvasFillRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Nonzero => CanvasFillRule::NonZero,
            Rule::Evenodd => CanvasFillRule::EvenOdd,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dirty {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One script command. Each op maps to the context operation of the same name.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "op",
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    deny_unknown_fields
)]
pub enum Command {
    // State
    Save,
    Restore,
    Reset,
    Resize {
        width: u32,
        height: u32,
    },
    DumpState,

    // Transform
    Scale {
        x: f32,
        y: f32,
    },
    Rotate {
        angle: f32,
    },
    Translate {
        x: f32,
        y: f32,
    },
    Transform {
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    },
    SetTransform {
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    },
    ResetMatrix,

    // Paint and line style
    SetFillStyle {
        #[serde(deserialize_with = "color")]
        color: CanvasColor,
    },
    SetStrokeStyle {
        #[serde(deserialize_with = "color")]
        color: CanvasColor,
    },
    SetLinearGradient {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        stops: Vec<Stop>,
    },
    SetRadialGradient {
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        stops: Vec<Stop>,
    },
    SetGlobalAlpha {
        alpha: f32,
    },
    SetGlobalCompositeOperation {
        #[serde(deserialize_with = "from_str")]
        operation: CompositeOperation,
    },
    SetShadowOffsetX {
        offset: f32,
    },
    SetShadowOffsetY {
        offset: f32,
    },
    SetShadowBlur {
        blur: f32,
    },
    SetShadowColor {
        #[serde(deserialize_with = "color")]
        color: CanvasColor,
    },
    SetLineWidth {
        width: f32,
    },
    SetLineCap {
        #[serde(deserialize_with = "from_str")]
        cap: LineCap,
    },
    SetLineJoin {
        #[serde(deserialize_with = "from_str")]
        join: LineJoin,
    },
    SetMiterLimit {
        limit: f32,
    },
    SetLineDash {
        segments: Vec<f32>,
    },
    SetLineDashOffset {
        offset: f32,
    },
    SetImageSmoothingEnabled {
        enabled: bool,
    },

    // Rectangles
    ClearRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    // Path
    BeginPath,
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    QuadraticCurveTo {
        cpx: f32,
        cpy: f32,
        x: f32,
        y: f32,
    },
    BezierCurveTo {
        cp1x: f32,
        cp1y: f32,
        cp2x: f32,
        cp2y: f32,
        x: f32,
        y: f32,
    },
    ArcTo {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        radius: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Arc {
        x: f32,
        y: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        #[serde(default)]
        anticlockwise: bool,
    },
    Ellipse {
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        #[serde(default)]
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        #[serde(default)]
        anticlockwise: bool,
    },
    AddSvgPath {
        d: String,
    },
    ClosePath,

    // Drawing
    Fill {
        #[serde(default)]
        rule: Rule,
    },
    Stroke,
    Clip {
        #[serde(default)]
        rule: Rule,
    },
    IsPointInPath {
        x: f32,
        y: f32,
        #[serde(default)]
        rule: Rule,
    },

    // Pixels
    GetImageData {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    PutImageData {
        #[serde(deserialize_with = "image")]
        image: ImageData,
        dx: i32,
        dy: i32,
        #[serde(default)]
        dirty: Option<Dirty>,
    },
    DrawImageBuffer {
        #[serde(deserialize_with = "image")]
        image: ImageData,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    },
    GetPixel {
        x: i32,
        y: i32,
    },
}

/// Run one command against the context.
pub fn apply(ctx: &mut Context2d, command: &Command) -> Result<()> {
    match command {
        Command::Save => ctx.save(),
        Command::Restore => ctx.restore(),
        Command::Reset => ctx.reset(),
        Command::Resize { width, height } => ctx.resize(*width, *height)?,
        Command::DumpState => log::info!("{}", ctx.dump_state()),

        Command::Scale { x, y } => ctx.scale(*x, *y),
        Command::Rotate { angle } => ctx.rotate(*angle),
        Command::Translate { x, y } => ctx.translate(*x, *y),
        Command::Transform { a, b, c, d, e, f } => {
            ctx.transform(DOMMatrix::new(*a, *b, *c, *d, *e, *f))
        }
        Command::SetTransform { a, b, c, d, e, f } => {
            ctx.set_transform(DOMMatrix::new(*a, *b, *c, *d, *e, *f))
        }
        Command::ResetMatrix => ctx.reset_matrix(),

        Command::SetFillStyle { color } => ctx.set_fill_style(*color),
        Command::SetStrokeStyle { color } => ctx.set_stroke_style(*color),
        Command::SetLinearGradient {
            x0,
            y0,
            x1,
            y1,
            stops,
        } => {
            let stops: Vec<GradientStop> = stops.iter().map(GradientStop::from).collect();
            let params = LinearGradientParams {
                x0: *x0,
                y0: *y0,
                x1: *x1,
                y1: *y1,
            };
            if !ctx.set_linear_gradient_shader(&params, &stops) {
                log::warn!("Linear gradient not installed; fill style unchanged");
            }
        }
        Command::SetRadialGradient {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
            stops,
        } => {
            let stops: Vec<GradientStop> = stops.iter().map(GradientStop::from).collect();
            let params = RadialGradientParams {
                x0: *x0,
                y0: *y0,
                r0: *r0,
                x1: *x1,
                y1: *y1,
                r1: *r1,
            };
            if !ctx.set_radial_gradient_shader(&params, &stops) {
                log::warn!("Radial gradient not installed; fill style unchanged");
            }
        }
        Command::SetGlobalAlpha { alpha } => ctx.set_global_alpha(*alpha),
        Command::SetGlobalCompositeOperation { operation } => {
            ctx.set_global_composite_operation(*operation)
        }
        Command::SetShadowOffsetX { offset } => ctx.set_shadow_offset_x(*offset),
        Command::SetShadowOffsetY { offset } => ctx.set_shadow_offset_y(*offset),
        Command::SetShadowBlur { blur } => ctx.set_shadow_blur(*blur),
        Command::SetShadowColor { color } => ctx.set_shadow_color(*color),
        Command::SetLineWidth { width } => ctx.set_line_width(*width),
        Command::SetLineCap { cap } => ctx.set_line_cap(*cap),
        Command::SetLineJoin { join } => ctx.set_line_join(*join),
        Command::SetMiterLimit { limit } => ctx.set_miter_limit(*limit),
        Command::SetLineDash { segments } => ctx.set_line_dash(segments.clone()),
        Command::SetLineDashOffset { offset } => ctx.set_line_dash_offset(*offset),
        Command::SetImageSmoothingEnabled { enabled } => {
            ctx.set_image_smoothing_enabled(*enabled)
        }

        Command::ClearRect {
            x,
            y,
            width,
            height,
        } => ctx.clear_rect(&RectParams::new(*x, *y, *width, *height)),
        Command::FillRect {
            x,
            y,
            width,
            height,
        } => ctx.fill_rect(&RectParams::new(*x, *y, *width, *height)),
        Command::StrokeRect {
            x,
            y,
            width,
            height,
        } => ctx.stroke_rect(&RectParams::new(*x, *y, *width, *height)),

        Command::BeginPath => ctx.begin_path(),
        Command::MoveTo { x, y } => ctx.move_to(*x, *y),
        Command::LineTo { x, y } => ctx.line_to(*x, *y),
        Command::QuadraticCurveTo { cpx, cpy, x, y } => {
            ctx.quadratic_curve_to(&QuadraticBezierParams {
                cpx: *cpx,
                cpy: *cpy,
                x: *x,
                y: *y,
            })
        }
        Command::BezierCurveTo {
            cp1x,
            cp1y,
            cp2x,
            cp2y,
            x,
            y,
        } => ctx.bezier_curve_to(&CubicBezierParams {
            cp1x: *cp1x,
            cp1y: *cp1y,
            cp2x: *cp2x,
            cp2y: *cp2y,
            x: *x,
            y: *y,
        }),
        Command::ArcTo {
            x1,
            y1,
            x2,
            y2,
            radius,
        } => ctx.arc_to(&ArcToParams {
            x1: *x1,
            y1: *y1,
            x2: *x2,
            y2: *y2,
            radius: *radius,
        }),
        Command::Rect {
            x,
            y,
            width,
            height,
        } => ctx.rect(&RectParams::new(*x, *y, *width, *height)),
        Command::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        } => ctx.arc(&ArcParams {
            x: *x,
            y: *y,
            radius: *radius,
            start_angle: *start_angle,
            end_angle: *end_angle,
            anticlockwise: *anticlockwise,
        }),
        Command::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
            anticlockwise,
        } => ctx.ellipse(&EllipseParams {
            x: *x,
            y: *y,
            radius_x: *radius_x,
            radius_y: *radius_y,
            rotation: *rotation,
            start_angle: *start_angle,
            end_angle: *end_angle,
            anticlockwise: *anticlockwise,
        }),
        Command::AddSvgPath { d } => ctx.add_svg_path(d)?,
        Command::ClosePath => ctx.close_path(),

        Command::Fill { rule } => ctx.fill_with_rule((*rule).into()),
        Command::Stroke => ctx.stroke(),
        Command::Clip { rule } => ctx.clip_with_rule((*rule).into()),
        Command::IsPointInPath { x, y, rule } => {
            let inside = ctx.is_point_in_path_with_rule(*x, *y, (*rule).into());
            log::info!("isPointInPath({}, {}) = {}", x, y, inside);
        }

        Command::GetImageData {
            x,
            y,
            width,
            height,
        } => match ctx.get_image_data(*x, *y, *width, *height) {
            Some(data) => log::info!(
                "getImageData({}, {}, {}, {}) = {}x{} ({} bytes)",
                x,
                y,
                width,
                height,
                data.width,
                data.height,
                data.data.len()
            ),
            None => log::info!("getImageData({}, {}, {}, {}) = none", x, y, width, height),
        },
        Command::PutImageData {
            image,
            dx,
            dy,
            dirty,
        } => match dirty {
            Some(d) => ctx.put_image_data_dirty(
                image,
                *dx,
                *dy,
                &DirtyRect {
                    x: d.x,
                    y: d.y,
                    width: d.width,
                    height: d.height,
                },
            ),
            None => ctx.put_image_data(image, *dx, *dy),
        },
        Command::DrawImageBuffer {
            image,
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
        } => ctx.draw_image_buffer(
            &image.as_image_ref(),
            &ImageCropParams {
                sx: *sx,
                sy: *sy,
                sw: *sw,
                sh: *sh,
                dx: *dx,
                dy: *dy,
                dw: *dw,
                dh: *dh,
            },
        ),
        Command::GetPixel { x, y } => match ctx.get_pixel(*x, *y) {
            Some(c) => log::info!("getPixel({}, {}) = [{}, {}, {}, {}]", x, y, c.r, c.g, c.b, c.a),
            None => log::info!("getPixel({}, {}) = none", x, y),
        },
    }
    Ok(())
}

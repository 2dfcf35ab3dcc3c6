//! Drawing surface that sizes its own output.
//!
//! Every primitive appends a markup fragment and widens the canvas extents
//! by the fragment's rendered footprint (stroke, rotation, and text anchor
//! included). `finalize` turns those extents into the document's viewBox.

use std::fmt::Write;

use crate::layout::ChartArea;
use crate::log::debug;
use crate::text_metrics::{TextBlock, TextMetrics};

use super::escape_xml;
use super::extents::Extents;
use super::path::PathBuilder;

/// Portion of the font size above the alphabetic baseline.
const ASCENT: f64 = 0.8;
/// Arrowhead reach, in stroke widths, past a marked line end.
const MARKER_REACH: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
    Hanging,
}

impl TextBaseline {
    /// Offsets of the glyph box top and bottom from the anchor y.
    fn vertical_span(self, font_size: f64) -> (f64, f64) {
        match self {
            TextBaseline::Alphabetic => (-ASCENT * font_size, (1.0 - ASCENT) * font_size),
            TextBaseline::Middle => (-font_size / 2.0, font_size / 2.0),
            TextBaseline::Hanging => (0.0, font_size),
        }
    }

    fn attr(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "",
            TextBaseline::Middle => " dominant-baseline=\"central\"",
            TextBaseline::Hanging => " dominant-baseline=\"hanging\"",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub fill: String,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
    pub bold: bool,
    /// Degrees, clockwise, about the anchor point.
    pub rotate: Option<f64>,
}

impl TextStyle {
    pub fn new(font_size: f64, fill: impl Into<String>) -> Self {
        Self {
            font_size,
            fill: fill.into(),
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            bold: false,
            rotate: None,
        }
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub dash: Option<String>,
    pub opacity: Option<f64>,
    pub marker_start: Option<String>,
    pub marker_end: Option<String>,
}

impl ShapeStyle {
    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Self {
            stroke: Some(color.into()),
            stroke_width: width,
            ..Default::default()
        }
    }

    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Default::default()
        }
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = width;
        self
    }

    pub fn with_dash(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_markers(mut self, start: Option<&MarkerId>, end: Option<&MarkerId>) -> Self {
        self.marker_start = start.map(|m| m.0.clone());
        self.marker_end = end.map(|m| m.0.clone());
        self
    }

    fn half_stroke(&self) -> f64 {
        if self.stroke.is_some() {
            self.stroke_width / 2.0
        } else {
            0.0
        }
    }

    fn attrs(&self) -> String {
        let mut out = String::new();
        let fill = self.fill.as_deref().map_or_else(|| "none".to_string(), escape_xml);
        let _ = write!(out, " fill=\"{fill}\"");
        if let Some(stroke) = &self.stroke {
            let _ = write!(
                out,
                " stroke=\"{}\" stroke-width=\"{:.2}\"",
                escape_xml(stroke),
                self.stroke_width
            );
        }
        if let Some(dash) = &self.dash {
            let _ = write!(out, " stroke-dasharray=\"{}\"", escape_xml(dash));
        }
        if let Some(opacity) = self.opacity {
            let _ = write!(out, " opacity=\"{opacity:.2}\"");
        }
        if let Some(id) = &self.marker_start {
            let _ = write!(out, " marker-start=\"url(#{id})\"");
        }
        if let Some(id) = &self.marker_end {
            let _ = write!(out, " marker-end=\"url(#{id})\"");
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate(f64, f64),
    /// Degrees clockwise about `(cx, cy)`.
    Rotate { degrees: f64, cx: f64, cy: f64 },
    Scale(f64, f64),
}

impl Transform {
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Transform::Translate(dx, dy) => (x + dx, y + dy),
            Transform::Rotate { degrees, cx, cy } => rotate_about(x, y, cx, cy, degrees),
            Transform::Scale(sx, sy) => (x * sx, y * sy),
        }
    }

    fn attr(&self) -> String {
        match *self {
            Transform::Translate(dx, dy) => format!("translate({dx:.2} {dy:.2})"),
            Transform::Rotate { degrees, cx, cy } => {
                format!("rotate({degrees:.2} {cx:.2} {cy:.2})")
            }
            Transform::Scale(sx, sy) => format!("scale({sx:.4} {sy:.4})"),
        }
    }
}

fn rotate_about(x: f64, y: f64, cx: f64, cy: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = x - cx;
    let dy = y - cy;
    (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
}

/// Handle to a registered clip path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipId(String);

/// Handle to a registered marker definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerId(String);

/// Handle to a gradient or pattern usable as a fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintId(String);

impl PaintId {
    pub fn fill_ref(&self) -> String {
        format!("url(#{})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendSwatch {
    Line { dashed: bool },
    Marker,
    Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub swatch: LegendSwatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub font_size: f64,
    pub text_color: String,
    pub background: String,
    pub border: String,
    pub swatch_size: f64,
    pub spacing: f64,
    pub padding: f64,
}

/// Terminal output of a canvas: body markup plus the padded view window.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedMarkup {
    /// `<defs>` and `<style>` first, then the drawn content.
    pub body: String,
    pub vb_min_x: f64,
    pub vb_min_y: f64,
    pub width: f64,
    pub height: f64,
    /// Byte length of the `<defs>`/`<style>` prefix of `body`.
    prelude_len: usize,
}

impl FinalizedMarkup {
    /// Wrap the body in a standalone root element sized to the view window.
    pub fn to_svg(&self, background: Option<&str>) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.2}\" height=\"{h:.2}\" viewBox=\"{x:.2} {y:.2} {w:.2} {h:.2}\">",
            x = self.vb_min_x,
            y = self.vb_min_y,
            w = self.width,
            h = self.height,
        );
        let (prelude, drawn) = self.body.split_at(self.prelude_len);
        svg.push_str(prelude);
        if let Some(fill) = background {
            let _ = write!(
                svg,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
                self.vb_min_x,
                self.vb_min_y,
                self.width,
                self.height,
                escape_xml(fill)
            );
        }
        svg.push_str(drawn);
        svg.push_str("</svg>");
        svg
    }

    pub fn view_extents(&self) -> Extents {
        Extents::from_rect(self.vb_min_x, self.vb_min_y, self.width, self.height)
    }
}

pub struct Canvas<'m> {
    metrics: &'m dyn TextMetrics,
    font_family: String,
    body: String,
    defs: Vec<String>,
    styles: Vec<String>,
    extents: Extents,
    next_id: usize,
}

impl<'m> Canvas<'m> {
    /// A canvas whose extents start out covering the logical chart rectangle.
    pub fn new(seed: &ChartArea, metrics: &'m dyn TextMetrics, font_family: &str) -> Self {
        Self {
            metrics,
            font_family: font_family.to_string(),
            body: String::new(),
            defs: Vec::new(),
            styles: Vec::new(),
            extents: Extents::from_rect(seed.left, seed.top, seed.width, seed.height),
            next_id: 0,
        }
    }

    pub fn metrics(&self) -> &'m dyn TextMetrics {
        self.metrics
    }

    /// Snapshot of the current extents.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    fn child(&self) -> Canvas<'m> {
        Canvas {
            metrics: self.metrics,
            font_family: self.font_family.clone(),
            body: String::new(),
            defs: Vec::new(),
            styles: Vec::new(),
            extents: Extents::empty(),
            next_id: self.next_id,
        }
    }

    fn absorb(&mut self, child: Canvas<'m>) -> (String, Extents) {
        self.defs.extend(child.defs);
        self.styles.extend(child.styles);
        self.next_id = child.next_id;
        (child.body, child.extents)
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let width = self.metrics.text_width(text, style.font_size);
        self.include_text_box(x, y, width, 0.0, style);
        let _ = write!(
            self.body,
            "<text x=\"{x:.2}\" y=\"{y:.2}\"{}>{}</text>",
            self.text_attrs(x, y, style),
            escape_xml(text)
        );
    }

    /// Measure `text` against `max_width`, draw it (one tspan per line,
    /// first baseline at `y`) and return the measured block.
    pub fn wrapped_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        max_width: f64,
        style: &TextStyle,
    ) -> TextBlock {
        let block = self.metrics.measure(text, max_width, style.font_size);
        self.text_lines(x, y, &block, style);
        block
    }

    pub fn text_lines(&mut self, x: f64, y: f64, block: &TextBlock, style: &TextStyle) {
        if block.is_empty() {
            return;
        }
        let line_height = self.metrics.line_height(style.font_size);
        let extra = (block.line_count() - 1) as f64 * line_height;
        self.include_text_box(x, y, block.width, extra, style);

        let _ = write!(
            self.body,
            "<text x=\"{x:.2}\" y=\"{y:.2}\"{}>",
            self.text_attrs(x, y, style)
        );
        for (idx, line) in block.lines.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_height };
            let _ = write!(
                self.body,
                "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                escape_xml(line)
            );
        }
        self.body.push_str("</text>");
    }

    fn text_attrs(&self, x: f64, y: f64, style: &TextStyle) -> String {
        let mut attrs = format!(
            " font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" text-anchor=\"{}\"{}",
            escape_xml(&self.font_family),
            style.font_size,
            escape_xml(&style.fill),
            style.anchor.as_str(),
            style.baseline.attr()
        );
        if style.bold {
            attrs.push_str(" font-weight=\"bold\"");
        }
        if let Some(deg) = style.rotate {
            let _ = write!(attrs, " transform=\"rotate({deg:.2} {x:.2} {y:.2})\"");
        }
        attrs
    }

    /// Widen extents by a text box of `width` whose last line sits
    /// `extra_height` below the first, rotated about the anchor.
    fn include_text_box(&mut self, x: f64, y: f64, width: f64, extra_height: f64, style: &TextStyle) {
        let (x0, x1) = match style.anchor {
            TextAnchor::Start => (x, x + width),
            TextAnchor::Middle => (x - width / 2.0, x + width / 2.0),
            TextAnchor::End => (x - width, x),
        };
        let (top, bottom) = style.baseline.vertical_span(style.font_size);
        let (y0, y1) = (y + top, y + extra_height + bottom);
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        for (cx, cy) in corners {
            let (px, py) = match style.rotate {
                Some(deg) => rotate_about(cx, cy, x, y, deg),
                None => (cx, cy),
            };
            self.extents.include_point(px, py);
        }
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &ShapeStyle) {
        let mut pad = style.half_stroke();
        if style.marker_start.is_some() || style.marker_end.is_some() {
            pad = pad.max(style.stroke_width * MARKER_REACH);
        }
        self.extents.include_padded(x1, y1, pad);
        self.extents.include_padded(x2, y2, pad);
        let _ = write!(
            self.body,
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\"{}/>",
            style.attrs()
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &ShapeStyle) {
        self.extents.include_padded(cx, cy, r + style.half_stroke());
        let _ = write!(
            self.body,
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\"{}/>",
            style.attrs()
        );
    }

    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, style: &ShapeStyle) {
        let pad = style.half_stroke();
        self.extents
            .include_rect(cx - rx - pad, cy - ry - pad, cx + rx + pad, cy + ry + pad);
        let _ = write!(
            self.body,
            "<ellipse cx=\"{cx:.2}\" cy=\"{cy:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\"{}/>",
            style.attrs()
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: &ShapeStyle) {
        self.rounded_rect(x, y, width, height, 0.0, style);
    }

    pub fn rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        style: &ShapeStyle,
    ) {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        let pad = style.half_stroke();
        self.extents
            .include_rect(x - pad, y - pad, x + width + pad, y + height + pad);
        let _ = write!(
            self.body,
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\""
        );
        if radius > 0.0 {
            let _ = write!(self.body, " rx=\"{radius:.2}\" ry=\"{radius:.2}\"");
        }
        let _ = write!(self.body, "{}/>", style.attrs());
    }

    pub fn path(&mut self, path: &PathBuilder, style: &ShapeStyle) {
        if path.is_empty() {
            return;
        }
        let pad = style.half_stroke();
        for &(x, y) in path.points() {
            self.extents.include_padded(x, y, pad);
        }
        let _ = write!(self.body, "<path d=\"{}\"{}/>", path.data(), style.attrs());
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], style: &ShapeStyle) {
        self.poly("polygon", points, style);
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &ShapeStyle) {
        self.poly("polyline", points, style);
    }

    fn poly(&mut self, tag: &str, points: &[(f64, f64)], style: &ShapeStyle) {
        if points.is_empty() {
            return;
        }
        let pad = style.half_stroke();
        let mut encoded = String::new();
        for (idx, &(x, y)) in points.iter().enumerate() {
            self.extents.include_padded(x, y, pad);
            if idx > 0 {
                encoded.push(' ');
            }
            let _ = write!(encoded, "{x:.2},{y:.2}");
        }
        let _ = write!(self.body, "<{tag} points=\"{encoded}\"{}/>", style.attrs());
    }

    pub fn image(&mut self, href: &str, x: f64, y: f64, width: f64, height: f64) {
        self.extents.include_rect(x, y, x + width, y + height);
        let _ = write!(
            self.body,
            "<image href=\"{}\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\"/>",
            escape_xml(href)
        );
    }

    /// Embed XHTML content in a fixed box. `xhtml` is inserted verbatim.
    pub fn foreign_object(&mut self, x: f64, y: f64, width: f64, height: f64, xhtml: &str) {
        self.extents.include_rect(x, y, x + width, y + height);
        let _ = write!(
            self.body,
            "<foreignObject x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\"><div xmlns=\"http://www.w3.org/1999/xhtml\">{xhtml}</div></foreignObject>"
        );
    }

    /// Draw a legend block with its top-left corner at `(x, y)` and return
    /// the block's rectangle.
    pub fn legend(
        &mut self,
        x: f64,
        y: f64,
        entries: &[LegendEntry],
        style: &LegendStyle,
    ) -> ChartArea {
        if entries.is_empty() {
            return ChartArea::new(x, y, 0.0, 0.0);
        }
        let line_height = self.metrics.line_height(style.font_size);
        let row_height = style.swatch_size.max(line_height);
        let label_width = entries
            .iter()
            .map(|entry| self.metrics.text_width(&entry.label, style.font_size))
            .fold(0.0, f64::max);
        let width = style.padding * 2.0 + style.swatch_size + style.spacing + label_width;
        let height = style.padding * 2.0
            + entries.len() as f64 * row_height
            + (entries.len() - 1) as f64 * style.spacing;

        self.body.push_str("<g class=\"legend\">");
        self.rounded_rect(
            x,
            y,
            width,
            height,
            4.0,
            &ShapeStyle::fill(style.background.clone()).with_stroke(style.border.clone(), 1.0),
        );
        let text_style = TextStyle::new(style.font_size, style.text_color.clone())
            .baseline(TextBaseline::Middle);
        for (idx, entry) in entries.iter().enumerate() {
            let row_top = y + style.padding + idx as f64 * (row_height + style.spacing);
            let mid = row_top + row_height / 2.0;
            let sx = x + style.padding;
            let size = style.swatch_size;
            match entry.swatch {
                LegendSwatch::Line { dashed } => {
                    let mut line = ShapeStyle::stroke(entry.color.clone(), 2.0);
                    if dashed {
                        line = line.with_dash("4 3");
                    }
                    self.line(sx, mid, sx + size, mid, &line);
                }
                LegendSwatch::Marker => {
                    self.circle(sx + size / 2.0, mid, size / 3.0, &ShapeStyle::fill(entry.color.clone()));
                }
                LegendSwatch::Block => {
                    self.rect(sx, mid - size / 2.0, size, size, &ShapeStyle::fill(entry.color.clone()));
                }
            }
            self.text(sx + size + style.spacing, mid, &entry.label, &text_style);
        }
        self.body.push_str("</g>");
        ChartArea::new(x, y, width, height)
    }

    /// Insert raw markup into `<defs>`.
    pub fn add_def(&mut self, def: impl Into<String>) {
        self.defs.push(def.into());
    }

    /// Insert raw CSS into the document's `<style>` block.
    pub fn add_style(&mut self, css: impl Into<String>) {
        self.styles.push(css.into());
    }

    /// Draw into a `<g transform>` group; nested extents are mapped through
    /// the transform before widening this canvas.
    pub fn with_transform<R>(&mut self, transform: Transform, draw: impl FnOnce(&mut Canvas<'m>) -> R) -> R {
        let mut child = self.child();
        let result = draw(&mut child);
        let (body, extents) = self.absorb(child);
        if !extents.is_empty() {
            for (x, y) in extents.corners() {
                let (tx, ty) = transform.apply(x, y);
                self.extents.include_point(tx, ty);
            }
        }
        let _ = write!(self.body, "<g transform=\"{}\">{body}</g>", transform.attr());
        result
    }

    pub fn register_clip_rect(&mut self, area: &ChartArea) -> ClipId {
        let id = self.fresh_id("clip");
        self.add_def(format!(
            "<clipPath id=\"{id}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
            area.left, area.top, area.width, area.height
        ));
        ClipId(id)
    }

    /// Draw cropped to a registered clip path. Content drawn here does not
    /// widen the extents: it is cropped to the clip rectangle, which the
    /// caller already sized the chart around.
    pub fn draw_in_clipped_region<R>(&mut self, clip: &ClipId, draw: impl FnOnce(&mut Canvas<'m>) -> R) -> R {
        let mut child = self.child();
        let result = draw(&mut child);
        let (body, _cropped) = self.absorb(child);
        let _ = write!(self.body, "<g clip-path=\"url(#{})\">{body}</g>", clip.0);
        result
    }

    pub fn arrow_marker(&mut self, color: &str) -> MarkerId {
        let id = self.fresh_id("arrow");
        let color = escape_xml(color);
        self.add_def(format!(
            "<marker id=\"{id}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{color}\"/></marker>"
        ));
        MarkerId(id)
    }

    /// Linear gradient from `stops` (offset in 0..=1, color), top to bottom
    /// when `vertical`, else left to right.
    pub fn linear_gradient(&mut self, stops: &[(f64, &str)], vertical: bool) -> PaintId {
        let id = self.fresh_id("gradient");
        let (x2, y2) = if vertical { ("0", "1") } else { ("1", "0") };
        let mut def = format!("<linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"{x2}\" y2=\"{y2}\">");
        for (offset, color) in stops {
            let _ = write!(
                def,
                "<stop offset=\"{:.2}\" stop-color=\"{}\"/>",
                offset.clamp(0.0, 1.0),
                escape_xml(color)
            );
        }
        def.push_str("</linearGradient>");
        self.add_def(def);
        PaintId(id)
    }

    pub fn hatch_pattern(&mut self, color: &str, spacing: f64) -> PaintId {
        let id = self.fresh_id("hatch");
        let s = spacing.max(1.0);
        let color = escape_xml(color);
        self.add_def(format!(
            "<pattern id=\"{id}\" patternUnits=\"userSpaceOnUse\" width=\"{s:.2}\" height=\"{s:.2}\" patternTransform=\"rotate(45)\"><line x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{s:.2}\" stroke=\"{color}\" stroke-width=\"2\"/></pattern>"
        ));
        PaintId(id)
    }

    /// Consume the canvas into its markup and the view window covering
    /// everything drawn, padded by `pad` on every side.
    pub fn finalize(self, pad: f64) -> FinalizedMarkup {
        let extents = self.extents;
        let pad = pad.max(0.0);
        let vb_min_x = extents.min_x - pad;
        let vb_min_y = extents.min_y - pad;
        let width = extents.width() + pad * 2.0;
        let height = extents.height() + pad * 2.0;
        debug!(vb_min_x, vb_min_y, width, height, "canvas finalized");

        let mut body = String::new();
        if !self.defs.is_empty() {
            body.push_str("<defs>");
            for def in &self.defs {
                body.push_str(def);
            }
            body.push_str("</defs>");
        }
        if !self.styles.is_empty() {
            body.push_str("<style>");
            body.push_str(&self.styles.join("\n"));
            body.push_str("</style>");
        }
        let prelude_len = body.len();
        body.push_str(&self.body);

        FinalizedMarkup {
            body,
            vb_min_x,
            vb_min_y,
            width,
            height,
            prelude_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::HeuristicMetrics;
    use proptest::prelude::*;

    fn area() -> ChartArea {
        ChartArea::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn empty_canvas_finalizes_to_padded_chart_area() {
        let metrics = HeuristicMetrics::default();
        let canvas = Canvas::new(&area(), &metrics, "sans-serif");
        let out = canvas.finalize(10.0);
        assert_eq!((out.vb_min_x, out.vb_min_y), (-10.0, -10.0));
        assert_eq!((out.width, out.height), (220.0, 120.0));
    }

    #[test]
    fn stroke_width_widens_extents() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        canvas.line(0.0, 150.0, 10.0, 150.0, &ShapeStyle::stroke("#000", 4.0));
        assert_eq!(canvas.extents().max_y, 152.0);
    }

    #[test]
    fn text_anchor_and_baseline_shape_the_footprint() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        // 4 chars * 10 * 0.6 = 24 wide, right-anchored at x = -5.
        let style = TextStyle::new(10.0, "#000")
            .anchor(TextAnchor::End)
            .baseline(TextBaseline::Hanging);
        canvas.text(-5.0, 120.0, "abcd", &style);
        let ext = canvas.extents();
        assert!((ext.min_x - -29.0).abs() < 1e-9);
        assert!((ext.max_y - 130.0).abs() < 1e-9);
    }

    #[test]
    fn rotated_text_footprint_is_rotated() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        // Rotated -90 degrees about (-20, 50): the 60px run extends upwards.
        let style = TextStyle::new(10.0, "#000")
            .anchor(TextAnchor::Start)
            .baseline(TextBaseline::Middle)
            .rotate(-90.0);
        canvas.text(-20.0, 50.0, "abcdefghij", &style);
        let ext = canvas.extents();
        assert!((ext.min_x - -25.0).abs() < 1e-6);
        assert!((ext.min_y - -10.0).abs() < 1e-6);
        assert!(canvas.body.contains("rotate(-90.00 -20.00 50.00)"));
    }

    #[test]
    fn clipped_content_does_not_change_output_size() {
        let metrics = HeuristicMetrics::default();
        let mut plain = Canvas::new(&area(), &metrics, "sans-serif");
        let clip = plain.register_clip_rect(&area());
        let baseline = {
            let mut reference = Canvas::new(&area(), &metrics, "sans-serif");
            let _ = reference.register_clip_rect(&area());
            reference.finalize(5.0)
        };
        plain.draw_in_clipped_region(&clip, |c| {
            c.line(-1000.0, -1000.0, 5000.0, 5000.0, &ShapeStyle::stroke("#f00", 2.0));
            c.circle(9000.0, 9000.0, 50.0, &ShapeStyle::fill("#f00"));
        });
        let out = plain.finalize(5.0);
        assert_eq!((out.width, out.height), (baseline.width, baseline.height));
        assert!(out.body.contains("clip-path=\"url(#clip-0)\""));
        assert!(out.body.contains("<clipPath id=\"clip-0\">"));
    }

    #[test]
    fn transformed_content_maps_extents() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        canvas.with_transform(Transform::Translate(300.0, 0.0), |c| {
            c.rect(0.0, 0.0, 10.0, 10.0, &ShapeStyle::fill("#000"));
        });
        assert_eq!(canvas.extents().max_x, 310.0);
        assert!(canvas.body.contains("<g transform=\"translate(300.00 0.00)\">"));
    }

    #[test]
    fn defs_and_styles_precede_body() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        let marker = canvas.arrow_marker("#333");
        canvas.add_style(".axis { shape-rendering: crispEdges; }");
        canvas.line(
            0.0,
            0.0,
            50.0,
            0.0,
            &ShapeStyle::stroke("#333", 1.0).with_markers(None, Some(&marker)),
        );
        let out = canvas.finalize(0.0);
        let defs = out.body.find("<defs>").unwrap();
        let style = out.body.find("<style>").unwrap();
        let line = out.body.find("<line").unwrap();
        assert!(defs < style && style < line);
        assert!(out.body.contains("marker-end=\"url(#arrow-0)\""));
    }

    #[test]
    fn remaining_primitives_widen_extents() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        canvas.ellipse(250.0, 50.0, 20.0, 10.0, &ShapeStyle::stroke("#000", 2.0));
        assert_eq!(canvas.extents().max_x, 271.0);
        canvas.polygon(
            &[(0.0, 0.0), (10.0, -40.0), (20.0, 0.0)],
            &ShapeStyle::fill("#0a0").with_opacity(0.5),
        );
        assert_eq!(canvas.extents().min_y, -40.0);
        canvas.image("data:image/png;base64,AAAA", -30.0, 10.0, 20.0, 20.0);
        assert_eq!(canvas.extents().min_x, -30.0);
        canvas.foreign_object(0.0, 100.0, 50.0, 25.0, "<b>note</b>");
        assert_eq!(canvas.extents().max_y, 125.0);

        let body = canvas.finalize(0.0).body;
        assert!(body.contains("<ellipse cx=\"250.00\""));
        assert!(body.contains("<polygon points=\"0.00,0.00 10.00,-40.00 20.00,0.00\" fill=\"#0a0\" opacity=\"0.50\"/>"));
        assert!(body.contains("<image href=\"data:image/png;base64,AAAA\""));
        assert!(body.contains("<div xmlns=\"http://www.w3.org/1999/xhtml\"><b>note</b></div>"));
    }

    #[test]
    fn quoted_colors_stay_inside_their_attributes() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        let hostile = "red\" onmouseover=\"alert(1)";
        canvas.line(0.0, 0.0, 10.0, 10.0, &ShapeStyle::stroke(hostile, 1.0));
        canvas.rect(0.0, 0.0, 5.0, 5.0, &ShapeStyle::fill(hostile));
        canvas.text(0.0, 0.0, "x", &TextStyle::new(10.0, hostile));
        let marker = canvas.arrow_marker(hostile);
        let _ = canvas.linear_gradient(&[(0.0, hostile), (1.0, "#fff")], true);
        let _ = canvas.hatch_pattern(hostile, 6.0);
        canvas.line(0.0, 0.0, 1.0, 0.0, &ShapeStyle::stroke("#000", 1.0).with_markers(None, Some(&marker)));

        let svg = canvas.finalize(0.0).to_svg(Some("#fff\" onload=\"x"));
        assert!(!svg.contains("onmouseover=\""));
        assert!(!svg.contains("onload=\""));
        assert!(svg.contains("stroke=\"red&quot; onmouseover=&quot;alert(1)\""));
        assert!(svg.contains("stop-color=\"red&quot; onmouseover=&quot;alert(1)\""));
    }

    #[test]
    fn background_follows_defs() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        let clip = canvas.register_clip_rect(&area());
        canvas.draw_in_clipped_region(&clip, |c| c.circle(5.0, 5.0, 2.0, &ShapeStyle::fill("#000")));
        let svg = canvas.finalize(10.0).to_svg(Some("#abcdef"));
        let defs_end = svg.find("</defs>").unwrap();
        let background = svg.find("fill=\"#abcdef\"").unwrap();
        let drawn = svg.find("<g clip-path").unwrap();
        assert!(defs_end < background && background < drawn);
        assert!(svg.contains("viewBox=\"-10.00 -10.00 220.00 120.00\"><defs>"));
    }

    #[test]
    fn legend_reports_its_rectangle() {
        let metrics = HeuristicMetrics::default();
        let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
        let style = LegendStyle {
            font_size: 10.0,
            text_color: "#000".into(),
            background: "#fff".into(),
            border: "#ccc".into(),
            swatch_size: 12.0,
            spacing: 6.0,
            padding: 8.0,
        };
        let entries = vec![
            LegendEntry {
                label: "Trend".into(),
                color: "#f00".into(),
                swatch: LegendSwatch::Line { dashed: false },
            },
            LegendEntry {
                label: "Reference".into(),
                color: "#00f".into(),
                swatch: LegendSwatch::Line { dashed: true },
            },
        ];
        let rect = canvas.legend(220.0, 0.0, &entries, &style);
        // 9 chars * 6 = 54 label width.
        assert!((rect.width - (16.0 + 12.0 + 6.0 + 54.0)).abs() < 1e-9);
        assert!(canvas.extents().max_x >= rect.right());
    }

    #[test]
    fn svg_root_carries_view_window() {
        let metrics = HeuristicMetrics::default();
        let canvas = Canvas::new(&area(), &metrics, "sans-serif");
        let svg = canvas.finalize(10.0).to_svg(Some("#fff"));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"220.00\" height=\"120.00\" viewBox=\"-10.00 -10.00 220.00 120.00\">"));
        assert!(svg.ends_with("</svg>"));
    }

    proptest! {
        #[test]
        fn finalized_view_contains_everything_drawn(
            circles in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0, 0.5f64..40.0), 0..12),
            pad in 0.0f64..30.0,
        ) {
            let metrics = HeuristicMetrics::default();
            let mut canvas = Canvas::new(&area(), &metrics, "sans-serif");
            let mut drawn = Extents::from_rect(0.0, 0.0, 200.0, 100.0);
            for &(cx, cy, r) in &circles {
                canvas.circle(cx, cy, r, &ShapeStyle::stroke("#000", 2.0));
                drawn.include_padded(cx, cy, r + 1.0);
            }
            let out = canvas.finalize(pad);
            prop_assert!(out.view_extents().contains_rect(&drawn, 1e-6));
            prop_assert!((out.width - (drawn.width() + 2.0 * pad)).abs() < 1e-6);
        }
    }
}

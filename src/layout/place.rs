use crate::backend::TextMeasurer;
use crate::config::{Align, LineHeight, RenderConfig, VAlign};

/// A line of text and the point it is drawn from
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlacedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Where every line goes, and how tall the canvas has to be to hold them
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LayoutResult {
    /// Total canvas height in pixels
    pub height: u32,
    /// The resolved distance between consecutive lines
    pub line_height: u32,
    /// Lines in reading order, top to bottom
    pub lines: Vec<PlacedLine>,
}

/// Resolve the configured line height against the natural line height of the font.
/// [LineHeight::Auto] is one and a half times the natural height, rounded.
pub fn resolve_line_height(line_height: LineHeight, base_metric: u32) -> u32 {
    match line_height {
        LineHeight::Pixels(px) => px,
        LineHeight::Auto => (base_metric as f32 * 1.5).round() as u32,
    }
}

/// Height of a canvas holding `line_count` lines plus padding above and below
pub fn canvas_height(line_count: usize, line_height: u32, padding: u32) -> u32 {
    line_count as u32 * line_height + 2 * padding
}

/// The draw anchor of the first line. `baseline_offset` moves the anchor down from the
/// top of the line for backends that draw from the baseline.
pub fn vertical_start(
    valign: VAlign,
    height: u32,
    text_height: u32,
    padding: u32,
    baseline_offset: i32,
) -> i32 {
    let (height, text_height, padding) = (height as i32, text_height as i32, padding as i32);
    match valign {
        VAlign::Top => padding + baseline_offset,
        VAlign::Middle => (height - text_height) / 2 + baseline_offset,
        VAlign::Bottom => height - text_height - padding + baseline_offset,
    }
}

/// The left edge of a line `line_width` pixels wide. Centred lines ignore the padding
/// and are centred on the whole canvas.
pub fn horizontal_start(align: Align, width: u32, line_width: u32, padding: u32) -> i32 {
    let (width, line_width, padding) = (width as i32, line_width as i32, padding as i32);
    match align {
        Align::Left => padding,
        Align::Center => (width - line_width) / 2,
        Align::Right => width - line_width - padding,
    }
}

/// Place wrapped lines on the canvas. Lines are trimmed of surrounding whitespace before
/// they are measured for alignment.
pub fn layout<M: TextMeasurer + ?Sized>(
    lines: &[String],
    measurer: &M,
    config: &RenderConfig,
) -> LayoutResult {
    let padding = config.padding();
    let line_height = resolve_line_height(config.line_height(), measurer.line_metric());
    let height = canvas_height(lines.len(), line_height, padding);
    let text_height = lines.len() as u32 * line_height;

    let mut y = vertical_start(
        config.valign(),
        height,
        text_height,
        padding,
        config.mode().baseline_offset(),
    );

    let mut placed = Vec::with_capacity(lines.len());
    for line in lines {
        let text = line.trim();
        let x = match config.align() {
            Align::Left => padding as i32,
            align => horizontal_start(align, config.width(), measurer.measure_width(text), padding),
        };
        placed.push(PlacedLine {
            text: text.to_string(),
            x,
            y,
        });
        y += line_height as i32;
    }

    log::debug!(
        "laid out {} lines at {line_height}px on a {}x{height} canvas",
        placed.len(),
        config.width()
    );

    LayoutResult {
        height,
        line_height,
        lines: placed,
    }
}

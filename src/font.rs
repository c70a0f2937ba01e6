use crate::backend::{blend_pixel, TextMeasurer, TextPainter};
use crate::TextImageError;
use ab_glyph_rasterizer::{point, Point, Rasterizer};
use image::{Rgba, RgbaImage};
use owned_ttf_parser::{AsFaceRef, GlyphId, OutlineBuilder, OwnedFace};
use std::path::Path;

/// A parsed font object. Fonts can be TTF or OTF fonts and are used in smart mode to
/// measure and draw text at arbitrary sizes and angles.
///
/// Fonts are loaded per render and dropped once the render is finished.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, TextImageError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    /// Read and parse a font file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Font, TextImageError> {
        let bytes = std::fs::read(path.as_ref())?;
        Font::load(bytes)
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self, size: f32) -> f32 {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: f32) -> f32 {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: f32) -> f32 {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: f32) -> f32 {
        let leading = self.scaling(size) * self.face.as_face_ref().line_gap() as f32;
        leading + self.ascent(size) - self.descent(size)
    }

    /// Find the glyph for a character, falling back to the replacement character and
    /// then to a question mark
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }

    /// Calculate the unrotated advance width of a string of text at the given size
    pub fn width_of_text(&self, text: &str, size: f32) -> f32 {
        let scaling = self.scaling(size);
        text.chars()
            .filter_map(|ch| self.glyph_id(ch))
            .map(|gid| {
                scaling * self.face.as_face_ref().glyph_hor_advance(gid).unwrap_or_default() as f32
            })
            .sum()
    }

    /// The horizontal extent of the text's bounding box once rotated counter-clockwise
    /// by `angle` degrees about its baseline origin
    pub fn bbox_width(&self, text: &str, size: f32, angle: f32) -> f32 {
        let (sin, cos) = angle.to_radians().sin_cos();
        let width = self.width_of_text(text, size);
        let height = self.ascent(size) - self.descent(size);
        (width * cos - height * sin).abs()
    }
}

/// A [Font] at a fixed size and angle, as used by smart mode
pub struct OutlineFont {
    pub font: Font,
    pub size: u32,
    /// Counter-clockwise rotation in degrees
    pub angle: f32,
}

impl OutlineFont {
    pub fn new(font: Font, size: u32, angle: f32) -> OutlineFont {
        OutlineFont { font, size, angle }
    }
}

impl TextMeasurer for OutlineFont {
    fn measure_width(&self, text: &str) -> u32 {
        self.font
            .bbox_width(text, self.size as f32, self.angle)
            .round() as u32
    }

    fn line_metric(&self) -> u32 {
        self.size
    }
}

impl TextPainter for OutlineFont {
    /// Draws with `(x, y)` as the origin of the first glyph's baseline
    fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>, text: &str) {
        let face = self.font.face.as_face_ref();
        let size = self.size as f32;
        let scaling = self.font.scaling(size);
        let (sin, cos) = self.angle.to_radians().sin_cos();

        let mut outline = Outline::default();
        let mut pen = 0.0f32;
        for gid in text.chars().filter_map(|ch| self.font.glyph_id(ch)) {
            outline.transform = GlyphTransform {
                origin: (x as f32, y as f32),
                pen,
                scaling,
                sin,
                cos,
            };
            // glyphs without an outline (spaces) still advance the pen
            face.outline_glyph(gid, &mut outline);
            pen += scaling * face.glyph_hor_advance(gid).unwrap_or_default() as f32;
        }

        outline.fill(canvas, colour);
    }
}

/// Maps a point in font units of the current glyph onto canvas pixels
#[derive(Copy, Clone, Default)]
struct GlyphTransform {
    origin: (f32, f32),
    /// distance along the baseline to the current glyph, in pixels
    pen: f32,
    scaling: f32,
    sin: f32,
    cos: f32,
}

impl GlyphTransform {
    fn apply(&self, x: f32, y: f32) -> Point {
        // font units are y-up, canvas pixels are y-down
        let lx = self.pen + x * self.scaling;
        let ly = y * self.scaling;
        point(
            self.origin.0 + lx * self.cos - ly * self.sin,
            self.origin.1 - (lx * self.sin + ly * self.cos),
        )
    }
}

#[derive(Copy, Clone)]
enum Segment {
    Line(Point, Point),
    Quad(Point, Point, Point),
    Cubic(Point, Point, Point, Point),
}

impl Segment {
    fn points(&self) -> Vec<Point> {
        match *self {
            Segment::Line(p0, p1) => vec![p0, p1],
            Segment::Quad(p0, p1, p2) => vec![p0, p1, p2],
            Segment::Cubic(p0, p1, p2, p3) => vec![p0, p1, p2, p3],
        }
    }

    fn ends(&self) -> (Point, Point) {
        match *self {
            Segment::Line(p0, p1) | Segment::Quad(p0, _, p1) | Segment::Cubic(p0, _, _, p1) => {
                (p0, p1)
            }
        }
    }

    fn map(&self, f: impl Fn(Point) -> Point) -> Segment {
        match *self {
            Segment::Line(p0, p1) => Segment::Line(f(p0), f(p1)),
            Segment::Quad(p0, p1, p2) => Segment::Quad(f(p0), f(p1), f(p2)),
            Segment::Cubic(p0, p1, p2, p3) => Segment::Cubic(f(p0), f(p1), f(p2), f(p3)),
        }
    }

    /// Approximate the segment with a polyline, from its first point to its last
    fn flatten(&self) -> Vec<Point> {
        let points = self.points();
        let length: f32 = points
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum();
        let steps = match self {
            Segment::Line(..) => 1,
            _ => (length.sqrt().ceil() as usize).clamp(1, 64),
        };

        (0..=steps)
            .map(|i| {
                let t = i as f32 / steps as f32;
                let mt = 1.0 - t;
                let weights = match points.len() {
                    2 => vec![mt, t],
                    3 => vec![mt * mt, 2.0 * mt * t, t * t],
                    _ => vec![mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t],
                };
                points
                    .iter()
                    .zip(weights)
                    .fold(point(0.0, 0.0), |acc, (p, w)| point(acc.x + p.x * w, acc.y + p.y * w))
            })
            .collect()
    }
}

/// The part of the canvas an outline is rasterized into, with its top-left corner at
/// the origin.
///
/// Coverage accumulates left to right along each row, so edges can't simply be
/// dropped: edges left or right of the window are pushed onto its borders, which
/// keeps every row inside the window exact. Edges above or below it touch no rows
/// and are skipped.
struct Clip {
    width: f32,
    height: f32,
}

impl Clip {
    fn draw(&self, rasterizer: &mut Rasterizer, segment: Segment) {
        let points = segment.points();
        let (min_x, max_x) = extent(points.iter().map(|p| p.x));
        let (min_y, max_y) = extent(points.iter().map(|p| p.y));
        if max_y <= 0.0 || min_y >= self.height {
            return;
        }

        // only the vertical travel of an edge beyond the left or right border matters
        let (start, end) = segment.ends();
        if max_x <= 0.0 || min_x >= self.width {
            let x = if max_x <= 0.0 { 0.0 } else { self.width };
            self.draw_line(rasterizer, point(x, start.y), point(x, end.y));
            return;
        }

        if min_x >= 0.0 && max_x <= self.width && min_y >= 0.0 && max_y <= self.height {
            match segment {
                Segment::Line(p0, p1) => rasterizer.draw_line(p0, p1),
                Segment::Quad(p0, p1, p2) => rasterizer.draw_quad(p0, p1, p2),
                Segment::Cubic(p0, p1, p2, p3) => rasterizer.draw_cubic(p0, p1, p2, p3),
            }
            return;
        }

        for pair in segment.flatten().windows(2) {
            self.draw_line(rasterizer, pair[0], pair[1]);
        }
    }

    /// Draw the part of a line that crosses the window's rows, pushing whatever lies
    /// left or right of the window onto the nearest border
    fn draw_line(&self, rasterizer: &mut Rasterizer, p0: Point, p1: Point) {
        let dy = p1.y - p0.y;
        if dy == 0.0 {
            return;
        }
        let dxdy = (p1.x - p0.x) / dy;

        let (lo, hi) = extent([p0.y, p1.y].into_iter());
        let (lo, hi) = (lo.max(0.0), hi.min(self.height));
        if lo >= hi {
            return;
        }

        // split wherever the line crosses the left or right border
        let mut cuts = vec![lo, hi];
        if dxdy != 0.0 {
            for edge in [0.0, self.width] {
                let y = p0.y + (edge - p0.x) / dxdy;
                if y > lo && y < hi {
                    cuts.push(y);
                }
            }
        }
        cuts.sort_by(f32::total_cmp);
        if dy < 0.0 {
            cuts.reverse();
        }

        let at = |y: f32| point((p0.x + (y - p0.y) * dxdy).clamp(0.0, self.width), y);
        for pair in cuts.windows(2) {
            rasterizer.draw_line(at(pair[0]), at(pair[1]));
        }
    }
}

fn extent(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Collects the outlines of a run of glyphs, already transformed into canvas space
#[derive(Default)]
struct Outline {
    transform: GlyphTransform,
    segments: Vec<Segment>,
    start: Option<Point>,
    last: Option<Point>,
}

impl Outline {
    fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.segments.iter().flat_map(Segment::points);

        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                point(min.x.min(p.x), min.y.min(p.y)),
                point(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }

    /// Blend the filled outline into the canvas. Only the part of the outline that
    /// lands on the canvas is rasterized.
    fn fill(&self, canvas: &mut RgbaImage, colour: Rgba<u8>) {
        let Some((min, max)) = self.bounds() else {
            return;
        };

        let left = min.x.floor().max(0.0);
        let top = min.y.floor().max(0.0);
        let right = (max.x.ceil() + 1.0).min(canvas.width() as f32);
        let bottom = (max.y.ceil() + 1.0).min(canvas.height() as f32);
        if right <= left || bottom <= top {
            return;
        }

        let clip = Clip {
            width: right - left,
            height: bottom - top,
        };
        let width = clip.width as usize;
        // two spare columns hold the edges pushed onto the right border
        let mut rasterizer = Rasterizer::new(width + 2, clip.height as usize);
        for segment in self.segments.iter() {
            let shifted = segment.map(|p| point(p.x - left, p.y - top));
            clip.draw(&mut rasterizer, shifted);
        }

        rasterizer.for_each_pixel_2d(|px, py, coverage| {
            if (px as usize) < width {
                blend_pixel(
                    canvas,
                    left as i32 + px as i32,
                    top as i32 + py as i32,
                    colour,
                    coverage,
                );
            }
        });
    }
}

impl OutlineBuilder for Outline {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(x, y);
        self.start = Some(p);
        self.last = Some(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.transform.apply(x, y);
        if let Some(last) = self.last {
            self.segments.push(Segment::Line(last, p));
        }
        self.last = Some(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.transform.apply(x1, y1);
        let p = self.transform.apply(x, y);
        if let Some(last) = self.last {
            self.segments.push(Segment::Quad(last, c, p));
        }
        self.last = Some(p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.transform.apply(x1, y1);
        let c2 = self.transform.apply(x2, y2);
        let p = self.transform.apply(x, y);
        if let Some(last) = self.last {
            self.segments.push(Segment::Cubic(last, c1, c2, p));
        }
        self.last = Some(p);
    }

    fn close(&mut self) {
        if let (Some(start), Some(last)) = (self.start, self.last) {
            if start != last {
                self.segments.push(Segment::Line(last, start));
            }
        }
        self.last = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn garbage_bytes_are_not_a_font() {
        let result = Font::load(b"definitely not a font".to_vec());
        assert!(matches!(result, Err(TextImageError::FontParsing(_))));
    }

    #[test_log::test]
    fn missing_files_are_io_errors() {
        let result = Font::from_path("/no/such/font.ttf");
        assert!(matches!(result, Err(TextImageError::Io(_))));
    }

    #[test_log::test]
    fn transform_rotates_counter_clockwise() {
        let t = GlyphTransform {
            origin: (10.0, 10.0),
            pen: 0.0,
            scaling: 1.0,
            sin: 1.0,
            cos: 0.0,
        };
        // a quarter turn sends a point along the baseline straight up the canvas
        let p = t.apply(5.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-4);
        assert!((p.y - 5.0).abs() < 1e-4);
    }

    #[test_log::test]
    fn outlines_are_closed() {
        let mut outline = Outline {
            transform: GlyphTransform {
                scaling: 1.0,
                cos: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        outline.move_to(0.0, 0.0);
        outline.line_to(4.0, 0.0);
        outline.line_to(4.0, 4.0);
        outline.close();
        assert_eq!(outline.segments.len(), 3);

        let (min, max) = outline.bounds().expect("outline has points");
        assert_eq!((min.x, min.y), (0.0, -4.0));
        assert_eq!((max.x, max.y), (4.0, 0.0));
    }

    /// A closed axis-aligned rectangle in canvas space
    fn rectangle(x0: f32, y0: f32, x1: f32, y1: f32) -> Outline {
        let corners = [point(x0, y0), point(x1, y0), point(x1, y1), point(x0, y1)];
        Outline {
            segments: (0..4)
                .map(|i| Segment::Line(corners[i], corners[(i + 1) % 4]))
                .collect(),
            ..Default::default()
        }
    }

    const INK: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const PAPER: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test_log::test]
    fn fills_shapes_on_the_canvas() {
        let mut canvas = RgbaImage::from_pixel(10, 10, PAPER);
        rectangle(2.0, 3.0, 6.0, 8.0).fill(&mut canvas, INK);

        for (x, y, pixel) in canvas.enumerate_pixels() {
            let inside = (2..6).contains(&x) && (3..8).contains(&y);
            assert_eq!(*pixel, if inside { INK } else { PAPER }, "pixel ({x}, {y})");
        }
    }

    #[test_log::test]
    fn huge_shapes_only_rasterize_the_canvas() {
        // without clipping these would need billions of coverage cells
        let mut canvas = RgbaImage::from_pixel(10, 10, PAPER);
        rectangle(-1.0e6, -1.0e6, 5.0, 5.0).fill(&mut canvas, INK);
        rectangle(7.0, 7.0, 1.0e6, 1.0e6).fill(&mut canvas, INK);

        for (x, y, pixel) in canvas.enumerate_pixels() {
            let inside = (x < 5 && y < 5) || (x >= 7 && y >= 7);
            assert_eq!(*pixel, if inside { INK } else { PAPER }, "pixel ({x}, {y})");
        }
    }

    #[test_log::test]
    fn curves_crossing_the_border_are_clipped() {
        let mut canvas = RgbaImage::from_pixel(10, 10, PAPER);
        let outline = Outline {
            segments: vec![
                Segment::Line(point(-50.0, 2.0), point(5.0, 2.0)),
                Segment::Quad(point(5.0, 2.0), point(60.0, 5.0), point(5.0, 8.0)),
                Segment::Line(point(5.0, 8.0), point(-50.0, 8.0)),
                Segment::Line(point(-50.0, 8.0), point(-50.0, 2.0)),
            ],
            ..Default::default()
        };
        outline.fill(&mut canvas, INK);

        // the band between the two straight edges is covered from the left border on
        for x in 0..5 {
            for y in 3..7 {
                assert_eq!(*canvas.get_pixel(x, y), INK, "pixel ({x}, {y})");
            }
        }
        for x in 0..10 {
            assert_eq!(*canvas.get_pixel(x, 0), PAPER);
            assert_eq!(*canvas.get_pixel(x, 9), PAPER);
        }
    }

    #[test_log::test]
    fn shapes_off_the_canvas_draw_nothing() {
        let mut canvas = RgbaImage::from_pixel(10, 10, PAPER);
        rectangle(20.0, 20.0, 30.0, 30.0).fill(&mut canvas, INK);
        rectangle(-30.0, 2.0, -20.0, 8.0).fill(&mut canvas, INK);
        assert!(canvas.pixels().all(|p| *p == PAPER));
    }
}

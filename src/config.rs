use crate::bitmap::BuiltinFont;
use crate::colour::ColourSpec;
use crate::effects::Effect;
use crate::TextImageError;
use std::path::PathBuf;
use std::str::FromStr;

/// Horizontal alignment of each line within the canvas
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = TextImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "center" | "centre" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            _ => Err(TextImageError::InvalidAlignment(s.to_string())),
        }
    }
}

/// Vertical alignment of the block of text within the canvas
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl FromStr for VAlign {
    type Err = TextImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(VAlign::Top),
            "middle" => Ok(VAlign::Middle),
            "bottom" => Ok(VAlign::Bottom),
            _ => Err(TextImageError::InvalidAlignment(s.to_string())),
        }
    }
}

/// Distance between consecutive baselines
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum LineHeight {
    /// 1.5 times the natural line height of the active font
    #[default]
    Auto,
    Pixels(u32),
}

/// What is painted underneath the text
#[derive(Clone, PartialEq, Debug)]
pub struct Background {
    /// Fills the canvas when there is no image, or the image can't be used
    pub colour: ColourSpec,
    /// A PNG, JPEG or GIF file, stretched to fill the canvas
    pub image: Option<PathBuf>,
}

impl Default for Background {
    fn default() -> Self {
        Background {
            colour: DEFAULT_BACKGROUND.into(),
            image: None,
        }
    }
}

/// A scalable font file drawn at a given size and angle
#[derive(Clone, PartialEq, Debug)]
pub struct SmartFont {
    pub path: PathBuf,
    /// Size of the em square, in pixels
    pub size: u32,
    /// Counter-clockwise rotation of each line, in degrees
    pub angle: f32,
}

/// How text is measured and drawn
#[derive(Clone, PartialEq, Debug)]
pub enum RenderMode {
    /// Fixed-width bitmap glyphs, drawn from the top-left corner of each line
    Simple(BuiltinFont),
    /// A TTF/OTF font file, drawn from the baseline of each line
    Smart(SmartFont),
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Simple(BuiltinFont::default())
    }
}

impl RenderMode {
    /// How far below the top of a line its draw anchor sits. Smart mode draws from
    /// the baseline, so lines are pushed down by the text size.
    pub fn baseline_offset(&self) -> i32 {
        match self {
            RenderMode::Simple(_) => 0,
            RenderMode::Smart(font) => font.size as i32,
        }
    }

    pub fn is_smart(&self) -> bool {
        matches!(self, RenderMode::Smart(_))
    }
}

pub const DEFAULT_WIDTH: u32 = 720;
pub const DEFAULT_PADDING: u32 = 30;
pub const DEFAULT_TEXT_SIZE: u32 = 17;
pub const DEFAULT_BACKGROUND: [u8; 4] = [20, 20, 20, 0];
pub const DEFAULT_TEXT_COLOUR: [u8; 4] = [255, 255, 255, 0];

/// Everything a render needs to know besides the text itself. Build one with
/// [RenderConfig::builder]; once built it can't be changed, so a single config can be
/// shared between any number of renders.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderConfig {
    width: u32,
    padding: u32,
    line_height: LineHeight,
    background: Background,
    text_colour: ColourSpec,
    align: Align,
    valign: VAlign,
    mode: RenderMode,
    effects: Vec<Effect>,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Width of the canvas in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Padding on every side of the text, in pixels
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// The width of the text column: the canvas width less the padding on both sides.
    /// Always positive.
    pub fn pseudo_width(&self) -> u32 {
        self.width - 2 * self.padding
    }

    pub fn line_height(&self) -> LineHeight {
        self.line_height
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn text_colour(&self) -> &ColourSpec {
        &self.text_colour
    }

    pub fn align(&self) -> Align {
        self.align
    }

    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn mode(&self) -> &RenderMode {
        &self.mode
    }

    /// Effects applied to the finished canvas, in order
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: DEFAULT_WIDTH,
            padding: DEFAULT_PADDING,
            line_height: LineHeight::Auto,
            background: Background::default(),
            text_colour: DEFAULT_TEXT_COLOUR.into(),
            align: Align::Left,
            valign: VAlign::Top,
            mode: RenderMode::default(),
            effects: Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
enum FontSource {
    Builtin(BuiltinFont),
    File(PathBuf),
}

/// Collects render settings, modifying `self` with each call, then validates them
/// with [RenderConfigBuilder::build]
#[derive(Clone, Debug)]
pub struct RenderConfigBuilder {
    width: u32,
    padding: u32,
    line_height: LineHeight,
    background: Background,
    text_colour: ColourSpec,
    align: Align,
    valign: VAlign,
    font: FontSource,
    text_size: u32,
    angle: f32,
    effects: Vec<Effect>,
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        RenderConfigBuilder {
            width: DEFAULT_WIDTH,
            padding: DEFAULT_PADDING,
            line_height: LineHeight::Auto,
            background: Background::default(),
            text_colour: DEFAULT_TEXT_COLOUR.into(),
            align: Align::Left,
            valign: VAlign::Top,
            font: FontSource::Builtin(BuiltinFont::default()),
            text_size: DEFAULT_TEXT_SIZE,
            angle: 0.0,
            effects: Vec::new(),
        }
    }
}

impl RenderConfigBuilder {
    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = width;
        self
    }

    pub fn padding(&mut self, padding: u32) -> &mut Self {
        self.padding = padding;
        self
    }

    pub fn line_height(&mut self, line_height: LineHeight) -> &mut Self {
        self.line_height = line_height;
        self
    }

    pub fn background_colour<C: Into<ColourSpec>>(&mut self, colour: C) -> &mut Self {
        self.background.colour = colour.into();
        self
    }

    /// Stretch an image over the canvas. The background colour is still used if the
    /// image is missing or can't be decoded.
    pub fn background_image<P: Into<PathBuf>>(&mut self, path: P) -> &mut Self {
        self.background.image = Some(path.into());
        self
    }

    pub fn text_colour<C: Into<ColourSpec>>(&mut self, colour: C) -> &mut Self {
        self.text_colour = colour.into();
        self
    }

    pub fn alignment(&mut self, align: Align, valign: VAlign) -> &mut Self {
        self.align = align;
        self.valign = valign;
        self
    }

    /// Draw with a TTF/OTF font file. This switches the render to smart mode.
    pub fn font_path<P: Into<PathBuf>>(&mut self, path: P) -> &mut Self {
        self.font = FontSource::File(path.into());
        self
    }

    /// Draw with a built-in bitmap font. This switches the render to simple mode.
    pub fn builtin_font(&mut self, font: BuiltinFont) -> &mut Self {
        self.font = FontSource::Builtin(font);
        self
    }

    /// Text size in pixels; only used in smart mode
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.text_size = size;
        self
    }

    /// Counter-clockwise text rotation in degrees; only used in smart mode
    pub fn angle(&mut self, degrees: f32) -> &mut Self {
        self.angle = degrees;
        self
    }

    /// Set the font, size and angle in one go
    pub fn mode(&mut self, mode: RenderMode) -> &mut Self {
        match mode {
            RenderMode::Simple(font) => self.font = FontSource::Builtin(font),
            RenderMode::Smart(SmartFont { path, size, angle }) => {
                self.font = FontSource::File(path);
                self.text_size = size;
                self.angle = angle;
            }
        }
        self
    }

    /// Append an effect to run over the finished canvas
    pub fn effect(&mut self, effect: Effect) -> &mut Self {
        self.effects.push(effect);
        self
    }

    pub fn build(&self) -> Result<RenderConfig, TextImageError> {
        if self.width as u64 <= 2 * self.padding as u64 {
            return Err(TextImageError::InvalidGeometry {
                width: self.width,
                padding: self.padding,
            });
        }

        let mode = match &self.font {
            FontSource::Builtin(font) => RenderMode::Simple(*font),
            FontSource::File(path) => RenderMode::Smart(SmartFont {
                path: path.clone(),
                size: self.text_size,
                angle: self.angle,
            }),
        };

        Ok(RenderConfig {
            width: self.width,
            padding: self.padding,
            line_height: self.line_height,
            background: self.background.clone(),
            text_colour: self.text_colour.clone(),
            align: self.align,
            valign: self.valign,
            mode,
            effects: self.effects.clone(),
        })
    }
}

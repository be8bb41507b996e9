//! Cells of the live collage grid

use serde::{Deserialize, Serialize};

use crate::codec::CellImage;
use crate::layout::CellId;

/// RGBA color with 8-bit channels.
///
/// Serialized as a `[r, g, b, a]` array; three-channel arrays are accepted
/// on input and get an opaque alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// Opaque white.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let channels = Vec::<u8>::deserialize(deserializer)?;
        match channels.as_slice() {
            &[r, g, b] => Ok(Self([r, g, b, 255])),
            &[r, g, b, a] => Ok(Self([r, g, b, a])),
            other => Err(serde::de::Error::invalid_length(
                other.len(),
                &"3 or 4 color channels",
            )),
        }
    }
}

/// Pixel interpolation used when scaling a cell's image.
///
/// Discriminants match the integer codes stored in autosave files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformationMode {
    /// Nearest neighbour.
    Fast = 0,
    /// Bilinear filtering.
    #[default]
    Smooth = 1,
}

impl TransformationMode {
    /// Maps a stored integer code back to a mode.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Fast),
            1 => Some(Self::Smooth),
            _ => None,
        }
    }

    /// Returns the stored integer code.
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// How a cell's image aspect ratio is treated when scaling.
///
/// Discriminants match the integer codes stored in autosave files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatioMode {
    /// Stretch to the cell.
    Ignore = 0,
    /// Keep the ratio, fit inside the cell.
    #[default]
    Keep = 1,
    /// Keep the ratio, cover the cell.
    KeepByExpanding = 2,
}

impl AspectRatioMode {
    /// Maps a stored integer code back to a mode.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Ignore),
            1 => Some(Self::Keep),
            2 => Some(Self::KeepByExpanding),
            _ => None,
        }
    }

    /// Returns the stored integer code.
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Caption texts of a cell and their visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionText {
    /// Free caption
    pub caption: String,
    /// Text drawn along the top edge
    pub top_caption: String,
    /// Text drawn along the bottom edge
    pub bottom_caption: String,
    /// Whether the top caption is drawn
    pub show_top_caption: bool,
    /// Whether the bottom caption is drawn
    pub show_bottom_caption: bool,
}

impl Default for CaptionText {
    fn default() -> Self {
        Self {
            caption: String::new(),
            top_caption: String::new(),
            bottom_caption: String::new(),
            show_top_caption: true,
            show_bottom_caption: true,
        }
    }
}

impl CaptionText {
    /// Returns true if no caption text is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caption.is_empty() && self.top_caption.is_empty() && self.bottom_caption.is_empty()
    }
}

/// Rendering style of a cell's captions.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    /// Font family name
    pub font_family: String,
    /// Smallest size used when fitting text
    pub min_size: u32,
    /// Largest size used when fitting text
    pub max_size: u32,
    /// Render text in upper case
    pub uppercase: bool,
    /// Outline width in pixels
    pub stroke_width: u32,
    /// Outline color, `None` for the renderer default
    pub stroke_color: Option<Rgba>,
    /// Fill color, `None` for the renderer default
    pub fill_color: Option<Rgba>,
    /// Margin kept free around captions, relative to the cell size
    pub safe_margin_ratio: f64,
    /// Nominal font size
    pub font_size: u32,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: "Impact".to_string(),
            min_size: 12,
            max_size: 48,
            uppercase: true,
            stroke_width: 3,
            stroke_color: None,
            fill_color: None,
            safe_margin_ratio: 0.04,
            font_size: 14,
            bold: true,
            italic: false,
            underline: false,
        }
    }
}

/// Identifies one image state of one cell.
///
/// A background encoder hands the token back with its result; the result is
/// only stored if the cell still shows the same image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AutosaveToken {
    /// Cell the image belongs to
    pub cell: CellId,
    /// Image generation at the time the encode was requested
    pub generation: u64,
}

/// A single cell of a [`CollageGrid`](super::CollageGrid).
///
/// The image is private so every change goes through [`set_image`] or
/// [`clear_image`], which bump the generation and drop the cached payload.
///
/// [`set_image`]: CollageCell::set_image
/// [`clear_image`]: CollageCell::clear_image
#[derive(Debug, Clone)]
pub struct CollageCell<I> {
    id: CellId,
    row_span: usize,
    col_span: usize,
    image: Option<I>,
    autosave_payload: Option<String>,
    generation: u64,
    /// Caption texts
    pub caption: CaptionText,
    /// Caption rendering style
    pub style: CaptionStyle,
    /// Image interpolation
    pub transformation_mode: Option<TransformationMode>,
    /// Image aspect handling
    pub aspect_ratio_mode: Option<AspectRatioMode>,
    /// Transient selection flag
    pub selected: bool,
}

impl<I: CellImage> CollageCell<I> {
    /// Creates an empty, unmerged cell.
    #[must_use]
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            row_span: 1,
            col_span: 1,
            image: None,
            autosave_payload: None,
            generation: 0,
            caption: CaptionText::default(),
            style: CaptionStyle::default(),
            transformation_mode: Some(TransformationMode::default()),
            aspect_ratio_mode: Some(AspectRatioMode::default()),
            selected: false,
        }
    }

    /// Returns the cell's id.
    #[must_use]
    pub const fn id(&self) -> CellId {
        self.id
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.row_span
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn col_span(&self) -> usize {
        self.col_span
    }

    /// Returns true if the cell covers more than one position.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.row_span != 1 || self.col_span != 1
    }

    /// Returns the current image.
    #[must_use]
    pub const fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    /// Returns true if the cell shows a non-empty image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|image| !image.is_empty())
    }

    /// Replaces the image.
    pub fn set_image(&mut self, image: I) {
        self.adopt_image(Some(image), None);
    }

    /// Removes the image.
    pub fn clear_image(&mut self) {
        self.adopt_image(None, None);
    }

    /// Returns the cached encoded payload of the current image.
    #[must_use]
    pub fn autosave_payload(&self) -> Option<&str> {
        self.autosave_payload.as_deref()
    }

    /// Caches the encoded payload of the current image.
    ///
    /// Does not change the generation; the payload must describe the image
    /// the cell shows right now.
    pub fn set_autosave_payload(&mut self, payload: Option<String>) {
        self.autosave_payload = payload;
    }

    /// Number of image changes since the cell was created.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Token identifying the current image state.
    #[must_use]
    pub const fn autosave_token(&self) -> AutosaveToken {
        AutosaveToken {
            cell: self.id,
            generation: self.generation,
        }
    }

    pub(crate) fn set_span(&mut self, row_span: usize, col_span: usize) {
        self.row_span = row_span;
        self.col_span = col_span;
    }

    /// Installs an image together with a payload known to describe it.
    pub(crate) fn adopt_image(&mut self, image: Option<I>, payload: Option<String>) {
        self.image = image;
        self.autosave_payload = payload;
        self.generation += 1;
    }

    pub(crate) fn take_image(&mut self) -> (Option<I>, Option<String>) {
        let image = self.image.take();
        let payload = self.autosave_payload.take();
        if image.is_some() {
            self.generation += 1;
        }
        (image, payload)
    }

    /// Moves all user content out of the cell, leaving it empty.
    pub(crate) fn take_content(&mut self) -> CellContent<I> {
        let (image, autosave_payload) = self.take_image();
        CellContent {
            image,
            autosave_payload,
            caption: std::mem::take(&mut self.caption),
            style: std::mem::take(&mut self.style),
            transformation_mode: self.transformation_mode,
            aspect_ratio_mode: self.aspect_ratio_mode,
            selected: std::mem::replace(&mut self.selected, false),
        }
    }

    /// Installs previously taken content.
    pub(crate) fn restore_content(&mut self, content: CellContent<I>) {
        self.adopt_image(content.image, content.autosave_payload);
        self.caption = content.caption;
        self.style = content.style;
        self.transformation_mode = content.transformation_mode;
        self.aspect_ratio_mode = content.aspect_ratio_mode;
        self.selected = content.selected;
    }
}

/// User content of a cell, detached from its position.
#[derive(Debug)]
pub(crate) struct CellContent<I> {
    pub image: Option<I>,
    pub autosave_payload: Option<String>,
    pub caption: CaptionText,
    pub style: CaptionStyle,
    pub transformation_mode: Option<TransformationMode>,
    pub aspect_ratio_mode: Option<AspectRatioMode>,
    pub selected: bool,
}

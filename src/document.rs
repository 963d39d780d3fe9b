//! In-memory page model the renderers draw into.
//!
//! Coordinates are PDF points measured from the top-left corner of the page,
//! y growing downward. Angles are degrees, clockwise from the positive x axis.
//! Primitives on a page are kept in paint order.

pub const FONT_TITLE: f32 = 20.0;
pub const FONT_HEADER: f32 = 12.0;
pub const FONT_BODY: f32 = 10.0;
pub const FONT_SMALL: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const DARK_BLUE: Color = Color::rgb(0, 0, 139);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const ORANGE_RED: Color = Color::rgb(255, 69, 0);
}

/// Chart palette. Colors go to groups by position, not by label.
pub const PALETTE: [Color; 6] = [
    Color::rgb(65, 105, 225),  // royal blue
    Color::rgb(255, 69, 0),    // orange red
    Color::rgb(34, 139, 34),   // forest green
    Color::rgb(218, 165, 32),  // goldenrod
    Color::rgb(128, 0, 128),   // purple
    Color::rgb(210, 105, 30),  // chocolate
];

pub fn color_for_index(i: usize) -> Color {
    PALETTE[i % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        color: Color,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Sector {
        cx: f32,
        cy: f32,
        radius: f32,
        start_deg: f32,
        sweep_deg: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Color,
    },
}

impl Primitive {
    pub fn is_shape(&self) -> bool {
        !matches!(self, Primitive::Text { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    /// A document always starts with one empty page.
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Self {
        Self {
            title: title.to_string(),
            page_width,
            page_height,
            pages: vec![Page::default()],
        }
    }

    /// Close the current page and start drawing on a fresh one.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn push(&mut self, primitive: Primitive) {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        self.pages[last].primitives.push(primitive);
    }

    pub fn text(&mut self, s: &str, x: f32, y: f32, size: f32, bold: bool, color: Color) {
        self.push(Primitive::Text {
            x,
            y,
            text: s.to_string(),
            size,
            bold,
            color,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.push(Primitive::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn sector(&mut self, cx: f32, cy: f32, radius: f32, start_deg: f32, sweep_deg: f32, color: Color) {
        self.push(Primitive::Sector {
            cx,
            cy,
            radius,
            start_deg,
            sweep_deg,
            color,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color) {
        self.push(Primitive::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
            color,
        });
    }

    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.pages.iter().flat_map(|p| p.primitives.iter())
    }
}

/// Rough Helvetica advance width, good enough for centering titles.
pub fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

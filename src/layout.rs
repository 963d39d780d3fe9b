use serde::{Deserialize, Serialize};

const MARGIN: f32 = 40.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    #[default]
    A4,
    Letter,
}

impl Paper {
    /// Width and height in points.
    pub fn size(self) -> (f32, f32) {
        match self {
            Paper::A4 => (595.28, 841.89),
            Paper::Letter => (612.0, 792.0),
        }
    }
}

impl std::str::FromStr for Paper {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Paper::A4),
            "letter" => Ok(Paper::Letter),
            other => Err(format!("unknown paper size: {other} (expected a4 or letter)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
}

impl PageGeometry {
    pub fn for_paper(paper: Paper) -> Self {
        let (width, height) = paper.size();
        Self {
            width,
            height,
            top_margin: MARGIN,
            bottom_margin: MARGIN,
            left_margin: MARGIN,
        }
    }
}

/// Running vertical write position on the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    geometry: PageGeometry,
    y: f32,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            y: geometry.top_margin,
            geometry,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn left_margin(&self) -> f32 {
        self.geometry.left_margin
    }

    /// True when a band of `required` height would cross the bottom margin.
    pub fn would_overflow(&self, required: f32) -> bool {
        self.y + required > self.geometry.height - self.geometry.bottom_margin
    }

    pub fn advance(&mut self, amount: f32) {
        self.y += amount;
    }

    pub fn reset(&mut self) {
        self.y = self.geometry.top_margin;
    }
}

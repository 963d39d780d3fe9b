use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::document::{Color, Document, Primitive};
use crate::error::{ReportError, Result};

const PT_TO_MM: f32 = 0.352_777_78;
/// Largest angle covered by one straight segment of a pie arc.
const ARC_STEP_DEG: f32 = 5.0;

fn pdf_color(c: Color) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb::new(
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        None,
    ))
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    page_w: f32,
    page_h: f32,
}

impl PdfWriter {
    fn new(title: &str, page_w: f32, page_h: f32) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(page_w * PT_TO_MM), Mm(page_h * PT_TO_MM), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            page_w,
            page_h,
        })
    }

    /// Convert a top-down point coordinate into a PDF point.
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x * PT_TO_MM), Mm((self.page_h - y) * PT_TO_MM))
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.page_w * PT_TO_MM),
            Mm(self.page_h * PT_TO_MM),
            "Layer 1",
        );
        self.current_page = page;
        self.current_layer = layer;
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc
            .get_page(self.current_page)
            .get_layer(self.current_layer)
    }

    fn fill_polygon(&self, points: Vec<(Point, bool)>, color: Color) {
        let layer = self.layer();
        layer.set_fill_color(pdf_color(color));
        layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn draw(&self, primitive: &Primitive) {
        match primitive {
            Primitive::Text {
                x,
                y,
                text,
                size,
                bold,
                color,
            } => {
                let font = if *bold { &self.font_bold } else { &self.font };
                let layer = self.layer();
                layer.set_fill_color(pdf_color(*color));
                layer.use_text(
                    text.as_str(),
                    *size,
                    Mm(x * PT_TO_MM),
                    Mm((self.page_h - y) * PT_TO_MM),
                    font,
                );
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                if *width <= 0.0 || *height <= 0.0 {
                    return;
                }
                let points = vec![
                    (self.point(*x, *y), false),
                    (self.point(x + width, *y), false),
                    (self.point(x + width, y + height), false),
                    (self.point(*x, y + height), false),
                ];
                self.fill_polygon(points, *color);
            }
            Primitive::Sector {
                cx,
                cy,
                radius,
                start_deg,
                sweep_deg,
                color,
            } => {
                if *sweep_deg <= 0.0 {
                    return;
                }
                let steps = (sweep_deg / ARC_STEP_DEG).ceil().max(1.0) as usize;
                let mut points = Vec::with_capacity(steps + 2);
                points.push((self.point(*cx, *cy), false));
                for i in 0..=steps {
                    let deg = start_deg + sweep_deg * i as f32 / steps as f32;
                    let rad = deg.to_radians();
                    points.push((self.point(cx + radius * rad.cos(), cy + radius * rad.sin()), false));
                }
                self.fill_polygon(points, *color);
            }
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
                color,
            } => {
                let layer = self.layer();
                layer.set_outline_color(pdf_color(*color));
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![(self.point(*x1, *y1), false), (self.point(*x2, *y2), false)],
                    is_closed: false,
                });
            }
        }
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| ReportError::Pdf(e.to_string()))
    }
}

/// Serialize `document` to PDF bytes, one PDF page per document page.
pub fn render(document: &Document) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new(&document.title, document.page_width, document.page_height)?;
    for (i, page) in document.pages.iter().enumerate() {
        if i > 0 {
            pdf.new_page();
        }
        for primitive in &page.primitives {
            pdf.draw(primitive);
        }
    }
    pdf.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_pdf() {
        let mut doc = Document::new("Prueba", 595.28, 841.89);
        doc.text("Cámaras", 40.0, 40.0, 12.0, true, Color::BLACK);
        doc.rect(40.0, 60.0, 100.0, 15.0, Color::ORANGE_RED);
        doc.sector(400.0, 200.0, 60.0, 0.0, 252.0, Color::GREEN);
        doc.sector(400.0, 200.0, 60.0, 252.0, 108.0, Color::RED);
        doc.line(40.0, 300.0, 490.0, 300.0, 0.5, Color::LIGHT_GRAY);
        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_multi_page_document() {
        let mut doc = Document::new("Prueba", 595.28, 841.89);
        doc.text("uno", 40.0, 40.0, 10.0, false, Color::BLACK);
        doc.new_page();
        doc.text("dos", 40.0, 40.0, 10.0, false, Color::BLACK);
        doc.new_page();
        let single = render(&Document::new("Prueba", 595.28, 841.89)).unwrap();
        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > single.len());
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut doc = Document::new("Prueba", 595.28, 841.89);
        doc.sector(100.0, 100.0, 50.0, 90.0, 0.0, Color::BLACK);
        doc.rect(10.0, 10.0, 0.0, 15.0, Color::BLACK);
        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

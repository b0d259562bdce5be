use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Pt, Rect,
};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::report::{Document, DrawOp, FontWeight};

/// Paints `document` into a PDF file at `path`, replacing any existing file.
#[instrument(
    level = "debug",
    skip_all,
    fields(path = %path.display(), pages = document.pages.len())
)]
pub fn write_pdf(document: &Document, path: &Path) -> Result<()> {
    let width = mm(document.page_width);
    let height = mm(document.page_height);
    let (pdf, first_page, first_layer) =
        PdfDocument::new(document.title.as_str(), width, height, "Page 1");

    let regular = pdf.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = pdf.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let fonts = Fonts { regular, bold };

    for (index, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(width, height, format!("Page {}", index + 1))
        };
        let layer = pdf.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            paint(&layer, &fonts, op);
        }
    }

    let file = File::create(path)?;
    pdf.save(&mut BufWriter::new(file))?;
    debug!("PDF written");
    Ok(())
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn paint(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            weight,
            gray,
            text,
            ..
        } => {
            let font = match weight {
                FontWeight::Regular => &fonts.regular,
                FontWeight::Bold => &fonts.bold,
            };
            layer.set_fill_color(grey(*gray));
            layer.use_text(text.as_str(), *size, mm(*x), mm(*y), font);
        }
        DrawOp::Band {
            x,
            y,
            width,
            height,
            gray,
            ..
        } => {
            layer.set_fill_color(grey(*gray));
            layer.add_rect(Rect::new(mm(*x), mm(*y), mm(x + width), mm(y + height)));
        }
        DrawOp::Rule { x1, x2, y } => {
            layer.set_outline_color(grey(0.0));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(*x1), mm(*y)), false),
                    (Point::new(mm(*x2), mm(*y)), false),
                ],
                is_closed: false,
            });
        }
    }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn grey(level: f32) -> Color {
    Color::Greyscale(Greyscale::new(level, None))
}

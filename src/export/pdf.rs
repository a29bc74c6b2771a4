//! PDF serialization via `printpdf`.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt};

use super::layout::PageLayout;
use super::paginate::{paginate, Document};
use super::ExportError;

/// Heading drawn above the rule on the first page.
pub const LETTER_TITLE: &str = "Medical Discharge Letter";

/// Default file name for the exported letter.
pub const DEFAULT_FILE_NAME: &str = "Medical_Discharge_Letter.pdf";

const LAYER_NAME: &str = "Layer 1";

fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

/// Paginate `document_text` and render it as PDF bytes.
pub fn export(document_text: &str, layout: &PageLayout) -> Result<Vec<u8>, ExportError> {
    layout.validate()?;
    let document = paginate(document_text, layout);
    tracing::debug!(
        pages = document.pages.len(),
        lines = document.line_count(),
        "Paginated letter"
    );
    render_pdf(&document, layout)
}

/// Serialize an already paginated document.
pub fn render_pdf(document: &Document, layout: &PageLayout) -> Result<Vec<u8>, ExportError> {
    let width = pt(layout.page_width);
    let height = pt(layout.page_height);

    let (doc, page1, layer1) = PdfDocument::new(LETTER_TITLE, width, height, LAYER_NAME);
    let font = doc
        .add_builtin_font(layout.font.builtin())
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    draw_title(&layer, layout, &font);

    for (index, page) in document.pages.iter().enumerate() {
        if index > 0 {
            let (page_idx, layer_idx) = doc.add_page(width, height, LAYER_NAME);
            layer = doc.get_page(page_idx).get_layer(layer_idx);
        }

        for line in &page.lines {
            layer.use_text(line.text.as_str(), layout.font_size, pt(line.x), pt(line.y), &font);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn draw_title(layer: &PdfLayerReference, layout: &PageLayout, font: &IndirectFontRef) {
    layer.use_text(
        LETTER_TITLE,
        layout.font_size,
        pt(layout.title_x),
        pt(layout.title_y),
        font,
    );
    layer.add_line(Line {
        points: vec![
            (Point::new(pt(layout.rule_start_x), pt(layout.rule_y)), false),
            (Point::new(pt(layout.rule_end_x), pt(layout.rule_y)), false),
        ],
        is_closed: false,
    });
}

/// Write PDF bytes into `dir` (created if missing) and return the full path.
pub fn export_to_file(pdf_bytes: &[u8], dir: &Path, filename: &str) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "Letter exported");
    Ok(path)
}

// 📄 Minimal PDF writer - text-only A4 documents
//
// Coordinates are millimetres measured from the TOP-LEFT corner, text is
// placed at its baseline, like the layout of a printed report. Output is a
// plain PDF 1.4 file using the built-in Helvetica font (WinAnsiEncoding), so
// no font embedding is needed.

/// A4 width in millimetres
pub const PAGE_WIDTH_MM: f64 = 210.0;

/// A4 height in millimetres
pub const PAGE_HEIGHT_MM: f64 = 297.0;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    font_size: f64,
    x_mm: f64,
    y_mm: f64,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pages: Vec<Vec<TextRun>>,
    font_size: f64,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// New document with one empty page and a 16pt font
    pub fn new() -> Self {
        PdfDocument {
            pages: vec![Vec::new()],
            font_size: 16.0,
        }
    }

    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    /// Place text on the current (last) page
    pub fn text(&mut self, text: &str, x_mm: f64, y_mm: f64) {
        let run = TextRun {
            font_size: self.font_size,
            x_mm,
            y_mm,
            text: text.to_string(),
        };

        if let Some(page) = self.pages.last_mut() {
            page.push(run);
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text placed on page `index` (0-based), in insertion order
    pub fn page_text(&self, index: usize) -> Vec<&str> {
        self.pages
            .get(index)
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Serialize to PDF bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        // Object layout: 1 catalog, 2 page tree, 3 font, then (page, content) pairs
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 4 + i * 2).collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");

        write_object(&mut out, &mut offsets, 1, "<< /Type /Catalog /Pages 2 0 R >>");
        write_object(
            &mut out,
            &mut offsets,
            2,
            &format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, self.pages.len()),
        );
        write_object(
            &mut out,
            &mut offsets,
            3,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );

        let width_pt = PAGE_WIDTH_MM * POINTS_PER_MM;
        let height_pt = PAGE_HEIGHT_MM * POINTS_PER_MM;

        for (page, page_id) in self.pages.iter().zip(&page_ids) {
            let content_id = page_id + 1;

            write_object(
                &mut out,
                &mut offsets,
                *page_id,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                    width_pt, height_pt, content_id
                ),
            );

            let mut stream = String::new();
            for run in page {
                stream.push_str(&format!(
                    "BT /F1 {} Tf {:.2} {:.2} Td ({}) Tj ET\n",
                    run.font_size,
                    run.x_mm * POINTS_PER_MM,
                    height_pt - run.y_mm * POINTS_PER_MM,
                    escape_text(&run.text)
                ));
            }

            write_object(
                &mut out,
                &mut offsets,
                content_id,
                &format!("<< /Length {} >>\nstream\n{}endstream", stream.len(), stream),
            );
        }

        let xref_offset = out.len();
        let object_count = offsets.len() + 1;

        out.extend_from_slice(format!("xref\n0 {}\n", object_count).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                object_count, xref_offset
            )
            .as_bytes(),
        );

        out
    }
}

/// Objects must be written in id order so `offsets[id - 1]` is the object's offset
fn write_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize, body: &str) {
    debug_assert_eq!(offsets.len() + 1, id);
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
}

/// PDF string literal body: escapes delimiters, Latin-1 as octal, anything else `?`
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            '\u{A0}'..='\u{FF}' => escaped.push_str(&format!("\\{:03o}", ch as u32)),
            _ => escaped.push('?'),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a (b) \\c"), "a \\(b\\) \\\\c");
        assert_eq!(escape_text("Café"), "Caf\\351");
        assert_eq!(escape_text("💰 tab\t"), "? tab?");
    }

    #[test]
    fn test_document_structure() {
        let mut doc = PdfDocument::new();
        doc.set_font_size(20.0);
        doc.text("Hello", 20.0, 20.0);

        let bytes = doc.to_bytes();
        let text = as_text(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("BT /F1 20 Tf 56.69 785.20 Td (Hello) Tj ET"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut doc = PdfDocument::new();
        doc.text("page one", 20.0, 20.0);
        doc.add_page();
        doc.text("page two", 20.0, 20.0);

        let bytes = doc.to_bytes();
        let xref_start = find_bytes(&bytes, b"xref\n").unwrap();
        let tail = as_text(&bytes[xref_start..]);

        let entries: Vec<usize> = tail
            .lines()
            .skip(3) // "xref", "0 N", free entry
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();

        // catalog, pages, font + 2 × (page, contents)
        assert_eq!(entries.len(), 7);
        for (i, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj", i + 1);
            assert_eq!(&bytes[*offset..*offset + header.len()], header.as_bytes());
        }

        let startxref: usize = tail
            .lines()
            .skip_while(|line| *line != "startxref")
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(startxref, xref_start);
    }

    #[test]
    fn test_pages_collect_their_own_text() {
        let mut doc = PdfDocument::new();
        doc.text("first", 10.0, 10.0);
        doc.add_page();
        doc.text("second", 10.0, 10.0);

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_text(0), vec!["first"]);
        assert_eq!(doc.page_text(1), vec!["second"]);
        assert!(doc.page_text(5).is_empty());
    }
}

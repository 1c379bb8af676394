use super::{DocumentWriter, RenderError};
use std::io::Write;

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 56;
const LINE_HEIGHT: u32 = 28;
const TITLE_SIZE: u32 = 16;
const BODY_SIZE: u32 = 12;

// Object ids fixed ahead of the per-page objects.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const REGULAR_FONT_ID: usize = 3;
const BOLD_FONT_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

/// Helvetica-Bold advance widths for `' '..='~'`, in 1/1000 em.
const BOLD_ASCII_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..='/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..='9'
    333, 333, 584, 584, 584, 611, 975, // ':'..='@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..='M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..='Z'
    333, 278, 333, 584, 556, 333, // '['..='`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..='m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..='z'
    389, 280, 389, 584, // '{'..='~'
];
/// Width used for the Latin-1 supplement, close to the accented letters.
const BOLD_FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

#[derive(Debug)]
struct PdfLine {
    font: Font,
    size: u32,
    /// WinAnsi bytes, unescaped.
    text: Vec<u8>,
    /// Left edge of the text.
    x: u32,
    /// Vertical space consumed, title lines leave a blank line below.
    advance: u32,
}

/// Single-column PDF 1.4 document using the base-14 Helvetica faces.
///
/// Nothing time- or randomness-dependent is embedded, so identical input
/// produces identical bytes. Text is limited to what WinAnsi can express:
/// printable ASCII plus `U+00A0..=U+00FF`.
#[derive(Debug, Default)]
pub struct PdfDocument {
    lines: Vec<PdfLine>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, text: &str, font: Font, size: u32, advance: u32) -> Result<(), RenderError> {
        let text = encode_win_ansi(text)?;
        let x = match font {
            Font::Bold => centered_x(&text, size),
            Font::Regular => MARGIN,
        };
        self.lines.push(PdfLine {
            font,
            size,
            text,
            x,
            advance,
        });
        Ok(())
    }

    /// Places lines top to bottom, starting a new page when the next line
    /// would cross the bottom margin. Always yields at least one page.
    fn paginate(&self) -> Vec<Vec<(&PdfLine, u32)>> {
        let top = PAGE_HEIGHT - MARGIN;
        let mut pages = vec![Vec::new()];
        let mut cursor = top;

        for line in &self.lines {
            let fits = cursor >= MARGIN + line.advance;
            let page_has_content = pages.last().is_some_and(|page| !page.is_empty());
            if !fits && page_has_content {
                pages.push(Vec::new());
                cursor = top;
            }

            if let Some(page) = pages.last_mut() {
                page.push((line, cursor.saturating_sub(line.size)));
            }
            cursor = cursor.saturating_sub(line.advance);
        }

        pages
    }
}

impl DocumentWriter for PdfDocument {
    fn emit_title(&mut self, text: &str) -> Result<(), RenderError> {
        self.push(text, Font::Bold, TITLE_SIZE, LINE_HEIGHT * 2)
    }

    fn emit_line(&mut self, text: &str) -> Result<(), RenderError> {
        self.push(text, Font::Regular, BODY_SIZE, LINE_HEIGHT)
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let pages = self.paginate();
        let mut writer = ObjectWriter::new()?;

        let kids = (0..pages.len())
            .map(|index| format!("{} 0 R", FIRST_PAGE_ID + index * 2))
            .collect::<Vec<_>>()
            .join(" ");

        writer.object(
            CATALOG_ID,
            &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
        )?;
        writer.object(
            PAGES_ID,
            &format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                pages.len()
            ),
        )?;
        writer.object(REGULAR_FONT_ID, &font_dictionary("Helvetica"))?;
        writer.object(BOLD_FONT_ID, &font_dictionary("Helvetica-Bold"))?;

        for (index, placed) in pages.iter().enumerate() {
            let page_id = FIRST_PAGE_ID + index * 2;
            let contents_id = page_id + 1;
            writer.object(
                page_id,
                &format!(
                    "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
/Resources << /Font << /F1 {REGULAR_FONT_ID} 0 R /F2 {BOLD_FONT_ID} 0 R >> >> \
/Contents {contents_id} 0 R >>"
                ),
            )?;
            writer.stream(contents_id, &page_contents(placed)?)?;
        }

        writer.finish()
    }
}

fn font_dictionary(base_font: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>")
}

fn page_contents(placed: &[(&PdfLine, u32)]) -> Result<Vec<u8>, RenderError> {
    let mut contents = Vec::new();
    for (line, baseline) in placed {
        write!(
            contents,
            "BT\n/{} {} Tf\n1 0 0 1 {} {baseline} Tm\n(",
            line.font.resource(),
            line.size,
            line.x
        )?;
        contents.extend(escape_literal(&line.text));
        contents.write_all(b") Tj\nET\n")?;
    }
    Ok(contents)
}

/// Left edge that centres bold text on the page, never inside the margin.
fn centered_x(text: &[u8], size: u32) -> u32 {
    let units: u32 = text
        .iter()
        .map(|&byte| {
            let width = match byte {
                b' '..=b'~' => BOLD_ASCII_WIDTHS[usize::from(byte - b' ')],
                _ => BOLD_FALLBACK_WIDTH,
            };
            u32::from(width)
        })
        .sum();
    let width = units.saturating_mul(size) / 1000;
    (PAGE_WIDTH.saturating_sub(width) / 2).max(MARGIN)
}

fn encode_win_ansi(text: &str) -> Result<Vec<u8>, RenderError> {
    text.chars()
        .map(|character| match character {
            ' '..='~' | '\u{a0}'..='\u{ff}' => Ok(character as u32 as u8),
            other => Err(RenderError::UnsupportedCharacter {
                character: other,
                line: text.to_string(),
            }),
        })
        .collect()
}

fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        if matches!(byte, b'(' | b')' | b'\\') {
            escaped.push(b'\\');
        }
        escaped.push(byte);
    }
    escaped
}

/// Appends numbered objects and remembers their offsets for the xref table.
struct ObjectWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new() -> Result<Self, RenderError> {
        let mut buffer = Vec::new();
        buffer.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        Ok(Self {
            buffer,
            offsets: Vec::new(),
        })
    }

    fn begin(&mut self, id: usize) -> Result<(), RenderError> {
        debug_assert_eq!(id, self.offsets.len() + 1, "objects must be written in id order");
        self.offsets.push(self.buffer.len());
        writeln!(self.buffer, "{id} 0 obj")?;
        Ok(())
    }

    fn object(&mut self, id: usize, body: &str) -> Result<(), RenderError> {
        self.begin(id)?;
        writeln!(self.buffer, "{body}")?;
        self.buffer.write_all(b"endobj\n")?;
        Ok(())
    }

    fn stream(&mut self, id: usize, contents: &[u8]) -> Result<(), RenderError> {
        self.begin(id)?;
        writeln!(self.buffer, "<< /Length {} >>", contents.len())?;
        self.buffer.write_all(b"stream\n")?;
        self.buffer.write_all(contents)?;
        self.buffer.write_all(b"\nendstream\nendobj\n")?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        let xref_offset = self.buffer.len();
        let size = self.offsets.len() + 1;

        writeln!(self.buffer, "xref\n0 {size}")?;
        self.buffer.write_all(b"0000000000 65535 f \n")?;
        for offset in &self.offsets {
            writeln!(self.buffer, "{offset:010} 00000 n ")?;
        }
        writeln!(
            self.buffer,
            "trailer\n<< /Size {size} /Root {CATALOG_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF"
        )?;

        Ok(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle)
    }

    fn render(title: &str, lines: &[&str]) -> Result<Vec<u8>, RenderError> {
        let mut document = PdfDocument::new();
        document.emit_title(title)?;
        for line in lines {
            document.emit_line(line)?;
        }
        document.finish()
    }

    #[test]
    fn writes_pdf_envelope() {
        let bytes = render("Report", &["Total Sales: $10.00"]).expect("render");

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica "));
        assert!(contains(&bytes, b"(Total Sales: $10.00) Tj"));
        assert!(contains(&bytes, b"/Count 1 "));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = render("Report", &["one", "two"]).expect("render");
        let text = String::from_utf8_lossy(&bytes);

        let startxref = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|value| value.parse::<usize>().ok())
            .expect("startxref offset");
        assert!(bytes[startxref..].starts_with(b"xref\n0 7\n"));

        let xref = String::from_utf8_lossy(&bytes[startxref..]);
        let entries = xref
            .lines()
            .skip(3)
            .take(6)
            .map(|entry| entry[..10].parse::<usize>().expect("offset"))
            .collect::<Vec<_>>();
        for (index, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj\n", index + 1);
            assert!(bytes[*offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn title_is_centred_and_body_is_left_aligned() {
        let bytes = render("E-commerce Sales Report", &["Total Sales: $10.00"]).expect("render");

        // 12393 units at 16pt is 198pt wide, leaving (595 - 198) / 2.
        assert!(contains(&bytes, b"/F2 16 Tf\n1 0 0 1 198 "));
        assert!(contains(&bytes, b"/F1 12 Tf\n1 0 0 1 56 "));
    }

    #[test]
    fn long_titles_stay_inside_the_margin() {
        let title = "W".repeat(80);
        assert_eq!(centered_x(title.as_bytes(), TITLE_SIZE), MARGIN);
        assert!(centered_x(b"Report", TITLE_SIZE) > MARGIN);
    }

    #[test]
    fn escapes_parentheses_and_backslashes() {
        let bytes = render("Report", &["Top Category: Toys (Kids) \\ Games"]).expect("render");
        assert!(contains(&bytes, b"(Top Category: Toys \\(Kids\\) \\\\ Games) Tj"));
    }

    #[test]
    fn encodes_latin1_as_single_bytes() {
        let bytes = render("Report", &["Top Category: Café"]).expect("render");
        assert!(contains(&bytes, b"(Top Category: Caf\xE9) Tj"));
    }

    #[test]
    fn rejects_characters_outside_win_ansi() {
        let error = render("Report", &["Top Category: 家電"]).expect_err("unsupported");
        match error {
            RenderError::UnsupportedCharacter { character, line } => {
                assert_eq!(character, '家');
                assert_eq!(line, "Top Category: 家電");
            }
            other => panic!("expected unsupported character, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_lines_continue_on_new_page() {
        let lines: Vec<String> = (0..40).map(|index| format!("line {index}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let bytes = render("Report", &refs).expect("render");

        assert!(contains(&bytes, b"/Count 2 "));
        assert!(contains(&bytes, b"(line 39) Tj"));
    }

    #[test]
    fn empty_document_still_has_a_page() {
        let bytes = PdfDocument::new().finish().expect("render");
        assert!(contains(&bytes, b"/Type /Page "));
        assert!(contains(&bytes, b"/Count 1 "));
    }
}

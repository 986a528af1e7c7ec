//! Minimal single-page PDF writer for plain text reports.
//!
//! Only what the exporter needs: one page, black Helvetica text with Polish
//! letters remapped into the font encoding, no compression. Callers place
//! text with a top-left origin like a canvas; the writer flips it to PDF's
//! bottom-left origin.

use std::fmt::Write as _;

pub const A4_WIDTH: f32 = 595.0;
pub const A4_HEIGHT: f32 = 842.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct PdfPage {
    width: f32,
    height: f32,
    runs: Vec<TextRun>,
    producer: String,
}

impl PdfPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            runs: Vec::new(),
            producer: format!("schoold {}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.runs.push(TextRun {
            x,
            y,
            size,
            text: text.into(),
        });
    }

    fn content_stream(&self) -> Vec<u8> {
        let mut out: Vec<u8> = b"0 g\n".to_vec();
        for run in &self.runs {
            let head = format!(
                "BT /F1 {} Tf {} {} Td (",
                fmt_num(run.size),
                fmt_num(run.x),
                fmt_num(self.height - run.y)
            );
            out.extend_from_slice(head.as_bytes());
            out.extend(encode_text(&run.text));
            out.extend_from_slice(b") Tj ET\n");
        }
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let content = self.content_stream();
        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();

        let mut objects: Vec<Vec<u8>> = Vec::new();
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        objects.push(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec());
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>",
                fmt_num(self.width),
                fmt_num(self.height)
            )
            .into_bytes(),
        );
        objects.push(font_dict().into_bytes());
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
        let mut info = b"<< /Producer (".to_vec();
        info.extend(encode_text(&self.producer));
        info.extend_from_slice(format!(") /CreationDate ({}) >>", created).as_bytes());
        objects.push(info);
        let cmap = to_unicode_cmap();
        let mut cmap_stream = format!("<< /Length {} >>\nstream\n", cmap.len()).into_bytes();
        cmap_stream.extend_from_slice(cmap.as_bytes());
        cmap_stream.extend_from_slice(b"\nendstream");
        objects.push(cmap_stream);

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_at = out.len();
        let mut xref = String::new();
        let _ = writeln!(xref, "xref\n0 {}", objects.len() + 1);
        xref.push_str("0000000000 65535 f \n");
        for off in offsets {
            let _ = write!(xref, "{:010} 00000 n \n", off);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

fn fmt_num(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Letters outside Latin-1 that the reports need, with the single-byte code
/// each one is remapped to and its standard glyph name. Helvetica carries
/// all of these glyphs; the font's `/Differences` array points the codes at
/// them.
const EXTRA_GLYPHS: [(char, u8, &str); 16] = [
    ('ą', 0x01, "aogonek"),
    ('Ą', 0x02, "Aogonek"),
    ('ć', 0x03, "cacute"),
    ('Ć', 0x04, "Cacute"),
    ('ę', 0x05, "eogonek"),
    ('Ę', 0x06, "Eogonek"),
    ('ł', 0x07, "lslash"),
    ('Ł', 0x08, "Lslash"),
    ('ń', 0x09, "nacute"),
    ('Ń', 0x0A, "Nacute"),
    ('ś', 0x0B, "sacute"),
    ('Ś', 0x0C, "Sacute"),
    ('ź', 0x0D, "zacute"),
    ('Ź', 0x0E, "Zacute"),
    ('ż', 0x0F, "zdotaccent"),
    ('Ż', 0x10, "Zdotaccent"),
];

fn font_dict() -> String {
    let names: Vec<String> = EXTRA_GLYPHS
        .iter()
        .map(|(_, _, name)| format!("/{}", name))
        .collect();
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
         /Encoding << /Type /Encoding /BaseEncoding /WinAnsiEncoding \
         /Differences [{} {}] >> /ToUnicode 7 0 R >>",
        EXTRA_GLYPHS[0].1,
        names.join(" ")
    )
}

/// CMap mapping every code the writer emits back to Unicode, so text
/// extraction in other readers sees the same names.
fn to_unicode_cmap() -> String {
    let mut chars = String::new();
    for (c, code, _) in EXTRA_GLYPHS {
        let _ = writeln!(chars, "<{:02X}> <{:04X}>", code, c as u32);
    }
    format!(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<00> <FF>\nendcodespacerange\n\
         2 beginbfrange\n<20> <7E> <0020>\n<A0> <FF> <00A0>\nendbfrange\n\
         {} beginbfchar\n{}endbfchar\n\
         endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end",
        EXTRA_GLYPHS.len(),
        chars
    )
}

/// Bytes for a PDF literal string in the report font's encoding, with
/// `(`, `)` and `\` escaped. Remapped letters are written as octal escapes.
/// Characters the font cannot show become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let b = font_byte(c);
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            0x00..=0x1F => out.extend_from_slice(format!("\\{:03o}", b).as_bytes()),
            _ => out.push(b),
        }
    }
    out
}

fn font_byte(c: char) -> u8 {
    let cp = c as u32;
    if (0x20..0x7F).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return cp as u8;
    }
    EXTRA_GLYPHS
        .iter()
        .find(|(ch, _, _)| *ch == c)
        .map(|(_, code, _)| *code)
        .unwrap_or(b'?')
}

fn char_of(b: u8) -> char {
    EXTRA_GLYPHS
        .iter()
        .find(|(_, code, _)| *code == b)
        .map(|(c, _, _)| *c)
        .unwrap_or(b as char)
}

/// Text of every `Tj` run in a document produced by [`PdfPage::to_bytes`],
/// in drawing order.
pub fn extract_text(bytes: &[u8]) -> Vec<String> {
    const MARKER: &[u8] = b" Td (";
    let mut lines = Vec::new();
    let mut i = 0;
    while i + MARKER.len() <= bytes.len() {
        if &bytes[i..i + MARKER.len()] != MARKER {
            i += 1;
            continue;
        }
        i += MARKER.len();
        let mut text = String::new();
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => {
                    i += 1;
                    let digits = bytes[i..]
                        .iter()
                        .take(3)
                        .take_while(|d| (b'0'..=b'7').contains(*d))
                        .count();
                    if digits == 0 {
                        text.push(char_of(bytes[i]));
                        i += 1;
                    } else {
                        let code = bytes[i..i + digits]
                            .iter()
                            .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                        text.push(char_of(code as u8));
                        i += digits;
                    }
                }
                b')' => {
                    i += 1;
                    break;
                }
                b => {
                    text.push(char_of(b));
                    i += 1;
                }
            }
        }
        lines.push(text);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_header_xref_and_trailer() {
        let mut page = PdfPage::new(A4_WIDTH, A4_HEIGHT);
        page.text(50.0, 50.0, 12.0, "Hello");
        let bytes = page.to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/MediaBox [0 0 595 842]"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("BT /F1 12 Tf 50 792 Td (Hello) Tj ET"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut page = PdfPage::new(A4_WIDTH, A4_HEIGHT);
        page.text(50.0, 50.0, 12.0, "Kraków");
        let bytes = page.to_bytes();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let start = text.find("xref\n").expect("xref");
        let entries: Vec<usize> = text[start..]
            .lines()
            .skip(3)
            .take(7)
            .map(|l| l[..10].parse().expect("offset"))
            .collect();
        for (i, off) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert_eq!(&bytes[*off..*off + expected.len()], expected.as_bytes());
        }
    }

    #[test]
    fn encoding_escapes_and_remaps_polish_letters() {
        assert_eq!(encode_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(encode_text("Łojszczyk"), b"\\010ojszczyk".to_vec());
        assert_eq!(encode_text("Połeć"), b"Po\\007e\\003".to_vec());
        assert_eq!(encode_text("ó"), vec![0xF3]);
        assert_eq!(encode_text("日"), b"?".to_vec());
    }

    #[test]
    fn font_maps_remapped_codes_to_glyphs_and_unicode() {
        let bytes = PdfPage::new(A4_WIDTH, A4_HEIGHT).to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Differences [1 /aogonek /Aogonek /cacute"));
        assert!(text.contains("/lslash /Lslash"));
        assert!(text.contains("/ToUnicode 7 0 R"));
        assert!(text.contains("<07> <0142>"));
        assert!(text.contains("<10> <017B>"));
    }

    #[test]
    fn extract_recovers_runs_in_order() {
        let mut page = PdfPage::new(A4_WIDTH, A4_HEIGHT);
        page.text(50.0, 50.0, 12.0, "Grades for Kraków - Class 1 - Art");
        page.text(50.0, 100.0, 12.0, "Paweł Kępa: [1, 2, 3, 4]");
        page.text(50.0, 120.0, 12.0, "odd (name)");
        page.text(50.0, 140.0, 12.0, "Żaneta Łojszczyk-Ćwik, Śląsk");
        let lines = extract_text(&page.to_bytes());
        assert_eq!(
            lines,
            vec![
                "Grades for Kraków - Class 1 - Art".to_string(),
                "Paweł Kępa: [1, 2, 3, 4]".to_string(),
                "odd (name)".to_string(),
                "Żaneta Łojszczyk-Ćwik, Śląsk".to_string(),
            ]
        );
    }

    #[test]
    fn empty_page_is_still_valid() {
        let bytes = PdfPage::new(A4_WIDTH, A4_HEIGHT).to_bytes();
        assert!(extract_text(&bytes).is_empty());
        assert!(bytes.starts_with(b"%PDF-"));
    }
}

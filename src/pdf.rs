//! Fixed PDF document served at `GET /document`.
//!
//! One hardcoded page of text at a fixed font size. The output is fully
//! deterministic and never touches the record store, so the bytes are
//! assembled by a minimal single-page PDF writer: five objects (catalog,
//! page tree, page, font, content stream) and a cross-reference table.

const FONT_SIZE: u32 = 20;
const LINE_LEADING: u32 = 24;

const LINES: &[&str] = &[
    "A placer",
    "Puedes tomarte el tiempo necesario",
    "Que por mi parte yo estare esperando",
    "El dia en que te decidas a volver y ser feliz como antes fuimos",
    "Se muy bien",
    "Que como yo estaras sufriendo a diario",
    "La soledad de dos amantes que al dejarse",
    "Estan luchando cada quien por no encontrarse",
    "Y no es por eso",
    "Que haya dejado de quererte un solo dia",
    "Estoy contigo aunque estes lejos de mi vida",
    "Por tu felicidad a costa de la mia",
    "Pero si ahora tienes",
    "Tan solo la mitad del gran amor que aun te tengo",
    "Puedes jurar que al que te tiene lo bendigo",
    "Quiero que seas feliz",
    "Aunque no sea conmigo",
];

/// The complete PDF document as bytes.
pub fn fixed_document() -> Vec<u8> {
    let stream = content_stream();
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ),
    ];

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn content_stream() -> String {
    let mut s = format!("BT\n/F1 {} Tf\n{} TL\n72 720 Td\n", FONT_SIZE, LINE_LEADING);
    for line in LINES {
        s.push_str(&format!("({}) Tj\nT*\n", escape(line)));
    }
    s.push_str("ET");
    s
}

/// Escape the characters with meaning inside a PDF literal string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_pdf_magic_and_trailer() {
        let bytes = fixed_document();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(fixed_document(), fixed_document());
    }

    #[test]
    fn uses_the_fixed_font_size() {
        let bytes = fixed_document();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("/F1 20 Tf"));
        assert!(text.contains("(A placer) Tj"));
    }

    #[test]
    fn stream_length_matches_declared_length() {
        let text = String::from_utf8(fixed_document()).unwrap();
        let declared: usize = text
            .split("/Length ")
            .nth(1)
            .and_then(|rest| rest.split(' ').next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        let start = text.find("stream\n").unwrap() + "stream\n".len();
        let end = text.find("\nendstream").unwrap();
        assert_eq!(declared, end - start);
    }

    #[test]
    fn escape_handles_parentheses() {
        assert_eq!(escape("a (b) c"), "a \\(b\\) c");
    }
}

//! Static font-metric tables for the two standard PDF faces the report uses.
//!
//! Widths come from the Adobe AFM files for Helvetica and Helvetica-Bold, in
//! 1/1000 em. Tables cover ASCII 0x20..=0x7E (95 printable characters),
//! index = (char as usize) - 32. Accented Latin-1 letters measure as their
//! base letter; anything else falls back to `average_char_width`.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font face enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// Resource name of the face inside the PDF page resources.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    pub average_char_width: u16,
}

impl FontMetricTable {
    fn glyph_width(&self, c: char) -> u16 {
        let c = base_letter(c);
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '•' => 350,
            '–' => 556,
            '—' | '…' => 1000,
            '¡' => self.widths[1],
            '¿' => self.widths[31],
            '\u{a0}' => self.widths[0],
            _ => self.average_char_width,
        }
    }

    /// Measures the rendered width of a string in points at `size_pt`.
    pub fn measure_str(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s.chars().map(|c| self.glyph_width(c) as u32).sum();
        units as f32 * size_pt / 1000.0
    }

    /// Greedy word-wrap of `text` to `max_width` points.
    ///
    /// Explicit newlines start a new paragraph. A word wider than the line is
    /// broken between characters. Blank input yields no lines.
    pub fn wrap(&self, text: &str, max_width: f32, size_pt: f32) -> Vec<String> {
        let space_w = self.measure_str(" ", size_pt);
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut current = String::new();
            let mut current_width = 0.0_f32;

            for word in paragraph.split_whitespace() {
                for piece in self.split_long_word(word, max_width, size_pt) {
                    let word_w = self.measure_str(&piece, size_pt);

                    if current.is_empty() {
                        current = piece;
                        current_width = word_w;
                    } else if current_width + space_w + word_w > max_width {
                        lines.push(std::mem::take(&mut current));
                        current = piece;
                        current_width = word_w;
                    } else {
                        current.push(' ');
                        current.push_str(&piece);
                        current_width += space_w + word_w;
                    }
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }

        lines
    }

    /// Returns `text` unchanged when it fits in `max_width`, otherwise the
    /// longest prefix that fits once "..." is appended.
    pub fn truncate_to_width(&self, text: &str, max_width: f32, size_pt: f32) -> String {
        if self.measure_str(text, size_pt) <= max_width {
            return text.to_string();
        }
        self.ellipsize(text, max_width, size_pt)
    }

    /// Always appends "...", dropping trailing characters until the result fits.
    pub fn ellipsize(&self, text: &str, max_width: f32, size_pt: f32) -> String {
        let mut kept = text.trim_end().to_string();
        loop {
            let candidate = format!("{kept}...");
            if kept.is_empty() || self.measure_str(&candidate, size_pt) <= max_width {
                return candidate;
            }
            kept.pop();
            kept.truncate(kept.trim_end().len());
        }
    }

    fn split_long_word(&self, word: &str, max_width: f32, size_pt: f32) -> Vec<String> {
        if self.measure_str(word, size_pt) <= max_width {
            return vec![word.to_string()];
        }
        let mut pieces = Vec::new();
        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if self.measure_str(&piece, size_pt) > max_width && piece.chars().count() > 1 {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

/// Maps accented Latin-1 letters to the ASCII letter with the same advance width.
fn base_letter(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Regular => &HELVETICA_TABLE,
        FontFace::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFace::Regular).measure_str("", 10.0), 0.0);
    }

    #[test]
    fn test_measure_str_scales_with_size() {
        let metrics = get_metrics(FontFace::Regular);
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056 units
        let width = metrics.measure_str("Rust", 10.0);
        assert!((width - 20.56).abs() < 1e-3, "got {width}");
        let doubled = metrics.measure_str("Rust", 20.0);
        assert!((doubled - 2.0 * width).abs() < 1e-3);
    }

    #[test]
    fn test_accented_letters_measure_as_base_letter() {
        let metrics = get_metrics(FontFace::Regular);
        assert_eq!(
            metrics.measure_str("María Pérez", 12.0),
            metrics.measure_str("Maria Perez", 12.0)
        );
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Compatibilidad";
        assert!(
            get_metrics(FontFace::Bold).measure_str(text, 10.0)
                > get_metrics(FontFace::Regular).measure_str(text, 10.0)
        );
    }

    #[test]
    fn test_wrap_blank_text_yields_no_lines() {
        assert!(get_metrics(FontFace::Regular)
            .wrap("   \n  ", 100.0, 10.0)
            .is_empty());
    }

    #[test]
    fn test_wrap_lines_fit_width_and_keep_all_words() {
        let metrics = get_metrics(FontFace::Regular);
        let text = "Lideró la migración de servicios críticos a una arquitectura orientada a \
                    eventos reduciendo la latencia en un cuarenta por ciento";
        let lines = metrics.wrap(text, 150.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.measure_str(line, 10.0) <= 150.0, "overflow: {line}");
        }
        assert_eq!(
            lines.join(" "),
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }

    #[test]
    fn test_wrap_breaks_words_longer_than_line() {
        let metrics = get_metrics(FontFace::Regular);
        let word = "x".repeat(80);
        let lines = metrics.wrap(&word, 100.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_respects_explicit_newlines() {
        let lines = get_metrics(FontFace::Regular).wrap("uno\ndos", 500.0, 10.0);
        assert_eq!(lines, vec!["uno".to_string(), "dos".to_string()]);
    }

    #[test]
    fn test_ellipsize_always_marks_text() {
        let metrics = get_metrics(FontFace::Regular);
        assert_eq!(metrics.ellipsize("fin", 200.0, 10.0), "fin...");
        let clipped = metrics.ellipsize("una línea bastante larga", 60.0, 10.0);
        assert!(clipped.ends_with("..."));
        assert!(metrics.measure_str(&clipped, 10.0) <= 60.0);
    }

    #[test]
    fn test_truncate_to_width_adds_ellipsis() {
        let metrics = get_metrics(FontFace::Bold);
        let short = metrics.truncate_to_width("Rust", 200.0, 9.0);
        assert_eq!(short, "Rust");
        let long = metrics.truncate_to_width(&"Kubernetes ".repeat(10), 60.0, 9.0);
        assert!(long.ends_with("..."));
        assert!(metrics.measure_str(&long, 9.0) <= 60.0);
    }
}

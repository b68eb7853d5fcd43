//! The boundary interface that feeds a buffer its initial bytes, per §6.

/// End-of-line convention declared by the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eol {
    Lf,
    CrLf,
    Cr,
}

impl Eol {
    pub fn as_str(self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::CrLf => "\r\n",
            Eol::Cr => "\r",
        }
    }
}

/// The raw buffer a text source exposes: the bytes themselves plus the
/// absolute offset of every `\n`, so a buffer constructor need not
/// re-scan the document to discover its initial line structure.
#[derive(Debug, Clone)]
pub struct RawBuffer {
    pub text: Vec<u8>,
    /// Absolute byte offset of each `\n` in `text`.
    pub line_starts: Vec<u32>,
}

impl RawBuffer {
    pub fn new(text: Vec<u8>) -> Self {
        let line_starts = text
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == b'\n')
            .map(|(i, _)| i as u32)
            .collect();
        RawBuffer { text, line_starts }
    }

    /// Implied line count minus one: the number of `\n` characters.
    pub fn length(&self) -> usize {
        self.line_starts.len()
    }
}

/// Everything a buffer needs from an external document source to
/// initialize itself: a BOM, an EOL convention, ASCII/RTL hints, and the
/// raw bytes plus their line starts.
pub trait TextSource {
    fn bom(&self) -> &str;
    fn eol(&self) -> Eol;
    fn is_basic_ascii(&self) -> bool;
    fn contains_rtl(&self) -> bool;
    fn raw_buffer(&self) -> &RawBuffer;
}

/// A straightforward in-memory [`TextSource`], scanning the supplied
/// bytes once at construction to fill in the ASCII/RTL hints.
pub struct RawTextSource {
    bom: String,
    eol: Eol,
    is_basic_ascii: bool,
    contains_rtl: bool,
    buffer: RawBuffer,
}

impl RawTextSource {
    pub fn new(text: Vec<u8>, eol: Eol) -> Self {
        let is_basic_ascii = text.iter().all(|&b| b < 0x80);
        let contains_rtl = contains_rtl_bytes(&text);
        RawTextSource {
            bom: String::new(),
            eol,
            is_basic_ascii,
            contains_rtl,
            buffer: RawBuffer::new(text),
        }
    }

    pub fn with_bom(mut self, bom: impl Into<String>) -> Self {
        self.bom = bom.into();
        self
    }
}

impl TextSource for RawTextSource {
    fn bom(&self) -> &str {
        &self.bom
    }

    fn eol(&self) -> Eol {
        self.eol
    }

    fn is_basic_ascii(&self) -> bool {
        self.is_basic_ascii
    }

    fn contains_rtl(&self) -> bool {
        self.contains_rtl
    }

    fn raw_buffer(&self) -> &RawBuffer {
        &self.buffer
    }
}

/// True if every byte is 7-bit ASCII.
pub(crate) fn is_basic_ascii_bytes(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b < 0x80)
}

/// Coarse RTL detection: true if any decoded scalar falls in a
/// right-to-left Unicode block (Hebrew, Arabic and their extensions).
/// Matches the depth of check the applier needs (a hint, not a full
/// bidi analysis) without pulling in a bidi crate.
pub(crate) fn contains_rtl_bytes(bytes: &[u8]) -> bool {
    String::from_utf8_lossy(bytes).chars().any(is_rtl_char)
}

fn is_rtl_char(c: char) -> bool {
    matches!(c as u32,
        0x0590..=0x05FF // Hebrew
        | 0x0600..=0x06FF // Arabic
        | 0x0700..=0x074F // Syriac
        | 0x0750..=0x077F // Arabic Supplement
        | 0x08A0..=0x08FF // Arabic Extended-A
        | 0xFB1D..=0xFDFF // Hebrew/Arabic presentation forms
        | 0xFE70..=0xFEFF
    )
}

#[cfg(test)]
#[path = "text_source_tests.rs"]
mod tests;

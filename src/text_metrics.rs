//! Text measurement without a layout engine.
//!
//! Every margin the axis and plane layout derives depends on these numbers,
//! so each strategy is a pure function of its inputs.

use crate::config::{Config, TextMetricsKind};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use regex::Regex;
use ttf_parser::Face;

/// "Main title (parenthetical suffix)".
static PARENTHETICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<main>.*?\S)\s*(?P<suffix>\([^()]*\))$").unwrap());

const WIDTH_SAMPLE: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

impl TextBlock {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapPolicy {
    /// Titles longer than this with a trailing parenthetical split before it.
    pub parenthetical_chars: usize,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl Default for WrapPolicy {
    fn default() -> Self {
        Self {
            parenthetical_chars: 40,
            line_height: 1.2,
        }
    }
}

pub trait TextMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64;

    fn average_char_width(&self, font_size: f64) -> f64;

    fn wrap_policy(&self) -> WrapPolicy;

    fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.wrap_policy().line_height
    }

    /// Measure `text`, wrapping it into at most two lines when it does not
    /// fit in `max_width`. Single words are never broken.
    fn measure(&self, text: &str, max_width: f64, font_size: f64) -> TextBlock {
        let text = text.trim();
        if text.is_empty() {
            return TextBlock::empty();
        }
        let lines = wrap_lines(self, text, max_width, font_size);
        let width = lines
            .iter()
            .map(|line| self.text_width(line, font_size))
            .fold(0.0, f64::max);
        let height = lines.len() as f64 * self.line_height(font_size);
        TextBlock {
            lines,
            width,
            height,
        }
    }
}

fn wrap_lines<M: TextMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    max_width: f64,
    font_size: f64,
) -> Vec<String> {
    let policy = metrics.wrap_policy();
    if text.chars().count() > policy.parenthetical_chars
        && let Some(caps) = PARENTHETICAL_RE.captures(text)
    {
        return vec![caps["main"].to_string(), caps["suffix"].to_string()];
    }

    if metrics.text_width(text, font_size) <= max_width {
        return vec![text.to_string()];
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 {
        return vec![text.to_string()];
    }
    let split = words.len().div_ceil(2);
    vec![words[..split].join(" "), words[split..].join(" ")]
}

/// Average-character-width estimate: `chars x font_size x ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMetrics {
    pub char_width_ratio: f64,
    pub policy: WrapPolicy,
}

impl HeuristicMetrics {
    pub fn new(char_width_ratio: f64, policy: WrapPolicy) -> Self {
        Self {
            char_width_ratio,
            policy,
        }
    }
}

impl Default for HeuristicMetrics {
    fn default() -> Self {
        Self::new(0.6, WrapPolicy::default())
    }
}

impl TextMetrics for HeuristicMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.average_char_width(font_size)
    }

    fn average_char_width(&self, font_size: f64) -> f64 {
        font_size.max(0.0) * self.char_width_ratio
    }

    fn wrap_policy(&self) -> WrapPolicy {
        self.policy
    }
}

/// Glyph advances from a system font, falling back to the heuristic for
/// glyphs the font lacks or when no font could be loaded.
pub struct FontMetrics {
    face: Option<LoadedFace>,
    fallback: HeuristicMetrics,
}

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl FontMetrics {
    pub fn load(font_family: &str, fallback: HeuristicMetrics) -> Self {
        Self {
            face: load_face(font_family),
            fallback,
        }
    }

    pub fn has_font(&self) -> bool {
        self.face.is_some()
    }

    fn measure_width(&self, face: &LoadedFace, text: &str, font_size: f64) -> f64 {
        let scale = font_size / face.units_per_em as f64;
        let fallback = self.fallback.average_char_width(font_size);

        if text.is_ascii() {
            return text
                .bytes()
                .map(|byte| match face.ascii_advances[byte as usize] {
                    0 => fallback,
                    advance => advance as f64 * scale,
                })
                .sum();
        }

        let Ok(parsed) = Face::parse(&face.data, face.index) else {
            return self.fallback.text_width(text, font_size);
        };
        text.chars()
            .map(|ch| {
                parsed
                    .glyph_index(ch)
                    .and_then(|glyph| parsed.glyph_hor_advance(glyph))
                    .map(|advance| advance as f64 * scale)
                    .unwrap_or(fallback)
            })
            .sum()
    }
}

impl TextMetrics for FontMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        if text.is_empty() || font_size <= 0.0 {
            return 0.0;
        }
        match &self.face {
            Some(face) => self.measure_width(face, text, font_size),
            None => self.fallback.text_width(text, font_size),
        }
    }

    fn average_char_width(&self, font_size: f64) -> f64 {
        let count = WIDTH_SAMPLE.chars().count() as f64;
        self.text_width(WIDTH_SAMPLE, font_size) / count
    }

    fn wrap_policy(&self) -> WrapPolicy {
        self.fallback.policy
    }
}

fn load_face(font_family: &str) -> Option<LoadedFace> {
    #[derive(Clone, Copy)]
    enum FamilyToken {
        Generic(Family<'static>),
        Name(usize),
    }

    let mut names: Vec<String> = Vec::new();
    let mut order: Vec<FamilyToken> = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        match raw.to_ascii_lowercase().as_str() {
            "serif" => order.push(FamilyToken::Generic(Family::Serif)),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                order.push(FamilyToken::Generic(Family::SansSerif))
            }
            "monospace" | "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
            _ => {
                order.push(FamilyToken::Name(names.len()));
                names.push(raw.to_string());
            }
        }
    }
    if order.is_empty() {
        order.push(FamilyToken::Generic(Family::SansSerif));
    }
    let families: Vec<Family<'_>> = order
        .iter()
        .map(|token| match *token {
            FamilyToken::Generic(family) => family,
            FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
        })
        .collect();

    let mut db = Database::new();
    db.load_system_fonts();
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| {
        let face = Face::parse(data, index).ok()?;
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(LoadedFace {
            data: data.to_vec(),
            index,
            units_per_em: face.units_per_em().max(1),
            ascii_advances,
        })
    })
    .flatten()
}

/// Build the measurement strategy a config asks for.
pub fn metrics_for(config: &Config) -> Box<dyn TextMetrics> {
    let heuristic = HeuristicMetrics::new(
        config.layout.char_width_ratio,
        WrapPolicy {
            parenthetical_chars: config.layout.title_wrap_chars,
            line_height: config.layout.label_line_height,
        },
    );
    match config.layout.text_metrics {
        TextMetricsKind::Heuristic => Box::new(heuristic),
        TextMetricsKind::Font => Box::new(FontMetrics::load(&config.theme.font_family, heuristic)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width_is_chars_times_average() {
        let metrics = HeuristicMetrics::default();
        assert!((metrics.text_width("Hello", 10.0) - 30.0).abs() < 1e-9);
        assert!((metrics.average_char_width(20.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let metrics = HeuristicMetrics::default();
        let block = metrics.measure("Height", 500.0, 14.0);
        assert_eq!(block.line_count(), 1);
        assert!((block.height - 14.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn long_text_wraps_into_two_balanced_lines() {
        let metrics = HeuristicMetrics::default();
        let block = metrics.measure("one two three four five", 60.0, 12.0);
        assert_eq!(block.lines, vec!["one two three", "four five"]);
        assert!((block.height - 2.0 * 12.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn single_long_word_is_never_split() {
        let metrics = HeuristicMetrics::default();
        let block = metrics.measure("Pneumonoultramicroscopicsilicovolcanoconiosis", 50.0, 12.0);
        assert_eq!(block.line_count(), 1);
        assert!(block.width > 50.0);
    }

    #[test]
    fn long_parenthetical_title_splits_before_suffix() {
        let metrics = HeuristicMetrics::default();
        let title = "Average Monthly Rainfall Across Coastal Cities (millimeters)";
        let block = metrics.measure(title, 10_000.0, 16.0);
        assert_eq!(
            block.lines,
            vec!["Average Monthly Rainfall Across Coastal Cities", "(millimeters)"]
        );
    }

    #[test]
    fn short_parenthetical_title_is_left_alone() {
        let metrics = HeuristicMetrics::default();
        let block = metrics.measure("Height (cm)", 10_000.0, 16.0);
        assert_eq!(block.lines, vec!["Height (cm)"]);
    }

    #[test]
    fn measurement_is_deterministic() {
        let metrics = HeuristicMetrics::default();
        let a = metrics.measure("Number of students per classroom", 80.0, 13.0);
        let b = metrics.measure("Number of students per classroom", 80.0, 13.0);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_text_measures_to_nothing() {
        let metrics = HeuristicMetrics::default();
        let block = metrics.measure("   ", 100.0, 12.0);
        assert!(block.is_empty());
        assert_eq!(block.height, 0.0);
    }

    #[test]
    fn font_metrics_never_reports_negative_width() {
        let metrics = FontMetrics::load("sans-serif", HeuristicMetrics::default());
        let width = metrics.text_width("Axis label", 12.0);
        assert!(width > 0.0);
        assert_eq!(metrics.text_width("", 12.0), 0.0);
    }
}

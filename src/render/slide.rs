use serde::Serialize;

use crate::models::{PresentationBundle, Slide};

use super::markup::{parse_markup, Span, SpanKind};
use super::theme::{get_font_settings, get_theme, FontSettings, TextStyle, Theme};

/// Delay between the headline entering and the body entering.
const BODY_STAGGER_MS: u32 = 250;
const STATEMENT_SCALE_PERCENT: u32 = 125;
const NARRATIVE_SCALE_PERCENT: u32 = 115;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Headline only.
    Statement,
    /// Body only.
    Narrative,
    /// Headline and body.
    Standard,
    /// No text at all.
    Blank,
}

impl LayoutMode {
    pub fn for_slide(slide: &Slide) -> Self {
        match (present(&slide.headline), present(&slide.body_text)) {
            (Some(_), None) => LayoutMode::Statement,
            (None, Some(_)) => LayoutMode::Narrative,
            (Some(_), Some(_)) => LayoutMode::Standard,
            (None, None) => LayoutMode::Blank,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Statement => "statement",
            LayoutMode::Narrative => "narrative",
            LayoutMode::Standard => "standard",
            LayoutMode::Blank => "blank",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BlockRole {
    Headline,
    Body,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub role: BlockRole,
    pub spans: Vec<Span>,
    pub style: TextStyle,
    pub enter_delay_ms: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSlide {
    pub slide_id: i64,
    pub layout: LayoutMode,
    pub background: String,
    pub accent: String,
    pub highlight: String,
    pub image_url: Option<String>,
    pub blocks: Vec<TextBlock>,
}

/// Resolved theme and fonts for one presentation.
#[derive(Debug, Clone)]
pub struct PresentationStyle {
    pub theme: &'static Theme,
    pub fonts: FontSettings,
}

impl PresentationStyle {
    pub fn from_bundle(bundle: &PresentationBundle) -> Self {
        let theme = get_theme(&bundle.theme);
        Self {
            theme,
            fonts: get_font_settings(&bundle.fonts, theme),
        }
    }
}

pub fn render_slide(slide: &Slide, style: &PresentationStyle) -> RenderedSlide {
    let layout = LayoutMode::for_slide(slide);
    let headline = present(&slide.headline);
    let body = present(&slide.body_text);

    let mut blocks = Vec::with_capacity(2);
    match layout {
        LayoutMode::Statement => {
            if let Some(text) = headline {
                blocks.push(TextBlock {
                    role: BlockRole::Headline,
                    spans: parse_markup(text),
                    style: scaled(&style.fonts.headline, STATEMENT_SCALE_PERCENT),
                    enter_delay_ms: 0,
                });
            }
        }
        LayoutMode::Narrative => {
            if let Some(text) = body {
                let mut body_style = scaled(&style.fonts.body, NARRATIVE_SCALE_PERCENT);
                body_style.color = style.theme.text.to_string();
                blocks.push(TextBlock {
                    role: BlockRole::Body,
                    spans: parse_markup(text),
                    style: body_style,
                    enter_delay_ms: 0,
                });
            }
        }
        LayoutMode::Standard => {
            if let (Some(headline), Some(body)) = (headline, body) {
                blocks.push(TextBlock {
                    role: BlockRole::Headline,
                    spans: parse_markup(headline),
                    style: style.fonts.headline.clone(),
                    enter_delay_ms: 0,
                });
                blocks.push(TextBlock {
                    role: BlockRole::Body,
                    spans: parse_markup(body),
                    style: style.fonts.body.clone(),
                    enter_delay_ms: BODY_STAGGER_MS,
                });
            }
        }
        LayoutMode::Blank => {}
    }

    RenderedSlide {
        slide_id: slide.id,
        layout,
        background: style.theme.background.to_string(),
        accent: style.theme.accent.to_string(),
        highlight: style.theme.highlight.to_string(),
        image_url: slide.image_url.clone().filter(|url| !url.trim().is_empty()),
        blocks,
    }
}

impl RenderedSlide {
    /// Block text with markup removed, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.spans.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HTML fragment with inline styles.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<section class="slide slide--{}" style="background:{}">"#,
            self.layout.as_str(),
            escape_html(&self.background)
        );
        if let Some(url) = &self.image_url {
            html.push_str(&format!(
                r#"<img class="slide__image" src="{}" alt="">"#,
                escape_html(url)
            ));
        }
        for block in &self.blocks {
            let tag = match block.role {
                BlockRole::Headline => "h1",
                BlockRole::Body => "p",
            };
            html.push_str(&format!(
                r#"<{tag} style="font-family:'{}';font-size:{}px;font-weight:{};color:{};animation-delay:{}ms">"#,
                escape_html(&block.style.font_family),
                block.style.size_px,
                block.style.weight,
                escape_html(&block.style.color),
                block.enter_delay_ms,
            ));
            for span in &block.spans {
                html.push_str(&self.span_html(span));
            }
            html.push_str(&format!("</{tag}>"));
        }
        html.push_str("</section>");
        html
    }

    fn span_html(&self, span: &Span) -> String {
        let text = escape_html(&span.text);
        match span.kind {
            SpanKind::Plain => text,
            SpanKind::Accent => format!(
                r#"<strong style="color:{}">{text}</strong>"#,
                escape_html(&self.accent)
            ),
            SpanKind::Underline => format!("<u>{text}</u>"),
            SpanKind::Highlight => format!(
                r#"<mark style="background:{}">{text}</mark>"#,
                escape_html(&self.highlight)
            ),
        }
    }
}

fn present(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

fn scaled(style: &TextStyle, percent: u32) -> TextStyle {
    let size = u32::from(style.size_px) * percent / 100;
    TextStyle {
        size_px: u16::try_from(size).unwrap_or(u16::MAX),
        ..style.clone()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

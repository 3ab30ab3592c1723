#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"(?is)<script\b.*?</script\s*>").unwrap());
static IFRAME_BLOCK: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"(?is)<iframe\b.*?</iframe\s*>").unwrap());
static EVENT_HANDLER_ATTR: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r#"(?i)\son\w+\s*=\s*("[^"]*"|'[^']*')"#).unwrap());
static JAVASCRIPT_URI: Lazy<Regex> = Lazy::new(|| return Regex::new(r"(?i)javascript:").unwrap());

static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    return Regex::new(r"(?i)<br\s*/?>|</(?:p|div|h[1-6]|li|tr|ul|ol|table|blockquote)\s*>")
        .unwrap();
});
static TAG: Lazy<Regex> = Lazy::new(|| return Regex::new(r"(?s)<[^>]*>").unwrap());

/// Best-effort denylist applied before any template HTML is rendered, in
/// order: script elements with their content, iframe elements with their
/// content, inline event-handler attributes, and `javascript:` URI schemes.
/// This is not an exhaustive sanitizer; the preview targets trusted authors.
pub fn sanitize_html(html: &str) -> String {
    let mut cleaned = SCRIPT_BLOCK.replace_all(html, "").to_string();
    cleaned = IFRAME_BLOCK.replace_all(&cleaned, "").to_string();
    cleaned = EVENT_HANDLER_ATTR.replace_all(&cleaned, "").to_string();
    cleaned = JAVASCRIPT_URI.replace_all(&cleaned, "").to_string();

    return cleaned;
}

/// Reduces sanitized HTML to plain text lines: block-level closers become
/// line breaks, remaining markup is dropped, and common entities are decoded.
pub fn html_to_lines(html: &str) -> Vec<String> {
    let broken = BLOCK_BREAK.replace_all(html, "\n");
    let stripped = TAG.replace_all(&broken, "");
    let decoded = decode_entities(&stripped);

    let mut lines: Vec<String> = vec![];
    for raw in decoded.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            // Collapse runs of blank lines down to one.
            if lines.last().map(|l| return l.is_empty()).unwrap_or(true) {
                continue;
            }
            lines.push("".to_string());
        } else {
            lines.push(line.to_string());
        }
    }

    while lines.last().map(|l| return l.is_empty()).unwrap_or(false) {
        lines.pop();
    }

    return lines;
}

fn decode_entities(text: &str) -> String {
    return text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    Empty,
    Content,
}

/// Isolated rendering surface for template HTML. The pane owns its line
/// buffer and styles, so template markup can neither inherit from nor leak
/// into the host UI. Created once per editor session and updated in place;
/// every update fully replaces the previous content.
pub struct PreviewPane {
    state: PreviewState,
    lines: Vec<String>,
}

impl Default for PreviewPane {
    fn default() -> PreviewPane {
        return PreviewPane {
            state: PreviewState::Loading,
            lines: vec![],
        };
    }
}

impl PreviewPane {
    pub fn state(&self) -> PreviewState {
        return self.state;
    }

    pub fn lines(&self) -> &[String] {
        return &self.lines;
    }

    /// Pushes new content into the pane. Blank input shows the empty
    /// placeholder rather than a blank surface.
    pub fn set_content(&mut self, html: &str) {
        if html.trim().is_empty() {
            self.clear();
            return;
        }

        self.lines = html_to_lines(&sanitize_html(html));
        self.state = PreviewState::Content;
    }

    pub fn clear(&mut self) {
        self.lines = vec![];
        self.state = PreviewState::Empty;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<'_, B>, rect: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Preview")
            .padding(Padding::new(1, 1, 0, 0));

        let paragraph = match self.state {
            PreviewState::Loading => Paragraph::new("Loading preview...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            PreviewState::Empty => Paragraph::new("No preview content")
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .alignment(Alignment::Center),
            PreviewState::Content => {
                let lines = self
                    .lines
                    .iter()
                    .map(|line| return Line::from(line.to_string()))
                    .collect::<Vec<Line<'_>>>();
                Paragraph::new(lines).wrap(Wrap { trim: false })
            }
        };

        frame.render_widget(paragraph.block(block), rect);
    }
}

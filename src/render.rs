//! Turning styled text into terminal escapes or HTML.
//!
//! A [`Renderer`] is picked once per runner from the [`ExecutionContext`]; the
//! runner never branches on the context for formatting after that.

use crate::env::ExecutionContext;
use crate::style::Style;

/// Opening of the document, up to the first line of the script.
const DOCUMENT_HEADER: &str = r#"
<!DOCTYPE html>
<html lang="en-US">
<head>
<meta charset="UTF-8">
<title>Command script</title>
</head>

<body>
    <pre><code class="sh">#!/bin/bash<br />"#;

const DOCUMENT_FOOTER: &str = r#"</code></pre>
<style>
    html, body {padding: 0; margin: 0; min-height: 100%; height: 100%; background-color: #300a24; color: #fff;}
    pre {
        font-family: Consolas, Monaco, Lucida Console, Liberation Mono, DejaVu Sans Mono, Bitstream Vera Sans Mono, Courier New, monospace;
    }
    strong {display: block; color: teal;}
    i {color: green; font-style: normal;}
</style>
</body>
</html>

"#;

pub trait Renderer {
    fn context(&self) -> ExecutionContext;

    /// Emitted once when a runner is created. Empty when nothing is needed.
    fn header(&self) -> String;

    /// Emitted once when a runner is torn down.
    fn footer(&self) -> String;

    fn line_breaks(&self, count: usize) -> String;

    /// `text` in `style`, preceded by `blank_lines` line breaks.
    fn styled(&self, text: &str, style: Style, blank_lines: usize) -> String;

    /// A line that is invisible when the output is viewed but turns into a
    /// harmless `tput`/`echo` announcing `comment` once the output is copied
    /// into a shell. `None` when the renderer has no hidden text.
    fn hidden_echo(&self, comment: &str) -> Option<String>;
}

pub fn for_context(context: ExecutionContext) -> Box<dyn Renderer> {
    match context {
        ExecutionContext::Interactive => Box::new(TerminalRenderer),
        ExecutionContext::Document => Box::new(DocumentRenderer),
    }
}

/// ANSI colours and plain newlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::Interactive
    }

    fn header(&self) -> String {
        String::new()
    }

    fn footer(&self) -> String {
        self.line_breaks(3)
    }

    fn line_breaks(&self, count: usize) -> String {
        "\n".repeat(count)
    }

    fn styled(&self, text: &str, style: Style, blank_lines: usize) -> String {
        format!(
            "{}\x1b[{}m{}\x1b[0m",
            self.line_breaks(blank_lines),
            style.terminal_code(),
            text
        )
    }

    fn hidden_echo(&self, _comment: &str) -> Option<String> {
        None
    }
}

/// HTML document that reads as a bash script.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRenderer;

impl Renderer for DocumentRenderer {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::Document
    }

    fn header(&self) -> String {
        DOCUMENT_HEADER.to_string()
    }

    fn footer(&self) -> String {
        DOCUMENT_FOOTER.to_string()
    }

    fn line_breaks(&self, count: usize) -> String {
        "<br />".repeat(count)
    }

    fn styled(&self, text: &str, style: Style, blank_lines: usize) -> String {
        let colour = style.display_colour();
        let text = html_escape(text);
        if blank_lines == 0 {
            format!(r#"<span style="color: {colour}">{text}</span>"#)
        } else {
            // a div already ends the previous line
            format!(
                r#"{}<div style="color: {colour}">{text}</div>"#,
                self.line_breaks(blank_lines - 1)
            )
        }
    }

    fn hidden_echo(&self, comment: &str) -> Option<String> {
        Some(format!(
            r#"<div style="color: transparent">tput setaf 33; echo " _____ : {}" ____ </div>"#,
            html_escape(&shell_quote_escape(comment))
        ))
    }
}

pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Backslash-escape quotes, backslashes and NUL so `text` survives inside a double-quoted echo.
fn shell_quote_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '"' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_styles_with_escape_codes_after_padding() {
        let r = TerminalRenderer;
        assert_eq!(r.styled("hi", Style::Red, 2), "\n\n\x1b[0;31mhi\x1b[0m");
        assert_eq!(r.styled("hi", Style::Blue, 0), "\x1b[0;34mhi\x1b[0m");
    }

    #[test]
    fn terminal_has_no_header_and_blank_footer() {
        let r = TerminalRenderer;
        assert_eq!(r.header(), "");
        assert_eq!(r.footer(), "\n\n\n");
        assert_eq!(r.hidden_echo("anything"), None);
    }

    #[test]
    fn document_uses_span_without_padding() {
        let r = DocumentRenderer;
        assert_eq!(
            r.styled("a < b", Style::Green, 0),
            r#"<span style="color: green">a &lt; b</span>"#
        );
    }

    #[test]
    fn document_div_counts_as_one_line_break() {
        let r = DocumentRenderer;
        assert_eq!(
            r.styled("x", Style::LightPurple, 1),
            r#"<div style="color: violet">x</div>"#
        );
        assert_eq!(
            r.styled("x", Style::DarkGray, 3),
            r##"<br /><br /><div style="color: #555">x</div>"##
        );
    }

    #[test]
    fn document_frames_a_bash_script() {
        let r = DocumentRenderer;
        assert!(r.header().contains("<!DOCTYPE html>"));
        assert!(r.header().ends_with("#!/bin/bash<br />"));
        assert!(r.footer().contains("<style>"));
        assert!(r.footer().contains("</html>"));
    }

    #[test]
    fn hidden_echo_is_transparent_and_escaped() {
        let line = DocumentRenderer.hidden_echo(r#"say "hi" & <leave>"#).unwrap();
        assert_eq!(
            line,
            r#"<div style="color: transparent">tput setaf 33; echo " _____ : say \&quot;hi\&quot; &amp; &lt;leave&gt;" ____ </div>"#
        );
    }

    #[test]
    fn renderer_follows_context() {
        assert_eq!(
            for_context(ExecutionContext::Document).context(),
            ExecutionContext::Document
        );
        assert_eq!(
            for_context(ExecutionContext::Interactive).context(),
            ExecutionContext::Interactive
        );
    }

    #[test]
    fn escapes_all_markup_characters() {
        assert_eq!(html_escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}

//! Printable export of a rendered reply.
//!
//! Wraps an HTML fragment from [`crate::render`] in a self-contained
//! document with a title banner, a print stylesheet and a "Generated on"
//! footer, ready to be opened in a browser and printed to PDF. The core
//! crate does not read the clock: the caller supplies the timestamp.

use crate::escape::escape_html;

/// Title used when the caller does not pick one.
pub const DEFAULT_TITLE: &str = "Assistant Response";

const STYLESHEET: &str = "\
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; }
h1, h2, h3 { color: #2c3e50; margin-top: 30px; margin-bottom: 15px; }
h1 { font-size: 24px; }
h2 { font-size: 20px; }
h3 { font-size: 18px; }
p { margin-bottom: 15px; text-align: justify; }
code { background-color: #f4f4f4; padding: 2px 6px; border-radius: 3px; font-family: 'Courier New', monospace; font-size: 14px; }
pre { background-color: #f8f9fa; border: 1px solid #e9ecef; border-radius: 6px; padding: 16px; margin: 20px 0; overflow-x: auto; }
pre code { background: none; padding: 0; font-size: 13px; line-height: 1.4; }
strong { font-weight: 600; color: #2c3e50; }
em { font-style: italic; color: #555; }
hr { border: none; border-top: 2px solid #eee; margin: 30px 0; }
.header { text-align: center; border-bottom: 2px solid #3498db; padding-bottom: 20px; margin-bottom: 30px; }
.header h1 { color: #3498db; margin: 0; }
.timestamp { color: #666; font-size: 12px; text-align: right; margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; }
@media print {
  body { font-size: 12px; line-height: 1.4; }
  h1 { font-size: 18px; }
  h2 { font-size: 16px; }
  h3 { font-size: 14px; }
  pre { page-break-inside: avoid; }
  .header { page-break-after: avoid; }
}
";

/// Document template for printing a single reply.
///
/// ```rust
/// use chatmd_core::export::PrintableDocument;
///
/// let html = PrintableDocument::new("Incident notes")
///     .generated_at("2024-05-01 12:00")
///     .wrap(&chatmd_core::render("**done**"));
/// assert!(html.starts_with("<!DOCTYPE html>"));
/// assert!(html.contains("<strong>done</strong>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableDocument {
    title: String,
    generated_at: Option<String>,
}

impl Default for PrintableDocument {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl PrintableDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated_at: None,
        }
    }

    /// Timestamp shown in the footer. Without one the footer is omitted.
    pub fn generated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Wrap an already rendered fragment. The fragment is inserted as-is;
    /// title and timestamp are escaped.
    pub fn wrap(&self, fragment: &str) -> String {
        let title = escape_html(&self.title);
        let footer = match &self.generated_at {
            Some(ts) => format!(
                "<div class=\"timestamp\">Generated on: {}</div>\n",
                escape_html(ts)
            ),
            None => String::new(),
        };

        format!(
            "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>{title}</title>\n\
<style>\n{STYLESHEET}</style>\n\
</head>\n\
<body>\n\
<div class=\"header\"><h1>{title}</h1></div>\n\
<div class=\"content\">\n\
{fragment}\n\
</div>\n\
{footer}\
</body>\n\
</html>\n"
        )
    }
}

use ninni_chat::Sender;
use pulldown_cmark::{html, Event, Options, Parser};

/// Render markdown to HTML; raw HTML in the source is shown as text
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Render a message body: assistant text as markdown, user text verbatim
pub fn render_message_content(content: &str, sender: Sender) -> String {
    match sender {
        Sender::Assistant => render_markdown(content),
        Sender::User => crate::utils::escape_html(content).replace('\n', "<br>"),
    }
}

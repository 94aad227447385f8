use std::path::Path;

use super::{prepare_file_content, Field, Paragraph};

/// Builder for a message posted with
/// [`SciLog::send_logbook_message`](crate::scilog::SciLog::send_logbook_message).
///
/// Attachments are only recorded here; they are uploaded when the message is
/// sent, in the order they were added.
#[derive(Debug, Clone)]
pub struct LogbookMessage {
    content: Paragraph,
}

impl Default for LogbookMessage {
    fn default() -> Self {
        let mut content = Paragraph::new("");
        content.base.files = Field::Value(Vec::new());
        content.base.tags = Field::Value(Vec::new());
        Self { content }
    }
}

impl LogbookMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, text: &str) -> &mut Self {
        self.content
            .textcontent
            .get_or_insert_with(String::new)
            .push_str(text);
        self
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let (descriptor, markup) = prepare_file_content(path.as_ref(), None);
        self.add_text(&markup);
        self.content
            .base
            .files
            .get_or_insert_with(Vec::new)
            .push(descriptor);
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.content
            .base
            .tags
            .get_or_insert_with(Vec::new)
            .push(tag.into());
        self
    }

    pub fn add_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    pub fn content(&self) -> &Paragraph {
        &self.content
    }

    pub fn into_paragraph(self) -> Paragraph {
        self.content
    }
}

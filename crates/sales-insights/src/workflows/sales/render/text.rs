use super::{DocumentWriter, RenderError};

/// UTF-8 plain text rendition, one line per entry and a blank line after
/// the title.
#[derive(Debug, Default)]
pub struct TextDocument {
    buffer: String,
}

impl TextDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentWriter for TextDocument {
    fn emit_title(&mut self, text: &str) -> Result<(), RenderError> {
        self.buffer.push_str(text);
        self.buffer.push_str("\n\n");
        Ok(())
    }

    fn emit_line(&mut self, text: &str) -> Result<(), RenderError> {
        self.buffer.push_str(text);
        self.buffer.push('\n');
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.buffer.into_bytes())
    }
}

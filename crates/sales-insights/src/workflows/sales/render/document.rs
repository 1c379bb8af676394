use super::RenderError;

/// Line-oriented sink for report content. Only line text and order are
/// part of the contract; fonts and spacing belong to each writer.
pub trait DocumentWriter {
    fn emit_title(&mut self, text: &str) -> Result<(), RenderError>;
    fn emit_line(&mut self, text: &str) -> Result<(), RenderError>;
    fn finish(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}

use serde_json::Value;

/// Display surface for one bot message.
///
/// The pipeline drives this instead of a concrete UI so playback is
/// testable headlessly. Implementations must tolerate repeated
/// `hide_typing` calls; the pipeline hides the indicator both at first
/// visible output and at finalization.
pub trait ContentSink {
    /// Typing indicator shown while no content has arrived yet.
    fn show_typing(&mut self) {}

    fn hide_typing(&mut self) {}

    /// Plain-text fast path: one delta appended during active streaming,
    /// without the rich render pass.
    fn append_text(&mut self, delta: &str);

    /// Card/carousel payload inserted as a complete unit. Partial rich
    /// fragments are not meaningfully displayable mid-render.
    fn render_structured(&mut self, payload: &Value);

    /// One rich render pass over the final complete text. Runs once per
    /// message, replacing the plain-text accumulation.
    fn render_final(&mut self, content: &str);
}

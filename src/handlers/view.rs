/// The surface the handlers write to: modal alerts, navigation and the chat
/// output element.
pub trait View: Send + Sync {
    fn alert(&self, message: &str);

    /// Leave the current page for `path` (a backend-relative path such as `/auth/login`).
    fn navigate(&self, path: &str);

    /// Replace the text of the chat output element.
    fn render_chat_output(&self, text: &str);
}

impl<V: View + ?Sized> View for std::sync::Arc<V> {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }

    fn render_chat_output(&self, text: &str) {
        (**self).render_chat_output(text)
    }
}

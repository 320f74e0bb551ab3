//! Table renderer port used for the clarification visual aid.

use crate::domain::models::Row;

pub trait TableRenderer: Send + Sync {
    /// Renders `rows` under `columns` as an image data URL.
    ///
    /// Returns `None` when there is nothing to render.
    fn render(&self, columns: &[String], rows: &[Row]) -> Option<String>;
}

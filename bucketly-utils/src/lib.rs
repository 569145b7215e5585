/// Display formatting for points, ranks, progress and ages.
pub mod formatting;
/// Compact duration parsing for configuration values.
pub mod parse;
/// Text cleanup applied before user input is stored or searched.
pub mod sanitize;
/// Shared time helpers.
pub mod time;
/// Form validation rules shared by every write path.
pub mod validation;

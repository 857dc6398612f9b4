mod deep;
mod text;

pub use deep::{Difference, DifferenceKind, deep_contains, deep_equals, value_kind};
pub use text::{MatchSpec, text_contains, text_equals};

//! Player search: the header toggle and the completion-backed input.

mod complete;
mod input;
mod line;
pub mod toggle;

pub use complete::Autocomplete;
pub use input::{MountState, SearchInput};
pub use line::LineBuffer;
pub use toggle::{SearchToggle, button};

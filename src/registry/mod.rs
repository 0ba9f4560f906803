//! Tool registry.
//!
//! The catalog is a static, ordered list of [`ToolDescriptor`]s. The shell
//! never mutates it; the grid is derived with [`filter_tools`].

mod catalog;
mod descriptor;
mod filter;

pub use catalog::{descriptor, find_tool, hot_tools, TOOLS};
pub use descriptor::{Category, ParseCategoryError, ToolDescriptor, ToolKind, CATEGORIES};
pub use filter::{filter_tools, matches};

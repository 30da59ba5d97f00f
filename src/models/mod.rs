// ABOUTME: Core data models for checklists and the items they contain

pub mod item;

pub use item::{FlatItem, Item, ItemPath};

//! Detail panel content for the selected planet.
//!
//! This crate decides what the panel says and how its text animates; the
//! app draws it with imgui. Nothing here touches the GPU.

mod fields;
mod panel;
mod text_cycle;

pub use fields::{FIELD_LABELS, PanelField, format_number, panel_fields};
pub use panel::{DetailPanel, PANEL_TITLE, RowView};
pub use text_cycle::{SCRAMBLE_CHARSET, TextCycle};

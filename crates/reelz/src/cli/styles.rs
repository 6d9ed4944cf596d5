//! Named terminal styles.
//!
//! Renderers refer to styles by what the text *is* (a title, a handle, a
//! count) rather than by color, so the palette can change in one place.
//! `console` drops the escape codes when stdout is not a terminal.

use console::Style;
use once_cell::sync::Lazy;

pub struct Palette {
    pub title: Style,
    pub handle: Style,
    pub count: Style,
    pub muted: Style,
    pub id: Style,
    pub heading: Style,
}

pub static PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    title: Style::new().bold(),
    handle: Style::new().cyan(),
    count: Style::new().yellow(),
    muted: Style::new().color256(246).italic(),
    id: Style::new().color256(244),
    heading: Style::new().bold().underlined(),
});

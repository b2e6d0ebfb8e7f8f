use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, session_display::*,
    session_stats_display::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod session_display;
mod session_stats_display;

mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use blockfall_engine::PieceKind;
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);

    /// Solid style in the piece's own color.
    pub const fn piece(kind: PieceKind) -> Style {
        let rgb = kind.color();
        bg_only(Color::Rgb(rgb.r, rgb.g, rgb.b))
    }
}

/// Space taken by the block's borders and padding, as `(horizontal, vertical)`.
fn block_margin(block: Option<&BlockWidget>) -> (u16, u16) {
    let outer = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(outer, |block| block.inner(outer));
    (outer.width - inner.width, outer.height - inner.height)
}

//! Transient on-screen message with time-based expiration.
//!
//! Stands in for the platform toast: a white-bordered box near the bottom of
//! the surface, drawn over the face until [`TOAST_DURATION`] elapses.

use std::time::Instant;

use analog_face_common::colors::{NAVY, WHITE};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use heapless::String;
use profont::PROFONT_12_POINT;

use crate::timing::TOAST_DURATION;

/// Longest message kept; longer text is truncated.
pub const TOAST_TEXT_LEN: usize = 48;

/// Box height in pixels.
const TOAST_HEIGHT: u32 = 28;

/// Gap between the box and the bottom edge.
const TOAST_MARGIN: u32 = 16;

const BORDER_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(WHITE);
const BODY_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(NAVY);
const TEXT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, WHITE);
const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Active toast with its start time.
#[derive(Clone, Debug)]
pub struct Toast {
    message: String<TOAST_TEXT_LEN>,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: &str, shown_at: Instant) -> Self {
        let mut stored = String::new();
        for c in message.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        Self {
            message: stored,
            shown_at,
        }
    }

    #[inline]
    pub fn message(&self) -> &str { self.message.as_str() }

    #[inline]
    pub fn is_expired(&self) -> bool { self.shown_at.elapsed() >= TOAST_DURATION }
}

/// Draw `toast` centered near the bottom of `display`.
pub fn draw_toast<D>(display: &mut D, toast: &Toast)
where
    D: DrawTarget<Color = Rgb565>,
{
    let area = display.bounding_box();
    let char_width = PROFONT_12_POINT.character_size.width + PROFONT_12_POINT.character_spacing;
    let text_width = char_width * toast.message().chars().count() as u32;
    let width = (text_width + 16).min(area.size.width.saturating_sub(8));
    let height = TOAST_HEIGHT;

    let center_x = area.top_left.x + area.size.width as i32 / 2;
    let top = area.top_left.y + area.size.height.saturating_sub(height + TOAST_MARGIN) as i32;
    let left = center_x - width as i32 / 2;

    Rectangle::new(Point::new(left - 2, top - 2), Size::new(width + 4, height + 4))
        .into_styled(BORDER_FILL)
        .draw(display)
        .ok();
    Rectangle::new(Point::new(left, top), Size::new(width, height))
        .into_styled(BODY_FILL)
        .draw(display)
        .ok();
    Text::with_text_style(
        toast.message(),
        Point::new(center_x, top + height as i32 / 2),
        TEXT_STYLE,
        CENTERED,
    )
    .draw(display)
    .ok();
}

//! Frame rendering for the 128x64 monochrome panel.
//!
//! [`render`] is the single entry point, called once per dispatched event.
//! It draws the whole frame from view state: three favorite rows on top,
//! the selected catalog page in the middle, and either the weather strip
//! or the current notification in the bottom bar. While the view is asleep
//! it hides the panel instead of drawing.
//!
//! Layout (top to bottom):
//!   y  0..17  favorite rows (glyph, label, slot digit right-aligned)
//!   y  18     divider
//!   y 21..50  catalog page, selected row as an inverted bar
//!   y  51     divider
//!   y 52..63  weather strip (now | today | tomorrow | clock) or notification

use chrono::Local;
use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};

use crate::config::{DISPLAY_CONTRAST, DISPLAY_WIDTH, PAGE_SIZE};
use crate::remote::entity::{Item, ItemKind};
use crate::view::ViewState;

/// Drawing surface contract for the panel (or its desktop stand-in).
///
/// One frame is one clear/draw/flush session. Show/hide and contrast map
/// to the panel's power and dimming controls; awake frames re-assert both
/// so a wake needs no extra plumbing.
pub trait Surface: DrawTarget<Color = BinaryColor> {
    fn show(&mut self);
    fn hide(&mut self);
    fn set_contrast(&mut self, contrast: u8);
    fn flush(&mut self);
}

fn small(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_4X6)
        .text_color(color)
        .build()
}

fn large(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .build()
}

fn top_left() -> TextStyle {
    TextStyleBuilder::new().baseline(Baseline::Top).build()
}

fn bottom_left() -> TextStyle {
    TextStyleBuilder::new().baseline(Baseline::Bottom).build()
}

fn bottom_right() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Bottom)
        .build()
}

/// Draw one frame of `view`, or hide the panel when asleep.
pub fn render<S: Surface>(view: &ViewState, surface: &mut S) {
    if view.asleep() {
        surface.hide();
        return;
    }
    surface.show();
    surface.set_contrast(DISPLAY_CONTRAST);
    let _ = surface.clear(BinaryColor::Off);

    draw_favorites(view, surface);
    hline(18, surface);
    draw_catalog(view, surface);
    hline(51, surface);
    match &view.notification {
        Some(text) => draw_notification(text, surface),
        None => draw_weather_strip(view, surface),
    }

    surface.flush();
}

fn hline(y: i32, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    let _ = Line::new(Point::new(0, y), Point::new(DISPLAY_WIDTH as i32, y))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(surface);
}

fn vline(x: i32, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    let _ = Line::new(Point::new(x, 51), Point::new(x, 63))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(surface);
}

/// Bound favorite slots, one 6 px row each. Slots whose id no longer
/// resolves in the catalog stay blank.
fn draw_favorites(view: &ViewState, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    for (slot, fav) in view.favs.iter().enumerate() {
        let Some(id) = fav else { continue };
        let Some(item) = view.find(id) else { continue };
        let y = (slot * 6) as i32;
        let digit = (slot + 1).to_string();
        let _ = Text::with_text_style(
            &digit,
            Point::new(123, y),
            small(BinaryColor::On),
            top_left(),
        )
        .draw(surface);
        draw_item_row(item, y, false, surface);
    }
}

/// The catalog page holding the selection; the selected row is drawn as
/// an inverted bar, inset by one pixel on each side while a hold is live.
fn draw_catalog(view: &ViewState, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    let local_idx = view.idx % PAGE_SIZE;
    for (row, item) in view.visible().iter().enumerate() {
        let y = (21 + row * 6) as i32;
        let selected = row == local_idx;
        if selected {
            let bar = if view.hold {
                Rectangle::new(Point::new(1, y), Size::new(DISPLAY_WIDTH - 1, 5))
            } else {
                Rectangle::new(Point::new(0, y - 1), Size::new(DISPLAY_WIDTH, 7))
            };
            let _ = bar
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(surface);
        }
        draw_item_row(item, y, selected, surface);
    }
}

/// Kind glyph at x 0..4 plus the label at x 7, in 6 px row height.
fn draw_item_row(
    item: &Item,
    y: i32,
    invert: bool,
    surface: &mut impl DrawTarget<Color = BinaryColor>,
) {
    let ink = if invert {
        BinaryColor::Off
    } else {
        BinaryColor::On
    };
    draw_kind_glyph(item, y, ink, surface);
    let label = item.label();
    let _ = Text::with_text_style(&label, Point::new(7, y), small(ink), top_left()).draw(surface);
}

/// 5 px state-aware glyph: play triangle for scripts (doubled while
/// running), circle for lights, bar for switches, stacked squares for
/// groups; filled when "on", outline otherwise.
fn draw_kind_glyph(
    item: &Item,
    y: i32,
    ink: BinaryColor,
    surface: &mut impl DrawTarget<Color = BinaryColor>,
) {
    let on = item.state() == Some("on");
    let fill = PrimitiveStyle::with_fill(ink);
    let outline = PrimitiveStyle::with_stroke(ink, 1);
    let style = if on { fill } else { outline };
    match item.kind() {
        ItemKind::Script => {
            if on {
                let _ = Triangle::new(Point::new(0, y), Point::new(0, y + 4), Point::new(2, y + 2))
                    .into_styled(fill)
                    .draw(surface);
                let _ = Triangle::new(Point::new(2, y), Point::new(2, y + 4), Point::new(4, y + 2))
                    .into_styled(fill)
                    .draw(surface);
            } else {
                let _ = Triangle::new(Point::new(0, y), Point::new(0, y + 4), Point::new(4, y + 2))
                    .into_styled(fill)
                    .draw(surface);
            }
        }
        ItemKind::Light => {
            let _ = Circle::new(Point::new(0, y), 5).into_styled(style).draw(surface);
        }
        ItemKind::Switch => {
            let _ = Rectangle::new(Point::new(1, y), Size::new(3, 5))
                .into_styled(style)
                .draw(surface);
        }
        ItemKind::Group => {
            let _ = Rectangle::new(Point::new(0, y), Size::new(3, 3))
                .into_styled(style)
                .draw(surface);
            let _ = Rectangle::new(Point::new(2, y + 2), Size::new(3, 3))
                .into_styled(style)
                .draw(surface);
        }
        ItemKind::Other => {}
    }
}

fn draw_notification(text: &str, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    let msg = text.replace('_', " ");
    let _ = Text::with_text_style(
        &msg,
        Point::new(0, 63),
        large(BinaryColor::On),
        bottom_left(),
    )
    .draw(surface);
}

/// Bottom bar: current temperature, today's and tomorrow's forecast with
/// condition icons, then clock and date, separated by vertical dividers.
fn draw_weather_strip(view: &ViewState, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    let w = &view.weather;

    let now = format!("{:3.1}", w.now);
    let _ = Text::with_text_style(&now, Point::new(34, 63), large(BinaryColor::On), bottom_right())
        .draw(surface);
    vline(33, surface);

    draw_forecast(64, 35, &w.today.condition, w.today.low, w.today.high, surface);
    vline(64, surface);

    draw_forecast(
        95,
        66,
        &w.tomorrow.condition,
        w.tomorrow.low,
        w.tomorrow.high,
        surface,
    );
    vline(95, surface);

    let clock = Local::now();
    let time = clock.format("%a%H:%M").to_string();
    let date = clock.format("%d.%b").to_string();
    let _ = Text::with_text_style(
        &time,
        Point::new(DISPLAY_WIDTH as i32, 58),
        small(BinaryColor::On),
        bottom_right(),
    )
    .draw(surface);
    let _ = Text::with_text_style(
        &date,
        Point::new(DISPLAY_WIDTH as i32, 64),
        small(BinaryColor::On),
        bottom_right(),
    )
    .draw(surface);
}

fn draw_forecast(
    text_x: i32,
    icon_x: i32,
    condition: &str,
    low: f64,
    high: f64,
    surface: &mut impl DrawTarget<Color = BinaryColor>,
) {
    let high = format!("{:3.1}", high);
    let low = format!("{:3.1}", low);
    let _ = Text::with_text_style(
        &high,
        Point::new(text_x, 58),
        small(BinaryColor::On),
        bottom_right(),
    )
    .draw(surface);
    let _ = Text::with_text_style(
        &low,
        Point::new(text_x, 64),
        small(BinaryColor::On),
        bottom_right(),
    )
    .draw(surface);
    condition_icon(condition, Point::new(icon_x, 53), surface);
}

/// Primitive-drawn pictogram for the common condition labels, in a box of
/// roughly 11x11 px. Unknown labels fall back to a short text tag (image
/// decoding stays outside the library).
fn condition_icon(
    condition: &str,
    origin: Point,
    surface: &mut impl DrawTarget<Color = BinaryColor>,
) {
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    match condition {
        "sunny" | "clear" | "clear-night" => {
            let _ = Circle::new(origin + Point::new(3, 3), 5)
                .into_styled(stroke)
                .draw(surface);
            for (from, to) in [
                (Point::new(5, 0), Point::new(5, 1)),
                (Point::new(5, 9), Point::new(5, 10)),
                (Point::new(0, 5), Point::new(1, 5)),
                (Point::new(9, 5), Point::new(10, 5)),
            ] {
                let _ = Line::new(origin + from, origin + to)
                    .into_styled(stroke)
                    .draw(surface);
            }
        }
        "partlycloudy" => {
            let _ = Circle::new(origin + Point::new(0, 0), 5)
                .into_styled(stroke)
                .draw(surface);
            cloud(origin + Point::new(2, 3), surface);
        }
        "cloudy" => {
            cloud(origin + Point::new(0, 2), surface);
        }
        "rainy" | "pouring" | "snowy-rainy" => {
            cloud(origin + Point::new(0, 0), surface);
            for x in [2, 5, 8] {
                let _ = Line::new(origin + Point::new(x, 7), origin + Point::new(x - 1, 10))
                    .into_styled(stroke)
                    .draw(surface);
            }
        }
        "snowy" => {
            cloud(origin + Point::new(0, 0), surface);
            for x in [2, 5, 8] {
                let _ = Rectangle::new(origin + Point::new(x, 9), Size::new(1, 1))
                    .into_styled(fill)
                    .draw(surface);
            }
        }
        "fog" => {
            for y in [2, 5, 8] {
                let _ = Line::new(origin + Point::new(0, y), origin + Point::new(10, y))
                    .into_styled(stroke)
                    .draw(surface);
            }
        }
        "lightning" | "lightning-rainy" => {
            let _ = Triangle::new(
                origin + Point::new(6, 0),
                origin + Point::new(2, 6),
                origin + Point::new(5, 6),
            )
            .into_styled(fill)
            .draw(surface);
            let _ = Triangle::new(
                origin + Point::new(7, 4),
                origin + Point::new(4, 10),
                origin + Point::new(4, 4),
            )
            .into_styled(fill)
            .draw(surface);
        }
        other => {
            let tag: String = other.chars().take(3).collect();
            let _ = Text::with_text_style(&tag, origin, small(BinaryColor::On), top_left())
                .draw(surface);
        }
    }
}

/// Flat-bottomed cloud built from two lobes and a base bar, ~10x7 px.
fn cloud(origin: Point, surface: &mut impl DrawTarget<Color = BinaryColor>) {
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    let _ = Circle::new(origin + Point::new(0, 2), 5)
        .into_styled(fill)
        .draw(surface);
    let _ = Circle::new(origin + Point::new(3, 0), 6)
        .into_styled(fill)
        .draw(surface);
    let _ = Rectangle::new(origin + Point::new(1, 4), Size::new(9, 3))
        .into_styled(fill)
        .draw(surface);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DISPLAY_HEIGHT;
    use crate::event::{DayForecast, Weather};
    use crate::storage::Favorites;

    /// Framebuffer surface recording show/hide/contrast calls.
    ///
    /// `MockDisplay` panics on overdraw, which a clear-then-draw renderer
    /// does constantly, so the tests use a plain pixel buffer instead.
    struct TestSurface {
        pixels: Vec<BinaryColor>,
        shown: Option<bool>,
        contrast: Option<u8>,
        flushes: usize,
    }

    impl TestSurface {
        fn new() -> Self {
            Self {
                pixels: vec![BinaryColor::Off; (DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize],
                shown: None,
                contrast: None,
                flushes: 0,
            }
        }

        fn pixel(&self, x: u32, y: u32) -> BinaryColor {
            self.pixels[(y * DISPLAY_WIDTH + x) as usize]
        }

        fn lit(&self) -> usize {
            self.pixels
                .iter()
                .filter(|p| **p == BinaryColor::On)
                .count()
        }
    }

    impl DrawTarget for TestSurface {
        type Color = BinaryColor;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<BinaryColor>>,
        {
            for Pixel(coord, color) in pixels {
                if coord.x >= 0
                    && coord.y >= 0
                    && (coord.x as u32) < DISPLAY_WIDTH
                    && (coord.y as u32) < DISPLAY_HEIGHT
                {
                    let idx = (coord.y as u32 * DISPLAY_WIDTH + coord.x as u32) as usize;
                    self.pixels[idx] = color;
                }
            }
            Ok(())
        }
    }

    impl OriginDimensions for TestSurface {
        fn size(&self) -> Size {
            Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        }
    }

    impl Surface for TestSurface {
        fn show(&mut self) {
            self.shown = Some(true);
        }
        fn hide(&mut self) {
            self.shown = Some(false);
        }
        fn set_contrast(&mut self, contrast: u8) {
            self.contrast = Some(contrast);
        }
        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    fn action(id: &str) -> Item {
        Item::Action { id: id.to_owned() }
    }

    fn view(items: usize) -> ViewState {
        let catalog = (0..items)
            .map(|i| action(&format!("script.item_{i}")))
            .collect();
        ViewState::new(catalog, Favorites::default())
    }

    #[test]
    fn asleep_hides_without_drawing() {
        let mut v = view(3);
        v.idle_secs = 301;
        let mut surface = TestSurface::new();
        render(&v, &mut surface);
        assert_eq!(surface.shown, Some(false));
        assert_eq!(surface.flushes, 0);
        assert_eq!(surface.lit(), 0);
    }

    #[test]
    fn awake_frame_shows_dims_and_flushes() {
        let v = view(3);
        let mut surface = TestSurface::new();
        render(&v, &mut surface);
        assert_eq!(surface.shown, Some(true));
        assert_eq!(surface.contrast, Some(DISPLAY_CONTRAST));
        assert_eq!(surface.flushes, 1);
        assert!(surface.lit() > 0);
        // Both full-width dividers are present.
        assert_eq!(surface.pixel(64, 18), BinaryColor::On);
        assert_eq!(surface.pixel(64, 51), BinaryColor::On);
    }

    #[test]
    fn selected_row_draws_full_inversion_bar() {
        let v = view(3);
        let mut surface = TestSurface::new();
        render(&v, &mut surface);
        // First catalog row, full-height bar from the left edge.
        assert_eq!(surface.pixel(0, 20), BinaryColor::On);
        assert_eq!(surface.pixel(127, 26), BinaryColor::On);
    }

    #[test]
    fn hold_insets_the_selection_bar() {
        let mut v = view(3);
        v.hold = true;
        let mut surface = TestSurface::new();
        render(&v, &mut surface);
        assert_eq!(surface.pixel(0, 20), BinaryColor::Off);
        assert_eq!(surface.pixel(1, 21), BinaryColor::On);
    }

    #[test]
    fn notification_replaces_the_weather_strip() {
        let mut v = view(1);
        v.weather = Weather {
            now: 21.5,
            today: DayForecast {
                low: 10.0,
                high: 20.0,
                condition: "sunny".into(),
            },
            tomorrow: DayForecast {
                low: 11.0,
                high: 19.0,
                condition: "rainy".into(),
            },
        };

        let mut plain = TestSurface::new();
        render(&v, &mut plain);
        // Weather strip dividers.
        assert_eq!(plain.pixel(33, 55), BinaryColor::On);
        assert_eq!(plain.pixel(95, 55), BinaryColor::On);

        v.notification = Some("saved".into());
        let mut overlay = TestSurface::new();
        render(&v, &mut overlay);
        // "saved" in the large font ends well before the x95 divider spot.
        assert_eq!(overlay.pixel(95, 55), BinaryColor::Off);
        assert_eq!(overlay.pixel(95, 63), BinaryColor::Off);
    }

    #[test]
    fn bound_favorite_row_is_drawn() {
        let mut v = view(2);
        v.favs[0] = Some("script.item_1".into());
        let mut surface = TestSurface::new();
        render(&v, &mut surface);
        // Slot digit "1" right-aligned in the top favorite row.
        let digit_area: usize = (123..128)
            .flat_map(|x| (0..6).map(move |y| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y) == BinaryColor::On)
            .count();
        assert!(digit_area > 0);
    }

    #[test]
    fn unbound_favorite_slots_stay_blank() {
        let v = view(2);
        let mut surface = TestSurface::new();
        render(&v, &mut surface);
        let top_rows: usize = (0..DISPLAY_WIDTH)
            .flat_map(|x| (0..17).map(move |y| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y) == BinaryColor::On)
            .count();
        assert_eq!(top_rows, 0);
    }
}

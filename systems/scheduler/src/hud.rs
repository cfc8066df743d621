use raven_hunt_core::{Point, RenderSurface, Rgba, TextAlign, TextStyle, Viewport};

const FONT_SIZE: f32 = 50.0;
const SCORE_ANCHOR: Point = Point::new(50.0, 70.0);
const SHADOW_OFFSET: f32 = 2.0;

/// Draws the running score as white text over a black drop shadow.
pub(crate) fn draw_score(surface: &mut dyn RenderSurface, score: u32) {
    let text = format!("Score: {score}");
    surface.draw_text(&text, SCORE_ANCHOR, TextStyle::new(FONT_SIZE, Rgba::BLACK));
    surface.draw_text(
        &text,
        Point::new(SCORE_ANCHOR.x + SHADOW_OFFSET, SCORE_ANCHOR.y + SHADOW_OFFSET),
        TextStyle::new(FONT_SIZE, Rgba::WHITE),
    );
}

/// Draws the final score centred on the viewport.
pub(crate) fn draw_game_over(surface: &mut dyn RenderSurface, score: u32, viewport: Viewport) {
    let text = format!("Game Over: {score}");
    let center = Point::new(
        viewport.width() as f32 / 2.0,
        viewport.height() as f32 / 2.0,
    );
    surface.draw_text(
        &text,
        center,
        TextStyle::new(FONT_SIZE, Rgba::BLACK).with_align(TextAlign::Center),
    );
    surface.draw_text(
        &text,
        Point::new(center.x - SHADOW_OFFSET, center.y - SHADOW_OFFSET),
        TextStyle::new(FONT_SIZE, Rgba::WHITE).with_align(TextAlign::Center),
    );
}

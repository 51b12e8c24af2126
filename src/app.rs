use std::time::Duration;

use lib_app::{AppConfig, AppContext, AppError, AppFlow, AppHandler};
use lib_input::InputState;
use lib_math::{Color, Rect};
use lib_renderer::{ChannelDepth, DEFAULT_FONT_SIZE, Font, Renderer, Texture};
use lib_window::KeyCode;

use crate::asset_path;

const MAX_ECHO_LEN: usize = 64;

/// Side of the checkerboard drawn when `bird.png` is missing.
const CHECKER_SIZE: u32 = 32;
const CHECKER_CELL: u32 = 8;

#[derive(Debug)]
pub struct Demo {
    font: Option<Font>,
    bird: Texture,
    typed: String,
}

impl AppHandler for Demo {
    fn config() -> AppConfig {
        AppConfig::load_or_default("plat2d.toml")
    }

    fn new(renderer: &mut Renderer, _ctx: AppContext<'_>) -> Result<Self, AppError> {
        let font = renderer
            .load_font(asset_path!("fonts/Vera.ttf"), DEFAULT_FONT_SIZE)
            .inspect_err(|err| log::warn!("no font, text is disabled: {err}"))
            .ok();

        let bird = match renderer.load_texture(asset_path!("bird.png")) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("no texture, using a checkerboard: {err}");
                renderer.register_texture(
                    &checker_pixels(CHECKER_SIZE, CHECKER_CELL),
                    CHECKER_SIZE,
                    CHECKER_SIZE,
                    ChannelDepth::Rgba,
                )?
            }
        };

        Ok(Self {
            font,
            bird,
            typed: String::new(),
        })
    }

    fn update(&mut self, _delta_time: Duration, input: &InputState, _ctx: AppContext<'_>) -> AppFlow {
        if input.is_key_pressed(KeyCode::Escape) {
            return AppFlow::Exit;
        }

        if input.is_key_pressed(KeyCode::Backspace) {
            self.typed.pop();
        }

        for ch in input.text().chars() {
            if self.typed.chars().count() >= MAX_ECHO_LEN {
                break;
            }
            self.typed.push(ch);
        }

        AppFlow::Continue
    }

    fn draw(&mut self, renderer: &mut Renderer, _input: &InputState, _ctx: AppContext<'_>) {
        renderer.clear(Color::BLUE);

        renderer.draw_rect(Rect::new(20.0, 20.0, 40.0, 50.0), Color::YELLOW);

        let size = Rect::new(0.0, 0.0, self.bird.width() as f32, self.bird.height() as f32);
        renderer.draw_texture(&self.bird, size, size);

        renderer.draw_rect(Rect::new(100.0, 20.0, 40.0, 50.0), Color::YELLOW);

        if let Some(font) = &self.font {
            renderer.draw_text(font, "Hello", 0.0, 0.0);
            renderer.draw_text(font, &self.typed, 0.0, font.size() * 1.5);
        }
    }
}

/// Magenta and black squares of `cell` pixels, as RGBA8.
fn checker_pixels(size: u32, cell: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            let (x, y) = (i % size, i / size);
            if (x / cell + y / cell) % 2 == 0 {
                [255, 0, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_pixels_alternate_per_cell() {
        let pixels = checker_pixels(4, 2);

        assert_eq!(pixels.len(), 4 * 4 * 4);
        assert_eq!(pixels[0..4], [255, 0, 255, 255]);
        assert_eq!(pixels[8..12], [0, 0, 0, 255]);
        // first pixel of the third row starts the second row of cells
        assert_eq!(pixels[32..36], [0, 0, 0, 255]);
        assert_eq!(pixels[40..44], [255, 0, 255, 255]);
    }
}

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const TEXT_SCALE: i32 = 2;
const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
const COUNTER_ORIGIN_X: i32 = 10;
const COUNTER_ORIGIN_Y: i32 = 10;
const COUNTER_COLOR: [u8; 4] = [0, 158, 47, 255];

#[derive(Debug, Clone, Copy)]
struct Glyph {
    rows: [u8; GLYPH_HEIGHT as usize],
}

const SPACE_GLYPH: Glyph = Glyph {
    rows: [0, 0, 0, 0, 0],
};

/// Draws "`NN FPS`" in the top-left corner of an RGBA frame.
pub(crate) fn draw_fps_counter(frame: &mut [u8], width: u32, height: u32, fps: u32) {
    let text = format!("{fps} FPS");
    draw_text_clipped(
        frame,
        width,
        height,
        COUNTER_ORIGIN_X,
        COUNTER_ORIGIN_Y,
        &text,
        COUNTER_COLOR,
    );
}

fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
) {
    for ch in text.chars() {
        draw_glyph_clipped(frame, width, height, x, y, glyph_for(ch), color);
        x += GLYPH_ADVANCE;
    }
}

fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    color: [u8; 4],
) {
    let width_i32 = width as i32;
    let height_i32 = height as i32;

    for (row_index, row_bits) in glyph.rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            for sy in 0..TEXT_SCALE {
                let pixel_y = y + row_index as i32 * TEXT_SCALE + sy;
                if pixel_y < 0 || pixel_y >= height_i32 {
                    continue;
                }
                for sx in 0..TEXT_SCALE {
                    let pixel_x = x + col * TEXT_SCALE + sx;
                    if pixel_x < 0 || pixel_x >= width_i32 {
                        continue;
                    }
                    write_pixel_rgba(
                        frame,
                        width as usize,
                        pixel_x as usize,
                        pixel_y as usize,
                        color,
                    );
                }
            }
        }
    }
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(byte_offset) = y
        .checked_mul(width)
        .and_then(|row| row.checked_add(x))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    if let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) {
        pixel.copy_from_slice(&color);
    }
}

fn glyph_for(ch: char) -> Glyph {
    let rows = match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        _ => return SPACE_GLYPH,
    };
    Glyph { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(frame: &[u8]) -> usize {
        frame
            .chunks_exact(4)
            .filter(|px| *px == COUNTER_COLOR)
            .count()
    }

    #[test]
    fn counter_text_glyphs_are_all_defined() {
        for ch in "0123456789FPS".chars() {
            assert!(
                glyph_for(ch).rows.iter().any(|row| *row != 0),
                "missing glyph for '{ch}'"
            );
        }
    }

    #[test]
    fn counter_draws_inside_frame() {
        let (width, height) = (64u32, 32u32);
        let mut frame = vec![0u8; (width * height * 4) as usize];
        draw_fps_counter(&mut frame, width, height, 35);

        assert!(lit_pixels(&frame) > 0);
        let first_lit = frame
            .chunks_exact(4)
            .position(|px| px == COUNTER_COLOR)
            .expect("lit pixel");
        assert!(first_lit as u32 / width >= COUNTER_ORIGIN_Y as u32);
    }

    #[test]
    fn tiny_frames_never_write_out_of_bounds() {
        for (width, height) in [(0u32, 0u32), (1, 1), (12, 12), (3, 40)] {
            let mut frame = vec![0u8; (width * height * 4) as usize];
            draw_fps_counter(&mut frame, width, height, 120);
            assert_eq!(frame.len(), (width * height * 4) as usize);
        }
    }

    #[test]
    fn unknown_characters_draw_nothing() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        draw_text_clipped(&mut frame, 16, 16, 0, 0, "xyz!", COUNTER_COLOR);
        assert_eq!(lit_pixels(&frame), 0);
    }
}

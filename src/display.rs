use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::bus::{Bus, VIDEO_COLS, VIDEO_ROWS, VIDEO_SIZE};

pub const SCREEN_WIDTH: usize = VIDEO_COLS * 8;
pub const SCREEN_HEIGHT: usize = VIDEO_ROWS * 8;

const FOREGROUND: u32 = 0xFFFFFF;
const BACKGROUND: u32 = 0x000000;

/// Rasterizes the video window into a framebuffer. Polled after every
/// completed instruction; only cells whose value changed since the last
/// poll are redrawn, so the per-instruction cost stays near a memcmp.
pub struct Display {
    window: Window,
    frame_buffer: Vec<u32>,
    previous_cells: [u8; VIDEO_SIZE],
    painted_once: bool,
}

impl Display {
    pub fn new(title: &str) -> Result<Self, String> {
        let window = Window::new(
            title,
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            WindowOptions {
                resize: true,
                scale: minifb::Scale::X2,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| format!("Failed to create window: {}", e))?;

        Ok(Display {
            window,
            frame_buffer: vec![BACKGROUND; SCREEN_WIDTH * SCREEN_HEIGHT],
            previous_cells: [0; VIDEO_SIZE],
            painted_once: false,
        })
    }

    /// Diffs the video window against the previous snapshot and redraws
    /// changed cells. The bus is only borrowed between instructions, so
    /// the snapshot is always consistent.
    pub fn poll(&mut self, bus: &Bus) {
        let cells = bus.video_cells();
        let repaint_all = !self.painted_once;
        for (index, &cell) in cells.iter().enumerate() {
            if repaint_all || cell != self.previous_cells[index] {
                self.previous_cells[index] = cell;
                blit_glyph(&mut self.frame_buffer, index, &bus.glyph(cell));
            }
        }
        self.painted_once = true;
    }

    /// Forces the next poll to redraw every cell. Needed after a savestate
    /// load replaces memory underneath the diff snapshot.
    pub fn invalidate(&mut self) {
        self.painted_once = false;
    }

    pub fn present(&mut self) -> Result<(), String> {
        self.window
            .update_with_buffer(&self.frame_buffer, SCREEN_WIDTH, SCREEN_HEIGHT)
            .map_err(|e| format!("Failed to update window: {}", e))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn escape_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn save_requested(&self) -> bool {
        self.window.is_key_pressed(Key::F5, KeyRepeat::No)
    }

    pub fn load_requested(&self) -> bool {
        self.window.is_key_pressed(Key::F9, KeyRepeat::No)
    }
}

/// Draws one 8x8 glyph into the framebuffer at the cell's position.
/// Each glyph byte is one pixel row, MSB leftmost.
fn blit_glyph(frame_buffer: &mut [u32], cell_index: usize, rows: &[u8; 8]) {
    let x0 = (cell_index % VIDEO_COLS) * 8;
    let y0 = (cell_index / VIDEO_COLS) * 8;
    for (dy, &bits) in rows.iter().enumerate() {
        let line = (y0 + dy) * SCREEN_WIDTH + x0;
        for dx in 0..8 {
            let lit = bits & (0x80 >> dx) != 0;
            frame_buffer[line + dx] = if lit { FOREGROUND } else { BACKGROUND };
        }
    }
}

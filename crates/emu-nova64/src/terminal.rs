//! Terminal overlay: a descriptor's tile grid used as a character grid.
//!
//! Layered on top of the blitter and its descriptors — a terminal is just
//! a glyph-ROM blit whose tile indices are character codes. Writes land
//! directly in tile-index and tile-color RAM, so a draw command of the
//! same descriptor renders the text without any extra bookkeeping.

use crate::blit::COMMAND_BUFFER_SIZE;
use crate::blitter::Blitter;
use crate::font::CURSOR_GLYPH;

const BLANK: u8 = b' ';

impl Blitter {
    /// Configure descriptor `number` as a terminal surface and clear it.
    pub fn terminal_init(
        &mut self,
        number: u8,
        flags_0: u8,
        flags_1: u8,
        size_log2: u8,
        tile_size_log2: u8,
        foreground_color: u16,
        background_color: u16,
    ) {
        let blit = self.blit_mut(number);
        blit.set_flags_0(flags_0);
        blit.set_flags_1(flags_1);
        blit.set_size_log2(size_log2);
        blit.set_tile_size_log2(tile_size_log2);
        blit.foreground_color = foreground_color;
        blit.background_color = background_color;
        blit.cursor_blinking = false;
        blit.cursor_blink_visible = false;
        self.terminal_clear(number);
    }

    /// Blank the whole grid with the current colors and home the cursor.
    pub fn terminal_clear(&mut self, number: u8) {
        let (tiles, fg, bg) = {
            let blit = self.blit(number);
            (blit.tiles, blit.foreground_color, blit.background_color)
        };
        for position in 0..tiles {
            self.set_tile_at(number, position, BLANK);
            self.set_tile_fg_color_at(number, position, fg);
            self.set_tile_bg_color_at(number, position, bg);
        }
        let blit = self.blit_mut(number);
        blit.cursor_position = 0;
        blit.cursor_big_move = false;
        blit.command_length = 0;
    }

    /// Write `glyph` at the cursor cell without moving the cursor.
    pub fn terminal_putsymbol_at_cursor(&mut self, number: u8, glyph: u8) {
        let (position, fg, bg) = {
            let blit = self.blit(number);
            (blit.cursor_position, blit.foreground_color, blit.background_color)
        };
        self.set_tile_at(number, position, glyph);
        self.set_tile_fg_color_at(number, position, fg);
        self.set_tile_bg_color_at(number, position, bg);
    }

    /// Write `glyph` at the cursor and advance, scrolling the grid up by
    /// one row when the cursor runs off the end.
    pub fn terminal_putsymbol(&mut self, number: u8, glyph: u8) {
        self.terminal_putsymbol_at_cursor(number, glyph);
        let (at_end, columns) = {
            let blit = self.blit_mut(number);
            blit.cursor_position = blit.cursor_position.wrapping_add(1);
            (blit.cursor_position == blit.tiles, u16::from(blit.columns))
        };
        if at_end {
            self.terminal_add_bottom_row(number);
            let blit = self.blit_mut(number);
            blit.cursor_position -= columns;
            blit.cursor_big_move = true;
        }
    }

    /// Write one character, interpreting line control codes. Printable
    /// characters are also collected into the command-line buffer.
    pub fn terminal_putchar(&mut self, number: u8, character: u8) {
        match character {
            b'\n' => {
                let (next, past_end, columns) = {
                    let blit = self.blit(number);
                    let columns = u32::from(blit.columns);
                    let row_start = blit.cursor_position - blit.current_column();
                    let next = u32::from(row_start) + columns;
                    (next, next >= u32::from(blit.tiles), columns)
                };
                if past_end {
                    self.terminal_add_bottom_row(number);
                    let blit = self.blit_mut(number);
                    blit.cursor_position = (next - columns) as u16;
                    blit.cursor_big_move = true;
                } else {
                    let blit = self.blit_mut(number);
                    blit.cursor_position = next as u16;
                    blit.cursor_big_move = true;
                }
            }
            b'\r' => {
                let blit = self.blit_mut(number);
                blit.cursor_position -= blit.current_column();
            }
            _ => {
                self.terminal_putsymbol(number, character);
                let blit = self.blit_mut(number);
                if blit.command_length < COMMAND_BUFFER_SIZE {
                    blit.command_buffer[blit.command_length] = character;
                    blit.command_length += 1;
                }
            }
        }
    }

    /// Write a string through [`Blitter::terminal_putchar`].
    pub fn terminal_print(&mut self, number: u8, text: &str) {
        for &byte in text.as_bytes() {
            self.terminal_putchar(number, byte);
        }
    }

    /// Start a fresh input line: newline, prompt marker, empty buffer.
    pub fn terminal_prompt(&mut self, number: u8) {
        self.terminal_print(number, "\n> ");
        self.blit_mut(number).command_length = 0;
    }

    /// Move the cursor back one cell, wrapping from the origin to the
    /// last cell of the grid.
    pub fn terminal_cursor_decrease(&mut self, number: u8) {
        let blit = self.blit_mut(number);
        let columns = u16::from(blit.columns);
        if blit.cursor_position == 0 {
            blit.cursor_position = blit.tiles - 1;
            blit.cursor_big_move = true;
        } else {
            blit.cursor_position -= 1;
            blit.cursor_big_move = blit.cursor_position % columns == columns - 1;
        }
    }

    /// Move the cursor forward one cell, wrapping from the last cell of
    /// the grid to the origin.
    pub fn terminal_cursor_increase(&mut self, number: u8) {
        let blit = self.blit_mut(number);
        let columns = u16::from(blit.columns);
        blit.cursor_position = blit.cursor_position.wrapping_add(1);
        if blit.cursor_position == blit.tiles {
            blit.cursor_position = 0;
            blit.cursor_big_move = true;
        } else {
            blit.cursor_big_move = blit.cursor_position % columns == 0;
        }
    }

    pub fn terminal_cursor_left(&mut self, number: u8) {
        self.terminal_cursor_decrease(number);
    }

    pub fn terminal_cursor_right(&mut self, number: u8) {
        self.terminal_cursor_increase(number);
    }

    /// Move the cursor up one row; clamps at the top edge.
    pub fn terminal_cursor_up(&mut self, number: u8) {
        let blit = self.blit_mut(number);
        let columns = u16::from(blit.columns);
        if blit.cursor_position >= columns {
            blit.cursor_position -= columns;
            blit.cursor_big_move = true;
        }
    }

    /// Move the cursor down one row; clamps at the bottom edge.
    pub fn terminal_cursor_down(&mut self, number: u8) {
        let blit = self.blit_mut(number);
        let columns = u16::from(blit.columns);
        if u32::from(blit.cursor_position) + u32::from(columns) < u32::from(blit.tiles) {
            blit.cursor_position += columns;
            blit.cursor_big_move = true;
        }
    }

    /// Move left one cell and blank it.
    pub fn terminal_backspace(&mut self, number: u8) {
        self.terminal_cursor_decrease(number);
        self.terminal_putsymbol_at_cursor(number, BLANK);
        let blit = self.blit_mut(number);
        if blit.command_length > 0 {
            blit.command_length -= 1;
        }
    }

    /// Scroll down: every row takes the contents of the row above it, and
    /// the top row is blanked.
    pub fn terminal_add_top_row(&mut self, number: u8) {
        let (columns, rows, fg, bg) = {
            let blit = self.blit(number);
            (
                u16::from(blit.columns),
                blit.rows,
                blit.foreground_color,
                blit.background_color,
            )
        };
        for row in (1..rows).rev() {
            for column in 0..columns {
                let dest = row * columns + column;
                let source = dest - columns;
                self.copy_cell(number, source, dest);
            }
        }
        for column in 0..columns {
            self.set_tile_at(number, column, BLANK);
            self.set_tile_fg_color_at(number, column, fg);
            self.set_tile_bg_color_at(number, column, bg);
        }
    }

    /// Scroll up: every row takes the contents of the row below it, and
    /// the bottom row is blanked.
    pub fn terminal_add_bottom_row(&mut self, number: u8) {
        let (columns, rows, fg, bg) = {
            let blit = self.blit(number);
            (
                u16::from(blit.columns),
                blit.rows,
                blit.foreground_color,
                blit.background_color,
            )
        };
        for row in 0..rows - 1 {
            for column in 0..columns {
                let dest = row * columns + column;
                let source = dest + columns;
                self.copy_cell(number, source, dest);
            }
        }
        let bottom = (rows - 1) * columns;
        for column in 0..columns {
            self.set_tile_at(number, bottom + column, BLANK);
            self.set_tile_fg_color_at(number, bottom + column, fg);
            self.set_tile_bg_color_at(number, bottom + column, bg);
        }
    }

    fn copy_cell(&mut self, number: u8, source: u16, dest: u16) {
        let glyph = self.tile_at(number, source);
        let fg = self.tile_fg_color_at(number, source);
        let bg = self.tile_bg_color_at(number, source);
        self.set_tile_at(number, dest, glyph);
        self.set_tile_fg_color_at(number, dest, fg);
        self.set_tile_bg_color_at(number, dest, bg);
    }

    /// Start blinking: the cell under the cursor is saved and the blink
    /// timer armed.
    pub fn terminal_activate_cursor(&mut self, number: u8) {
        let position = self.blit(number).cursor_position;
        let glyph = self.tile_at(number, position);
        let fg = self.tile_fg_color_at(number, position);
        let bg = self.tile_bg_color_at(number, position);
        let blit = self.blit_mut(number);
        blit.cursor_original_glyph = glyph;
        blit.cursor_original_fg = fg;
        blit.cursor_original_bg = bg;
        blit.cursor_blinking = true;
        blit.cursor_blink_visible = false;
        blit.cursor_countdown = blit.cursor_interval;
    }

    /// Stop blinking and restore the saved cell.
    pub fn terminal_deactivate_cursor(&mut self, number: u8) {
        let (blinking, visible) = {
            let blit = self.blit(number);
            (blit.cursor_blinking, blit.cursor_blink_visible)
        };
        if !blinking {
            return;
        }
        if visible {
            self.restore_cursor_cell(number);
        }
        let blit = self.blit_mut(number);
        blit.cursor_blinking = false;
        blit.cursor_blink_visible = false;
    }

    /// One timer tick of the blink state machine. Every
    /// `cursor_interval` ticks the cell toggles between its saved content
    /// and the block cursor glyph.
    pub fn terminal_process_cursor_state(&mut self, number: u8) {
        {
            let blit = self.blit_mut(number);
            if !blit.cursor_blinking {
                return;
            }
            if blit.cursor_countdown > 0 {
                blit.cursor_countdown -= 1;
                return;
            }
            blit.cursor_countdown = blit.cursor_interval;
            blit.cursor_blink_visible = !blit.cursor_blink_visible;
        }
        if self.blit(number).cursor_blink_visible {
            // save the cell as it is now; it may have changed since the
            // last toggle
            let position = self.blit(number).cursor_position;
            let glyph = self.tile_at(number, position);
            let fg = self.tile_fg_color_at(number, position);
            let bg = self.tile_bg_color_at(number, position);
            let blit = self.blit_mut(number);
            blit.cursor_original_glyph = glyph;
            blit.cursor_original_fg = fg;
            blit.cursor_original_bg = bg;
            self.terminal_putsymbol_at_cursor(number, CURSOR_GLYPH);
        } else {
            self.restore_cursor_cell(number);
        }
    }

    fn restore_cursor_cell(&mut self, number: u8) {
        let (position, glyph, fg, bg) = {
            let blit = self.blit(number);
            (
                blit.cursor_position,
                blit.cursor_original_glyph,
                blit.cursor_original_fg,
                blit.cursor_original_bg,
            )
        };
        self.set_tile_at(number, position, glyph);
        self.set_tile_fg_color_at(number, position, fg);
        self.set_tile_bg_color_at(number, position, bg);
    }

    /// Finish the current input line: returns the buffered command and
    /// resets the buffer for the next one.
    pub fn terminal_enter_command(&mut self, number: u8) -> String {
        let blit = self.blit_mut(number);
        let command = String::from_utf8_lossy(&blit.command_buffer[..blit.command_length])
            .into_owned();
        blit.command_length = 0;
        self.terminal_putchar(number, b'\n');
        command
    }
}

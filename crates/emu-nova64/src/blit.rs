//! Blit descriptor: the per-object register set of the blitter.
//!
//! Each of the 256 descriptors holds geometry, tiling, transform and color
//! state for one drawable object, plus the cursor state that makes the same
//! object usable as a text terminal surface. Derived geometry (widths,
//! masks, tile counts) is recomputed on every geometry-affecting write so
//! the pixel engine never sees an inconsistent descriptor.

/// Number of blit descriptors.
pub const MAX_BLITS: usize = 256;

/// Fixed capacity of the per-descriptor command-line buffer.
pub const COMMAND_BUFFER_SIZE: usize = 63 + (3 * 64);

/// Flip/rotate decode table, indexed by the high nibble of flags-1.
///
/// Entries are `(hor_flip, ver_flip, rotate)`. The encoding is deliberately
/// non-orthogonal: several codes alias to the same visual result (e.g.
/// `0b0000` and `0b1011` both decode to no flip, no rotate). The table is
/// part of the register contract and must not be simplified.
const FLIP_ROTATE: [(bool, bool, bool); 16] = [
    (false, false, false), // 0b0000
    (true, false, false),  // 0b0001
    (false, true, false),  // 0b0010
    (true, true, false),   // 0b0011
    (false, false, true),  // 0b0100
    (true, false, true),   // 0b0101
    (false, true, true),   // 0b0110
    (true, true, true),    // 0b0111
    (true, true, false),   // 0b1000
    (false, true, false),  // 0b1001
    (true, false, false),  // 0b1010
    (false, false, false), // 0b1011
    (true, true, true),    // 0b1100
    (false, true, true),   // 0b1101
    (true, false, true),   // 0b1110
    (false, false, true),  // 0b1111
];

/// One drawable object: sprite, tilemap layer or terminal surface.
#[derive(Debug, Clone)]
pub struct Blit {
    /// Descriptor index (0-255), fixed at construction.
    pub number: u8,

    // Flags 0: color/mode bits.
    /// Draw the background color where the source pixel is transparent.
    pub background: bool,
    /// Keep source colors instead of substituting the foreground color.
    pub multicolor_mode: bool,
    /// Fetch fg/bg colors from per-tile color RAM.
    pub color_per_tile: bool,
    /// Source pixels come from the glyph ROM instead of pixel RAM.
    pub use_glyph_rom: bool,

    /// Flags 1 as last written (reserved bits masked off). Kept raw for
    /// readback: the flip/rotate decode is lossy.
    flags_1: u8,
    pub hor_stretch: bool,
    pub ver_stretch: bool,
    pub hor_flip: bool,
    pub ver_flip: bool,
    /// Rotate 90 degrees clockwise (applied after flips).
    pub rotate: bool,

    /// Packed blit size: low nibble width log2, high nibble height log2,
    /// each clamped to 2-9.
    size_log2: u8,
    /// Packed tile size, same encoding as `size_log2`.
    tile_size_log2: u8,

    // Derived geometry, kept consistent by `recalculate`.
    pub width_log2: u16,
    pub width: u16,
    pub width_mask: u16,
    pub width_on_screen_log2: u16,
    pub width_on_screen: u16,
    pub width_on_screen_mask: u16,
    pub height_log2: u16,
    pub height: u16,
    pub height_on_screen_log2: u16,
    pub height_on_screen: u16,
    pub tile_width_log2: u16,
    pub tile_width: u16,
    pub tile_width_mask: u16,
    pub tile_height_log2: u16,
    pub tile_height: u16,
    pub tile_height_mask: u16,
    pub width_in_tiles_log2: u8,
    pub height_in_tiles_log2: u8,
    /// Tiles per row; doubles as the terminal pitch register.
    pub columns: u8,
    pub rows: u16,
    pub tiles: u16,

    pub foreground_color: u16,
    pub background_color: u16,

    /// Screen position; may be negative or off-screen (clipped at render).
    pub x_pos: i16,
    pub y_pos: i16,

    // Terminal overlay state.
    /// Cursor cell index into the tile grid (0..tiles).
    pub cursor_position: u16,
    /// Blink half-period in timer ticks.
    pub cursor_interval: u8,
    pub cursor_countdown: u8,
    /// Cell contents saved while the cursor block is shown.
    pub cursor_original_glyph: u8,
    pub cursor_original_fg: u16,
    pub cursor_original_bg: u16,
    pub cursor_blinking: bool,
    /// Whether the blink currently shows the block glyph.
    pub cursor_blink_visible: bool,
    /// Last cursor movement crossed a row boundary.
    pub cursor_big_move: bool,

    pub command_buffer: [u8; COMMAND_BUFFER_SIZE],
    pub command_length: usize,
}

impl Blit {
    #[must_use]
    pub fn new(number: u8) -> Self {
        let mut blit = Self {
            number,
            background: false,
            multicolor_mode: false,
            color_per_tile: false,
            use_glyph_rom: false,
            flags_1: 0,
            hor_stretch: false,
            ver_stretch: false,
            hor_flip: false,
            ver_flip: false,
            rotate: false,
            size_log2: 0,
            tile_size_log2: 0,
            width_log2: 0,
            width: 0,
            width_mask: 0,
            width_on_screen_log2: 0,
            width_on_screen: 0,
            width_on_screen_mask: 0,
            height_log2: 0,
            height: 0,
            height_on_screen_log2: 0,
            height_on_screen: 0,
            tile_width_log2: 0,
            tile_width: 0,
            tile_width_mask: 0,
            tile_height_log2: 0,
            tile_height: 0,
            tile_height_mask: 0,
            width_in_tiles_log2: 0,
            height_in_tiles_log2: 0,
            columns: 0,
            rows: 0,
            tiles: 0,
            foreground_color: 0,
            background_color: 0,
            x_pos: 0,
            y_pos: 0,
            cursor_position: 0,
            cursor_interval: 20,
            cursor_countdown: 0,
            cursor_original_glyph: 0,
            cursor_original_fg: 0,
            cursor_original_bg: 0,
            cursor_blinking: false,
            cursor_blink_visible: false,
            cursor_big_move: false,
            command_buffer: [0; COMMAND_BUFFER_SIZE],
            command_length: 0,
        };
        blit.set_flags_1(0);
        blit.set_size_log2(0);
        blit.set_tile_size_log2(0);
        blit
    }

    /// Decode a flags-0 byte: bit 1 background, bit 2 multicolor, bit 3
    /// color-per-tile, bit 7 glyph ROM. Other bits are reserved.
    pub fn set_flags_0(&mut self, value: u8) {
        self.background = value & 0x02 != 0;
        self.multicolor_mode = value & 0x04 != 0;
        self.color_per_tile = value & 0x08 != 0;
        self.use_glyph_rom = value & 0x80 != 0;
    }

    /// Encode flags-0 from the typed fields.
    #[must_use]
    pub fn flags_0(&self) -> u8 {
        (if self.background { 0x02 } else { 0x00 })
            | (if self.multicolor_mode { 0x04 } else { 0x00 })
            | (if self.color_per_tile { 0x08 } else { 0x00 })
            | (if self.use_glyph_rom { 0x80 } else { 0x00 })
    }

    /// Decode a flags-1 byte: bit 0 horizontal stretch, bit 1 vertical
    /// stretch, high nibble flip/rotate code (see [`FLIP_ROTATE`]).
    pub fn set_flags_1(&mut self, value: u8) {
        self.flags_1 = value & 0b1111_0011;
        self.hor_stretch = self.flags_1 & 0b0000_0001 != 0;
        self.ver_stretch = self.flags_1 & 0b0000_0010 != 0;
        let (hor_flip, ver_flip, rotate) = FLIP_ROTATE[usize::from(self.flags_1 >> 4)];
        self.hor_flip = hor_flip;
        self.ver_flip = ver_flip;
        self.rotate = rotate;
        self.recalculate();
    }

    /// Raw flags-1 readback (reserved bits read as zero).
    #[must_use]
    pub fn flags_1(&self) -> u8 {
        self.flags_1
    }

    /// Set the packed blit size. Each nibble is a width/height exponent,
    /// silently clamped to 2-9 (4 to 512 pixels).
    pub fn set_size_log2(&mut self, value: u8) {
        self.size_log2 = Self::clamp_packed_log2(value);
        self.recalculate();
    }

    #[must_use]
    pub fn size_log2(&self) -> u8 {
        self.size_log2
    }

    /// Set the packed tile size, same encoding and clamping as
    /// [`Blit::set_size_log2`].
    pub fn set_tile_size_log2(&mut self, value: u8) {
        self.tile_size_log2 = Self::clamp_packed_log2(value);
        self.recalculate();
    }

    #[must_use]
    pub fn tile_size_log2(&self) -> u8 {
        self.tile_size_log2
    }

    fn clamp_packed_log2(value: u8) -> u8 {
        let width_log2 = (value & 0x0F).clamp(2, 9);
        let height_log2 = (value >> 4).clamp(2, 9);
        width_log2 | (height_log2 << 4)
    }

    /// Recompute every derived geometry field from the packed sizes and
    /// transform flags.
    fn recalculate(&mut self) {
        self.width_log2 = u16::from(self.size_log2 & 0x0F);
        self.width = 1 << self.width_log2;
        self.width_mask = self.width - 1;
        self.width_on_screen_log2 = self.width_log2 + u16::from(self.hor_stretch);
        self.width_on_screen = 1 << self.width_on_screen_log2;
        self.width_on_screen_mask = self.width_on_screen - 1;

        self.tile_width_log2 = u16::from(self.tile_size_log2 & 0x0F);
        self.tile_width = 1 << self.tile_width_log2;
        self.tile_width_mask = self.tile_width - 1;

        // A tile wider than the blit still yields one column.
        self.width_in_tiles_log2 = if self.width_log2 < self.tile_width_log2 {
            0
        } else {
            (self.width_log2 - self.tile_width_log2) as u8
        };
        self.columns = 1 << self.width_in_tiles_log2;

        self.height_log2 = u16::from(self.size_log2 >> 4);
        self.height = 1 << self.height_log2;
        self.height_on_screen_log2 = self.height_log2 + u16::from(self.ver_stretch);
        self.height_on_screen = 1 << self.height_on_screen_log2;

        self.tile_height_log2 = u16::from(self.tile_size_log2 >> 4);
        self.tile_height = 1 << self.tile_height_log2;
        self.tile_height_mask = self.tile_height - 1;

        self.height_in_tiles_log2 = if self.height_log2 < self.tile_height_log2 {
            0
        } else {
            (self.height_log2 - self.tile_height_log2) as u8
        };
        self.rows = 1 << self.height_in_tiles_log2;

        self.tiles = u16::from(self.columns) * self.rows;
    }

    /// On-screen pixel count of one draw operation for this descriptor.
    #[must_use]
    pub fn total_pixels(&self) -> u32 {
        u32::from(self.width_on_screen) * u32::from(self.height_on_screen)
    }

    /// Column of the cursor within the tile grid.
    #[must_use]
    pub fn current_column(&self) -> u16 {
        self.cursor_position % u16::from(self.columns)
    }

    /// Row of the cursor within the tile grid.
    #[must_use]
    pub fn current_row(&self) -> u16 {
        self.cursor_position / u16::from(self.columns)
    }

    /// Rows below the cursor row.
    #[must_use]
    pub fn lines_remaining(&self) -> u16 {
        self.rows - self.current_row() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_nibbles_are_clamped_to_valid_exponents() {
        let mut blit = Blit::new(0);

        blit.set_size_log2(0x00);
        assert_eq!(blit.width, 4);
        assert_eq!(blit.height, 4);
        assert_eq!(blit.size_log2(), 0x22);

        blit.set_size_log2(0xFF);
        assert_eq!(blit.width, 512);
        assert_eq!(blit.height, 512);
        assert_eq!(blit.size_log2(), 0x99);

        blit.set_size_log2(0x53);
        assert_eq!(blit.width, 8);
        assert_eq!(blit.height, 32);
        assert_eq!(blit.width_mask, 7);
        assert_eq!(blit.height_log2, 5);
    }

    #[test]
    fn derived_masks_track_dimensions() {
        let mut blit = Blit::new(0);
        for packed in [0x22u8, 0x45, 0x67, 0x99, 0x36] {
            blit.set_size_log2(packed);
            assert_eq!(blit.width_mask, blit.width - 1);
            assert_eq!(blit.width_on_screen_mask, blit.width_on_screen - 1);
            assert_eq!(blit.tile_width_mask, blit.tile_width - 1);
        }
    }

    #[test]
    fn flip_rotate_decode_matches_hardware_table() {
        let expected: [(bool, bool, bool); 16] = [
            (false, false, false),
            (true, false, false),
            (false, true, false),
            (true, true, false),
            (false, false, true),
            (true, false, true),
            (false, true, true),
            (true, true, true),
            (true, true, false),
            (false, true, false),
            (true, false, false),
            (false, false, false),
            (true, true, true),
            (false, true, true),
            (true, false, true),
            (false, false, true),
        ];
        let mut blit = Blit::new(0);
        for (code, &(h, v, r)) in expected.iter().enumerate() {
            blit.set_flags_1((code as u8) << 4);
            assert_eq!(
                (blit.hor_flip, blit.ver_flip, blit.rotate),
                (h, v, r),
                "code {code:#06b}"
            );
        }
    }

    #[test]
    fn aliased_flip_codes_decode_identically() {
        let mut a = Blit::new(0);
        let mut b = Blit::new(0);
        a.set_flags_1(0b0000_0000);
        b.set_flags_1(0b1011_0000);
        assert_eq!(
            (a.hor_flip, a.ver_flip, a.rotate),
            (b.hor_flip, b.ver_flip, b.rotate)
        );

        a.set_flags_1(0b1000_0000);
        assert_eq!((a.hor_flip, a.ver_flip, a.rotate), (true, true, false));
        a.set_flags_1(0b1001_0000);
        assert_eq!((a.hor_flip, a.ver_flip, a.rotate), (false, true, false));
    }

    #[test]
    fn flags_1_readback_preserves_aliased_encoding() {
        let mut blit = Blit::new(0);
        blit.set_flags_1(0b1011_0001);
        assert_eq!(blit.flags_1(), 0b1011_0001);
        // reserved bits 2-3 read back as zero
        blit.set_flags_1(0b0000_1100);
        assert_eq!(blit.flags_1(), 0);
    }

    #[test]
    fn stretching_doubles_on_screen_size() {
        let mut blit = Blit::new(0);
        blit.set_size_log2(0x44); // 16x16
        blit.set_flags_1(0b0000_0011);
        assert_eq!(blit.width, 16);
        assert_eq!(blit.width_on_screen, 32);
        assert_eq!(blit.height_on_screen, 32);
        assert_eq!(blit.total_pixels(), 1024);

        blit.set_flags_1(0);
        assert_eq!(blit.width_on_screen, 16);
        assert_eq!(blit.total_pixels(), 256);
    }

    #[test]
    fn tile_grid_derivation() {
        let mut blit = Blit::new(0);
        blit.set_size_log2(0x58); // 256 wide, 32 high
        blit.set_tile_size_log2(0x33); // 8x8 tiles
        assert_eq!(blit.columns, 32);
        assert_eq!(blit.rows, 4);
        assert_eq!(blit.tiles, 128);
    }

    #[test]
    fn oversized_tile_clamps_to_one_column_and_row() {
        let mut blit = Blit::new(0);
        blit.set_size_log2(0x33); // 8x8 blit
        blit.set_tile_size_log2(0x55); // 32x32 tiles
        assert_eq!(blit.columns, 1);
        assert_eq!(blit.rows, 1);
        assert_eq!(blit.tiles, 1);
    }

    #[test]
    fn cursor_grid_helpers() {
        let mut blit = Blit::new(0);
        blit.set_size_log2(0x58);
        blit.set_tile_size_log2(0x33); // 32 columns, 4 rows
        blit.cursor_position = 33;
        assert_eq!(blit.current_row(), 1);
        assert_eq!(blit.current_column(), 1);
        assert_eq!(blit.lines_remaining(), 2);
    }
}

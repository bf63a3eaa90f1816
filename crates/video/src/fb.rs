//! Color, palette and terminal framebuffer types.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Flat RGB triple, as carried on the stream
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Cell colors for rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub alive: Rgb,
    pub dead: Rgb,
    /// Dead cell under the editing cursor
    pub cursor: Rgb,
    /// Live cell under the editing cursor
    pub cursor_alive: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            alive: Rgb::new(235, 235, 235),
            dead: Rgb::new(20, 20, 28),
            cursor: Rgb::new(90, 70, 20),
            cursor_alive: Rgb::new(255, 200, 60),
        }
    }
}

impl Palette {
    #[inline]
    pub fn color(&self, alive: bool, under_cursor: bool) -> Rgb {
        match (alive, under_cursor) {
            (true, false) => self.alive,
            (false, false) => self.dead,
            (false, true) => self.cursor,
            (true, true) => self.cursor_alive,
        }
    }
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: false,
        }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        for (cx, ch) in (x..self.width).zip(s.chars()) {
            self.set(cx, y, Cell { ch, style });
        }
    }

    /// Paint a solid block of `w` columns with background `color`.
    pub fn fill_span(&mut self, x: u16, y: u16, w: u16, color: Rgb) {
        let style = CellStyle {
            bg: color,
            ..CellStyle::default()
        };
        for dx in 0..w {
            self.set(x.saturating_add(dx), y, Cell { ch: ' ', style });
        }
    }
}

//! Encoded priority grid.
//!
//! A `TileGrid` holds one `u16` per tile. The low 15 bits carry the tile
//! identity (1-based, row-major) and bit 15 carries the priority flag. The
//! grid is the in-memory form of the generated map document: the main layer
//! reads identities through [`ID_MASK`] and the priority layer reads the
//! flag through [`PRIORITY_MASK`].

/// Bit 15: set when a tile is marked high priority.
pub const PRIORITY_MASK: u16 = 0x8000;

/// Low 15 bits: the tile identity.
pub const ID_MASK: u16 = 0x7FFF;

/// An encoded tile grid (row-major: `cells[y * width + x]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<u16>,
}

impl TileGrid {
    /// Create a grid from encoded cells. `cells` must hold `width * height`
    /// values in row-major order.
    pub fn new(width: u32, height: u32, cells: Vec<u16>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the encoded cell value at a position.
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }

    /// Get the tile identity at a position, with the priority bit stripped.
    pub fn raw_id(&self, x: u32, y: u32) -> Option<u16> {
        self.get(x, y).map(|v| v & ID_MASK)
    }

    /// Check whether the tile at a position carries the priority flag.
    pub fn is_priority(&self, x: u32, y: u32) -> Option<bool> {
        self.get(x, y).map(|v| v & PRIORITY_MASK != 0)
    }

    /// Iterate over all cells with their positions, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, u16)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &v)| {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            (x, y, v)
        })
    }

    /// Render the identity layer as CSV rows, one grid row per line.
    ///
    /// Identities are written unmasked (1..N); the priority bit never
    /// appears in this layer.
    pub fn csv_body(&self) -> String {
        self.rows(|v| (v & ID_MASK).to_string())
    }

    /// Render the priority layer as CSV rows of `0`/`1` flags.
    pub fn priority_csv_body(&self) -> String {
        self.rows(|v| {
            if v & PRIORITY_MASK != 0 { "1" } else { "0" }.to_string()
        })
    }

    fn rows(&self, cell: impl Fn(u16) -> String) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if x > 0 {
                    out.push(',');
                }
                out.push_str(&cell(self.cells[(y * self.width + x) as usize]));
            }
            out.push('\n');
        }
        out
    }
}

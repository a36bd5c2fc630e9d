//! Tile layers used as static collision geometry.
//!
//! A layer is a row-major grid of [`TileInfo`] cells. The sprite part is only
//! carried through for whoever renders the level; the physics engine reads
//! nothing but the [`TileType`].

use crate::components::collider::Aabb;
use glam::Vec2;

/// Identifies which texture atlas a tile sprite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasId(pub u32);

/// Sprite reference for a tile: atlas plus cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileSprite {
    pub atlas: AtlasId,
    pub col: f32,
    pub row: f32,
}

impl TileSprite {
    pub fn new(atlas: AtlasId, col: f32, row: f32) -> Self {
        Self { atlas, col, row }
    }
}

/// Collision semantics of a tile.
///
/// Slope variants are named after their corner heights, left then right:
/// `0` is the tile bottom, `1` the full tile height, `2` half the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileType {
    /// No collision.
    #[default]
    Normal,
    /// Blocks from every side.
    Solid,
    /// One-way platform: only blocks landings from above.
    Unisolid,
    Slope01,
    Slope10,
    Slope02,
    Slope20,
    Slope21,
    Slope12,
    /// Non-blocking, reported as a tile trigger.
    Hazard,
    /// Non-blocking, climbable.
    Ladder,
}

impl TileType {
    /// Left and right surface heights as fractions of the tile height,
    /// or `None` for non-slope tiles.
    pub fn slope_heights(self) -> Option<(f32, f32)> {
        match self {
            TileType::Slope01 => Some((0.0, 1.0)),
            TileType::Slope10 => Some((1.0, 0.0)),
            TileType::Slope02 => Some((0.0, 0.5)),
            TileType::Slope20 => Some((0.5, 0.0)),
            TileType::Slope21 => Some((0.5, 1.0)),
            TileType::Slope12 => Some((1.0, 0.5)),
            _ => None,
        }
    }

    pub fn is_slope(self) -> bool {
        self.slope_heights().is_some()
    }

    /// Parse the level format's encoded slope value (`"0_1"`, `"2_0"`, ...).
    pub fn from_slope_code(code: &str) -> Option<Self> {
        match code {
            "0_1" => Some(TileType::Slope01),
            "1_0" => Some(TileType::Slope10),
            "0_2" => Some(TileType::Slope02),
            "2_0" => Some(TileType::Slope20),
            "2_1" => Some(TileType::Slope21),
            "1_2" => Some(TileType::Slope12),
            _ => None,
        }
    }
}

/// A single cell of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileInfo {
    pub sprite: TileSprite,
    pub tile_type: TileType,
}

impl TileInfo {
    pub fn new(sprite: TileSprite, tile_type: TileType) -> Self {
        Self { sprite, tile_type }
    }

    /// A tile with no sprite of interest, only collision semantics.
    pub fn of_type(tile_type: TileType) -> Self {
        Self {
            sprite: TileSprite::default(),
            tile_type,
        }
    }
}

/// Grid of tiles in world space.
///
/// Tiles are stored in row-major order: index = y * width + x.
/// `origin` is the top-left corner of tile (0, 0).
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub width: u32,
    pub height: u32,
    pub tile_size: Vec2,
    pub origin: Vec2,
    tiles: Vec<TileInfo>,
}

impl TileLayer {
    /// Create a layer filled with `Normal` tiles.
    pub fn new(width: u32, height: u32, tile_size: Vec2) -> Self {
        let count = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            tile_size,
            origin: Vec2::ZERO,
            tiles: vec![TileInfo::default(); count],
        }
    }

    /// Build from already-resolved tiles. The caller is responsible for the
    /// length; [`TileLayer::is_valid`] reports a mismatch.
    pub fn from_tiles(width: u32, height: u32, tile_size: Vec2, tiles: Vec<TileInfo>) -> Self {
        Self {
            width,
            height,
            tile_size,
            origin: Vec2::ZERO,
            tiles,
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// A layer can take part in collision only when its dimensions are
    /// positive and the tile vector matches them.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.tile_size.x > 0.0
            && self.tile_size.y > 0.0
            && self.cell_count() == Some(self.tiles.len())
    }

    /// Number of cells the dimensions describe, `None` if that overflows.
    pub fn cell_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&TileInfo> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(self.index(x, y))
    }

    pub fn set(&mut self, x: u32, y: u32, tile: TileInfo) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    /// Fill a rectangular region with a tile.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, tile: TileInfo) {
        for ty in y..y.saturating_add(h).min(self.height) {
            for tx in x..x.saturating_add(w).min(self.width) {
                self.set(tx, ty, tile);
            }
        }
    }

    /// Tile type at signed grid coordinates. Anything outside the grid is
    /// empty space.
    pub fn tile_type_at(&self, x: i32, y: i32) -> TileType {
        if x < 0 || y < 0 {
            return TileType::Normal;
        }
        self.get(x as u32, y as u32)
            .map(|t| t.tile_type)
            .unwrap_or(TileType::Normal)
    }

    /// World-space rectangle of a cell.
    pub fn tile_rect(&self, x: i32, y: i32) -> Aabb {
        Aabb::new(
            self.origin + Vec2::new(x as f32, y as f32) * self.tile_size,
            self.tile_size,
        )
    }

    /// Column containing world X (unclamped, may be out of range).
    pub fn column_at(&self, world_x: f32) -> i32 {
        ((world_x - self.origin.x) / self.tile_size.x).floor() as i32
    }

    /// Row containing world Y (unclamped, may be out of range).
    pub fn row_at(&self, world_y: f32) -> i32 {
        ((world_y - self.origin.y) / self.tile_size.y).floor() as i32
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    /// World-space bounds of the whole layer.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.origin, self.world_size())
    }

    /// Convert world position to tile grid coordinates.
    pub fn world_to_tile(&self, world_pos: Vec2) -> Option<(u32, u32)> {
        let (tx, ty) = (self.column_at(world_pos.x), self.row_at(world_pos.y));
        if tx < 0 || ty < 0 || tx as u32 >= self.width || ty as u32 >= self.height {
            return None;
        }
        Some((tx as u32, ty as u32))
    }

    /// Convert tile grid coordinates to world position (center of tile).
    pub fn tile_to_world(&self, x: u32, y: u32) -> Vec2 {
        self.tile_rect(x as i32, y as i32).center()
    }

    /// Count of tiles with any collision semantics.
    pub fn collidable_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.tile_type != TileType::Normal)
            .count()
    }
}

/// Build a layer from ASCII rows: `#` solid, `=` one-way, `^` hazard,
/// `H` ladder, `/` slope 0_1, `\` slope 1_0, anything else empty.
#[cfg(test)]
pub(crate) fn layer_from_ascii(rows: &[&str], tile: f32) -> TileLayer {
    let height = rows.len() as u32;
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
    let mut layer = TileLayer::new(width, height, Vec2::splat(tile));
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            let tile_type = match c {
                '#' => TileType::Solid,
                '=' => TileType::Unisolid,
                '^' => TileType::Hazard,
                'H' => TileType::Ladder,
                '/' => TileType::Slope01,
                '\\' => TileType::Slope10,
                _ => TileType::Normal,
            };
            layer.set(x as u32, y as u32, TileInfo::of_type(tile_type));
        }
    }
    layer
}

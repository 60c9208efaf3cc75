use crate::error::{DemoError, Result};
use nalgebra_glm::{Vec2, Vec3};
use std::{fs, path::Path};
use strum::{EnumCount, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumCount)]
pub enum Tile {
    #[default]
    Empty,
    Floor,
    Wall,
    Water,
    Door,
}

impl Tile {
    pub fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            ' ' => Some(Tile::Empty),
            '.' | '@' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '~' => Some(Tile::Water),
            '+' => Some(Tile::Door),
            _ => None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        matches!(self, Tile::Floor | Tile::Door)
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Cell of the tile inside the tileset image, counted from the top-left.
    fn tileset_cell(&self) -> Option<(u32, u32)> {
        match self {
            Tile::Empty => None,
            Tile::Floor => Some((0, 0)),
            Tile::Wall => Some((1, 0)),
            Tile::Water => Some((2, 0)),
            Tile::Door => Some((3, 0)),
        }
    }
}

/// Texture-space rectangle, origin at the bottom-left of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct Tileset {
    pub columns: u32,
    pub rows: u32,
}

impl Tileset {
    pub fn new(columns: u32, rows: u32) -> Self {
        assert!(columns > 0 && rows > 0, "Tileset must have at least one cell");
        Self { columns, rows }
    }

    /// The image is flipped on upload, so row 0 of the tileset sits at the
    /// top of UV space.
    pub fn uv_rect(&self, tile: Tile) -> Option<UvRect> {
        let (column, row) = tile.tileset_cell()?;
        let w = 1.0 / self.columns as f32;
        let h = 1.0 / self.rows as f32;
        let u = column.min(self.columns - 1) as f32 * w;
        let v = 1.0 - (row.min(self.rows - 1) + 1) as f32 * h;
        Some(UvRect {
            min: Vec2::new(u, v),
            max: Vec2::new(u + w, v + h),
        })
    }
}

/// Fixed grid of tiles. Row 0 of the layout is the top (largest Y) row of the
/// level; tile (x, y) covers the unit square centered at (x, y) in world space.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    player_start: Option<(usize, usize)>,
}

impl TileMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|err| DemoError::io(path, err))?;
        let map = Self::parse(&src)?;
        log::info!(
            "Loaded level {} ({}x{})",
            path.display(),
            map.width,
            map.height
        );
        Ok(map)
    }

    pub fn parse(layout: &str) -> Result<Self> {
        let rows: Vec<&str> = layout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.is_empty())
            .collect();
        // rows of spaces are real rows of empty tiles; only bare newlines
        // around the layout are dropped
        let rows: Vec<&str> = {
            let end = rows
                .iter()
                .rposition(|line| !line.is_empty())
                .map_or(0, |i| i + 1);
            rows[..end].to_vec()
        };
        if rows.is_empty() {
            return Err(DemoError::TileMap {
                row: 0,
                reason: "layout is empty".to_string(),
            });
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut tiles = vec![Tile::Empty; width * height];
        let mut player_start = None;

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(DemoError::TileMap {
                    row,
                    reason: format!("expected {} columns, found {}", width, line.chars().count()),
                });
            }
            let y = height - 1 - row;
            for (x, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or_else(|| DemoError::TileMap {
                    row,
                    reason: format!("unknown glyph '{}'", glyph),
                })?;
                if glyph == '@' && player_start.replace((x, y)).is_some() {
                    return Err(DemoError::TileMap {
                        row,
                        reason: "more than one player start".to_string(),
                    });
                }
                tiles[y * width + x] = tile;
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
            player_start,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-bounds cells read as `Tile::Empty`.
    pub fn get(&self, x: i64, y: i64) -> Tile {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Tile::Empty;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    pub fn is_walkable(&self, x: i64, y: i64) -> bool {
        self.get(x, y).is_walkable()
    }

    /// Tile containing the world-space point.
    pub fn tile_at(&self, position: &Vec3) -> (i64, i64) {
        (
            (position.x + 0.5).floor() as i64,
            (position.y + 0.5).floor() as i64,
        )
    }

    pub fn is_walkable_at(&self, position: &Vec3) -> bool {
        let (x, y) = self.tile_at(position);
        self.is_walkable(x, y)
    }

    pub fn tile_center(&self, x: usize, y: usize) -> Vec3 {
        Vec3::new(x as f32, y as f32, 0.0)
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.width as f32 - 1.0) / 2.0,
            (self.height as f32 - 1.0) / 2.0,
            0.0,
        )
    }

    /// The `@` cell, or else the first walkable tile in row-major order.
    pub fn player_start(&self) -> Option<Vec3> {
        self.player_start
            .or_else(|| {
                self.iter()
                    .find(|(_, _, tile)| tile.is_walkable())
                    .map(|(x, y, _)| (x, y))
            })
            .map(|(x, y)| self.tile_center(x, y))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (i % self.width, i / self.width, *tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const LAYOUT: &str = "
#####
#.@.#
#~+ #
#####
";

    #[test]
    fn parse_places_first_row_at_top() {
        let map = TileMap::parse(LAYOUT).unwrap();
        assert_eq!((map.width(), map.height()), (5, 4));
        assert_eq!(map.get(1, 2), Tile::Floor);
        assert_eq!(map.get(1, 1), Tile::Water);
        assert_eq!(map.get(2, 1), Tile::Door);
        assert_eq!(map.get(3, 1), Tile::Empty);
        assert_eq!(map.get(0, 0), Tile::Wall);
    }

    #[test]
    fn out_of_bounds_is_empty() {
        let map = TileMap::parse(LAYOUT).unwrap();
        assert_eq!(map.get(-1, 0), Tile::Empty);
        assert_eq!(map.get(0, 4), Tile::Empty);
        assert!(!map.is_walkable(5, 2));
    }

    #[test]
    fn player_start_uses_marker() {
        let map = TileMap::parse(LAYOUT).unwrap();
        assert_eq!(map.player_start(), Some(Vec3::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn player_start_falls_back_to_first_walkable() {
        let map = TileMap::parse("###\n#.#\n###").unwrap();
        assert_eq!(map.player_start(), Some(Vec3::new(1.0, 1.0, 0.0)));
        let walls = TileMap::parse("##\n##").unwrap();
        assert_eq!(walls.player_start(), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = TileMap::parse("###\n#.\n###").unwrap_err();
        assert!(matches!(err, DemoError::TileMap { row: 1, .. }));
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        let err = TileMap::parse("#x#").unwrap_err();
        assert!(err.to_string().contains("'x'"));
        assert!(TileMap::parse("\n\n").is_err());
    }

    #[test]
    fn space_only_rows_are_kept() {
        let map = TileMap::parse("\n   \n#.#\n   \n").unwrap();
        assert_eq!((map.width(), map.height()), (3, 3));
        assert_eq!(map.get(1, 1), Tile::Floor);
        assert_eq!(map.get(1, 2), Tile::Empty);
    }

    #[test]
    fn duplicate_player_start_is_rejected() {
        let err = TileMap::parse("#@#\n#@#").unwrap_err();
        assert!(matches!(err, DemoError::TileMap { row: 1, .. }));
        assert!(err.to_string().contains("player start"));
    }

    #[test]
    fn tile_at_rounds_to_nearest_center() {
        let map = TileMap::parse(LAYOUT).unwrap();
        assert_eq!(map.tile_at(&Vec3::new(1.49, 2.4, 0.0)), (1, 2));
        assert_eq!(map.tile_at(&Vec3::new(1.51, 1.6, 0.0)), (2, 2));
        assert!(map.is_walkable_at(&Vec3::new(2.2, 1.8, 0.0)));
        assert!(!map.is_walkable_at(&Vec3::new(0.2, 2.0, 0.0)));
    }

    #[test]
    fn shipped_level_loads() {
        let map = TileMap::load("assets/levels/dungeon.txt").unwrap();
        let start = map.player_start().unwrap();
        assert!(map.is_walkable_at(&start));
        assert!(map.iter().any(|(_, _, tile)| tile == Tile::Door));
    }

    #[test]
    fn uv_rects_stay_inside_unit_square_and_differ() {
        let tileset = Tileset::new(4, 4);
        let rects: Vec<UvRect> = Tile::iter().filter_map(|t| tileset.uv_rect(t)).collect();
        assert_eq!(rects.len(), Tile::COUNT - 1);
        for (i, rect) in rects.iter().enumerate() {
            assert!(rect.min.x >= 0.0 && rect.min.y >= 0.0);
            assert!(rect.max.x <= 1.0 && rect.max.y <= 1.0);
            assert!(rects[i + 1..].iter().all(|other| other != rect));
        }
        assert_eq!(tileset.uv_rect(Tile::Empty), None);
    }

    #[test]
    fn floor_uses_top_left_cell() {
        let tileset = Tileset::new(4, 2);
        let rect = tileset.uv_rect(Tile::Floor).unwrap();
        assert_eq!(rect.min, Vec2::new(0.0, 0.5));
        assert_eq!(rect.max, Vec2::new(0.25, 1.0));
        let wall = tileset.uv_rect(Tile::Wall).unwrap();
        assert_eq!(wall.min, Vec2::new(0.25, 0.5));
    }
}

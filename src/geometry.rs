use crate::tiles::{Tile, TileMap, Tileset, UvRect};

/// Interleaved layout of every vertex buffer: position, normal, tex coord.
pub const VERTEX_ATTRIBUTES: [i32; 3] = [3, 3, 2];
pub const FLOATS_PER_VERTEX: usize = 8;

// Thirty-six vertices forming twelve triangles modeling the six faces of a
// unit cube centered at the origin.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 288] = [
    // positions          // normals           // tex coords
    -0.5, -0.5, -0.5,     0.0,  0.0, -1.0,     0.0, 0.0, // -z
     0.5, -0.5, -0.5,     0.0,  0.0, -1.0,     1.0, 0.0,
     0.5,  0.5, -0.5,     0.0,  0.0, -1.0,     1.0, 1.0,
     0.5,  0.5, -0.5,     0.0,  0.0, -1.0,     1.0, 1.0,
    -0.5,  0.5, -0.5,     0.0,  0.0, -1.0,     0.0, 1.0,
    -0.5, -0.5, -0.5,     0.0,  0.0, -1.0,     0.0, 0.0,

    -0.5, -0.5,  0.5,     0.0,  0.0,  1.0,     0.0, 0.0, // +z
     0.5, -0.5,  0.5,     0.0,  0.0,  1.0,     1.0, 0.0,
     0.5,  0.5,  0.5,     0.0,  0.0,  1.0,     1.0, 1.0,
     0.5,  0.5,  0.5,     0.0,  0.0,  1.0,     1.0, 1.0,
    -0.5,  0.5,  0.5,     0.0,  0.0,  1.0,     0.0, 1.0,
    -0.5, -0.5,  0.5,     0.0,  0.0,  1.0,     0.0, 0.0,

    -0.5,  0.5,  0.5,    -1.0,  0.0,  0.0,     0.0, 0.0, // -x
    -0.5,  0.5, -0.5,    -1.0,  0.0,  0.0,     1.0, 0.0,
    -0.5, -0.5, -0.5,    -1.0,  0.0,  0.0,     1.0, 1.0,
    -0.5, -0.5, -0.5,    -1.0,  0.0,  0.0,     1.0, 1.0,
    -0.5, -0.5,  0.5,    -1.0,  0.0,  0.0,     0.0, 1.0,
    -0.5,  0.5,  0.5,    -1.0,  0.0,  0.0,     0.0, 0.0,

     0.5,  0.5,  0.5,     1.0,  0.0,  0.0,     0.0, 0.0, // +x
     0.5,  0.5, -0.5,     1.0,  0.0,  0.0,     1.0, 0.0,
     0.5, -0.5, -0.5,     1.0,  0.0,  0.0,     1.0, 1.0,
     0.5, -0.5, -0.5,     1.0,  0.0,  0.0,     1.0, 1.0,
     0.5, -0.5,  0.5,     1.0,  0.0,  0.0,     0.0, 1.0,
     0.5,  0.5,  0.5,     1.0,  0.0,  0.0,     0.0, 0.0,

    -0.5, -0.5, -0.5,     0.0, -1.0,  0.0,     0.0, 0.0, // -y
     0.5, -0.5, -0.5,     0.0, -1.0,  0.0,     1.0, 0.0,
     0.5, -0.5,  0.5,     0.0, -1.0,  0.0,     1.0, 1.0,
     0.5, -0.5,  0.5,     0.0, -1.0,  0.0,     1.0, 1.0,
    -0.5, -0.5,  0.5,     0.0, -1.0,  0.0,     0.0, 1.0,
    -0.5, -0.5, -0.5,     0.0, -1.0,  0.0,     0.0, 0.0,

    -0.5,  0.5, -0.5,     0.0,  1.0,  0.0,     0.0, 0.0, // +y
     0.5,  0.5, -0.5,     0.0,  1.0,  0.0,     1.0, 0.0,
     0.5,  0.5,  0.5,     0.0,  1.0,  0.0,     1.0, 1.0,
     0.5,  0.5,  0.5,     0.0,  1.0,  0.0,     1.0, 1.0,
    -0.5,  0.5,  0.5,     0.0,  1.0,  0.0,     0.0, 1.0,
    -0.5,  0.5, -0.5,     0.0,  1.0,  0.0,     0.0, 0.0,
];

// Two triangles of a unit quad in the XY plane facing +Z.
#[rustfmt::skip]
const QUAD_CORNERS: [(f32, f32); 6] = [
    (-0.5, -0.5), (0.5, -0.5), (0.5, 0.5),
    (0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5),
];

/// Builds the static level mesh: a floor quad for every open tile at z = 0
/// and a unit cube standing on the floor for every wall.
pub fn level_vertices(map: &TileMap, tileset: &Tileset) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(map.width() * map.height() * 6 * FLOATS_PER_VERTEX);
    for (x, y, tile) in map.iter() {
        let Some(rect) = tileset.uv_rect(tile) else {
            continue;
        };
        let (cx, cy) = (x as f32, y as f32);
        if tile.is_solid() {
            push_cube(&mut vertices, (cx, cy, 0.5), &rect);
        } else {
            push_floor_quad(&mut vertices, (cx, cy), &rect);
        }
    }
    vertices
}

fn push_floor_quad(vertices: &mut Vec<f32>, center: (f32, f32), rect: &UvRect) {
    for (dx, dy) in QUAD_CORNERS {
        let (u, v) = remap(rect, dx + 0.5, dy + 0.5);
        vertices.extend_from_slice(&[center.0 + dx, center.1 + dy, 0.0, 0.0, 0.0, 1.0, u, v]);
    }
}

fn push_cube(vertices: &mut Vec<f32>, center: (f32, f32, f32), rect: &UvRect) {
    for vertex in CUBE_VERTICES.chunks_exact(FLOATS_PER_VERTEX) {
        let (u, v) = remap(rect, vertex[6], vertex[7]);
        vertices.extend_from_slice(&[
            center.0 + vertex[0],
            center.1 + vertex[1],
            center.2 + vertex[2],
            vertex[3],
            vertex[4],
            vertex[5],
            u,
            v,
        ]);
    }
}

fn remap(rect: &UvRect, u: f32, v: f32) -> (f32, f32) {
    (
        rect.min.x + (rect.max.x - rect.min.x) * u,
        rect.min.y + (rect.max.y - rect.min.y) * v,
    )
}

pub fn vertex_count(vertices: &[f32]) -> usize {
    vertices.len() / FLOATS_PER_VERTEX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_sizes_match_vertex_stride() {
        let stride: i32 = VERTEX_ATTRIBUTES.iter().sum();
        assert_eq!(stride as usize, FLOATS_PER_VERTEX);
        assert_eq!(vertex_count(&CUBE_VERTICES), 36);
    }

    #[test]
    fn cube_normals_are_unit_axes() {
        for vertex in CUBE_VERTICES.chunks_exact(FLOATS_PER_VERTEX) {
            let n = &vertex[3..6];
            let len: f32 = n.iter().map(|c| c * c).sum();
            assert_eq!(len, 1.0);
        }
    }

    #[test]
    fn floor_and_walls_produce_expected_vertex_counts() {
        let map = TileMap::parse("#..\n  ~").unwrap();
        let vertices = level_vertices(&map, &Tileset::new(4, 4));
        // one wall cube, three floor quads, two empty cells
        assert_eq!(vertex_count(&vertices), 36 + 3 * 6);
    }

    #[test]
    fn floor_quad_spans_its_tile_with_tile_uvs() {
        let map = TileMap::parse(".").unwrap();
        let tileset = Tileset::new(4, 4);
        let vertices = level_vertices(&map, &tileset);
        let rect = tileset.uv_rect(Tile::Floor).unwrap();
        for vertex in vertices.chunks_exact(FLOATS_PER_VERTEX) {
            assert!(vertex[0].abs() == 0.5 && vertex[1].abs() == 0.5);
            assert_eq!(vertex[2], 0.0);
            assert_eq!(&vertex[3..6], &[0.0, 0.0, 1.0]);
            assert!(vertex[6] == rect.min.x || vertex[6] == rect.max.x);
            assert!(vertex[7] == rect.min.y || vertex[7] == rect.max.y);
        }
    }

    #[test]
    fn wall_cube_stands_on_the_floor() {
        let map = TileMap::parse("#").unwrap();
        let vertices = level_vertices(&map, &Tileset::new(4, 4));
        let (min_z, max_z) = vertices
            .chunks_exact(FLOATS_PER_VERTEX)
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v[2]), hi.max(v[2])));
        assert_eq!((min_z, max_z), (0.0, 1.0));
    }
}

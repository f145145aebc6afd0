//! UV island packing and the texture pixels that travel with it.

use std::collections::BTreeSet;

use hew_core::error::{HewError, Result};
use hew_math::{vec2, Vec2};
use hew_topology::EditMesh;

use crate::islands::uv_islands;
use crate::target_faces;

/// RGBA8 image whose pixel regions follow the UV islands mapped onto it.
///
/// `pixels` holds `width * height * 4` bytes in row-major order; the
/// constructor enforces that, direct field access is trusted with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// A transparent black image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(HewError::InvalidData(format!(
                "texture dimensions {width}x{height} must be non-zero"
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Bilinear sample at pixel coordinates, clamped to the image.
    fn sample_bilinear(&self, x: f32, y: f32) -> [u8; 4] {
        let x = x.clamp(0.0, (self.width - 1) as f32);
        let y = y.clamp(0.0, (self.height - 1) as f32);
        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = self.pixel(x0, y0);
        let p10 = self.pixel(x1, y0);
        let p01 = self.pixel(x0, y1);
        let p11 = self.pixel(x1, y1);
        let mut out = [0u8; 4];
        for channel in 0..4 {
            let top = p00[channel] as f32 * (1.0 - fx) + p10[channel] as f32 * fx;
            let bottom = p01[channel] as f32 * (1.0 - fx) + p11[channel] as f32 * fx;
            out[channel] = (top * (1.0 - fy) + bottom * fy).round() as u8;
        }
        out
    }

    fn copy_rect(&self, x0: u32, y0: u32, w: u32, h: u32) -> TextureImage {
        let mut out = TextureImage {
            width: w,
            height: h,
            pixels: vec![0; w as usize * h as usize * 4],
        };
        for y in 0..h {
            for x in 0..w {
                out.set_pixel(x, y, self.pixel(x0 + x, y0 + y));
            }
        }
        out
    }

    fn clear_rect(&mut self, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                self.set_pixel(x, y, [0, 0, 0, 0]);
            }
        }
    }
}

/// Working resolution used for padding when no texture is attached.
const DEFAULT_RESOLUTION: f32 = 256.0;

/// Repacks the UV islands of the target faces into the unit square.
///
/// Islands are found by UV adjacency, padded by a two-pixel bleed at the
/// working resolution, shelf-packed tallest first, and scaled uniformly to
/// fit. When a texture is supplied, each island's pixel rectangle is copied
/// out, its old place cleared to transparent black, and the pixels
/// rewritten at the island's new place, resampled when the scale changed.
/// Returns the number of islands packed.
pub fn auto_pack_uv_islands(mesh: &mut EditMesh, texture: Option<&mut TextureImage>) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("uv packing rejected: no faces to pack");
        return 0;
    }
    let islands = uv_islands(mesh, &faces);

    let pad = match &texture {
        Some(image) => vec2(2.0 / image.width as f32, 2.0 / image.height as f32),
        None => Vec2::splat(2.0 / DEFAULT_RESOLUTION),
    };

    // Island extents in the current UV space, grown by the bleed padding.
    let mut island_vertices: Vec<BTreeSet<u32>> = Vec::with_capacity(islands.len());
    let mut bounds: Vec<(Vec2, Vec2)> = Vec::with_capacity(islands.len());
    let mut rects: Vec<Vec2> = Vec::with_capacity(islands.len());
    for island in &islands {
        let members: BTreeSet<u32> =
            island.iter().flat_map(|&f| mesh.face_vertices(f)).collect();
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for &v in &members {
            let uv = mesh.vertex(v).uv;
            min = min.min(uv);
            max = max.max(uv);
        }
        bounds.push((min, max));
        rects.push(max - min + pad * 2.0);
        island_vertices.push(members);
    }

    let (placements, extent) = shelf_pack(&rects, 0.0);
    let fit = 1.0 / extent.max_element().max(f32::MIN_POSITIVE);

    // Rewrite UVs island by island. A vertex shared by two islands (corner
    // contact) moves with the first island that claims it.
    let mut moved: BTreeSet<u32> = BTreeSet::new();
    for (i, vertices) in island_vertices.iter().enumerate() {
        let offset = placements[i] + pad - bounds[i].0;
        for &v in vertices {
            if moved.insert(v) {
                let uv = mesh.vertex(v).uv;
                mesh.vertex_mut(v).uv = (uv + offset) * fit;
            }
        }
    }

    if let Some(image) = texture {
        // Copy all sources out before clearing any of them, and clear all
        // of them before writing any destination, since the regions may
        // overlap across islands.
        let mut patches: Vec<(TextureImage, Vec2, Vec2)> = Vec::with_capacity(islands.len());
        let mut sources: Vec<(u32, u32, u32, u32)> = Vec::with_capacity(islands.len());
        for (i, &(min, max)) in bounds.iter().enumerate() {
            let (sx, sy, sw, sh) = pixel_rect(image, min - pad, max + pad);
            let dst_lo = placements[i] * fit;
            let dst_hi = (placements[i] + rects[i]) * fit;
            patches.push((image.copy_rect(sx, sy, sw, sh), dst_lo, dst_hi));
            sources.push((sx, sy, sw, sh));
        }
        for &(sx, sy, sw, sh) in &sources {
            image.clear_rect(sx, sy, sw, sh);
        }
        for (scratch, lo, hi) in patches {
            let (dx, dy, dw, dh) = pixel_rect(image, lo, hi);
            for py in 0..dh {
                for px in 0..dw {
                    let u = (px as f32 + 0.5) / dw as f32;
                    let v = (py as f32 + 0.5) / dh as f32;
                    let sx = u * scratch.width as f32 - 0.5;
                    let sy = v * scratch.height as f32 - 0.5;
                    image.set_pixel(dx + px, dy + py, scratch.sample_bilinear(sx, sy));
                }
            }
        }
    }

    tracing::debug!(islands = islands.len(), faces = faces.len(), "packed uv islands");
    islands.len()
}

/// A UV rectangle snapped outward to whole pixels and clamped into the
/// image, at least one pixel each way.
fn pixel_rect(image: &TextureImage, lo: Vec2, hi: Vec2) -> (u32, u32, u32, u32) {
    let w = image.width as f32;
    let h = image.height as f32;
    let x0 = (lo.x * w).floor().clamp(0.0, w - 1.0) as u32;
    let y0 = (lo.y * h).floor().clamp(0.0, h - 1.0) as u32;
    let x1 = (hi.x * w).ceil().clamp(1.0, w) as u32;
    let y1 = (hi.y * h).ceil().clamp(1.0, h) as u32;
    (x0, y0, x1.max(x0 + 1) - x0, y1.max(y0 + 1) - y0)
}

/// Shelf-packs rectangles, tallest first, into rows of roughly square
/// total extent. Returns per-rectangle origins in input order plus the
/// extent used; callers scale the layout to wherever it has to fit.
pub(crate) fn shelf_pack(sizes: &[Vec2], spacing: f32) -> (Vec<Vec2>, Vec2) {
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| sizes[b].y.total_cmp(&sizes[a].y));

    let widest = sizes.iter().fold(0.0f32, |acc, s| acc.max(s.x));
    let total_area: f32 = sizes.iter().map(|s| (s.x + spacing) * (s.y + spacing)).sum();
    let target_width = total_area.sqrt().max(widest);

    let mut placements = vec![Vec2::ZERO; sizes.len()];
    let mut pen = Vec2::ZERO;
    let mut shelf_height = 0.0f32;
    let mut extent = Vec2::ZERO;
    for &i in &order {
        let size = sizes[i];
        if pen.x > 0.0 && pen.x + size.x > target_width {
            pen.x = 0.0;
            pen.y += shelf_height + spacing;
            shelf_height = 0.0;
        }
        placements[i] = pen;
        shelf_height = shelf_height.max(size.y);
        extent = extent.max(pen + size);
        pen.x += size.x + spacing;
    }
    (placements, extent)
}

use euclid::{
    default::{Point2D, Rect, Size2D, Transform2D, Vector2D},
    point2, size2,
};
use palette::Srgba;
use zerocopy::AsBytes;

use crate::{assets::Image, texture_atlas::TextureRect};

pub type Color = Srgba;

pub fn white() -> Color {
    Srgba::new(1., 1., 1., 1.)
}

pub fn black() -> Color {
    Srgba::new(0., 0., 0., 1.)
}

pub fn button_grey() -> Color {
    Srgba::new(100. / 255., 100. / 255., 100. / 255., 1.)
}

/// Anything the game can compose a frame onto. Coordinates are logical
/// screen units with the origin at the top left.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect<f32>, color: Color);
    /// Draws `image` with `transform` mapping its pixel space onto the screen.
    fn blit(&mut self, image: &Image, transform: &Transform2D<f32>);
    /// Draws `text` with the top left of the first glyph at `origin`.
    fn text(&mut self, text: &str, origin: Point2D<f32>, color: Color);
}

#[repr(C)]
#[derive(Clone, Copy, Debug, AsBytes)]
pub struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

pub fn color_components(color: Color) -> [f32; 4] {
    let (r, g, b, a) = color.into_components();
    [r, g, b, a]
}

pub fn uv_rect(tex_coords: TextureRect, atlas_size: Size2D<u32>) -> Rect<f32> {
    Rect::new(
        point2(
            tex_coords[0] as f32 / atlas_size.width as f32,
            tex_coords[1] as f32 / atlas_size.height as f32,
        ),
        size2(
            (tex_coords[2] - tex_coords[0]) as f32 / atlas_size.width as f32,
            (tex_coords[3] - tex_coords[1]) as f32 / atlas_size.height as f32,
        ),
    )
}

/// Corners in top left, top right, bottom right, bottom left order.
pub fn render_quad(corners: [Point2D<f32>; 4], uv: Rect<f32>, color: Color, out: &mut Vec<Vertex>) {
    let color = color_components(color);
    let vertex = |corner: Point2D<f32>, u: f32, v: f32| Vertex {
        position: corner.to_array(),
        uv: [u, v],
        color,
    };
    let [top_left, top_right, bottom_right, bottom_left] = corners;
    out.extend_from_slice(&[
        vertex(top_left, uv.min_x(), uv.min_y()),
        vertex(top_right, uv.max_x(), uv.min_y()),
        vertex(bottom_left, uv.min_x(), uv.max_y()),
        vertex(top_right, uv.max_x(), uv.min_y()),
        vertex(bottom_right, uv.max_x(), uv.max_y()),
        vertex(bottom_left, uv.min_x(), uv.max_y()),
    ]);
}

pub fn rect_corners(rect: Rect<f32>) -> [Point2D<f32>; 4] {
    [
        rect.min(),
        point2(rect.max_x(), rect.min_y()),
        rect.max(),
        point2(rect.min_x(), rect.max_y()),
    ]
}

/// Scales an image about its top left corner, then moves that corner to
/// `position`.
pub fn placement(scale: Vector2D<f32>, position: Point2D<f32>) -> Transform2D<f32> {
    Transform2D::new(scale.x, 0., 0., scale.y, position.x, position.y)
}

pub fn transformed_corners(size: Size2D<u32>, transform: &Transform2D<f32>) -> [Point2D<f32>; 4] {
    let size = size.to_f32();
    let corners = rect_corners(Rect::new(point2(0., 0.), size));
    [
        transform.transform_point(corners[0]),
        transform.transform_point(corners[1]),
        transform.transform_point(corners[2]),
        transform.transform_point(corners[3]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use euclid::vec2;

    #[test]
    fn quad_is_two_triangles_with_matching_uvs() {
        let mut out = Vec::new();
        let rect = Rect::new(point2(10., 20.), size2(32., 32.));
        let uv = Rect::new(point2(0.25, 0.5), size2(0.25, 0.25));
        render_quad(rect_corners(rect), uv, white(), &mut out);

        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position, [10., 20.]);
        assert_eq!(out[0].uv, [0.25, 0.5]);
        assert_eq!(out[4].position, [42., 52.]);
        assert_eq!(out[4].uv, [0.5, 0.75]);
        assert_eq!(out[0].color, [1., 1., 1., 1.]);
    }

    #[test]
    fn uv_rect_is_normalized_to_the_atlas() {
        let uv = uv_rect([256, 512, 512, 1024], size2(1024, 1024));
        assert_relative_eq!(uv.min_x(), 0.25);
        assert_relative_eq!(uv.min_y(), 0.5);
        assert_relative_eq!(uv.max_x(), 0.5);
        assert_relative_eq!(uv.max_y(), 1.);
    }

    #[test]
    fn scale_then_translate_places_image() {
        let transform = placement(vec2(0.5, 0.25), point2(100., 50.));
        let corners = transformed_corners(size2(64, 128), &transform);
        assert_eq!(corners[0], point2(100., 50.));
        assert_eq!(corners[2], point2(132., 82.));
    }
}

use std::collections::HashMap;

use anyhow::Error;
use euclid::{
    default::{Point2D, Rect, Size2D, Transform2D},
    point2, size2,
};

use crate::{
    assets::{Image, ImageId},
    constants::{SCREEN_HEIGHT, SCREEN_WIDTH},
    font::{self, GLYPH_HEIGHT, GLYPH_WIDTH, TEXT_SCALE},
    gl,
    graphics::{
        color_components, rect_corners, render_quad, transformed_corners, uv_rect, white, Color,
        Surface, Vertex,
    },
    texture_atlas::{TextureAtlas, TextureRect},
};

pub const TEXTURE_ATLAS_SIZE: Size2D<u32> = Size2D {
    width: 2048,
    height: 2048,
    _unit: std::marker::PhantomData::<euclid::UnknownUnit>,
};

/// Batches everything drawn during a frame into one textured, tinted
/// triangle list over a single atlas texture.
pub struct Renderer {
    program: gl::Program,
    vertex_buffer: gl::VertexBuffer,
    texture: gl::Texture,
    atlas: TextureAtlas,

    white_texel: Rect<f32>,
    glyphs: HashMap<char, TextureRect>,
    // None marks an image that did not fit, so it is only reported once
    images: HashMap<ImageId, Option<TextureRect>>,

    clear_color: [f32; 4],
    vertices: Vec<Vertex>,
}

impl Renderer {
    pub fn new(gl_context: &mut gl::Context) -> Result<Self, Error> {
        let vertex_shader = unsafe {
            gl_context.create_shader(gl::ShaderType::Vertex, include_str!("shaders/shader.vert"))?
        };
        let fragment_shader = unsafe {
            gl_context.create_shader(
                gl::ShaderType::Fragment,
                include_str!("shaders/shader.frag"),
            )?
        };

        let mut program = unsafe {
            gl_context.create_program(&gl::ProgramDescriptor {
                vertex_shader: &vertex_shader,
                fragment_shader: &fragment_shader,
                uniforms: &[
                    gl::UniformEntry {
                        name: "u_transform",
                        ty: gl::UniformType::Mat3,
                    },
                    gl::UniformEntry {
                        name: "u_texture",
                        ty: gl::UniformType::Texture,
                    },
                ],
                vertex_format: gl::VertexFormat {
                    stride: std::mem::size_of::<Vertex>(),
                    attributes: &[
                        gl::VertexAttribute {
                            name: "a_pos",
                            size: 2,
                            offset: 0,
                        },
                        gl::VertexAttribute {
                            name: "a_uv",
                            size: 2,
                            offset: 2 * 4,
                        },
                        gl::VertexAttribute {
                            name: "a_color",
                            size: 4,
                            offset: 4 * 4,
                        },
                    ],
                },
            })?
        };

        let texture = unsafe {
            gl_context.create_atlas_texture((TEXTURE_ATLAS_SIZE.width, TEXTURE_ATLAS_SIZE.height))?
        };

        let transform = screen_to_clip();
        program.set_uniform(
            0,
            gl::Uniform::Mat3([
                [transform.m11, transform.m12, 0.0],
                [transform.m21, transform.m22, 0.0],
                [transform.m31, transform.m32, 1.0],
            ]),
        )?;
        program.set_uniform(1, gl::Uniform::Texture(&texture))?;

        let vertex_buffer = unsafe { gl_context.create_vertex_buffer()? };

        let mut renderer = Renderer {
            program,
            vertex_buffer,
            texture,
            atlas: TextureAtlas::new((TEXTURE_ATLAS_SIZE.width, TEXTURE_ATLAS_SIZE.height)),
            white_texel: Rect::zero(),
            glyphs: HashMap::new(),
            images: HashMap::new(),
            clear_color: [0., 0., 0., 1.],
            vertices: Vec::new(),
        };

        let white = renderer.upload((1, 1), &[255, 255, 255, 255])?;
        // sample the texel center so fills never touch neighbouring texels
        renderer.white_texel = Rect::new(
            point2(
                (white[0] as f32 + 0.5) / TEXTURE_ATLAS_SIZE.width as f32,
                (white[1] as f32 + 0.5) / TEXTURE_ATLAS_SIZE.height as f32,
            ),
            size2(0., 0.),
        );

        for c in font::glyphs() {
            let rect = renderer.upload((GLYPH_WIDTH, GLYPH_HEIGHT), &font::rasterize(c))?;
            renderer.glyphs.insert(c, rect);
        }

        Ok(renderer)
    }

    fn upload(&mut self, size: (u32, u32), pixels: &[u8]) -> Result<TextureRect, Error> {
        let rect = self.atlas.add_texture(size)?;
        unsafe {
            self.texture.write_entry(rect, pixels);
        }
        log::debug!(
            "Uploaded {}x{} texture at {:?}, {} atlas entries",
            size.0,
            size.1,
            rect,
            self.atlas.len()
        );
        Ok(rect)
    }

    fn image_rect(&mut self, image: &Image) -> Option<TextureRect> {
        if let Some(rect) = self.images.get(&image.id()) {
            return *rect;
        }
        let size = image.size();
        let rect = match self.upload((size.width, size.height), image.pixels()) {
            Ok(rect) => Some(rect),
            Err(e) => {
                log::error!("Could not upload image: {}", e);
                None
            }
        };
        self.images.insert(image.id(), rect);
        rect
    }

    pub fn present(&mut self, gl_context: &mut gl::Context) -> Result<(), Error> {
        unsafe {
            gl_context.clear(self.clear_color);
            self.vertex_buffer.write(&self.vertices);
            self.program.render_vertices(&self.vertex_buffer)?;
        }
        self.vertices.clear();
        Ok(())
    }
}

impl Surface for Renderer {
    fn clear(&mut self, color: Color) {
        self.clear_color = color_components(color);
        self.vertices.clear();
    }

    fn fill_rect(&mut self, rect: Rect<f32>, color: Color) {
        render_quad(rect_corners(rect), self.white_texel, color, &mut self.vertices);
    }

    fn blit(&mut self, image: &Image, transform: &Transform2D<f32>) {
        if let Some(rect) = self.image_rect(image) {
            render_quad(
                transformed_corners(image.size(), transform),
                uv_rect(rect, TEXTURE_ATLAS_SIZE),
                white(),
                &mut self.vertices,
            );
        }
    }

    fn text(&mut self, text: &str, origin: Point2D<f32>, color: Color) {
        let glyph_size = size2(
            GLYPH_WIDTH as f32 * TEXT_SCALE,
            GLYPH_HEIGHT as f32 * TEXT_SCALE,
        );
        for (i, c) in text.chars().enumerate() {
            if let Some(rect) = self.glyphs.get(&c) {
                let position = point2(origin.x + i as f32 * font::ADVANCE, origin.y);
                render_quad(
                    rect_corners(Rect::new(position, glyph_size)),
                    uv_rect(*rect, TEXTURE_ATLAS_SIZE),
                    color,
                    &mut self.vertices,
                );
            }
        }
    }
}

/// Maps logical screen units, y down, onto clip space.
fn screen_to_clip() -> Transform2D<f32> {
    Transform2D::new(
        2. / SCREEN_WIDTH,
        0.,
        0.,
        -2. / SCREEN_HEIGHT,
        -1.,
        1.,
    )
}

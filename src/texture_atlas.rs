use anyhow::{format_err, Error};

/// min x, min y, max x, max y in texels
pub type TextureRect = [u32; 4];

const PADDING: u32 = 1;

/// Packs textures into rows ("shelves") left to right, top to bottom, with a
/// texel of padding around each one so nearest sampling never bleeds.
pub struct TextureAtlas {
    size: (u32, u32),
    cursor_x: u32,
    shelf_y: u32,
    shelf_height: u32,
    texture_rects: Vec<TextureRect>,
}

impl TextureAtlas {
    pub fn new(size: (u32, u32)) -> TextureAtlas {
        TextureAtlas {
            size,
            cursor_x: PADDING,
            shelf_y: PADDING,
            shelf_height: 0,
            texture_rects: Vec::new(),
        }
    }

    pub fn add_texture(&mut self, size: (u32, u32)) -> Result<TextureRect, Error> {
        let (mut x, mut y, mut shelf_height) = (self.cursor_x, self.shelf_y, self.shelf_height);
        if x + size.0 + PADDING > self.size.0 {
            // start a new shelf under the tallest texture of this one
            y += shelf_height + PADDING;
            x = PADDING;
            shelf_height = 0;
        }
        if x + size.0 + PADDING > self.size.0 || y + size.1 + PADDING > self.size.1 {
            return Err(format_err!(
                "Texture atlas overflow placing {}x{} texture",
                size.0,
                size.1
            ));
        }

        let rect = [x, y, x + size.0, y + size.1];
        self.cursor_x = x + size.0 + PADDING;
        self.shelf_y = y;
        self.shelf_height = shelf_height.max(size.1);
        self.texture_rects.push(rect);
        Ok(rect)
    }

    pub fn len(&self) -> usize {
        self.texture_rects.len()
    }
}

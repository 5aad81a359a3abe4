//! Drawing seam between animation views and the graphics backend.
//!
//! Views never talk to raylib directly. They hand a sheet image, a source
//! frame rectangle and a destination rectangle to a [`Canvas`]. Every raylib
//! draw target (`RaylibDrawHandle`, `RaylibMode2D`, texture modes, ...)
//! is a `Canvas<Texture2D>` through [`RaylibDraw`].

use raylib::prelude::*;

/// Something a sheet image of type `I` can be blitted onto.
pub trait Canvas<I> {
    /// Copy the `src` region of `image` to `dest` on this surface.
    fn blit(&mut self, image: &I, src: Rectangle, dest: Rectangle);
}

impl<D: RaylibDraw> Canvas<Texture2D> for D {
    fn blit(&mut self, image: &Texture2D, src: Rectangle, dest: Rectangle) {
        self.draw_texture_pro(image, src, dest, Vector2::zero(), 0.0, Color::WHITE);
    }
}

/// Destination rectangle for a frame drawn at `view + controller` offsets.
pub fn frame_destination(view: Vector2, controller: Vector2, frame: Rectangle) -> Rectangle {
    Rectangle {
        x: view.x + controller.x,
        y: view.y + controller.y,
        width: frame.width,
        height: frame.height,
    }
}

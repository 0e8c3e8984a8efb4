//! CPU raster implementation of the core's render-surface contract.
//!
//! Draws the scene into a tiny-skia pixmap: rectangles and textbox bounds as
//! (rotated) filled rects, freehand paths as round-capped polylines, images
//! via transformed pixmap draws. Decoded image pixmaps are cached by source
//! bytes so re-renders don't re-decode.
//!
//! Glyph shaping is out of scope here - a textbox renders as its filled
//! bounds. The surface is a preview, not a print pipeline.

use std::sync::Arc;

use marque_core::{
    color::Rgba,
    geom::Size,
    render::{RasterImage, RenderError, RenderSurface},
    state::scene::{ImageSource, ObjectKind},
    state::{Scene, VisualObject},
};

pub struct PreviewSurface {
    viewport: Size,
    pixmap: tiny_skia::Pixmap,
    // None records a source that failed to decode, so it isn't retried every frame.
    cache: hashbrown::HashMap<ImageSource, Option<Arc<tiny_skia::Pixmap>>>,
}

impl PreviewSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(RenderError::BadViewport { width, height })?;
        let viewport = Size::new(width as f32, height as f32)
            .map_err(|_| RenderError::BadViewport { width, height })?;
        Ok(Self {
            viewport,
            pixmap,
            cache: hashbrown::HashMap::new(),
        })
    }

    #[must_use]
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    fn paint(color: Rgba) -> tiny_skia::Paint<'static> {
        let [r, g, b, a] = color.as_array().map(|channel| channel.clamp(0.0, 1.0));
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::BLACK));
        paint.anti_alias = true;
        paint
    }

    /// Pixmap of a decoded image source, premultiplied for tiny-skia.
    fn decoded(&mut self, source: &ImageSource) -> Option<Arc<tiny_skia::Pixmap>> {
        if let Some(cached) = self.cache.get(source) {
            return cached.clone();
        }
        let entry = match crate::decode::decode_bytes(source.bytes()) {
            Ok(img) => {
                let mut data = img.pixels.to_vec();
                for px in data.chunks_exact_mut(4) {
                    let alpha = u16::from(px[3]);
                    px[0] = ((u16::from(px[0]) * alpha) / 255) as u8;
                    px[1] = ((u16::from(px[1]) * alpha) / 255) as u8;
                    px[2] = ((u16::from(px[2]) * alpha) / 255) as u8;
                }
                tiny_skia::IntSize::from_wh(img.width, img.height)
                    .and_then(|size| tiny_skia::Pixmap::from_vec(data, size))
                    .map(Arc::new)
            }
            Err(err) => {
                log::warn!("image in scene failed to decode: {err}");
                None
            }
        };
        self.cache.insert(source.clone(), entry.clone());
        entry
    }

    fn draw_object(&mut self, obj: &VisualObject) {
        let size = obj.size();
        let (left, top) = (obj.left.get(), obj.top.get());
        let rotate = tiny_skia::Transform::from_rotate_at(
            obj.angle.get(),
            left + size.width() / 2.0,
            top + size.height() / 2.0,
        );
        match &obj.kind {
            // A textbox previews as its filled bounds; see module docs.
            ObjectKind::Rect { .. } | ObjectKind::Textbox { .. } => {
                let Some(rect) =
                    tiny_skia::Rect::from_xywh(left, top, size.width(), size.height())
                else {
                    return;
                };
                let path = tiny_skia::PathBuilder::from_rect(rect);
                self.pixmap.fill_path(
                    &path,
                    &Self::paint(obj.fill),
                    tiny_skia::FillRule::Winding,
                    rotate,
                    None,
                );
                if let Some(stroke) = obj.stroke {
                    self.pixmap.stroke_path(
                        &path,
                        &Self::paint(stroke.color),
                        &tiny_skia::Stroke {
                            width: stroke.width.get().max(1.0),
                            ..tiny_skia::Stroke::default()
                        },
                        rotate,
                        None,
                    );
                }
            }
            ObjectKind::Image { source, .. } => {
                let Some(pixmap) = self.decoded(source) else {
                    return;
                };
                let scale_x = size.width() / pixmap.width() as f32;
                let scale_y = size.height() / pixmap.height() as f32;
                let transform = tiny_skia::Transform::from_scale(scale_x, scale_y)
                    .post_translate(left, top)
                    .post_concat(rotate);
                self.pixmap.draw_pixmap(
                    0,
                    0,
                    pixmap.as_ref().as_ref(),
                    &tiny_skia::PixmapPaint::default(),
                    transform,
                    None,
                );
            }
            ObjectKind::Path { points } => {
                let mut iter = points.iter();
                let Some(first) = iter.next() else { return };
                let mut builder = tiny_skia::PathBuilder::new();
                builder.move_to(left + first.x.get(), top + first.y.get());
                for point in iter {
                    builder.line_to(left + point.x.get(), top + point.y.get());
                }
                let Some(path) = builder.finish() else { return };
                let brush = obj.stroke.unwrap_or_default();
                self.pixmap.stroke_path(
                    &path,
                    &Self::paint(brush.color),
                    &tiny_skia::Stroke {
                        width: brush.width.get().max(1.0),
                        line_cap: tiny_skia::LineCap::Round,
                        ..tiny_skia::Stroke::default()
                    },
                    rotate,
                    None,
                );
            }
        }
    }

    fn draw(&mut self, scene: &Scene) {
        let [r, g, b, a] = scene
            .background()
            .as_array()
            .map(|channel| channel.clamp(0.0, 1.0));
        self.pixmap
            .fill(tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::WHITE));
        // Iteration order is the stacking order, bottom-most first.
        for obj in scene.iter() {
            self.draw_object(obj);
        }
    }
}

impl RenderSurface for PreviewSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }
    fn render(&mut self, scene: &Scene) {
        self.draw(scene);
    }
    fn rasterize(&mut self, scene: &Scene) -> Result<RasterImage, RenderError> {
        self.draw(scene);
        let mut pixels =
            Vec::with_capacity(self.pixmap.width() as usize * self.pixmap.height() as usize * 4);
        for px in self.pixmap.pixels() {
            let straight = px.demultiply();
            pixels.extend_from_slice(&[
                straight.red(),
                straight.green(),
                straight.blue(),
                straight.alpha(),
            ]);
        }
        Ok(RasterImage {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            pixels,
        })
    }
}

#[cfg(test)]
mod test {
    use super::PreviewSurface;
    use marque_core::{
        color::Rgba,
        geom::Size,
        render::RenderSurface,
        state::{Scene, VisualObject},
        util::FiniteF32,
    };

    fn pixel(raster: &marque_core::render::RasterImage, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * raster.width + x) * 4) as usize;
        raster.pixels[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn zero_viewport_is_rejected() {
        assert!(PreviewSurface::new(0, 10).is_err());
    }

    #[test]
    fn background_fills_empty_scene() {
        let mut surface = PreviewSurface::new(8, 8).unwrap();
        let raster = surface.rasterize(&Scene::default()).unwrap();
        assert_eq!(pixel(&raster, 4, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn rect_covers_its_bounds() {
        let mut surface = PreviewSurface::new(32, 32).unwrap();
        let mut scene = Scene::default();
        let mut rect = VisualObject::rect(Size::wrap(16.0, 16.0));
        rect.left = FiniteF32::wrap(8.0);
        rect.top = FiniteF32::wrap(8.0);
        rect.fill = Rgba::BLACK;
        scene.add(rect);

        let raster = surface.rasterize(&scene).unwrap();
        // Interior of the rect is fill-colored; outside stays background.
        assert_eq!(pixel(&raster, 16, 16), [0, 0, 0, 255]);
        assert_eq!(pixel(&raster, 2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut surface = PreviewSurface::new(16, 16).unwrap();
        let mut scene = Scene::default();
        scene.add(VisualObject::rect(Size::wrap(4.0, 4.0)));

        surface.render(&scene);
        let first = surface.rasterize(&scene).unwrap();
        surface.render(&scene);
        surface.render(&scene);
        let second = surface.rasterize(&scene).unwrap();
        assert_eq!(first, second);
    }
}

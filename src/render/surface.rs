use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::{
    core::{Affine, CropRect, Line, Point},
    error::{CropError, CropResult},
};

/// Largest surface we agree to allocate (pixels).
const MAX_SURFACE_PIXELS: u64 = 1 << 28;

/// Approximate advance of one label glyph, in pixels.
const LABEL_GLYPH_ADVANCE: f64 = 7.0;
const LABEL_PADDING: f64 = 4.0;
const LABEL_HEIGHT: f64 = 16.0;
const HAIRLINE: f64 = 1.0;

/// Addressable 2D drawing target used by the crop overlay.
///
/// Colours are straight (non-premultiplied) RGBA8 and are alpha-blended over
/// the existing contents, except for [`RenderSurface::clear`].
pub trait RenderSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill every pixel with `rgba` (no blending).
    fn clear(&mut self, rgba: [u8; 4]);

    /// Draw the `src_rect` region of `src` scaled into `dst_rect`.
    fn draw_image(&mut self, src: &RgbaImage, src_rect: CropRect, dst_rect: CropRect)
    -> CropResult<()>;

    /// Draw all of `src` through `transform` (source pixels -> surface pixels).
    fn draw_image_transformed(&mut self, src: &RgbaImage, transform: Affine) -> CropResult<()>;

    /// Blend a filled rectangle.
    fn fill_rect(&mut self, rect: CropRect, rgba: [u8; 4]);

    /// Blend a one-pixel outline, dashed as `[on, off]` when `dash` is set.
    fn stroke_rect(&mut self, rect: CropRect, rgba: [u8; 4], dash: Option<[f64; 2]>);

    /// Blend a one-pixel line segment.
    fn draw_line(&mut self, line: Line, rgba: [u8; 4]);

    /// Draw a short text label with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, rgba: [u8; 4]);
}

/// A text label recorded by [`CpuSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Label text.
    pub text: String,
    /// Top-left corner.
    pub origin: Point,
}

enum DrawOp {
    Image {
        paint: vello_cpu::Image,
        transform: Affine,
        clip: CropRect,
    },
    Fill {
        rect: CropRect,
        rgba: [u8; 4],
    },
    Stroke {
        path: vello_cpu::kurbo::BezPath,
        rgba: [u8; 4],
        dash: Option<[f64; 2]>,
    },
}

/// CPU raster surface on a `vello_cpu` pixmap.
///
/// Draw calls are recorded and rasterized together by [`CpuSurface::finish`].
/// Text is not shaped; labels are drawn as a plate sized from the text length
/// and kept in [`CpuSurface::text_runs`].
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ops: Vec<DrawOp>,
    pixels: RgbaImage,
    dirty: bool,
    text_runs: Vec<TextRun>,
}

impl CpuSurface {
    /// Allocate a transparent surface. Zero or oversized dimensions are a
    /// [`CropError::Surface`].
    pub fn new(width: u32, height: u32) -> CropResult<Self> {
        if width == 0 || height == 0 {
            return Err(CropError::surface(format!(
                "cannot allocate {width}x{height} surface"
            )));
        }
        if u64::from(width) * u64::from(height) > MAX_SURFACE_PIXELS {
            return Err(CropError::surface(format!(
                "{width}x{height} surface exceeds the pixel budget"
            )));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| CropError::surface("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CropError::surface("surface height exceeds u16"))?;
        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            ops: Vec::new(),
            pixels: RgbaImage::new(width, height),
            dirty: false,
            text_runs: Vec::new(),
        })
    }

    /// Rasterize everything drawn since the last [`RenderSurface::clear`] and
    /// return the pixels (straight alpha).
    pub fn finish(&mut self) -> &RgbaImage {
        if self.dirty {
            let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
            for op in &self.ops {
                draw_op(&mut ctx, op);
            }
            ctx.flush();
            self.pixmap.data_as_u8_slice_mut().fill(0);
            ctx.render_to_pixmap(&mut self.pixmap);
            unpremultiply_into(self.pixmap.data_as_u8_slice(), &mut self.pixels);
            self.dirty = false;
        }
        &self.pixels
    }

    /// Rasterize and return the pixels.
    pub fn into_image(mut self) -> RgbaImage {
        self.finish();
        self.pixels
    }

    /// Labels drawn so far.
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
        self.dirty = true;
    }
}

impl RenderSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn clear(&mut self, rgba: [u8; 4]) {
        self.ops.clear();
        self.text_runs.clear();
        self.dirty = true;
        if rgba[3] > 0 {
            let (w, h) = self.size();
            self.push(DrawOp::Fill {
                rect: CropRect::new(0.0, 0.0, f64::from(w), f64::from(h)),
                rgba,
            });
        }
    }

    fn draw_image(
        &mut self,
        src: &RgbaImage,
        src_rect: CropRect,
        dst_rect: CropRect,
    ) -> CropResult<()> {
        if !(src_rect.is_finite() && dst_rect.is_finite())
            || src_rect.width <= 0.0
            || src_rect.height <= 0.0
            || dst_rect.width <= 0.0
            || dst_rect.height <= 0.0
        {
            return Ok(());
        }
        let transform = Affine::translate((dst_rect.x, dst_rect.y))
            * Affine::scale_non_uniform(
                dst_rect.width / src_rect.width,
                dst_rect.height / src_rect.height,
            )
            * Affine::translate((-src_rect.x, -src_rect.y));
        let paint = image_paint(src)?;
        self.push(DrawOp::Image {
            paint,
            transform,
            clip: src_rect,
        });
        Ok(())
    }

    fn draw_image_transformed(&mut self, src: &RgbaImage, transform: Affine) -> CropResult<()> {
        let det = transform.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Ok(());
        }
        let paint = image_paint(src)?;
        self.push(DrawOp::Image {
            paint,
            transform,
            clip: CropRect::new(0.0, 0.0, f64::from(src.width()), f64::from(src.height())),
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: CropRect, rgba: [u8; 4]) {
        if rect.is_finite() && rect.width > 0.0 && rect.height > 0.0 {
            self.push(DrawOp::Fill { rect, rgba });
        }
    }

    fn stroke_rect(&mut self, rect: CropRect, rgba: [u8; 4], dash: Option<[f64; 2]>) {
        if !rect.is_finite() {
            return;
        }
        // Inset by half the line width so the stroke covers whole pixels.
        let inset = HAIRLINE / 2.0;
        let (x0, y0) = (rect.x + inset, rect.y + inset);
        let (x1, y1) = (rect.right() - inset, rect.bottom() - inset);
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(vello_cpu::kurbo::Point::new(x0, y0));
        path.line_to(vello_cpu::kurbo::Point::new(x1, y0));
        path.line_to(vello_cpu::kurbo::Point::new(x1, y1));
        path.line_to(vello_cpu::kurbo::Point::new(x0, y1));
        path.close_path();
        self.push(DrawOp::Stroke { path, rgba, dash });
    }

    fn draw_line(&mut self, line: Line, rgba: [u8; 4]) {
        let (p0, p1) = (line.p0, line.p1);
        if !(p0.x.is_finite() && p0.y.is_finite() && p1.x.is_finite() && p1.y.is_finite()) {
            return;
        }
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(p0));
        path.line_to(point_to_cpu(p1));
        self.push(DrawOp::Stroke {
            path,
            rgba,
            dash: None,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, rgba: [u8; 4]) {
        let width = text.chars().count() as f64 * LABEL_GLYPH_ADVANCE + LABEL_PADDING * 2.0;
        self.fill_rect(
            CropRect::new(origin.x, origin.y, width, LABEL_HEIGHT),
            rgba,
        );
        self.text_runs.push(TextRun {
            text: text.to_string(),
            origin,
        });
    }
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::Image {
            paint,
            transform,
            clip,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(paint.clone());
            ctx.fill_rect(&rect_to_cpu(*clip));
        }
        DrawOp::Fill { rect, rgba } => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color(*rgba));
            ctx.fill_rect(&rect_to_cpu(*rect));
        }
        DrawOp::Stroke { path, rgba, dash } => {
            let mut stroke = vello_cpu::kurbo::Stroke::new(HAIRLINE);
            if let Some([on, off]) = dash.filter(|[on, off]| *on > 0.0 && *off > 0.0) {
                stroke = stroke.with_dashes(0.0, [on, off]);
            }
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color(*rgba));
            ctx.set_stroke(stroke);
            ctx.stroke_path(path);
        }
    }
}

fn color([r, g, b, a]: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: CropRect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x, r.y, r.right(), r.bottom())
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let af = (a as u16) + 1;
    let premul = |c: u8| -> u8 { (((c as u16) * af) >> 8) as u8 };
    [premul(r), premul(g), premul(b), a]
}

/// Wrap a straight-alpha bitmap as an image paint.
fn image_paint(src: &RgbaImage) -> CropResult<vello_cpu::Image> {
    let w: u16 = src
        .width()
        .try_into()
        .map_err(|_| CropError::surface("image width exceeds u16"))?;
    let h: u16 = src
        .height()
        .try_into()
        .map_err(|_| CropError::surface("image height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(src.width() as usize * src.height() as usize);
    for px in src.pixels() {
        let [r, g, b, a] = premul_rgba8(px[0], px[1], px[2], px[3]);
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn unpremultiply_into(premul: &[u8], out: &mut RgbaImage) {
    out.par_chunks_exact_mut(4)
        .zip(premul.par_chunks_exact(4))
        .for_each(|(dst, src)| {
            let a = u32::from(src[3]);
            if a == 0 {
                dst.copy_from_slice(&[0, 0, 0, 0]);
                return;
            }
            for c in 0..3 {
                dst[c] = ((u32::from(src[c]) * 255 + a / 2) / a).min(255) as u8;
            }
            dst[3] = src[3];
        });
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

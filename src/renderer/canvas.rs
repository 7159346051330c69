//! Canvas 2D drawing
//!
//! Textures are loaded from `assets/<key>.png`. Until an image has loaded,
//! or if it fails to, its placeholder shape is drawn instead.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::sprites::{Placeholder, Shape, Sprite, TEXTURE_KEYS, sprites};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::GameState;
use crate::ui::CalloutAnimation;

/// Loaded texture images, keyed by texture key
pub struct SpriteAtlas {
    images: HashMap<&'static str, HtmlImageElement>,
    /// Keys whose image failed to load
    failed: Rc<RefCell<HashSet<&'static str>>>,
}

impl SpriteAtlas {
    /// Start loading every texture; failures are logged and fall back
    pub fn load(base_path: &str) -> Self {
        let failed = Rc::new(RefCell::new(HashSet::new()));
        let mut images = HashMap::new();

        for key in TEXTURE_KEYS {
            let Ok(img) = HtmlImageElement::new() else {
                log::warn!("Could not create image element for {}", key);
                continue;
            };

            let failed_keys = failed.clone();
            let onerror = Closure::<dyn FnMut()>::new(move || {
                log::warn!("Texture {} failed to load, using placeholder", key);
                failed_keys.borrow_mut().insert(key);
            });
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            img.set_src(&format!("{}/{}.png", base_path, key));
            images.insert(key, img);
        }

        Self { images, failed }
    }

    /// Image ready to draw, if any
    fn image(&self, key: &str) -> Option<&HtmlImageElement> {
        if self.failed.borrow().contains(key) {
            return None;
        }
        self.images
            .get(key)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

/// Canvas renderer state
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    atlas: SpriteAtlas,
    /// Device pixels per playfield unit
    scale: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, atlas: SpriteAtlas) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut renderer = Self {
            canvas,
            ctx,
            atlas,
            scale: 1.0,
        };
        renderer.resize();
        Ok(renderer)
    }

    /// Match the backing store to the element size and device pixel ratio
    pub fn resize(&mut self) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = self.canvas.client_width().max(1) as f64;
        let width = (client_w * dpr) as u32;
        self.scale = width as f64 / SCREEN_WIDTH as f64;
        let height = (SCREEN_HEIGHT as f64 * self.scale) as u32;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        log::debug!("Canvas resized to {}x{} (scale {:.2})", width, height, self.scale);
    }

    /// Convert a client-space x coordinate into playfield units
    pub fn client_to_playfield_x(&self, client_x: f64) -> f32 {
        let rect = self.canvas.get_bounding_client_rect();
        let w = rect.width().max(1.0);
        ((client_x - rect.left()) / w * SCREEN_WIDTH as f64) as f32
    }

    /// Draw one frame
    pub fn render(&self, state: &GameState, callout: Option<&CalloutAnimation>, now_ms: f64) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0);

        // Background
        ctx.set_fill_style_str("#1a1a2e");
        ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
        if state.ledger.power_ups.slow_motion {
            ctx.set_fill_style_str("rgba(120, 0, 160, 0.12)");
            ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
        }

        for sprite in sprites(state) {
            self.draw_sprite(&sprite);
        }

        if let Some(anim) = callout {
            self.draw_callout(anim, now_ms);
        }

        ctx.restore();
    }

    fn draw_sprite(&self, sprite: &Sprite) {
        let ctx = &self.ctx;
        let x = (sprite.center.x - sprite.size.x / 2.0) as f64;
        let y = (sprite.center.y - sprite.size.y / 2.0) as f64;
        let w = sprite.size.x as f64;
        let h = sprite.size.y as f64;

        ctx.set_global_alpha(sprite.alpha as f64);
        match self.atlas.image(sprite.key) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
            }
            None => self.draw_placeholder(&Placeholder::for_key(sprite.key), x, y, w, h),
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_placeholder(&self, art: &Placeholder, x: f64, y: f64, w: f64, h: f64) {
        let ctx = &self.ctx;
        let (cx, cy) = (x + w / 2.0, y + h / 2.0);

        ctx.begin_path();
        match art.shape {
            Shape::Rect => ctx.rect(x, y, w, h),
            Shape::RoundRect { radius } => {
                let r = radius as f64;
                ctx.move_to(x + r, y);
                let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
                let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
                let _ = ctx.arc_to(x, y + h, x, y, r);
                let _ = ctx.arc_to(x, y, x + w, y, r);
                ctx.close_path();
            }
            Shape::Circle => {
                let _ = ctx.arc(cx, cy, w.min(h) / 2.0, 0.0, TAU);
            }
            Shape::Ellipse { rx, ry } => {
                let _ = ctx.ellipse(cx, cy, rx as f64, ry as f64, 0.0, 0.0, TAU);
            }
        }
        ctx.set_fill_style_str(art.fill);
        ctx.fill();

        if let Some((color, width)) = art.stroke {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(width as f64);
            ctx.stroke();
        }

        if let Some(glyph) = art.glyph {
            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("20px serif");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let _ = ctx.fill_text(glyph, cx, cy);
        }
    }

    fn draw_callout(&self, anim: &CalloutAnimation, now_ms: f64) {
        let Some(frame) = anim.sample(now_ms, SCREEN_HEIGHT) else {
            return;
        };
        let ctx = &self.ctx;
        let callout = &anim.callout;
        let cx = SCREEN_WIDTH as f64 / 2.0;
        let size = callout.font_px as f64 * frame.scale as f64;

        ctx.save();
        ctx.set_global_alpha(frame.alpha as f64);
        ctx.set_font(&format!("bold {:.0}px sans-serif", size));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_line_width(6.0);
        ctx.set_stroke_style_str("#000000");
        ctx.set_fill_style_str(callout.color);

        let lines = [(callout.text.as_str(), 0.0), (callout.points.as_str(), size)];
        for (text, offset) in lines {
            let y = frame.y as f64 + offset;
            let _ = ctx.stroke_text(text, cx, y);
            let _ = ctx.fill_text(text, cx, y);
        }
        ctx.restore();
    }
}

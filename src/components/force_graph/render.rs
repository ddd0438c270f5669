use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ViewTransform;
use super::surface::{LabelStyle, LinkStyle, NodeStyle, Point, RenderSurface};

const BACKGROUND: &str = "#ffffff";
const BORDER: &str = "#000000";

/// Draws onto a 2D canvas context. Graph coordinates go through the view transform.
pub struct CanvasSurface<'a> {
	ctx: &'a CanvasRenderingContext2d,
	width: f64,
	height: f64,
	transform: ViewTransform,
}

impl<'a> CanvasSurface<'a> {
	/// Surface of `width` x `height` pixels drawn with `transform`.
	pub fn new(
		ctx: &'a CanvasRenderingContext2d,
		width: f64,
		height: f64,
		transform: ViewTransform,
	) -> Self {
		Self {
			ctx,
			width,
			height,
			transform,
		}
	}

	fn to_screen(&self, p: Point) -> (f64, f64) {
		(
			p.x * self.transform.k + self.transform.x,
			p.y * self.transform.k + self.transform.y,
		)
	}
}

impl RenderSurface for CanvasSurface<'_> {
	fn clear(&mut self) {
		self.ctx.set_global_alpha(1.0);
		self.ctx.set_fill_style_str(BACKGROUND);
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
		self.ctx.set_stroke_style_str(BORDER);
		self.ctx.set_line_width(1.0);
		self.ctx.stroke_rect(0.5, 0.5, self.width - 1.0, self.height - 1.0);
	}

	fn draw_link(&mut self, from: Point, to: Point, style: LinkStyle) {
		let (x1, y1) = self.to_screen(from);
		let (x2, y2) = self.to_screen(to);
		self.ctx.set_global_alpha(style.opacity);
		self.ctx.set_stroke_style_str(style.color);
		self.ctx.set_line_width(style.width * self.transform.k);
		self.ctx.begin_path();
		self.ctx.move_to(x1, y1);
		self.ctx.line_to(x2, y2);
		self.ctx.stroke();
		self.ctx.set_global_alpha(1.0);
	}

	fn draw_node(&mut self, at: Point, style: NodeStyle) {
		let (x, y) = self.to_screen(at);
		let k = self.transform.k;
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, style.radius * k, 0.0, 2.0 * PI);
		self.ctx.set_fill_style_str(style.fill);
		self.ctx.fill();
		self.ctx.set_stroke_style_str(style.stroke);
		self.ctx.set_line_width(style.stroke_width * k);
		self.ctx.stroke();
	}

	fn draw_label(&mut self, at: Point, text: &str, style: LabelStyle) {
		let (x, y) = self.to_screen(at);
		let weight = if style.bold { "bold " } else { "" };
		self.ctx.set_font(&format!(
			"{}{}px sans-serif",
			weight,
			style.size * self.transform.k.max(0.5)
		));
		self.ctx.set_text_align("center");
		self.ctx.set_fill_style_str(style.color);
		let _ = self.ctx.fill_text(text, x, y);
	}
}

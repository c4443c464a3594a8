//! Display-list drawing: translate placed shapes into printpdf page ops.
//!
//! ## Coordinate systems
//!
//! SWF stage coordinates are twips (1/20 pt) with the origin at the top-left
//! and y growing downwards. PDF puts the origin at the bottom-left with y
//! growing upwards. [`PageCanvas`] owns the conversion: placement matrices
//! are applied in twips space, then each point is divided by 20 and flipped
//! against the page height. One logical pixel maps to one PDF point (72 dpi,
//! no scaling).

use crate::pipeline::shape::{chain_rings, Segment, ShapePaths, Vec2};
use printpdf::*;
use swf_types as swf;
use tracing::debug;

/// Twips per PDF point.
pub const TWIPS_PER_PT: f32 = 20.0;

const PT_TO_MM: f32 = 0.352778; // pt → mm

/// Stroke width used for SWF hairlines (width 0).
const HAIRLINE_PT: f32 = 0.25;

/// Segments per flattened quadratic Bézier edge.
const CURVE_STEPS: u32 = 16;

pub fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * PT_TO_MM)
}

/// Affine placement matrix in twips space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(tx: f32, ty: f32) -> Transform {
        Transform {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    pub fn from_swf(m: &swf::Matrix) -> Transform {
        Transform {
            a: sfixed16p16_to_f32(&m.scale_x),
            b: sfixed16p16_to_f32(&m.rotate_skew0),
            c: sfixed16p16_to_f32(&m.rotate_skew1),
            d: sfixed16p16_to_f32(&m.scale_y),
            tx: m.translate_x as f32,
            ty: m.translate_y as f32,
        }
    }

    /// Compose: apply `inner` first, then `self`.
    pub fn then(&self, inner: &Transform) -> Transform {
        Transform {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            tx: self.a * inner.tx + self.c * inner.ty + self.tx,
            ty: self.b * inner.tx + self.d * inner.ty + self.ty,
        }
    }

    pub fn apply(&self, p: Vec2) -> (f32, f32) {
        let (x, y) = (p.x as f32, p.y as f32);
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }
}

// swf-fixed keeps its epsilon counts behind a private field; copy the raw
// bits out. Sfixed16P16 is a plain i32 wrapper.
fn sfixed16p16_to_f32(x: &swf_fixed::Sfixed16P16) -> f32 {
    let epsilons: i32 = unsafe { std::mem::transmute_copy(x) };
    epsilons as f32 / 65536.0
}

/// One PDF page under construction, sized in points.
pub struct PageCanvas {
    width_pt: f32,
    height_pt: f32,
    ops: Vec<Op>,
}

impl PageCanvas {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        PageCanvas {
            width_pt,
            height_pt,
            ops: Vec::new(),
        }
    }

    fn point(&self, x_twips: f32, y_twips: f32) -> LinePoint {
        LinePoint {
            p: Point {
                x: Pt(x_twips / TWIPS_PER_PT),
                y: Pt(self.height_pt - y_twips / TWIPS_PER_PT),
            },
            bezier: false,
        }
    }

    /// Fill the whole page with the stage background colour.
    pub fn fill_background(&mut self, (r, g, b): (f32, f32, f32)) {
        let corners = [
            (0.0, 0.0),
            (self.width_pt, 0.0),
            (self.width_pt, self.height_pt),
            (0.0, self.height_pt),
        ];
        let points = corners
            .iter()
            .map(|&(x, y)| LinePoint {
                p: Point { x: Pt(x), y: Pt(y) },
                bezier: false,
            })
            .collect();

        self.ops.push(set_fill(r, g, b));
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    /// Draw one shape's fills and strokes under a placement transform.
    pub fn draw_shape(&mut self, paths: &ShapePaths<'_>, transform: &Transform) {
        for fill in &paths.fills {
            if fill.segments.is_empty() {
                continue;
            }
            let Some((r, g, b)) = fill_color(fill.style) else {
                continue;
            };
            let rings: Vec<PolygonRing> = chain_rings(&fill.segments)
                .iter()
                .map(|ring| PolygonRing {
                    points: self.ring_points(ring, transform),
                })
                .filter(|ring| ring.points.len() >= 3)
                .collect();
            if rings.is_empty() {
                continue;
            }

            self.ops.push(set_fill(r, g, b));
            self.ops.push(Op::DrawPolygon {
                polygon: Polygon {
                    rings,
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                },
            });
        }

        for stroke in &paths.strokes {
            if stroke.segments.is_empty() {
                continue;
            }
            let Some((r, g, b)) = fill_color(&stroke.style.fill) else {
                continue;
            };
            let width_pt = match stroke.style.width {
                0 => HAIRLINE_PT,
                w => w as f32 / TWIPS_PER_PT,
            };

            self.ops.push(Op::SetOutlineColor {
                col: Color::Rgb(Rgb {
                    r,
                    g,
                    b,
                    icc_profile: None,
                }),
            });
            self.ops.push(Op::SetOutlineThickness { pt: Pt(width_pt) });

            for ring in chain_rings(&stroke.segments) {
                let is_closed = ring
                    .first()
                    .zip(ring.last())
                    .is_some_and(|(first, last)| first.from == last.to);
                let points = self.ring_points(&ring, transform);
                if points.len() < 2 {
                    continue;
                }
                self.ops.push(Op::DrawLine {
                    line: Line { points, is_closed },
                });
            }
        }
    }

    fn ring_points(&self, ring: &[Segment], transform: &Transform) -> Vec<LinePoint> {
        let mut points = Vec::new();
        let Some(first) = ring.first() else {
            return points;
        };
        let (x, y) = transform.apply(first.from);
        points.push(self.point(x, y));

        for segment in ring {
            match segment.control {
                None => {
                    let (x, y) = transform.apply(segment.to);
                    points.push(self.point(x, y));
                }
                Some(control) => {
                    let (x0, y0) = transform.apply(segment.from);
                    let (cx, cy) = transform.apply(control);
                    let (x1, y1) = transform.apply(segment.to);
                    for step in 1..=CURVE_STEPS {
                        let t = step as f32 / CURVE_STEPS as f32;
                        let u = 1.0 - t;
                        let x = u * u * x0 + 2.0 * u * t * cx + t * t * x1;
                        let y = u * u * y0 + 2.0 * u * t * cy + t * t * y1;
                        points.push(self.point(x, y));
                    }
                }
            }
        }

        points
    }

    pub fn into_page(self) -> PdfPage {
        PdfPage::new(pt_to_mm(self.width_pt), pt_to_mm(self.height_pt), self.ops)
    }
}

/// An empty page, for the `Blank` error policy.
pub fn blank_page(width_pt: f32, height_pt: f32) -> PdfPage {
    PdfPage::new(pt_to_mm(width_pt), pt_to_mm(height_pt), Vec::new())
}

/// Serialise the accumulated pages into PDF bytes.
pub fn serialize_document(title: &str, pages: Vec<PdfPage>) -> Vec<u8> {
    let mut doc = PdfDocument::new(title);
    doc.with_pages(pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

fn set_fill(r: f32, g: f32, b: f32) -> Op {
    Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r,
            g,
            b,
            icc_profile: None,
        }),
    }
}

/// Flatten a fill style to one RGB colour.
///
/// Gradients collapse to their first stop; bitmap and pattern fills have no
/// pixel data to sample at this stage and fall back to neutral grey. Fully
/// transparent solids return `None` and are not drawn.
fn fill_color(style: &swf::FillStyle) -> Option<(f32, f32, f32)> {
    match style {
        swf::FillStyle::Solid(solid) => {
            if solid.color.a == 0 {
                return None;
            }
            Some(rgb8(solid.color.r, solid.color.g, solid.color.b))
        }
        swf::FillStyle::LinearGradient(g) => first_stop(&g.gradient),
        swf::FillStyle::RadialGradient(g) => first_stop(&g.gradient),
        swf::FillStyle::FocalGradient(g) => first_stop(&g.gradient),
        other => {
            debug!("unsupported fill style {:?}, using grey", other);
            Some((0.5, 0.5, 0.5))
        }
    }
}

fn first_stop(gradient: &swf::Gradient) -> Option<(f32, f32, f32)> {
    gradient
        .colors
        .first()
        .map(|stop| rgb8(stop.color.r, stop.color.g, stop.color.b))
}

fn rgb8(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    (
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_a_noop() {
        let p = Vec2 { x: 100, y: -40 };
        assert_eq!(Transform::IDENTITY.apply(p), (100.0, -40.0));
    }

    #[test]
    fn translation_offsets_points() {
        let t = Transform::translation(20.0, -10.0);
        assert_eq!(t.apply(Vec2 { x: 1, y: 2 }), (21.0, -8.0));
    }

    #[test]
    fn composition_applies_inner_first() {
        let outer = Transform::translation(100.0, 0.0);
        let scale = Transform {
            a: 2.0,
            ..Transform::IDENTITY
        };
        let composed = outer.then(&scale);
        // Scale happens in the inner frame, then the translation.
        assert_eq!(composed.apply(Vec2 { x: 10, y: 5 }), (120.0, 5.0));
    }

    #[test]
    fn page_point_flips_y() {
        let canvas = PageCanvas::new(550.0, 400.0);
        let top_left = canvas.point(0.0, 0.0);
        assert_eq!(top_left.p.y, Pt(400.0));
        let bottom = canvas.point(0.0, 400.0 * TWIPS_PER_PT);
        assert_eq!(bottom.p.y, Pt(0.0));
    }

    #[test]
    fn background_emits_colour_and_polygon() {
        let mut canvas = PageCanvas::new(100.0, 100.0);
        canvas.fill_background((1.0, 1.0, 1.0));
        assert_eq!(canvas.ops.len(), 2);
        assert!(matches!(canvas.ops[1], Op::DrawPolygon { .. }));
    }

    #[test]
    fn transparent_solid_fill_is_not_drawn() {
        let style = swf::FillStyle::Solid(swf::fill_styles::Solid {
            color: swf::StraightSRgba8 {
                r: 10,
                g: 20,
                b: 30,
                a: 0,
            },
        });
        assert_eq!(fill_color(&style), None);
    }

    #[test]
    fn solid_fill_scales_to_unit_rgb() {
        let style = swf::FillStyle::Solid(swf::fill_styles::Solid {
            color: swf::StraightSRgba8 {
                r: 255,
                g: 0,
                b: 51,
                a: 255,
            },
        });
        let (r, g, b) = fill_color(&style).unwrap();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn curved_segment_is_flattened() {
        let canvas = PageCanvas::new(100.0, 100.0);
        let ring = [Segment {
            from: Vec2 { x: 0, y: 0 },
            control: Some(Vec2 { x: 1000, y: 0 }),
            to: Vec2 { x: 1000, y: 1000 },
        }];
        let points = canvas.ring_points(&ring, &Transform::IDENTITY);
        // start point + CURVE_STEPS interpolated points
        assert_eq!(points.len(), 1 + CURVE_STEPS as usize);
        assert!(points.iter().all(|p| !p.bezier));
    }
}

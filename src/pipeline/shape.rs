//! Translation of SWF shape records into per-style outline paths.
//!
//! A SWF shape is a flat list of edges annotated with up to three style
//! slots: fill0 (left of the edge), fill1 (right of the edge), and a line
//! style. Edges belonging to one visual outline can be scattered across the
//! record list, and fill0 edges run against the winding direction, so the
//! translation collects edges per style, flips fill0 edges, and later chains
//! the collected segments into closed rings for the PDF polygon operator.

use std::collections::HashMap;
use std::ops::Add;
use swf_types as swf;

/// A point in twips (1/20 pt), stage coordinate space (y grows downwards).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    fn from_swf(v: &swf::Vector2D) -> Self {
        Vec2 { x: v.x, y: v.y }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// One straight or quadratic-Bézier edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: Vec2,
    pub control: Option<Vec2>,
    pub to: Vec2,
}

impl Segment {
    fn reversed(self) -> Self {
        Segment {
            from: self.to,
            control: self.control,
            to: self.from,
        }
    }

    fn offset(self, base: Vec2) -> Self {
        Segment {
            from: base + self.from,
            control: self.control.map(|c| base + c),
            to: base + self.to,
        }
    }
}

/// All edges collected for one style slot.
#[derive(Clone, Debug)]
pub struct StyledOutline<S> {
    pub style: S,
    pub segments: Vec<Segment>,
}

impl<S> StyledOutline<S> {
    fn new(style: S) -> Self {
        StyledOutline {
            style,
            segments: Vec::new(),
        }
    }
}

/// A shape decomposed into fill outlines and stroke outlines.
#[derive(Clone, Debug)]
pub struct ShapePaths<'a> {
    pub fills: Vec<StyledOutline<&'a swf::FillStyle>>,
    pub strokes: Vec<StyledOutline<&'a swf::LineStyle>>,
}

// Style indices in the record stream are 1-based and relative to the most
// recent style-list extension; 0 means "no style".
#[derive(Copy, Clone, Default)]
struct StyleSlot {
    base: usize,
    current: Option<usize>,
}

impl StyleSlot {
    fn select(&mut self, index: usize) {
        self.current = index.checked_sub(1).map(|i| i + self.base);
    }
}

#[derive(Copy, Clone, Default)]
struct ActiveStyles {
    fill0: StyleSlot,
    fill1: StyleSlot,
    stroke: StyleSlot,
}

impl<'a> ShapePaths<'a> {
    pub fn from_shape(shape: &'a swf::Shape) -> Self {
        let mut paths = ShapePaths {
            fills: shape
                .initial_styles
                .fill
                .iter()
                .map(StyledOutline::new)
                .collect(),
            strokes: shape
                .initial_styles
                .line
                .iter()
                .map(StyledOutline::new)
                .collect(),
        };

        let mut pos = Vec2::default();
        let mut styles = ActiveStyles::default();
        let mut run: Vec<Segment> = Vec::new();

        for record in &shape.records {
            match record {
                swf::ShapeRecord::StyleChange(change) => {
                    // A pure move stays within the current run; any style
                    // switch flushes it.
                    let style_switch = change.left_fill.is_some()
                        || change.right_fill.is_some()
                        || change.line_style.is_some()
                        || change.new_styles.is_some();
                    if style_switch {
                        paths.flush(&run, styles);
                        run.clear();
                    }

                    // New style lists first, so the selections below can
                    // refer to them.
                    if let Some(new_styles) = &change.new_styles {
                        styles.fill0.base = paths.fills.len();
                        styles.fill1.base = paths.fills.len();
                        paths
                            .fills
                            .extend(new_styles.fill.iter().map(StyledOutline::new));
                        styles.stroke.base = paths.strokes.len();
                        paths
                            .strokes
                            .extend(new_styles.line.iter().map(StyledOutline::new));
                    }

                    if let Some(move_to) = &change.move_to {
                        pos = Vec2::from_swf(move_to);
                    }
                    if let Some(left_fill) = change.left_fill {
                        styles.fill0.select(left_fill);
                    }
                    if let Some(right_fill) = change.right_fill {
                        styles.fill1.select(right_fill);
                    }
                    if let Some(line_style) = change.line_style {
                        styles.stroke.select(line_style);
                    }
                }
                swf::ShapeRecord::Edge(edge) => {
                    // Both deltas are relative to the record's start point.
                    let segment = Segment {
                        from: Vec2::default(),
                        control: edge.control_delta.as_ref().map(Vec2::from_swf),
                        to: Vec2::from_swf(&edge.delta),
                    }
                    .offset(pos);
                    pos = segment.to;
                    run.push(segment);
                }
            }
        }

        paths.flush(&run, styles);
        paths
    }

    fn flush(&mut self, run: &[Segment], styles: ActiveStyles) {
        if run.is_empty() {
            return;
        }
        if let Some(fill0) = styles.fill0.current {
            // Left-fill edges wind backwards; flip them so every ring of a
            // style shares one winding direction.
            self.fills[fill0]
                .segments
                .extend(run.iter().rev().map(|s| s.reversed()));
        }
        if let Some(fill1) = styles.fill1.current {
            self.fills[fill1].segments.extend(run);
        }
        if let Some(stroke) = styles.stroke.current {
            self.strokes[stroke].segments.extend(run);
        }
    }
}

/// Chain loose segments into maximal connected runs.
///
/// Each returned ring starts at an arbitrary segment and follows matching
/// endpoints for as long as an unused continuation exists. Closed outlines
/// come back as one ring; open stroke polylines come back as-is.
pub fn chain_rings(segments: &[Segment]) -> Vec<Vec<Segment>> {
    let mut by_start: HashMap<Vec2, Vec<usize>> = HashMap::new();
    for (i, segment) in segments.iter().enumerate() {
        by_start.entry(segment.from).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        let mut ring = Vec::new();
        let mut i = start;
        loop {
            used[i] = true;
            let segment = segments[i];
            ring.push(segment);

            let next = by_start
                .get(&segment.to)
                .into_iter()
                .flatten()
                .copied()
                .find(|&j| !used[j]);
            match next {
                Some(j) => i = j,
                None => break,
            }
        }
        rings.push(ring);
    }

    rings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> swf::FillStyle {
        swf::FillStyle::Solid(swf::fill_styles::Solid {
            color: swf::StraightSRgba8 { r, g, b, a: 255 },
        })
    }

    fn style_change(
        move_to: Option<(i32, i32)>,
        left_fill: Option<usize>,
        right_fill: Option<usize>,
    ) -> swf::ShapeRecord {
        swf::ShapeRecord::StyleChange(swf::shape_records::StyleChange {
            move_to: move_to.map(|(x, y)| swf::Vector2D { x, y }),
            left_fill,
            right_fill,
            line_style: None,
            new_styles: None,
        })
    }

    fn edge(dx: i32, dy: i32) -> swf::ShapeRecord {
        swf::ShapeRecord::Edge(swf::shape_records::Edge {
            delta: swf::Vector2D { x: dx, y: dy },
            control_delta: None,
        })
    }

    fn square_shape() -> swf::Shape {
        swf::Shape {
            initial_styles: swf::ShapeStyles {
                fill: vec![solid(255, 0, 0)],
                line: vec![],
            },
            records: vec![
                style_change(Some((0, 0)), None, Some(1)),
                edge(2000, 0),
                edge(0, 2000),
                edge(-2000, 0),
                edge(0, -2000),
            ],
        }
    }

    #[test]
    fn square_collects_four_segments_on_right_fill() {
        let shape = square_shape();
        let paths = ShapePaths::from_shape(&shape);

        assert_eq!(paths.fills.len(), 1);
        assert_eq!(paths.strokes.len(), 0);
        assert_eq!(paths.fills[0].segments.len(), 4);

        let first = paths.fills[0].segments[0];
        assert_eq!(first.from, Vec2 { x: 0, y: 0 });
        assert_eq!(first.to, Vec2 { x: 2000, y: 0 });
    }

    #[test]
    fn left_fill_edges_are_reversed() {
        let shape = swf::Shape {
            initial_styles: swf::ShapeStyles {
                fill: vec![solid(0, 255, 0)],
                line: vec![],
            },
            records: vec![style_change(Some((100, 100)), Some(1), None), edge(500, 0)],
        };
        let paths = ShapePaths::from_shape(&shape);

        let segment = paths.fills[0].segments[0];
        assert_eq!(segment.from, Vec2 { x: 600, y: 100 });
        assert_eq!(segment.to, Vec2 { x: 100, y: 100 });
    }

    #[test]
    fn style_index_zero_deselects_a_slot() {
        let shape = swf::Shape {
            initial_styles: swf::ShapeStyles {
                fill: vec![solid(0, 0, 255)],
                line: vec![],
            },
            records: vec![
                style_change(Some((0, 0)), None, Some(1)),
                edge(100, 0),
                style_change(None, None, Some(0)),
                edge(100, 0),
            ],
        };
        let paths = ShapePaths::from_shape(&shape);

        // Only the first edge lands in the fill; the second has no slot.
        assert_eq!(paths.fills[0].segments.len(), 1);
    }

    #[test]
    fn quadratic_edge_resolves_control_and_anchor() {
        let shape = swf::Shape {
            initial_styles: swf::ShapeStyles {
                fill: vec![solid(1, 2, 3)],
                line: vec![],
            },
            records: vec![
                style_change(Some((0, 0)), None, Some(1)),
                swf::ShapeRecord::Edge(swf::shape_records::Edge {
                    delta: swf::Vector2D { x: 100, y: 100 },
                    control_delta: Some(swf::Vector2D { x: 100, y: 0 }),
                }),
            ],
        };
        let paths = ShapePaths::from_shape(&shape);

        let segment = paths.fills[0].segments[0];
        assert_eq!(segment.control, Some(Vec2 { x: 100, y: 0 }));
        assert_eq!(segment.to, Vec2 { x: 100, y: 100 });
    }

    #[test]
    fn chain_rings_closes_a_square() {
        let shape = square_shape();
        let paths = ShapePaths::from_shape(&shape);
        let rings = chain_rings(&paths.fills[0].segments);

        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0][0].from, rings[0][3].to);
    }

    #[test]
    fn chain_rings_separates_disjoint_outlines() {
        let a = Segment {
            from: Vec2 { x: 0, y: 0 },
            control: None,
            to: Vec2 { x: 10, y: 0 },
        };
        let b = Segment {
            from: Vec2 { x: 10, y: 0 },
            control: None,
            to: Vec2 { x: 0, y: 0 },
        };
        let far = Segment {
            from: Vec2 { x: 100, y: 100 },
            control: None,
            to: Vec2 { x: 200, y: 100 },
        };

        let rings = chain_rings(&[a, far, b]);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings.iter().map(|r| r.len()).sum::<usize>(), 3);
    }
}

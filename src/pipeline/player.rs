//! SWF loading and first-frame evaluation.
//!
//! ## What "initialise" means here
//!
//! The original player model loads a movie, advances it zero milliseconds to
//! force header and dictionary parsing, and then renders whatever the stage
//! shows. [`Player::open`] does the equivalent eagerly: read the file, check
//! the signature, decode every tag with `swf-parser`. Nothing past the first
//! `ShowFrame` is ever evaluated — timeline actions, sounds, and later
//! frames are out of scope by design.

use crate::error::PageError;
use crate::pipeline::draw::{PageCanvas, Transform, TWIPS_PER_PT};
use crate::pipeline::input::FileUrl;
use crate::pipeline::shape::ShapePaths;
use printpdf::PdfPage;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use swf_types as swf;
use tracing::debug;

/// Accepted file signatures: uncompressed, zlib-compressed, LZMA-compressed.
const SWF_SIGNATURES: [&[u8; 3]; 3] = [b"FWS", b"CWS", b"ZWS"];

/// Stage colour before any `SetBackgroundColor` tag takes effect.
const DEFAULT_BACKGROUND: (f32, f32, f32) = (1.0, 1.0, 1.0);

/// Sprite nesting ceiling; malformed movies with cyclic sprite chains stop
/// descending here instead of recursing forever.
const MAX_SPRITE_DEPTH: u32 = 8;

/// A loaded, fully parsed movie. Created fresh per input and dropped right
/// after its page is committed.
#[derive(Debug)]
pub struct Player {
    movie: swf::Movie,
    path: PathBuf,
}

impl Player {
    /// Load and decode the movie behind a resolved `file://` URL.
    pub fn open(url: &FileUrl) -> Result<Player, PageError> {
        let path = url.path().to_path_buf();

        let data = std::fs::read(&path).map_err(|e| PageError::LoadFailed {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        if data.len() < 8 {
            return Err(PageError::LoadFailed {
                path,
                detail: format!("file too short ({} bytes)", data.len()),
            });
        }
        let signature = &data[..3];
        if !SWF_SIGNATURES.iter().any(|m| signature == &m[..]) {
            let mut magic = [0u8; 3];
            magic.copy_from_slice(signature);
            return Err(PageError::NotASwf { path, magic });
        }

        let movie = swf_parser::parse_swf(&data).map_err(|e| PageError::LoadFailed {
            path: path.clone(),
            detail: format!("{e:?}"),
        })?;

        debug!(
            "loaded {}: swf v{}, {} tags",
            path.display(),
            movie.header.swf_version,
            movie.tags.len()
        );
        Ok(Player { movie, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage size in points. One logical pixel is one point (72 dpi).
    pub fn dimensions(&self) -> (f32, f32) {
        let r = &self.movie.header.frame_size;
        (
            (r.x_max - r.x_min) as f32 / TWIPS_PER_PT,
            (r.y_max - r.y_min) as f32 / TWIPS_PER_PT,
        )
    }

    pub fn frame_count(&self) -> usize {
        self.movie.header.frame_count as usize
    }

    pub fn frame_rate(&self) -> f32 {
        ufixed8p8_to_f32(&self.movie.header.frame_rate)
    }

    pub fn swf_version(&self) -> u8 {
        self.movie.header.swf_version
    }

    /// Stage background colour, from the first `SetBackgroundColor` tag.
    pub fn background(&self) -> (f32, f32, f32) {
        for tag in &self.movie.tags {
            if let swf::Tag::SetBackgroundColor(set_bg) = tag {
                let c = &set_bg.color;
                return (
                    f32::from(c.r) / 255.0,
                    f32::from(c.g) / 255.0,
                    f32::from(c.b) / 255.0,
                );
            }
        }
        DEFAULT_BACKGROUND
    }

    /// Render the movie's current (first) frame onto a fresh PDF page of the
    /// stage's intrinsic size.
    pub fn render_first_frame(&self) -> PdfPage {
        let (width_pt, height_pt) = self.dimensions();
        let mut canvas = PageCanvas::new(width_pt, height_pt);
        canvas.fill_background(self.background());

        let dictionary = build_dictionary(&self.movie.tags);
        let r = &self.movie.header.frame_size;
        let root = Transform::translation(-(r.x_min as f32), -(r.y_min as f32));
        draw_frame(&mut canvas, &dictionary, &self.movie.tags, &root, 0);

        canvas.into_page()
    }
}

// swf-fixed keeps its epsilon counts behind a private field; copy the raw
// bits out. Ufixed8P8 is a plain u16 wrapper.
fn ufixed8p8_to_f32(x: &swf_fixed::Ufixed8P8) -> f32 {
    let epsilons: u16 = unsafe { std::mem::transmute_copy(x) };
    f32::from(epsilons) / 256.0
}

/// Renderable characters defined on the main timeline.
enum Character<'a> {
    Shape(ShapePaths<'a>),
    Sprite(&'a [swf::Tag]),
}

/// One object on the stage at the first frame.
#[derive(Copy, Clone)]
struct Placement {
    character: u16,
    transform: Transform,
}

fn build_dictionary(tags: &[swf::Tag]) -> HashMap<u16, Character<'_>> {
    let mut dictionary = HashMap::new();
    for tag in tags {
        match tag {
            swf::Tag::DefineShape(def) => {
                dictionary.insert(def.id, Character::Shape(ShapePaths::from_shape(&def.shape)));
            }
            swf::Tag::DefineSprite(def) => {
                dictionary.insert(def.id, Character::Sprite(&def.tags));
            }
            // Text, bitmaps, morph shapes, buttons, video: not renderable
            // without a full engine; their placements are skipped below.
            _ => {}
        }
    }
    dictionary
}

/// Depth-ordered display list after processing tags up to the first
/// `ShowFrame`.
fn first_frame(tags: &[swf::Tag]) -> BTreeMap<u16, Placement> {
    let mut placements = BTreeMap::new();
    for tag in tags {
        match tag {
            swf::Tag::PlaceObject(place) => place_object(&mut placements, place),
            swf::Tag::RemoveObject(remove) => {
                placements.remove(&remove.depth);
            }
            swf::Tag::ShowFrame => break,
            _ => {}
        }
    }
    placements
}

fn place_object(placements: &mut BTreeMap<u16, Placement>, place: &swf::tags::PlaceObject) {
    let existing = placements.get(&place.depth).copied();

    let character = match (place.character_id, existing) {
        (Some(id), _) => id,
        (None, Some(p)) => p.character,
        (None, None) => {
            debug!("PlaceObject at depth {} names no character", place.depth);
            return;
        }
    };

    // A modify without a matrix keeps the previous placement's matrix.
    let transform = match &place.matrix {
        Some(matrix) => Transform::from_swf(matrix),
        None => existing
            .map(|p| p.transform)
            .unwrap_or(Transform::IDENTITY),
    };

    placements.insert(
        place.depth,
        Placement {
            character,
            transform,
        },
    );
}

fn draw_frame(
    canvas: &mut PageCanvas,
    dictionary: &HashMap<u16, Character<'_>>,
    tags: &[swf::Tag],
    transform: &Transform,
    sprite_depth: u32,
) {
    for (depth, placement) in first_frame(tags) {
        let composed = transform.then(&placement.transform);
        match dictionary.get(&placement.character) {
            Some(Character::Shape(paths)) => canvas.draw_shape(paths, &composed),
            Some(Character::Sprite(sprite_tags)) => {
                if sprite_depth >= MAX_SPRITE_DEPTH {
                    debug!(
                        "sprite nesting exceeds {} at depth {}, not descending",
                        MAX_SPRITE_DEPTH, depth
                    );
                    continue;
                }
                draw_frame(canvas, dictionary, sprite_tags, &composed, sprite_depth + 1);
            }
            None => debug!(
                "no renderable dictionary entry for character {} at depth {}",
                placement.character, depth
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_for(bytes: &[u8]) -> (tempfile::TempDir, FileUrl) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.swf");
        std::fs::write(&path, bytes).unwrap();
        let url = FileUrl::resolve(&path).unwrap();
        (dir, url)
    }

    #[test]
    fn open_rejects_foreign_signatures() {
        let (_dir, url) = url_for(b"GIF89a-not-a-movie");
        let err = Player::open(&url).unwrap_err();
        match err {
            PageError::NotASwf { magic, .. } => assert_eq!(&magic, b"GIF"),
            other => panic!("expected NotASwf, got {other:?}"),
        }
    }

    #[test]
    fn open_rejects_truncated_files() {
        let (_dir, url) = url_for(b"FWS");
        let err = Player::open(&url).unwrap_err();
        assert!(matches!(err, PageError::LoadFailed { .. }));
        assert_eq!(err.reason(), "failed to load");
    }

    #[test]
    fn open_rejects_garbage_with_swf_signature() {
        // Valid signature, nonsense body.
        let mut bytes = b"FWS\x06".to_vec();
        bytes.extend_from_slice(&[0xFF; 32]);
        let (_dir, url) = url_for(&bytes);
        assert!(Player::open(&url).is_err());
    }
}

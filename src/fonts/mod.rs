//! Typeface registry for the layout and rendering pipeline.
//!
//! The registry is built once, explicitly, and shared read-only between renders
//! (`Arc<FontRegistry>`). Each supported language is bound to a regular and a
//! bold face discovered through `fontdb`:
//!
//! | code | family                 |
//! |------|------------------------|
//! | `en` | Noto Sans              |
//! | `ta` | Noto Sans Tamil        |
//! | `hi` | Noto Sans Devanagari   |
//!
//! A language whose family cannot be loaded degrades to the built-in
//! Helvetica pair on its own; other languages keep their faces. Lookups always
//! return a usable [`FontHandle`]. Helvetica only covers WinAnsi, so a
//! language in [`NEEDS_EMBEDDED_FACE`] that ends up on it is always reported
//! as a [`Degradation::ResourceLoadFailure`].

pub(crate) mod metrics;

use crate::error::Degradation;
use crate::language::DEFAULT_LANGUAGE;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Language code to font family name.
pub const LANGUAGE_FAMILIES: &[(&str, &str)] = &[
    ("en", "Noto Sans"),
    ("ta", "Noto Sans Tamil"),
    ("hi", "Noto Sans Devanagari"),
];

/// Languages whose script the built-in WinAnsi faces cannot encode.
pub const NEEDS_EMBEDDED_FACE: &[&str] = &["ta", "hi"];

const BUILTIN_ONLY_REASON: &str = "no embedded typeface; built-in Helvetica cannot encode this script";

/// Index of a face loaded into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(usize);

/// A resolved typeface: either one of the standard PDF faces or an embedded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontHandle {
    Builtin { bold: bool },
    Embedded(FaceId),
}

impl FontHandle {
    pub const REGULAR: FontHandle = FontHandle::Builtin { bold: false };
    pub const BOLD: FontHandle = FontHandle::Builtin { bold: true };

    pub fn is_embedded(&self) -> bool {
        matches!(self, FontHandle::Embedded(_))
    }
}

/// Font binary and naming metadata for an embedded face.
pub struct LoadedFace {
    pub postscript_name: String,
    pub family: String,
    pub data: Arc<Vec<u8>>,
    pub index: u32,
    pub units_per_em: u16,
}

impl std::fmt::Debug for LoadedFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFace")
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl LoadedFace {
    /// Creates a lightweight shaping view over the font data.
    pub fn as_face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.index)
    }
}

/// One glyph produced by shaping, in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapedGlyph {
    pub id: u16,
    pub advance: i32,
    /// Displacement of the glyph from the pen position; marks and vowel
    /// signs use these to sit on their base.
    pub x_offset: i32,
    pub y_offset: i32,
    /// Byte offset into the shaped text of the cluster this glyph belongs to.
    pub cluster: u32,
}

#[derive(Debug, Clone, Copy)]
struct LanguageFonts {
    regular: FontHandle,
    bold: FontHandle,
}

impl LanguageFonts {
    const BUILTIN: LanguageFonts = LanguageFonts {
        regular: FontHandle::REGULAR,
        bold: FontHandle::BOLD,
    };
}

#[derive(Debug)]
pub struct FontRegistry {
    faces: Vec<LoadedFace>,
    bindings: HashMap<String, LanguageFonts>,
    degradations: Vec<Degradation>,
}

impl FontRegistry {
    /// A registry with no embedded faces; every language uses Helvetica.
    /// Languages Helvetica cannot encode are recorded as degraded.
    pub fn builtin() -> Self {
        let bindings = LANGUAGE_FAMILIES
            .iter()
            .map(|(code, _)| (code.to_string(), LanguageFonts::BUILTIN))
            .collect();
        let degradations = NEEDS_EMBEDDED_FACE
            .iter()
            .map(|code| Degradation::ResourceLoadFailure {
                language: code.to_string(),
                reason: BUILTIN_ONLY_REASON.to_string(),
            })
            .collect();
        Self {
            faces: Vec::new(),
            bindings,
            degradations,
        }
    }

    /// Scans a directory for font files and binds the language families found there.
    pub fn from_dir<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut db = fontdb::Database::new();
        if path.is_dir() {
            db.load_fonts_dir(path);
            log::info!("Scanned '{}' for fonts: {} faces found.", path.display(), db.len());
        } else {
            log::warn!("Font directory '{}' does not exist.", path.display());
        }
        Self::from_database(&db)
    }

    /// Binds the language families from the installed system fonts.
    pub fn from_system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self::from_database(&db)
    }

    /// Binds the language families from an already-populated font database.
    pub fn from_database(db: &fontdb::Database) -> Self {
        let mut registry = Self::builtin();
        let mut loaded: HashMap<fontdb::ID, FaceId> = HashMap::new();

        for (code, family) in LANGUAGE_FAMILIES {
            match registry.load_family(db, family, &mut loaded) {
                Ok(fonts) => {
                    log::info!("Bound '{}' to font family '{}'.", code, family);
                    registry.bindings.insert(code.to_string(), fonts);
                    registry.forget_degradation(code);
                }
                Err(reason) => {
                    log::warn!(
                        "Could not load font family '{}' for '{}': {}. Falling back to built-in fonts.",
                        family,
                        code,
                        reason
                    );
                    registry.forget_degradation(code);
                    registry.degradations.push(Degradation::ResourceLoadFailure {
                        language: code.to_string(),
                        reason,
                    });
                }
            }
        }
        registry
    }

    fn forget_degradation(&mut self, code: &str) {
        self.degradations.retain(|d| {
            !matches!(d, Degradation::ResourceLoadFailure { language, .. } if language == code)
        });
    }

    fn load_family(
        &mut self,
        db: &fontdb::Database,
        family: &str,
        loaded: &mut HashMap<fontdb::ID, FaceId>,
    ) -> Result<LanguageFonts, String> {
        let regular = self.load_face(db, family, fontdb::Weight::NORMAL, loaded)?;
        let bold = self.load_face(db, family, fontdb::Weight::BOLD, loaded)?;
        Ok(LanguageFonts {
            regular: FontHandle::Embedded(regular),
            bold: FontHandle::Embedded(bold),
        })
    }

    fn load_face(
        &mut self,
        db: &fontdb::Database,
        family: &str,
        weight: fontdb::Weight,
        loaded: &mut HashMap<fontdb::ID, FaceId>,
    ) -> Result<FaceId, String> {
        let families = [fontdb::Family::Name(family)];
        let query = fontdb::Query {
            families: &families,
            weight,
            ..Default::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| format!("no face for weight {}", weight.0))?;
        if let Some(face_id) = loaded.get(&id) {
            return Ok(*face_id);
        }

        let info = db.face(id).ok_or("face vanished from database")?;
        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or("font data could not be read")?;
        let units_per_em = rustybuzz::Face::from_slice(&data, index)
            .ok_or("font data could not be parsed")
            .and_then(|face| {
                u16::try_from(face.units_per_em()).map_err(|_| "font has an invalid units-per-em")
            })?;

        let face_id = FaceId(self.faces.len());
        self.faces.push(LoadedFace {
            postscript_name: info.post_script_name.clone(),
            family: family.to_string(),
            data: Arc::new(data),
            index,
            units_per_em,
        });
        loaded.insert(id, face_id);
        Ok(face_id)
    }

    /// The face for a language; unsupported codes use the default family.
    pub fn font_for(&self, code: &str, bold: bool) -> FontHandle {
        let fonts = self
            .bindings
            .get(code)
            .or_else(|| self.bindings.get(DEFAULT_LANGUAGE))
            .copied()
            .unwrap_or(LanguageFonts::BUILTIN);
        if bold { fonts.bold } else { fonts.regular }
    }

    pub fn face(&self, id: FaceId) -> Option<&LoadedFace> {
        self.faces.get(id.0)
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &LoadedFace)> {
        self.faces.iter().enumerate().map(|(i, f)| (FaceId(i), f))
    }

    /// Typeface problems recorded while the registry was built.
    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }

    /// The degradation recorded for one language, if its faces failed to load.
    pub fn degradation_for(&self, code: &str) -> Option<&Degradation> {
        self.degradations.iter().find(|d| {
            matches!(d, Degradation::ResourceLoadFailure { language, .. } if language == code)
        })
    }

    /// Shapes `text` with an embedded face.
    pub fn shape(&self, id: FaceId, text: &str) -> Option<Vec<ShapedGlyph>> {
        let face = self.face(id)?.as_face()?;
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&face, &[], buffer);
        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                id: info.glyph_id as u16,
                advance: pos.x_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                cluster: info.cluster,
            })
            .collect();
        Some(glyphs)
    }

    /// Width of `text` in points when set in `font` at `size`.
    pub fn measure(&self, font: FontHandle, text: &str, size: f32) -> f32 {
        match font {
            FontHandle::Builtin { bold } => metrics::text_width(text, bold, size),
            FontHandle::Embedded(id) => {
                let Some(face) = self.face(id) else {
                    return metrics::text_width(text, false, size);
                };
                let units: i64 = self
                    .shape(id, text)
                    .unwrap_or_default()
                    .iter()
                    .map(|g| g.advance as i64)
                    .sum();
                units as f32 * size / face.units_per_em.max(1) as f32
            }
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

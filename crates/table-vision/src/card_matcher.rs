use anyhow::{bail, Context, Result};
use image::RgbaImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use table_data::CardCode;

/// Canonical size every reference image and sampled crop is normalized
/// to before hashing or scanning.
pub const CARD_WIDTH: u32 = 35;
pub const CARD_HEIGHT: u32 = 42;

#[derive(Debug)]
struct CardTemplate {
    code: CardCode,
    image: RgbaImage,
}

/// Resolves a cropped card image to one of the 52 known card identities.
///
/// Two stages: an exact perceptual-hash lookup, then a brute-force
/// nearest-neighbor scan over the whole catalog. The scan always
/// produces a code; a slot is only sampled while known to be occupied,
/// so "no match" is not a meaningful outcome.
pub struct CardMatcher {
    templates: Vec<CardTemplate>,
    hash_index: HashMap<String, CardCode>,
    hasher: Hasher,
}

impl std::fmt::Debug for CardMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `image_hasher::Hasher` is not `Debug`; skip it.
        f.debug_struct("CardMatcher")
            .field("templates", &self.templates)
            .field("hash_index", &self.hash_index)
            .finish_non_exhaustive()
    }
}

impl CardMatcher {
    /// Build a matcher from reference images in catalog order. Codes
    /// must be unique; the catalog must not be empty.
    pub fn new(catalog: impl IntoIterator<Item = (CardCode, RgbaImage)>) -> Result<Self> {
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .hash_size(8, 8)
            .to_hasher();

        let mut templates = Vec::new();
        let mut hash_index = HashMap::new();

        for (code, image) in catalog {
            if templates.iter().any(|t: &CardTemplate| t.code == code) {
                bail!("duplicate catalog entry for card {}", code);
            }
            let normalized = normalize(&image);
            let hash = hasher.hash_image(&normalized).to_base64();
            match hash_index.entry(hash) {
                Entry::Vacant(slot) => {
                    slot.insert(code);
                }
                Entry::Occupied(existing) => {
                    // First entry keeps the hash; lookups for the twin
                    // resolve through the fallback scan.
                    warn!("cards {} and {} share a perceptual hash", existing.get(), code);
                }
            }
            templates.push(CardTemplate { code, image: normalized });
        }

        if templates.is_empty() {
            bail!("card catalog is empty");
        }

        Ok(Self {
            templates,
            hash_index,
            hasher,
        })
    }

    /// Load the full 52-card reference set from `dir`, expecting one
    /// `{code}.png` per card. Any missing or unreadable file is fatal.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut catalog = Vec::with_capacity(52);
        for code in CardCode::all() {
            let path = dir.join(format!("{code}.png"));
            let img = image::open(&path)
                .with_context(|| format!("failed to open card image {}", path.display()))?
                .to_rgba8();
            catalog.push((code, img));
        }
        let matcher = Self::new(catalog)?;
        info!("loaded {} card templates from {}", matcher.templates.len(), dir.display());
        Ok(matcher)
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Classify a cropped slot image. Hash stage first, scan on miss.
    pub fn classify(&self, img: &RgbaImage) -> CardCode {
        let normalized = normalize(img);
        match self.lookup(&normalized) {
            Some(code) => code,
            None => {
                let code = self.scan(&normalized);
                debug!("hash miss, nearest-neighbor scan picked {}", code);
                code
            }
        }
    }

    /// Stage one: exact perceptual-hash lookup.
    pub fn hash_lookup(&self, img: &RgbaImage) -> Option<CardCode> {
        self.lookup(&normalize(img))
    }

    /// Stage two: nearest-neighbor scan by summed absolute pixel
    /// difference. Ties break toward the earlier catalog entry.
    pub fn nearest_match(&self, img: &RgbaImage) -> CardCode {
        self.scan(&normalize(img))
    }

    fn lookup(&self, normalized: &RgbaImage) -> Option<CardCode> {
        let hash = self.hasher.hash_image(normalized).to_base64();
        self.hash_index.get(&hash).copied()
    }

    fn scan(&self, normalized: &RgbaImage) -> CardCode {
        let (first, rest) = self
            .templates
            .split_first()
            .expect("catalog is validated non-empty at construction");

        let mut best_code = first.code;
        let mut best_diff = abs_diff_sum(normalized, &first.image);
        for tmpl in rest {
            let diff = abs_diff_sum(normalized, &tmpl.image);
            if diff < best_diff {
                best_diff = diff;
                best_code = tmpl.code;
            }
        }
        best_code
    }
}

/// Resize to the canonical card size. Already-canonical images pass
/// through untouched so reference round-trips stay bit-exact.
fn normalize(img: &RgbaImage) -> RgbaImage {
    if img.dimensions() == (CARD_WIDTH, CARD_HEIGHT) {
        return img.clone();
    }
    image::imageops::resize(
        img,
        CARD_WIDTH,
        CARD_HEIGHT,
        image::imageops::FilterType::Triangle,
    )
}

/// Sum of absolute per-channel differences over the RGB planes.
fn abs_diff_sum(a: &RgbaImage, b: &RgbaImage) -> u64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    a.pixels()
        .zip(b.pixels())
        .map(|(pa, pb)| {
            (0..3)
                .map(|c| pa[c].abs_diff(pb[c]) as u64)
                .sum::<u64>()
        })
        .sum()
}

//! Reducing packed RGB pixels to a k-colour palette with k-means.
//!
//! Pixels are `0xRRGGBB` integers; any bits above the low 24 are ignored.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cluster::{
    fit, Centroid, Dataset, Euclidean, FeatureRecord, FeatureSchema, KMeansConfig, Termination,
};
use crate::error::Result;

/// Splits a packed pixel into its `(r, g, b)` channels.
pub fn unpack_rgb(pixel: u32) -> (u8, u8, u8) {
    (
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    )
}

/// Feature record for one pixel, labelled `(r,g,b)`.
pub fn pixel_record(pixel: u32) -> FeatureRecord {
    let (r, g, b) = unpack_rgb(pixel);
    FeatureRecord::new(
        format!("({},{},{})", r, g, b),
        vec![r as f64, g as f64, b as f64],
    )
}

/// Packs an `r, g, b` centroid into `0xRRGGBB`.
///
/// Coordinates are truncated toward zero and clamped to `0..=255`; missing
/// coordinates count as 0.
pub fn pack_rgb(centroid: &Centroid) -> u32 {
    let channel = |i: usize| -> u32 {
        let v = centroid.coordinates().get(i).copied().unwrap_or(0.0);
        v.trunc().clamp(0.0, 255.0) as u32
    };
    (channel(0) << 16) | (channel(1) << 8) | channel(2)
}

/// A palette extracted from a set of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// One packed colour per centroid, in centroid order. Entries may repeat.
    pub colours: Vec<u32>,
    pub termination: Termination,
    pub iterations: usize,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Palette entry closest to `pixel` in RGB space; first entry wins ties.
    pub fn nearest(&self, pixel: u32) -> Option<u32> {
        let (r, g, b) = unpack_rgb(pixel);
        self.colours
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|&(i, c)| {
                let (cr, cg, cb) = unpack_rgb(c);
                let dist = (r as i32 - cr as i32).pow(2)
                    + (g as i32 - cg as i32).pow(2)
                    + (b as i32 - cb as i32).pow(2);
                (dist, i)
            })
            .map(|(_, c)| c)
    }
}

/// Settings for palette extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteExtractor {
    /// Number of palette entries to produce.
    pub colours: usize,
    pub max_iterations: usize,
    /// Seed for the random source; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl PaletteExtractor {
    pub fn new(colours: usize) -> Self {
        Self {
            colours,
            max_iterations: 1000,
            seed: None,
            parallel: false,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Extracts a palette of exactly `self.colours` entries.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `pixels`
    ///   is empty or `colours`/`max_iterations` is 0.
    pub fn extract(&self, pixels: &[u32]) -> Result<Palette> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        self.extract_with_rng(pixels, &mut rng)
    }

    /// Same as [`extract`](Self::extract) with a caller-supplied random source.
    pub fn extract_with_rng<R: Rng>(&self, pixels: &[u32], rng: &mut R) -> Result<Palette> {
        let records = pixels.iter().map(|&p| pixel_record(p)).collect();
        let data = Dataset::new(FeatureSchema::rgb(), records)?;
        let config = KMeansConfig::new(self.colours)
            .with_max_iterations(self.max_iterations)
            .with_parallel(self.parallel);

        let clustering = fit(&data, &config, &Euclidean, rng)?;
        let colours: Vec<u32> = clustering.centroids().into_iter().map(pack_rgb).collect();
        debug!(
            "palette of {} colours from {} pixels ({:?})",
            colours.len(),
            pixels.len(),
            clustering.termination()
        );
        Ok(Palette {
            colours,
            termination: clustering.termination(),
            iterations: clustering.iterations(),
        })
    }
}

/// Reduces `pixels` to `colours` palette entries with an entropy-seeded
/// random source.
pub fn palettize(colours: usize, pixels: &[u32]) -> Result<Vec<u32>> {
    PaletteExtractor::new(colours)
        .extract(pixels)
        .map(|p| p.colours)
}

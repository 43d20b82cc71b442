//! Ranking orchestration: derive a descriptor for the target, score every
//! candidate in the database against it, and keep the top N matches.
//!
//! Candidates are scored in parallel; the collected scores preserve input
//! order, so the final stable sort never depends on completion timing.

use cbir_core::{features, Descriptor, Error, Result};
use cbir_similarity::{
    cosine_distance, histogram_intersection_distance, ssd_distance, top_matches,
    weighted_multi_block_distance, Match,
};
use cbir_storage as storage;
use clap::ValueEnum;
use image::RgbImage;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Which descriptor is computed for the target and every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Raw center patch compared with SSD.
    Baseline,
    /// rg chromaticity histogram.
    HistogramRg,
    /// Full-image RGB histogram.
    HistogramRgb,
    /// Two-band multi-region RGB histogram, equal weights.
    MultiHistogram,
    /// Blend of RGB histogram and Sobel texture histogram.
    TextureColor,
    /// Precomputed embeddings looked up from a CSV by basename.
    Dnn,
    /// Three-band histogram weighted toward the lower image.
    CustomSunset,
}

/// Distance metric selector. Classic feature kinds hardwire their metric;
/// this choice only switches `dnn` scoring between cosine and SSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum DistanceKind {
    Ssd,
    HistogramIntersection,
    Cosine,
}

/// One retrieval run: a target, a candidate database and the configured
/// feature/metric pair.
#[derive(Debug, Clone)]
pub struct Query {
    pub target: PathBuf,
    pub database_dir: PathBuf,
    pub feature: FeatureKind,
    pub distance: DistanceKind,
    pub top_n: usize,
    pub embeddings_csv: Option<PathBuf>,
    /// Reverse the ranking: report the least similar matches first.
    pub least_similar: bool,
}

/// Target-side state for one derived-mode feature kind: the descriptor(s)
/// extracted once from the target, plus whatever the metric needs.
enum Scorer {
    CenterPatch(Descriptor),
    RgChromaticity(Descriptor),
    RgbHistogram(Descriptor),
    MultiHistogram {
        target: Descriptor,
        region_count: u32,
        weights: Vec<f32>,
    },
    TextureColor {
        color: Descriptor,
        texture: Descriptor,
    },
}

impl Scorer {
    fn for_target(kind: FeatureKind, image: &RgbImage) -> Result<Self> {
        match kind {
            FeatureKind::Baseline => Ok(Self::CenterPatch(features::center_patch(
                image,
                features::DEFAULT_PATCH_SIZE,
            )?)),
            FeatureKind::HistogramRg => Ok(Self::RgChromaticity(
                features::rg_chromaticity_histogram(image, features::DEFAULT_RG_BINS)?,
            )),
            FeatureKind::HistogramRgb => Ok(Self::RgbHistogram(features::rgb_histogram(
                image,
                features::DEFAULT_RGB_BINS,
            )?)),
            FeatureKind::MultiHistogram => Ok(Self::MultiHistogram {
                target: features::multi_region_rgb_histogram(
                    image,
                    features::DEFAULT_RGB_BINS,
                    features::DEFAULT_REGION_COUNT,
                )?,
                region_count: features::DEFAULT_REGION_COUNT,
                weights: vec![1.0; features::DEFAULT_REGION_COUNT as usize],
            }),
            FeatureKind::TextureColor => Ok(Self::TextureColor {
                color: features::rgb_histogram(image, features::DEFAULT_RGB_BINS)?,
                texture: features::sobel_magnitude_histogram(
                    image,
                    features::DEFAULT_TEXTURE_BINS,
                )?,
            }),
            FeatureKind::CustomSunset => Ok(Self::MultiHistogram {
                target: features::sunset_histogram(
                    image,
                    features::DEFAULT_RGB_BINS,
                    features::SUNSET_REGION_COUNT,
                )?,
                region_count: features::SUNSET_REGION_COUNT,
                weights: vec![0.2, 0.3, 0.5],
            }),
            FeatureKind::Dnn => Err(Error::InvalidConfig(
                "dnn features are looked up from an embeddings CSV, not extracted".to_string(),
            )),
        }
    }

    fn score(&self, image: &RgbImage) -> Result<f32> {
        match self {
            Self::CenterPatch(target) => {
                let feature = features::center_patch(image, features::DEFAULT_PATCH_SIZE)?;
                ssd_distance(target.as_slice(), feature.as_slice())
            }
            Self::RgChromaticity(target) => {
                let feature =
                    features::rg_chromaticity_histogram(image, features::DEFAULT_RG_BINS)?;
                histogram_intersection_distance(target.as_slice(), feature.as_slice())
            }
            Self::RgbHistogram(target) => {
                let feature = features::rgb_histogram(image, features::DEFAULT_RGB_BINS)?;
                histogram_intersection_distance(target.as_slice(), feature.as_slice())
            }
            Self::MultiHistogram {
                target,
                region_count,
                weights,
            } => {
                let feature = features::multi_region_rgb_histogram(
                    image,
                    features::DEFAULT_RGB_BINS,
                    *region_count,
                )?;
                let bins_per_block = (features::DEFAULT_RGB_BINS as usize).pow(3);
                weighted_multi_block_distance(
                    target.as_slice(),
                    feature.as_slice(),
                    bins_per_block,
                    *region_count as usize,
                    weights,
                )
            }
            Self::TextureColor { color, texture } => {
                let candidate_color = features::rgb_histogram(image, features::DEFAULT_RGB_BINS)?;
                let candidate_texture =
                    features::sobel_magnitude_histogram(image, features::DEFAULT_TEXTURE_BINS)?;
                let color_distance =
                    histogram_intersection_distance(color.as_slice(), candidate_color.as_slice())?;
                let texture_distance = histogram_intersection_distance(
                    texture.as_slice(),
                    candidate_texture.as_slice(),
                )?;
                Ok((color_distance + texture_distance) * 0.5)
            }
        }
    }
}

/// Run one retrieval query and return the ranked matches.
pub fn run(query: &Query) -> Result<Vec<Match>> {
    let files = storage::list_images(&query.database_dir)?;
    if files.is_empty() {
        return Err(Error::EmptyDatabase(query.database_dir.clone()));
    }
    info!(candidates = files.len(), feature = ?query.feature, "scoring database");

    let matches = match query.feature {
        FeatureKind::Dnn => score_precomputed(query, &files)?,
        _ => score_derived(query, &files)?,
    };
    Ok(top_matches(matches, query.top_n, query.least_similar))
}

/// Derived mode: extract a descriptor per candidate with the same feature
/// kind and parameters as the target. Any decode failure aborts the run.
fn score_derived(query: &Query, files: &[PathBuf]) -> Result<Vec<Match>> {
    let target_image = storage::load_image(&query.target)?;
    let scorer = Scorer::for_target(query.feature, &target_image)?;

    files
        .par_iter()
        .map(|file| -> Result<Match> {
            let image = storage::load_image(file)?;
            let distance = scorer.score(&image)?;
            Ok(Match::new(file.to_string_lossy(), distance))
        })
        .collect()
}

/// Precomputed mode: descriptors come from an embeddings CSV keyed by
/// basename. A missing target key is fatal; candidates without an entry
/// are skipped so one absent embedding does not abort the whole run.
fn score_precomputed(query: &Query, files: &[PathBuf]) -> Result<Vec<Match>> {
    let embeddings_path = query.embeddings_csv.as_ref().ok_or_else(|| {
        Error::InvalidConfig("an embeddings CSV path is required for dnn features".to_string())
    })?;
    let embeddings = storage::read_embeddings_csv(embeddings_path)?;

    let target_key = storage::basename(&query.target);
    let target = embeddings
        .get(&target_key)
        .ok_or_else(|| Error::MissingTarget(target_key.clone()))?;

    let mut matches = Vec::with_capacity(files.len());
    for file in files {
        let key = storage::basename(file);
        let Some(embedding) = embeddings.get(&key) else {
            debug!(%key, "candidate has no embedding, skipping");
            continue;
        };
        let distance = match query.distance {
            DistanceKind::Cosine => cosine_distance(target.as_slice(), embedding.as_slice())?,
            _ => ssd_distance(target.as_slice(), embedding.as_slice())?,
        };
        matches.push(Match::new(file.to_string_lossy(), distance));
    }
    Ok(matches)
}

//! Synthetic volumes for benchmarking.
//!
//! A volume is a grid of cubic blocks, each filled with its own base level
//! plus uniform noise, so every merge policy has real boundaries to find.
//! Generation is seeded for reproducibility across runs.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use regionseg_core::VolumeShape;

/// Errors that may occur during synthetic volume generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested volume has no voxels.
    #[error("volume extents must all be greater than zero")]
    EmptyVolume,
    /// The requested block side was zero.
    #[error("block side must be greater than zero")]
    ZeroBlock,
}

/// Configuration for synthetic volume generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Extents of the volume.
    pub shape: VolumeShape,
    /// Side length of each constant-level block.
    pub block: usize,
    /// Half-width of the uniform noise added to every voxel.
    pub noise: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Voxel values of a generated volume.
///
/// # Examples
///
/// ```
/// use regionseg_benches::volume::{SyntheticConfig, SyntheticVolume};
/// use regionseg_core::VolumeShape;
///
/// let config = SyntheticConfig {
///     shape: VolumeShape::planar(8, 8),
///     block: 4,
///     noise: 0.5,
///     seed: 42,
/// };
/// let volume = SyntheticVolume::generate(&config).expect("valid config");
/// assert_eq!(volume.values().len(), 64);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticVolume {
    shape: VolumeShape,
    values: Vec<f64>,
}

impl SyntheticVolume {
    /// Generates the volume eagerly from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::EmptyVolume`] when any extent is zero and
    /// [`SyntheticError::ZeroBlock`] when `block` is zero.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.shape.is_empty() {
            return Err(SyntheticError::EmptyVolume);
        }
        if config.block == 0 {
            return Err(SyntheticError::ZeroBlock);
        }

        let shape = config.shape;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let blocks = |extent: usize| extent.div_ceil(config.block);
        let levels: Vec<f64> = (0..blocks(shape.x()) * blocks(shape.y()) * blocks(shape.z()))
            .map(|_| f64::from(rng.gen_range(0_u8..=20)) * 10.0)
            .collect();

        let mut values = Vec::with_capacity(shape.len());
        for z in 0..shape.z() {
            for y in 0..shape.y() {
                for x in 0..shape.x() {
                    let block = x / config.block
                        + blocks(shape.x())
                            * (y / config.block + blocks(shape.y()) * (z / config.block));
                    let noise = if config.noise > 0.0 {
                        rng.gen_range(-config.noise..config.noise)
                    } else {
                        0.0
                    };
                    values.push(levels[block] + noise);
                }
            }
        }
        Ok(Self { shape, values })
    }

    /// Returns the volume extents.
    #[must_use]
    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    /// Returns the voxel values in x-fastest order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

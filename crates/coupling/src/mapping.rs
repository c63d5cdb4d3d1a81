use std::{collections::HashMap, hash::Hash};

use tracing::debug;
use weft_core::{MaterialId, Transport};

use crate::{
    ConfigError, Error, PinGrid,
    sampler::{SectorAddress, sample_point},
};

/// The bidirectional index mapping between thermal-grid rings and transport
/// regions.
///
/// Regions are numbered in order of first discovery. Both tables are
/// many-to-many and structurally inverse: region `i` appears in
/// `ring_to_regions(r)` exactly when ring `r` appears in
/// `region_to_rings(i)`.
///
/// `ring_to_regions(r)` holds one entry per azimuthal sector, repeats
/// included, so its length is always the sector count. Averaging over it
/// therefore weights each region by the number of sectors it covers.
#[derive(Debug, Clone)]
pub struct MeshMap<R> {
    grid: PinGrid,
    sectors: usize,
    regions: Vec<R>,
    ring_to_regions: Vec<Vec<usize>>,
    region_to_rings: Vec<Vec<usize>>,
}

impl<R: Clone + Eq + Hash> MeshMap<R> {
    /// Builds the mapping by resolving one sample point per sector of every
    /// ring.
    ///
    /// Sectors are visited pin → axial → ring → sector. The geometry is
    /// static, so every process that builds the mapping from the same grid
    /// arrives at the same tables.
    ///
    /// # Errors
    ///
    /// Returns an error if `sectors` is zero, if a sample point lies outside
    /// the transport geometry, or if the transport solver fails to resolve a
    /// point.
    pub fn build<T>(grid: PinGrid, sectors: usize, transport: &T) -> Result<Self, Error>
    where
        T: Transport<Region = R> + ?Sized,
    {
        if sectors == 0 {
            return Err(ConfigError::NoSectors.into());
        }

        let mut tracked: HashMap<R, usize> = HashMap::new();
        let mut regions = Vec::new();
        let mut ring_to_regions = vec![Vec::with_capacity(sectors); grid.total_rings()];
        let mut region_to_rings: Vec<Vec<usize>> = Vec::new();

        let mut ring_index = 0;
        for pin in 0..grid.pin_count() {
            for axial in 0..grid.axial_count() {
                for ring in 0..grid.ring_count() {
                    for sector in 0..sectors {
                        let address = SectorAddress {
                            pin,
                            axial,
                            ring,
                            sector,
                        };
                        let point = sample_point(&grid, sectors, address);
                        let region = transport
                            .resolve(point)
                            .map_err(Error::transport)?
                            .ok_or(Error::Unresolved {
                                pin,
                                axial,
                                ring,
                                sector,
                                point,
                            })?;

                        let index = *tracked.entry(region).or_insert_with_key(|region| {
                            regions.push(region.clone());
                            region_to_rings.push(Vec::new());
                            regions.len() - 1
                        });

                        ring_to_regions[ring_index].push(index);
                        region_to_rings[index].push(ring_index);
                    }
                    ring_index += 1;
                }
            }
        }

        debug!(
            rings = ring_to_regions.len(),
            regions = regions.len(),
            sectors,
            "built ring/region mapping"
        );

        Ok(Self {
            grid,
            sectors,
            regions,
            ring_to_regions,
            region_to_rings,
        })
    }
}

impl<R> MeshMap<R> {
    #[must_use]
    pub fn grid(&self) -> &PinGrid {
        &self.grid
    }

    #[must_use]
    pub fn sectors(&self) -> usize {
        self.sectors
    }

    /// Regions in array-index order.
    #[must_use]
    pub fn regions(&self) -> &[R] {
        &self.regions
    }

    /// Number of distinct regions discovered.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of rings, which equals [`PinGrid::total_rings`].
    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.ring_to_regions.len()
    }

    /// Region indices sampled from `ring`, one per sector.
    ///
    /// # Panics
    ///
    /// Panics if `ring` is out of range.
    #[must_use]
    pub fn ring_to_regions(&self, ring: usize) -> &[usize] {
        &self.ring_to_regions[ring]
    }

    /// Ring indices that sampled `region`, once per sampling sector.
    ///
    /// # Panics
    ///
    /// Panics if `region` is out of range.
    #[must_use]
    pub fn region_to_rings(&self, region: usize) -> &[usize] {
        &self.region_to_rings[region]
    }

    /// Materials of every region, in array-index order.
    pub fn materials<T>(&self, transport: &T) -> Vec<MaterialId>
    where
        T: Transport<Region = R> + ?Sized,
    {
        self.regions
            .iter()
            .map(|region| transport.material(region))
            .collect()
    }
}

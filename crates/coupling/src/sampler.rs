//! Representative sample points for thermal-grid sectors.
//!
//! Each `(pin, axial, ring, sector)` address is represented by one point at
//! the middle of its axial interval, radial interval, and angular span:
//!
//! ```text
//!   z = (z_axial + z_axial+1) / 2
//!   r = (r_ring + r_ring+1) / 2
//!   θ = 2π (sector + 0.5) / sectors
//!   (x, y) = center(pin) + (r cos θ, r sin θ)
//! ```

use std::f64::consts::PI;

use weft_core::Position;

use crate::PinGrid;

/// Address of one azimuthal sector of one thermal-grid ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectorAddress {
    pub pin: usize,
    pub axial: usize,
    pub ring: usize,
    pub sector: usize,
}

/// Angle at the middle of `sector` when the circle is split into `sectors`
/// equal spans.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sector_angle(sector: usize, sectors: usize) -> f64 {
    2.0 * (sector as f64 + 0.5) * PI / sectors as f64
}

/// Returns the sample point representing `address`.
///
/// # Panics
///
/// Panics if any component of `address` is outside `grid`.
#[must_use]
pub fn sample_point(grid: &PinGrid, sectors: usize, address: SectorAddress) -> Position {
    let [cx, cy] = grid.pin_center(address.pin);
    let z = grid.axial_midpoint(address.axial);
    let r = grid.radial_midpoint(address.ring);
    let theta = sector_angle(address.sector, sectors);

    Position::new(cx + r * theta.cos(), cy + r * theta.sin(), z)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    fn grid() -> PinGrid {
        PinGrid::new(
            2,
            2,
            array![0.0, 0.4],
            array![0.4, 0.5],
            array![0.0, 10.0, 30.0],
            1,
        )
        .unwrap()
    }

    #[test]
    fn four_sectors_land_on_diagonals() {
        for (sector, expected) in [0.25, 0.75, 1.25, 1.75].into_iter().enumerate() {
            assert_relative_eq!(sector_angle(sector, 4), expected * PI);
        }
    }

    #[test]
    fn samples_midpoints() {
        let point = sample_point(
            &grid(),
            4,
            SectorAddress {
                pin: 0,
                axial: 1,
                ring: 1,
                sector: 0,
            },
        );

        let r = 0.45;
        assert_relative_eq!(point.x, r * (PI / 4.0).cos());
        assert_relative_eq!(point.y, r * (PI / 4.0).sin());
        assert_relative_eq!(point.z, 20.0);
        assert_relative_eq!(point.radial_distance([0.0, 0.0]), r);
    }

    #[test]
    fn offsets_by_pin_center() {
        let grid = grid().with_pin_centers(vec![[0.0, 0.0], [2.0, -1.0]]).unwrap();
        let address = SectorAddress {
            pin: 1,
            axial: 0,
            ring: 0,
            sector: 2,
        };

        let point = sample_point(&grid, 4, address);

        assert_relative_eq!(point.radial_distance([2.0, -1.0]), 0.2, epsilon = 1e-12);
        assert!(point.x < 2.0 && point.y < -1.0);
        assert_relative_eq!(point.z, 5.0);
    }

    #[test]
    fn single_sector_points_along_negative_x() {
        let point = sample_point(
            &grid(),
            1,
            SectorAddress {
                pin: 0,
                axial: 0,
                ring: 0,
                sector: 0,
            },
        );

        assert_relative_eq!(point.x, -0.2);
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-12);
    }
}

//! # Output and capability masks
//!
//! A [`GeodesicMask`] selects which quantities a geodesic computation produces. The same bit
//! set serves two roles:
//!
//! - **capabilities** (low bits, `CAP_*`): which integrals a
//!   [`GeodesicLineExact`](crate::geodesic_line_exact::GeodesicLineExact) prepares at
//!   construction (distance, reduced length, longitude, area);
//! - **outputs** (bits 7..15): which results a call should fill in.
//!
//! Every output flag carries the capability bits it needs, so passing `DISTANCE | AREA` to a line
//! constructor automatically enables the matching integrals.
//!
//! `LONG_UNROLL` is a modifier rather than an output: with it, `lon2 - lon1` records how many
//! times the geodesic wrapped around the ellipsoid; without it, `lon2` is reduced to
//! `[-180, 180]`.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GeodesicMask: u32 {
        const NONE = 0;

        const CAP_E = 1 << 0;
        const CAP_D = 1 << 2;
        const CAP_H = 1 << 3;
        const CAP_C4 = 1 << 4;
        const CAP_ALL = 0x1F;

        const LATITUDE = 1 << 7;
        const LONGITUDE = (1 << 8) | Self::CAP_H.bits();
        const AZIMUTH = 1 << 9;
        const DISTANCE = (1 << 10) | Self::CAP_E.bits();
        const DISTANCE_IN = (1 << 11) | Self::CAP_E.bits();
        const REDUCEDLENGTH = (1 << 12) | Self::CAP_D.bits();
        const GEODESICSCALE = (1 << 13) | Self::CAP_D.bits();
        const AREA = (1 << 14) | Self::CAP_C4.bits();
        const LONG_UNROLL = 1 << 15;

        const OUT_ALL = 0x7F80;
        const OUT_MASK = 0xFF80;

        const STANDARD = Self::LATITUDE.bits()
            | Self::LONGITUDE.bits()
            | Self::AZIMUTH.bits()
            | Self::DISTANCE_IN.bits();
        const ALL = Self::OUT_ALL.bits() | Self::CAP_ALL.bits();
    }
}

impl GeodesicMask {
    /// Output bits only (including `LONG_UNROLL`).
    #[inline]
    pub fn outputs(self) -> Self {
        self & Self::OUT_MASK
    }

    /// Capability bits only.
    #[inline]
    pub fn capabilities(self) -> Self {
        self & Self::CAP_ALL
    }

    /// True if every output bit of `other` is also set in `self`.
    #[inline]
    pub fn covers(self, other: Self) -> bool {
        let wanted = other & Self::OUT_ALL;
        (self & wanted) == wanted
    }

    /// True if the output bit of `flag` is requested.
    ///
    /// Only the output bits of `flag` are examined, so `m.wants(DISTANCE)` is not satisfied by
    /// the `CAP_E` bit that `DISTANCE_IN` also carries.
    #[inline]
    pub fn wants(self, flag: Self) -> bool {
        self.intersects(flag & Self::OUT_MASK)
    }
}

#[cfg(test)]
mod geodesic_mask_test {
    use super::*;

    #[test]
    fn test_bit_layout() {
        assert_eq!(GeodesicMask::LATITUDE.bits(), 128);
        assert_eq!(GeodesicMask::LONGITUDE.bits(), 256 | 8);
        assert_eq!(GeodesicMask::DISTANCE.bits(), 1024 | 1);
        assert_eq!(GeodesicMask::DISTANCE_IN.bits(), 2048 | 1);
        assert_eq!(GeodesicMask::AREA.bits(), 16384 | 16);
        assert_eq!(GeodesicMask::ALL.bits(), 0x7F9F);
        assert_eq!(GeodesicMask::STANDARD.bits(), 128 | 256 | 8 | 512 | 2048 | 1);
    }

    #[test]
    fn test_wants_ignores_capability_bits() {
        let mask = GeodesicMask::DISTANCE_IN;
        assert!(mask.wants(GeodesicMask::DISTANCE_IN));
        assert!(!mask.wants(GeodesicMask::DISTANCE));
        assert!(GeodesicMask::ALL.wants(GeodesicMask::AREA));
        assert!(!GeodesicMask::ALL.wants(GeodesicMask::LONG_UNROLL));
    }

    #[test]
    fn test_covers() {
        let caps = GeodesicMask::STANDARD | GeodesicMask::LONG_UNROLL;
        assert!(caps.covers(GeodesicMask::LATITUDE | GeodesicMask::LONGITUDE));
        assert!(caps.covers(GeodesicMask::LONG_UNROLL | GeodesicMask::AZIMUTH));
        assert!(!caps.covers(GeodesicMask::AREA));
        assert_eq!(
            GeodesicMask::AREA.capabilities(),
            GeodesicMask::CAP_C4
        );
    }
}

//! Unit tests for pr-grid.

#[cfg(test)]
mod helpers {
    use pr_core::CellCoord;

    use crate::CoverageMap;

    /// A coverage map whose cells are given row by row (north first).
    pub fn map_from_rows(top_left: CellCoord, rows: &[&[u8]]) -> CoverageMap {
        let mut map = CoverageMap::new(rows[0].len(), rows.len(), 0, top_left).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                map.set(r, c, *v).unwrap();
            }
        }
        map
    }
}

// ── CellRect ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rect {
    use pr_core::CellCoord;

    use crate::{CellRect, GridError};

    fn rect(x: i32, y: i32, w: usize, h: usize) -> CellRect {
        CellRect::new(CellCoord::new(x, y), w, h).unwrap()
    }

    #[test]
    fn edges() {
        let r = rect(10, 20, 3, 2);
        assert_eq!((r.west(), r.east(), r.north(), r.south()), (10, 12, 20, 19));
    }

    #[test]
    fn zero_size_rejected() {
        assert!(matches!(
            CellRect::new(CellCoord::new(0, 0), 0, 3),
            Err(GridError::EmptySize { width: 0, height: 3 })
        ));
    }

    #[test]
    fn intersection_of_offset_rects() {
        let a = rect(0, 10, 4, 4); // x 0..=3, y 7..=10
        let b = rect(2, 8, 4, 4); // x 2..=5, y 5..=8
        assert_eq!(a.intersection(&b), Some(rect(2, 8, 2, 2)));
        assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn disjoint_on_one_axis_is_none() {
        let a = rect(0, 10, 2, 2);
        let east = rect(5, 10, 2, 2);
        let south = rect(0, 5, 2, 2);
        assert_eq!(a.intersection(&east), None);
        assert_eq!(a.intersection(&south), None);
    }

    #[test]
    fn bounding_covers_all() {
        let b = CellRect::bounding([rect(0, 10, 2, 2), rect(5, 3, 1, 1)]).unwrap();
        assert_eq!(b, rect(0, 10, 6, 8));
        assert!(CellRect::bounding(std::iter::empty()).is_none());
    }

    #[test]
    fn local_index_inverts_cell_at() {
        let r = rect(-3, 7, 4, 3);
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(r.local_index(r.cell_at(row, col)), Some((row, col)));
            }
        }
        assert_eq!(r.local_index(CellCoord::new(-4, 7)), None);
        assert_eq!(r.cells().count(), 12);
    }
}

// ── CellMap construction and access ───────────────────────────────────────────

#[cfg(test)]
mod construction {
    use pr_core::{CellCoord, GeoPoint};

    use crate::{CellMap, CoverageMap, GridError, SaturationMap};

    #[test]
    fn geographic_top_left_floors_to_cell() {
        let p = GeoPoint::new(-8.61, 41.15);
        let map = CoverageMap::with_geographic_top_left(4, 3, 0, p).unwrap();
        assert_eq!(map.top_left(), p.cell());
        assert_eq!(map.size(), (4, 3));
        assert!(map.values().iter().all(|v| *v == 0));
    }

    #[test]
    fn center_constructor_places_center_cell() {
        let p = GeoPoint::new(-8.61, 41.15);
        let map = CoverageMap::with_geographic_center(5, 3, 0, p).unwrap();
        let c = p.cell();
        assert_eq!(map.top_left(), CellCoord::new(c.x - 2, c.y + 1));
        assert_eq!(map.center(), Some(c));
        assert_eq!(map.local(c), Some((1, 2)));
    }

    #[test]
    fn center_constructor_rejects_even_sizes() {
        let p = GeoPoint::new(0.0, 0.0);
        let err = CoverageMap::with_geographic_center(4, 3, 0, p).unwrap_err();
        assert!(matches!(err, GridError::EvenCenter { width: 4, height: 3 }));
        assert!(CoverageMap::with_geographic_center(3, 2, 0, p).is_err());
    }

    #[test]
    fn even_map_has_no_center() {
        let map = CoverageMap::new(2, 3, 0, CellCoord::new(0, 0)).unwrap();
        assert_eq!(map.center(), None);
    }

    #[test]
    fn bounding_encloses_inputs() {
        let a = CoverageMap::new(3, 3, 1, CellCoord::new(0, 10)).unwrap();
        let b = CoverageMap::new(2, 2, 1, CellCoord::new(4, 6)).unwrap();
        let container = SaturationMap::bounding([&a, &b], 0).unwrap();
        assert_eq!(container.top_left(), CellCoord::new(0, 10));
        assert_eq!(container.size(), (6, 6));
        assert!(container.rect().contains_rect(&a.rect()));
        assert!(container.rect().contains_rect(&b.rect()));
    }

    #[test]
    fn bounding_of_nothing_fails() {
        let none: [&CoverageMap; 0] = [];
        assert!(matches!(CellMap::<u8>::bounding(none, 0), Err(GridError::EmptyBounding)));
    }

    #[test]
    fn three_conventions_hit_same_cell() {
        let tl = CellCoord::new(100, 200);
        let mut map = CoverageMap::new(4, 4, 0, tl).unwrap();
        let cell = CellCoord::new(102, 199); // row 1, col 2
        map.set_cell(cell, 5).unwrap();
        assert_eq!(map.get(1, 2), Some(&5));
        assert_eq!(map.get_geo(cell.center()), Some(&5));
        assert_eq!(map[(1, 2)], 5);
        map.set_geo(cell.center(), 3).unwrap();
        assert_eq!(map.get_cell(cell), Some(&3));
    }

    #[test]
    fn north_is_row_zero() {
        let tl = CellCoord::new(0, 50);
        let mut map = CoverageMap::new(1, 3, 0, tl).unwrap();
        map.set_cell(CellCoord::new(0, 50), 1).unwrap();
        map.set_cell(CellCoord::new(0, 48), 3).unwrap();
        assert_eq!(map.get(0, 0), Some(&1));
        assert_eq!(map.get(2, 0), Some(&3));
    }

    #[test]
    fn out_of_bounds_access() {
        let mut map = CoverageMap::new(2, 2, 0, CellCoord::new(0, 0)).unwrap();
        assert_eq!(map.get(2, 0), None);
        assert_eq!(map.get_cell(CellCoord::new(0, 1)), None);
        assert!(matches!(
            map.set_cell(CellCoord::new(5, 5), 1),
            Err(GridError::OutOfBounds { .. })
        ));
    }
}

// ── Crop ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod crop {
    use pr_core::CellCoord;

    use super::helpers::map_from_rows;
    use crate::GridError;

    #[test]
    fn crop_to_current_bounds_is_identity() {
        let map = map_from_rows(CellCoord::new(0, 10), &[&[1, 2, 3], &[4, 5, 6]]);
        let same = map.crop(map.top_left(), map.width(), map.height()).unwrap();
        assert_eq!(same, map);
    }

    #[test]
    fn crop_copies_covered_cells() {
        let map = map_from_rows(CellCoord::new(0, 10), &[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        let sub = map.crop(CellCoord::new(1, 9), 2, 2).unwrap();
        assert_eq!(sub.top_left(), CellCoord::new(1, 9));
        assert_eq!(sub.values(), &[5, 6, 8, 9]);
    }

    #[test]
    fn crop_in_place_updates_bounds() {
        let mut map = map_from_rows(CellCoord::new(0, 10), &[&[1, 2], &[3, 4]]);
        map.crop_in_place(CellCoord::new(0, 9), 2, 1).unwrap();
        assert_eq!(map.size(), (2, 1));
        assert_eq!(map.values(), &[3, 4]);
    }

    #[test]
    fn crop_outside_fails() {
        let map = map_from_rows(CellCoord::new(0, 10), &[&[1, 2], &[3, 4]]);
        assert!(matches!(
            map.crop(CellCoord::new(1, 10), 2, 2),
            Err(GridError::CropOutOfBounds { .. })
        ));
        assert!(matches!(
            map.crop(CellCoord::new(0, 10), 0, 1),
            Err(GridError::EmptySize { .. })
        ));
    }
}

// ── Merges ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod merges {
    use pr_core::CellCoord;

    use super::helpers::map_from_rows;
    use crate::{CoverageMap, SaturationMap};

    #[test]
    fn keep_best_signal_takes_max_on_overlap_only() {
        // a covers x 0..=2, y 8..=10; b covers x 1..=3, y 7..=9
        let mut a = map_from_rows(CellCoord::new(0, 10), &[&[1, 1, 1], &[1, 4, 1], &[1, 1, 1]]);
        let b = map_from_rows(CellCoord::new(1, 9), &[&[2, 0, 9], &[2, 2, 9], &[9, 9, 9]]);
        assert!(a.keep_best_signal(&b));
        assert_eq!(a.values(), &[1, 1, 1, 1, 4, 1, 1, 2, 2]);
    }

    #[test]
    fn keep_best_signal_is_idempotent() {
        let mut once = map_from_rows(CellCoord::new(0, 1), &[&[0, 3], &[5, 1]]);
        let other = map_from_rows(CellCoord::new(0, 1), &[&[2, 2], &[2, 2]]);
        once.keep_best_signal(&other);
        let mut twice = once.clone();
        twice.keep_best_signal(&other);
        assert_eq!(once, twice);
    }

    #[test]
    fn keep_best_signal_overlap_is_order_independent() {
        let a = map_from_rows(CellCoord::new(0, 1), &[&[0, 3], &[5, 1]]);
        let b = map_from_rows(CellCoord::new(0, 1), &[&[2, 2], &[4, 4]]);
        let mut ab = a.clone();
        ab.keep_best_signal(&b);
        let mut ba = b.clone();
        ba.keep_best_signal(&a);
        assert_eq!(ab, ba);
        assert_eq!(ab.values(), &[2, 3, 5, 4]);
    }

    #[test]
    fn saturation_counts_positive_cells() {
        let mut sat = SaturationMap::new(2, 2, 0, CellCoord::new(0, 1)).unwrap();
        let a = map_from_rows(CellCoord::new(0, 1), &[&[1, 0], &[3, 0]]);
        let b = map_from_rows(CellCoord::new(0, 1), &[&[5, 0], &[0, 2]]);
        sat.increment_saturation(&a);
        sat.increment_saturation(&b);
        assert_eq!(sat.values(), &[2, 0, 1, 1]);
    }

    #[test]
    fn no_overlap_leaves_both_unchanged() {
        let mut a = map_from_rows(CellCoord::new(0, 1), &[&[1, 1], &[1, 1]]);
        let b = map_from_rows(CellCoord::new(50, 1), &[&[5, 5], &[5, 5]]);
        let (a0, b0) = (a.clone(), b.clone());
        assert!(a.overlap_bounds(&b).is_none());
        assert!(!a.keep_best_signal(&b));
        let mut sat = SaturationMap::new(2, 2, 0, CellCoord::new(0, 1)).unwrap();
        assert!(!sat.increment_saturation(&b));
        assert_eq!(a, a0);
        assert_eq!(b, b0);
        assert!(sat.values().iter().all(|v| *v == 0));
    }

    #[test]
    fn merge_into_larger_container() {
        let mut container = CoverageMap::new(5, 5, 0, CellCoord::new(0, 4)).unwrap();
        let small = map_from_rows(CellCoord::new(2, 2), &[&[4]]);
        container.keep_best_signal(&small);
        assert_eq!(container.get_cell(CellCoord::new(2, 2)), Some(&4));
        assert_eq!(container.values().iter().filter(|v| **v > 0).count(), 1);
    }
}

// ── Measurement and masks ─────────────────────────────────────────────────────

#[cfg(test)]
mod measurement {
    use pr_core::CellCoord;

    use super::helpers::map_from_rows;
    use crate::{GridError, Measurement, Obstruction};

    #[test]
    fn statistics() {
        let m: Measurement = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        assert_eq!(m.count(), 8);
        assert!((m.mean() - 5.0).abs() < 1e-12);
        assert!((m.variance() - 4.0).abs() < 1e-12);
        assert!((m.stdev() - 2.0).abs() < 1e-12);
        assert_eq!(m.min(), 2.0);
        assert_eq!(m.max(), 9.0);
        assert_eq!(m.count_of(4.0), 3);
    }

    #[test]
    fn empty_is_zero() {
        let m = Measurement::new();
        assert_eq!(m.mean(), 0.0);
        assert_eq!(m.stdev(), 0.0);
    }

    #[test]
    fn excludes_zero_unless_asked() {
        let map = map_from_rows(CellCoord::new(0, 1), &[&[0, 3], &[5, 0]]);
        assert_eq!(map.measurement(None, false).unwrap().count(), 2);
        assert_eq!(map.measurement(None, true).unwrap().count(), 4);
    }

    #[test]
    fn mask_selects_open_cells() {
        let map = map_from_rows(CellCoord::new(0, 1), &[&[0, 3], &[5, 2]]);
        let seen = map_from_rows(CellCoord::new(0, 1), &[&[1, 0], &[1, 0]]);
        let mask = seen.to_obstruction_mask();
        assert_eq!(mask.get(0, 0), Some(&Obstruction::Open));
        assert_eq!(mask.get(0, 1), Some(&Obstruction::Blocked));
        let with_zero = map.measurement(Some(&mask), true).unwrap();
        assert_eq!(with_zero.samples(), &[0.0, 5.0]);
        let without = map.measurement(Some(&mask), false).unwrap();
        assert_eq!(without.samples(), &[5.0]);
    }

    #[test]
    fn mask_size_mismatch_fails() {
        let map = map_from_rows(CellCoord::new(0, 1), &[&[0, 3], &[5, 2]]);
        let mask = map_from_rows(CellCoord::new(0, 1), &[&[1, 1, 1]]).to_obstruction_mask();
        assert!(matches!(
            map.measurement(Some(&mask), true),
            Err(GridError::MaskSizeMismatch { width: 2, height: 2, mask_width: 3, mask_height: 1 })
        ));
    }
}

// ── Text codec ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use pr_core::CellCoord;

    use super::helpers::map_from_rows;
    use crate::{CellMap, CoverageMap, GridError, MaskCodec, Obstruction, SignalCodec};

    #[test]
    fn encodes_header_and_rows() {
        let map = map_from_rows(CellCoord::new(-30_997, 148_140), &[&[0, 1, 2], &[3, 4, 5]]);
        assert_eq!(map.to_text(&SignalCodec).unwrap(), "tlc-30997;148140\n012\n345\n");
    }

    #[test]
    fn signal_round_trip() {
        let map = map_from_rows(CellCoord::new(7, -2), &[&[0, 5, 2, 9], &[1, 1, 0, 3], &[4, 4, 4, 4]]);
        let text = map.to_text(&SignalCodec).unwrap();
        let back = CoverageMap::from_text(&text, &SignalCodec).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn mask_round_trip() {
        let seen = map_from_rows(CellCoord::new(1, 1), &[&[1, 0], &[0, 2]]);
        let mask = seen.to_obstruction_mask();
        let text = mask.to_text(&MaskCodec).unwrap();
        assert_eq!(text, "tlc1;1\nOB\nBO\n");
        let back = CellMap::<Obstruction>::from_text(&text, &MaskCodec).unwrap();
        assert_eq!(back, mask);
    }

    #[test]
    fn values_above_nine_cannot_encode() {
        let map = map_from_rows(CellCoord::new(0, 0), &[&[12]]);
        assert!(matches!(map.to_text(&SignalCodec), Err(GridError::Encode(_))));
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let cases = [
            "",
            "tl1;2\n00\n",
            "tlc1\n00\n",
            "tlcx;2\n00\n",
            "tlc1;2\n",
            "tlc1;2\n00\n0\n",
            "tlc1;2\n0a\n",
        ];
        for text in cases {
            let err = CoverageMap::from_text(text, &SignalCodec).unwrap_err();
            assert!(matches!(err, GridError::Decode { .. }), "{text:?} -> {err}");
        }
    }

    #[test]
    fn table_dump_handles_wide_values() {
        let map = crate::SaturationMap::new(2, 1, 12, CellCoord::new(3, 4)).unwrap();
        assert_eq!(map.to_table(), "tlc3;4\n12\t12\n");
    }
}

use proptest::prelude::*;
use trackpack_core::*;

const WINDOW_END: i64 = 10_000;

fn arb_items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((-500i64..WINDOW_END + 500, 0i64..3_000, 0u32..40), 0..80).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (start, len, label))| Item::new(i as u64, start, start + len).with_label_pixels(label))
            .collect()
    })
}

fn window() -> Window {
    Window::new(0, WINDOW_END).unwrap()
}

proptest! {
    #[test]
    fn packed_rows_never_overlap(items in arb_items(), max_rows in 1u32..12) {
        let quantizer = Quantizer::new(window(), 256).unwrap();
        let mut saver = SpaceSaver::with_quantizer(quantizer, max_rows).with_label_reservation(true);
        saver.add_all(&items);
        let layout = saver.finish();

        for (row_index, members) in layout.rows().iter().enumerate() {
            if layout.overflow_row == Some(row_index as u32) {
                continue;
            }
            for (a, &first) in members.iter().enumerate() {
                for &second in &members[a + 1..] {
                    let r1 = quantizer.cell_range(Span::new(items[first].start, items[first].end), items[first].label_pixels, true);
                    let r2 = quantizer.cell_range(Span::new(items[second].start, items[second].end), items[second].label_pixels, true);
                    prop_assert!(!r1.intersects(&r2), "row {} items {} and {} overlap", row_index, first, second);
                }
            }
        }
    }

    #[test]
    fn row_count_respects_cap(items in arb_items(), max_rows in 1u32..8, fold in any::<bool>()) {
        let mode = if fold { OverflowMode::Fold } else { OverflowMode::Reject };
        let layout = pack(&items, window(), &LayoutConfig::default(), max_rows, mode, false).unwrap();
        prop_assert!(layout.row_count <= max_rows);
        if fold {
            prop_assert!(layout.is_complete());
            prop_assert_eq!(layout.placed_count(), items.len());
            if layout.overflow_count > 0 {
                prop_assert_eq!(layout.row_count, max_rows);
                prop_assert_eq!(layout.overflow_row, Some(max_rows - 1));
            }
        }
    }

    #[test]
    fn layout_is_deterministic(items in arb_items(), budget in 0u32..200, overflow in any::<bool>()) {
        let config = LayoutConfig::default().with_overflow(overflow);
        let request = LayoutRequest::new(window(), budget, Visibility::Full);
        let first = resolve(&items, &request, &config).unwrap();
        let second = resolve(&items, &request, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn resolver_picks_finest_fitting_level(items in arb_items(), budget in 0u32..200, overflow in any::<bool>()) {
        let config = LayoutConfig::default().with_overflow(overflow);
        let from_full = resolve(&items, &LayoutRequest::new(window(), budget, Visibility::Full), &config).unwrap();
        prop_assert!(from_full.demotions() <= 3);
        if matches!(from_full.level, Visibility::Pack | Visibility::Squish) && !items.is_empty() {
            prop_assert!(budget / from_full.row_height >= 1);
        }

        // no finer level than the chosen one would have fit on its own
        for level in Visibility::LEVELS.iter().copied().filter(|l| *l < from_full.level) {
            let alone = resolve(&items, &LayoutRequest::new(window(), budget, level), &config).unwrap();
            prop_assert!(alone.level > level);
        }
        // starting at the chosen level settles there immediately
        let direct = resolve(&items, &LayoutRequest::new(window(), budget, from_full.level), &config).unwrap();
        prop_assert_eq!(direct.level, from_full.level);
        prop_assert_eq!(direct.demotions(), 0);
    }

    #[test]
    fn zero_length_items_always_land(positions in prop::collection::vec(-100i64..WINDOW_END + 100, 1..50)) {
        let items: Vec<Item> = positions.iter().enumerate().map(|(i, &p)| Item::new(i as u64, p, p)).collect();
        let layout = pack(&items, window(), &LayoutConfig::default(), items.len() as u32, OverflowMode::Reject, false).unwrap();
        prop_assert!(layout.is_complete());
        prop_assert_eq!(layout.placed_count(), items.len());
    }
}

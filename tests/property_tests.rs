use pinclump::cluster::{AnnotationTree, ClusteringAlgorithm, GridClustering};
use pinclump::{
    Annotation, AnnotationId, DatasetGenerator, GeoPoint, MapPoint, MapRect, ScreenSize, Viewport,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn center() -> impl Strategy<Value = GeoPoint> {
    (-89.0f64..89.0, -180.0f64..179.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng).unwrap())
}

fn map_rect() -> impl Strategy<Value = MapRect> {
    let world = pinclump::geo::WORLD_SIZE;
    (0.0..world, 0.0..world, 1.0e3..world / 2.0, 1.0e3..world / 2.0)
        .prop_map(|(x, y, w, h)| MapRect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn prop_generate_length_and_window(
        count in 0usize..200,
        a in center(),
        b in center(),
        seed in any::<u64>(),
    ) {
        let out = DatasetGenerator::seeded(seed).generate(count, [a, b]).unwrap();
        prop_assert_eq!(out.len(), 2 * (count / 2));

        for (i, ann) in out.iter().enumerate() {
            let c = if i % 2 == 0 { a } else { b };
            let p = ann.coordinate();
            prop_assert!((p.latitude() - c.latitude()).abs() < 1.0);
            prop_assert!((p.longitude() - c.longitude()).abs() < 1.0);
        }
    }

    #[test]
    fn prop_generate_reproducible(count in 0usize..100, seed in any::<u64>()) {
        let centers = [
            GeoPoint::new(40.77, -73.98).unwrap(),
            GeoPoint::new(37.85, -122.68).unwrap(),
        ];
        let first = DatasetGenerator::seeded(seed).generate(count, centers).unwrap();
        let second = DatasetGenerator::seeded(seed).generate(count, centers).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_tree_search_matches_scan(
        points in prop::collection::vec((-80.0f64..80.0, -179.0f64..179.0), 0..150),
        rect in map_rect(),
    ) {
        let annotations: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng))| {
                Annotation::new(AnnotationId(i as u64), GeoPoint::new(lat, lng).unwrap())
            })
            .collect();
        let tree = AnnotationTree::new(annotations.clone());

        let mut found: Vec<u64> = tree.search(&rect).iter().map(|a| a.id().0).collect();
        found.sort_unstable();
        let expected: Vec<u64> = annotations
            .iter()
            .filter(|a| rect.contains(&MapPoint::from_geo(&a.coordinate())))
            .map(|a| a.id().0)
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_clustering_partitions_visible_annotations(
        count in 0usize..300,
        a in center(),
        b in center(),
        rect in map_rect(),
        two_phase in any::<bool>(),
    ) {
        let annotations = DatasetGenerator::seeded(7).generate(count, [a, b]).unwrap();
        let tree = AnnotationTree::new(annotations);
        let viewport = Viewport::new(rect, ScreenSize::new(320.0, 480.0)).unwrap();

        let strategy = if two_phase {
            pinclump::Strategy::TwoPhase
        } else {
            pinclump::Strategy::Basic
        };
        let items = GridClustering::default()
            .with_strategy(strategy)
            .cluster(&viewport, &tree)
            .unwrap();

        let mut seen = HashSet::new();
        for item in &items {
            prop_assert!(item.count() >= 1);
            for ann in item.annotations() {
                prop_assert!(seen.insert(ann.id()));
            }
        }
        // Everything inside the viewport itself is always shown.
        for ann in tree.search(viewport.rect()) {
            prop_assert!(seen.contains(&ann.id()));
        }
    }

    #[test]
    fn prop_two_phase_never_adds_items(
        count in 0usize..300,
        a in center(),
        b in center(),
        rect in map_rect(),
    ) {
        let annotations = DatasetGenerator::seeded(3).generate(count, [a, b]).unwrap();
        let tree = AnnotationTree::new(annotations);
        let viewport = Viewport::new(rect, ScreenSize::new(320.0, 480.0)).unwrap();

        let basic = GridClustering::default().cluster(&viewport, &tree).unwrap();
        let merged = GridClustering::default()
            .with_strategy(pinclump::Strategy::TwoPhase)
            .cluster(&viewport, &tree)
            .unwrap();
        prop_assert!(merged.len() <= basic.len());
    }
}

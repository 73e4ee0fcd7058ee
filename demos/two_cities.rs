//! Two-phase clustering of 1000 markers around New York and San Francisco.
//!
//! Run with `RUST_LOG=debug` to see the clustering passes.

use pinclump::{
    ClusteringConfig, ClusteringController, DatasetGenerator, DisplayItem, GeoPoint, Region,
    ScreenSize, Strategy, Viewport,
};

const NUMBER_OF_ANNOTATIONS: usize = 1000;

fn main() -> pinclump::Result<()> {
    env_logger::init();

    let nyc = GeoPoint::new(40.77, -73.98)?;
    let sf = GeoPoint::new(37.85, -122.68)?;

    let mut generator = DatasetGenerator::from_entropy();
    let annotations = generator.generate(NUMBER_OF_ANNOTATIONS, [nyc, sf])?;

    let config = ClusteringConfig::default()
        .with_annotation_size(ScreenSize::new(25.0, 50.0))
        .with_strategy(Strategy::TwoPhase);
    let mut controller = ClusteringController::new(config);
    controller.set_policy(|| true);
    controller.set_annotations(annotations);

    let screen = ScreenSize::new(375.0, 667.0);
    let region = Region::new(nyc, 400_000.0, 400_000.0);
    let items = controller.refresh(&Viewport::from_region(&region, screen)?)?.to_vec();

    println!("=== {} items around New York ===", items.len());
    for item in &items {
        let c = item.coordinate();
        match item {
            DisplayItem::Cluster(cluster) => println!(
                "  cluster  ({:8.4}, {:9.4})  {:4} members, radius {:7.0} m",
                c.latitude(),
                c.longitude(),
                cluster.count(),
                cluster.radius()
            ),
            DisplayItem::Individual(a) => println!(
                "  pin {} ({:8.4}, {:9.4})",
                a.id(),
                c.latitude(),
                c.longitude()
            ),
        }
    }

    // Select the largest cluster and zoom to it, as a map would on tap.
    let largest = items.iter().max_by_key(|i| i.count());
    if let Some(region) = largest.and_then(|item| controller.zoom_region_for(item)) {
        println!(
            "\nzooming to ({:.4}, {:.4}), span {:.0} m",
            region.center.latitude(),
            region.center.longitude(),
            region.latitudinal_meters
        );
        let items = controller.refresh(&Viewport::from_region(&region, screen)?)?;
        println!("=== {} items after zoom ===", items.len());
    }

    Ok(())
}

extern crate vpindex;

use vpindex::{MetricItem, VPTree};

#[derive(Debug, PartialEq)]
struct Point {
    x: f32,
    y: f32
}
impl Point {
    fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

impl MetricItem<f32> for Point {
    fn distance(&self, q: &Self) -> f32 {
        let dx = self.x - q.x;
        let dy = self.y - q.y;
        (dx*dx + dy*dy).sqrt()
    }
}

#[test]
fn point_check() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);

    assert_eq!(a.distance(&b), 1.0);
}

fn lattice_points(n: usize) -> Vec<Point> {
    (0..n).flat_map( |i| {
        (0..n).map(move |j| {
            Point::new(i as f32, j as f32)
        })
    }).collect()
}

#[test]
fn lattice_vpn() {
    let points: Vec<Point> = lattice_points(20);

    let tree = VPTree::new(points);

    let x = tree.nearest_neighbor(&Point::new(4.1, 4.0)).unwrap().item;
    assert_eq!(x.x, 4.0);
    assert_eq!(x.y, 4.0);

    let ps = tree.nearest_neighbors(&Point::new(4.46, 4.4), 4).unwrap();
    assert_eq!(ps.len(), 4);
    assert_eq!(ps[0].item, &Point::new(4.0, 4.0));
    assert_eq!(ps[1].item, &Point::new(5.0, 4.0));
    assert_eq!(ps[2].item, &Point::new(4.0, 5.0));
    assert_eq!(ps[3].item, &Point::new(5.0, 5.0));
}

#[test]
fn lattice_ring() {
    let tree = VPTree::new(lattice_points(20));

    // The four axis neighbours of an interior point, and the point itself.
    let found = tree.within(&Point::new(7.0, 7.0), 1.0).unwrap();
    assert_eq!(found.len(), 5);

    // Only the corner itself and its two neighbours lie within 1.2.
    let found = tree.nearest_within(&Point::new(0.0, 0.0), 1.2, 10).unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].item, &Point::new(0.0, 0.0));
    assert_eq!(found[0].distance, 0.0);
}

#[test]
fn lattice_closest_pairs() {
    let tree = VPTree::new(lattice_points(6));

    // Every horizontally or vertically adjacent pair is 1 apart.
    let pairs = tree.closest_pairs(1000, 1.0).unwrap();
    assert_eq!(pairs.len(), 2 * 6 * 5);
    assert!(pairs.iter().all(|p| p.distance == 1.0));

    let pairs = tree.closest_pairs(7, 1.5).unwrap();
    assert_eq!(pairs.len(), 7);
    assert!(pairs.iter().all(|p| p.distance == 1.0));
}

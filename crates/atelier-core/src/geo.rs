//! Store geography: great-circle distance and nearby-store ranking.

use crate::models::Store;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two lat/lon points, in km
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Annotate every store with its distance from the reference point.
///
/// Stores without a location stay displayable with `distance = None`.
/// Copy-producing; input order preserved.
pub fn annotate_distances(stores: &[Store], lat: f64, lon: f64) -> Vec<Store> {
    stores
        .iter()
        .map(|store| {
            let mut annotated = store.clone();
            annotated.distance = store
                .location
                .map(|loc| haversine(lat, lon, loc.lat, loc.lng));
            annotated
        })
        .collect()
}

/// Stores within `radius_km` of the reference point, nearest first.
///
/// Stores lacking a valid location are excluded from the ranking.
pub fn nearby_stores(stores: &[Store], lat: f64, lon: f64, radius_km: f64) -> Vec<Store> {
    let mut nearby: Vec<Store> = annotate_distances(stores, lat, lon)
        .into_iter()
        .filter(|store| matches!(store.distance, Some(d) if d <= radius_km))
        .collect();

    nearby.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    nearby
}

/// Stores stocking a given product
pub fn stores_with_product(stores: &[Store], product_id: &str) -> Vec<Store> {
    stores
        .iter()
        .filter(|store| store.products.iter().any(|id| id == product_id))
        .cloned()
        .collect()
}

/// Human-readable distance label ("2.4 km", or "Unknown" when unranked)
pub fn format_distance(distance: Option<f64>) -> String {
    match distance {
        Some(d) => format!("{:.1} km", d),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoreLocation;

    fn store(id: &str, location: Option<(f64, f64)>) -> Store {
        Store {
            id: id.to_string(),
            name: format!("Store {}", id),
            address: "1 Main St".to_string(),
            phone: "555-0100".to_string(),
            location: location.map(|(lat, lng)| StoreLocation { lat, lng }),
            rating: 4.0,
            products: Vec::new(),
            distance: None,
        }
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        assert_eq!(haversine(10.8444, 106.7639, 10.8444, 106.7639), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Ho Chi Minh City to Hanoi, roughly 1140-1170 km
        let d = haversine(10.7769, 106.7009, 21.0285, 105.8542);
        assert!(d > 1100.0 && d < 1200.0, "got {}", d);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let ab = haversine(10.0, 106.0, 10.5, 106.5);
        let ba = haversine(10.5, 106.5, 10.0, 106.0);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_annotate_keeps_locationless_stores() {
        let stores = vec![store("a", Some((10.85, 106.77))), store("b", None)];

        let annotated = annotate_distances(&stores, 10.8444, 106.7639);
        assert_eq!(annotated.len(), 2);
        assert!(annotated[0].distance.is_some());
        assert!(annotated[1].distance.is_none());
    }

    #[test]
    fn test_nearby_sorted_ascending_and_bounded() {
        let stores = vec![
            // ~15 km north
            store("far", Some((10.98, 106.7639))),
            // right next door
            store("near", Some((10.845, 106.764))),
            // ~5.5 km north
            store("mid", Some((10.894, 106.7639))),
            store("nowhere", None),
        ];

        let nearby = nearby_stores(&stores, 10.8444, 106.7639, 10.0);
        let ids: Vec<&str> = nearby.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);

        let d0 = nearby[0].distance.unwrap();
        let d1 = nearby[1].distance.unwrap();
        assert!(d0 <= d1);
        assert!(d1 <= 10.0);
    }

    #[test]
    fn test_nearby_does_not_mutate_input() {
        let stores = vec![store("a", Some((10.85, 106.77)))];
        let _ = nearby_stores(&stores, 10.8444, 106.7639, 10.0);
        assert!(stores[0].distance.is_none());
    }

    #[test]
    fn test_stores_with_product() {
        let mut a = store("a", None);
        a.products = vec!["p1".to_string(), "p2".to_string()];
        let b = store("b", None);

        let hits = stores_with_product(&[a, b], "p2");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Some(2.44)), "2.4 km");
        assert_eq!(format_distance(None), "Unknown");
    }
}

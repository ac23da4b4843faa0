//! Built-in store directory.
//!
//! The catalog backend doesn't serve store data yet, so the app ships
//! with the known retail locations baked in. Replace with an API call
//! once the backend grows a /stores endpoint.

use crate::models::{Store, StoreLocation};

/// The retail locations we know about
pub fn builtin_stores() -> Vec<Store> {
    vec![
        store(
            "store1",
            "Art Supply Central",
            "78 Đ Quoc Lo 13 cu, Hiep Binh Phuoc, Thu Duc, Ho Chi Minh",
            "+84-28-1234-5678",
            (10.8444, 106.7639),
            &["1", "2", "4", "7"],
            4.5,
        ),
        store(
            "store2",
            "Creative Arts Store",
            "123 Nguyễn Văn Linh, Hải Châu, Đà Nẵng",
            "+84-236-123-456",
            (16.0544, 108.2022),
            &["1", "3", "5", "8"],
            4.2,
        ),
        store(
            "store3",
            "Artists Paradise",
            "456 Lê Duẩn, Hai Bà Trưng, Hà Nội",
            "+84-24-1234-5678",
            (21.0285, 105.8542),
            &["2", "6", "9", "10"],
            4.8,
        ),
        store(
            "store4",
            "Hue Art Supplies",
            "789 Lê Lợi, Phú Hội, Huế",
            "+84-234-123-456",
            (16.4637, 107.5909),
            &["3", "4", "5"],
            4.3,
        ),
    ]
}

fn store(
    id: &str,
    name: &str,
    address: &str,
    phone: &str,
    (lat, lng): (f64, f64),
    products: &[&str],
    rating: f64,
) -> Store {
    Store {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        location: Some(StoreLocation { lat, lng }),
        rating,
        products: products.iter().map(|p| p.to_string()).collect(),
        distance: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;

    #[test]
    fn test_builtin_stores_all_have_locations() {
        let stores = builtin_stores();
        assert_eq!(stores.len(), 4);
        assert!(stores.iter().all(|s| s.location.is_some()));
    }

    #[test]
    fn test_flagship_store_is_at_the_default_coordinate() {
        let stores = builtin_stores();
        let flagship = stores.iter().find(|s| s.id == "store1").unwrap();
        let loc = flagship.location.unwrap();
        assert_eq!(geo::haversine(10.8444, 106.7639, loc.lat, loc.lng), 0.0);
    }

    #[test]
    fn test_every_store_stocks_something() {
        assert!(builtin_stores().iter().all(|s| !s.products.is_empty()));
    }
}

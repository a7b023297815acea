//! Generated sample catalog used when the product API is unreachable.

use rand::Rng;
use rust_decimal::Decimal;
use zapkart_core::{Product, ProductId};

/// Number of products in the sample catalog.
pub const SAMPLE_CATALOG_SIZE: usize = 30;

const CATEGORIES: [&str; 6] = ["electronics", "fashion", "home", "sports", "books", "toys"];
const BRANDS: [&str; 5] = ["Apple", "Samsung", "Nike", "Adidas", "Sony"];

/// Generate the sample catalog.
///
/// Names, categories, brands and images are deterministic; price, discount,
/// rating and stock are random within fixed ranges.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    let mut rng = rand::rng();

    (1..=SAMPLE_CATALOG_SIZE)
        .zip(CATEGORIES.iter().cycle())
        .zip(BRANDS.iter().cycle())
        .map(|((n, category), brand)| {
            let name = format!("Premium Product {n}");
            let image = format!("https://picsum.photos/seed/product{n}/800/600");

            Product {
                id: ProductId::from(format!("mock-{n}")),
                title: Some(name.clone()),
                name: Some(name),
                description: None,
                category: (*category).to_string(),
                price: Decimal::from(rng.random_range(50_i64..550)),
                discount_percentage: Decimal::from(rng.random_range(0_i64..30)),
                // One decimal place, 3.0 to 5.0
                rating: Decimal::new(rng.random_range(30..=50), 1),
                stock: rng.random_range(1..=100),
                brand: Some((*brand).to_string()),
                thumbnail: Some(image.clone()),
                image: Some(image),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let products = sample_products();
        assert_eq!(products.len(), SAMPLE_CATALOG_SIZE);

        let first = &products[0];
        assert_eq!(first.id, ProductId::from("mock-1"));
        assert_eq!(first.display_name(), "Premium Product 1");
        assert_eq!(first.category, "electronics");
        assert_eq!(first.brand.as_deref(), Some("Apple"));
        assert_eq!(
            first.display_image(),
            "https://picsum.photos/seed/product1/800/600"
        );

        assert_eq!(products[6].category, "electronics");
        assert_eq!(products[5].brand.as_deref(), Some("Apple"));
        assert_eq!(products[29].category, "toys");
    }

    #[test]
    fn test_sample_ranges() {
        for product in sample_products() {
            assert!(product.price >= Decimal::from(50) && product.price < Decimal::from(550));
            assert!(product.discount_percentage < Decimal::from(30));
            assert!(product.rating >= Decimal::from(3) && product.rating <= Decimal::from(5));
            assert!((1..=100).contains(&product.stock));
        }
    }
}

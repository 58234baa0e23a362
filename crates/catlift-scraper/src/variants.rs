//! Variant expansion.

use catlift_core::{Variant, INVENTORY_MANAGEMENT, INVENTORY_POLICY};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound (inclusive) of a generated inventory quantity.
pub const MAX_INVENTORY_QUANTITY: u32 = 1000;

/// Supplies the placeholder `inventory_quantity` of generated variants.
///
/// The quantity is not scraped; it is generated when variants are built.
pub trait InventorySource {
    fn next_quantity(&mut self) -> u32;
}

/// Uniformly random quantities in `0..=MAX_INVENTORY_QUANTITY`.
#[derive(Debug)]
pub struct RandomInventory<R> {
    rng: R,
}

impl RandomInventory<StdRng> {
    /// Seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible sequence for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomInventory<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> InventorySource for RandomInventory<R> {
    fn next_quantity(&mut self) -> u32 {
        self.rng.random_range(0..=MAX_INVENTORY_QUANTITY)
    }
}

/// Always the same quantity.
#[derive(Debug, Clone, Copy)]
pub struct FixedInventory(pub u32);

impl InventorySource for FixedInventory {
    fn next_quantity(&mut self) -> u32 {
        self.0
    }
}

/// One variant per entry of `sizes`, in order, all sharing `option1`, `sku`
/// and `price`.
///
/// An empty `sizes` list yields no variants.
pub fn build_variants(
    option1: &str,
    sizes: &[String],
    sku: Option<&str>,
    price: Option<&str>,
    inventory: &mut dyn InventorySource,
) -> Vec<Variant> {
    sizes
        .iter()
        .map(|size| Variant {
            option1: option1.to_string(),
            option2: Some(size.clone()),
            sku: sku.map(ToString::to_string),
            price: price.map(ToString::to_string),
            compare_at_price: String::new(),
            inventory_quantity: inventory.next_quantity(),
            inventory_management: INVENTORY_MANAGEMENT.to_string(),
            inventory_policy: INVENTORY_POLICY.to_string(),
        })
        .collect()
}

/// The single variant of a page that offers no secondary option.
pub fn build_single_variant(
    option1: &str,
    sku: Option<&str>,
    price: Option<&str>,
    inventory: &mut dyn InventorySource,
) -> Variant {
    Variant {
        option1: option1.to_string(),
        option2: None,
        sku: sku.map(ToString::to_string),
        price: price.map(ToString::to_string),
        compare_at_price: String::new(),
        inventory_quantity: inventory.next_quantity(),
        inventory_management: INVENTORY_MANAGEMENT.to_string(),
        inventory_policy: INVENTORY_POLICY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn one_variant_per_size_in_order() {
        let variants = build_variants(
            "Navy",
            &sizes(&["S", "M", "L"]),
            Some("123"),
            Some("€25.00"),
            &mut FixedInventory(7),
        );

        let pairs: Vec<_> = variants.iter().map(Variant::option_pair).collect();
        assert_eq!(
            pairs,
            vec![("Navy", Some("S")), ("Navy", Some("M")), ("Navy", Some("L"))]
        );
        for variant in &variants {
            assert_eq!(variant.sku.as_deref(), Some("123"));
            assert_eq!(variant.price.as_deref(), Some("€25.00"));
            assert_eq!(variant.compare_at_price, "");
            assert_eq!(variant.inventory_quantity, 7);
            assert_eq!(variant.inventory_management, "shopify");
            assert_eq!(variant.inventory_policy, "deny");
        }
    }

    #[test]
    fn no_sizes_no_variants() {
        let variants = build_variants("Navy", &[], None, None, &mut FixedInventory(1));
        assert!(variants.is_empty());
    }

    #[test]
    fn single_variant_has_no_option2() {
        let variant = build_single_variant("Navy", None, Some("10"), &mut FixedInventory(3));
        assert_eq!(variant.option_pair(), ("Navy", None));
        assert_eq!(variant.inventory_quantity, 3);
    }

    #[test]
    fn random_quantities_stay_in_range_and_are_reproducible() {
        let mut first = RandomInventory::seeded(42);
        let mut second = RandomInventory::seeded(42);
        for _ in 0..200 {
            let a = first.next_quantity();
            assert!(a <= MAX_INVENTORY_QUANTITY, "quantity out of range: {a}");
            assert_eq!(a, second.next_quantity());
        }
    }
}

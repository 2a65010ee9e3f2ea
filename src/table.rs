//! Table view projection: field comparators and sort order applied to a
//! snapshot of the product collection. Sorting is a purely local view
//! concern over already-fetched data and never triggers a fetch.

use crate::domain::{ProductRecord, SortColumn, SortOrder, SortState};
use std::cmp::Ordering;

/// Produce the rows in table order. `SortOrder::None` returns the received
/// order untouched; the sort is stable, so equal keys keep their relative
/// positions under `Ascend`/`Descend`.
pub fn sorted_view(products: &[ProductRecord], sort: &SortState) -> Vec<ProductRecord> {
    let mut rows: Vec<ProductRecord> = products.to_vec();
    if sort.order == SortOrder::None {
        return rows;
    }

    rows.sort_by(|a, b| {
        let ordering = compare_column(a, b, sort.column);
        match sort.order {
            SortOrder::Descend => ordering.reverse(),
            _ => ordering,
        }
    });
    rows
}

fn compare_column(a: &ProductRecord, b: &ProductRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => compare_names(&a.name, &b.name),
        SortColumn::Price => compare_numeric(a.price, b.price),
        SortColumn::DiscountedPrice => compare_numeric(a.discounted_price, b.discounted_price),
        SortColumn::Rating => compare_numeric(a.rating, b.rating),
        SortColumn::ReviewsCount => a.reviews_count.cmp(&b.reviews_count),
    }
}

/// Case-insensitive lexicographic comparison with a byte-order tiebreak, so
/// names differing only in case still order deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_numeric(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, name: &str, price: f64) -> ProductRecord {
        ProductRecord {
            id,
            name: name.to_string(),
            price,
            discounted_price: price,
            rating: 4.0,
            reviews_count: id as u32 * 10,
        }
    }

    #[test]
    fn price_ascend_orders_numerically() {
        let products = vec![product(1, "A", 50.0), product(2, "B", 10.0), product(3, "C", 30.0)];
        let sort = SortState {
            column: SortColumn::Price,
            order: SortOrder::Ascend,
        };
        let prices: Vec<f64> = sorted_view(&products, &sort).iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![10.0, 30.0, 50.0]);
    }

    #[test]
    fn price_descend_reverses_the_comparator() {
        let products = vec![product(1, "A", 50.0), product(2, "B", 10.0), product(3, "C", 30.0)];
        let sort = SortState {
            column: SortColumn::Price,
            order: SortOrder::Descend,
        };
        let prices: Vec<f64> = sorted_view(&products, &sort).iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![50.0, 30.0, 10.0]);
    }

    #[test]
    fn none_keeps_received_order() {
        let products = vec![product(1, "C", 50.0), product(2, "A", 10.0), product(3, "B", 30.0)];
        let sort = SortState {
            column: SortColumn::Price,
            order: SortOrder::None,
        };
        let ids: Vec<u64> = sorted_view(&products, &sort).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let products = vec![
            product(1, "banana stand", 1.0),
            product(2, "Apple crate", 2.0),
            product(3, "cherry box", 3.0),
        ];
        let sort = SortState {
            column: SortColumn::Name,
            order: SortOrder::Ascend,
        };
        let names: Vec<String> = sorted_view(&products, &sort)
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["Apple crate", "banana stand", "cherry box"]);
    }

    #[test]
    fn reviews_descend_uses_integer_compare() {
        let products = vec![product(1, "A", 1.0), product(3, "B", 2.0), product(2, "C", 3.0)];
        let sort = SortState {
            column: SortColumn::ReviewsCount,
            order: SortOrder::Descend,
        };
        let counts: Vec<u32> = sorted_view(&products, &sort)
            .iter()
            .map(|p| p.reviews_count)
            .collect();
        assert_eq!(counts, vec![30, 20, 10]);
    }

    #[test]
    fn sort_does_not_mutate_the_input_collection() {
        let products = vec![product(1, "B", 50.0), product(2, "A", 10.0)];
        let sort = SortState {
            column: SortColumn::Name,
            order: SortOrder::Ascend,
        };
        let _ = sorted_view(&products, &sort);
        assert_eq!(products[0].id, 1);
    }
}

//! Property-based tests for specdsl using proptest.

use proptest::prelude::*;
use specdsl::{
    paged, Direction, Entity, Order, Repository, Sort, Specification, SpecificationExecutor,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Entity)]
struct Item {
    value: i64,
    name: String,
    score: Option<i32>,
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (0i64..20, "[a-z]{1,6}", prop::option::of(-50i32..50)).prop_map(|(value, name, score)| {
        Item { value, name, score }
    })
}

fn order_strategy() -> impl Strategy<Value = Order> {
    (
        prop::sample::select(vec!["value", "name", "score"]),
        any::<bool>(),
    )
        .prop_map(|(property, descending)| {
            let direction = if descending {
                Direction::Desc
            } else {
                Direction::Asc
            };
            Order::new(direction, property)
        })
}

fn sort_strategy() -> impl Strategy<Value = Sort> {
    prop::collection::vec(order_strategy(), 0..4).prop_map(|orders| Sort::by(orders))
}

fn everything() -> Specification<Item> {
    Specification::unrestricted()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// ANDing with the unrestricted specification changes nothing.
    #[test]
    fn unrestricted_is_and_identity(
        items in prop::collection::vec(item_strategy(), 0..50),
        threshold in 0i64..20,
    ) {
        let repo = Repository::from(items);
        let spec = Item::VALUE.gt(threshold);

        let alone = repo.find_all(&spec).unwrap();
        let left = repo.find_all(&(everything() & spec.clone())).unwrap();
        let right = repo.find_all(&(spec & everything())).unwrap();

        prop_assert_eq!(&alone, &left);
        prop_assert_eq!(&alone, &right);
    }

    /// `is_in` keeps exactly the records whose value is listed.
    #[test]
    fn is_in_matches_members(
        items in prop::collection::vec(item_strategy(), 0..50),
        listed in prop::collection::vec(0i64..20, 1..6),
    ) {
        let repo = Repository::from(items.clone());
        let found = repo.find_all(&Item::VALUE.is_in(listed.clone())).unwrap();

        let expected: Vec<&Item> = items.iter().filter(|i| listed.contains(&i.value)).collect();
        prop_assert_eq!(found.len(), expected.len());
        prop_assert!(found.iter().all(|i| listed.contains(&i.value)));
    }

    /// For non-null attributes and a non-empty list, `is_not_in` is the
    /// complement of `is_in`.
    #[test]
    fn is_not_in_complements_is_in(
        items in prop::collection::vec(item_strategy(), 0..50),
        listed in prop::collection::vec(0i64..20, 1..6),
    ) {
        let repo = Repository::from(items);
        let inside = repo.count(&Item::VALUE.is_in(listed.clone())).unwrap();
        let outside = repo.count(&Item::VALUE.is_not_in(listed)).unwrap();

        prop_assert_eq!(inside + outside, repo.len());
    }

    /// Empty membership lists do not restrict the query.
    #[test]
    fn empty_lists_are_unrestricted(
        items in prop::collection::vec(item_strategy(), 0..50),
    ) {
        let repo = Repository::from(items);
        let none: Vec<i64> = Vec::new();

        prop_assert_eq!(repo.count(&Item::VALUE.is_in(none.clone())).unwrap(), repo.len());
        prop_assert_eq!(repo.count(&Item::VALUE.is_not_in(none)).unwrap(), repo.len());
    }

    /// A predicate, its negation and the records where it is unknown
    /// partition the records.
    #[test]
    fn negation_partitions_with_nulls(
        items in prop::collection::vec(item_strategy(), 0..50),
        threshold in -50i32..50,
    ) {
        let repo = Repository::from(items);
        let spec = Item::SCORE.ge(threshold);

        let held = repo.count(&spec).unwrap();
        let failed = repo.count(&!spec).unwrap();
        let unknown = repo.count(&Item::SCORE.is_null()).unwrap();

        prop_assert_eq!(held + failed + unknown, repo.len());
    }

    /// `%` matches every string and a pattern without wildcards is equality.
    #[test]
    fn like_without_wildcards_is_equality(
        items in prop::collection::vec(item_strategy(), 0..50),
        name in "[a-z]{1,6}",
    ) {
        let repo = Repository::from(items);

        prop_assert_eq!(repo.count(&Item::NAME.like("%")).unwrap(), repo.len());
        prop_assert_eq!(
            repo.find_all(&Item::NAME.like(name.clone())).unwrap(),
            repo.find_all(&Item::NAME.equal(name)).unwrap()
        );
    }

    /// Sort concatenation is associative.
    #[test]
    fn sort_concatenation_is_associative(
        a in sort_strategy(),
        b in sort_strategy(),
        c in sort_strategy(),
    ) {
        let left = a.clone().and(b.clone()).and(c.clone());
        let right = a.and(b.and(c));
        prop_assert_eq!(left, right);
    }

    /// Paging then sorting equals sorting then paging.
    #[test]
    fn paging_and_sorting_commute(
        sort in sort_strategy(),
        page in 0usize..100,
        size in 1usize..100,
    ) {
        let page_first = paged(page, size).unwrap().sorted_by(sort.clone());
        let sort_first = sort.paged(page, size).unwrap();
        prop_assert_eq!(page_first, sort_first);
    }

    /// Pages never exceed their size, and together cover the sorted result.
    #[test]
    fn pages_cover_sorted_results(
        items in prop::collection::vec(item_strategy(), 0..60),
        sort in sort_strategy(),
        size in 1usize..10,
    ) {
        let repo = Repository::from(items);
        let spec = everything();
        let all = repo.find_all_sorted(&spec, &sort).unwrap();

        let mut collected = Vec::new();
        let mut request = sort.paged(0, size).unwrap();
        loop {
            let page = repo.find_page(&spec, request.clone()).unwrap();
            prop_assert!(page.number_of_elements() <= size);
            prop_assert_eq!(page.total_elements(), all.len());
            let last = page.is_last();
            collected.extend(page);
            if last {
                break;
            }
            request = request.next();
        }

        prop_assert_eq!(collected, all);
    }

    /// Ascending sorts are non-decreasing and descending ones non-increasing.
    #[test]
    fn sorted_results_are_ordered(
        items in prop::collection::vec(item_strategy(), 0..50),
        descending in any::<bool>(),
    ) {
        let repo = Repository::from(items);
        let order = if descending { Item::VALUE.desc() } else { Item::VALUE.asc() };
        let sorted = repo.find_all_sorted(&everything(), &Sort::from(order)).unwrap();

        for pair in sorted.windows(2) {
            if descending {
                prop_assert!(pair[0].value >= pair[1].value);
            } else {
                prop_assert!(pair[0].value <= pair[1].value);
            }
        }
    }

    /// Sorting is stable: records with equal keys keep insertion order.
    #[test]
    fn sorting_is_stable(
        items in prop::collection::vec(item_strategy(), 0..50),
    ) {
        let repo = Repository::from(items.clone());
        let sorted = repo.find_all_sorted(&everything(), &Sort::from(Item::VALUE.asc())).unwrap();

        let mut expected: Vec<&Item> = items.iter().collect();
        expected.sort_by_key(|i| i.value);
        prop_assert_eq!(sorted, expected);
    }
}

use diffnet::split::{
    random_disjoint_intersection_three_subsets, split_random_three_subsets,
    split_random_two_subsets, three_venn_regions,
};
use std::collections::{BTreeMap, HashSet};

fn label_set(names: &[&str]) -> HashSet<Box<str>> {
    names.iter().map(|x| Box::from(*x)).collect()
}

#[test]
fn two_way_split_is_a_disjoint_cover() {
    let labels: Vec<Box<str>> = (0..11).map(|i| format!("e{}", i).into()).collect();

    for _ in 0..20 {
        let (train, validation) = split_random_two_subsets(&labels);

        assert_eq!(train.len(), labels.len() / 2);
        assert_eq!(train.len() + validation.len(), labels.len());

        let train_set: HashSet<&Box<str>> = train.iter().collect();
        let validation_set: HashSet<&Box<str>> = validation.iter().collect();
        assert!(train_set.is_disjoint(&validation_set));

        let union: HashSet<&Box<str>> = train_set.union(&validation_set).copied().collect();
        assert_eq!(union.len(), labels.len());
    }
}

#[test]
fn three_way_split_covers_everything_once() {
    let labels: Vec<Box<str>> = (0..10).map(|i| format!("e{}", i).into()).collect();
    let (a, b, c) = split_random_three_subsets(&labels);

    assert_eq!(a.len(), labels.len() / 3);
    assert_eq!(a.len() + b.len() + c.len(), labels.len());

    let mut all: Vec<&Box<str>> = a.iter().chain(b.iter()).chain(c.iter()).collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), labels.len());
}

#[test]
fn venn_regions_partition_the_union() {
    let set1 = label_set(&["a", "b", "ab", "ac", "abc"]);
    let set2 = label_set(&["c", "ab", "bc", "abc"]);
    let set3 = label_set(&["d", "ac", "bc", "abc"]);

    let regions = three_venn_regions(&set1, &set2, &set3);

    assert_eq!(regions.unique_1, label_set(&["a", "b"]));
    assert_eq!(regions.unique_2, label_set(&["c"]));
    assert_eq!(regions.unique_3, label_set(&["d"]));
    assert_eq!(regions.pair_12, label_set(&["ab"]));
    assert_eq!(regions.pair_13, label_set(&["ac"]));
    assert_eq!(regions.pair_23, label_set(&["bc"]));
    assert_eq!(regions.core, label_set(&["abc"]));
}

#[test]
fn disjoint_three_way_preserves_the_union() -> anyhow::Result<()> {
    let mut sets: BTreeMap<Box<str>, HashSet<Box<str>>> = BTreeMap::new();
    sets.insert(
        "genes".into(),
        label_set(&["g1", "g2", "gm1", "gb1", "core1", "core2"]),
    );
    sets.insert(
        "metabolites".into(),
        label_set(&["m1", "gm1", "mb1", "core1", "core2"]),
    );
    sets.insert(
        "bps".into(),
        label_set(&["b1", "b2", "gb1", "mb1", "core1", "core2"]),
    );

    let input_union: HashSet<Box<str>> = sets.values().flatten().cloned().collect();

    for _ in 0..20 {
        let remapped = random_disjoint_intersection_three_subsets(&sets)?;
        assert_eq!(remapped.len(), 3);

        let outputs: Vec<&HashSet<Box<str>>> = remapped.values().collect();
        for i in 0..outputs.len() {
            for j in (i + 1)..outputs.len() {
                assert!(outputs[i].is_disjoint(outputs[j]));
            }
        }

        let output_union: HashSet<Box<str>> = remapped.values().flatten().cloned().collect();
        assert_eq!(output_union, input_union);

        // unique regions never move
        assert!(remapped["genes"].contains("g1"));
        assert!(remapped["metabolites"].contains("m1"));
        assert!(remapped["bps"].contains("b1"));
    }
    Ok(())
}

#[test]
fn disjoint_three_way_requires_three_categories() {
    let mut sets: BTreeMap<Box<str>, HashSet<Box<str>>> = BTreeMap::new();
    sets.insert("genes".into(), label_set(&["g1"]));
    sets.insert("bps".into(), label_set(&["b1"]));
    assert!(random_disjoint_intersection_three_subsets(&sets).is_err());
}

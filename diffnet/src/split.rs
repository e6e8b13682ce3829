use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};

/// Randomly partition a label collection roughly in half: `floor(n/2)`
/// labels to the first subset, the remainder to the second. Fresh randomness
/// on every call; nothing is cached or seeded.
pub fn split_random_two_subsets<T: Clone>(labels: &[T]) -> (Vec<T>, Vec<T>) {
    let mut shuffled: Vec<T> = labels.to_vec();
    shuffled.shuffle(&mut rand::rng());
    let rest = shuffled.split_off(shuffled.len() / 2);
    (shuffled, rest)
}

/// Randomly partition a label collection into thirds
pub fn split_random_three_subsets<T: Clone>(labels: &[T]) -> (Vec<T>, Vec<T>, Vec<T>) {
    let mut shuffled: Vec<T> = labels.to_vec();
    shuffled.shuffle(&mut rand::rng());
    let rest = shuffled.split_off(shuffled.len() / 3);
    let (second, third) = split_random_two_subsets(&rest);
    (shuffled, second, third)
}

/// The seven regions of a three-set Venn diagram
pub struct VennRegions {
    pub unique_1: HashSet<Box<str>>,
    pub unique_2: HashSet<Box<str>>,
    pub unique_3: HashSet<Box<str>>,
    pub pair_12: HashSet<Box<str>>,
    pub pair_13: HashSet<Box<str>>,
    pub pair_23: HashSet<Box<str>>,
    pub core: HashSet<Box<str>>,
}

pub fn three_venn_regions(
    set1: &HashSet<Box<str>>,
    set2: &HashSet<Box<str>>,
    set3: &HashSet<Box<str>>,
) -> VennRegions {
    let mut pair_12: HashSet<Box<str>> = set1.intersection(set2).cloned().collect();
    let mut pair_13: HashSet<Box<str>> = set1.intersection(set3).cloned().collect();
    let core: HashSet<Box<str>> = pair_12.intersection(&pair_13).cloned().collect();

    pair_12 = pair_12.difference(&core).cloned().collect();
    pair_13 = pair_13.difference(&core).cloned().collect();
    let pair_23: HashSet<Box<str>> = set2
        .intersection(set3)
        .filter(|x| !core.contains(*x))
        .cloned()
        .collect();

    let unique_1 = set1
        .iter()
        .filter(|x| !pair_12.contains(*x) && !pair_13.contains(*x) && !core.contains(*x))
        .cloned()
        .collect();
    let unique_2 = set2
        .iter()
        .filter(|x| !pair_12.contains(*x) && !pair_23.contains(*x) && !core.contains(*x))
        .cloned()
        .collect();
    let unique_3 = set3
        .iter()
        .filter(|x| !pair_13.contains(*x) && !pair_23.contains(*x) && !core.contains(*x))
        .cloned()
        .collect();

    VennRegions {
        unique_1,
        unique_2,
        unique_3,
        pair_12,
        pair_13,
        pair_23,
        core,
    }
}

/// Randomly assign each member of a pairwise intersection to exactly one of
/// its two parent sets
fn split_pair(
    mut left: HashSet<Box<str>>,
    mut right: HashSet<Box<str>>,
    intersection: &HashSet<Box<str>>,
) -> (HashSet<Box<str>>, HashSet<Box<str>>) {
    let members: Vec<Box<str>> = intersection.iter().cloned().collect();
    let (to_left, to_right) = split_random_two_subsets(&members);
    left.extend(to_left);
    right.extend(to_right);
    (left, right)
}

/// Remap three overlapping category sets into pairwise-disjoint ones:
/// each pairwise-intersection member goes to exactly one parent, each
/// triple-core member to exactly one of the three. The union of the outputs
/// equals the union of the inputs; no entity is duplicated or dropped.
pub fn random_disjoint_intersection_three_subsets(
    sets: &BTreeMap<Box<str>, HashSet<Box<str>>>,
) -> anyhow::Result<BTreeMap<Box<str>, HashSet<Box<str>>>> {
    if sets.len() != 3 {
        anyhow::bail!(
            "disjoint three-way remapping requires exactly 3 categories, got {}",
            sets.len()
        );
    }

    let names: Vec<Box<str>> = sets.keys().cloned().collect();
    let values: Vec<&HashSet<Box<str>>> = sets.values().collect();

    let regions = three_venn_regions(values[0], values[1], values[2]);

    let (set1, set2) = split_pair(regions.unique_1, regions.unique_2, &regions.pair_12);
    let (mut set1, set3) = split_pair(set1, regions.unique_3, &regions.pair_13);
    let (mut set2, mut set3) = split_pair(set2, set3, &regions.pair_23);

    let core_members: Vec<Box<str>> = regions.core.iter().cloned().collect();
    let (core1, core2, core3) = split_random_three_subsets(&core_members);
    set1.extend(core1);
    set2.extend(core2);
    set3.extend(core3);

    let mut out = BTreeMap::new();
    out.insert(names[0].clone(), set1);
    out.insert(names[1].clone(), set2);
    out.insert(names[2].clone(), set3);
    Ok(out)
}

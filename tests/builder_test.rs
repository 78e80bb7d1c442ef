//! Tests for TreeBuilder growth and leaf extraction

use std::collections::HashSet;
use std::rc::Rc;

use unitminer::domain::{
    extract_rows, split_by_anchor, AcceptanceFilter, MiningPolicy, Suffix, TaggedToken,
    TreeBuilder, UnitRow, UnitTree,
};
use unitminer::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn tok(tag: &str, text: &str) -> TaggedToken {
    TaggedToken::new(tag, text)
}

fn suffix(tokens: &[(&str, &str)]) -> Suffix {
    tokens.iter().map(|(tag, text)| tok(tag, text)).collect::<Vec<_>>().into()
}

fn repeat(tokens: &[(&str, &str)], times: usize) -> Vec<Suffix> {
    (0..times).map(|_| suffix(tokens)).collect()
}

fn assert_partitions(tree: &UnitTree) {
    for (_, node) in tree.iter() {
        if node.children.is_empty() || node.parent.is_none() {
            continue;
        }
        let mut seen: HashSet<*const [TaggedToken]> = HashSet::new();
        let mut total = 0;
        for child in &node.children {
            let child = tree.get_node(*child).unwrap();
            assert!(child.data.support() <= node.data.support());
            for member in &child.data.members {
                assert!(seen.insert(Rc::as_ptr(member)), "member duplicated");
            }
            total += child.data.support();
        }
        assert_eq!(total, node.data.support(), "members lost under {}", node.data.unit);
    }
}

#[test]
fn given_two_ml_one_mmol_when_mining_with_support_two_then_only_ml_row() {
    // Arrange
    let mut suffixes = repeat(&[("NN", "mL")], 2);
    suffixes.push(suffix(&[("NN", "mmol")]));
    let policy = MiningPolicy::default().with_min_support(2).with_min_count(2);

    // Act
    let tree = TreeBuilder::new(policy.clone()).build(suffixes);
    let rows = extract_rows(&tree);
    let accepted = AcceptanceFilter::new(&policy).apply(&rows);

    // Assert
    assert_eq!(rows, vec![UnitRow::new("mL", "NN", 2, 1)]);
    assert_eq!(accepted, rows);
}

#[test]
fn given_mixed_tags_for_same_text_when_planting_then_first_member_tag_wins() {
    let mut suffixes = vec![suffix(&[("NNS", "mL"), ("NN", "min")])];
    suffixes.extend(repeat(&[("NN", "mL"), ("NN", "min")], 2));

    let tree = TreeBuilder::new(MiningPolicy::default().with_min_support(2)).plant(suffixes);

    let ml = tree.node_by_id(1).unwrap();
    assert_eq!(ml.data.unit, "mL");
    assert_eq!(ml.data.unit_tag, "NNS");
    assert_eq!(ml.data.support(), 3);
}

#[test]
fn given_mixed_tags_for_same_text_when_mining_then_row_keeps_first_member_tags() {
    let mut suffixes = vec![suffix(&[("NNS", "mL"), ("NN", "min")])];
    suffixes.extend(repeat(&[("NN", "mL"), ("NN", "min")], 2));

    let tree = TreeBuilder::new(MiningPolicy::default().with_min_support(2)).build(suffixes);

    assert_eq!(extract_rows(&tree), vec![UnitRow::new("mL min", "NNS NN", 3, 2)]);
}

#[test]
fn given_bracketed_unit_when_mining_then_balanced_row_is_accepted() {
    let suffixes = repeat(&[("-LRB-", "("), ("NN", "mol"), ("-RRB-", ")")], 3);
    let policy = MiningPolicy::default().with_min_support(3).with_min_count(3);

    let tree = TreeBuilder::new(policy.clone()).build(suffixes);
    let rows = extract_rows(&tree);

    assert_eq!(rows, vec![UnitRow::new("( mol )", "-LRB- NN -RRB-", 3, 3)]);
    assert_eq!(AcceptanceFilter::new(&policy).apply(&rows), rows);
}

#[test]
fn given_close_without_open_when_growing_then_stops_before_bracket() {
    let suffixes = repeat(&[("NN", "mg"), ("-RRB-", ")")], 2);

    let tree = TreeBuilder::new(MiningPolicy::default().with_min_support(2)).build(suffixes);

    assert_eq!(extract_rows(&tree), vec![UnitRow::new("mg", "NN", 2, 1)]);
}

#[test]
fn given_long_word_unit_when_filtering_then_rejected() {
    let suffixes = repeat(&[("NN", "temperature")], 4);
    let policy = MiningPolicy::default().with_min_support(2).with_min_count(2);

    let rows = extract_rows(&TreeBuilder::new(policy.clone()).build(suffixes));

    assert_eq!(rows, vec![UnitRow::new("temperature", "NN", 4, 1)]);
    assert!(AcceptanceFilter::new(&policy).apply(&rows).is_empty());
}

#[test]
fn given_numbers_after_unit_when_growing_then_small_integers_continue() {
    let mut suffixes = repeat(&[("NN", "h"), ("CD", "2"), ("NN", "x")], 2);
    suffixes.extend(repeat(&[("NN", "h"), ("CD", "25")], 2));

    let tree = TreeBuilder::new(MiningPolicy::default().with_min_support(2)).build(suffixes);
    let units: Vec<String> = extract_rows(&tree).into_iter().map(|r| r.unit).collect();

    assert!(units.contains(&"h 2 x".to_string()));
    assert!(units.contains(&"h".to_string()));
}

#[test]
fn given_mixed_corpus_when_building_then_children_partition_parents() {
    let mut suffixes = repeat(&[("NN", "mL"), ("IN", "of"), ("NN", "water")], 4);
    suffixes.extend(repeat(&[("NN", "mL"), ("NN", "min")], 3));
    suffixes.extend(repeat(&[("NN", "g")], 2));
    let tree = TreeBuilder::new(MiningPolicy::default().with_min_support(2)).build(suffixes);

    assert_partitions(&tree);
    let rows = extract_rows(&tree);
    assert!(rows.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(rows.iter().all(|r| r.level >= 1));
}

#[test]
fn given_reordered_corpus_when_building_then_same_row_set() {
    let sentences = vec![
        vec![tok("VB", "add"), tok("CD", "5"), tok("NN", "mL"), tok("STOP", ".")],
        vec![tok("CD", "10"), tok("NN", "mL"), tok("CD", "3"), tok("NN", "g")],
        vec![tok("CD", "2"), tok("NN", "g"), tok("STOP", ".")],
        vec![tok("CD", "7"), tok("NN", "mL")],
    ];
    let builder = TreeBuilder::new(MiningPolicy::default().with_min_support(2));
    let mine = |order: Vec<&Vec<TaggedToken>>| {
        let suffixes: Vec<Suffix> = order
            .into_iter()
            .flat_map(|s| split_by_anchor(s, "CD"))
            .collect();
        let mut rows: Vec<(String, String, usize)> = extract_rows(&builder.build(suffixes))
            .into_iter()
            .map(|r| (r.unit, r.tag, r.count))
            .collect();
        rows.sort();
        rows
    };

    let forward = mine(sentences.iter().collect());
    let backward = mine(sentences.iter().rev().collect());

    assert_eq!(forward, backward);
    assert!(!forward.is_empty());
}

#[test]
fn given_empty_corpus_when_building_then_root_only_and_no_rows() {
    let tree = TreeBuilder::new(MiningPolicy::default()).build(Vec::new());

    assert_eq!(tree.len(), 1);
    assert!(extract_rows(&tree).is_empty());
}

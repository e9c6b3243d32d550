//! Property-based tests for the classifier and walker.
//!
//! These tests verify that:
//! - A hard-effort marker always wins over step type and easy markers
//! - Walking never changes tree shape or anything but targets, including unmodeled fields
//! - The returned count equals the number of leaves that gained a target
//! - Walking an already-walked tree is a no-op

use proptest::prelude::*;
use zonefix_domain::{HARD_MARKERS, ZonePolicy, classify, walk};
use serde_json::json;
use zonefix_types::workout::{EndCondition, Extra, LeafStep, RepeatGroup, Step, StepType, Target};

const KEYS: [&str; 7] = ["warmup", "cooldown", "recovery", "interval", "rest", "other", ""];
const WORDS: [&str; 9] = [
    "easy", "slow", "conversational", "jog", "pace", "TEMPO", "Race", "steady", "hard",
];

fn arb_description() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        prop::collection::vec(prop::sample::select(WORDS.to_vec()), 0..4).prop_map(|w| w.join(" ")),
    )
}

fn arb_target() -> impl Strategy<Value = Option<Target>> {
    prop::option::of((1u32..=5).prop_map(Target::heart_rate_zone))
}

/// Unmodeled remote fields, such as step order or the iteration count of a group.
fn arb_extra() -> impl Strategy<Value = Extra> {
    (prop::option::of(1u32..40), prop::option::of("[a-zA-Z]{1,8}")).prop_map(|(order, dto)| {
        let mut extra = Extra::new();
        if let Some(order) = order {
            extra.insert("stepOrder".to_string(), json!(order));
        }
        if let Some(dto) = dto {
            extra.insert("type".to_string(), json!(dto));
        }
        extra
    })
}

fn arb_leaf() -> impl Strategy<Value = LeafStep> {
    (
        prop::option::of(1u32..=6),
        prop::sample::select(KEYS.to_vec()),
        arb_description(),
        prop::option::of(1u64..3600),
        arb_target(),
        arb_extra(),
    )
        .prop_map(|(id, key, description, secs, target, extra)| LeafStep {
            step_type: StepType::new(id, key),
            description,
            end_condition: secs.map(EndCondition::time),
            target,
            extra,
        })
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    let leaf = arb_leaf().prop_map(Step::Leaf);
    let step = leaf.prop_recursive(4, 32, 4, |inner| {
        (prop::collection::vec(inner, 0..4), arb_extra())
            .prop_map(|(steps, extra)| Step::Repeat(RepeatGroup { steps, extra }))
    });
    prop::collection::vec(step, 0..6)
}

fn leaves(steps: &[Step]) -> Vec<&LeafStep> {
    let mut out = Vec::new();
    for step in steps {
        match step {
            Step::Leaf(leaf) => out.push(leaf),
            Step::Repeat(group) => out.extend(leaves(&group.steps)),
        }
    }
    out
}

/// Every repeat group, depth first: child count, subtree size and its own fields.
fn groups(steps: &[Step]) -> Vec<(usize, usize, Extra)> {
    let mut out = Vec::new();
    for step in steps {
        if let Step::Repeat(g) = step {
            out.push((g.steps.len(), step.node_count(), g.extra.clone()));
            out.extend(groups(&g.steps));
        }
    }
    out
}

proptest! {
    #[test]
    fn hard_marker_always_wins(mut leaf in arb_leaf(), marker in prop::sample::select(HARD_MARKERS.to_vec())) {
        let description = format!("{} {}", leaf.description.unwrap_or_default(), marker.to_uppercase());
        leaf.description = Some(description);
        let c = classify(&leaf);
        prop_assert!(!c.is_easy());
        prop_assert!(!c.add_target);
    }

    #[test]
    fn walk_preserves_shape_and_non_target_fields(steps in arb_steps(), zone in 1u32..=5) {
        let (out, _) = walk(steps.clone(), 0, &ZonePolicy { zone });

        prop_assert_eq!(out.len(), steps.len());
        let sizes = |steps: &[Step]| steps.iter().map(Step::node_count).collect::<Vec<_>>();
        prop_assert_eq!(sizes(&out), sizes(&steps));
        prop_assert_eq!(groups(&out), groups(&steps));

        let before = leaves(&steps);
        let after = leaves(&out);
        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            prop_assert_eq!(&b.step_type, &a.step_type);
            prop_assert_eq!(&b.description, &a.description);
            prop_assert_eq!(&b.end_condition, &a.end_condition);
            prop_assert_eq!(&b.extra, &a.extra);
            if b.target.is_some() {
                prop_assert_eq!(&b.target, &a.target);
            }
        }
    }

    #[test]
    fn count_matches_leaves_that_gained_a_target(steps in arb_steps(), start in 0usize..10) {
        let expected = leaves(&steps).iter().filter(|l| classify(l).add_target).count();
        let (out, count) = walk(steps.clone(), start, &ZonePolicy::default());
        prop_assert_eq!(count, start + expected);

        let gained = leaves(&steps)
            .iter()
            .zip(leaves(&out).iter())
            .filter(|(b, a)| b.target.is_none() && a.target.is_some())
            .count();
        prop_assert_eq!(gained, expected);
    }

    #[test]
    fn walking_twice_is_a_no_op(steps in arb_steps()) {
        let policy = ZonePolicy::default();
        let (once, _) = walk(steps, 0, &policy);
        let (twice, count) = walk(once.clone(), 0, &policy);
        prop_assert_eq!(count, 0);
        prop_assert_eq!(twice, once);
    }
}

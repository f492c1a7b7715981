//! Body reordering: pure data rearrangement of classified entities.
//!
//! Entities are emitted category by category in the configured order, one
//! blank line between entities. Lines owned by no entity and not blank
//! (pass-through text, unpulled comments) keep their source order and are
//! appended after the ordered members. Unowned blank lines are dropped:
//! separators are regenerated, which is what makes reorganization
//! idempotent.

use stilo_classify::{Classification, Declaration, Entity};
use stilo_scan::Line;

use crate::config::{MemberCategory, Options};

/// Produce the new raw lines for one declaration's body.
pub(crate) fn reorder_body(
    lines: &[Line],
    decl: &Declaration,
    classified: &Classification,
    options: &Options,
) -> Vec<String> {
    let mut owned = vec![false; lines.len()];
    for entity in all_entities(classified) {
        for li in entity.lines.clone() {
            owned[li] = true;
        }
    }

    let mut out: Vec<String> = Vec::new();
    for &category in &options.member_ordering {
        for entity in category_entities(classified, category, options) {
            if !out.is_empty() {
                out.push(String::new());
            }
            for li in entity.lines.clone() {
                out.push(lines[li].raw.clone());
            }
        }
    }

    let leftovers: Vec<usize> = decl
        .body_lines
        .clone()
        .filter(|&li| !owned[li] && !lines[li].is_blank())
        .collect();
    if !leftovers.is_empty() {
        if !out.is_empty() {
            out.push(String::new());
        }
        for li in leftovers {
            out.push(lines[li].raw.clone());
        }
    }
    out
}

fn all_entities(c: &Classification) -> impl Iterator<Item = &Entity> {
    c.main_constructor
        .iter()
        .chain(&c.named_constructors)
        .chain(&c.static_variables)
        .chain(&c.static_private_variables)
        .chain(&c.instance_variables)
        .chain(&c.private_instance_variables)
        .chain(&c.override_variables)
        .chain(&c.override_methods)
        .chain(&c.getter_methods)
        .chain(&c.other_methods)
        .chain(c.build_method.iter())
}

/// Entities of one category, in emission order.
fn category_entities<'c>(
    c: &'c Classification,
    category: MemberCategory,
    options: &Options,
) -> Vec<&'c Entity> {
    match category {
        MemberCategory::PublicConstructor => c.main_constructor.iter().collect(),
        MemberCategory::NamedConstructors => sorted_by_name(&c.named_constructors),
        MemberCategory::PublicStaticVariables => c.static_variables.iter().collect(),
        MemberCategory::PublicInstanceVariables => c.instance_variables.iter().collect(),
        MemberCategory::PublicOverrideVariables => c.override_variables.iter().collect(),
        MemberCategory::PrivateStaticVariables => {
            c.static_private_variables.iter().collect()
        }
        MemberCategory::PrivateInstanceVariables => {
            c.private_instance_variables.iter().collect()
        }
        MemberCategory::PublicOverrideMethods => c.override_methods.iter().collect(),
        MemberCategory::PublicOtherMethods => {
            // grouped getters lead the slot, sorted by name
            let mut entities = sorted_by_name(&c.getter_methods);
            if options.sort_other_methods {
                entities.extend(sorted_by_name(&c.other_methods));
            } else {
                entities.extend(c.other_methods.iter());
            }
            entities
        }
        MemberCategory::BuildMethod => c.build_method.iter().collect(),
    }
}

fn sorted_by_name(entities: &[Entity]) -> Vec<&Entity> {
    let mut sorted: Vec<&Entity> = entities.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

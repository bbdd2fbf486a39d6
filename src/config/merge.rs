//! Merge an existing configuration into a newer distribution template.
use super::{ConfigObj, Section};

/// Merge `working` (the user's file) into `template` (the new distribution
/// file) and store the result in `working`.
///
/// The result starts as a copy of the template, so new sections, new keys,
/// and the template's comments all appear. Every value the user set then
/// overrides the template's value, and keys or sections that only the user
/// has are kept. The top-level `version` always comes from the template.
/// Where one side has a section and the other a plain value under the same
/// name, the template's shape wins.
pub fn update_and_merge(working: &mut ConfigObj, template: &ConfigObj) {
    let mut merged = template.clone();
    overlay(&mut merged.root, &working.root);
    if let Some(version) = template.root.value("version") {
        merged.root.set("version", version.clone());
    }
    *working = merged;
}

fn overlay(target: &mut Section, source: &Section) {
    for kv in source.scalars() {
        if target.section(&kv.key).is_some() {
            continue;
        }
        if let Some(existing) = target.scalars_mut().iter_mut().find(|t| t.key == kv.key) {
            existing.value = kv.value.clone();
        } else {
            target.push_scalar(kv.clone());
        }
    }

    for sub in source.subsections() {
        if target.value(&sub.name).is_some() {
            continue;
        }
        if let Some(existing) = target.section_mut(&sub.name) {
            overlay(existing, &sub.section);
        } else {
            target.subsections_mut().push(sub.clone());
        }
    }
}

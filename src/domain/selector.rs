//! Selection of the highest SemVer tag

use crate::domain::tag::Tag;
use crate::domain::version::cmp_precedence;

/// Select the tag with the greatest SemVer precedence.
///
/// Only tags whose short name is a valid semantic version take part, and a
/// tag whose short name equals `excluded` is never returned. When several tags
/// share the maximal precedence any one of them may be returned; their short
/// names are interchangeable for version computation.
///
/// # Arguments
/// * `tags` - Tags in repository order
/// * `excluded` - Short name to skip, used to find the release before a given one
///
/// # Returns
/// * `Some(tag)` - The highest candidate
/// * `None` - If no tag survives filtering
pub fn select<'a>(tags: &'a [Tag], excluded: Option<&str>) -> Option<&'a Tag> {
    tags.iter()
        .filter(|tag| excluded != Some(tag.short()))
        .filter_map(|tag| tag.semver().map(|version| (tag, version)))
        .max_by(|(_, a), (_, b)| cmp_precedence(a, b))
        .map(|(tag, _)| tag)
}

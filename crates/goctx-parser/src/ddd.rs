//! Name-pattern DDD role classification.
//!
//! A pure function over a type symbol's name. The rules are applied in
//! order and OR-accumulate flags; nothing ever clears a flag. The entity
//! substring heuristic is deliberately loose (a `UserFilter` classifies as
//! entity); callers that need stricter gating combine it with
//! [`has_id_field`].

use goctx_core::entities::DddFlags;

/// Substrings that hint a type models a domain entity.
const ENTITY_HINTS: &[&str] = &["Order", "User", "Product", "Account", "Customer", "Item"];

/// Suffixes that exclude a name from the entity substring heuristic.
const ENTITY_EXCLUDED_SUFFIXES: &[&str] = &["Service", "Repository", "Handler"];

/// Classify a type name into DDD role flags.
#[must_use]
pub fn classify(name: &str) -> DddFlags {
    let mut flags = DddFlags::default();

    if name.ends_with("Aggregate") || name.ends_with("AggregateRoot") {
        flags.is_aggregate_root = true;
        flags.is_entity = true;
    }

    if name.ends_with("Entity") {
        flags.is_entity = true;
    } else if ENTITY_HINTS.iter().any(|hint| name.contains(hint))
        && !ENTITY_EXCLUDED_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
    {
        flags.is_entity = true;
    }

    if name.ends_with("VO") || name.ends_with("ValueObject") {
        flags.is_value_object = true;
    }
    if name.ends_with("Repository") || name.ends_with("Repo") {
        flags.is_repository = true;
    }
    if name.ends_with("Service") {
        flags.is_service = true;
    }
    if name.ends_with("Command") || name.ends_with("Cmd") {
        flags.is_command = true;
    }
    if name.ends_with("Query") {
        flags.is_query = true;
    }
    if name.ends_with("Handler") {
        flags.is_handler = true;
    }

    flags
}

/// Secondary structural check: does the type carry an identity field?
///
/// Exposed for callers that want to gate entity detection more strictly
/// than the name heuristic alone.
#[must_use]
pub fn has_id_field(field_names: &[String]) -> bool {
    field_names.iter().any(|name| {
        name == "ID" || name == "Id" || name == "id" || name.ends_with("ID") || name.ends_with("Id")
    })
}

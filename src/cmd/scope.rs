/*!
Scope of a resource kind: plain, or organised inside a content pack.

The two scopes differ only in:
  - identifier resolution (name-or-id vs ref-or-id)
  - the identifier argument's name and help text
  - the preferred attribute order for single-instance output
  - the `--pack` filter on `list`
*/

use std::fmt;

use crate::resource::Lookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Resolved by name, then by id.
    #[default]
    Resource,
    /// Resolved by `pack.name` reference or id.
    ContentPack,
}

impl Scope {
    pub fn lookup(self) -> Lookup {
        match self {
            Scope::Resource => Lookup::NameOrId,
            Scope::ContentPack => Lookup::RefOrId,
        }
    }

    /// Name (and value name) of the positional identifier argument.
    pub fn pk_argument(self) -> &'static str {
        match self {
            Scope::Resource => "name-or-id",
            Scope::ContentPack => "ref-or-id",
        }
    }

    pub fn pk_help(self, display_name: &str) -> String {
        let display_name = display_name.to_lowercase();
        match self {
            Scope::Resource => format!("Name or ID of the {display_name}."),
            Scope::ContentPack => format!("Reference or ID of the {display_name}."),
        }
    }

    /// Attributes shown first by `get`; the rest follow alphabetically.
    pub fn display_order(self) -> &'static [&'static str] {
        match self {
            Scope::Resource => &["id", "name", "description"],
            Scope::ContentPack => &["id", "pack", "name", "description"],
        }
    }

    pub fn has_pack_filter(self) -> bool {
        matches!(self, Scope::ContentPack)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Resource => f.write_str("resource"),
            Scope::ContentPack => f.write_str("content pack"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scope;
    use crate::resource::Lookup;

    #[test]
    fn argument_names() {
        assert_eq!(Scope::Resource.pk_argument(), "name-or-id");
        assert_eq!(Scope::ContentPack.pk_argument(), "ref-or-id");
    }

    #[test]
    fn help_text() {
        assert_eq!(Scope::Resource.pk_help("Key Value Pair"), "Name or ID of the key value pair.");
        assert_eq!(Scope::ContentPack.pk_help("Action"), "Reference or ID of the action.");
    }

    #[test]
    fn policy_values() {
        assert_eq!(Scope::Resource.lookup(), Lookup::NameOrId);
        assert_eq!(Scope::ContentPack.lookup(), Lookup::RefOrId);
        assert!(Scope::ContentPack.has_pack_filter());
        assert!(!Scope::Resource.has_pack_filter());
        assert_eq!(Scope::ContentPack.display_order()[1], "pack");
    }
}

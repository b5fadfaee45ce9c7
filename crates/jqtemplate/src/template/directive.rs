//! The four directive kinds and the per-node set of compiled directives

use std::fmt;

use crate::expr::CompiledExpr;

/// A directive attribute kind.
///
/// Variant order is evaluation precedence: loop, bind, attr, text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Directive {
    /// `jqloop`: replicate the node once per array element
    Loop,
    /// `jqbind`: install event handlers
    Bind,
    /// `jqattr`: set attributes
    Attr,
    /// `jqtext`: replace content with text
    Text,
}

impl Directive {
    /// All directives in precedence order.
    pub const ALL: [Directive; 4] = [
        Directive::Loop,
        Directive::Bind,
        Directive::Attr,
        Directive::Text,
    ];

    /// The attribute name that carries this directive.
    pub fn attribute(self) -> &'static str {
        match self {
            Directive::Loop => "jqloop",
            Directive::Bind => "jqbind",
            Directive::Attr => "jqattr",
            Directive::Text => "jqtext",
        }
    }

    /// Look up the directive carried by an attribute name.
    pub fn from_attribute(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.attribute() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Compiled directives attached to one template node.
#[derive(Debug, Clone, Default)]
pub struct DirectiveSet {
    slots: [Option<CompiledExpr>; 4],
}

impl DirectiveSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled expression for `directive`, if the node carries it.
    pub fn get(&self, directive: Directive) -> Option<&CompiledExpr> {
        self.slots[directive.slot()].as_ref()
    }

    /// Store a compiled expression, replacing any previous one.
    pub fn insert(&mut self, directive: Directive, expr: CompiledExpr) {
        self.slots[directive.slot()] = Some(expr);
    }

    /// Number of directives present.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Check if no directive is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present directives in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (Directive, &CompiledExpr)> {
        Directive::ALL
            .into_iter()
            .filter_map(|d| self.get(d).map(|expr| (d, expr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_attribute_names() {
        assert_eq!(Directive::from_attribute("jqloop"), Some(Directive::Loop));
        assert_eq!(Directive::from_attribute("jqtext"), Some(Directive::Text));
        assert_eq!(Directive::from_attribute("class"), None);
        assert_eq!(Directive::Attr.to_string(), "jqattr");
        assert!(Directive::Loop < Directive::Text);
    }

    #[test]
    fn test_set_iterates_in_precedence_order() {
        let mut set = DirectiveSet::new();
        set.insert(Directive::Text, CompiledExpr::new("1", |_| Ok(Value::Number(1.0))));
        set.insert(Directive::Loop, CompiledExpr::new("2", |_| Ok(Value::Number(2.0))));
        let order: Vec<Directive> = set.iter().map(|(d, _)| d).collect();
        assert_eq!(order, vec![Directive::Loop, Directive::Text]);
        assert_eq!(set.len(), 2);
        assert!(set.get(Directive::Bind).is_none());
    }
}

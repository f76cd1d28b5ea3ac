use std::fmt;

/// Separator between namespace segments and the simple name.
pub const SEPARATOR: char = '.';

/// Dotted path identifying a declaration.
///
/// Used as the primary key for symbol lookup.
///
/// # Examples
///
/// ```
/// use xidl_core::QualifiedName;
///
/// let point = QualifiedName::new("Point", vec!["Shapes".into(), "Flat".into()]);
/// assert_eq!(point.to_string(), "Shapes.Flat.Point");
///
/// let parsed = QualifiedName::from_qualified_string("Shapes.Flat.Point");
/// assert_eq!(parsed, point);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Simple name (e.g., "Point", "IWidget")
    pub name: String,
    /// Namespace path (e.g., ["Shapes", "Flat"])
    /// Empty for the global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a dotted string (e.g., "Shapes.Point").
    ///
    /// The last segment is the name, the rest is the namespace. Empty segments
    /// are dropped, so "Shapes..Point" and ".Shapes.Point" both normalize.
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split(SEPARATOR)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Create the qualified name of `name` declared inside namespace `ns`.
    ///
    /// `ns` is itself a dotted string; an empty `ns` yields a global name.
    pub fn in_namespace(ns: &str, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: ns
                .split(SEPARATOR)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Whether a raw reference string already carries a namespace qualifier.
    pub fn is_qualified_str(s: &str) -> bool {
        s.contains(SEPARATOR)
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Get the namespace as a dotted string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join(".")
    }

    /// Compute the identity hash of this name.
    pub fn to_type_hash(&self) -> crate::TypeHash {
        crate::TypeHash::from_name(&self.to_string())
    }

    /// Create a child name within this namespace.
    ///
    /// Example: `Shapes.Flat` + `Point` = `Shapes.Flat.Point`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut child_ns = self.namespace.clone();
        child_ns.push(self.name.clone());
        Self {
            name: name.into(),
            namespace: child_ns,
        }
    }

    /// Get the parent namespace as a QualifiedName (if any).
    ///
    /// Example: `Shapes.Flat.Point` -> Some(`Shapes.Flat`)
    pub fn parent(&self) -> Option<Self> {
        let (name, namespace) = self.namespace.split_last()?;
        Some(Self {
            name: name.clone(),
            namespace: namespace.to_vec(),
        })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace.join("."), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}

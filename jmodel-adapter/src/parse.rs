use std::{path::Path, str::FromStr};

use crate::{AdapterError, DeclarationSet, Result};

impl FromStr for DeclarationSet {
    type Err = Box<AdapterError>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "declarations.toml")
    }
}

impl DeclarationSet {
    /// Parse a declaration file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(AdapterError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse declarations from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AdapterError::parse(e, content, filename))
    }

    /// Number of type declarations, nested ones included.
    pub fn type_count(&self) -> usize {
        fn count(types: &[crate::TypeElement]) -> usize {
            types.iter().map(|t| 1 + count(&t.nested)).sum()
        }
        self.packages.iter().map(|p| count(&p.types)).sum()
    }
}

#[cfg(test)]
mod tests {
    use jmodel_core::{Indent, LineSeparator};

    use super::*;
    use crate::{
        AnnotationValueMirror, ElementKind, ElementModifier, ErrorTypePolicy, TaggedValue,
        TypeMirror,
    };

    #[test]
    fn test_parse_minimal() {
        let set = DeclarationSet::from_str("").unwrap();
        assert!(set.packages.is_empty());
        assert_eq!(set.render.indent, Indent::JAVA);
        assert_eq!(set.render.line_separator, LineSeparator::Lf);
        assert_eq!(set.render.error_types, ErrorTypePolicy::Fail);
    }

    #[test]
    fn test_parse_render_table() {
        let set = DeclarationSet::from_str(
            r#"
            [render]
            indent = "tab"
            line_separator = "crlf"
            error_types = "placeholder"
            "#,
        )
        .unwrap();
        assert_eq!(set.render.indent, Indent::Tab);
        assert_eq!(set.render.line_separator, LineSeparator::CrLf);
        assert_eq!(set.render.error_types, ErrorTypePolicy::Placeholder);

        let set = DeclarationSet::from_str("[render]\nindent = 2\n").unwrap();
        assert_eq!(set.render.indent, Indent::Spaces(2));

        assert!(DeclarationSet::from_str("[render]\nindent = 0\n").is_err());
        assert!(DeclarationSet::from_str("[render]\nindent = \"wide\"\n").is_err());
    }

    #[test]
    fn test_parse_types_and_members() {
        let set = DeclarationSet::from_str(
            r#"
            [[package]]
            name = "com.example"

            [[package.type]]
            name = "Repository"
            kind = "interface"
            modifiers = ["public"]
            type_params = [{ name = "T" }]

            [[package.type.method]]
            name = "find"
            returns = { kind = "declared", name = "java.util.List", args = [{ kind = "type_var", name = "T" }] }
            varargs = true

            [[package.type.method.param]]
            name = "ids"
            type = { kind = "array", component = { kind = "primitive", name = "long" } }

            [[package.type.nested]]
            name = "Mode"
            kind = "enum"
            constants = ["READ", "WRITE"]
            "#,
        )
        .unwrap();

        assert_eq!(set.type_count(), 2);
        let repo = &set.packages[0].types[0];
        assert_eq!(repo.kind, ElementKind::Interface);
        assert_eq!(repo.modifiers, [ElementModifier::Public]);
        assert_eq!(repo.type_params[0].name, "T");

        let find = &repo.methods[0];
        assert!(find.varargs);
        assert_eq!(
            find.returns,
            Some(TypeMirror::Declared {
                name: "java.util.List".into(),
                args: vec![TypeMirror::TypeVar { name: "T".into() }],
            })
        );
        assert_eq!(
            find.params[0].ty,
            TypeMirror::Array {
                component: Box::new(TypeMirror::primitive("long")),
            }
        );
        assert_eq!(repo.nested[0].constants, ["READ", "WRITE"]);
    }

    #[test]
    fn test_parse_annotation_values() {
        let set = DeclarationSet::from_str(
            r#"
            [[package]]
            name = "p"

            [[package.type]]
            name = "A"
            kind = "class"
            annotations = [
                { type = "lib.Tagged", values = { names = ["a", "b"], limit = 3, on = true } },
                { type = "lib.Mode", values = { value = { kind = "enum", type = "lib.Level", constant = "HIGH" } } },
                { type = "lib.Sep", values = { value = { kind = "char", value = ";" } } },
            ]
            "#,
        )
        .unwrap();

        let annotations = &set.packages[0].types[0].annotations;
        assert_eq!(
            annotations[0].values["names"],
            AnnotationValueMirror::Array(vec![
                AnnotationValueMirror::String("a".into()),
                AnnotationValueMirror::String("b".into()),
            ])
        );
        assert_eq!(annotations[0].values["limit"], AnnotationValueMirror::Int(3));
        assert_eq!(annotations[0].values["on"], AnnotationValueMirror::Bool(true));
        assert_eq!(
            annotations[1].values["value"],
            AnnotationValueMirror::Tagged(TaggedValue::Enum {
                ty: "lib.Level".into(),
                constant: "HIGH".into(),
            })
        );
        assert_eq!(
            annotations[2].values["value"],
            AnnotationValueMirror::Tagged(TaggedValue::Char { value: ';' })
        );
    }

    #[test]
    fn test_unknown_field_reports_location() {
        let err = DeclarationSet::from_str(
            r#"
            [[package]]
            name = "p"
            colour = "red"
            "#,
        )
        .unwrap_err();
        match *err {
            AdapterError::Parse { span, .. } => assert!(span.is_some()),
            ref other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, "[[package]]\nname = \"p\"\n").unwrap();
        let set = DeclarationSet::from_file(&path).unwrap();
        assert_eq!(set.packages[0].name, "p");

        let err = DeclarationSet::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(*err, AdapterError::Io { .. }));
    }
}

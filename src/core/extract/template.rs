//! Translation keys in component-template markup.
//!
//! `{{t "key"}}` and `(t "key")` with any configured helper name. The first
//! positional parameter is lowered into a [`KeyShape`]:
//!
//! - `"literal"` → the literal
//! - `(if cond "a" "b")` → both branches; a missing alternate is the empty
//!   string so that an enclosing `concat` still produces keys
//! - `(concat "a." (if c "b" "c"))` → cartesian product, only when
//!   `analyzeConcatExpression` is enabled

use std::collections::BTreeSet;

use crate::core::AnalysisOptions;
use crate::core::extract::KeyShape;
use crate::core::parsers::template::{
    Call, Expr, Mustache, Template, TemplateVisitor, walk_call, walk_template,
};

pub struct TemplateKeyVisitor<'a> {
    options: &'a AnalysisOptions,
    pub keys: BTreeSet<String>,
}

impl<'a> TemplateKeyVisitor<'a> {
    pub fn new(options: &'a AnalysisOptions) -> Self {
        Self {
            options,
            keys: BTreeSet::new(),
        }
    }

    fn check_call(&mut self, call: &Call) {
        let is_helper = call
            .name()
            .is_some_and(|name| self.options.is_translation_helper(name));
        if !is_helper {
            return;
        }
        let Some(first) = call.params.first() else {
            return;
        };
        for key in self.lower(first).candidates() {
            if !key.is_empty() {
                self.keys.insert(key);
            }
        }
    }

    fn lower(&self, expr: &Expr) -> KeyShape {
        match expr {
            Expr::Str(value) => KeyShape::literal(value.as_str()),
            Expr::SubExpr(call) => match call.name() {
                Some("if") => KeyShape::conditional(
                    call.params
                        .get(1)
                        .map_or(KeyShape::Unknown, |param| self.lower(param)),
                    call.params
                        .get(2)
                        .map_or(KeyShape::literal(""), |param| self.lower(param)),
                ),
                Some("concat") if self.options.analyze_concat_expression => {
                    KeyShape::Concat(call.params.iter().map(|param| self.lower(param)).collect())
                }
                _ => KeyShape::Unknown,
            },
            Expr::Path(_)
            | Expr::Number(_)
            | Expr::Bool(_)
            | Expr::Null
            | Expr::Undefined => KeyShape::Unknown,
        }
    }
}

impl TemplateVisitor for TemplateKeyVisitor<'_> {
    fn visit_mustache(&mut self, mustache: &Mustache) {
        self.check_call(&mustache.call);
        walk_call(self, &mustache.call);
    }

    fn visit_sub_expression(&mut self, call: &Call) {
        self.check_call(call);
        walk_call(self, call);
    }
}

/// Keys referenced by a parsed template.
pub fn template_keys(template: &Template, options: &AnalysisOptions) -> BTreeSet<String> {
    let mut visitor = TemplateKeyVisitor::new(options);
    walk_template(&mut visitor, template);
    visitor.keys
}

#[cfg(test)]
mod tests {
    use crate::core::AnalysisOptions;
    use crate::core::extract::template::*;
    use crate::core::parsers::template::parse_template;

    fn keys_with(source: &str, options: &AnalysisOptions) -> Vec<String> {
        let template = parse_template(source, "app/templates/test.hbs").unwrap();
        template_keys(&template, options).into_iter().collect()
    }

    fn keys(source: &str) -> Vec<String> {
        keys_with(source, &AnalysisOptions::default())
    }

    #[test]
    fn test_literal_key() {
        assert_eq!(keys(r#"<h1>{{t "hello.world"}}</h1>"#), vec!["hello.world"]);
    }

    #[test]
    fn test_sub_expression_key() {
        assert_eq!(
            keys(r#"<MyInput @placeholder={{concat "> " (t "form.name")}} />"#),
            vec!["form.name"]
        );
    }

    #[test]
    fn test_if_records_both_branches() {
        assert_eq!(
            keys(r#"{{t (if cond "yes.key" "no.key")}}"#),
            vec!["no.key", "yes.key"]
        );
    }

    #[test]
    fn test_if_drops_dynamic_branch() {
        assert_eq!(keys(r#"{{t (if cond "yes.key" this.other)}}"#), vec!["yes.key"]);
    }

    #[test]
    fn test_if_without_alternate_records_nothing_empty() {
        assert_eq!(keys(r#"{{t (if cond "only.key")}}"#), vec!["only.key"]);
    }

    #[test]
    fn test_concat_requires_option() {
        let source = r#"{{t (concat "menu." (if open "open" "closed") ".label")}}"#;
        assert!(keys(source).is_empty());

        let options = AnalysisOptions {
            analyze_concat_expression: true,
            ..AnalysisOptions::default()
        };
        assert_eq!(
            keys_with(source, &options),
            vec!["menu.closed.label", "menu.open.label"]
        );
    }

    #[test]
    fn test_concat_with_optional_suffix() {
        let options = AnalysisOptions {
            analyze_concat_expression: true,
            ..AnalysisOptions::default()
        };
        assert_eq!(
            keys_with(r#"{{t (concat "title" (if plural ".other"))}}"#, &options),
            vec!["title", "title.other"]
        );
    }

    #[test]
    fn test_concat_with_dynamic_part_records_nothing() {
        let options = AnalysisOptions {
            analyze_concat_expression: true,
            ..AnalysisOptions::default()
        };
        assert!(keys_with(r#"{{t (concat "menu." this.name)}}"#, &options).is_empty());
    }

    #[test]
    fn test_custom_helper() {
        let options = AnalysisOptions::default().with_helpers(["t-html"]);
        assert_eq!(
            keys_with(r#"{{t-html "rich.text"}} {{other "not.a.key"}}"#, &options),
            vec!["rich.text"]
        );
    }

    #[test]
    fn test_keys_inside_blocks_and_hash_values() {
        let source = r#"
{{#if this.show}}
  {{my-component title=(t "block.title")}}
{{else}}
  {{t "block.else"}}
{{/if}}
"#;
        assert_eq!(keys(source), vec!["block.else", "block.title"]);
    }

    #[test]
    fn test_helper_without_params_and_dynamic_key() {
        assert!(keys("{{t}} {{t this.key}} {{this.t 'x'}}").is_empty());
    }
}

use std::sync::Arc;

use swc_common::{FileName, GLOBALS, Globals, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

use crate::core::{AnalyzerError, AnalyzerResult, ParserPlugin};

/// Grammar switches for one script file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSyntax {
    pub typescript: bool,
    pub jsx: bool,
    pub function_bind: bool,
    pub export_default_from: bool,
}

impl ScriptSyntax {
    pub fn new(typescript: bool, jsx: bool) -> Self {
        Self {
            typescript,
            jsx,
            ..Default::default()
        }
    }

    /// Apply user-declared parser plugins on top of the dialect defaults.
    ///
    /// Decorators (both placements), class fields, static blocks and dynamic
    /// imports are always enabled, so their plugins change nothing.
    pub fn with_plugins(mut self, plugins: &[ParserPlugin]) -> Self {
        for plugin in plugins {
            match plugin {
                ParserPlugin::Jsx => self.jsx = true,
                ParserPlugin::Typescript => self.typescript = true,
                ParserPlugin::FunctionBind => self.function_bind = true,
                ParserPlugin::ExportDefaultFrom => self.export_default_from = true,
                ParserPlugin::Decorators
                | ParserPlugin::DecoratorsLegacy
                | ParserPlugin::ClassProperties
                | ParserPlugin::ClassStaticBlock
                | ParserPlugin::DynamicImport
                | ParserPlugin::Unsupported => {}
            }
        }
        self
    }

    fn to_swc(self) -> Syntax {
        if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: true,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                fn_bind: self.function_bind,
                decorators: true,
                decorators_before_export: true,
                export_default_from: self.export_default_from,
                ..Default::default()
            })
        }
    }
}

/// Parse script source into a module AST.
///
/// Every call gets its own `SourceMap` and swc globals so files can be
/// parsed on different threads.
pub fn parse_script(code: &str, file_path: &str, syntax: ScriptSyntax) -> AnalyzerResult<Module> {
    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(
            FileName::Real(file_path.into()).into(),
            code.to_string(),
        );

        let mut parser = Parser::new(syntax.to_swc(), StringInput::from(&*source_file), None);

        parser.parse_module().map_err(|err| {
            let line = source_map.lookup_char_pos(err.span().lo).line;
            AnalyzerError::parse(file_path, format!("line {}: {}", line, err.kind().msg()))
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::core::parsers::script::*;

    #[test]
    fn test_parse_decorated_class() {
        let code = r#"
import Controller from '@ember/controller';

export default class ApplicationController extends Controller {
  @service intl;
  @tracked foo = 1;

  @computed('intl.locale')
  get title() {
    return this.intl.t('title');
  }
}
"#;
        let module = parse_script(code, "app/controllers/application.js", ScriptSyntax::default());
        assert!(module.is_ok());
    }

    #[test]
    fn test_parse_dynamic_import() {
        let code = "export async function load() { return import('./lazy'); }";
        assert!(parse_script(code, "app/utils/load.js", ScriptSyntax::default()).is_ok());
    }

    #[test]
    fn test_parse_typescript() {
        let code = "export function greet(name: string): string { return name; }";
        assert!(parse_script(code, "app/utils/greet.ts", ScriptSyntax::new(true, false)).is_ok());
    }

    #[test]
    fn test_parse_error_reports_file_and_line() {
        let code = "const a = 1;\nconst = ;\n";
        let err = parse_script(code, "app/broken.js", ScriptSyntax::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("app/broken.js"));
        assert!(message.contains("line 2"));
    }

    #[test]
    fn test_plugins_enable_jsx() {
        let syntax = ScriptSyntax::default().with_plugins(&[ParserPlugin::Jsx]);
        assert!(syntax.jsx);
        let code = "export const el = <div />;";
        assert!(parse_script(code, "app/el.js", syntax).is_ok());
    }
}

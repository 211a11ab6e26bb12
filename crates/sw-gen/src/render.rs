//! Template rendering for generated Go files.

use crate::error::{GenError, GenResult};
use minijinja::{Environment, ErrorKind, Value};
use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use sw_core::ident::{camel_case, pascal_case};
use sw_core::{Scope, TypeName};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by sqlwrap. DO NOT EDIT.";

/// Built-in templates by name.
pub const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    ("select", include_str!("../templates/select.go.j2")),
    ("exec", include_str!("../templates/exec.go.j2")),
    ("table", include_str!("../templates/table.go.j2")),
    ("standalone", include_str!("../templates/standalone.go.j2")),
];

/// Scope shared between the template functions of one output file.
pub type SharedScope = Arc<Mutex<Scope>>;

/// Renders templates into complete Go source files.
///
/// Each file gets a fresh [`Scope`]; the `imp` and `type_name` template
/// functions allocate aliases in it while the body renders, and the import
/// block is built from it afterwards.
pub struct Renderer {
    env: Environment<'static>,
    scope: SharedScope,
    package: String,
}

impl Renderer {
    /// Create a renderer for `package`. A `<name>.go.j2` file in one of
    /// `template_dirs` replaces the built-in template `name`; later
    /// directories win.
    pub fn new(package: &str, template_dirs: &[PathBuf]) -> GenResult<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        let scope: SharedScope = Arc::new(Mutex::new(Scope::new()));

        for (name, builtin) in BUILTIN_TEMPLATES {
            let source = match find_override(name, template_dirs) {
                Some(path) => {
                    log::debug!("template {} overridden by {}", name, path.display());
                    std::fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?
                }
                None => builtin.to_string(),
            };
            env.add_template_owned(name, source)
                .map_err(|e| template_error(name, e))?;
        }

        env.add_function("imp", make_imp_fn(scope.clone()));
        env.add_function("type_name", make_type_name_fn(scope.clone()));
        env.add_filter("pascal", |s: String| pascal_case(&s));
        env.add_filter("camel", |s: String| camel_case(&s));
        env.add_filter("go_quote", go_quote);

        Ok(Self {
            env,
            scope,
            package: package.to_string(),
        })
    }

    /// Render `parts` (template name and context) into one file.
    pub fn render_file(&self, parts: &[(&str, Value)]) -> GenResult<String> {
        *lock_scope(&self.scope).map_err(GenError::Internal)? = Scope::new();

        let mut bodies = Vec::with_capacity(parts.len());
        for (name, ctx) in parts {
            let template = self
                .env
                .get_template(name)
                .map_err(|e| template_error(name, e))?;
            let body = template.render(ctx).map_err(|e| template_error(name, e))?;
            bodies.push(body.trim().to_string());
        }

        let imports = lock_scope(&self.scope).map_err(GenError::Internal)?.list();
        Ok(assemble_file(&self.package, &imports, &bodies))
    }
}

fn find_override(name: &str, template_dirs: &[PathBuf]) -> Option<PathBuf> {
    template_dirs
        .iter()
        .rev()
        .map(|dir| dir.join(format!("{}.go.j2", name)))
        .find(|path| path.is_file())
}

fn template_error(name: &str, err: minijinja::Error) -> GenError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    GenError::Template {
        name: name.to_string(),
        message,
    }
}

fn lock_scope(scope: &SharedScope) -> Result<MutexGuard<'_, Scope>, String> {
    scope
        .lock()
        .map_err(|_| "import scope poisoned by a panicked render".to_string())
}

fn scope_error(message: String) -> minijinja::Error {
    minijinja::Error::new(ErrorKind::InvalidOperation, message)
}

/// `imp(namespace)`: alias of an imported namespace.
fn make_imp_fn(
    scope: SharedScope,
) -> impl Fn(String) -> Result<String, minijinja::Error> + Send + Sync + 'static {
    move |namespace: String| {
        Ok(lock_scope(&scope)
            .map_err(scope_error)?
            .use_namespace(&namespace))
    }
}

/// `type_name(spec)`: a type spec rendered for the current file.
fn make_type_name_fn(
    scope: SharedScope,
) -> impl Fn(String) -> Result<String, minijinja::Error> + Send + Sync + 'static {
    move |spec: String| {
        let type_name = TypeName::from_spec(&spec)
            .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
        Ok(lock_scope(&scope).map_err(scope_error)?.render(&type_name))
    }
}

/// Quote a string as a Go interpreted string literal.
pub fn go_quote(s: String) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn assemble_file(package: &str, imports: &[(String, String)], bodies: &[String]) -> String {
    let mut out = format!("{}\n\npackage {}\n", GENERATED_HEADER, package);
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for (namespace, alias) in imports {
            out.push_str(&format!("\t{} {}\n", alias, go_quote(namespace.clone())));
        }
        out.push_str(")\n");
    }
    for body in bodies.iter().filter(|b| !b.is_empty()) {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    out
}

/// Write a generated file, creating its directory.
pub fn write_file(path: &Path, content: &str) -> GenResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| GenError::io(path, e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

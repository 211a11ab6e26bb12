//! Annotation DSL embedded in SQL comments.
//!
//! Grammar: `primaryKey[:primaryVal] key[:val] ...`. Keys are identifiers,
//! values are either bare tokens without whitespace, `:` or `"`, or double
//! quoted strings with backslash escapes. The first pair selects the
//! annotation kind through an [`AnnotationRegistry`]; later pairs are options
//! of that kind.

use crate::error::{AnnotError, AnnotResult};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use sw_core::ident::is_ident;
use sw_core::TypeName;

/// How a SELECT wrapper returns rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStyle {
    #[default]
    Unknown,
    One,
    Many,
}

impl fmt::Display for ReturnStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnStyle::Unknown => write!(f, "unknown"),
            ReturnStyle::One => write!(f, "one"),
            ReturnStyle::Many => write!(f, "many"),
        }
    }
}

/// `func:<Name> [return:one|many]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FuncAnnotation {
    pub name: String,
    pub return_style: ReturnStyle,
}

/// `arg:<name> [type:<spec>]`, also spelled `param`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgAnnotation {
    pub name: String,
    pub type_name: Option<TypeName>,
}

/// `bind:<name> [in]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindAnnotation {
    pub name: String,
    /// Expanded for `IN (...)`.
    pub multi: bool,
}

/// `subs:<content>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubsAnnotation {
    pub content: String,
}

/// `setting [bindNamePrefix:<prefix>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingAnnotation {
    pub bind_name_prefix: Option<String>,
}

/// A parsed annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    Func(FuncAnnotation),
    Arg(ArgAnnotation),
    Bind(BindAnnotation),
    Subs(SubsAnnotation),
    Setting(SettingAnnotation),
}

/// Incrementally builds one annotation kind from its key/value pairs.
pub trait AnnotationBuilder {
    fn set_primary(&mut self, val: &str) -> AnnotResult<()>;

    /// Set an option. Called a final time with an empty key at end of input.
    fn set(&mut self, key: &str, val: &str) -> AnnotResult<()>;

    fn finish(self: Box<Self>) -> Annotation;
}

fn require_ident(annotation: &'static str, what: &str, val: &str) -> AnnotResult<String> {
    if val.is_empty() {
        return Err(AnnotError::invalid(annotation, format!("missing {} name", what)));
    }
    if !is_ident(val) {
        return Err(AnnotError::invalid(
            annotation,
            format!("{} name {:?} is not a valid identifier", what, val),
        ));
    }
    Ok(val.to_string())
}

fn unknown_option(annotation: &'static str, key: &str) -> AnnotError {
    AnnotError::invalid(annotation, format!("unknown option {:?}", key))
}

impl AnnotationBuilder for FuncAnnotation {
    fn set_primary(&mut self, val: &str) -> AnnotResult<()> {
        self.name = require_ident("func", "func", val)?;
        Ok(())
    }

    fn set(&mut self, key: &str, val: &str) -> AnnotResult<()> {
        match key {
            "" => Ok(()),
            "return" => {
                self.return_style = match val {
                    "one" => ReturnStyle::One,
                    "many" => ReturnStyle::Many,
                    _ => {
                        return Err(AnnotError::invalid(
                            "func",
                            format!("unknown return style {:?}", val),
                        ))
                    }
                };
                Ok(())
            }
            _ => Err(unknown_option("func", key)),
        }
    }

    fn finish(self: Box<Self>) -> Annotation {
        Annotation::Func(*self)
    }
}

impl AnnotationBuilder for ArgAnnotation {
    fn set_primary(&mut self, val: &str) -> AnnotResult<()> {
        self.name = require_ident("arg", "arg", val)?;
        Ok(())
    }

    fn set(&mut self, key: &str, val: &str) -> AnnotResult<()> {
        match key {
            "" => Ok(()),
            "type" => {
                self.type_name = Some(TypeName::from_spec(val)?);
                Ok(())
            }
            _ => Err(unknown_option("arg", key)),
        }
    }

    fn finish(self: Box<Self>) -> Annotation {
        Annotation::Arg(*self)
    }
}

impl AnnotationBuilder for BindAnnotation {
    fn set_primary(&mut self, val: &str) -> AnnotResult<()> {
        self.name = require_ident("bind", "bind", val)?;
        Ok(())
    }

    fn set(&mut self, key: &str, _val: &str) -> AnnotResult<()> {
        match key {
            "" => Ok(()),
            "in" => {
                self.multi = true;
                Ok(())
            }
            _ => Err(unknown_option("bind", key)),
        }
    }

    fn finish(self: Box<Self>) -> Annotation {
        Annotation::Bind(*self)
    }
}

impl AnnotationBuilder for SubsAnnotation {
    fn set_primary(&mut self, val: &str) -> AnnotResult<()> {
        self.content = val.to_string();
        Ok(())
    }

    fn set(&mut self, key: &str, _val: &str) -> AnnotResult<()> {
        match key {
            "" => Ok(()),
            _ => Err(unknown_option("subs", key)),
        }
    }

    fn finish(self: Box<Self>) -> Annotation {
        Annotation::Subs(*self)
    }
}

impl AnnotationBuilder for SettingAnnotation {
    fn set_primary(&mut self, val: &str) -> AnnotResult<()> {
        if !val.is_empty() {
            return Err(AnnotError::invalid(
                "setting",
                format!("expect no primary value but got {:?}", val),
            ));
        }
        Ok(())
    }

    fn set(&mut self, key: &str, val: &str) -> AnnotResult<()> {
        match key {
            "" => Ok(()),
            "bindNamePrefix" => {
                if val.is_empty() {
                    return Err(AnnotError::invalid(
                        "setting",
                        "got empty setting for bindNamePrefix",
                    ));
                }
                self.bind_name_prefix = Some(val.to_string());
                Ok(())
            }
            _ => Err(unknown_option("setting", key)),
        }
    }

    fn finish(self: Box<Self>) -> Annotation {
        Annotation::Setting(*self)
    }
}

/// Creates an empty builder for one annotation kind.
pub type BuilderFactory = fn() -> Box<dyn AnnotationBuilder>;

fn boxed<T: AnnotationBuilder + Default + 'static>() -> Box<dyn AnnotationBuilder> {
    Box::new(T::default())
}

/// Primary key -> annotation kind. Built once and passed to the scanner and
/// assembler.
#[derive(Default)]
pub struct AnnotationRegistry {
    builders: BTreeMap<String, BuilderFactory>,
}

impl AnnotationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in annotations: `setting`, `func`, `arg`/`param`, `bind`, `subs`.
    pub fn builtin() -> AnnotResult<Self> {
        let mut registry = Self::new();
        registry.register("setting", boxed::<SettingAnnotation>)?;
        registry.register("func", boxed::<FuncAnnotation>)?;
        registry.register("arg", boxed::<ArgAnnotation>)?;
        registry.register("param", boxed::<ArgAnnotation>)?;
        registry.register("bind", boxed::<BindAnnotation>)?;
        registry.register("subs", boxed::<SubsAnnotation>)?;
        Ok(registry)
    }

    /// Register a primary key. Keys can only be registered once.
    pub fn register(&mut self, key: &str, factory: BuilderFactory) -> AnnotResult<()> {
        if self.builders.contains_key(key) {
            return Err(AnnotError::DuplicateRegistration {
                key: key.to_string(),
            });
        }
        self.builders.insert(key.to_string(), factory);
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }

    /// Parse annotation text (comment content without the marker).
    pub fn parse(&self, src: &str) -> AnnotResult<Annotation> {
        let mut pairs = KvLexer::new(src);

        let (key, val) = pairs.next_pair()?;
        let factory = self
            .builders
            .get(&key)
            .ok_or(AnnotError::UnknownAnnotation { key: key.clone() })?;
        let mut builder = factory();
        builder.set_primary(&val)?;

        loop {
            let (key, val) = pairs.next_pair()?;
            builder.set(&key, &val)?;
            if key.is_empty() {
                break;
            }
        }
        Ok(builder.finish())
    }
}

static KV_RE: OnceLock<Regex> = OnceLock::new();

fn kv_regex() -> &'static Regex {
    KV_RE.get_or_init(|| {
        Regex::new(r#"^([A-Za-z][0-9A-Za-z_]*)(:(("[^"\\]*(?:\\.[^"\\]*)*")|([^\s:"]+)))?\s+"#)
            .expect("valid regex")
    })
}

/// Splits annotation text into key/value pairs.
struct KvLexer {
    remain: String,
    pos: usize,
}

impl KvLexer {
    fn new(src: &str) -> Self {
        Self {
            remain: format!("{} ", src.trim()),
            pos: 0,
        }
    }

    /// Next `(key, value)`; `("", "")` once drained.
    fn next_pair(&mut self) -> AnnotResult<(String, String)> {
        let rest = &self.remain[self.pos..];
        if rest.is_empty() {
            return Ok((String::new(), String::new()));
        }

        let caps = kv_regex()
            .captures(rest)
            .ok_or_else(|| AnnotError::IllegalFormat {
                near: rest.trim_end().to_string(),
            })?;

        let key = caps[1].to_string();
        let val = match (caps.get(4), caps.get(3)) {
            (Some(quoted), _) => unescape(&quoted.as_str()[1..quoted.as_str().len() - 1]),
            (None, Some(bare)) => bare.as_str().to_string(),
            (None, None) => String::new(),
        };
        self.pos += caps[0].len();
        Ok((key, val))
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0b'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Write `val` as a bare token when possible, else as a quoted string.
fn write_value(f: &mut fmt::Formatter<'_>, val: &str) -> fmt::Result {
    let bare = !val.is_empty() && !val.chars().any(|c| c.is_whitespace() || c == ':' || c == '"');
    if bare {
        return f.write_str(val);
    }
    f.write_str("\"")?;
    for c in val.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\x07' => f.write_str("\\a")?,
            '\x08' => f.write_str("\\b")?,
            '\x0c' => f.write_str("\\f")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\x0b' => f.write_str("\\v")?,
            _ => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Func(a) => {
                write!(f, "func:{}", a.name)?;
                match a.return_style {
                    ReturnStyle::Unknown => Ok(()),
                    style => write!(f, " return:{}", style),
                }
            }
            Annotation::Arg(a) => {
                write!(f, "arg:{}", a.name)?;
                if let Some(type_name) = &a.type_name {
                    f.write_str(" type:")?;
                    write_value(f, &type_name.spec())?;
                }
                Ok(())
            }
            Annotation::Bind(a) => {
                write!(f, "bind:{}", a.name)?;
                if a.multi {
                    f.write_str(" in")?;
                }
                Ok(())
            }
            Annotation::Subs(a) => {
                f.write_str("subs:")?;
                write_value(f, &a.content)
            }
            Annotation::Setting(a) => {
                f.write_str("setting")?;
                if let Some(prefix) = &a.bind_name_prefix {
                    f.write_str(" bindNamePrefix:")?;
                    write_value(f, prefix)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "annotation_test.rs"]
mod tests;

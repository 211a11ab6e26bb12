//! Statement assembler: turns annotated statement source into a
//! [`WrapperDescriptor`].

use crate::annotation::{
    Annotation, AnnotationRegistry, ArgAnnotation, ReturnStyle, SettingAnnotation,
};
use crate::comment::{scan_annotated, Comment};
use crate::error::{AnnotError, AnnotResult};
use serde::Serialize;

/// Characters trimmed from both ends of the processed text.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', ';'];

/// Everything the templates need to know about one annotated statement.
#[derive(Debug, Clone, Serialize)]
pub struct WrapperDescriptor {
    /// Statement source as written, comments included.
    pub source_text: String,
    /// Source with comments removed, substitutions spliced in and binds
    /// replaced by named placeholders.
    pub text: String,
    pub comments: Vec<Comment>,
    pub function_name: String,
    /// False when the name was generated (`NoName<N>`).
    pub named: bool,
    pub args: Vec<ArgAnnotation>,
    /// Bind names in placeholder order, repeats included.
    pub bindings: Vec<String>,
    /// Indices into `bindings` of `IN (...)` binds.
    pub in_bindings: Vec<usize>,
    pub return_style: ReturnStyle,
}

impl WrapperDescriptor {
    pub fn has_in_binding(&self) -> bool {
        !self.in_bindings.is_empty()
    }
}

/// Assembles statements for one generation run.
///
/// Holds the settings that annotations may change (the bind-name prefix) and
/// the counter used to name anonymous statements, so repeated runs in one
/// process produce the same names.
pub struct Assembler<'r> {
    registry: &'r AnnotationRegistry,
    marker: String,
    bind_name_prefix: String,
    no_name_count: usize,
}

impl<'r> Assembler<'r> {
    pub fn new(registry: &'r AnnotationRegistry, marker: &str, bind_name_prefix: &str) -> Self {
        Self {
            registry,
            marker: marker.to_string(),
            bind_name_prefix: bind_name_prefix.to_string(),
            no_name_count: 0,
        }
    }

    /// Current prefix of emitted bind placeholders.
    pub fn bind_name_prefix(&self) -> &str {
        &self.bind_name_prefix
    }

    /// Scan the comments of a statement without assembling it.
    pub fn scan(&self, source: &str) -> AnnotResult<Vec<Comment>> {
        scan_annotated(source, self.registry, &self.marker)
    }

    /// Apply the `setting` annotations among `comments`. Used for statements
    /// that carry no SQL and so are never assembled.
    pub fn apply_settings(&mut self, comments: &[Comment]) {
        for comment in comments {
            if let Some(Annotation::Setting(setting)) = &comment.annotation {
                self.apply_setting(setting);
            }
        }
    }

    fn apply_setting(&mut self, setting: &SettingAnnotation) {
        if let Some(prefix) = &setting.bind_name_prefix {
            log::debug!("bind name prefix set to {:?}", prefix);
            self.bind_name_prefix = prefix.clone();
        }
    }

    /// Assemble one statement.
    pub fn assemble(&mut self, source: &str) -> AnnotResult<WrapperDescriptor> {
        let comments = self.scan(source)?;

        let mut text = String::with_capacity(source.len());
        let mut function: Option<(String, ReturnStyle)> = None;
        let mut args = Vec::new();
        let mut bindings = Vec::new();
        let mut in_bindings = Vec::new();

        let mut cursor = 0;
        let mut i = 0;
        while i < comments.len() {
            let comment = &comments[i];
            text.push_str(&source[cursor..comment.offset]);
            let mut end = comment.end();

            match &comment.annotation {
                Some(Annotation::Subs(subs)) => text.push_str(&subs.content),
                Some(Annotation::Func(func)) => {
                    if let Some((first, _)) = &function {
                        return Err(AnnotError::DuplicateFunc {
                            first: first.clone(),
                            second: func.name.clone(),
                        });
                    }
                    function = Some((func.name.clone(), func.return_style));
                }
                Some(Annotation::Arg(arg)) => args.push(arg.clone()),
                Some(Annotation::Bind(bind)) => {
                    // The enclosure comment closes the placeholder text.
                    i += 1;
                    let enclosure = comments.get(i).ok_or_else(|| AnnotError::MissingEnclosure {
                        bind: bind.name.clone(),
                    })?;
                    end = enclosure.end();
                    text.push_str(&self.bind_name_prefix);
                    text.push_str(&bind.name);
                    if bind.multi {
                        in_bindings.push(bindings.len());
                    }
                    bindings.push(bind.name.clone());
                }
                Some(Annotation::Setting(setting)) => self.apply_setting(setting),
                None => {}
            }

            cursor = end;
            i += 1;
        }
        text.push_str(&source[cursor..]);

        let (function_name, return_style, named) = match function {
            Some((name, style)) => (name, style, true),
            None => {
                self.no_name_count += 1;
                (format!("NoName{}", self.no_name_count), ReturnStyle::Unknown, false)
            }
        };

        Ok(WrapperDescriptor {
            source_text: source.to_string(),
            text: text.trim_matches(TRIM_CHARS).to_string(),
            comments,
            function_name,
            named,
            args,
            bindings,
            in_bindings,
            return_style,
        })
    }
}

#[cfg(test)]
#[path = "assembler_test.rs"]
mod tests;

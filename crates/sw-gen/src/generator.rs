//! The generation run: load the schema, resolve every DML statement and
//! render the Go package.

use crate::descriptor::{
    adapt, parse_column_type, ColumnOrigin, DmlFile, ExecDescriptor, ExecKind, FuncView,
    ResultFieldDescriptor, ResultStruct, SelectDescriptor, StatementDescriptor, TableDescriptor,
    WildcardPosition,
};
use crate::error::{GenError, GenResult};
use crate::render::{write_file, Renderer};
use minijinja::{context, Value};
use serde::Serialize;
use sqlparser::ast::{Query, SelectItem, Statement};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use sw_annot::{
    blank_comments, engine_text, split_statements, AnnotationRegistry, Assembler, ReturnStyle,
};
use sw_core::{Config, TypeAdapter};
use sw_db::{DuckDbOracle, SqlOracle};
use sw_sql::{
    expand_wildcards, leftmost_select, ref_columns_sql, resolve_query_table_refs,
    rewrite_wildcards, SqlParser,
};

/// Characters that never make a statement.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', ';'];

/// File holding the declarations shared by all generated files.
pub const STANDALONE_FILE: &str = "sqlwrap_standalone.go";

/// What a generation run wrote.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateSummary {
    pub files: Vec<PathBuf>,
    pub tables: usize,
    pub statements: usize,
}

/// Drives one generation run over a project.
pub struct Generator {
    config: Config,
    root: PathBuf,
    oracle: Box<dyn SqlOracle>,
    registry: AnnotationRegistry,
    parser: SqlParser,
    adapter: TypeAdapter,
    renderer: Renderer,
    schema_loaded: bool,
}

impl Generator {
    /// Create a generator for the project at `root` with an in-memory DuckDB
    /// oracle.
    pub fn new(config: Config, root: &Path) -> GenResult<Self> {
        let oracle = DuckDbOracle::in_memory()?;
        Self::with_oracle(config, root, Box::new(oracle))
    }

    pub fn with_oracle(config: Config, root: &Path, oracle: Box<dyn SqlOracle>) -> GenResult<Self> {
        config.validate()?;
        let registry = AnnotationRegistry::builtin()?;
        let parser = SqlParser::for_dialect(config.dialect);
        let adapter = config.type_adapter()?;
        let renderer = Renderer::new(
            &config.package_name()?,
            &config.template_dirs_absolute(root),
        )?;
        log::debug!(
            "generator ready: dialect {}, oracle {}",
            parser.dialect_name(),
            oracle.engine()
        );

        Ok(Self {
            config,
            root: root.to_path_buf(),
            oracle,
            registry,
            parser,
            adapter,
            renderer,
            schema_loaded: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn oracle(&self) -> &dyn SqlOracle {
        self.oracle.as_ref()
    }

    /// A fresh assembler. Anonymous statement numbering and bind-name
    /// prefix settings carry across every statement it assembles.
    pub fn assembler(&self) -> Assembler<'_> {
        Assembler::new(
            &self.registry,
            &self.config.annotation_marker,
            &self.config.bind_name_prefix,
        )
    }

    pub fn ddl_files(&self) -> GenResult<Vec<PathBuf>> {
        expand_globs(&self.root, &self.config.ddl)
    }

    pub fn dml_files(&self) -> GenResult<Vec<PathBuf>> {
        expand_globs(&self.root, &self.config.dml)
    }

    /// Load the configured DDL files into the oracle, once.
    pub fn load_schema(&mut self) -> GenResult<Vec<PathBuf>> {
        if self.schema_loaded {
            return Ok(Vec::new());
        }
        let files = self.ddl_files()?;
        if files.is_empty() {
            log::warn!("no DDL files match {:?}", self.config.ddl);
        }
        self.load_ddl(&files)?;
        self.schema_loaded = true;
        Ok(files)
    }

    /// Execute DDL files against the oracle in the given order.
    pub fn load_ddl(&self, paths: &[PathBuf]) -> GenResult<()> {
        for path in paths {
            let sql = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
            log::debug!("loading DDL {}", path.display());
            self.oracle.execute_batch(&sql)?;
        }
        Ok(())
    }

    /// Descriptors of every table in the oracle's schema.
    pub fn tables(&self) -> GenResult<Vec<TableDescriptor>> {
        self.oracle
            .list_tables()?
            .iter()
            .map(|info| self.table(&info.schema, &info.name))
            .collect()
    }

    fn table(&self, schema: &str, name: &str) -> GenResult<TableDescriptor> {
        let columns = self.oracle.table_columns(schema, name)?;
        log::debug!("table {}.{}: {} columns", schema, name, columns.len());
        TableDescriptor::build(
            schema,
            name,
            &self.config.default_schema,
            &columns,
            &self.adapter,
        )
    }

    /// Resolve every statement of a DML file.
    pub fn process_dml(&self, assembler: &mut Assembler<'_>, path: &Path) -> GenResult<DmlFile> {
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut statements = Vec::new();
        for (i, source) in split_statements(&content)?.into_iter().enumerate() {
            let described = self
                .process_statement(assembler, source)
                .map_err(|e| GenError::InStatement {
                    file: path.to_path_buf(),
                    index: i + 1,
                    source: Box::new(e),
                })?;
            if let Some(statement) = described {
                log::debug!(
                    "{}: statement {} -> {}",
                    path.display(),
                    i + 1,
                    statement.wrapper().function_name
                );
                statements.push(statement);
            }
        }
        if statements.is_empty() {
            log::warn!("{} has no statements", path.display());
        }

        Ok(DmlFile {
            path: path.display().to_string(),
            stem,
            statements,
        })
    }

    /// Resolve one statement. Statements without SQL (only comments) apply
    /// their settings and yield `None`.
    pub fn process_statement(
        &self,
        assembler: &mut Assembler<'_>,
        source: &str,
    ) -> GenResult<Option<StatementDescriptor>> {
        let comments = assembler.scan(source)?;
        let blanked = blank_comments(source, &comments);
        if blanked.trim_matches(TRIM_CHARS).is_empty() {
            assembler.apply_settings(&comments);
            return Ok(None);
        }

        let kind = match self.parser.parse_single(&blanked)? {
            Statement::Query(query) => {
                let engine = engine_text(source, &comments);
                let select = self.process_select(assembler, source, &blanked, &engine, &query)?;
                return Ok(Some(StatementDescriptor::Select(select)));
            }
            Statement::Insert { .. } => ExecKind::Insert,
            Statement::Update { .. } => ExecKind::Update,
            Statement::Delete { .. } => ExecKind::Delete,
            other => {
                return Err(GenError::UnsupportedStatement {
                    kind: statement_kind(&other),
                })
            }
        };
        Ok(Some(StatementDescriptor::Exec(ExecDescriptor {
            wrapper: assembler.assemble(source)?,
            kind,
        })))
    }

    fn process_select(
        &self,
        assembler: &mut Assembler<'_>,
        source: &str,
        blanked: &str,
        engine: &str,
        query: &Query,
    ) -> GenResult<SelectDescriptor> {
        let default_schema = self.config.default_schema.as_str();
        let refs = resolve_query_table_refs(query, default_schema)?;
        let select = leftmost_select(query)
            .ok_or_else(|| GenError::Internal("query lost its SELECT".to_string()))?;
        let compiled = self.oracle.compile(engine.trim_matches(TRIM_CHARS))?;

        let mut base_tables: HashMap<String, TableDescriptor> = HashMap::new();
        for table_ref in refs.iter() {
            if let Some(table) = &table_ref.table {
                base_tables.insert(
                    table_ref.name.clone(),
                    self.table(&table.schema, &table.table)?,
                );
            }
        }

        let mut counts = HashMap::new();
        let mut columns = HashMap::new();
        if select.projection.iter().any(is_wildcard) {
            // Derived columns are compiled in the statement's own FROM clause
            // so sibling CTEs and column alias lists stay in effect.
            let engine_query = self.parse_query(engine)?;
            for table_ref in refs.iter() {
                let names = match (base_tables.get(&table_ref.name), &table_ref.subquery) {
                    (Some(table), _) => table.column_names(),
                    (None, Some(_)) => {
                        let dialect = self.parser.dialect();
                        let sql = ref_columns_sql(&engine_query, &table_ref.name, dialect)?;
                        self.oracle.compile(&sql)?.into_iter().map(|f| f.name).collect()
                    }
                    (None, None) => {
                        return Err(GenError::Internal(format!(
                            "table reference {:?} has neither table nor subquery",
                            table_ref.name
                        )))
                    }
                };
                counts.insert(table_ref.name.clone(), names.len());
                columns.insert(table_ref.name.clone(), names);
            }
        }

        let field_list = expand_wildcards(
            &select.projection,
            &refs,
            &counts,
            default_schema,
            compiled.len(),
        )?;

        let (expanded_source, compiled) = if field_list.has_wildcards() {
            let rewritten = rewrite_wildcards(
                source,
                blanked,
                select,
                &field_list,
                &columns,
                self.parser.dialect(),
            )?;
            let rewritten_engine = engine_text(&rewritten, &assembler.scan(&rewritten)?);
            let recompiled = self
                .oracle
                .compile(rewritten_engine.trim_matches(TRIM_CHARS))?;
            if recompiled.len() != compiled.len() {
                return Err(GenError::Internal(format!(
                    "wildcard expansion changed the field count from {} to {}",
                    compiled.len(),
                    recompiled.len()
                )));
            }
            (rewritten, recompiled)
        } else {
            (source.to_string(), compiled)
        };

        let wrapper = assembler.assemble(&expanded_source)?;

        let mut fields = Vec::with_capacity(compiled.len());
        for (i, result_field) in compiled.iter().enumerate() {
            let wildcard = field_list
                .wildcard_for(i)
                .map(|(table_ref, index)| WildcardPosition {
                    table_ref: table_ref.to_string(),
                    index,
                    base_table: refs.is_base_table(table_ref),
                    outer_joined: refs.get(table_ref).is_some_and(|r| r.outer_joined),
                });

            let source_column = match &wildcard {
                Some(w) => base_tables
                    .get(&w.table_ref)
                    .and_then(|t| t.columns.get(w.index).map(|c| (w.table_ref.as_str(), t, c))),
                None => field_list.column_ref_for(i).and_then(|column_ref| {
                    let table = base_tables.get(&column_ref.table_ref)?;
                    let column = table.column(&column_ref.column)?;
                    Some((column_ref.table_ref.as_str(), table, column))
                }),
            };

            let (origin, nullable) = match source_column {
                Some((table_ref, table, column)) => {
                    let outer = refs.get(table_ref).is_some_and(|r| r.outer_joined);
                    let origin = ColumnOrigin {
                        table_ref: table_ref.to_string(),
                        table: table.ref_name.clone(),
                        column: column.name.clone(),
                        table_type: table.pascal_name.clone(),
                        column_field: column.pascal_name.clone(),
                        local_type: column.local_type.clone(),
                    };
                    (Some(origin), column.nullable || outer)
                }
                None => (None, result_field.nullable),
            };

            let column_type =
                parse_column_type(&result_field.name, &result_field.sql_type, nullable)?;
            let type_spec = adapt(&self.adapter, &result_field.name, &column_type)?;
            fields.push(ResultFieldDescriptor {
                name: result_field.name.clone(),
                sql_type: result_field.sql_type.clone(),
                column_type,
                type_spec,
                nullable,
                origin,
                wildcard,
            });
        }

        let result = ResultStruct::build(&wrapper.function_name, &fields)?;
        Ok(SelectDescriptor {
            wrapper,
            original_source: source.to_string(),
            table_refs: refs,
            field_list,
            fields,
            result,
        })
    }

    fn parse_query(&self, sql: &str) -> GenResult<Box<Query>> {
        match self.parser.parse_single(sql)? {
            Statement::Query(query) => Ok(query),
            other => Err(GenError::Internal(format!(
                "engine text parsed as {}",
                statement_kind(&other)
            ))),
        }
    }

    /// Resolve a DML file without rendering it, loading the schema first.
    pub fn describe(&mut self, path: &Path) -> GenResult<DmlFile> {
        self.load_schema()?;
        let mut assembler = self.assembler();
        self.process_dml(&mut assembler, path)
    }

    /// Full run: load the schema and write the standalone file, one file per
    /// table and one per DML file into the output directory.
    pub fn generate(&mut self) -> GenResult<GenerateSummary> {
        self.load_schema()?;
        let out_dir = self.config.output_dir_absolute(&self.root);
        let mut summary = GenerateSummary::default();

        let standalone = self
            .renderer
            .render_file(&[("standalone", context! {})])?;
        let path = out_dir.join(STANDALONE_FILE);
        write_file(&path, &standalone)?;
        summary.files.push(path);

        for table in self.tables()? {
            let content = self
                .renderer
                .render_file(&[("table", context! { table => table })])?;
            let path = out_dir.join(format!("table_{}.go", table.ref_name.replace('.', "_")));
            write_file(&path, &content)?;
            summary.files.push(path);
            summary.tables += 1;
        }

        let mut assembler = self.assembler();
        let mut functions: HashMap<String, PathBuf> = HashMap::new();
        let mut stems = HashSet::new();
        for dml_path in self.dml_files()? {
            let dml = self.process_dml(&mut assembler, &dml_path)?;
            if dml.statements.is_empty() {
                continue;
            }
            if !stems.insert(dml.stem.clone()) {
                return Err(GenError::DuplicateOutput {
                    name: format!("{}.go", dml.stem),
                    path: dml_path,
                });
            }

            let mut parts: Vec<(&str, Value)> = Vec::with_capacity(dml.statements.len());
            for statement in &dml.statements {
                let name = &statement.wrapper().function_name;
                if let Some(first) = functions.insert(name.clone(), dml_path.clone()) {
                    return Err(GenError::DuplicateFunction {
                        name: name.clone(),
                        first,
                        second: dml_path,
                    });
                }
                parts.push(statement_part(statement));
            }

            let content = self.renderer.render_file(&parts)?;
            let path = out_dir.join(format!("{}.go", dml.stem));
            write_file(&path, &content)?;
            summary.files.push(path);
            summary.statements += dml.statements.len();
        }

        Ok(summary)
    }
}

fn statement_part(statement: &StatementDescriptor) -> (&'static str, Value) {
    match statement {
        StatementDescriptor::Select(select) => (
            "select",
            context! {
                func => FuncView::new(&select.wrapper, ReturnStyle::Many),
                result => &select.result,
            },
        ),
        StatementDescriptor::Exec(exec) => (
            "exec",
            context! {
                func => FuncView::new(&exec.wrapper, ReturnStyle::Unknown),
                kind => exec.kind,
            },
        ),
    }
}

fn is_wildcard(item: &SelectItem) -> bool {
    matches!(
        item,
        SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..)
    )
}

/// Leading keyword of a statement, e.g. `CREATE`.
fn statement_kind(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}

/// Files matching `patterns` relative to `root`, sorted and deduplicated.
pub fn expand_globs(root: &Path, patterns: &[String]) -> GenResult<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let full = root.join(pattern);
        let entries = glob::glob(&full.to_string_lossy()).map_err(|e| GenError::BadGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable path: {}", e),
            }
        }
    }
    Ok(files.into_iter().collect())
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
